use clap::Parser;
use ns_core::config::{DEFAULT_COUNTRY, DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL, DEFAULT_NEWS_BASE_URL};
use ns_core::{top_articles, AppConfig, Article, ModelKind, NewsSource};
use ns_news::NewsApiClient;
use ns_web::AppState;
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Today's headlines, rewritten in plain language", long_about = None)]
pub struct Cli {
    #[arg(long, env = "NEWS_API_KEY", hide_env_values = true, default_value = "")]
    news_api_key: String,
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    gemini_api_key: Option<String>,
    /// Country code passed to the headline query
    #[arg(long, env = "NEWS_COUNTRY", default_value = DEFAULT_COUNTRY)]
    country: String,
    #[arg(long, value_enum, default_value_t = ModelKind::Gemini)]
    model: ModelKind,
    #[arg(long, env = "GEMINI_MODEL", default_value = DEFAULT_GEMINI_MODEL)]
    gemini_model: String,
    #[arg(long, env = "NEWS_API_BASE_URL", default_value = DEFAULT_NEWS_BASE_URL)]
    news_base_url: String,
    #[arg(long, env = "GEMINI_BASE_URL", default_value = DEFAULT_GEMINI_BASE_URL)]
    gemini_base_url: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Run the web server
    Serve {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        #[arg(long, default_value_t = 5000)]
        port: u16,
    },
    /// Print today's top headlines
    Headlines,
    /// Simplify an article. Reads stdin when no text is given.
    Simplify {
        text: Option<String>,
    },
}

impl Cli {
    fn app_config(&self) -> AppConfig {
        AppConfig {
            news_api_key: self.news_api_key.clone(),
            gemini_api_key: self.gemini_api_key.clone(),
            country: self.country.clone(),
            model: self.model,
            gemini_model: self.gemini_model.clone(),
            news_base_url: self.news_base_url.clone(),
            gemini_base_url: self.gemini_base_url.clone(),
        }
    }
}

fn print_headlines(articles: &[Article]) {
    if articles.is_empty() {
        println!("No headlines right now.");
        return;
    }
    for (i, article) in articles.iter().enumerate() {
        if article.source.is_empty() {
            println!("{}. {}", i + 1, article.title);
        } else {
            println!("{}. {} ({})", i + 1, article.title, article.source);
        }
        if !article.url.is_empty() {
            println!("   {}", article.url);
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let cli = Cli::parse();

    let config = cli.app_config();
    config.validate()?;

    let news = Arc::new(NewsApiClient::new(
        config.news_api_key.clone(),
        config.news_base_url.clone(),
    ));
    let inference = ns_inference::create_model(&config).await?;
    info!("🧠 Inference model initialized successfully (using {})", inference.name());

    match cli.command {
        Commands::Serve { host, port } => {
            let addr = format!("{}:{}", host, port);
            let state = AppState::new(config, news, inference);
            ns_web::serve(state, &addr).await?;
        }
        Commands::Headlines => {
            let articles = top_articles(news.top_headlines(&config.country).await?);
            print_headlines(&articles);
        }
        Commands::Simplify { text } => {
            let text = match text {
                Some(text) => text,
                None => {
                    let mut buf = String::new();
                    tokio::io::stdin().read_to_string(&mut buf).await?;
                    buf
                }
            };
            let summary = ns_inference::simplify_text(inference.as_ref(), &text).await?;
            println!("{}", summary);
        }
    }

    Ok(())
}
