pub mod config;
pub mod error;
pub mod models;
pub mod policy;
pub mod sources;
pub mod types;

pub use config::{AppConfig, ModelKind};
pub use error::{Error, Service};
pub use models::{InferenceModel, TextStream};
pub use policy::{default_if_absent, top_articles, MAX_ARTICLES};
pub use sources::NewsSource;
pub use types::{Article, SimplificationRequest, SimplificationResult};

pub type Result<T> = std::result::Result<T, Error>;
