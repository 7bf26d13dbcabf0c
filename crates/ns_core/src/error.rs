use std::fmt;
use thiserror::Error;

/// External collaborator an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    News,
    Summarization,
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Service::News => write!(f, "News source"),
            Service::Summarization => write!(f, "Summarization source"),
        }
    }
}

fn status_text(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!("status {code}"),
        None => "an error".to_string(),
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{service} returned {}: {message}", status_text(.status))]
    Upstream {
        service: Service,
        status: Option<u16>,
        message: String,
    },

    #[error("{service} unreachable: {source}")]
    Unreachable {
        service: Service,
        #[source]
        source: reqwest::Error,
    },

    #[error("{service} sent a malformed payload: {message}")]
    Malformed { service: Service, message: String },

    #[error("Render error: {0}")]
    Render(String),
}

impl Error {
    pub fn upstream(service: Service, status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Upstream {
            service,
            status,
            message: message.into(),
        }
    }

    pub fn unreachable(service: Service, source: reqwest::Error) -> Self {
        Self::Unreachable { service, source }
    }

    pub fn malformed(service: Service, message: impl Into<String>) -> Self {
        Self::Malformed {
            service,
            message: message.into(),
        }
    }

    /// Machine-readable code surfaced to HTTP clients.
    pub fn code(&self) -> &'static str {
        match self {
            Error::Upstream { service, .. } | Error::Unreachable { service, .. } => match service {
                Service::News => "news_source_unavailable",
                Service::Summarization => "summarization_source_unavailable",
            },
            Error::Malformed { .. } => "upstream_malformed",
            Error::Config(_) => "configuration_error",
            Error::Render(_) => "render_error",
            Error::Io(_) => "internal_error",
        }
    }

    /// True when the failure was caused by one of the external sources.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Error::Upstream { .. } | Error::Unreachable { .. } | Error::Malformed { .. }
        )
    }
}
