use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use crate::policy::default_if_absent;

/// A headline as surfaced to the browser. Lives for one request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub description: String,
    pub content: String,
    pub url: String,
    pub source: String,
    pub author: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
}

impl Article {
    /// Text shown under the headline: the description, or the content when
    /// the source left the description empty.
    pub fn snippet(&self) -> &str {
        if self.description.trim().is_empty() {
            &self.content
        } else {
            &self.description
        }
    }

    /// Text sent to the simplifier.
    pub fn simplifiable_text(&self) -> String {
        [self.title.as_str(), self.description.as_str(), self.content.as_str()]
            .iter()
            .filter(|part| !part.trim().is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimplificationRequest {
    #[serde(default, deserialize_with = "empty_if_absent")]
    pub content: String,
}

/// Missing and `null` both read as the empty string.
fn empty_if_absent<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(|value| default_if_absent(value, ""))
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimplificationResult {
    pub summary: String,
}
