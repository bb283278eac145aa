use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Message shown when the backend could not be reached or answered garbage.
pub const TRANSPORT_ERROR_MESSAGE: &str =
    "Network error. Please check your connection and try again.";

/// Form payload sent to the extraction endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionRequest {
    pub url: String,
    pub start_time: String,
    pub end_time: String,
    pub duration: String,
}

impl ExtractionRequest {
    pub fn new(url: &str, start_time: &str, end_time: &str, duration: &str) -> Self {
        Self {
            url: url.trim().to_string(),
            start_time: start_time.trim().to_string(),
            end_time: end_time.trim().to_string(),
            duration: duration.trim().to_string(),
        }
    }
}

/// Entity categories, in display and export order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Books,
    People,
    Places,
    Facts,
    Topics,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Books,
        Category::People,
        Category::Places,
        Category::Facts,
        Category::Topics,
    ];

    /// JSON field name in the extraction result.
    pub fn key(&self) -> &'static str {
        match self {
            Category::Books => "books",
            Category::People => "people",
            Category::Places => "places",
            Category::Facts => "facts",
            Category::Topics => "topics",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Category::Books => "Books & Publications",
            Category::People => "People Mentioned",
            Category::Places => "Places Mentioned",
            Category::Facts => "Key Facts & Insights",
            Category::Topics => "Main Topics",
        }
    }
}

/// Structured extraction result returned by the backend.
///
/// Deserialization never rejects a well-formed JSON object: missing, null or
/// mistyped fields become empty values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractionResult {
    pub url: String,
    pub start_time: String,
    pub end_time: String,
    pub processed_at: String,
    pub summary: String,
    pub transcription: String,
    pub books: Vec<String>,
    pub people: Vec<String>,
    pub places: Vec<String>,
    pub facts: Vec<String>,
    pub topics: Vec<String>,
}

impl ExtractionResult {
    pub fn from_value(value: &Value) -> Self {
        Self {
            url: text_field(value, "url"),
            start_time: text_field(value, "start_time"),
            end_time: text_field(value, "end_time"),
            processed_at: text_field(value, "processed_at"),
            summary: text_field(value, "summary"),
            transcription: text_field(value, "transcription"),
            books: list_field(value, Category::Books.key()),
            people: list_field(value, Category::People.key()),
            places: list_field(value, Category::Places.key()),
            facts: list_field(value, Category::Facts.key()),
            topics: list_field(value, Category::Topics.key()),
        }
    }

    pub fn items(&self, category: Category) -> &[String] {
        match category {
            Category::Books => &self.books,
            Category::People => &self.people,
            Category::Places => &self.places,
            Category::Facts => &self.facts,
            Category::Topics => &self.topics,
        }
    }
}

impl<'de> Deserialize<'de> for ExtractionResult {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}

fn text_field(value: &Value, key: &str) -> String {
    match value.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

fn list_field(value: &Value, key: &str) -> Vec<String> {
    let Some(Value::Array(items)) = value.get(key) else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .collect()
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionFailure {
    /// The backend answered `success: false`.
    #[error("{0}")]
    Backend(String),

    /// The request never produced a usable envelope.
    #[error("transport failure: {0}")]
    Transport(String),
}

impl ExtractionFailure {
    /// Text shown to the user. Backend messages are passed through verbatim.
    pub fn user_message(&self) -> &str {
        match self {
            ExtractionFailure::Backend(message) => message,
            ExtractionFailure::Transport(_) => TRANSPORT_ERROR_MESSAGE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionOutcome {
    Completed(ExtractionResult),
    Failed(ExtractionFailure),
}

/// Wire envelope: `{success: true, data}` or `{success: false, error}`.
#[derive(Debug, Deserialize)]
pub struct ResponseEnvelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Option<ExtractionResult>,
    #[serde(default)]
    pub error: Option<String>,
}

impl From<ResponseEnvelope> for ExtractionOutcome {
    fn from(envelope: ResponseEnvelope) -> Self {
        match (envelope.success, envelope.data) {
            (true, Some(data)) => ExtractionOutcome::Completed(data),
            (true, None) => ExtractionOutcome::Completed(ExtractionResult::default()),
            (false, _) => ExtractionOutcome::Failed(ExtractionFailure::Backend(
                envelope
                    .error
                    .unwrap_or_else(|| "Unknown error".to_string()),
            )),
        }
    }
}

/// Body of the backend `/health` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub openai_api_configured: bool,
    #[serde(default)]
    pub timestamp: String,
}
