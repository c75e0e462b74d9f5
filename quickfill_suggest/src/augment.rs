//! Field detection through an external completion service.

use std::time::Duration;

use chrono::{Local, NaiveDate};
use quickfill_core::{
    Candidate, ChatMessage, EntityKind, FieldValue, LLMProvider, Origin, SuggestionKind,
    canonical_field,
};
use serde_json::{Map, Value};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Default bound on one external request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(8);

/// Keys the service is asked to fill.
const RESPONSE_KEYS: &[&str] = &[
    "priority",
    "lifeArea",
    "project",
    "icon",
    "time",
    "date",
    "recurrence",
    "estimatedHours",
    "tags",
    "location",
    "assignee",
];

/// Why the external path produced nothing usable.
#[derive(Debug, Error)]
pub enum AugmentError {
    #[error("external request timed out after {0:?}")]
    Timeout(Duration),

    #[error("external request was cancelled")]
    Cancelled,

    #[error("external provider failed: {0}")]
    Provider(#[source] anyhow::Error),

    #[error("malformed external response: {0}")]
    Malformed(String),
}

/// Asks a completion service for structured fields.
pub struct ExternalAugmenter<P: LLMProvider> {
    provider: P,
    model: String,
    timeout: Duration,
}

impl<P: LLMProvider> ExternalAugmenter<P> {
    /// Augmenter using the provider's default model and an 8 second timeout.
    #[must_use]
    pub fn new(provider: P) -> Self {
        let model = provider.get_default_model().to_string();
        Self {
            provider,
            model,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Send one request for `text` and map the reply to candidates.
    ///
    /// The call is bounded by the configured timeout and aborted as soon as
    /// `cancel` fires. No retries are attempted.
    pub async fn augment(
        &self,
        text: &str,
        kind: EntityKind,
        cancel: &CancellationToken,
    ) -> Result<Vec<Candidate>, AugmentError> {
        self.augment_at(text, kind, Local::now().date_naive(), cancel)
            .await
    }

    /// [`Self::augment`] with an explicit date for the prompt.
    pub async fn augment_at(
        &self,
        text: &str,
        kind: EntityKind,
        today: NaiveDate,
        cancel: &CancellationToken,
    ) -> Result<Vec<Candidate>, AugmentError> {
        let messages = [ChatMessage::user(build_prompt(text, kind, today))];

        let response = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(AugmentError::Cancelled),
            result = tokio::time::timeout(self.timeout, self.provider.chat(&messages, &self.model)) => {
                match result {
                    Err(_) => return Err(AugmentError::Timeout(self.timeout)),
                    Ok(Err(e)) => return Err(AugmentError::Provider(e)),
                    Ok(Ok(response)) => response,
                }
            }
        };

        if let Some(usage) = &response.usage {
            debug!(
                "External augmentation used {} tokens ({} prompt, {} completion)",
                usage.total_tokens, usage.prompt_tokens, usage.completion_tokens
            );
        }

        let object = parse_object(&response.content)?;
        Ok(candidates_from(object, kind))
    }
}

fn build_prompt(text: &str, kind: EntityKind, today: NaiveDate) -> String {
    format!(
        "Extract structured fields for a {kind} from the text below.\n\
         Today is {today} ({weekday}).\n\
         Reply with a single JSON object and nothing else. Every key is optional; \
         omit keys you cannot infer. Allowed keys: {keys}.\n\
         - priority: one of Low, Medium, High, Critical\n\
         - date: YYYY-MM-DD\n\
         - time: HH:MM (24-hour)\n\
         - estimatedHours: number of hours\n\
         - tags: array of short lower-case strings\n\
         - recurrence: one of Daily, Weekdays, Weekly, Biweekly, Monthly, Yearly\n\
         - icon: a single emoji\n\n\
         Text: {text}",
        today = today.format("%Y-%m-%d"),
        weekday = today.format("%A"),
        keys = RESPONSE_KEYS.join(", "),
    )
}

/// Parse the outermost `{...}` in `content`, ignoring surrounding prose or
/// code fences.
fn parse_object(content: &str) -> Result<Map<String, Value>, AugmentError> {
    let start = content
        .find('{')
        .ok_or_else(|| AugmentError::Malformed("no JSON object in response".to_string()))?;
    let end = content
        .rfind('}')
        .filter(|end| *end > start)
        .ok_or_else(|| AugmentError::Malformed("unterminated JSON object".to_string()))?;

    match serde_json::from_str::<Value>(&content[start..=end]) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(AugmentError::Malformed("response is not an object".to_string())),
        Err(e) => Err(AugmentError::Malformed(e.to_string())),
    }
}

fn json_to_value(value: Value) -> Option<FieldValue> {
    match value {
        Value::Null | Value::Object(_) => None,
        Value::Bool(b) => Some(FieldValue::Bool(b)),
        Value::Number(n) => n.as_f64().map(FieldValue::Number),
        Value::String(s) => Some(FieldValue::Text(s)),
        Value::Array(items) => Some(FieldValue::List(
            items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s),
                    Value::Null => None,
                    other => Some(other.to_string()),
                })
                .collect(),
        )),
    }
}

fn confidence_for(key: &str) -> f64 {
    match key {
        "priority" => 0.95,
        "time" | "date" => 0.93,
        "lifeArea" | "category" => 0.92,
        "icon" | "recurrence" | "tags" | "assignee" => 0.9,
        _ => 0.88,
    }
}

fn candidates_from(object: Map<String, Value>, kind: EntityKind) -> Vec<Candidate> {
    object
        .into_iter()
        .filter_map(|(key, raw)| {
            let value = json_to_value(raw)?;
            let category =
                canonical_field(&key, kind).map_or(SuggestionKind::Status, |f| f.kind());
            Some(Candidate {
                kind: category,
                confidence: confidence_for(&key),
                reason: "Suggested by the assistant".to_string(),
                label: String::new(),
                icon: String::new(),
                origin: Origin::External,
                field: key,
                value,
            })
        })
        .collect()
}
