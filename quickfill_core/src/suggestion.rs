//! Suggestion data model shared by every source and by the analytics recorder.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The record a suggestion targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    #[default]
    Task,
    Project,
}

impl EntityKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Task => "task",
            Self::Project => "project",
        }
    }

    /// Whether `field` belongs to this entity's canonical schema.
    #[must_use]
    pub const fn allows(&self, field: Field) -> bool {
        match self {
            Self::Task => !matches!(field, Field::Category | Field::StartDate),
            Self::Project => !matches!(
                field,
                Field::LifeArea
                    | Field::Project
                    | Field::ReminderTime
                    | Field::Recurrence
                    | Field::IsRecurring
                    | Field::Location
            ),
        }
    }
}

impl std::str::FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "task" => Ok(Self::Task),
            "project" => Ok(Self::Project),
            other => Err(format!("unknown entity kind: {other}")),
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical target-entity fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Title,
    Status,
    Priority,
    LifeArea,
    Category,
    Project,
    DueDate,
    StartDate,
    ReminderTime,
    Recurrence,
    IsRecurring,
    EstimatedHours,
    Budget,
    Tags,
    Icon,
    Assignee,
    Location,
}

impl Field {
    pub const ALL: [Self; 17] = [
        Self::Title,
        Self::Status,
        Self::Priority,
        Self::LifeArea,
        Self::Category,
        Self::Project,
        Self::DueDate,
        Self::StartDate,
        Self::ReminderTime,
        Self::Recurrence,
        Self::IsRecurring,
        Self::EstimatedHours,
        Self::Budget,
        Self::Tags,
        Self::Icon,
        Self::Assignee,
        Self::Location,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Status => "status",
            Self::Priority => "priority",
            Self::LifeArea => "lifeArea",
            Self::Category => "category",
            Self::Project => "project",
            Self::DueDate => "dueDate",
            Self::StartDate => "startDate",
            Self::ReminderTime => "reminderTime",
            Self::Recurrence => "recurrence",
            Self::IsRecurring => "isRecurring",
            Self::EstimatedHours => "estimatedHours",
            Self::Budget => "budget",
            Self::Tags => "tags",
            Self::Icon => "icon",
            Self::Assignee => "assignee",
            Self::Location => "location",
        }
    }

    /// Human-readable label used in suggestion descriptions.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Status => "status",
            Self::Priority => "priority",
            Self::LifeArea => "life area",
            Self::Category => "category",
            Self::Project => "project",
            Self::DueDate => "due date",
            Self::StartDate => "start date",
            Self::ReminderTime => "reminder time",
            Self::Recurrence => "recurrence",
            Self::IsRecurring => "recurring",
            Self::EstimatedHours => "estimated hours",
            Self::Budget => "budget",
            Self::Tags => "tags",
            Self::Icon => "icon",
            Self::Assignee => "assignee",
            Self::Location => "location",
        }
    }

    /// Detection category a suggestion for this field reports.
    #[must_use]
    pub const fn kind(&self) -> SuggestionKind {
        match self {
            Self::Title | Self::Status => SuggestionKind::Status,
            Self::Priority => SuggestionKind::Priority,
            Self::LifeArea | Self::Category => SuggestionKind::LifeArea,
            Self::Project => SuggestionKind::Project,
            Self::DueDate | Self::StartDate => SuggestionKind::Date,
            Self::ReminderTime => SuggestionKind::Time,
            Self::Recurrence | Self::IsRecurring => SuggestionKind::Recurrence,
            Self::EstimatedHours => SuggestionKind::Duration,
            Self::Budget => SuggestionKind::Budget,
            Self::Tags => SuggestionKind::Tags,
            Self::Icon => SuggestionKind::Icon,
            Self::Assignee => SuggestionKind::Assignee,
            Self::Location => SuggestionKind::Location,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Detection category, serialized as the suggestion `type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SuggestionKind {
    Priority,
    LifeArea,
    Project,
    Date,
    Time,
    Recurrence,
    Duration,
    Budget,
    Tags,
    Icon,
    Assignee,
    Location,
    Status,
    Template,
}

impl SuggestionKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Priority => "priority",
            Self::LifeArea => "lifeArea",
            Self::Project => "project",
            Self::Date => "date",
            Self::Time => "time",
            Self::Recurrence => "recurrence",
            Self::Duration => "duration",
            Self::Budget => "budget",
            Self::Tags => "tags",
            Self::Icon => "icon",
            Self::Assignee => "assignee",
            Self::Location => "location",
            Self::Status => "status",
            Self::Template => "template",
        }
    }
}

/// Where a suggestion came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    Rule,
    Template,
    External,
}

/// Priority levels, ordered from lowest to highest.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl Priority {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Critical => "Critical",
        }
    }

    /// Lenient parse accepting the synonyms external services tend to use.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" | "minor" | "lowest" => Some(Self::Low),
            "medium" | "normal" | "moderate" => Some(Self::Medium),
            "high" | "important" => Some(Self::High),
            "critical" | "urgent" | "asap" | "highest" | "emergency" => Some(Self::Critical),
            _ => None,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A field value; its shape depends on the field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Number(f64),
    Priority(Priority),
    Date(NaiveDate),
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    #[must_use]
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    #[must_use]
    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    /// Blank text and empty lists count as "not set" on a form.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(s) => s.trim().is_empty(),
            Self::List(items) => items.is_empty(),
            _ => false,
        }
    }

    #[must_use]
    pub fn as_priority(&self) -> Option<Priority> {
        match self {
            Self::Priority(p) => Some(*p),
            Self::Text(s) => Priority::parse(s),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{}", if *b { "yes" } else { "no" }),
            Self::Number(n) => write!(f, "{n}"),
            Self::Priority(p) => write!(f, "{p}"),
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Self::Text(s) => f.write_str(s),
            Self::List(items) => f.write_str(&items.join(", ")),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<Priority> for FieldValue {
    fn from(p: Priority) -> Self {
        Self::Priority(p)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(d: NaiveDate) -> Self {
        Self::Date(d)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// Form state: the current value of each canonical field.
pub type FieldMap = BTreeMap<Field, FieldValue>;

/// Un-normalized output of one source, keyed by the raw field name it used.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    pub kind: SuggestionKind,
    pub field: String,
    pub value: FieldValue,
    pub confidence: f64,
    pub reason: String,
    pub label: String,
    pub icon: String,
    pub origin: Origin,
}

/// A proposed field/value pair with confidence and explanatory metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    #[serde(rename = "type")]
    pub kind: SuggestionKind,
    pub field: Field,
    pub value: FieldValue,
    pub confidence: f64,
    pub reason: String,
    pub label: String,
    pub description: String,
    pub icon: String,
    pub origin: Origin,
}

/// Which path produced an analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisSource {
    External,
    Rules,
    #[default]
    Empty,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedTemplate {
    pub name: String,
    pub icon: String,
    pub score: f64,
}

/// Per-call analysis output. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub suggestions: Vec<Suggestion>,
    pub applied_template: Option<String>,
    pub recommended_template: Option<RecommendedTemplate>,
    pub source: AnalysisSource,
}

impl AnalysisResult {
    #[must_use]
    pub fn get(&self, field: Field) -> Option<&Suggestion> {
        self.suggestions.iter().find(|s| s.field == field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_ordering_is_low_to_critical() {
        assert!(Priority::Low < Priority::Medium);
        assert!(Priority::Medium < Priority::High);
        assert!(Priority::High < Priority::Critical);
    }

    #[test]
    fn priority_parse_accepts_synonyms() {
        assert_eq!(Priority::parse("URGENT"), Some(Priority::Critical));
        assert_eq!(Priority::parse(" normal "), Some(Priority::Medium));
        assert_eq!(Priority::parse("whatever"), None);
    }

    #[test]
    fn entity_schema_separates_area_and_category() {
        assert!(EntityKind::Task.allows(Field::LifeArea));
        assert!(!EntityKind::Task.allows(Field::Category));
        assert!(EntityKind::Project.allows(Field::Category));
        assert!(!EntityKind::Project.allows(Field::ReminderTime));
        assert!(EntityKind::Project.allows(Field::Budget));
    }

    #[test]
    fn empty_values() {
        assert!(FieldValue::text("  ").is_empty());
        assert!(FieldValue::List(vec![]).is_empty());
        assert!(!FieldValue::Number(0.0).is_empty());
        assert!(!FieldValue::Bool(false).is_empty());
    }

    #[test]
    fn display_formats_numbers_without_trailing_zero() {
        assert_eq!(FieldValue::Number(50_000.0).to_string(), "50000");
        assert_eq!(FieldValue::Number(0.5).to_string(), "0.5");
        assert_eq!(FieldValue::list(["a", "b"]).to_string(), "a, b");
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn field_value_untagged_roundtrip() {
        let map: FieldMap = serde_json::from_str(
            r#"{"priority":"High","dueDate":"2026-10-18","tags":["a"],"budget":12.5,"status":"Open"}"#,
        )
        .expect("valid JSON should deserialize");

        assert_eq!(map.get(&Field::Priority), Some(&FieldValue::Priority(Priority::High)));
        assert_eq!(
            map.get(&Field::DueDate),
            Some(&FieldValue::Date(
                NaiveDate::from_ymd_opt(2026, 10, 18).expect("valid date")
            ))
        );
        assert_eq!(map.get(&Field::Status), Some(&FieldValue::text("Open")));
        assert_eq!(map.get(&Field::Budget), Some(&FieldValue::Number(12.5)));
    }
}
