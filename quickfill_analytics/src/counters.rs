//! Running usage counters.

use chrono::{DateTime, Utc};
use quickfill_core::{EntityKind, Field, FieldMap, FieldValue, Suggestion};
use serde::{Deserialize, Serialize};

use crate::flags::pattern_flags;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyEntry {
    pub value: String,
    pub count: u64,
}

/// Count-sorted list of the most frequent values.
///
/// Sorted by count descending; among equal counts the most recently bumped
/// value comes first. Only the top [`FrequencyList::CAPACITY`] entries are
/// kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrequencyList {
    entries: Vec<FrequencyEntry>,
}

impl FrequencyList {
    pub const CAPACITY: usize = 10;

    pub fn bump(&mut self, value: &str) {
        let entry = match self.entries.iter().position(|e| e.value == value) {
            Some(i) => {
                let mut entry = self.entries.remove(i);
                entry.count += 1;
                entry
            }
            None => FrequencyEntry {
                value: value.to_string(),
                count: 1,
            },
        };

        let at = self
            .entries
            .iter()
            .position(|e| e.count <= entry.count)
            .unwrap_or(self.entries.len());
        self.entries.insert(at, entry);
        self.entries.truncate(Self::CAPACITY);
    }

    #[must_use]
    pub fn entries(&self) -> &[FrequencyEntry] {
        &self.entries
    }

    #[must_use]
    pub fn top(&self, n: usize) -> Vec<FrequencyEntry> {
        self.entries.iter().take(n).cloned().collect()
    }

    #[must_use]
    pub fn first(&self) -> Option<&FrequencyEntry> {
        self.entries.first()
    }

    #[must_use]
    pub fn count(&self, value: &str) -> u64 {
        self.entries
            .iter()
            .find(|e| e.value == value)
            .map_or(0, |e| e.count)
    }

    /// Sum of the retained counts.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|e| e.count).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Everything the recorder knows about past usage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UsageCounters {
    pub total_analyses: u64,
    pub successful_analyses: u64,
    /// `successful_analyses / total_analyses`, in `[0, 1]`.
    pub accuracy: f64,
    /// Coarse pattern flags seen in analysed input.
    pub patterns: FrequencyList,
    /// Suggestion categories produced by analyses.
    pub suggestion_types: FrequencyList,
    pub templates: FrequencyList,
    pub template_uses: u64,
    pub entity_types: FrequencyList,
    pub tasks_created: u64,
    pub projects_created: u64,
    pub categories: FrequencyList,
    pub life_areas: FrequencyList,
    pub tags: FrequencyList,
    pub durations: FrequencyList,
    pub budgets: FrequencyList,
    pub duration_sum: f64,
    pub duration_count: u64,
    pub budget_sum: f64,
    pub budget_count: u64,
    pub last_updated: Option<DateTime<Utc>>,
}

impl UsageCounters {
    #[expect(clippy::cast_precision_loss, reason = "Counts stay far below 2^52")]
    pub fn record_analysis(&mut self, input: &str, suggestions: &[Suggestion], success: bool) {
        self.total_analyses += 1;
        if success {
            self.successful_analyses += 1;
        }
        self.accuracy = self.successful_analyses as f64 / self.total_analyses as f64;

        for flag in pattern_flags(input) {
            self.patterns.bump(flag);
        }
        for suggestion in suggestions {
            self.suggestion_types.bump(suggestion.kind.as_str());
        }
    }

    pub fn record_template(&mut self, name: &str) {
        self.templates.bump(name);
        self.template_uses += 1;
    }

    pub fn record_creation(&mut self, kind: EntityKind, fields: &FieldMap) {
        self.entity_types.bump(kind.as_str());
        match kind {
            EntityKind::Task => self.tasks_created += 1,
            EntityKind::Project => self.projects_created += 1,
        }

        for (field, value) in fields {
            match (field, value) {
                (Field::Category, FieldValue::Text(category)) => self.categories.bump(category),
                (Field::LifeArea, FieldValue::Text(area)) => self.life_areas.bump(area),
                (Field::Tags, FieldValue::List(tags)) => {
                    for tag in tags {
                        self.tags.bump(&tag.to_lowercase());
                    }
                }
                (Field::EstimatedHours, FieldValue::Number(hours)) if *hours >= 0.0 => {
                    self.durations.bump(duration_bucket(*hours));
                    self.duration_sum += hours;
                    self.duration_count += 1;
                }
                (Field::Budget, FieldValue::Number(amount)) if *amount >= 0.0 => {
                    self.budgets.bump(budget_bucket(*amount));
                    self.budget_sum += amount;
                    self.budget_count += 1;
                }
                _ => {}
            }
        }
    }

    #[must_use]
    pub const fn total_created(&self) -> u64 {
        self.tasks_created + self.projects_created
    }

    #[must_use]
    #[expect(clippy::cast_precision_loss, reason = "Counts stay far below 2^52")]
    pub fn average_duration(&self) -> Option<f64> {
        (self.duration_count > 0).then(|| self.duration_sum / self.duration_count as f64)
    }

    #[must_use]
    #[expect(clippy::cast_precision_loss, reason = "Counts stay far below 2^52")]
    pub fn average_budget(&self) -> Option<f64> {
        (self.budget_count > 0).then(|| self.budget_sum / self.budget_count as f64)
    }
}

/// Bucket label for an estimate in hours.
#[must_use]
pub fn duration_bucket(hours: f64) -> &'static str {
    if hours <= 0.5 {
        "under 30 minutes"
    } else if hours <= 1.0 {
        "up to an hour"
    } else if hours <= 4.0 {
        "half day"
    } else if hours <= 8.0 {
        "full day"
    } else {
        "multi-day"
    }
}

/// Bucket label for a budget amount.
#[must_use]
pub fn budget_bucket(amount: f64) -> &'static str {
    if amount < 100.0 {
        "under $100"
    } else if amount < 1_000.0 {
        "$100-$1k"
    } else if amount < 10_000.0 {
        "$1k-$10k"
    } else if amount < 100_000.0 {
        "$10k-$100k"
    } else {
        "$100k+"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickfill_core::Priority;

    fn values(list: &FrequencyList) -> Vec<(&str, u64)> {
        list.entries()
            .iter()
            .map(|e| (e.value.as_str(), e.count))
            .collect()
    }

    #[test]
    fn bump_orders_by_count_then_recency() {
        let mut list = FrequencyList::default();
        list.bump("a");
        list.bump("b");
        list.bump("a");
        list.bump("c");
        assert_eq!(values(&list), vec![("a", 2), ("c", 1), ("b", 1)]);

        list.bump("b");
        assert_eq!(values(&list), vec![("b", 2), ("a", 2), ("c", 1)]);
    }

    #[test]
    fn list_is_capped() {
        let mut list = FrequencyList::default();
        for i in 0..15 {
            list.bump(&format!("v{i}"));
        }
        assert_eq!(list.len(), FrequencyList::CAPACITY);
        assert_eq!(list.first().map(|e| e.value.as_str()), Some("v14"));
        assert_eq!(list.count("v0"), 0);
    }

    #[test]
    fn creation_tracks_fields() {
        let mut counters = UsageCounters::default();
        let mut fields = FieldMap::new();
        fields.insert(Field::Category, FieldValue::text("Work"));
        fields.insert(Field::Budget, FieldValue::Number(50_000.0));
        fields.insert(Field::Tags, FieldValue::list(["Launch", "q3"]));
        fields.insert(Field::Priority, FieldValue::Priority(Priority::High));
        counters.record_creation(EntityKind::Project, &fields);

        let mut task = FieldMap::new();
        task.insert(Field::EstimatedHours, FieldValue::Number(1.5));
        counters.record_creation(EntityKind::Task, &task);

        assert_eq!(counters.projects_created, 1);
        assert_eq!(counters.total_created(), 2);
        assert_eq!(counters.categories.count("Work"), 1);
        assert_eq!(counters.tags.count("launch"), 1);
        assert_eq!(counters.budgets.count("$10k-$100k"), 1);
        assert_eq!(counters.durations.count("half day"), 1);
        assert_eq!(counters.average_budget(), Some(50_000.0));
        assert_eq!(counters.average_duration(), Some(1.5));
    }

    #[test]
    fn accuracy_is_a_ratio() {
        let mut counters = UsageCounters::default();
        counters.record_analysis("call mom tomorrow", &[], true);
        counters.record_analysis("hmm", &[], false);

        assert_eq!(counters.total_analyses, 2);
        assert!((counters.accuracy - 0.5).abs() < f64::EPSILON);
        assert_eq!(counters.patterns.count("date_mentioned"), 1);
    }
}
