//! Recommendations and summaries derived from [`UsageCounters`].

use serde::{Deserialize, Serialize};

use crate::counters::{FrequencyEntry, FrequencyList, UsageCounters};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationKind {
    Info,
    Improvement,
    Success,
    Suggestion,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub kind: RecommendationKind,
    pub title: String,
    pub message: String,
}

impl Recommendation {
    fn new(kind: RecommendationKind, title: &str, message: String) -> Self {
        Self {
            kind,
            title: title.to_string(),
            message,
        }
    }
}

/// Share above which one category counts as dominant.
const DOMINANT_SHARE: f64 = 0.6;

/// Deterministic advice based on the counters.
#[must_use]
pub fn recommendations(counters: &UsageCounters) -> Vec<Recommendation> {
    use RecommendationKind as K;

    if counters.total_analyses == 0 && counters.total_created() == 0 {
        return vec![Recommendation::new(
            K::Info,
            "Getting started",
            "No usage data yet. Describe a task in plain words and quickfill will suggest its fields."
                .to_string(),
        )];
    }

    let mut out = Vec::new();

    if counters.total_analyses >= 5 && counters.accuracy < 0.7 {
        out.push(Recommendation::new(
            K::Improvement,
            "Be more specific",
            format!(
                "Only {:.0}% of descriptions produced suggestions. Mention dates, times, \
                 priorities or people explicitly.",
                counters.accuracy * 100.0
            ),
        ));
    }

    if counters.total_analyses >= 10 && counters.accuracy >= 0.9 {
        out.push(Recommendation::new(
            K::Success,
            "Keep going",
            format!(
                "{:.0}% of your descriptions are understood. Your quick-add phrasing works well.",
                counters.accuracy * 100.0
            ),
        ));
    }

    for (list, noun) in [
        (&counters.categories, "category"),
        (&counters.life_areas, "life area"),
    ] {
        if let Some(top) = dominant(list) {
            out.push(Recommendation::new(
                K::Suggestion,
                "Diversify",
                format!(
                    "Most of what you create is in the '{}' {noun}. Consider balancing other areas.",
                    top.value
                ),
            ));
        }
    }

    if counters.total_analyses >= 10 && counters.template_uses == 0 {
        out.push(Recommendation::new(
            K::Suggestion,
            "Try templates",
            "Templates fill several fields at once. Run `quickfill templates <text>` to see matches."
                .to_string(),
        ));
    }

    if let Some(top) = counters.templates.first().filter(|t| t.count >= 5) {
        out.push(Recommendation::new(
            K::Suggestion,
            "Make it a default",
            format!(
                "You used the '{}' template {} times. Consider making it your default.",
                top.value, top.count
            ),
        ));
    }

    if counters.projects_created > 0
        && counters.budget_count == 0
        && counters.patterns.count("budget_mentioned") == 0
    {
        out.push(Recommendation::new(
            K::Suggestion,
            "Add budgets",
            "None of your projects has a budget yet. Mention an amount like \"$5k\" to track it."
                .to_string(),
        ));
    }

    out
}

#[expect(clippy::cast_precision_loss, reason = "Counts stay far below 2^52")]
fn dominant(list: &FrequencyList) -> Option<&FrequencyEntry> {
    let total = list.total();
    let top = list.first()?;
    (total >= 5 && top.count as f64 / total as f64 > DOMINANT_SHARE).then_some(top)
}

/// Snapshot summary for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductivityInsights {
    pub total_analyses: u64,
    pub successful_analyses: u64,
    /// Percentage, `0..=100`.
    pub accuracy: f64,
    pub tasks_created: u64,
    pub projects_created: u64,
    pub top_patterns: Vec<FrequencyEntry>,
    pub top_templates: Vec<FrequencyEntry>,
    pub top_tags: Vec<FrequencyEntry>,
    pub favourite_category: Option<String>,
    pub favourite_life_area: Option<String>,
    pub average_duration: Option<f64>,
    pub average_budget: Option<f64>,
    pub recommendations: Vec<Recommendation>,
}

impl ProductivityInsights {
    const TOP: usize = 5;

    #[must_use]
    pub fn from_counters(counters: &UsageCounters) -> Self {
        Self {
            total_analyses: counters.total_analyses,
            successful_analyses: counters.successful_analyses,
            accuracy: (counters.accuracy * 1000.0).round() / 10.0,
            tasks_created: counters.tasks_created,
            projects_created: counters.projects_created,
            top_patterns: counters.patterns.top(Self::TOP),
            top_templates: counters.templates.top(Self::TOP),
            top_tags: counters.tags.top(Self::TOP),
            favourite_category: counters.categories.first().map(|e| e.value.clone()),
            favourite_life_area: counters.life_areas.first().map(|e| e.value.clone()),
            average_duration: counters.average_duration(),
            average_budget: counters.average_budget(),
            recommendations: recommendations(counters),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickfill_core::{EntityKind, Field, FieldMap, FieldValue};

    fn titles(counters: &UsageCounters) -> Vec<String> {
        recommendations(counters)
            .into_iter()
            .map(|r| r.title)
            .collect()
    }

    #[test]
    fn empty_counters_get_a_single_hint() {
        let recs = recommendations(&UsageCounters::default());
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].kind, RecommendationKind::Info);
    }

    #[test]
    fn low_accuracy_and_no_templates() {
        let mut counters = UsageCounters::default();
        for i in 0..10 {
            counters.record_analysis("something", &[], i < 3);
        }
        let titles = titles(&counters);
        assert!(titles.contains(&"Be more specific".to_string()));
        assert!(titles.contains(&"Try templates".to_string()));
        assert!(!titles.contains(&"Keep going".to_string()));
    }

    #[test]
    fn high_accuracy_and_favourite_template() {
        let mut counters = UsageCounters::default();
        for _ in 0..10 {
            counters.record_analysis("call tomorrow", &[], true);
        }
        for _ in 0..5 {
            counters.record_template("Meeting");
        }
        let titles = titles(&counters);
        assert!(titles.contains(&"Keep going".to_string()));
        assert!(titles.contains(&"Make it a default".to_string()));
        assert!(!titles.contains(&"Try templates".to_string()));
    }

    #[test]
    fn dominant_area_and_missing_budgets() {
        let mut counters = UsageCounters::default();
        let mut fields = FieldMap::new();
        fields.insert(Field::Category, FieldValue::text("Work"));
        for _ in 0..5 {
            counters.record_creation(EntityKind::Project, &fields);
        }

        let titles = titles(&counters);
        assert!(titles.contains(&"Diversify".to_string()));
        assert!(titles.contains(&"Add budgets".to_string()));
    }

    #[test]
    fn insights_summarise_counters() {
        let mut counters = UsageCounters::default();
        counters.record_analysis("urgent call at 2pm", &[], true);
        counters.record_analysis("nothing here", &[], false);
        counters.record_analysis("gym tomorrow", &[], true);

        let insights = ProductivityInsights::from_counters(&counters);
        assert_eq!(insights.total_analyses, 3);
        assert!((insights.accuracy - 66.7).abs() < 1e-9);
        assert!(insights.top_patterns.len() <= 5);
        assert_eq!(insights.favourite_category, None);
    }
}
