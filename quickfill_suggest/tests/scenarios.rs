//! End-to-end behaviour of the suggestion engine.
//!
//! These tests verify that:
//! - Rule extraction covers the common quick-add phrasings
//! - External failures fall back to the offline result
//! - Templates are matched and applied without clobbering user input

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use quickfill_core::{
    AnalysisSource, ChatMessage, EntityKind, Field, FieldMap, FieldValue, LLMProvider,
    LLMResponse, Origin, Priority,
};
use quickfill_suggest::{
    ExternalAugmenter, PatternExtractor, SharedProvider, SuggestionEngine, TemplateMatcher,
};
use tokio_util::sync::CancellationToken;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 17).expect("valid date")
}

/// Replies with fixed content and counts calls.
struct MockProvider {
    reply: anyhow::Result<String>,
    delay: Duration,
    calls: AtomicUsize,
}

impl MockProvider {
    fn replying(content: &str) -> Self {
        Self {
            reply: Ok(content.to_string()),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    fn failing() -> Self {
        Self {
            reply: Err(anyhow::anyhow!("HTTP 503")),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    fn stalled() -> Self {
        Self {
            reply: Ok("{}".to_string()),
            delay: Duration::from_secs(30),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl LLMProvider for MockProvider {
    async fn chat(&self, _: &[ChatMessage], _: &str) -> anyhow::Result<LLMResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        match &self.reply {
            Ok(content) => Ok(LLMResponse {
                content: content.clone(),
                usage: None,
            }),
            Err(e) => Err(anyhow::anyhow!("{e}")),
        }
    }

    fn get_default_model(&self) -> &str {
        "mock"
    }
}

fn engine_with(provider: Arc<MockProvider>) -> SuggestionEngine {
    let shared: SharedProvider = provider;
    SuggestionEngine::default()
        .with_augmenter(ExternalAugmenter::new(shared).with_timeout(Duration::from_millis(100)))
}

#[test]
fn test_scenario_a_quick_call() {
    let engine = SuggestionEngine::default();
    let result = engine.analyze_offline_at(
        "Urgent call with Mike tomorrow at 2pm for 30 minutes",
        EntityKind::Task,
        today(),
    );

    assert_eq!(result.source, AnalysisSource::Rules);

    let priority = result.get(Field::Priority).expect("priority suggested");
    assert_eq!(priority.value, FieldValue::Priority(Priority::Critical));
    assert!(priority.confidence >= 0.9);

    let tags = result.get(Field::Tags).expect("tags suggested");
    assert!(
        tags.value
            .as_list()
            .is_some_and(|t| t.contains(&"call".to_string()))
    );

    assert_eq!(
        result.get(Field::ReminderTime).map(|s| &s.value),
        Some(&FieldValue::text("14:00"))
    );
    assert_eq!(
        result.get(Field::DueDate).map(|s| &s.value),
        NaiveDate::from_ymd_opt(2026, 10, 18)
            .map(FieldValue::Date)
            .as_ref()
    );
    assert_eq!(
        result.get(Field::EstimatedHours).map(|s| &s.value),
        Some(&FieldValue::Number(0.5))
    );
    assert_eq!(
        result.get(Field::Assignee).map(|s| &s.value),
        Some(&FieldValue::text("Mike Chen"))
    );
    assert_eq!(result.get(Field::Icon).map(|s| &s.value), Some(&FieldValue::text("📞")));
}

#[tokio::test]
async fn test_scenario_b_blank_input() {
    let provider = Arc::new(MockProvider::replying(r#"{"priority":"High"}"#));
    let engine = engine_with(Arc::clone(&provider));

    for text in ["", "   ", "\n\t"] {
        assert!(
            PatternExtractor::default()
                .extract_at(text, EntityKind::Task, today())
                .is_empty()
        );
        assert!(TemplateMatcher::default().suggested_templates(text).is_empty());

        let result = engine
            .analyze_detailed(text, EntityKind::Task, &CancellationToken::new())
            .await;
        assert!(result.suggestions.is_empty());
        assert_eq!(result.source, AnalysisSource::Empty);
        assert!(result.recommended_template.is_none());
    }

    assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_scenario_c_timeout_falls_back() {
    let text = "Pay the electricity bill by friday, budget $120";
    let provider = Arc::new(MockProvider::stalled());
    let engine = engine_with(Arc::clone(&provider));

    let result = engine
        .analyze_detailed_at(text, EntityKind::Task, today(), &CancellationToken::new())
        .await;

    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    assert_eq!(result, engine.analyze_offline_at(text, EntityKind::Task, today()));
    assert_eq!(result.source, AnalysisSource::Rules);
}

#[test]
fn test_scenario_d_meeting_template() {
    let engine = SuggestionEngine::default();
    let matches = engine.suggested_templates("team standup meeting");
    assert_eq!(matches[0].template.name, "Meeting");

    let empty = engine
        .apply_template("Meeting", &FieldMap::new())
        .expect("Meeting template exists");
    assert_eq!(empty.get(&Field::Status), Some(&FieldValue::text("Not Started")));
    assert_eq!(
        empty.get(&Field::Priority),
        Some(&FieldValue::Priority(Priority::Medium))
    );

    let mut current = FieldMap::new();
    current.insert(Field::Priority, FieldValue::Priority(Priority::High));
    let applied = engine
        .apply_template("Meeting", &current)
        .expect("Meeting template exists");
    assert_eq!(
        applied.get(&Field::Priority),
        Some(&FieldValue::Priority(Priority::High))
    );

    let result = engine.analyze_offline_at("team standup meeting", EntityKind::Task, today());
    assert_eq!(result.applied_template.as_deref(), Some("Meeting"));
    assert_eq!(
        result.recommended_template.map(|r| r.name),
        Some("Meeting".to_string())
    );
}

#[test]
fn test_scenario_e_budget_shorthand() {
    let engine = SuggestionEngine::default();
    let result = engine.analyze_offline_at("$50k", EntityKind::Project, today());

    let budget = result.get(Field::Budget).expect("budget suggested");
    assert_eq!(budget.value, FieldValue::Number(50_000.0));
    assert!(budget.confidence >= 0.9);
}

#[tokio::test]
async fn test_external_result_is_normalized() {
    let provider = Arc::new(MockProvider::replying(
        "```json\n{\"priorityLevel\": \"high\", \"time\": \"3:30 pm\", \"tags\": \"Work, #call\", \"area\": \"work\", \"mood\": \"happy\"}\n```",
    ));
    let engine = engine_with(provider);

    let result = engine
        .analyze_detailed_at("prep slides", EntityKind::Task, today(), &CancellationToken::new())
        .await;

    assert_eq!(result.source, AnalysisSource::External);
    assert!(result.suggestions.iter().all(|s| s.origin == Origin::External));
    assert_eq!(result.suggestions.len(), 4);
    assert_eq!(
        result.get(Field::Priority).map(|s| &s.value),
        Some(&FieldValue::Priority(Priority::High))
    );
    assert_eq!(
        result.get(Field::ReminderTime).map(|s| &s.value),
        Some(&FieldValue::text("15:30"))
    );
    assert_eq!(
        result.get(Field::Tags).map(|s| &s.value),
        Some(&FieldValue::list(["work", "call"]))
    );
    assert_eq!(
        result.get(Field::LifeArea).map(|s| &s.value),
        Some(&FieldValue::text("Work"))
    );
}

#[tokio::test]
async fn test_unusable_external_results_fall_back() {
    let text = "urgent: fix login bug asap";
    let offline = SuggestionEngine::default().analyze_offline_at(text, EntityKind::Task, today());

    for provider in [
        MockProvider::failing(),
        MockProvider::replying("I could not find anything."),
        MockProvider::replying("[1, 2, 3]"),
        MockProvider::replying(r#"{"mood": "tired", "priority": null}"#),
    ] {
        let engine = engine_with(Arc::new(provider));
        let result = engine
            .analyze_detailed_at(text, EntityKind::Task, today(), &CancellationToken::new())
            .await;
        assert_eq!(result, offline);
    }
}

#[tokio::test]
async fn test_cancellation_falls_back() {
    let text = "dentist appointment next tuesday at 9:15am";
    let engine = engine_with(Arc::new(MockProvider::stalled()));
    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = engine
        .analyze_detailed_at(text, EntityKind::Task, today(), &cancel)
        .await;
    assert_eq!(result, engine.analyze_offline_at(text, EntityKind::Task, today()));
}

#[test]
fn test_confidences_are_bounded_and_fields_unique() {
    let engine = SuggestionEngine::default();
    let corpus = [
        "Urgent call with Mike tomorrow at 2pm for 30 minutes",
        "not urgent: read a book someday #reading",
        "weekly review every friday at 17:00 for an hour",
        "plan the product launch party for the apollo project, budget of 2 million",
        "gym at 6am daily with @sarah",
        "renovate the kitchen, contractor quote $12,500 due 11/30",
        "team standup meeting",
        "email the report to john by end of the month",
    ];

    for text in corpus {
        for kind in [EntityKind::Task, EntityKind::Project] {
            let result = engine.analyze_offline_at(text, kind, today());
            let mut seen = Vec::new();
            for s in &result.suggestions {
                assert!((0.0..=1.0).contains(&s.confidence), "{text}: {s:?}");
                assert!(kind.allows(s.field), "{text}: {:?} not in {kind}", s.field);
                assert!(!seen.contains(&s.field), "{text}: duplicate {:?}", s.field);
                seen.push(s.field);
            }
        }
    }
}

#[test]
fn test_project_kind_maps_area_to_category() {
    let engine = SuggestionEngine::default();
    let result = engine.analyze_offline_at(
        "kitchen renovation for about $40k",
        EntityKind::Project,
        today(),
    );

    assert_eq!(
        result.get(Field::Category).map(|s| &s.value),
        Some(&FieldValue::text("Home"))
    );
    assert!(result.get(Field::LifeArea).is_none());
    assert_eq!(
        result.get(Field::Budget).map(|s| &s.value),
        Some(&FieldValue::Number(40_000.0))
    );
}

#[test]
fn test_rule_suggestions_beat_template_defaults() {
    let engine = SuggestionEngine::default();
    let result = engine.analyze_offline_at(
        "urgent team standup meeting",
        EntityKind::Task,
        today(),
    );

    let priority = result.get(Field::Priority).expect("priority suggested");
    assert_eq!(priority.value, FieldValue::Priority(Priority::Critical));
    assert_eq!(priority.origin, Origin::Rule);
    assert_eq!(result.applied_template.as_deref(), Some("Meeting"));
}

#[test]
fn test_urgency_outranks_vague_low_words() {
    let engine = SuggestionEngine::default();
    let result = engine.analyze_offline_at(
        "server emergency, call me asap whenever you see this",
        EntityKind::Task,
        today(),
    );

    let priority = result.get(Field::Priority).expect("priority suggested");
    assert_eq!(priority.value, FieldValue::Priority(Priority::Critical));
    assert!(priority.confidence >= 0.9);
}
