use chrono::{Local, NaiveDate};
use once_cell::sync::Lazy;
use quickfill_core::{Candidate, EntityKind, FieldValue, Origin, SuggestionKind, canonical_field};
use tracing::debug;

use crate::extraction::directory::Directory;
use crate::extraction::rules::{PatternRule, RuleContext, RuleSet, RuleTable};
use crate::extraction::tables::default_rule_defs;

/// Upper bound on the merged tag list.
const MAX_TAGS: usize = 8;

static DEFAULT_RULES: Lazy<RuleSet> = Lazy::new(|| RuleSet::compile(&default_rule_defs()));

/// Deterministic, offline field detection over the built-in rule tables.
#[derive(Debug, Clone)]
pub struct PatternExtractor {
    rules: RuleSet,
    directory: Directory,
}

impl Default for PatternExtractor {
    fn default() -> Self {
        Self::new(Directory::default())
    }
}

impl PatternExtractor {
    #[must_use]
    pub fn new(directory: Directory) -> Self {
        Self::with_rules(DEFAULT_RULES.clone(), directory)
    }

    /// Use a custom rule set instead of the built-in tables.
    #[must_use]
    pub const fn with_rules(rules: RuleSet, directory: Directory) -> Self {
        Self { rules, directory }
    }

    #[must_use]
    pub const fn directory(&self) -> &Directory {
        &self.directory
    }

    /// Extract candidates, resolving relative dates against the local date.
    #[must_use]
    pub fn extract(&self, text: &str, kind: EntityKind) -> Vec<Candidate> {
        self.extract_at(text, kind, Local::now().date_naive())
    }

    /// Extract candidates with relative dates resolved against `today`.
    ///
    /// Single-valued categories contribute at most one candidate, from the
    /// first rule in table order that yields a value. Tags are merged into
    /// one candidate. Rules setting a field outside `kind`'s schema are
    /// skipped.
    #[must_use]
    pub fn extract_at(&self, text: &str, kind: EntityKind, today: NaiveDate) -> Vec<Candidate> {
        let text = text.trim().to_lowercase();
        if text.is_empty() {
            return Vec::new();
        }

        let ctx = RuleContext {
            today,
            directory: &self.directory,
        };
        let applies = |rule: &&PatternRule| {
            canonical_field(rule.field, kind).is_some_and(|field| kind.allows(field))
        };

        let candidates: Vec<Candidate> = self
            .rules
            .tables()
            .iter()
            .filter_map(|table| {
                if table.category == SuggestionKind::Tags {
                    merged_tags(table, &text, &ctx)
                } else {
                    table.rules.iter().filter(applies).find_map(|rule| {
                        rule.first_hit(&text, &ctx).map(|hit| rule.candidate(hit))
                    })
                }
            })
            .collect();

        debug!("Pattern extraction produced {} candidates", candidates.len());
        candidates
    }
}

fn merged_tags(table: &RuleTable, text: &str, ctx: &RuleContext<'_>) -> Option<Candidate> {
    let mut tags: Vec<String> = Vec::new();
    let mut matched: Vec<String> = Vec::new();
    let mut confidence = 0.0_f64;

    for rule in &table.rules {
        for hit in rule.all_hits(text, ctx) {
            let FieldValue::List(values) = hit.value else {
                continue;
            };
            let mut contributed = false;
            for tag in values {
                if tags.len() < MAX_TAGS && !tags.contains(&tag) {
                    tags.push(tag);
                    contributed = true;
                }
            }
            if contributed {
                confidence = confidence.max(rule.confidence);
                matched.push(format!("\"{}\"", hit.matched));
            }
        }
    }

    if tags.is_empty() {
        return None;
    }

    Some(Candidate {
        kind: SuggestionKind::Tags,
        field: "tags".to_string(),
        value: FieldValue::List(tags),
        confidence,
        reason: format!("Matched {}", matched.join(", ")),
        label: "Tags".to_string(),
        icon: "🏷️".to_string(),
        origin: Origin::Rule,
    })
}
