//! Declarative rule definitions and their compiled form.
//!
//! A [`RuleDef`] is plain data: which category it belongs to, what it matches,
//! which field it sets and how the value is obtained. Compiling turns the
//! matcher into a [`Regex`] once so evaluation is a plain table walk.

use chrono::NaiveDate;
use quickfill_core::{Candidate, FieldValue, Origin, SuggestionKind};
use regex::{Captures, Regex};
use std::fmt;
use thiserror::Error;
use tracing::warn;

use crate::extraction::directory::Directory;

/// Inputs a value derivation may look at besides the captures.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub today: NaiveDate,
    pub directory: &'a Directory,
}

/// Derive a value from a match. Returning `None` rejects the match and lets
/// evaluation continue with the next occurrence or the next rule.
pub type Deriver = fn(&Captures<'_>, &RuleContext<'_>) -> Option<FieldValue>;

/// What a rule looks for.
#[derive(Debug, Clone)]
pub enum MatcherDef {
    /// Whole-word, case-insensitive keyword alternatives.
    Keywords(&'static [&'static str]),
    /// A raw regular expression, evaluated against lower-cased text.
    Pattern(&'static str),
}

/// How a rule produces its value.
#[derive(Clone)]
pub enum ValueSpec {
    Fixed(FieldValue),
    Derived(Deriver),
}

impl fmt::Debug for ValueSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(v) => f.debug_tuple("Fixed").field(v).finish(),
            Self::Derived(_) => f.write_str("Derived(..)"),
        }
    }
}

/// Error raised while compiling a rule definition.
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("rule '{label}' has an invalid pattern: {source}")]
    Regex {
        label: &'static str,
        #[source]
        source: regex::Error,
    },

    #[error("rule '{0}' has no keywords")]
    NoKeywords(&'static str),

    #[error("rule '{label}' has confidence {confidence} outside [0, 1]")]
    Confidence { label: &'static str, confidence: f64 },
}

/// Definition of a single detection rule.
#[derive(Debug, Clone)]
pub struct RuleDef {
    pub category: SuggestionKind,
    pub matcher: MatcherDef,
    /// Raw field name; resolved through the alias table during normalization.
    pub field: &'static str,
    pub value: ValueSpec,
    pub confidence: f64,
    pub icon: &'static str,
    pub label: &'static str,
}

impl RuleDef {
    #[must_use]
    pub const fn keywords(category: SuggestionKind, keywords: &'static [&'static str]) -> Self {
        Self::new(category, MatcherDef::Keywords(keywords))
    }

    #[must_use]
    pub const fn pattern(category: SuggestionKind, pattern: &'static str) -> Self {
        Self::new(category, MatcherDef::Pattern(pattern))
    }

    const fn new(category: SuggestionKind, matcher: MatcherDef) -> Self {
        Self {
            category,
            matcher,
            field: "",
            value: ValueSpec::Fixed(FieldValue::Bool(true)),
            confidence: 0.5,
            icon: "",
            label: "",
        }
    }

    /// Set `field` to a fixed value on match.
    #[must_use]
    pub fn fixed(mut self, field: &'static str, value: impl Into<FieldValue>, confidence: f64) -> Self {
        self.field = field;
        self.value = ValueSpec::Fixed(value.into());
        self.confidence = confidence;
        self
    }

    /// Set `field` to a value computed from the match.
    #[must_use]
    pub fn derived(mut self, field: &'static str, deriver: Deriver, confidence: f64) -> Self {
        self.field = field;
        self.value = ValueSpec::Derived(deriver);
        self.confidence = confidence;
        self
    }

    #[must_use]
    pub const fn labelled(mut self, label: &'static str, icon: &'static str) -> Self {
        self.label = label;
        self.icon = icon;
        self
    }

    /// Compile the matcher.
    ///
    /// # Errors
    /// Returns an error if the regex is invalid, the keyword list is empty or
    /// the confidence is outside `[0, 1]`.
    pub fn compile(&self) -> Result<PatternRule, RuleError> {
        if !(0.0..=1.0).contains(&self.confidence) {
            return Err(RuleError::Confidence {
                label: self.label,
                confidence: self.confidence,
            });
        }

        let source = match &self.matcher {
            MatcherDef::Keywords(words) => {
                if words.is_empty() {
                    return Err(RuleError::NoKeywords(self.label));
                }
                let alternatives: Vec<String> = words.iter().map(|w| regex::escape(w)).collect();
                format!(r"(?i)\b(?:{})\b", alternatives.join("|"))
            }
            MatcherDef::Pattern(pattern) => format!("(?i){pattern}"),
        };

        let regex = Regex::new(&source).map_err(|source| RuleError::Regex {
            label: self.label,
            source,
        })?;

        Ok(PatternRule {
            category: self.category,
            regex,
            field: self.field,
            value: self.value.clone(),
            confidence: self.confidence,
            icon: self.icon,
            label: self.label,
        })
    }
}

/// A value produced by a rule together with the text that triggered it.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleHit {
    pub value: FieldValue,
    pub matched: String,
}

/// A compiled rule.
#[derive(Debug, Clone)]
pub struct PatternRule {
    pub category: SuggestionKind,
    regex: Regex,
    pub field: &'static str,
    value: ValueSpec,
    pub confidence: f64,
    pub icon: &'static str,
    pub label: &'static str,
}

impl PatternRule {
    /// First occurrence in `text` that yields a value.
    #[must_use]
    pub fn first_hit(&self, text: &str, ctx: &RuleContext<'_>) -> Option<RuleHit> {
        self.regex
            .captures_iter(text)
            .find_map(|caps| self.resolve(&caps, ctx))
    }

    /// Every occurrence in `text` that yields a value.
    #[must_use]
    pub fn all_hits(&self, text: &str, ctx: &RuleContext<'_>) -> Vec<RuleHit> {
        self.regex
            .captures_iter(text)
            .filter_map(|caps| self.resolve(&caps, ctx))
            .collect()
    }

    fn resolve(&self, caps: &Captures<'_>, ctx: &RuleContext<'_>) -> Option<RuleHit> {
        let value = match &self.value {
            ValueSpec::Fixed(v) => v.clone(),
            ValueSpec::Derived(derive) => derive(caps, ctx)?,
        };
        let matched = caps.get(0).map_or("", |m| m.as_str()).trim().to_string();
        Some(RuleHit { value, matched })
    }

    /// Turn a hit into a candidate attributed to this rule.
    #[must_use]
    pub fn candidate(&self, hit: RuleHit) -> Candidate {
        Candidate {
            kind: self.category,
            field: self.field.to_string(),
            value: hit.value,
            confidence: self.confidence,
            reason: format!("Matched \"{}\"", hit.matched),
            label: self.label.to_string(),
            icon: self.icon.to_string(),
            origin: Origin::Rule,
        }
    }
}

/// Ordered rules for one detection category.
#[derive(Debug, Clone)]
pub struct RuleTable {
    pub category: SuggestionKind,
    pub rules: Vec<PatternRule>,
}

/// Every category's table, in evaluation order.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    tables: Vec<RuleTable>,
}

impl RuleSet {
    /// Compile definitions into per-category tables.
    ///
    /// Categories keep the order in which they first appear; rules keep their
    /// order within a category. Invalid definitions are skipped with a warning
    /// so one bad rule cannot disable the extractor.
    #[must_use]
    pub fn compile(defs: &[RuleDef]) -> Self {
        let mut tables: Vec<RuleTable> = Vec::new();

        for def in defs {
            let rule = match def.compile() {
                Ok(rule) => rule,
                Err(e) => {
                    warn!("Skipping extraction rule: {e}");
                    continue;
                }
            };

            match tables.iter_mut().find(|t| t.category == rule.category) {
                Some(table) => table.rules.push(rule),
                None => tables.push(RuleTable {
                    category: rule.category,
                    rules: vec![rule],
                }),
            }
        }

        Self { tables }
    }

    #[must_use]
    pub fn tables(&self) -> &[RuleTable] {
        &self.tables
    }

    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.tables.iter().map(|t| t.rules.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn ctx(directory: &Directory) -> RuleContext<'_> {
        RuleContext {
            today: NaiveDate::from_ymd_opt(2026, 10, 17).expect("valid date"),
            directory,
        }
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn keywords_match_whole_words_only() {
        let rule = RuleDef::keywords(SuggestionKind::Tags, &["call"])
            .fixed("tags", FieldValue::list(["call"]), 0.8)
            .compile()
            .expect("keyword rule should compile");
        let directory = Directory::default();

        assert!(rule.first_hit("Call the bank", &ctx(&directory)).is_some());
        assert!(rule.first_hit("recall the bank", &ctx(&directory)).is_none());
    }

    #[test]
    fn invalid_rules_are_rejected() {
        let bad_regex = RuleDef::pattern(SuggestionKind::Budget, r"(\d+").fixed("budget", 1.0, 0.9);
        assert!(matches!(bad_regex.compile(), Err(RuleError::Regex { .. })));

        let no_words = RuleDef::keywords(SuggestionKind::Tags, &[]).fixed("tags", 1.0, 0.9);
        assert!(matches!(no_words.compile(), Err(RuleError::NoKeywords(_))));

        let bad_conf = RuleDef::keywords(SuggestionKind::Tags, &["x"]).fixed("tags", 1.0, 1.5);
        assert!(matches!(bad_conf.compile(), Err(RuleError::Confidence { .. })));
    }

    #[test]
    fn rule_set_skips_invalid_and_groups_by_category() {
        let defs = vec![
            RuleDef::keywords(SuggestionKind::Priority, &["urgent"]).fixed("priority", "Critical", 0.9),
            RuleDef::pattern(SuggestionKind::Budget, r"(").fixed("budget", 1.0, 0.9),
            RuleDef::keywords(SuggestionKind::Priority, &["later"]).fixed("priority", "Low", 0.8),
        ];
        let set = RuleSet::compile(&defs);

        assert_eq!(set.tables().len(), 1);
        assert_eq!(set.rule_count(), 2);
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn derived_values_can_reject_a_match() {
        fn only_even(caps: &Captures<'_>, _: &RuleContext<'_>) -> Option<FieldValue> {
            let n: f64 = caps.get(1)?.as_str().parse().ok()?;
            (n % 2.0 == 0.0).then_some(FieldValue::Number(n))
        }

        let rule = RuleDef::pattern(SuggestionKind::Duration, r"(\d+)")
            .derived("estimatedHours", only_even, 0.9)
            .compile()
            .expect("pattern rule should compile");
        let directory = Directory::default();

        let hit = rule.first_hit("3 then 4", &ctx(&directory)).expect("4 should match");
        assert_eq!(hit.value, FieldValue::Number(4.0));
        assert_eq!(rule.all_hits("2 3 6", &ctx(&directory)).len(), 2);
    }
}
