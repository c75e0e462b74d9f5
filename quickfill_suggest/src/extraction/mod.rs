//! Offline, rule-table driven field detection.

pub mod directory;
pub mod extractor;
pub mod rules;
pub mod tables;

pub use directory::{Directory, Member};
pub use extractor::PatternExtractor;
pub use rules::{PatternRule, RuleDef, RuleError, RuleSet};
