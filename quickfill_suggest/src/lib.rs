#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

pub mod augment;
pub mod engine;
pub mod extraction;
pub mod merge;
pub mod templates;

pub use augment::{AugmentError, ExternalAugmenter};
pub use engine::{EngineConfig, SharedProvider, SuggestionEngine};
pub use extraction::{Directory, Member, PatternExtractor};
pub use templates::{Template, TemplateMatch, TemplateMatcher, apply_template};
