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

//! Usage analytics for the suggestion engine.
//!
//! Counters are kept in memory behind a mutex and written to a
//! [`quickfill_core::KeyValueStore`] as one JSON blob. Persistence is best
//! effort: failures are logged and never reach the caller.

pub mod counters;
pub mod flags;
pub mod insights;
pub mod kv;
pub mod store;

pub use counters::{FrequencyEntry, FrequencyList, UsageCounters};
pub use flags::pattern_flags;
pub use insights::{ProductivityInsights, Recommendation, RecommendationKind};
pub use kv::{JsonFileStore, MemoryStore};
pub use store::{AnalyticsConfig, AnalyticsStore, STORAGE_KEY};
