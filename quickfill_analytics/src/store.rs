use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use quickfill_core::{EntityKind, FieldMap, KeyValueStore, Suggestion};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::counters::UsageCounters;
use crate::insights::{ProductivityInsights, Recommendation, recommendations};

/// Key the counters are stored under.
pub const STORAGE_KEY: &str = "quickfill.analytics";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// When off, tracking calls are ignored.
    pub enabled: bool,
    /// Persist after every mutation.
    pub autosave: bool,
    /// Directory for the file store; `~/quickfill/data` when unset.
    pub data_dir: Option<PathBuf>,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            autosave: true,
            data_dir: None,
        }
    }
}

/// Usage recorder shared by reference (`Arc<AnalyticsStore>`).
///
/// # Design
///
/// - Counters live in memory behind a `Mutex`; a poisoned lock is recovered
///   because counters are plain data and stay consistent.
/// - The counters lock is never held across storage I/O.
/// - Writes are serialized on the `store` lock and the snapshot is taken
///   after it is acquired, so the last write to land carries the newest
///   counters.
/// - Storage failures are logged at `warn` and swallowed.
pub struct AnalyticsStore {
    store: Mutex<Arc<dyn KeyValueStore>>,
    config: AnalyticsConfig,
    counters: Mutex<UsageCounters>,
}

impl AnalyticsStore {
    /// Load counters from `store`, starting empty when nothing usable is
    /// stored.
    #[must_use]
    pub fn init(store: Arc<dyn KeyValueStore>, config: AnalyticsConfig) -> Self {
        let counters = match store.get(STORAGE_KEY) {
            Ok(Some(json)) => serde_json::from_str(&json).unwrap_or_else(|e| {
                warn!("Stored analytics are unreadable, starting fresh: {e}");
                UsageCounters::default()
            }),
            Ok(None) => {
                debug!("No stored analytics, starting fresh");
                UsageCounters::default()
            }
            Err(e) => {
                warn!("Failed to load analytics, starting fresh: {e}");
                UsageCounters::default()
            }
        };

        info!(
            "Analytics loaded: {} analyses, {} records created",
            counters.total_analyses,
            counters.total_created()
        );

        Self {
            store: Mutex::new(store),
            config,
            counters: Mutex::new(counters),
        }
    }

    #[must_use]
    pub const fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    fn lock(&self) -> MutexGuard<'_, UsageCounters> {
        self.counters.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn mutate(&self, update: impl FnOnce(&mut UsageCounters)) {
        if !self.config.enabled {
            return;
        }

        {
            let mut counters = self.lock();
            update(&mut counters);
            counters.last_updated = Some(Utc::now());
        }

        if self.config.autosave {
            self.persist();
        }
    }

    pub fn track_analysis(&self, input: &str, suggestions: &[Suggestion], success: bool) {
        self.mutate(|c| c.record_analysis(input, suggestions, success));
    }

    pub fn track_template_usage(&self, name: &str) {
        self.mutate(|c| c.record_template(name));
    }

    pub fn track_field_creation(&self, kind: EntityKind, fields: &FieldMap) {
        self.mutate(|c| c.record_creation(kind, fields));
    }

    #[must_use]
    pub fn recommendations(&self) -> Vec<Recommendation> {
        recommendations(&self.lock())
    }

    #[must_use]
    pub fn productivity_insights(&self) -> ProductivityInsights {
        ProductivityInsights::from_counters(&self.lock())
    }

    #[must_use]
    pub fn snapshot(&self) -> UsageCounters {
        self.lock().clone()
    }

    /// Write the counters to storage. Failures are logged, never returned.
    pub fn persist(&self) {
        let store = self.store.lock().unwrap_or_else(PoisonError::into_inner);

        let json = match serde_json::to_string(&*self.lock()) {
            Ok(json) => json,
            Err(e) => {
                drop(store);
                warn!("Failed to serialize analytics: {e}");
                return;
            }
        };

        let written = store.set(STORAGE_KEY, &json);
        drop(store);
        match written {
            Ok(()) => debug!("Analytics persisted"),
            Err(e) => warn!("Failed to persist analytics: {e:#}"),
        }
    }

    /// Zero every counter and persist.
    pub fn reset(&self) {
        *self.lock() = UsageCounters::default();
        info!("Analytics reset");
        self.persist();
    }
}
