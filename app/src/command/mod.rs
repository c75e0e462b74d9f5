//! Static strategy pattern for CLI commands.
//!
//! Each subcommand is its own strategy type with its own input, dispatched
//! statically from `main`.

use std::sync::Arc;
use std::time::Duration;

use quickfill_analytics::{AnalyticsStore, JsonFileStore};
use quickfill_config::Config;
use quickfill_core::FieldMap;
use quickfill_providers::ChatCompletionsProvider;
use quickfill_suggest::{ExternalAugmenter, SharedProvider, SuggestionEngine};
use tracing::{debug, info};

mod analyze;
mod apply;
mod init;
mod insights;
mod record;
mod reset;
mod templates;
mod version;

pub use analyze::{AnalyzeInput, AnalyzeStrategy};
pub use apply::{ApplyInput, ApplyStrategy};
pub use init::InitStrategy;
pub use insights::{InsightsInput, InsightsStrategy};
pub use record::{RecordInput, RecordStrategy};
pub use reset::ResetStrategy;
pub use templates::{TemplatesInput, TemplatesStrategy};
pub use version::VersionStrategy;

/// Contract shared by every command strategy.
///
/// Each strategy declares its own input type, so `main` passes parsed
/// arguments through without boxing or casting.
pub trait CommandStrategy: Send + Sync + 'static {
    type Input;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()>;
}

/// Engine wired from config: directory, thresholds, and the external
/// provider when one is configured.
fn build_engine(config: &Config) -> SuggestionEngine {
    let engine = SuggestionEngine::new(config.engine.clone())
        .with_directory(config.assignee_directory());

    if !config.provider.is_usable() {
        debug!("External provider not configured, running offline");
        return engine;
    }

    info!(
        "External provider enabled: {} ({})",
        config.provider.base_url, config.provider.model
    );
    let provider: SharedProvider = Arc::new(
        ChatCompletionsProvider::new(config.provider.api_key.clone())
            .with_base_url(config.provider.base_url.clone())
            .with_model(config.provider.model.clone()),
    );
    let augmenter = ExternalAugmenter::new(provider)
        .with_model(config.provider.model.clone())
        .with_timeout(Duration::from_secs(config.provider.timeout_secs));

    engine.with_augmenter(augmenter)
}

fn open_analytics(config: &Config) -> anyhow::Result<AnalyticsStore> {
    let data_dir = config.data_dir()?;
    debug!("Analytics data dir: {}", data_dir.display());
    Ok(AnalyticsStore::init(
        Arc::new(JsonFileStore::new(data_dir)),
        config.analytics.clone(),
    ))
}

/// Parse a `{"field": value}` JSON object into a field map.
fn parse_fields(json: Option<&str>) -> anyhow::Result<FieldMap> {
    match json {
        None => Ok(FieldMap::new()),
        Some(raw) => serde_json::from_str(raw)
            .map_err(|e| anyhow::anyhow!("Invalid --fields JSON: {e}")),
    }
}

fn print_fields(fields: &FieldMap) {
    for (field, value) in fields {
        println!("  {:<14} {value}", field.label());
    }
}
