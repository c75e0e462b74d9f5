use quickfill_config::Config;
use quickfill_core::{AnalysisResult, AnalysisSource, EntityKind};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct AnalyzeInput {
    pub text: String,
    pub kind: EntityKind,
    /// Skip the external provider even when configured.
    pub offline: bool,
    pub json: bool,
}

/// Analyzes a description and prints the suggested fields.
///
/// Ctrl-C during an external request abandons it and prints the offline
/// result instead. Every run is recorded in analytics.
#[derive(Debug, Clone, Copy)]
pub struct AnalyzeStrategy;

impl super::CommandStrategy for AnalyzeStrategy {
    type Input = AnalyzeInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let config = Config::load_or_default()?;
        let engine = super::build_engine(&config);
        let analytics = super::open_analytics(&config)?;

        let result = if input.offline || !engine.has_external() {
            engine.analyze_offline(&input.text, input.kind)
        } else {
            let cancel = CancellationToken::new();
            let guard = cancel.clone();
            let watcher = tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    warn!("Interrupted, abandoning external request");
                    guard.cancel();
                }
            });
            let result = engine
                .analyze_detailed(&input.text, input.kind, &cancel)
                .await;
            watcher.abort();
            result
        };

        info!(
            "Analysis produced {} suggestions ({:?})",
            result.suggestions.len(),
            result.source
        );
        analytics.track_analysis(
            &input.text,
            &result.suggestions,
            !result.suggestions.is_empty(),
        );

        if input.json {
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            print_result(&result);
        }
        Ok(())
    }
}

fn print_result(result: &AnalysisResult) {
    if result.suggestions.is_empty() {
        println!("No suggestions.");
    }

    for s in &result.suggestions {
        println!(
            "{} {:<14} {:<24} {:>3.0}%  {}",
            s.icon,
            s.label,
            s.value.to_string(),
            s.confidence * 100.0,
            s.reason
        );
    }

    let source = match result.source {
        AnalysisSource::External => "external",
        AnalysisSource::Rules => "rules",
        AnalysisSource::Empty => "none",
    };
    println!();
    println!("Source: {source}");
    if let Some(name) = &result.applied_template {
        println!("Applied template: {name}");
    }
    if let Some(recommended) = &result.recommended_template {
        println!(
            "Recommended template: {} {} ({:.0}%)",
            recommended.icon,
            recommended.name,
            recommended.score * 100.0
        );
    }
}
