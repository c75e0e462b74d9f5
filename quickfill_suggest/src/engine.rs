//! Suggestion engine: combines the external service, the rule tables and the
//! template library into one ranked, de-duplicated suggestion list.
//!
//! # Design
//!
//! - Blank input short-circuits to an empty result; nothing is called.
//! - The external path wins whenever it yields at least one usable field.
//! - Any external failure (timeout, cancellation, transport, bad JSON) is
//!   logged and the offline path runs instead; callers never see an error.
//! - Rule candidates and template candidates go through the same
//!   normalization as external candidates.

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use quickfill_core::{
    AnalysisResult, AnalysisSource, EntityKind, FieldMap, LLMProvider, RecommendedTemplate,
    Suggestion, normalize,
};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::augment::ExternalAugmenter;
use crate::extraction::{Directory, PatternExtractor};
use crate::merge;
use crate::templates::{
    Template, TemplateMatch, TemplateMatcher, apply_template, builtin_templates,
};

/// Tunables for [`SuggestionEngine`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Consult the external service when one is configured.
    pub use_external: bool,
    /// Minimum score before the best template's bundle is merged offline.
    pub template_min_score: f64,
    /// Number of template matches reported.
    pub max_templates: usize,
    /// Suggestions below this confidence are dropped.
    pub min_confidence: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            use_external: true,
            template_min_score: 0.25,
            max_templates: 3,
            min_confidence: 0.0,
        }
    }
}

pub type SharedProvider = Arc<dyn LLMProvider>;

pub struct SuggestionEngine {
    extractor: PatternExtractor,
    matcher: TemplateMatcher,
    augmenter: Option<ExternalAugmenter<SharedProvider>>,
    config: EngineConfig,
}

impl Default for SuggestionEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl SuggestionEngine {
    /// Offline engine over the built-in rules and templates.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self {
            extractor: PatternExtractor::default(),
            matcher: TemplateMatcher::new(builtin_templates(), config.max_templates),
            augmenter: None,
            config,
        }
    }

    #[must_use]
    pub fn with_directory(mut self, directory: Directory) -> Self {
        self.extractor = PatternExtractor::new(directory);
        self
    }

    #[must_use]
    pub fn with_templates(mut self, templates: Vec<Template>) -> Self {
        self.matcher = TemplateMatcher::new(templates, self.config.max_templates);
        self
    }

    #[must_use]
    pub fn with_augmenter(mut self, augmenter: ExternalAugmenter<SharedProvider>) -> Self {
        self.augmenter = Some(augmenter);
        self
    }

    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub const fn has_external(&self) -> bool {
        self.augmenter.is_some() && self.config.use_external
    }

    /// Suggestions for `text`.
    pub async fn analyze(&self, text: &str, kind: EntityKind) -> Vec<Suggestion> {
        self.analyze_detailed(text, kind, &CancellationToken::new())
            .await
            .suggestions
    }

    /// Full analysis for `text`. Cancelling `cancel` abandons the external
    /// request and returns the offline result.
    pub async fn analyze_detailed(
        &self,
        text: &str,
        kind: EntityKind,
        cancel: &CancellationToken,
    ) -> AnalysisResult {
        self.analyze_detailed_at(text, kind, Local::now().date_naive(), cancel)
            .await
    }

    pub async fn analyze_detailed_at(
        &self,
        text: &str,
        kind: EntityKind,
        today: NaiveDate,
        cancel: &CancellationToken,
    ) -> AnalysisResult {
        if text.trim().is_empty() {
            return AnalysisResult::default();
        }

        if self.config.use_external {
            if let Some(augmenter) = &self.augmenter {
                match augmenter.augment_at(text, kind, today, cancel).await {
                    Ok(candidates) => {
                        let suggestions = self.finish(normalize(candidates, kind));
                        if !suggestions.is_empty() {
                            info!("Using {} external suggestions", suggestions.len());
                            return AnalysisResult {
                                suggestions,
                                applied_template: None,
                                recommended_template: self.recommend(text, kind),
                                source: AnalysisSource::External,
                            };
                        }
                        warn!("External service returned no usable fields, falling back to rules");
                    }
                    Err(e) => warn!("External augmentation failed, falling back to rules: {e}"),
                }
            }
        }

        self.analyze_offline_at(text, kind, today)
    }

    /// Rules and templates only.
    #[must_use]
    pub fn analyze_offline(&self, text: &str, kind: EntityKind) -> AnalysisResult {
        self.analyze_offline_at(text, kind, Local::now().date_naive())
    }

    #[must_use]
    pub fn analyze_offline_at(
        &self,
        text: &str,
        kind: EntityKind,
        today: NaiveDate,
    ) -> AnalysisResult {
        if text.trim().is_empty() {
            return AnalysisResult::default();
        }

        let mut candidates = self.extractor.extract_at(text, kind, today);

        let best = self.matcher.suggested_templates_for(text, kind).into_iter().next();
        let applied_template = best
            .filter(|m| m.score >= self.config.template_min_score)
            .map(|m| {
                debug!("Merging '{}' template (score {:.2})", m.template.name, m.score);
                candidates.extend(m.template.candidates(m.score));
                m.template.name.clone()
            });

        let suggestions = self.finish(normalize(candidates, kind));
        let source = if suggestions.is_empty() {
            AnalysisSource::Empty
        } else {
            AnalysisSource::Rules
        };

        AnalysisResult {
            suggestions,
            applied_template,
            recommended_template: best.map(|m| m.recommended()),
            source,
        }
    }

    #[must_use]
    pub fn suggested_templates(&self, text: &str) -> Vec<TemplateMatch<'_>> {
        self.matcher.suggested_templates(text)
    }

    /// Apply the template called `name` to `fields`; `None` if no such
    /// template exists.
    #[must_use]
    pub fn apply_template(&self, name: &str, fields: &FieldMap) -> Option<FieldMap> {
        self.template(name)
            .map(|template| apply_template(template, fields))
    }

    #[must_use]
    pub fn template(&self, name: &str) -> Option<&Template> {
        self.matcher.template(name)
    }

    #[must_use]
    pub fn templates(&self) -> &[Template] {
        self.matcher.templates()
    }

    fn recommend(&self, text: &str, kind: EntityKind) -> Option<RecommendedTemplate> {
        self.matcher
            .suggested_templates_for(text, kind)
            .first()
            .map(TemplateMatch::recommended)
    }

    fn finish(&self, suggestions: Vec<Suggestion>) -> Vec<Suggestion> {
        merge::above(merge::dedupe(suggestions), self.config.min_confidence)
    }
}
