use quickfill_core::{EntityKind, RecommendedTemplate};

use super::{Template, builtin_templates};

/// Default number of matches returned.
pub const DEFAULT_MAX_MATCHES: usize = 3;

/// A template together with its keyword score for some text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemplateMatch<'a> {
    pub template: &'a Template,
    /// Matched keywords over total keywords, in `[0, 1]`.
    pub score: f64,
}

impl TemplateMatch<'_> {
    #[must_use]
    pub fn recommended(&self) -> RecommendedTemplate {
        RecommendedTemplate {
            name: self.template.name.clone(),
            icon: self.template.icon.clone(),
            score: self.score,
        }
    }
}

/// Scores templates against free text.
#[derive(Debug, Clone)]
pub struct TemplateMatcher {
    templates: Vec<Template>,
    max_matches: usize,
}

impl Default for TemplateMatcher {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl TemplateMatcher {
    #[must_use]
    pub const fn new(templates: Vec<Template>, max_matches: usize) -> Self {
        Self {
            templates,
            max_matches,
        }
    }

    /// Matcher over the built-in library.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(builtin_templates(), DEFAULT_MAX_MATCHES)
    }

    #[must_use]
    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    /// Case-insensitive lookup by name.
    #[must_use]
    pub fn template(&self, name: &str) -> Option<&Template> {
        let name = name.trim();
        self.templates
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name))
    }

    /// Best matches for `text`, highest score first.
    ///
    /// Only templates with a positive score are returned. Equal scores keep
    /// library order.
    #[must_use]
    pub fn suggested_templates(&self, text: &str) -> Vec<TemplateMatch<'_>> {
        self.rank(text, None)
    }

    /// Like [`Self::suggested_templates`], restricted to one entity kind.
    #[must_use]
    pub fn suggested_templates_for(&self, text: &str, kind: EntityKind) -> Vec<TemplateMatch<'_>> {
        self.rank(text, Some(kind))
    }

    fn rank(&self, text: &str, kind: Option<EntityKind>) -> Vec<TemplateMatch<'_>> {
        let haystack = normalize_text(text);
        if haystack.trim().is_empty() {
            return Vec::new();
        }

        let mut matches: Vec<TemplateMatch<'_>> = self
            .templates
            .iter()
            .filter(|t| kind.is_none_or(|k| t.entity == k))
            .filter_map(|template| {
                let score = score(template, &haystack);
                (score > 0.0).then_some(TemplateMatch { template, score })
            })
            .collect();

        // `sort_by` is stable, so ties keep library order.
        matches.sort_by(|a, b| b.score.total_cmp(&a.score));
        matches.truncate(self.max_matches);
        matches
    }
}

/// Lower-case, replace punctuation (other than `:` and `-`) with spaces and
/// pad with one space on each side so keywords can be matched as ` kw `.
fn normalize_text(text: &str) -> String {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == ':' || c == '-' {
                c
            } else {
                ' '
            }
        })
        .collect();

    format!(" {} ", cleaned.split_whitespace().collect::<Vec<_>>().join(" "))
}

#[expect(clippy::cast_precision_loss, reason = "Keyword counts are tiny")]
fn score(template: &Template, haystack: &str) -> f64 {
    let total = template.match_keywords.len();
    if total == 0 {
        return 0.0;
    }

    let matched = template
        .match_keywords
        .iter()
        .filter(|kw| haystack.contains(&format!(" {} ", kw.trim())))
        .count();

    (matched as f64 / total as f64).clamp(0.0, 1.0)
}
