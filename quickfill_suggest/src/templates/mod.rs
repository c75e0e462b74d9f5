//! Task and project templates: keyword matching and bundle application.

pub mod library;
pub mod matcher;

use quickfill_core::{Candidate, EntityKind, Field, FieldMap, FieldValue, Origin, SuggestionKind};
use serde::{Deserialize, Serialize};

pub use library::builtin_templates;
pub use matcher::{TemplateMatch, TemplateMatcher};

/// A named bundle of field values recognised by keywords.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub name: String,
    pub icon: String,
    pub category: String,
    pub entity: EntityKind,
    /// Field values in application order.
    pub field_bundle: Vec<(Field, FieldValue)>,
    pub match_keywords: Vec<String>,
    /// Fields this template may replace even when already set.
    #[serde(default)]
    pub overrides: Vec<Field>,
}

impl Template {
    #[must_use]
    pub fn new(name: &str, icon: &str, category: &str, entity: EntityKind) -> Self {
        Self {
            name: name.to_string(),
            icon: icon.to_string(),
            category: category.to_string(),
            entity,
            field_bundle: Vec::new(),
            match_keywords: Vec::new(),
            overrides: Vec::new(),
        }
    }

    #[must_use]
    pub fn field(mut self, field: Field, value: impl Into<FieldValue>) -> Self {
        self.field_bundle.push((field, value.into()));
        self
    }

    #[must_use]
    pub fn keywords(mut self, keywords: &[&str]) -> Self {
        self.match_keywords
            .extend(keywords.iter().map(|k| k.to_lowercase()));
        self
    }

    #[must_use]
    pub fn overriding(mut self, field: Field) -> Self {
        self.overrides.push(field);
        self
    }

    #[must_use]
    pub fn value(&self, field: Field) -> Option<&FieldValue> {
        self.field_bundle
            .iter()
            .find_map(|(f, v)| (*f == field).then_some(v))
    }

    /// Bundle fields as candidates, weighted by how well the text matched.
    #[must_use]
    pub fn candidates(&self, score: f64) -> Vec<Candidate> {
        let confidence = 0.35f64.mul_add(score.clamp(0.0, 1.0), 0.45);

        self.field_bundle
            .iter()
            .map(|(field, value)| Candidate {
                kind: SuggestionKind::Template,
                field: field.as_str().to_string(),
                value: value.clone(),
                confidence,
                reason: format!("From the {} template", self.name),
                label: self.name.clone(),
                icon: self.icon.clone(),
                origin: Origin::Template,
            })
            .collect()
    }
}

/// Merge a template's bundle into the current form state.
///
/// A bundle value is written when the field is missing or empty. Fields in
/// `overrides` are written regardless, except `priority`, which is only
/// raised: it is replaced when the template's level is strictly higher.
/// Applying the same template twice gives the same result as applying it
/// once.
#[must_use]
pub fn apply_template(template: &Template, current: &FieldMap) -> FieldMap {
    let mut fields = current.clone();

    for (field, value) in &template.field_bundle {
        let write = match fields.get(field) {
            None => true,
            Some(existing) if existing.is_empty() => true,
            Some(existing) => {
                template.overrides.contains(field) && may_override(*field, existing, value)
            }
        };

        if write {
            fields.insert(*field, value.clone());
        }
    }

    fields
}

fn may_override(field: Field, existing: &FieldValue, incoming: &FieldValue) -> bool {
    if field != Field::Priority {
        return true;
    }
    match (existing.as_priority(), incoming.as_priority()) {
        (Some(current), Some(proposed)) => proposed > current,
        (None, Some(_)) => true,
        (_, None) => false,
    }
}
