//! Field-name aliasing and value coercion.
//!
//! Every source (rule tables, templates, the external service) emits
//! [`Candidate`]s keyed by whatever field name it used. This module is the one
//! place those names are mapped onto the canonical schema, so rule output and
//! external output go through exactly the same pass.

use chrono::{NaiveDate, NaiveTime};
use tracing::debug;

use crate::suggestion::{Candidate, EntityKind, Field, FieldValue, Suggestion};

/// Alias targets. `Area` resolves to `lifeArea` for tasks and `category` for
/// projects.
#[derive(Debug, Clone, Copy)]
enum Target {
    Fixed(Field),
    Area,
}

/// Alias keys are compared after [`compact`]: lower-case, without `_`, `-`
/// or spaces.
const ALIASES: &[(&str, Target)] = &[
    ("title", Target::Fixed(Field::Title)),
    ("name", Target::Fixed(Field::Title)),
    ("status", Target::Fixed(Field::Status)),
    ("state", Target::Fixed(Field::Status)),
    ("priority", Target::Fixed(Field::Priority)),
    ("prioritylevel", Target::Fixed(Field::Priority)),
    ("urgency", Target::Fixed(Field::Priority)),
    ("lifearea", Target::Area),
    ("area", Target::Area),
    ("category", Target::Area),
    ("project", Target::Fixed(Field::Project)),
    ("projectname", Target::Fixed(Field::Project)),
    ("initiative", Target::Fixed(Field::Project)),
    ("duedate", Target::Fixed(Field::DueDate)),
    ("dodate", Target::Fixed(Field::DueDate)),
    ("due", Target::Fixed(Field::DueDate)),
    ("deadline", Target::Fixed(Field::DueDate)),
    ("date", Target::Fixed(Field::DueDate)),
    ("enddate", Target::Fixed(Field::DueDate)),
    ("startdate", Target::Fixed(Field::StartDate)),
    ("start", Target::Fixed(Field::StartDate)),
    ("remindertime", Target::Fixed(Field::ReminderTime)),
    ("reminder", Target::Fixed(Field::ReminderTime)),
    ("time", Target::Fixed(Field::ReminderTime)),
    ("recurrence", Target::Fixed(Field::Recurrence)),
    ("repeat", Target::Fixed(Field::Recurrence)),
    ("frequency", Target::Fixed(Field::Recurrence)),
    ("isrecurring", Target::Fixed(Field::IsRecurring)),
    ("recurring", Target::Fixed(Field::IsRecurring)),
    ("estimatedhours", Target::Fixed(Field::EstimatedHours)),
    ("estimate", Target::Fixed(Field::EstimatedHours)),
    ("timeestimate", Target::Fixed(Field::EstimatedHours)),
    ("duration", Target::Fixed(Field::EstimatedHours)),
    ("hours", Target::Fixed(Field::EstimatedHours)),
    ("budget", Target::Fixed(Field::Budget)),
    ("cost", Target::Fixed(Field::Budget)),
    ("amount", Target::Fixed(Field::Budget)),
    ("tags", Target::Fixed(Field::Tags)),
    ("tag", Target::Fixed(Field::Tags)),
    ("labels", Target::Fixed(Field::Tags)),
    ("icon", Target::Fixed(Field::Icon)),
    ("emoji", Target::Fixed(Field::Icon)),
    ("assignee", Target::Fixed(Field::Assignee)),
    ("assignedto", Target::Fixed(Field::Assignee)),
    ("owner", Target::Fixed(Field::Assignee)),
    ("person", Target::Fixed(Field::Assignee)),
    ("location", Target::Fixed(Field::Location)),
    ("place", Target::Fixed(Field::Location)),
    ("where", Target::Fixed(Field::Location)),
];

fn compact(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Resolve a raw field name to its canonical field for `kind`.
///
/// Canonical names resolve to themselves, so resolving the result's
/// `as_str()` again yields the same field.
#[must_use]
pub fn canonical_field(raw: &str, kind: EntityKind) -> Option<Field> {
    let key = compact(raw);
    let target = ALIASES
        .iter()
        .find_map(|(alias, target)| (*alias == key).then_some(*target))?;

    Some(match target {
        Target::Fixed(field) => field,
        Target::Area => match kind {
            EntityKind::Task => Field::LifeArea,
            EntityKind::Project => Field::Category,
        },
    })
}

/// Normalize a batch of candidates, dropping anything that does not fit the
/// entity schema. Production order is preserved.
#[must_use]
pub fn normalize(candidates: Vec<Candidate>, kind: EntityKind) -> Vec<Suggestion> {
    candidates
        .into_iter()
        .filter_map(|c| normalize_one(c, kind))
        .collect()
}

/// Normalize a single candidate.
#[must_use]
pub fn normalize_one(candidate: Candidate, kind: EntityKind) -> Option<Suggestion> {
    let Some(field) = canonical_field(&candidate.field, kind) else {
        debug!("Dropping suggestion for unknown field '{}'", candidate.field);
        return None;
    };

    if !kind.allows(field) {
        debug!("Dropping '{field}' suggestion: not part of the {kind} schema");
        return None;
    }

    let Some(value) = coerce(field, candidate.value) else {
        debug!("Dropping '{field}' suggestion: value does not fit the field type");
        return None;
    };

    let confidence = if candidate.confidence.is_nan() {
        0.0
    } else {
        candidate.confidence.clamp(0.0, 1.0)
    };

    let label = if candidate.label.trim().is_empty() {
        capitalize(field.label())
    } else {
        candidate.label
    };

    Some(Suggestion {
        kind: candidate.kind,
        field,
        description: format!("Set {} to {value}", field.label()),
        value,
        confidence,
        reason: candidate.reason,
        label,
        icon: candidate.icon,
        origin: candidate.origin,
    })
}

/// Coerce a value to the type `field` expects.
#[must_use]
pub fn coerce(field: Field, value: FieldValue) -> Option<FieldValue> {
    match field {
        Field::Priority => value.as_priority().map(FieldValue::Priority),
        Field::DueDate | Field::StartDate => coerce_date(value),
        Field::ReminderTime => match value {
            FieldValue::Text(s) => {
                parse_clock(&s).map(|t| FieldValue::Text(t.format("%H:%M").to_string()))
            }
            _ => None,
        },
        Field::EstimatedHours | Field::Budget => coerce_number(value),
        Field::Tags => coerce_tags(value),
        Field::IsRecurring => match value {
            FieldValue::Bool(b) => Some(FieldValue::Bool(b)),
            FieldValue::Text(s) => match s.trim().to_lowercase().as_str() {
                "true" | "yes" => Some(FieldValue::Bool(true)),
                "false" | "no" => Some(FieldValue::Bool(false)),
                _ => None,
            },
            _ => None,
        },
        Field::LifeArea | Field::Category | Field::Recurrence => {
            coerce_text(value).map(|s| FieldValue::Text(capitalize(&s)))
        }
        Field::Title
        | Field::Status
        | Field::Project
        | Field::Icon
        | Field::Assignee
        | Field::Location => coerce_text(value).map(FieldValue::Text),
    }
}

fn coerce_text(value: FieldValue) -> Option<String> {
    match value {
        FieldValue::Text(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        FieldValue::Priority(p) => Some(p.as_str().to_string()),
        _ => None,
    }
}

fn coerce_date(value: FieldValue) -> Option<FieldValue> {
    match value {
        FieldValue::Date(d) => Some(FieldValue::Date(d)),
        FieldValue::Text(s) => {
            let s = s.trim();
            // Accept full timestamps by keeping the date part.
            let date_part = s.get(..10).unwrap_or(s);
            NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
                .ok()
                .map(FieldValue::Date)
        }
        _ => None,
    }
}

fn coerce_number(value: FieldValue) -> Option<FieldValue> {
    let n = match value {
        FieldValue::Number(n) => n,
        FieldValue::Text(s) => {
            let cleaned: String = s
                .chars()
                .filter(|c| !matches!(c, '$' | ',' | ' '))
                .collect();
            cleaned.parse::<f64>().ok()?
        }
        _ => return None,
    };

    (n.is_finite() && n >= 0.0).then_some(FieldValue::Number(n))
}

fn coerce_tags(value: FieldValue) -> Option<FieldValue> {
    let raw: Vec<String> = match value {
        FieldValue::List(items) => items,
        FieldValue::Text(s) => s.split(',').map(str::to_string).collect(),
        _ => return None,
    };

    let mut tags: Vec<String> = Vec::new();
    for tag in raw {
        let tag = tag.trim().trim_start_matches('#').trim().to_lowercase();
        if !tag.is_empty() && !tags.contains(&tag) {
            tags.push(tag);
        }
    }

    (!tags.is_empty()).then_some(FieldValue::List(tags))
}

/// Parse `14:00`, `14:00:00`, `2pm`, `2:30 pm`, `12am` into a clock time.
#[must_use]
pub fn parse_clock(raw: &str) -> Option<NaiveTime> {
    let s = raw.trim().to_lowercase();
    let (body, meridiem) = if let Some(rest) = s.strip_suffix("am") {
        (rest.trim().trim_end_matches('.'), Some(false))
    } else if let Some(rest) = s.strip_suffix("pm") {
        (rest.trim().trim_end_matches('.'), Some(true))
    } else {
        (s.as_str(), None)
    };

    let mut parts = body.split(':');
    let hour: u32 = parts.next()?.trim().parse().ok()?;
    let minute: u32 = match parts.next() {
        Some(m) => m.trim().parse().ok()?,
        None => 0,
    };

    let hour = match meridiem {
        Some(pm) => to_24h(hour, pm)?,
        None => hour,
    };

    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// Convert a 12-hour clock hour to 24-hour. `12am` is midnight, `12pm` noon.
#[must_use]
pub const fn to_24h(hour: u32, pm: bool) -> Option<u32> {
    match (hour, pm) {
        (0 | 13.., _) => None,
        (12, false) => Some(0),
        (12, true) => Some(12),
        (h, false) => Some(h),
        (h, true) => Some(h + 12),
    }
}

/// Upper-case the first character.
#[must_use]
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suggestion::{Origin, Priority, SuggestionKind};

    fn candidate(field: &str, value: FieldValue, confidence: f64) -> Candidate {
        Candidate {
            kind: SuggestionKind::Priority,
            field: field.to_string(),
            value,
            confidence,
            reason: "test".to_string(),
            label: String::new(),
            icon: String::new(),
            origin: Origin::External,
        }
    }

    #[test]
    fn legacy_names_resolve_and_are_idempotent() {
        let once = canonical_field("priorityLevel", EntityKind::Task);
        assert_eq!(once, Some(Field::Priority));
        let twice = once.and_then(|f| canonical_field(f.as_str(), EntityKind::Task));
        assert_eq!(twice, Some(Field::Priority));

        assert_eq!(canonical_field("doDate", EntityKind::Task), Some(Field::DueDate));
        assert_eq!(canonical_field("due_date", EntityKind::Task), Some(Field::DueDate));
        assert_eq!(canonical_field("time", EntityKind::Task), Some(Field::ReminderTime));
        assert_eq!(canonical_field("nonsense", EntityKind::Task), None);
    }

    #[test]
    fn every_canonical_name_resolves_to_itself() {
        for field in Field::ALL {
            let kind = if EntityKind::Task.allows(field) {
                EntityKind::Task
            } else {
                EntityKind::Project
            };
            assert_eq!(canonical_field(field.as_str(), kind), Some(field), "{field}");
        }
    }

    #[test]
    fn area_resolves_per_entity() {
        assert_eq!(canonical_field("lifeArea", EntityKind::Task), Some(Field::LifeArea));
        assert_eq!(canonical_field("lifeArea", EntityKind::Project), Some(Field::Category));
        assert_eq!(canonical_field("category", EntityKind::Task), Some(Field::LifeArea));
    }

    #[test]
    fn fields_outside_schema_are_dropped() {
        let out = normalize(
            vec![candidate("time", FieldValue::text("14:00"), 0.9)],
            EntityKind::Project,
        );
        assert!(out.is_empty());
    }

    #[test]
    fn values_are_coerced() {
        let out = normalize(
            vec![
                candidate("priorityLevel", FieldValue::text("high"), 0.9),
                candidate("estimatedHours", FieldValue::text("1.5"), 0.9),
                candidate("tags", FieldValue::text("#Call, work, call"), 0.9),
                candidate("time", FieldValue::text("2:30 pm"), 0.9),
                candidate("lifeArea", FieldValue::text("health"), 0.9),
            ],
            EntityKind::Task,
        );

        assert_eq!(out.len(), 5);
        assert_eq!(out[0].value, FieldValue::Priority(Priority::High));
        assert_eq!(out[1].value, FieldValue::Number(1.5));
        assert_eq!(out[2].value, FieldValue::list(["call", "work"]));
        assert_eq!(out[3].value, FieldValue::text("14:30"));
        assert_eq!(out[4].value, FieldValue::text("Health"));
    }

    #[test]
    fn uncoercible_values_are_dropped() {
        let out = normalize(
            vec![
                candidate("priority", FieldValue::text("sometime"), 0.9),
                candidate("budget", FieldValue::text("lots"), 0.9),
                candidate("dueDate", FieldValue::text("next tuesday"), 0.9),
            ],
            EntityKind::Task,
        );
        assert!(out.is_empty());
    }

    #[test]
    fn confidence_is_clamped() {
        let out = normalize(
            vec![
                candidate("priority", FieldValue::text("low"), 1.7),
                candidate("budget", FieldValue::Number(5.0), f64::NAN),
            ],
            EntityKind::Task,
        );
        assert!((out[0].confidence - 1.0).abs() < f64::EPSILON);
        assert!(out[1].confidence.abs() < f64::EPSILON);
    }

    #[test]
    fn clock_parsing() {
        assert_eq!(parse_clock("2pm"), NaiveTime::from_hms_opt(14, 0, 0));
        assert_eq!(parse_clock("12am"), NaiveTime::from_hms_opt(0, 0, 0));
        assert_eq!(parse_clock("12:15 pm"), NaiveTime::from_hms_opt(12, 15, 0));
        assert_eq!(parse_clock("09:05"), NaiveTime::from_hms_opt(9, 5, 0));
        assert_eq!(parse_clock("13pm"), None);
        assert_eq!(parse_clock("25:00"), None);
    }

    #[test]
    fn description_mentions_field_and_value() {
        let out = normalize(
            vec![candidate("budget", FieldValue::Number(50_000.0), 0.95)],
            EntityKind::Project,
        );
        assert_eq!(out[0].description, "Set budget to 50000");
        assert_eq!(out[0].label, "Budget");
    }
}
