use quickfill_core::Suggestion;

/// Keep one suggestion per field.
///
/// A later suggestion replaces an earlier one for the same field only when its
/// confidence is strictly higher, and it takes the earlier one's position.
/// Everything else keeps production order.
#[must_use]
pub fn dedupe(suggestions: Vec<Suggestion>) -> Vec<Suggestion> {
    let mut out: Vec<Suggestion> = Vec::with_capacity(suggestions.len());

    for suggestion in suggestions {
        match out.iter_mut().find(|s| s.field == suggestion.field) {
            Some(existing) => {
                if suggestion.confidence > existing.confidence {
                    *existing = suggestion;
                }
            }
            None => out.push(suggestion),
        }
    }

    out
}

/// Drop suggestions below `min_confidence`.
#[must_use]
pub fn above(suggestions: Vec<Suggestion>, min_confidence: f64) -> Vec<Suggestion> {
    suggestions
        .into_iter()
        .filter(|s| s.confidence >= min_confidence)
        .collect()
}
