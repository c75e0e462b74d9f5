//! Coarse "what did the user mention" flags for analysed input.

use once_cell::sync::Lazy;
use regex::Regex;

const WEEKDAY: &str = "monday|tuesday|wednesday|thursday|friday|saturday|sunday";

static FLAGS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    let patterns = [
        (
            "priority_mentioned",
            r"\b(?:urgent|asap|critical|emergency|important|priority|crucial|no rush|whenever|someday)\b"
                .to_string(),
        ),
        (
            "date_mentioned",
            format!(
                r"\b(?:today|tonight|tomorrow|tmrw|next (?:week|month)|weekend|end of (?:the )?month|{WEEKDAY}|\d{{4}}-\d{{2}}-\d{{2}}|\d{{1,2}}/\d{{1,2}})\b"
            ),
        ),
        (
            "time_mentioned",
            r"\b(?:\d{1,2}(?::\d{2})?\s*(?:am|pm)|\d{1,2}:\d{2}|noon|midnight|morning|afternoon|evening)\b"
                .to_string(),
        ),
        (
            "budget_mentioned",
            r"\$\s?\d|\b\d+\s*(?:dollars|usd|bucks)\b|\bbudget\b".to_string(),
        ),
        (
            "duration_mentioned",
            r"\b\d+(?:\.\d+)?\s*(?:minutes?|mins?|hours?|hrs?|h|days?|weeks?)\b|\b(?:half an hour|an hour|all day)\b"
                .to_string(),
        ),
        (
            "recurrence_mentioned",
            format!(
                r"\b(?:daily|weekly|biweekly|monthly|yearly|annually|weekdays|every (?:day|week|month|year|weekday|other week|{WEEKDAY}))\b"
            ),
        ),
        (
            "assignee_mentioned",
            r"@\w+|\b(?:assign(?:ed)? to|ask|tell|cc)\s+[a-z]+".to_string(),
        ),
        (
            "location_mentioned",
            r"\b(?:at|in)\s+(?:the\s+)?(?:office|home|gym|library|cafe|coffee shop|hospital|clinic|school|airport|park|downtown)\b"
                .to_string(),
        ),
    ];

    patterns
        .into_iter()
        .filter_map(|(name, pattern)| {
            Regex::new(&format!("(?i){pattern}"))
                .ok()
                .map(|regex| (name, regex))
        })
        .collect()
});

/// Flags present in `text`, in a fixed order.
#[must_use]
pub fn pattern_flags(text: &str) -> Vec<&'static str> {
    FLAGS
        .iter()
        .filter(|(_, regex)| regex.is_match(text))
        .map(|(name, _)| *name)
        .collect()
}
