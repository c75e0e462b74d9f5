//! Built-in detection rules.
//!
//! Categories are listed in evaluation order and rules inside a category are
//! listed in precedence order: the first rule whose matcher hits and whose
//! value derivation succeeds wins. Phrases negating a priority keyword come
//! right before the rule they negate; vague low-priority words come last so
//! they never outrank an explicit level.

use chrono::{Datelike, Days, Months, NaiveDate, NaiveTime, Weekday};
use quickfill_core::normalize::{capitalize, to_24h};
use quickfill_core::{FieldValue, Priority, SuggestionKind};
use regex::Captures;

use crate::extraction::rules::{RuleContext, RuleDef};

/// Words that end a captured project name.
const NAME_STOPWORDS: &[&str] = &[
    "for", "by", "on", "due", "with", "at", "in", "to", "and", "today", "tomorrow", "tonight",
    "next", "this", "before", "after", "asap", "urgent",
];

#[must_use]
#[expect(clippy::too_many_lines, reason = "One flat table per category reads best")]
pub fn default_rule_defs() -> Vec<RuleDef> {
    use SuggestionKind as K;

    vec![
        // priority
        RuleDef::keywords(
            K::Priority,
            &[
                "not urgent",
                "not critical",
                "no emergency",
                "not an emergency",
            ],
        )
        .fixed("priority", Priority::Low, 0.85)
        .labelled("Low priority", "🐢"),
        RuleDef::keywords(
            K::Priority,
            &[
                "urgent",
                "urgently",
                "asap",
                "critical",
                "emergency",
                "immediately",
                "right away",
            ],
        )
        .fixed("priority", Priority::Critical, 0.95)
        .labelled("Critical priority", "🔥"),
        RuleDef::keywords(K::Priority, &["not important", "low priority"])
            .fixed("priority", Priority::Low, 0.85)
            .labelled("Low priority", "🐢"),
        RuleDef::keywords(
            K::Priority,
            &["high priority", "important", "crucial", "top priority"],
        )
        .fixed("priority", Priority::High, 0.85)
        .labelled("High priority", "⚡"),
        RuleDef::keywords(K::Priority, &["medium priority", "normal priority", "moderate"])
            .fixed("priority", Priority::Medium, 0.75)
            .labelled("Medium priority", "➖"),
        RuleDef::keywords(K::Priority, &["no rush", "no hurry", "whenever", "someday"])
            .fixed("priority", Priority::Low, 0.8)
            .labelled("Low priority", "🐢"),
        // lifeArea; projects receive it as `category` through the alias table
        RuleDef::keywords(
            K::LifeArea,
            &[
                "work", "office", "meeting", "meetings", "client", "clients", "boss", "report",
                "presentation", "standup", "colleague", "sprint", "deadline",
            ],
        )
        .fixed("lifeArea", "Work", 0.8)
        .labelled("Work", "💼"),
        RuleDef::keywords(
            K::LifeArea,
            &[
                "doctor", "dentist", "gym", "workout", "exercise", "run", "running", "yoga",
                "medication", "medicine", "health", "therapy", "hospital", "clinic", "checkup",
            ],
        )
        .fixed("lifeArea", "Health", 0.8)
        .labelled("Health", "❤️"),
        RuleDef::keywords(
            K::LifeArea,
            &[
                "bill", "bills", "pay", "payment", "invoice", "tax", "taxes", "bank", "budget",
                "rent", "insurance", "finance", "mortgage", "salary",
            ],
        )
        .fixed("lifeArea", "Finance", 0.8)
        .labelled("Finance", "💰"),
        RuleDef::keywords(
            K::LifeArea,
            &[
                "study", "learn", "learning", "course", "class", "read", "reading", "book",
                "homework", "exam", "lecture", "tutorial",
            ],
        )
        .fixed("lifeArea", "Learning", 0.8)
        .labelled("Learning", "📚"),
        RuleDef::keywords(
            K::LifeArea,
            &[
                "friend", "friends", "party", "dinner", "birthday", "family", "date night",
                "hangout", "wedding",
            ],
        )
        .fixed("lifeArea", "Social", 0.8)
        .labelled("Social", "🎉"),
        RuleDef::keywords(
            K::LifeArea,
            &["flight", "trip", "travel", "hotel", "vacation", "airport", "passport", "train"],
        )
        .fixed("lifeArea", "Travel", 0.8)
        .labelled("Travel", "✈️"),
        RuleDef::keywords(
            K::LifeArea,
            &[
                "clean", "cleaning", "laundry", "groceries", "grocery", "cook", "cooking",
                "repair", "garden", "house", "chores", "dishes", "renovation",
            ],
        )
        .fixed("lifeArea", "Home", 0.8)
        .labelled("Home", "🏠"),
        RuleDef::keywords(
            K::LifeArea,
            &["personal", "journal", "meditate", "meditation", "hobby", "self-care"],
        )
        .fixed("lifeArea", "Personal", 0.8)
        .labelled("Personal", "🌱"),
        // project
        RuleDef::pattern(K::Project, r"\bproject\s*[:\-]\s*([a-z0-9][a-z0-9 ]{0,40})")
            .derived("project", project_name, 0.85)
            .labelled("Project", "📁"),
        RuleDef::pattern(
            K::Project,
            r"\b(?:for|on)\s+(?:the\s+)?([a-z0-9]+(?:\s+[a-z0-9]+){0,2})\s+project\b",
        )
        .derived("project", project_name, 0.8)
        .labelled("Project", "📁"),
        // date
        RuleDef::keywords(K::Date, &["day after tomorrow"])
            .derived("dueDate", in_two_days, 0.9)
            .labelled("Due date", "📅"),
        RuleDef::keywords(K::Date, &["tomorrow", "tmrw"])
            .derived("dueDate", tomorrow, 0.95)
            .labelled("Due date", "📅"),
        RuleDef::keywords(K::Date, &["today", "tonight", "end of day", "eod"])
            .derived("dueDate", today, 0.9)
            .labelled("Due date", "📅"),
        RuleDef::keywords(K::Date, &["next week"])
            .derived("dueDate", in_one_week, 0.8)
            .labelled("Due date", "📅"),
        RuleDef::pattern(K::Date, r"\bend\s+of\s+(?:the\s+)?month\b")
            .derived("dueDate", end_of_month, 0.8)
            .labelled("Due date", "📅"),
        RuleDef::keywords(K::Date, &["next month"])
            .derived("dueDate", next_month, 0.75)
            .labelled("Due date", "📅"),
        RuleDef::pattern(K::Date, r"\b(?:this\s+)?weekend\b")
            .derived("dueDate", upcoming_saturday, 0.75)
            .labelled("Due date", "📅"),
        RuleDef::pattern(
            K::Date,
            r"\bin\s+(\d+|a|an|one|two|three|four|five|six|seven|eight|nine|ten)\s+(days?|weeks?)\b",
        )
        .derived("dueDate", in_n_units, 0.85)
        .labelled("Due date", "📅"),
        RuleDef::pattern(
            K::Date,
            r"\b(next\s+|this\s+)?(monday|tuesday|tues|wednesday|weds|thursday|thurs|friday|saturday|sunday)\b",
        )
        .derived("dueDate", weekday_date, 0.85)
        .labelled("Due date", "📅"),
        RuleDef::pattern(K::Date, r"\b(\d{4})-(\d{2})-(\d{2})\b")
            .derived("dueDate", iso_date, 0.95)
            .labelled("Due date", "📅"),
        RuleDef::pattern(K::Date, r"\b(\d{1,2})/(\d{1,2})(?:/(\d{4}|\d{2}))?\b")
            .derived("dueDate", slash_date, 0.9)
            .labelled("Due date", "📅"),
        RuleDef::pattern(
            K::Date,
            r"\b(jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)\.?\s+(\d{1,2})(?:st|nd|rd|th)?(?:,?\s+(\d{4}))?\b",
        )
        .derived("dueDate", month_name_date, 0.9)
        .labelled("Due date", "📅"),
        // time
        RuleDef::pattern(K::Time, r"\b(\d{1,2})(?::([0-5]\d))?\s*(am|pm)\b")
            .derived("reminderTime", twelve_hour, 0.95)
            .labelled("Reminder", "⏰"),
        RuleDef::pattern(K::Time, r"\b([01]?\d|2[0-3]):([0-5]\d)\b")
            .derived("reminderTime", twenty_four_hour, 0.9)
            .labelled("Reminder", "⏰"),
        RuleDef::keywords(K::Time, &["noon", "midday"])
            .fixed("reminderTime", "12:00", 0.9)
            .labelled("Reminder", "⏰"),
        RuleDef::keywords(K::Time, &["midnight"])
            .fixed("reminderTime", "00:00", 0.9)
            .labelled("Reminder", "⏰"),
        RuleDef::keywords(K::Time, &["morning"])
            .fixed("reminderTime", "09:00", 0.6)
            .labelled("Reminder", "⏰"),
        RuleDef::keywords(K::Time, &["afternoon"])
            .fixed("reminderTime", "14:00", 0.6)
            .labelled("Reminder", "⏰"),
        RuleDef::keywords(K::Time, &["evening", "tonight"])
            .fixed("reminderTime", "19:00", 0.6)
            .labelled("Reminder", "⏰"),
        // recurrence
        RuleDef::keywords(K::Recurrence, &["every weekday", "weekdays"])
            .fixed("recurrence", "Weekdays", 0.9)
            .labelled("Repeats", "🔁"),
        RuleDef::keywords(K::Recurrence, &["daily", "every day", "each day"])
            .fixed("recurrence", "Daily", 0.9)
            .labelled("Repeats", "🔁"),
        RuleDef::keywords(K::Recurrence, &["biweekly", "every other week", "fortnightly"])
            .fixed("recurrence", "Biweekly", 0.85)
            .labelled("Repeats", "🔁"),
        RuleDef::pattern(
            K::Recurrence,
            r"\bevery\s+(?:monday|tuesday|wednesday|thursday|friday|saturday|sunday)\b",
        )
            .fixed("recurrence", "Weekly", 0.9)
            .labelled("Repeats", "🔁"),
        RuleDef::keywords(K::Recurrence, &["weekly", "every week", "each week"])
            .fixed("recurrence", "Weekly", 0.9)
            .labelled("Repeats", "🔁"),
        RuleDef::keywords(K::Recurrence, &["monthly", "every month", "each month"])
            .fixed("recurrence", "Monthly", 0.9)
            .labelled("Repeats", "🔁"),
        RuleDef::keywords(K::Recurrence, &["yearly", "annually", "annual", "every year"])
            .fixed("recurrence", "Yearly", 0.9)
            .labelled("Repeats", "🔁"),
        // duration
        RuleDef::pattern(
            K::Duration,
            r"\b(?:(in|within)\s+)?(\d+(?:\.\d+)?)\s*(minutes|minute|mins|min|hours|hour|hrs|hr|h|days|day|weeks|week)\b",
        )
        .derived("estimatedHours", duration_hours, 0.9)
        .labelled("Estimate", "⏱️"),
        RuleDef::keywords(K::Duration, &["half an hour", "half hour"])
            .fixed("estimatedHours", 0.5, 0.85)
            .labelled("Estimate", "⏱️"),
        RuleDef::keywords(K::Duration, &["an hour", "one hour"])
            .fixed("estimatedHours", 1.0, 0.85)
            .labelled("Estimate", "⏱️"),
        RuleDef::keywords(K::Duration, &["all day"])
            .fixed("estimatedHours", 8.0, 0.75)
            .labelled("Estimate", "⏱️"),
        RuleDef::keywords(K::Duration, &["quick"])
            .fixed("estimatedHours", 0.25, 0.6)
            .labelled("Estimate", "⏱️"),
        // budget
        RuleDef::pattern(
            K::Budget,
            r"\$\s?(\d+(?:,\d{3})*(?:\.\d+)?)\s*(k|m|bn|b|thousand|million|billion)?\b",
        )
            .derived("budget", amount, 0.95)
            .labelled("Budget", "💵"),
        RuleDef::pattern(
            K::Budget,
            r"\bbudget(?:\s+of|\s+is|:)?\s*\$?\s?(\d+(?:,\d{3})*(?:\.\d+)?)\s*(k|m|bn|b|thousand|million|billion)?\b",
        )
            .derived("budget", amount, 0.9)
            .labelled("Budget", "💵"),
        RuleDef::pattern(
            K::Budget,
            r"\b(\d+(?:,\d{3})*(?:\.\d+)?)\s*(k|m|bn|b|thousand|million|billion)?\s*(?:dollars|usd|bucks)\b",
        )
            .derived("budget", amount, 0.85)
            .labelled("Budget", "💵"),
        // tags
        RuleDef::pattern(K::Tags, r"#([a-z0-9][a-z0-9_\-]*)")
            .derived("tags", tag_word, 0.95)
            .labelled("Tags", "🏷️"),
        RuleDef::keywords(
            K::Tags,
            &[
                "call", "meeting", "email", "errand", "review", "bug", "research", "writing",
                "planning",
            ],
        )
        .derived("tags", tag_word, 0.8)
        .labelled("Tags", "🏷️"),
        RuleDef::keywords(K::Tags, &["urgent"])
            .fixed("tags", FieldValue::list(["urgent"]), 0.7)
            .labelled("Tags", "🏷️"),
        // icon
        icon_rule(&["call", "phone", "ring"], "📞"),
        icon_rule(&["email", "e-mail", "mail", "inbox"], "📧"),
        icon_rule(&["meeting", "standup", "sync", "conference", "huddle"], "📅"),
        icon_rule(&["gym", "workout", "exercise", "run", "running", "yoga", "fitness"], "💪"),
        icon_rule(
            &["doctor", "dentist", "hospital", "clinic", "checkup", "medication", "appointment"],
            "🏥",
        ),
        icon_rule(&["bill", "pay", "payment", "invoice", "tax", "bank", "rent", "budget"], "💰"),
        icon_rule(&["flight", "trip", "travel", "hotel", "vacation", "airport"], "✈️"),
        icon_rule(&["study", "learn", "course", "class", "read", "book", "homework", "exam"], "📚"),
        icon_rule(&["buy", "shop", "shopping", "groceries", "grocery", "store"], "🛒"),
        icon_rule(&["clean", "laundry", "repair", "house", "chores", "renovation"], "🏠"),
        icon_rule(&["party", "birthday", "celebration", "wedding", "anniversary"], "🎉"),
        icon_rule(&["code", "bug", "deploy", "release", "fix", "programming"], "💻"),
        icon_rule(&["write", "writing", "draft", "blog", "essay"], "✍️"),
        // assignee
        RuleDef::pattern(K::Assignee, r"@([a-z][a-z0-9_]*)")
            .derived("assignee", directory_member, 0.9)
            .labelled("Assignee", "👤"),
        RuleDef::pattern(
            K::Assignee,
            r"\b(?:with|for|assign(?:ed)?\s+to|ask|tell|cc)\s+([a-z]+)\b",
        )
        .derived("assignee", directory_member, 0.85)
        .labelled("Assignee", "👤"),
        RuleDef::pattern(K::Assignee, r"\b([a-z]+)\b")
            .derived("assignee", directory_member, 0.6)
            .labelled("Assignee", "👤"),
        // location
        RuleDef::pattern(
            K::Location,
            r"\b(?:at|in)\s+(?:the\s+)?(office|home|gym|library|cafe|coffee shop|hospital|clinic|school|airport|park|downtown|studio|warehouse)\b",
        )
        .derived("location", title_case_capture, 0.75)
        .labelled("Location", "📍"),
    ]
}

fn icon_rule(keywords: &'static [&'static str], icon: &'static str) -> RuleDef {
    RuleDef::keywords(SuggestionKind::Icon, keywords)
        .fixed("icon", icon, 0.7)
        .labelled("Icon", icon)
}

fn capture<'t>(caps: &Captures<'t>, index: usize) -> Option<&'t str> {
    caps.get(index).map(|m| m.as_str())
}

fn title_case(words: &str) -> String {
    words
        .split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn title_case_capture(caps: &Captures<'_>, _: &RuleContext<'_>) -> Option<FieldValue> {
    Some(FieldValue::Text(title_case(capture(caps, 1)?)))
}

fn project_name(caps: &Captures<'_>, _: &RuleContext<'_>) -> Option<FieldValue> {
    let words: Vec<&str> = capture(caps, 1)?
        .split_whitespace()
        .skip_while(|w| *w == "the")
        .take_while(|w| !NAME_STOPWORDS.contains(w))
        .take(3)
        .collect();

    (!words.is_empty()).then(|| FieldValue::Text(title_case(&words.join(" "))))
}

fn offset(ctx: &RuleContext<'_>, days: u64) -> Option<FieldValue> {
    ctx.today.checked_add_days(Days::new(days)).map(FieldValue::Date)
}

fn today(_: &Captures<'_>, ctx: &RuleContext<'_>) -> Option<FieldValue> {
    offset(ctx, 0)
}

fn tomorrow(_: &Captures<'_>, ctx: &RuleContext<'_>) -> Option<FieldValue> {
    offset(ctx, 1)
}

fn in_two_days(_: &Captures<'_>, ctx: &RuleContext<'_>) -> Option<FieldValue> {
    offset(ctx, 2)
}

fn in_one_week(_: &Captures<'_>, ctx: &RuleContext<'_>) -> Option<FieldValue> {
    offset(ctx, 7)
}

fn end_of_month(_: &Captures<'_>, ctx: &RuleContext<'_>) -> Option<FieldValue> {
    NaiveDate::from_ymd_opt(ctx.today.year(), ctx.today.month(), 1)?
        .checked_add_months(Months::new(1))?
        .pred_opt()
        .map(FieldValue::Date)
}

fn next_month(_: &Captures<'_>, ctx: &RuleContext<'_>) -> Option<FieldValue> {
    ctx.today
        .checked_add_months(Months::new(1))
        .map(FieldValue::Date)
}

/// Days from `from` until the next `target`, `0` when they coincide.
const fn days_until(from: Weekday, target: Weekday) -> u32 {
    (7 + target.num_days_from_monday() - from.num_days_from_monday()) % 7
}

fn upcoming_saturday(_: &Captures<'_>, ctx: &RuleContext<'_>) -> Option<FieldValue> {
    offset(ctx, u64::from(days_until(ctx.today.weekday(), Weekday::Sat)))
}

fn small_number(word: &str) -> Option<u64> {
    Some(match word {
        "a" | "an" | "one" => 1,
        "two" => 2,
        "three" => 3,
        "four" => 4,
        "five" => 5,
        "six" => 6,
        "seven" => 7,
        "eight" => 8,
        "nine" => 9,
        "ten" => 10,
        digits => digits.parse().ok()?,
    })
}

fn in_n_units(caps: &Captures<'_>, ctx: &RuleContext<'_>) -> Option<FieldValue> {
    let n = small_number(capture(caps, 1)?)?;
    let days = if capture(caps, 2)?.starts_with("week") {
        n.checked_mul(7)?
    } else {
        n
    };
    offset(ctx, days)
}

fn parse_weekday(name: &str) -> Option<Weekday> {
    match name {
        "monday" => Some(Weekday::Mon),
        "tuesday" | "tues" => Some(Weekday::Tue),
        "wednesday" | "weds" => Some(Weekday::Wed),
        "thursday" | "thurs" => Some(Weekday::Thu),
        "friday" => Some(Weekday::Fri),
        "saturday" => Some(Weekday::Sat),
        "sunday" => Some(Weekday::Sun),
        _ => None,
    }
}

/// `friday` is the next Friday strictly after today; `this friday` is today
/// when today is Friday; `next friday` is the Friday of the following
/// calendar week (weeks start on Monday).
fn weekday_date(caps: &Captures<'_>, ctx: &RuleContext<'_>) -> Option<FieldValue> {
    let target = parse_weekday(capture(caps, 2)?)?;
    let current = ctx.today.weekday();
    let prefix = capture(caps, 1).map(str::trim);

    let days = match (prefix, days_until(current, target)) {
        (Some("next"), _) => 7 - current.num_days_from_monday() + target.num_days_from_monday(),
        (Some("this"), 0) => 0,
        (_, 0) => 7,
        (_, n) => n,
    };
    offset(ctx, u64::from(days))
}

fn iso_date(caps: &Captures<'_>, _: &RuleContext<'_>) -> Option<FieldValue> {
    NaiveDate::from_ymd_opt(
        capture(caps, 1)?.parse().ok()?,
        capture(caps, 2)?.parse().ok()?,
        capture(caps, 3)?.parse().ok()?,
    )
    .map(FieldValue::Date)
}

/// Resolve a month/day pair; without an explicit year, dates already past
/// roll over to next year.
fn month_day(ctx: &RuleContext<'_>, month: u32, day: u32, year: Option<i32>) -> Option<FieldValue> {
    if let Some(year) = year {
        return NaiveDate::from_ymd_opt(year, month, day).map(FieldValue::Date);
    }

    let this_year = NaiveDate::from_ymd_opt(ctx.today.year(), month, day);
    match this_year {
        Some(date) if date >= ctx.today => Some(FieldValue::Date(date)),
        _ => NaiveDate::from_ymd_opt(ctx.today.year() + 1, month, day).map(FieldValue::Date),
    }
}

fn slash_date(caps: &Captures<'_>, ctx: &RuleContext<'_>) -> Option<FieldValue> {
    let month = capture(caps, 1)?.parse().ok()?;
    let day = capture(caps, 2)?.parse().ok()?;
    let year = match capture(caps, 3) {
        Some(y) if y.len() == 2 => Some(2000 + y.parse::<i32>().ok()?),
        Some(y) => Some(y.parse().ok()?),
        None => None,
    };
    month_day(ctx, month, day, year)
}

fn month_name_date(caps: &Captures<'_>, ctx: &RuleContext<'_>) -> Option<FieldValue> {
    let month = match capture(caps, 1)?.get(..3)? {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    let day = capture(caps, 2)?.parse().ok()?;
    let year = match capture(caps, 3) {
        Some(y) => Some(y.parse().ok()?),
        None => None,
    };
    month_day(ctx, month, day, year)
}

fn clock(hour: u32, minute: u32) -> Option<FieldValue> {
    NaiveTime::from_hms_opt(hour, minute, 0).map(|t| FieldValue::Text(t.format("%H:%M").to_string()))
}

fn twelve_hour(caps: &Captures<'_>, _: &RuleContext<'_>) -> Option<FieldValue> {
    let hour = capture(caps, 1)?.parse().ok()?;
    let minute = match capture(caps, 2) {
        Some(m) => m.parse().ok()?,
        None => 0,
    };
    let pm = capture(caps, 3)? == "pm";
    clock(to_24h(hour, pm)?, minute)
}

fn twenty_four_hour(caps: &Captures<'_>, _: &RuleContext<'_>) -> Option<FieldValue> {
    clock(capture(caps, 1)?.parse().ok()?, capture(caps, 2)?.parse().ok()?)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `<n> <unit>` in hours. `in`/`within` followed by days or weeks is a date
/// offset and is rejected here.
fn duration_hours(caps: &Captures<'_>, _: &RuleContext<'_>) -> Option<FieldValue> {
    let offset_prefix = caps.get(1).is_some();

    let n: f64 = capture(caps, 2)?.parse().ok()?;
    let hours = match capture(caps, 3)? {
        "minutes" | "minute" | "mins" | "min" => n / 60.0,
        "hours" | "hour" | "hrs" | "hr" | "h" => n,
        "days" | "day" if !offset_prefix => n * 8.0,
        "weeks" | "week" if !offset_prefix => n * 40.0,
        _ => return None,
    };

    (hours > 0.0).then(|| FieldValue::Number(round2(hours)))
}

fn amount(caps: &Captures<'_>, _: &RuleContext<'_>) -> Option<FieldValue> {
    let base: f64 = capture(caps, 1)?.replace(',', "").parse().ok()?;
    let multiplier = match capture(caps, 2) {
        Some("k" | "thousand") => 1_000.0,
        Some("m" | "million") => 1_000_000.0,
        Some("b" | "bn" | "billion") => 1_000_000_000.0,
        _ => 1.0,
    };
    let value = base * multiplier;

    value.is_finite().then_some(FieldValue::Number(value))
}

fn tag_word(caps: &Captures<'_>, _: &RuleContext<'_>) -> Option<FieldValue> {
    let word = caps.get(1).or_else(|| caps.get(0))?.as_str();
    Some(FieldValue::list([word.to_lowercase()]))
}

fn directory_member(caps: &Captures<'_>, ctx: &RuleContext<'_>) -> Option<FieldValue> {
    ctx.directory
        .lookup(capture(caps, 1)?)
        .map(|member| FieldValue::Text(member.name.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::directory::Directory;
    use crate::extraction::rules::RuleSet;

    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn saturday() -> NaiveDate {
        // 2026-10-17 is a Saturday.
        NaiveDate::from_ymd_opt(2026, 10, 17).expect("valid date")
    }

    fn first(category: SuggestionKind, text: &str) -> Option<FieldValue> {
        let set = RuleSet::compile(&default_rule_defs());
        let directory = Directory::default();
        let ctx = RuleContext {
            today: saturday(),
            directory: &directory,
        };
        let table = set.tables().iter().find(|t| t.category == category)?;
        table
            .rules
            .iter()
            .find_map(|rule| rule.first_hit(text, &ctx))
            .map(|hit| hit.value)
    }

    fn date(y: i32, m: u32, d: u32) -> Option<FieldValue> {
        NaiveDate::from_ymd_opt(y, m, d).map(FieldValue::Date)
    }

    #[test]
    fn every_default_rule_compiles() {
        let defs = default_rule_defs();
        assert_eq!(RuleSet::compile(&defs).rule_count(), defs.len());
    }

    #[test]
    fn negated_urgency_wins() {
        assert_eq!(
            first(SuggestionKind::Priority, "not urgent, whenever"),
            Some(FieldValue::Priority(Priority::Low))
        );
        assert_eq!(
            first(SuggestionKind::Priority, "this is not an emergency"),
            Some(FieldValue::Priority(Priority::Low))
        );
        assert_eq!(
            first(SuggestionKind::Priority, "not important"),
            Some(FieldValue::Priority(Priority::Low))
        );
        assert_eq!(
            first(SuggestionKind::Priority, "someday"),
            Some(FieldValue::Priority(Priority::Low))
        );
    }

    #[test]
    fn urgency_keywords_beat_vague_low_words() {
        let set = RuleSet::compile(&default_rule_defs());
        let directory = Directory::default();
        let ctx = RuleContext {
            today: saturday(),
            directory: &directory,
        };
        let table = set
            .tables()
            .iter()
            .find(|t| t.category == SuggestionKind::Priority);

        for keyword in ["urgent", "asap", "critical", "emergency"] {
            for text in [
                format!("fix the {keyword} thing"),
                format!("{keyword}, whenever you can"),
                format!("someday but {keyword}"),
                format!("no rush, actually {keyword}"),
            ] {
                let hit = table
                    .and_then(|t| t.rules.iter().find_map(|rule| rule.first_hit(&text, &ctx)))
                    .map(|hit| hit.value);
                let rule = table.and_then(|t| {
                    t.rules.iter().find(|rule| rule.first_hit(&text, &ctx).is_some())
                });
                assert_eq!(hit, Some(FieldValue::Priority(Priority::Critical)), "{text}");
                assert!(rule.is_some_and(|r| r.confidence >= 0.9), "{text}");
            }
        }

        assert_eq!(
            first(SuggestionKind::Priority, "important, no rush"),
            Some(FieldValue::Priority(Priority::High))
        );
    }

    #[test]
    fn relative_dates() {
        assert_eq!(first(SuggestionKind::Date, "day after tomorrow"), date(2026, 10, 19));
        assert_eq!(first(SuggestionKind::Date, "tomorrow"), date(2026, 10, 18));
        assert_eq!(first(SuggestionKind::Date, "end of the month"), date(2026, 10, 31));
        assert_eq!(first(SuggestionKind::Date, "this weekend"), date(2026, 10, 17));
        assert_eq!(first(SuggestionKind::Date, "in two weeks"), date(2026, 10, 31));
        assert_eq!(first(SuggestionKind::Date, "next month"), date(2026, 11, 17));
    }

    #[test]
    fn weekday_dates() {
        assert_eq!(first(SuggestionKind::Date, "on monday"), date(2026, 10, 19));
        assert_eq!(first(SuggestionKind::Date, "saturday"), date(2026, 10, 24));
        assert_eq!(first(SuggestionKind::Date, "next friday"), date(2026, 10, 23));
        assert_eq!(first(SuggestionKind::Date, "this saturday"), date(2026, 10, 17));
        assert_eq!(first(SuggestionKind::Date, "this sunday"), date(2026, 10, 18));
    }

    #[test]
    fn absolute_dates_roll_forward() {
        assert_eq!(first(SuggestionKind::Date, "by 2027-01-05"), date(2027, 1, 5));
        assert_eq!(first(SuggestionKind::Date, "due 3/4"), date(2027, 3, 4));
        assert_eq!(first(SuggestionKind::Date, "due 12/1/26"), date(2026, 12, 1));
        assert_eq!(first(SuggestionKind::Date, "on dec 25th"), date(2026, 12, 25));
        assert_eq!(first(SuggestionKind::Date, "on jan 2"), date(2027, 1, 2));
        assert_eq!(first(SuggestionKind::Date, "due 13/45"), None);
    }

    #[test]
    fn times() {
        assert_eq!(first(SuggestionKind::Time, "at 2pm"), Some(FieldValue::text("14:00")));
        assert_eq!(first(SuggestionKind::Time, "12am"), Some(FieldValue::text("00:00")));
        assert_eq!(first(SuggestionKind::Time, "12:30 pm"), Some(FieldValue::text("12:30")));
        assert_eq!(first(SuggestionKind::Time, "at 17:45"), Some(FieldValue::text("17:45")));
        assert_eq!(first(SuggestionKind::Time, "this evening"), Some(FieldValue::text("19:00")));
    }

    #[test]
    fn durations_skip_date_offsets() {
        assert_eq!(first(SuggestionKind::Duration, "for 30 minutes"), Some(FieldValue::Number(0.5)));
        assert_eq!(first(SuggestionKind::Duration, "2 days"), Some(FieldValue::Number(16.0)));
        assert_eq!(first(SuggestionKind::Duration, "in 3 days"), None);
        assert_eq!(first(SuggestionKind::Duration, "within 2 weeks"), None);
        assert_eq!(first(SuggestionKind::Duration, "finish in 2 hours"), Some(FieldValue::Number(2.0)));
        assert_eq!(first(SuggestionKind::Duration, "within 90 mins"), Some(FieldValue::Number(1.5)));
        assert_eq!(first(SuggestionKind::Duration, "half an hour"), Some(FieldValue::Number(0.5)));
        assert_eq!(first(SuggestionKind::Duration, "45 min"), Some(FieldValue::Number(0.75)));
    }

    #[test]
    fn budgets_expand_multipliers() {
        assert_eq!(first(SuggestionKind::Budget, "$50k"), Some(FieldValue::Number(50_000.0)));
        assert_eq!(first(SuggestionKind::Budget, "$1,250.50"), Some(FieldValue::Number(1_250.5)));
        assert_eq!(
            first(SuggestionKind::Budget, "budget of 2 million"),
            Some(FieldValue::Number(2_000_000.0))
        );
        assert_eq!(first(SuggestionKind::Budget, "300 dollars"), Some(FieldValue::Number(300.0)));
    }

    #[test]
    fn recurrence_precedence() {
        assert_eq!(first(SuggestionKind::Recurrence, "every weekday"), Some(FieldValue::text("Weekdays")));
        assert_eq!(first(SuggestionKind::Recurrence, "every monday"), Some(FieldValue::text("Weekly")));
        assert_eq!(first(SuggestionKind::Recurrence, "biweekly sync"), Some(FieldValue::text("Biweekly")));
    }

    #[test]
    fn project_names_are_title_cased() {
        assert_eq!(
            first(SuggestionKind::Project, "work on the website redesign project"),
            Some(FieldValue::text("Website Redesign"))
        );
        assert_eq!(
            first(SuggestionKind::Project, "project: apollo launch by friday"),
            Some(FieldValue::text("Apollo Launch"))
        );
    }

    #[test]
    fn assignees_come_from_the_directory() {
        assert_eq!(first(SuggestionKind::Assignee, "sync with sarah"), Some(FieldValue::text("Sarah Miller")));
        assert_eq!(first(SuggestionKind::Assignee, "ping @alex"), Some(FieldValue::text("Alex Kim")));
        assert_eq!(first(SuggestionKind::Assignee, "lunch with bob"), None);
    }

    #[test]
    fn locations() {
        assert_eq!(first(SuggestionKind::Location, "meet at the coffee shop"), Some(FieldValue::text("Coffee Shop")));
        assert_eq!(first(SuggestionKind::Location, "work at 5"), None);
    }
}
