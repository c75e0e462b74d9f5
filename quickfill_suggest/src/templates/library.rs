//! Built-in template library.

use quickfill_core::{EntityKind, Field, FieldValue, Priority};

use super::Template;

/// Templates shipped with the engine, in match tie-break order.
#[must_use]
pub fn builtin_templates() -> Vec<Template> {
    vec![
        Template::new("Meeting", "📅", "Work", EntityKind::Task)
            .field(Field::Status, "Not Started")
            .field(Field::Priority, Priority::Medium)
            .field(Field::LifeArea, "Work")
            .field(Field::EstimatedHours, 1.0)
            .field(Field::Tags, FieldValue::list(["meeting"]))
            .field(Field::Icon, "📅")
            .keywords(&["meeting", "standup", "sync", "agenda", "huddle", "1:1", "team"]),
        Template::new("Urgent Fix", "🚨", "Work", EntityKind::Task)
            .field(Field::Status, "In Progress")
            .field(Field::Priority, Priority::Critical)
            .field(Field::LifeArea, "Work")
            .field(Field::Tags, FieldValue::list(["urgent", "bug"]))
            .field(Field::Icon, "🚨")
            .keywords(&["urgent", "fix", "bug", "outage", "hotfix", "broken", "incident"])
            .overriding(Field::Priority),
        Template::new("Workout", "💪", "Health", EntityKind::Task)
            .field(Field::Status, "Not Started")
            .field(Field::Priority, Priority::Medium)
            .field(Field::LifeArea, "Health")
            .field(Field::EstimatedHours, 1.0)
            .field(Field::Tags, FieldValue::list(["fitness"]))
            .field(Field::Icon, "💪")
            .keywords(&["workout", "gym", "run", "exercise", "yoga", "training", "cardio"]),
        Template::new("Doctor Appointment", "🏥", "Health", EntityKind::Task)
            .field(Field::Status, "Not Started")
            .field(Field::Priority, Priority::High)
            .field(Field::LifeArea, "Health")
            .field(Field::EstimatedHours, 1.5)
            .field(Field::Tags, FieldValue::list(["health"]))
            .field(Field::Icon, "🏥")
            .keywords(&["doctor", "dentist", "appointment", "checkup", "clinic", "physician"]),
        Template::new("Bill Payment", "💰", "Finance", EntityKind::Task)
            .field(Field::Status, "Not Started")
            .field(Field::Priority, Priority::High)
            .field(Field::LifeArea, "Finance")
            .field(Field::EstimatedHours, 0.25)
            .field(Field::Tags, FieldValue::list(["finance"]))
            .field(Field::Icon, "💰")
            .keywords(&["bill", "pay", "payment", "invoice", "rent", "utilities"]),
        Template::new("Study Session", "📚", "Learning", EntityKind::Task)
            .field(Field::Status, "Not Started")
            .field(Field::Priority, Priority::Medium)
            .field(Field::LifeArea, "Learning")
            .field(Field::EstimatedHours, 2.0)
            .field(Field::Tags, FieldValue::list(["study"]))
            .field(Field::Icon, "📚")
            .keywords(&["study", "exam", "homework", "course", "learn", "revision"]),
        Template::new("Grocery Run", "🛒", "Home", EntityKind::Task)
            .field(Field::Status, "Not Started")
            .field(Field::Priority, Priority::Low)
            .field(Field::LifeArea, "Home")
            .field(Field::EstimatedHours, 1.0)
            .field(Field::Tags, FieldValue::list(["errand"]))
            .field(Field::Icon, "🛒")
            .keywords(&["grocery", "groceries", "supermarket", "shopping", "buy", "milk"]),
        Template::new("Weekly Review", "📝", "Personal", EntityKind::Task)
            .field(Field::Status, "Not Started")
            .field(Field::Priority, Priority::Medium)
            .field(Field::LifeArea, "Personal")
            .field(Field::Recurrence, "Weekly")
            .field(Field::IsRecurring, true)
            .field(Field::EstimatedHours, 1.0)
            .field(Field::Tags, FieldValue::list(["review", "planning"]))
            .field(Field::Icon, "📝")
            .keywords(&["weekly", "review", "retrospective", "reflect", "plan"]),
        Template::new("Project Launch", "🚀", "Work", EntityKind::Project)
            .field(Field::Status, "Planning")
            .field(Field::Priority, Priority::High)
            .field(Field::Category, "Work")
            .field(Field::Tags, FieldValue::list(["launch"]))
            .field(Field::Icon, "🚀")
            .keywords(&["launch", "release", "rollout", "ship", "go-live", "product"]),
        Template::new("Home Renovation", "🔨", "Home", EntityKind::Project)
            .field(Field::Status, "Planning")
            .field(Field::Priority, Priority::Medium)
            .field(Field::Category, "Home")
            .field(Field::Tags, FieldValue::list(["renovation"]))
            .field(Field::Icon, "🔨")
            .keywords(&["renovation", "remodel", "renovate", "kitchen", "bathroom", "contractor"]),
        Template::new("Event Planning", "🎉", "Social", EntityKind::Project)
            .field(Field::Status, "Planning")
            .field(Field::Priority, Priority::Medium)
            .field(Field::Category, "Social")
            .field(Field::Tags, FieldValue::list(["event"]))
            .field(Field::Icon, "🎉")
            .keywords(&["event", "party", "conference", "wedding", "venue", "celebration"]),
    ]
}
