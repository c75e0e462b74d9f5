//! Static assignee directory.

use serde::{Deserialize, Serialize};

/// A person suggestions may be assigned to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Short handle matched against the text (`mike`, `@mike`).
    pub handle: String,
    /// Value written into the `assignee` field.
    pub name: String,
}

impl Member {
    #[must_use]
    pub fn new(handle: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            handle: handle.into(),
            name: name.into(),
        }
    }
}

/// Lookup table from handles to members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directory {
    members: Vec<Member>,
}

impl Directory {
    #[must_use]
    pub const fn new(members: Vec<Member>) -> Self {
        Self { members }
    }

    /// Find a member by handle or by the first word of their name,
    /// ignoring case.
    #[must_use]
    pub fn lookup(&self, word: &str) -> Option<&Member> {
        let word = word.trim().trim_start_matches('@');
        if word.is_empty() {
            return None;
        }

        self.members.iter().find(|m| {
            m.handle.eq_ignore_ascii_case(word)
                || m.name
                    .split_whitespace()
                    .next()
                    .is_some_and(|first| first.eq_ignore_ascii_case(word))
        })
    }

    #[must_use]
    pub fn members(&self) -> &[Member] {
        &self.members
    }
}

impl Default for Directory {
    fn default() -> Self {
        Self::new(vec![
            Member::new("mike", "Mike Chen"),
            Member::new("sarah", "Sarah Miller"),
            Member::new("john", "John Davis"),
            Member::new("emma", "Emma Wilson"),
            Member::new("alex", "Alex Kim"),
            Member::new("lisa", "Lisa Brown"),
            Member::new("david", "David Garcia"),
            Member::new("priya", "Priya Patel"),
        ])
    }
}
