use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use lingoledger_core::{Entity, TaskId};

/// Entity: Task (immutable once inserted).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: Option<TaskId>,
    location: String,
    source_language: String,
    target_language: String,
    start_time: DateTime<Utc>,
}

impl Task {
    /// A task pending insertion; the store assigns the id.
    pub fn new(
        location: impl Into<String>,
        source_language: impl Into<String>,
        target_language: impl Into<String>,
        start_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id: None,
            location: location.into(),
            source_language: source_language.into(),
            target_language: target_language.into(),
            start_time,
        }
    }

    /// Builder-style pre-assigned id.
    pub fn with_id(mut self, id: TaskId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn source_language(&self) -> &str {
        &self.source_language
    }

    pub fn target_language(&self) -> &str {
        &self.target_language
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    /// Case-insensitive exact match on location and language pair.
    pub fn matches_attributes(
        &self,
        location: &str,
        source_language: &str,
        target_language: &str,
    ) -> bool {
        eq_ignore_case(&self.location, location)
            && eq_ignore_case(&self.source_language, source_language)
            && eq_ignore_case(&self.target_language, target_language)
    }

    /// Case-insensitive location match with `start_time` in `[start, end]`.
    pub fn starts_within(&self, location: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        eq_ignore_case(&self.location, location) && self.start_time >= start && self.start_time <= end
    }

    /// Same task: equal ids, or both pending and otherwise identical.
    pub fn same_task(&self, other: &Task) -> bool {
        match (self.id, other.id) {
            (Some(a), Some(b)) => a == b,
            _ => self == other,
        }
    }
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

impl Entity for Task {
    type Id = TaskId;

    fn id(&self) -> Option<Self::Id> {
        self.id
    }

    fn assign_id(&mut self, id: Self::Id) {
        self.id = Some(id);
    }
}
