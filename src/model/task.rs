use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Unique task identifier: creation-time milliseconds, bumped on collision.
///
/// Persisted data may carry the id as a JSON number or a numeric string;
/// deserialization accepts both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl Serialize for TaskId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.0)
    }
}

impl<'de> Deserialize<'de> for TaskId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct IdVisitor;

        impl Visitor<'_> for IdVisitor {
            type Value = TaskId;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a task id as a number or numeric string")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<TaskId, E> {
                Ok(TaskId(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<TaskId, E> {
                u64::try_from(v)
                    .map(TaskId)
                    .map_err(|_| E::custom(format!("negative task id: {v}")))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<TaskId, E> {
                v.parse::<u64>()
                    .map(TaskId)
                    .map_err(|_| E::custom(format!("invalid task id: {v:?}")))
            }
        }

        deserializer.deserialize_any(IdVisitor)
    }
}

/// Task priority. Persisted values outside the three known names are kept
/// verbatim and rank below `Low` everywhere priorities are compared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Priority {
    High,
    Medium,
    Low,
    Other(String),
}

impl Priority {
    /// Sort rank: High=3, Medium=2, Low=1, anything else 0.
    pub fn rank(&self) -> u8 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
            Priority::Other(_) => 0,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
            Priority::Other(name) => name,
        }
    }

    pub fn from_name(name: &str) -> Priority {
        match name {
            "High" => Priority::High,
            "Medium" => Priority::Medium,
            "Low" => Priority::Low,
            other => Priority::Other(other.to_string()),
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

impl Serialize for Priority {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Priority::from_name(&name))
    }
}

/// The list a task was created under. The "All Tasks" tab is a view target
/// only (see [`Selector`]) and is never stored on a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ListId {
    MyDay,
    Important,
    Planned,
}

/// The list tab currently being viewed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Selector {
    MyDay,
    Important,
    Planned,
    AllTasks,
}

impl Selector {
    /// The list assignment given to tasks created under this tab.
    /// All Tasks has no bucket of its own; new tasks land in My Day.
    pub fn assignment(self) -> ListId {
        match self {
            Selector::MyDay | Selector::AllTasks => ListId::MyDay,
            Selector::Important => ListId::Important,
            Selector::Planned => ListId::Planned,
        }
    }
}

/// A single task.
///
/// `is_important` and `is_planned` are derived from priority, due date and
/// list assignment whenever the task is created or edited; they are kept as
/// stored fields because list membership predicates consult them directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub completed: bool,
    #[serde(default)]
    pub priority: Priority,
    /// Serialized as an ISO calendar date, or the empty string when unset.
    #[serde(default, with = "due_date_string")]
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub list: ListId,
    #[serde(default)]
    pub is_important: bool,
    #[serde(default)]
    pub is_planned: bool,
}

impl Task {
    /// Due date set, strictly before `today`, and the task is still open.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        match self.due_date {
            Some(due) => due < today && !self.completed,
            None => false,
        }
    }
}

/// Input for creating a task. The store assigns the id, created timestamp
/// and derived flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub due_date: Option<NaiveDate>,
    pub list: ListId,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>, list: ListId) -> Self {
        TaskDraft {
            title: title.into(),
            description: String::new(),
            priority: Priority::default(),
            due_date: None,
            list,
        }
    }

    /// Quick-add draft with per-list defaults: priority High under
    /// Important, due date `today` under My Day and Planned.
    pub fn quick(title: impl Into<String>, list: ListId, today: NaiveDate) -> Self {
        let priority = match list {
            ListId::Important => Priority::High,
            _ => Priority::default(),
        };
        let due_date = match list {
            ListId::MyDay | ListId::Planned => Some(today),
            ListId::Important => None,
        };
        TaskDraft {
            title: title.into(),
            description: String::new(),
            priority,
            due_date,
            list,
        }
    }
}

/// Partial edit of an existing task. `None` fields are left untouched;
/// `due_date: Some(None)` clears the due date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub due_date: Option<Option<NaiveDate>>,
}

/// Serde adapter for the due-date field: `Some(date)` ↔ `"YYYY-MM-DD"`,
/// `None` ↔ `""`.
mod due_date_string {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer, de};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S: Serializer>(
        value: &Option<NaiveDate>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(date) => serializer.serialize_str(&date.format(FORMAT).to_string()),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDate>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw.is_empty() {
            return Ok(None);
        }
        NaiveDate::parse_from_str(&raw, FORMAT)
            .map(Some)
            .map_err(|_| de::Error::custom(format!("invalid due date: {raw:?}")))
    }
}
