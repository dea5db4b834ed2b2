use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::{ensure_non_negative, required_text};
use crate::error::{Error, Result};

/// Separates fields in the task form (`name | description | priority`).
pub(crate) const FIELD_SEPARATOR: char = '|';

pub(crate) const MIN_PRIORITY: i64 = 1;
pub(crate) const MAX_PRIORITY: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TaskStatus {
    Pending,
    InProgress,
    Done,
}

impl TaskStatus {
    /// Stable identifier written to the database.
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "InProgress",
            Self::Done => "Done",
        }
    }

    pub(crate) fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "In Progress",
            Self::Done => "Done",
        }
    }

    /// Accepts stored identifiers, display labels and the Portuguese names.
    pub(crate) fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pending" | "pendente" | "todo" => Some(Self::Pending),
            "inprogress" | "in progress" | "in-progress" | "doing" | "em andamento" => {
                Some(Self::InProgress)
            }
            "done" | "concluído" | "concluido" => Some(Self::Done),
            _ => None,
        }
    }

    pub(crate) fn all() -> &'static [TaskStatus] {
        &[Self::Pending, Self::InProgress, Self::Done]
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Task {
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) priority: u8,
    pub(crate) status: TaskStatus,
    pub(crate) estimate: Decimal,
    pub(crate) created_at: DateTime<Utc>,
}

/// A validated task ready to be inserted. New tasks always start as `Pending`.
#[derive(Debug, Clone)]
pub(crate) struct NewTask {
    name: String,
    description: String,
    priority: u8,
    estimate: Decimal,
}

impl NewTask {
    pub(crate) fn new(
        name: &str,
        description: &str,
        priority: i64,
        estimate: Decimal,
    ) -> Result<Self> {
        Ok(Self {
            name: form_field("Name", name)?,
            description: form_field("Description", description)?,
            priority: validate_priority(priority)?,
            estimate: ensure_non_negative("Estimate", estimate)?,
        })
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn description(&self) -> &str {
        &self.description
    }

    pub(crate) fn priority(&self) -> u8 {
        self.priority
    }

    pub(crate) fn estimate(&self) -> Decimal {
        self.estimate
    }

    pub(crate) fn status(&self) -> TaskStatus {
        TaskStatus::Pending
    }
}

/// Replacement values for an existing task. The creation timestamp is never touched.
#[derive(Debug, Clone)]
pub(crate) struct TaskUpdate {
    fields: NewTask,
    status: TaskStatus,
}

impl TaskUpdate {
    pub(crate) fn new(
        name: &str,
        description: &str,
        priority: i64,
        status: TaskStatus,
        estimate: Decimal,
    ) -> Result<Self> {
        Ok(Self {
            fields: NewTask::new(name, description, priority, estimate)?,
            status,
        })
    }

    /// Start from the current values of `task`.
    pub(crate) fn from_task(task: &Task) -> Self {
        Self {
            fields: NewTask {
                name: task.name.clone(),
                description: task.description.clone(),
                priority: task.priority,
                estimate: task.estimate,
            },
            status: task.status,
        }
    }

    pub(crate) fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    pub(crate) fn name(&self) -> &str {
        self.fields.name()
    }

    pub(crate) fn description(&self) -> &str {
        self.fields.description()
    }

    pub(crate) fn priority(&self) -> u8 {
        self.fields.priority()
    }

    pub(crate) fn estimate(&self) -> Decimal {
        self.fields.estimate()
    }

    pub(crate) fn status(&self) -> TaskStatus {
        self.status
    }
}

/// Required text that can round-trip through the task form.
fn form_field(field: &str, value: &str) -> Result<String> {
    let text = required_text(field, value)?;
    if text.contains(FIELD_SEPARATOR) {
        return Err(Error::validation(format!(
            "{field} cannot contain '{FIELD_SEPARATOR}'"
        )));
    }
    Ok(text)
}

pub(crate) fn validate_priority(priority: i64) -> Result<u8> {
    match u8::try_from(priority) {
        Ok(p) if (MIN_PRIORITY..=MAX_PRIORITY).contains(&i64::from(p)) => Ok(p),
        _ => Err(Error::validation(format!(
            "Priority must be between {MIN_PRIORITY} and {MAX_PRIORITY} (got {priority})"
        ))),
    }
}

/// How task lists are ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum TaskOrder {
    /// Most recently created first.
    #[default]
    Newest,
    /// Highest priority first, newest first within a priority.
    Priority,
}

impl TaskOrder {
    pub(crate) fn toggle(self) -> Self {
        match self {
            Self::Newest => Self::Priority,
            Self::Priority => Self::Newest,
        }
    }
}

impl std::fmt::Display for TaskOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Newest => write!(f, "newest"),
            Self::Priority => write!(f, "priority"),
        }
    }
}

/// Which tasks to list and in what order.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct TaskQuery {
    pub(crate) status: Option<TaskStatus>,
    pub(crate) order: TaskOrder,
}

impl TaskQuery {
    pub(crate) fn with_status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            order: TaskOrder::default(),
        }
    }
}
