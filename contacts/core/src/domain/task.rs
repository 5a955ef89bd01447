use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::domain::Entity;
use crate::error::ValidationError;
use crate::validation::{self, MAX_DESCRIPTION_LENGTH, MAX_ID_LENGTH, MAX_TASK_NAME_LENGTH};

/// Where a task is in its lifecycle. Any status may be set from any other.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskStatus::Todo => write!(f, "TODO"),
            TaskStatus::InProgress => write!(f, "IN_PROGRESS"),
            TaskStatus::Done => write!(f, "DONE"),
        }
    }
}

/// A unit of work, optionally due on a date and linked to a project.
///
/// `created_at` is fixed when the task is created; `updated_at` is refreshed
/// from the injected clock on every successful mutation.
#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(rename_all = "camelCase", try_from = "TaskRecord")
)]
pub struct Task {
    task_id: String,
    name: String,
    description: String,
    status: TaskStatus,
    due_date: Option<NaiveDate>,
    project_id: Option<String>,
    assignee_id: Option<i64>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// New values for every mutable [`Task`] field.
///
/// A `None` status means [`TaskStatus::Todo`]; `None` links mean "not linked".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFields {
    pub name: String,
    pub description: String,
    pub status: Option<TaskStatus>,
    pub due_date: Option<NaiveDate>,
    pub project_id: Option<String>,
    pub assignee_id: Option<i64>,
}

impl TaskFields {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            status: None,
            due_date: None,
            project_id: None,
            assignee_id: None,
        }
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn with_project_id(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    pub fn with_assignee_id(mut self, assignee_id: i64) -> Self {
        self.assignee_id = Some(assignee_id);
        self
    }
}

/// A change applied to a stored task in one atomic step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskChange {
    /// Replace every mutable field.
    Replace(TaskFields),
    /// Replace name and description; status, due date and links are kept.
    Details { name: String, description: String },
}

impl From<TaskFields> for TaskChange {
    fn from(fields: TaskFields) -> Self {
        TaskChange::Replace(fields)
    }
}

/// Validated values ready to be assigned.
struct Normalized {
    name: String,
    description: String,
    status: TaskStatus,
    due_date: Option<NaiveDate>,
    project_id: Option<String>,
}

impl Task {
    /// Creates a `TODO` task with no due date and no links.
    pub fn new(
        task_id: &str,
        name: &str,
        description: &str,
        clock: &dyn Clock,
    ) -> Result<Self, ValidationError> {
        Task::with_fields(task_id, TaskFields::new(name, description), clock)
    }

    pub fn with_fields(
        task_id: &str,
        fields: TaskFields,
        clock: &dyn Clock,
    ) -> Result<Self, ValidationError> {
        let task_id = validation::validate_trimmed_length(task_id, "taskId", 1, MAX_ID_LENGTH)?;
        let due_date = validation::validate_optional_day_not_past(fields.due_date, "dueDate", clock)?;
        let normalized = normalize(&fields, due_date)?;
        let now = clock.now();
        Ok(Self {
            task_id,
            name: normalized.name,
            description: normalized.description,
            status: normalized.status,
            due_date: normalized.due_date,
            project_id: normalized.project_id,
            assignee_id: fields.assignee_id,
            created_at: now,
            updated_at: now,
        })
    }

    /// Rebuilds a task from previously accepted state.
    ///
    /// Structural rules are re-checked; the due date is not judged against the
    /// clock again and both timestamps are kept.
    pub(crate) fn restore(
        task_id: &str,
        fields: TaskFields,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let task_id = validation::validate_trimmed_length(task_id, "taskId", 1, MAX_ID_LENGTH)?;
        let normalized = normalize(&fields, fields.due_date)?;
        Ok(Self {
            task_id,
            name: normalized.name,
            description: normalized.description,
            status: normalized.status,
            due_date: normalized.due_date,
            project_id: normalized.project_id,
            assignee_id: fields.assignee_id,
            created_at,
            updated_at: updated_at.max(created_at),
        })
    }

    pub fn task_id(&self) -> &str {
        &self.task_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    pub fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    pub fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    pub fn assignee_id(&self) -> Option<i64> {
        self.assignee_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// True when the due date is strictly before `today` and the task is not done.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status != TaskStatus::Done && self.due_date.is_some_and(|due| due < today)
    }

    pub fn set_name(&mut self, name: &str, clock: &dyn Clock) -> Result<(), ValidationError> {
        self.name = normalize_name(name)?;
        self.touch(clock);
        Ok(())
    }

    pub fn set_description(
        &mut self,
        description: &str,
        clock: &dyn Clock,
    ) -> Result<(), ValidationError> {
        self.description = normalize_description(description)?;
        self.touch(clock);
        Ok(())
    }

    pub fn set_status(&mut self, status: TaskStatus, clock: &dyn Clock) {
        self.status = status;
        self.touch(clock);
    }

    pub fn set_due_date(
        &mut self,
        due_date: Option<NaiveDate>,
        clock: &dyn Clock,
    ) -> Result<(), ValidationError> {
        self.due_date = validation::validate_optional_day_not_past(due_date, "dueDate", clock)?;
        self.touch(clock);
        Ok(())
    }

    pub fn set_project_id(
        &mut self,
        project_id: Option<&str>,
        clock: &dyn Clock,
    ) -> Result<(), ValidationError> {
        self.project_id = validation::validate_optional_id(project_id, "projectId")?;
        self.touch(clock);
        Ok(())
    }

    pub fn set_assignee_id(&mut self, assignee_id: Option<i64>, clock: &dyn Clock) {
        self.assignee_id = assignee_id;
        self.touch(clock);
    }

    /// Replaces all mutable fields, or none of them if any value is invalid.
    ///
    /// A due date equal to the stored one is kept even if it has since passed.
    pub fn update(&mut self, fields: TaskFields, clock: &dyn Clock) -> Result<(), ValidationError> {
        let due_date = if fields.due_date == self.due_date {
            self.due_date
        } else {
            validation::validate_optional_day_not_past(fields.due_date, "dueDate", clock)?
        };
        let normalized = normalize(&fields, due_date)?;

        self.name = normalized.name;
        self.description = normalized.description;
        self.status = normalized.status;
        self.due_date = normalized.due_date;
        self.project_id = normalized.project_id;
        self.assignee_id = fields.assignee_id;
        self.touch(clock);
        Ok(())
    }

    /// Replaces name and description together, or neither if one is invalid.
    pub fn update_details(
        &mut self,
        name: &str,
        description: &str,
        clock: &dyn Clock,
    ) -> Result<(), ValidationError> {
        let name = normalize_name(name)?;
        let description = normalize_description(description)?;
        self.name = name;
        self.description = description;
        self.touch(clock);
        Ok(())
    }

    pub fn copy(&self) -> Result<Self, ValidationError> {
        if self.task_id.is_empty() || self.name.is_empty() || self.description.is_empty() {
            return Err(ValidationError::CorruptCopySource { entity: "task" });
        }
        Task::restore(
            &self.task_id,
            TaskFields {
                name: self.name.clone(),
                description: self.description.clone(),
                status: Some(self.status),
                due_date: self.due_date,
                project_id: self.project_id.clone(),
                assignee_id: self.assignee_id,
            },
            self.created_at,
            self.updated_at,
        )
    }

    fn touch(&mut self, clock: &dyn Clock) {
        self.updated_at = clock.now().max(self.updated_at);
    }
}

impl Entity for Task {
    type Fields = TaskChange;

    const KIND: &'static str = "Task";
    const ID_LABEL: &'static str = "taskId";

    fn id(&self) -> &str {
        &self.task_id
    }

    fn apply(&mut self, change: TaskChange, clock: &dyn Clock) -> Result<(), ValidationError> {
        match change {
            TaskChange::Replace(fields) => self.update(fields, clock),
            TaskChange::Details { name, description } => {
                self.update_details(&name, &description, clock)
            }
        }
    }

    fn copy(&self) -> Result<Self, ValidationError> {
        Task::copy(self)
    }
}

fn normalize(fields: &TaskFields, due_date: Option<NaiveDate>) -> Result<Normalized, ValidationError> {
    Ok(Normalized {
        name: normalize_name(&fields.name)?,
        description: normalize_description(&fields.description)?,
        status: fields.status.unwrap_or_default(),
        due_date,
        project_id: validation::validate_optional_id(fields.project_id.as_deref(), "projectId")?,
    })
}

fn normalize_name(name: &str) -> Result<String, ValidationError> {
    validation::validate_trimmed_length(name, "name", 1, MAX_TASK_NAME_LENGTH)
}

fn normalize_description(description: &str) -> Result<String, ValidationError> {
    validation::validate_trimmed_length(description, "description", 1, MAX_DESCRIPTION_LENGTH)
}

#[cfg(feature = "serde")]
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TaskRecord {
    task_id: String,
    name: String,
    description: String,
    #[serde(default)]
    status: Option<TaskStatus>,
    #[serde(default)]
    due_date: Option<NaiveDate>,
    #[serde(default)]
    project_id: Option<String>,
    #[serde(default)]
    assignee_id: Option<i64>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[cfg(feature = "serde")]
impl TryFrom<TaskRecord> for Task {
    type Error = ValidationError;

    fn try_from(record: TaskRecord) -> Result<Self, Self::Error> {
        Task::restore(
            &record.task_id,
            TaskFields {
                name: record.name,
                description: record.description,
                status: record.status,
                due_date: record.due_date,
                project_id: record.project_id,
                assignee_id: record.assignee_id,
            },
            record.created_at,
            record.updated_at,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::{Duration, TimeZone};

    fn clock() -> FixedClock {
        FixedClock::new(Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap())
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_new_task_defaults_to_todo_and_stamps_creation() {
        // Arrange
        let clock = clock();

        // Act
        let task = Task::new(" 1 ", " Write report ", " Quarterly numbers ", &clock).unwrap();

        // Assert
        assert_eq!(task.task_id(), "1");
        assert_eq!(task.name(), "Write report");
        assert_eq!(task.description(), "Quarterly numbers");
        assert_eq!(task.status(), TaskStatus::Todo);
        assert_eq!(task.due_date(), None);
        assert_eq!(task.created_at(), clock.now());
        assert_eq!(task.updated_at(), clock.now());
    }

    #[test]
    fn test_name_bounds_are_inclusive() {
        // Arrange
        let clock = clock();

        // Act
        assert!(Task::new("1", &"n".repeat(20), "d", &clock).is_ok());
        let error = Task::new("1", &"n".repeat(21), "d", &clock).unwrap_err();

        // Assert
        assert_eq!(error.to_string(), "name length must be between 1 and 20");
    }

    #[test]
    fn test_description_bounds_are_inclusive() {
        // Arrange
        let clock = clock();

        // Act
        assert!(Task::new("1", "n", &"d".repeat(50), &clock).is_ok());
        let error = Task::new("1", "n", &"d".repeat(51), &clock).unwrap_err();

        // Assert
        assert_eq!(error.to_string(), "description length must be between 1 and 50");
    }

    #[test]
    fn test_due_date_today_is_accepted_and_yesterday_rejected() {
        // Arrange
        let clock = clock();

        // Act
        let today = Task::with_fields(
            "1",
            TaskFields::new("n", "d").with_due_date(day(2025, 3, 1)),
            &clock,
        );
        let yesterday = Task::with_fields(
            "2",
            TaskFields::new("n", "d").with_due_date(day(2025, 2, 28)),
            &clock,
        );

        // Assert
        assert!(today.is_ok());
        assert_eq!(
            yesterday.unwrap_err().to_string(),
            "dueDate must not be in the past"
        );
    }

    #[test]
    fn test_setters_advance_updated_at_but_not_created_at() {
        // Arrange
        let clock = clock();
        let mut task = Task::new("1", "n", "d", &clock).unwrap();
        let created = task.created_at();

        // Act
        clock.advance(Duration::minutes(5));
        task.set_status(TaskStatus::InProgress, &clock);

        // Assert
        assert_eq!(task.status(), TaskStatus::InProgress);
        assert_eq!(task.created_at(), created);
        assert_eq!(task.updated_at(), created + Duration::minutes(5));
    }

    #[test]
    fn test_status_may_jump_directly_from_done_to_todo() {
        // Arrange
        let clock = clock();
        let mut task = Task::with_fields(
            "1",
            TaskFields::new("n", "d").with_status(TaskStatus::Done),
            &clock,
        )
        .unwrap();

        // Act
        task.set_status(TaskStatus::Todo, &clock);

        // Assert
        assert_eq!(task.status(), TaskStatus::Todo);
    }

    #[test]
    fn test_update_with_missing_status_defaults_to_todo() {
        // Arrange
        let clock = clock();
        let mut task = Task::with_fields(
            "1",
            TaskFields::new("n", "d").with_status(TaskStatus::Done),
            &clock,
        )
        .unwrap();

        // Act
        task.update(TaskFields::new("n2", "d2"), &clock).unwrap();

        // Assert
        assert_eq!(task.status(), TaskStatus::Todo);
        assert_eq!(task.name(), "n2");
    }

    #[test]
    fn test_update_with_one_invalid_field_changes_nothing() {
        // Arrange
        let clock = clock();
        let mut task = Task::with_fields(
            "1",
            TaskFields::new("name", "desc")
                .with_status(TaskStatus::InProgress)
                .with_project_id("P1")
                .with_assignee_id(9),
            &clock,
        )
        .unwrap();
        let before = task.copy().unwrap();
        clock.advance(Duration::hours(1));

        // Act
        let result = task.update(
            TaskFields::new("new name", "new desc")
                .with_status(TaskStatus::Done)
                .with_project_id("PROJECT-ID-TOO-LONG"),
            &clock,
        );

        // Assert
        assert_eq!(
            result,
            Err(ValidationError::Length {
                label: "projectId",
                min: 1,
                max: 10
            })
        );
        assert_eq!(task, before);
    }

    #[test]
    fn test_update_details_keeps_status_due_date_and_links() {
        // Arrange
        let clock = clock();
        let mut task = Task::with_fields(
            "1",
            TaskFields::new("n", "d")
                .with_status(TaskStatus::InProgress)
                .with_due_date(day(2025, 3, 2))
                .with_project_id("P1")
                .with_assignee_id(7),
            &clock,
        )
        .unwrap();
        clock.advance(Duration::days(3));

        // Act
        let rejected = task.apply(
            TaskChange::Details {
                name: "renamed".to_string(),
                description: " ".to_string(),
            },
            &clock,
        );
        let accepted = task.apply(
            TaskChange::Details {
                name: " renamed ".to_string(),
                description: "d2".to_string(),
            },
            &clock,
        );

        // Assert
        assert_eq!(
            rejected,
            Err(ValidationError::Blank {
                label: "description"
            })
        );
        assert_eq!(accepted, Ok(()));
        assert_eq!(task.name(), "renamed");
        assert_eq!(task.description(), "d2");
        assert_eq!(task.status(), TaskStatus::InProgress);
        assert_eq!(task.due_date(), Some(day(2025, 3, 2)));
        assert_eq!(task.project_id(), Some("P1"));
        assert_eq!(task.assignee_id(), Some(7));
        assert_eq!(task.updated_at(), clock.now());
    }

    #[test]
    fn test_update_keeps_an_unchanged_due_date_that_has_passed() {
        // Arrange
        let clock = clock();
        let mut task = Task::with_fields(
            "1",
            TaskFields::new("n", "d").with_due_date(day(2025, 3, 2)),
            &clock,
        )
        .unwrap();
        clock.advance(Duration::days(3));

        // Act
        let kept = task.update(
            TaskFields::new("renamed", "d").with_due_date(day(2025, 3, 2)),
            &clock,
        );
        let moved = task.update(
            TaskFields::new("renamed", "d").with_due_date(day(2025, 3, 3)),
            &clock,
        );

        // Assert
        assert_eq!(kept, Ok(()));
        assert_eq!(moved, Err(ValidationError::InPast { label: "dueDate" }));
        assert_eq!(task.due_date(), Some(day(2025, 3, 2)));
    }

    #[test]
    fn test_overdue_requires_past_due_date_and_open_status() {
        // Arrange
        let clock = clock();
        let mut task = Task::with_fields(
            "1",
            TaskFields::new("n", "d").with_due_date(day(2025, 3, 5)),
            &clock,
        )
        .unwrap();
        assert!(!task.is_overdue(day(2025, 3, 5)));
        assert!(task.is_overdue(day(2025, 3, 6)));

        // Act
        task.set_status(TaskStatus::Done, &clock);

        // Assert
        assert!(!task.is_overdue(day(2025, 3, 6)));
    }

    #[test]
    fn test_copy_preserves_timestamps_and_is_independent() {
        // Arrange
        let clock = clock();
        let original = Task::new("1", "n", "d", &clock).unwrap();
        clock.advance(Duration::days(1));

        // Act
        let mut copy = original.copy().unwrap();
        copy.set_name("changed", &clock).unwrap();

        // Assert
        assert_eq!(original.name(), "n");
        assert_eq!(copy.created_at(), original.created_at());
        assert!(copy.updated_at() > original.updated_at());
    }

    #[test]
    fn test_copy_rejects_corrupted_state() {
        // Arrange
        let clock = clock();
        let mut task = Task::new("1", "n", "d", &clock).unwrap();
        task.description.clear();

        // Act
        let error = task.copy().unwrap_err();

        // Assert
        assert_eq!(error.to_string(), "task copy source must not be null");
    }
}
