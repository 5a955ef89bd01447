use chrono::{DateTime, Utc};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::domain::Entity;
use crate::error::ValidationError;
use crate::validation::{self, MAX_DESCRIPTION_LENGTH, MAX_ID_LENGTH};

/// A scheduled meeting, optionally tied to a project and a task.
///
/// The date must not be in the past when it is set. `DateTime<Utc>` is `Copy`,
/// so callers always receive their own value and can never alias the stored one.
#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(rename_all = "camelCase", try_from = "AppointmentRecord")
)]
pub struct Appointment {
    appointment_id: String,
    appointment_date: DateTime<Utc>,
    description: String,
    project_id: Option<String>,
    task_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppointmentFields {
    pub appointment_date: Option<DateTime<Utc>>,
    pub description: String,
    pub project_id: Option<String>,
    pub task_id: Option<String>,
}

impl AppointmentFields {
    pub fn new(appointment_date: DateTime<Utc>, description: impl Into<String>) -> Self {
        Self {
            appointment_date: Some(appointment_date),
            description: description.into(),
            project_id: None,
            task_id: None,
        }
    }

    pub fn with_project_id(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    pub fn with_task_id(mut self, task_id: impl Into<String>) -> Self {
        self.task_id = Some(task_id.into());
        self
    }
}

impl Appointment {
    pub fn new(
        appointment_id: &str,
        appointment_date: DateTime<Utc>,
        description: &str,
        clock: &dyn Clock,
    ) -> Result<Self, ValidationError> {
        Appointment::with_fields(
            appointment_id,
            AppointmentFields::new(appointment_date, description),
            clock,
        )
    }

    pub fn with_fields(
        appointment_id: &str,
        fields: AppointmentFields,
        clock: &dyn Clock,
    ) -> Result<Self, ValidationError> {
        let appointment_id = normalize_id(appointment_id)?;
        let appointment_date =
            validation::validate_date_not_past(fields.appointment_date, "appointmentDate", clock)?;
        Appointment::assemble(appointment_id, appointment_date, &fields)
    }

    /// Rebuilds an appointment from previously accepted state without judging
    /// its date against the clock.
    pub(crate) fn restore(
        appointment_id: &str,
        fields: AppointmentFields,
    ) -> Result<Self, ValidationError> {
        let appointment_id = normalize_id(appointment_id)?;
        let appointment_date =
            validation::validate_not_null(fields.appointment_date, "appointmentDate")?;
        Appointment::assemble(appointment_id, appointment_date, &fields)
    }

    fn assemble(
        appointment_id: String,
        appointment_date: DateTime<Utc>,
        fields: &AppointmentFields,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            appointment_id,
            appointment_date,
            description: normalize_description(&fields.description)?,
            project_id: validation::validate_optional_id(fields.project_id.as_deref(), "projectId")?,
            task_id: validation::validate_optional_id(fields.task_id.as_deref(), "taskId")?,
        })
    }

    pub fn appointment_id(&self) -> &str {
        &self.appointment_id
    }

    pub fn appointment_date(&self) -> DateTime<Utc> {
        self.appointment_date
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    pub fn task_id(&self) -> Option<&str> {
        self.task_id.as_deref()
    }

    pub fn set_appointment_date(
        &mut self,
        appointment_date: DateTime<Utc>,
        clock: &dyn Clock,
    ) -> Result<(), ValidationError> {
        self.appointment_date =
            validation::validate_date_not_past(Some(appointment_date), "appointmentDate", clock)?;
        Ok(())
    }

    pub fn set_description(&mut self, description: &str) -> Result<(), ValidationError> {
        self.description = normalize_description(description)?;
        Ok(())
    }

    pub fn set_project_id(&mut self, project_id: Option<&str>) -> Result<(), ValidationError> {
        self.project_id = validation::validate_optional_id(project_id, "projectId")?;
        Ok(())
    }

    pub fn set_task_id(&mut self, task_id: Option<&str>) -> Result<(), ValidationError> {
        self.task_id = validation::validate_optional_id(task_id, "taskId")?;
        Ok(())
    }

    /// Replaces all mutable fields, or none of them if any value is invalid.
    ///
    /// An unchanged date is kept even if it has since passed.
    pub fn update(
        &mut self,
        fields: AppointmentFields,
        clock: &dyn Clock,
    ) -> Result<(), ValidationError> {
        let appointment_date = if fields.appointment_date == Some(self.appointment_date) {
            self.appointment_date
        } else {
            validation::validate_date_not_past(fields.appointment_date, "appointmentDate", clock)?
        };
        let description = normalize_description(&fields.description)?;
        let project_id = validation::validate_optional_id(fields.project_id.as_deref(), "projectId")?;
        let task_id = validation::validate_optional_id(fields.task_id.as_deref(), "taskId")?;

        self.appointment_date = appointment_date;
        self.description = description;
        self.project_id = project_id;
        self.task_id = task_id;
        Ok(())
    }

    pub fn copy(&self) -> Result<Self, ValidationError> {
        if self.appointment_id.is_empty() || self.description.is_empty() {
            return Err(ValidationError::CorruptCopySource {
                entity: "appointment",
            });
        }
        Appointment::restore(
            &self.appointment_id,
            AppointmentFields {
                appointment_date: Some(self.appointment_date),
                description: self.description.clone(),
                project_id: self.project_id.clone(),
                task_id: self.task_id.clone(),
            },
        )
    }
}

impl Entity for Appointment {
    type Fields = AppointmentFields;

    const KIND: &'static str = "Appointment";
    const ID_LABEL: &'static str = "appointmentId";

    fn id(&self) -> &str {
        &self.appointment_id
    }

    fn apply(
        &mut self,
        fields: AppointmentFields,
        clock: &dyn Clock,
    ) -> Result<(), ValidationError> {
        self.update(fields, clock)
    }

    fn copy(&self) -> Result<Self, ValidationError> {
        Appointment::copy(self)
    }
}

fn normalize_id(appointment_id: &str) -> Result<String, ValidationError> {
    validation::validate_trimmed_length(appointment_id, "appointmentId", 1, MAX_ID_LENGTH)
}

fn normalize_description(description: &str) -> Result<String, ValidationError> {
    validation::validate_trimmed_length(description, "description", 1, MAX_DESCRIPTION_LENGTH)
}

#[cfg(feature = "serde")]
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppointmentRecord {
    appointment_id: String,
    appointment_date: Option<DateTime<Utc>>,
    description: String,
    #[serde(default)]
    project_id: Option<String>,
    #[serde(default)]
    task_id: Option<String>,
}

#[cfg(feature = "serde")]
impl TryFrom<AppointmentRecord> for Appointment {
    type Error = ValidationError;

    fn try_from(record: AppointmentRecord) -> Result<Self, Self::Error> {
        Appointment::restore(
            &record.appointment_id,
            AppointmentFields {
                appointment_date: record.appointment_date,
                description: record.description,
                project_id: record.project_id,
                task_id: record.task_id,
            },
        )
    }
}
