use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::domain::Entity;
use crate::error::ValidationError;
use crate::validation::{
    self, MAX_ID_LENGTH, MAX_PROJECT_DESCRIPTION_LENGTH, MAX_PROJECT_NAME_LENGTH,
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum ProjectStatus {
    #[default]
    Active,
    OnHold,
    Completed,
    Archived,
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectStatus::Active => write!(f, "ACTIVE"),
            ProjectStatus::OnHold => write!(f, "ON_HOLD"),
            ProjectStatus::Completed => write!(f, "COMPLETED"),
            ProjectStatus::Archived => write!(f, "ARCHIVED"),
        }
    }
}

/// A body of work grouping tasks, appointments and contacts.
///
/// Unlike every other text field in the domain, the description may be empty.
#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(rename_all = "camelCase", try_from = "ProjectRecord")
)]
pub struct Project {
    project_id: String,
    name: String,
    description: String,
    status: ProjectStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectFields {
    pub name: String,
    pub description: String,
    pub status: Option<ProjectStatus>,
}

impl ProjectFields {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        status: ProjectStatus,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            status: Some(status),
        }
    }
}

impl Project {
    pub fn new(
        project_id: &str,
        name: &str,
        description: &str,
        status: ProjectStatus,
    ) -> Result<Self, ValidationError> {
        let project_id =
            validation::validate_trimmed_length(project_id, "projectId", 1, MAX_ID_LENGTH)?;
        Ok(Self {
            project_id,
            name: normalize_name(name)?,
            description: normalize_description(description)?,
            status,
        })
    }

    pub fn with_fields(project_id: &str, fields: ProjectFields) -> Result<Self, ValidationError> {
        let status = validation::validate_not_null(fields.status, "status")?;
        Project::new(project_id, &fields.name, &fields.description, status)
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn status(&self) -> ProjectStatus {
        self.status
    }

    pub fn set_name(&mut self, name: &str) -> Result<(), ValidationError> {
        self.name = normalize_name(name)?;
        Ok(())
    }

    pub fn set_description(&mut self, description: &str) -> Result<(), ValidationError> {
        self.description = normalize_description(description)?;
        Ok(())
    }

    pub fn set_status(&mut self, status: ProjectStatus) {
        self.status = status;
    }

    /// Replaces all mutable fields, or none of them if any value is invalid.
    pub fn update(&mut self, fields: ProjectFields) -> Result<(), ValidationError> {
        let name = normalize_name(&fields.name)?;
        let description = normalize_description(&fields.description)?;
        let status = validation::validate_not_null(fields.status, "status")?;

        self.name = name;
        self.description = description;
        self.status = status;
        Ok(())
    }

    pub fn copy(&self) -> Result<Self, ValidationError> {
        if self.project_id.is_empty() || self.name.is_empty() {
            return Err(ValidationError::CorruptCopySource { entity: "project" });
        }
        Project::new(&self.project_id, &self.name, &self.description, self.status)
    }
}

impl Entity for Project {
    type Fields = ProjectFields;

    const KIND: &'static str = "Project";
    const ID_LABEL: &'static str = "projectId";

    fn id(&self) -> &str {
        &self.project_id
    }

    fn apply(&mut self, fields: ProjectFields, _clock: &dyn Clock) -> Result<(), ValidationError> {
        self.update(fields)
    }

    fn copy(&self) -> Result<Self, ValidationError> {
        Project::copy(self)
    }
}

fn normalize_name(name: &str) -> Result<String, ValidationError> {
    validation::validate_trimmed_length(name, "name", 1, MAX_PROJECT_NAME_LENGTH)
}

fn normalize_description(description: &str) -> Result<String, ValidationError> {
    validation::validate_trimmed_length_allow_blank(
        description,
        "description",
        0,
        MAX_PROJECT_DESCRIPTION_LENGTH,
    )
}

#[cfg(feature = "serde")]
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectRecord {
    project_id: String,
    name: String,
    #[serde(default)]
    description: String,
    status: Option<ProjectStatus>,
}

#[cfg(feature = "serde")]
impl TryFrom<ProjectRecord> for Project {
    type Error = ValidationError;

    fn try_from(record: ProjectRecord) -> Result<Self, Self::Error> {
        Project::with_fields(
            &record.project_id,
            ProjectFields {
                name: record.name,
                description: record.description,
                status: record.status,
            },
        )
    }
}
