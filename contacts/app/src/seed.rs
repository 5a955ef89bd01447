//! Startup data loaded from YAML.
//!
//! Every record goes through the services, so a seed file is held to exactly
//! the same rules as any other caller. Task due dates and appointment times
//! may be given relative to the clock so a checked-in seed file never ages
//! into the past.

use std::path::Path;

use anyhow::{Context, bail};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use contacts_core::{
    Appointment, AppointmentFields, Clock, Contact, Project, ServiceError, Services, Task,
    TaskFields, TaskStatus, User,
};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Seed {
    pub contacts: Vec<Contact>,
    pub projects: Vec<Project>,
    pub tasks: Vec<SeedTask>,
    pub appointments: Vec<SeedAppointment>,
    pub links: Vec<SeedLink>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedTask {
    pub task_id: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub status: Option<TaskStatus>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    /// Due this many days after the clock's current day.
    #[serde(default)]
    pub due_in_days: Option<i64>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub assignee_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedAppointment {
    pub appointment_id: String,
    #[serde(default)]
    pub appointment_date: Option<DateTime<Utc>>,
    /// Starts this many hours after the clock's current instant.
    #[serde(default)]
    pub in_hours: Option<i64>,
    pub description: String,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub task_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedLink {
    pub project_id: String,
    pub contact_id: String,
    #[serde(default)]
    pub role: Option<String>,
}

/// How many records of each kind were added, and how many already existed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub contacts: usize,
    pub projects: usize,
    pub tasks: usize,
    pub appointments: usize,
    pub links: usize,
    pub skipped: usize,
}

impl Seed {
    pub fn from_yaml(yaml: &str) -> anyhow::Result<Self> {
        serde_yaml::from_str(yaml).context("Invalid seed YAML")
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read seed file {}", path.display()))?;
        Seed::from_yaml(&yaml)
    }

    /// Adds every record on behalf of `owner`.
    ///
    /// Records whose id is already taken are skipped with a warning. Any other
    /// failure aborts the seed.
    #[tracing::instrument(skip(self, services, owner), fields(owner = owner.id()))]
    pub fn apply(self, services: &Services, owner: &User) -> anyhow::Result<SeedReport> {
        let clock = services.clock();
        let mut report = SeedReport::default();

        for contact in self.contacts {
            let id = contact.contact_id().to_string();
            if added(services.contacts.add(owner, contact), "contact", &id, &mut report)? {
                report.contacts += 1;
            }
        }

        for project in self.projects {
            let id = project.project_id().to_string();
            if added(services.projects.add(owner, project), "project", &id, &mut report)? {
                report.projects += 1;
            }
        }

        for seed in self.tasks {
            let task = seed
                .into_task(clock)
                .context("Invalid task in seed")?;
            let id = task.task_id().to_string();
            if added(services.tasks.add(owner, task), "task", &id, &mut report)? {
                report.tasks += 1;
            }
        }

        for seed in self.appointments {
            let appointment = seed
                .into_appointment(clock)
                .context("Invalid appointment in seed")?;
            let id = appointment.appointment_id().to_string();
            if added(
                services.appointments.add(owner, appointment),
                "appointment",
                &id,
                &mut report,
            )? {
                report.appointments += 1;
            }
        }

        for link in self.links {
            let linked = services
                .projects
                .add_contact_to_project(
                    owner,
                    &link.project_id,
                    &link.contact_id,
                    link.role.as_deref(),
                )
                .with_context(|| {
                    format!(
                        "Failed to link contact {} to project {}",
                        link.contact_id, link.project_id
                    )
                })?;
            if linked {
                report.links += 1;
            } else {
                report.skipped += 1;
            }
        }

        tracing::info!(?report, "Seed applied");
        Ok(report)
    }
}

impl SeedTask {
    fn into_task(self, clock: &dyn Clock) -> anyhow::Result<Task> {
        let due_date = match (self.due_date, self.due_in_days) {
            (Some(_), Some(_)) => bail!("task {}: give dueDate or dueInDays, not both", self.task_id),
            (Some(date), None) => Some(date),
            (None, Some(days)) => Some(
                Duration::try_days(days)
                    .and_then(|offset| clock.today().checked_add_signed(offset))
                    .with_context(|| format!("task {}: dueInDays {} is out of range", self.task_id, days))?,
            ),
            (None, None) => None,
        };
        let fields = TaskFields {
            name: self.name,
            description: self.description,
            status: self.status,
            due_date,
            project_id: self.project_id,
            assignee_id: self.assignee_id,
        };
        Task::with_fields(&self.task_id, fields, clock)
            .with_context(|| format!("task {}", self.task_id))
    }
}

impl SeedAppointment {
    fn into_appointment(self, clock: &dyn Clock) -> anyhow::Result<Appointment> {
        let appointment_date = match (self.appointment_date, self.in_hours) {
            (Some(_), Some(_)) => bail!(
                "appointment {}: give appointmentDate or inHours, not both",
                self.appointment_id
            ),
            (Some(date), None) => Some(date),
            (None, Some(hours)) => Some(
                Duration::try_hours(hours)
                    .and_then(|offset| clock.now().checked_add_signed(offset))
                    .with_context(|| {
                        format!(
                            "appointment {}: inHours {} is out of range",
                            self.appointment_id, hours
                        )
                    })?,
            ),
            (None, None) => None,
        };
        let fields = AppointmentFields {
            appointment_date,
            description: self.description,
            project_id: self.project_id,
            task_id: self.task_id,
        };
        Appointment::with_fields(&self.appointment_id, fields, clock)
            .with_context(|| format!("appointment {}", self.appointment_id))
    }
}

/// `Ok(true)` when the record was added, `Ok(false)` when its id was taken.
fn added(
    result: Result<(), ServiceError>,
    what: &str,
    id: &str,
    report: &mut SeedReport,
) -> anyhow::Result<bool> {
    match result {
        Ok(()) => Ok(true),
        Err(ServiceError::Duplicate { .. }) => {
            tracing::warn!("Skipped existing {} {}", what, id);
            report.skipped += 1;
            Ok(false)
        }
        Err(error) => Err(error).with_context(|| format!("Failed to add {} {}", what, id)),
    }
}
