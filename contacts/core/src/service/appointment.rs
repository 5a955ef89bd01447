use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::clock::Clock;
use crate::domain::{Appointment, AppointmentFields};
use crate::error::ServiceError;
use crate::service::Crud;
use crate::store::Store;
use crate::user::User;

/// CRUD and lookups over the acting user's appointments.
#[derive(Clone)]
pub struct AppointmentService {
    crud: Crud<Appointment>,
}

impl AppointmentService {
    pub fn new(store: Arc<dyn Store<Appointment>>, clock: Arc<dyn Clock>) -> Self {
        Self {
            crud: Crud::new(store, clock, "appointments"),
        }
    }

    #[tracing::instrument(
        skip(self, actor, appointment),
        fields(actor = actor.id(), id = appointment.appointment_id())
    )]
    pub fn add(&self, actor: &User, appointment: Appointment) -> Result<(), ServiceError> {
        self.crud.add(actor, appointment)
    }

    #[tracing::instrument(skip(self, actor), fields(actor = actor.id()))]
    pub fn delete(&self, actor: &User, appointment_id: &str) -> Result<bool, ServiceError> {
        self.crud.delete(actor, appointment_id)
    }

    /// Atomically replaces the date, description and links of an appointment.
    ///
    /// A date that differs from the stored one must not be in the past.
    #[tracing::instrument(skip(self, actor, fields), fields(actor = actor.id()))]
    pub fn update(
        &self,
        actor: &User,
        appointment_id: &str,
        fields: AppointmentFields,
    ) -> Result<bool, ServiceError> {
        self.crud.update(actor, appointment_id, fields)
    }

    /// Replaces date and description and clears both links.
    pub fn update_appointment(
        &self,
        actor: &User,
        appointment_id: &str,
        appointment_date: DateTime<Utc>,
        description: &str,
    ) -> Result<bool, ServiceError> {
        self.update(
            actor,
            appointment_id,
            AppointmentFields::new(appointment_date, description),
        )
    }

    #[tracing::instrument(skip(self, actor), fields(actor = actor.id()))]
    pub fn get_by_id(
        &self,
        actor: &User,
        appointment_id: &str,
    ) -> Result<Option<Appointment>, ServiceError> {
        self.crud.get_by_id(actor, appointment_id)
    }

    #[tracing::instrument(skip(self, actor), fields(actor = actor.id()))]
    pub fn get_all(&self, actor: &User) -> Result<Vec<Appointment>, ServiceError> {
        self.crud.get_all(actor)
    }

    #[tracing::instrument(skip(self, actor), fields(actor = actor.id()))]
    pub fn get_all_for_all_users(&self, actor: &User) -> Result<Vec<Appointment>, ServiceError> {
        self.crud.get_all_for_all_users(actor)
    }

    pub fn get_by_project_id(
        &self,
        actor: &User,
        project_id: &str,
    ) -> Result<Vec<Appointment>, ServiceError> {
        let project_id = project_id.trim();
        self.crud
            .filter(actor, |appointment| appointment.project_id() == Some(project_id))
    }

    pub fn get_by_task_id(&self, actor: &User, task_id: &str) -> Result<Vec<Appointment>, ServiceError> {
        let task_id = task_id.trim();
        self.crud
            .filter(actor, |appointment| appointment.task_id() == Some(task_id))
    }

    #[cfg(test)]
    pub(crate) fn clear(&self) -> Result<(), ServiceError> {
        self.crud.clear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::error::ValidationError;
    use crate::store::InMemoryStore;
    use crate::user::Role;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 9, 1, 10, 0, 0).unwrap()
    }

    fn setup() -> (AppointmentService, Arc<FixedClock>) {
        let clock = Arc::new(FixedClock::new(now()));
        let service =
            AppointmentService::new(Arc::new(InMemoryStore::<Appointment>::new()), clock.clone());
        (service, clock)
    }

    fn alice() -> User {
        User::new(1, "alice", "alice@example.com", Role::User).unwrap()
    }

    #[test]
    fn test_update_rejects_past_date_and_keeps_state() {
        // Arrange
        let (service, clock) = setup();
        let appointment =
            Appointment::new("A1", now() + Duration::days(1), "Kickoff", clock.as_ref()).unwrap();
        service.add(&alice(), appointment).unwrap();

        // Act
        let result =
            service.update_appointment(&alice(), "A1", now() - Duration::days(1), "Moved");

        // Assert
        assert_eq!(
            result,
            Err(ServiceError::Invalid(ValidationError::InPast {
                label: "appointmentDate"
            }))
        );
        let stored = service.get_by_id(&alice(), "A1").unwrap().unwrap();
        assert_eq!(stored.description(), "Kickoff");
        assert_eq!(stored.appointment_date(), now() + Duration::days(1));
    }

    #[test]
    fn test_lookups_by_link() {
        // Arrange
        let (service, clock) = setup();
        let clock = clock.as_ref();
        let linked = Appointment::with_fields(
            "A1",
            AppointmentFields::new(now(), "Review")
                .with_project_id("P1")
                .with_task_id("T1"),
            clock,
        )
        .unwrap();
        let unlinked = Appointment::new("A2", now(), "Lunch", clock).unwrap();
        service.add(&alice(), linked).unwrap();
        service.add(&alice(), unlinked).unwrap();

        // Act
        let by_project = service.get_by_project_id(&alice(), "P1").unwrap();
        let by_task = service.get_by_task_id(&alice(), " T1 ").unwrap();

        // Assert
        assert_eq!(by_project.len(), 1);
        assert_eq!(by_project[0].appointment_id(), "A1");
        assert_eq!(by_task.len(), 1);
        assert!(service.get_by_task_id(&alice(), "T2").unwrap().is_empty());
    }

    #[test]
    fn test_elapsed_appointments_are_still_readable() {
        // Arrange
        let (service, clock) = setup();
        service
            .add(&alice(), Appointment::new("A1", now(), "Kickoff", clock.as_ref()).unwrap())
            .unwrap();
        clock.advance(Duration::days(30));

        // Act
        let all = service.get_all(&alice());

        // Assert
        assert_eq!(all.unwrap().len(), 1);
    }

    #[test]
    fn test_clear_removes_every_appointment() {
        // Arrange
        let (service, clock) = setup();
        service
            .add(&alice(), Appointment::new("A1", now(), "Kickoff", clock.as_ref()).unwrap())
            .unwrap();

        // Act
        service.clear().unwrap();

        // Assert
        assert!(service.get_all(&alice()).unwrap().is_empty());
    }
}
