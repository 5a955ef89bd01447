//! Thread-safe CRUD services over the [`Store`] seam.
//!
//! Every operation is made on behalf of an acting [`User`] and only sees that
//! user's entities, except the admin-only `get_all_for_all_users` listings.
//! All reads hand out fresh copies; nothing a caller receives aliases stored state.

mod appointment;
mod contact;
mod project;
mod task;

pub use appointment::AppointmentService;
pub use contact::ContactService;
pub use project::ProjectService;
pub use task::TaskService;

use std::sync::Arc;

use tracing::{debug, warn};

use crate::clock::Clock;
use crate::domain::{Appointment, Contact, Entity, Project, Task};
use crate::error::{ServiceError, StoreError};
use crate::store::{InMemoryLinkStore, InMemoryStore, LinkStore, Store};
use crate::user::User;
use crate::validation;

/// The operations every entity service shares, written once against [`Entity`].
pub(crate) struct Crud<E: Entity> {
    store: Arc<dyn Store<E>>,
    clock: Arc<dyn Clock>,
    /// Plural used in access-denied messages, e.g. `contacts`.
    plural: &'static str,
}

impl<E: Entity> Clone for Crud<E> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            clock: Arc::clone(&self.clock),
            plural: self.plural,
        }
    }
}

impl<E: Entity> Crud<E> {
    pub(crate) fn new(store: Arc<dyn Store<E>>, clock: Arc<dyn Clock>, plural: &'static str) -> Self {
        Self {
            store,
            clock,
            plural,
        }
    }

    pub(crate) fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub(crate) fn add(&self, actor: &User, entity: E) -> Result<(), ServiceError> {
        match self.store.save(actor, entity) {
            Ok(()) => Ok(()),
            Err(StoreError::Duplicate { kind, id }) => {
                warn!(kind, id = %id, actor = actor.id(), "Rejected duplicate id");
                Err(ServiceError::Duplicate { kind, id })
            }
            Err(error) => Err(error.into()),
        }
    }

    pub(crate) fn delete(&self, actor: &User, id: &str) -> Result<bool, ServiceError> {
        let id = normalize_id::<E>(id)?;
        let deleted = self.store.delete_by_id(actor, &id)?;
        if !deleted {
            debug!(kind = E::KIND, id = %id, "Nothing to delete");
        }
        Ok(deleted)
    }

    pub(crate) fn update(&self, actor: &User, id: &str, fields: E::Fields) -> Result<bool, ServiceError> {
        let id = normalize_id::<E>(id)?;
        let updated = self.store.update(actor, &id, fields, self.clock.as_ref())?;
        if !updated {
            debug!(kind = E::KIND, id = %id, "Nothing to update");
        }
        Ok(updated)
    }

    pub(crate) fn get_by_id(&self, actor: &User, id: &str) -> Result<Option<E>, ServiceError> {
        let id = normalize_id::<E>(id)?;
        Ok(self.store.find_by_id(actor, &id)?)
    }

    pub(crate) fn exists(&self, actor: &User, id: &str) -> Result<bool, ServiceError> {
        let id = normalize_id::<E>(id)?;
        Ok(self.store.exists_by_id(actor, &id)?)
    }

    pub(crate) fn get_all(&self, actor: &User) -> Result<Vec<E>, ServiceError> {
        Ok(self.store.find_all(actor)?)
    }

    pub(crate) fn get_all_for_all_users(&self, actor: &User) -> Result<Vec<E>, ServiceError> {
        if !actor.is_admin() {
            warn!(actor = actor.id(), what = self.plural, "Denied all-users listing");
            return Err(ServiceError::AccessDenied { what: self.plural });
        }
        Ok(self.store.find_all_owners()?)
    }

    /// The acting user's entities that satisfy `keep`.
    pub(crate) fn filter(
        &self,
        actor: &User,
        keep: impl Fn(&E) -> bool,
    ) -> Result<Vec<E>, ServiceError> {
        Ok(self
            .store
            .find_all(actor)?
            .into_iter()
            .filter(|entity| keep(entity))
            .collect())
    }

    #[cfg(test)]
    pub(crate) fn clear(&self) -> Result<(), ServiceError> {
        Ok(self.store.delete_all()?)
    }
}

/// Ids passed to services are checked for blankness and trimmed.
fn normalize_id<E: Entity>(id: &str) -> Result<String, ServiceError> {
    validation::validate_not_blank(id, E::ID_LABEL)?;
    Ok(id.trim().to_string())
}

/// Owns one store per entity type, the link store and the clock, and wires
/// the four services over them.
///
/// Clones share the same stores.
#[derive(Clone)]
pub struct Services {
    pub contacts: ContactService,
    pub tasks: TaskService,
    pub appointments: AppointmentService,
    pub projects: ProjectService,
    clock: Arc<dyn Clock>,
}

impl Services {
    /// Builds every service over process-local in-memory stores.
    pub fn in_memory(clock: Arc<dyn Clock>) -> Self {
        Services::new(
            Arc::new(InMemoryStore::<Contact>::new()),
            Arc::new(InMemoryStore::<Task>::new()),
            Arc::new(InMemoryStore::<Appointment>::new()),
            Arc::new(InMemoryStore::<Project>::new()),
            Arc::new(InMemoryLinkStore::new()),
            clock,
        )
    }

    pub fn new(
        contacts: Arc<dyn Store<Contact>>,
        tasks: Arc<dyn Store<Task>>,
        appointments: Arc<dyn Store<Appointment>>,
        projects: Arc<dyn Store<Project>>,
        links: Arc<dyn LinkStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let contacts = ContactService::new(contacts, clock.clone()).with_links(links.clone());
        Self {
            projects: ProjectService::new(projects, contacts.clone(), links, clock.clone()),
            tasks: TaskService::new(tasks, clock.clone()),
            appointments: AppointmentService::new(appointments, clock.clone()),
            contacts,
            clock,
        }
    }

    /// The clock every service validates against.
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }
}
