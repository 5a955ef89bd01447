use std::sync::Arc;

use crate::clock::Clock;
use crate::domain::{Contact, ContactFields};
use crate::error::ServiceError;
use crate::service::Crud;
use crate::store::{LinkStore, Store};
use crate::user::User;

/// CRUD over the acting user's contacts.
#[derive(Clone)]
pub struct ContactService {
    crud: Crud<Contact>,
    links: Option<Arc<dyn LinkStore>>,
}

impl ContactService {
    pub fn new(store: Arc<dyn Store<Contact>>, clock: Arc<dyn Clock>) -> Self {
        Self {
            crud: Crud::new(store, clock, "contacts"),
            links: None,
        }
    }

    /// Drops a contact's project memberships whenever the contact is deleted.
    pub fn with_links(mut self, links: Arc<dyn LinkStore>) -> Self {
        self.links = Some(links);
        self
    }

    /// Adds a contact owned by `actor`.
    ///
    /// # Errors
    ///
    /// [`ServiceError::Duplicate`] when `actor` already has a contact with this id.
    /// The stored contact is not touched.
    #[tracing::instrument(skip(self, actor, contact), fields(actor = actor.id(), id = contact.contact_id()))]
    pub fn add(&self, actor: &User, contact: Contact) -> Result<(), ServiceError> {
        self.crud.add(actor, contact)
    }

    /// Deletes a contact, returning whether one was removed.
    #[tracing::instrument(skip(self, actor), fields(actor = actor.id()))]
    pub fn delete(&self, actor: &User, contact_id: &str) -> Result<bool, ServiceError> {
        let deleted = self.crud.delete(actor, contact_id)?;
        if deleted {
            if let Some(links) = &self.links {
                links.remove_contact(actor, contact_id.trim())?;
            }
        }
        Ok(deleted)
    }

    /// Atomically replaces every mutable field of a contact.
    ///
    /// Returns `Ok(false)` when no such contact exists; nothing is inserted.
    /// When any new value is invalid the stored contact is left unchanged.
    #[tracing::instrument(skip(self, actor, fields), fields(actor = actor.id()))]
    pub fn update(
        &self,
        actor: &User,
        contact_id: &str,
        fields: ContactFields,
    ) -> Result<bool, ServiceError> {
        self.crud.update(actor, contact_id, fields)
    }

    /// Convenience wrapper around [`ContactService::update`].
    pub fn update_contact(
        &self,
        actor: &User,
        contact_id: &str,
        first_name: &str,
        last_name: &str,
        phone: &str,
        address: &str,
    ) -> Result<bool, ServiceError> {
        self.update(
            actor,
            contact_id,
            ContactFields::new(first_name, last_name, phone, address),
        )
    }

    #[tracing::instrument(skip(self, actor), fields(actor = actor.id()))]
    pub fn get_by_id(&self, actor: &User, contact_id: &str) -> Result<Option<Contact>, ServiceError> {
        self.crud.get_by_id(actor, contact_id)
    }

    pub fn exists(&self, actor: &User, contact_id: &str) -> Result<bool, ServiceError> {
        self.crud.exists(actor, contact_id)
    }

    #[tracing::instrument(skip(self, actor), fields(actor = actor.id()))]
    pub fn get_all(&self, actor: &User) -> Result<Vec<Contact>, ServiceError> {
        self.crud.get_all(actor)
    }

    /// Every user's contacts. Admin only.
    #[tracing::instrument(skip(self, actor), fields(actor = actor.id()))]
    pub fn get_all_for_all_users(&self, actor: &User) -> Result<Vec<Contact>, ServiceError> {
        self.crud.get_all_for_all_users(actor)
    }

    #[cfg(test)]
    pub(crate) fn clear(&self) -> Result<(), ServiceError> {
        if let Some(links) = &self.links {
            links.clear()?;
        }
        self.crud.clear()
    }
}
