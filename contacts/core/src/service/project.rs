use std::sync::Arc;

use tracing::debug;

use crate::clock::Clock;
use crate::domain::{Project, ProjectFields, ProjectStatus};
use crate::error::ServiceError;
use crate::service::{ContactService, Crud, normalize_id};
use crate::store::{LinkStore, ProjectContact, Store};
use crate::user::User;

/// CRUD over the acting user's projects, plus project membership of contacts.
#[derive(Clone)]
pub struct ProjectService {
    crud: Crud<Project>,
    contacts: ContactService,
    links: Arc<dyn LinkStore>,
}

impl ProjectService {
    /// `contacts` is used to check that a contact exists before it is linked.
    pub fn new(
        store: Arc<dyn Store<Project>>,
        contacts: ContactService,
        links: Arc<dyn LinkStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            crud: Crud::new(store, clock, "projects"),
            contacts,
            links,
        }
    }

    #[tracing::instrument(skip(self, actor, project), fields(actor = actor.id(), id = project.project_id()))]
    pub fn add(&self, actor: &User, project: Project) -> Result<(), ServiceError> {
        self.crud.add(actor, project)
    }

    /// Deletes a project together with its contact links.
    #[tracing::instrument(skip(self, actor), fields(actor = actor.id()))]
    pub fn delete(&self, actor: &User, project_id: &str) -> Result<bool, ServiceError> {
        let deleted = self.crud.delete(actor, project_id)?;
        if deleted {
            let dropped = self.links.remove_project(actor, project_id.trim())?;
            debug!(dropped, "Dropped project links");
        }
        Ok(deleted)
    }

    /// Atomically replaces name, description and status.
    ///
    /// A missing status fails with `status must not be null`.
    #[tracing::instrument(skip(self, actor, fields), fields(actor = actor.id()))]
    pub fn update(
        &self,
        actor: &User,
        project_id: &str,
        fields: ProjectFields,
    ) -> Result<bool, ServiceError> {
        self.crud.update(actor, project_id, fields)
    }

    pub fn update_project(
        &self,
        actor: &User,
        project_id: &str,
        name: &str,
        description: &str,
        status: ProjectStatus,
    ) -> Result<bool, ServiceError> {
        self.update(actor, project_id, ProjectFields::new(name, description, status))
    }

    #[tracing::instrument(skip(self, actor), fields(actor = actor.id()))]
    pub fn get_by_id(&self, actor: &User, project_id: &str) -> Result<Option<Project>, ServiceError> {
        self.crud.get_by_id(actor, project_id)
    }

    #[tracing::instrument(skip(self, actor), fields(actor = actor.id()))]
    pub fn get_all(&self, actor: &User) -> Result<Vec<Project>, ServiceError> {
        self.crud.get_all(actor)
    }

    #[tracing::instrument(skip(self, actor), fields(actor = actor.id()))]
    pub fn get_all_for_all_users(&self, actor: &User) -> Result<Vec<Project>, ServiceError> {
        self.crud.get_all_for_all_users(actor)
    }

    pub fn get_by_status(
        &self,
        actor: &User,
        status: ProjectStatus,
    ) -> Result<Vec<Project>, ServiceError> {
        self.crud.filter(actor, |project| project.status() == status)
    }

    /// Links a contact to a project with an optional role.
    ///
    /// # Returns
    ///
    /// `Ok(false)` when the contact is already linked; the existing role is kept.
    ///
    /// # Errors
    ///
    /// [`ServiceError::NotFound`] when either the project or the contact does not
    /// exist for `actor`.
    #[tracing::instrument(skip(self, actor), fields(actor = actor.id()))]
    pub fn add_contact_to_project(
        &self,
        actor: &User,
        project_id: &str,
        contact_id: &str,
        role: Option<&str>,
    ) -> Result<bool, ServiceError> {
        let link = ProjectContact::new(project_id, contact_id, role)?;
        self.require_project(actor, link.project_id())?;
        if !self.contacts.exists(actor, link.contact_id())? {
            return Err(ServiceError::NotFound {
                kind: "Contact",
                id: link.contact_id().to_string(),
            });
        }
        Ok(self.links.link(actor, link)?)
    }

    #[tracing::instrument(skip(self, actor), fields(actor = actor.id()))]
    pub fn remove_contact_from_project(
        &self,
        actor: &User,
        project_id: &str,
        contact_id: &str,
    ) -> Result<bool, ServiceError> {
        let project_id = normalize_id::<Project>(project_id)?;
        validate_contact_id(contact_id)?;
        Ok(self.links.unlink(actor, &project_id, contact_id.trim())?)
    }

    /// The contacts linked to a project, with their roles.
    pub fn get_project_contacts(
        &self,
        actor: &User,
        project_id: &str,
    ) -> Result<Vec<ProjectContact>, ServiceError> {
        let project_id = normalize_id::<Project>(project_id)?;
        self.require_project(actor, &project_id)?;
        Ok(self.links.contacts_of(actor, &project_id)?)
    }

    /// The projects a contact is linked to, with the contact's role in each.
    pub fn get_contact_projects(
        &self,
        actor: &User,
        contact_id: &str,
    ) -> Result<Vec<ProjectContact>, ServiceError> {
        validate_contact_id(contact_id)?;
        let contact_id = contact_id.trim();
        if !self.contacts.exists(actor, contact_id)? {
            return Err(ServiceError::NotFound {
                kind: "Contact",
                id: contact_id.to_string(),
            });
        }
        Ok(self.links.projects_of(actor, contact_id)?)
    }

    fn require_project(&self, actor: &User, project_id: &str) -> Result<(), ServiceError> {
        if self.crud.exists(actor, project_id)? {
            Ok(())
        } else {
            Err(ServiceError::NotFound {
                kind: "Project",
                id: project_id.to_string(),
            })
        }
    }

    #[cfg(test)]
    pub(crate) fn clear(&self) -> Result<(), ServiceError> {
        self.links.clear()?;
        self.crud.clear()
    }
}

fn validate_contact_id(contact_id: &str) -> Result<(), ServiceError> {
    crate::validation::validate_not_blank(contact_id, "contactId")?;
    Ok(())
}
