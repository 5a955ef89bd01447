use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use parking_lot::RwLock;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::error::{StoreError, ValidationError};
use crate::user::User;
use crate::validation::{self, MAX_ID_LENGTH, MAX_ROLE_LENGTH};

/// A contact's membership in a project, with the role they play there.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ProjectContact {
    project_id: String,
    contact_id: String,
    role: Option<String>,
}

impl ProjectContact {
    /// A blank role is stored as no role.
    pub fn new(
        project_id: &str,
        contact_id: &str,
        role: Option<&str>,
    ) -> Result<Self, ValidationError> {
        let project_id =
            validation::validate_trimmed_length(project_id, "projectId", 1, MAX_ID_LENGTH)?;
        let contact_id =
            validation::validate_trimmed_length(contact_id, "contactId", 1, MAX_ID_LENGTH)?;
        let role = match role.map(str::trim) {
            Some(role) if !role.is_empty() => Some(validation::validate_trimmed_length(
                role,
                "role",
                1,
                MAX_ROLE_LENGTH,
            )?),
            _ => None,
        };
        Ok(Self {
            project_id,
            contact_id,
            role,
        })
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn contact_id(&self) -> &str {
        &self.contact_id
    }

    pub fn role(&self) -> Option<&str> {
        self.role.as_deref()
    }
}

/// Owner-scoped storage for project/contact associations.
pub trait LinkStore: Send + Sync {
    /// Returns `Ok(false)` when the pair is already linked; the existing role is kept.
    fn link(&self, owner: &User, link: ProjectContact) -> Result<bool, StoreError>;

    fn unlink(&self, owner: &User, project_id: &str, contact_id: &str) -> Result<bool, StoreError>;

    fn contacts_of(&self, owner: &User, project_id: &str) -> Result<Vec<ProjectContact>, StoreError>;

    fn projects_of(&self, owner: &User, contact_id: &str) -> Result<Vec<ProjectContact>, StoreError>;

    /// Drops every link of a project, returning how many were removed.
    fn remove_project(&self, owner: &User, project_id: &str) -> Result<usize, StoreError>;

    /// Drops every link of a contact, returning how many were removed.
    fn remove_contact(&self, owner: &User, contact_id: &str) -> Result<usize, StoreError>;

    fn clear(&self) -> Result<(), StoreError>;
}

type LinkKey = (i64, String, String);

#[derive(Debug, Default)]
pub struct InMemoryLinkStore {
    links: RwLock<BTreeMap<LinkKey, ProjectContact>>,
}

impl InMemoryLinkStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn remove_where(&self, owner: &User, matches: impl Fn(&ProjectContact) -> bool) -> usize {
        let mut links = self.links.write();
        let before = links.len();
        links.retain(|(owner_id, _, _), link| *owner_id != owner.id() || !matches(link));
        before - links.len()
    }

    fn select(&self, owner: &User, matches: impl Fn(&ProjectContact) -> bool) -> Vec<ProjectContact> {
        self.links
            .read()
            .iter()
            .filter(|((owner_id, _, _), link)| *owner_id == owner.id() && matches(link))
            .map(|(_, link)| link.clone())
            .collect()
    }
}

impl LinkStore for InMemoryLinkStore {
    fn link(&self, owner: &User, link: ProjectContact) -> Result<bool, StoreError> {
        let key = (owner.id(), link.project_id.clone(), link.contact_id.clone());
        match self.links.write().entry(key) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(link);
                Ok(true)
            }
        }
    }

    fn unlink(&self, owner: &User, project_id: &str, contact_id: &str) -> Result<bool, StoreError> {
        let key = (owner.id(), project_id.to_string(), contact_id.to_string());
        Ok(self.links.write().remove(&key).is_some())
    }

    fn contacts_of(&self, owner: &User, project_id: &str) -> Result<Vec<ProjectContact>, StoreError> {
        Ok(self.select(owner, |link| link.project_id == project_id))
    }

    fn projects_of(&self, owner: &User, contact_id: &str) -> Result<Vec<ProjectContact>, StoreError> {
        Ok(self.select(owner, |link| link.contact_id == contact_id))
    }

    fn remove_project(&self, owner: &User, project_id: &str) -> Result<usize, StoreError> {
        Ok(self.remove_where(owner, |link| link.project_id == project_id))
    }

    fn remove_contact(&self, owner: &User, contact_id: &str) -> Result<usize, StoreError> {
        Ok(self.remove_where(owner, |link| link.contact_id == contact_id))
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.links.write().clear();
        Ok(())
    }
}
