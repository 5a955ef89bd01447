//! Persistence seam between the services and whatever backs them.
//!
//! Every method is scoped to an owner. A durable backing implements [`Store`]
//! and [`LinkStore`] and can be handed to [`Services`](crate::service::Services)
//! without touching entity or service code.

mod in_memory;
mod links;

pub use in_memory::InMemoryStore;
pub use links::{InMemoryLinkStore, LinkStore, ProjectContact};

use crate::clock::Clock;
use crate::domain::Entity;
use crate::error::StoreError;
use crate::user::User;

/// Owner-scoped storage for one entity type.
///
/// Identifiers are unique per owner, so the key of a stored entity is the pair
/// `(owner.id(), entity.id())`.
#[cfg_attr(test, mockall::automock)]
pub trait Store<E: Entity>: Send + Sync {
    /// Inserts `entity` unless its key is taken, in which case the stored
    /// entity is left as it was and [`StoreError::Duplicate`] is returned.
    fn save(&self, owner: &User, entity: E) -> Result<(), StoreError>;

    /// Applies `fields` to the stored entity in one atomic step.
    ///
    /// Returns `Ok(false)` without inserting anything when the key is absent.
    /// Concurrent updates and deletes of the same key are serialized.
    fn update(
        &self,
        owner: &User,
        id: &str,
        fields: E::Fields,
        clock: &(dyn Clock + 'static),
    ) -> Result<bool, StoreError>;

    fn find_by_id(&self, owner: &User, id: &str) -> Result<Option<E>, StoreError>;

    fn find_all(&self, owner: &User) -> Result<Vec<E>, StoreError>;

    /// Every stored entity regardless of owner.
    fn find_all_owners(&self) -> Result<Vec<E>, StoreError>;

    fn exists_by_id(&self, owner: &User, id: &str) -> Result<bool, StoreError>;

    fn delete_by_id(&self, owner: &User, id: &str) -> Result<bool, StoreError>;

    fn delete_all(&self) -> Result<(), StoreError>;
}
