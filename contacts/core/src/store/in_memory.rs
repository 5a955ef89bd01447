use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use parking_lot::RwLock;
use tracing::debug;

use crate::clock::Clock;
use crate::domain::Entity;
use crate::error::StoreError;
use crate::store::Store;
use crate::user::User;

type Key = (i64, String);

/// A process-local [`Store`] backed by an ordered map.
///
/// Listings come back ordered by owner id, then entity id. Every entity that
/// leaves the store is a `copy()`; the stored instances are never shared.
#[derive(Debug)]
pub struct InMemoryStore<E> {
    entries: RwLock<BTreeMap<Key, E>>,
}

impl<E> Default for InMemoryStore<E> {
    fn default() -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
        }
    }
}

impl<E: Entity> InMemoryStore<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

fn key(owner: &User, id: &str) -> Key {
    (owner.id(), id.to_string())
}

fn copy_all<'a, E: Entity>(
    entities: impl Iterator<Item = &'a E>,
) -> Result<Vec<E>, StoreError> {
    entities
        .map(|entity| entity.copy().map_err(StoreError::from))
        .collect()
}

impl<E: Entity> Store<E> for InMemoryStore<E> {
    fn save(&self, owner: &User, entity: E) -> Result<(), StoreError> {
        let mut entries = self.entries.write();
        match entries.entry(key(owner, entity.id())) {
            Entry::Occupied(occupied) => Err(StoreError::Duplicate {
                kind: E::KIND,
                id: occupied.key().1.clone(),
            }),
            Entry::Vacant(vacant) => {
                debug!(kind = E::KIND, id = %vacant.key().1, owner = owner.id(), "Inserted");
                vacant.insert(entity);
                Ok(())
            }
        }
    }

    fn update(
        &self,
        owner: &User,
        id: &str,
        fields: E::Fields,
        clock: &(dyn Clock + 'static),
    ) -> Result<bool, StoreError> {
        let mut entries = self.entries.write();
        match entries.get_mut(&key(owner, id)) {
            Some(entity) => {
                entity.apply(fields, clock)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn find_by_id(&self, owner: &User, id: &str) -> Result<Option<E>, StoreError> {
        let entries = self.entries.read();
        entries
            .get(&key(owner, id))
            .map(|entity| entity.copy())
            .transpose()
            .map_err(StoreError::from)
    }

    fn find_all(&self, owner: &User) -> Result<Vec<E>, StoreError> {
        let entries = self.entries.read();
        copy_all(
            entries
                .iter()
                .filter(|((owner_id, _), _)| *owner_id == owner.id())
                .map(|(_, entity)| entity),
        )
    }

    fn find_all_owners(&self) -> Result<Vec<E>, StoreError> {
        let entries = self.entries.read();
        copy_all(entries.values())
    }

    fn exists_by_id(&self, owner: &User, id: &str) -> Result<bool, StoreError> {
        Ok(self.entries.read().contains_key(&key(owner, id)))
    }

    fn delete_by_id(&self, owner: &User, id: &str) -> Result<bool, StoreError> {
        Ok(self.entries.write().remove(&key(owner, id)).is_some())
    }

    fn delete_all(&self) -> Result<(), StoreError> {
        self.entries.write().clear();
        Ok(())
    }
}
