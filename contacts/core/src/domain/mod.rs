//! Validated domain entities.
//!
//! Every entity has an identifier fixed at construction and a set of mutable
//! fields that only change through the entity's own setters or its atomic
//! `update`. Entities are deliberately not `Clone`: `copy()` is the only way to
//! duplicate one, and it re-validates through the constructor path.

mod appointment;
mod contact;
mod project;
mod task;

pub use appointment::{Appointment, AppointmentFields};
pub use contact::{Contact, ContactFields};
pub use project::{Project, ProjectFields, ProjectStatus};
pub use task::{Task, TaskChange, TaskFields, TaskStatus};

use crate::clock::Clock;
use crate::error::ValidationError;

/// What the generic store and service machinery needs from an entity.
pub trait Entity: std::fmt::Debug + Send + Sync + Sized + 'static {
    /// The full set of new values accepted by [`Entity::apply`].
    type Fields: Send + 'static;

    /// Human-readable kind used in messages, e.g. `Contact`.
    const KIND: &'static str;
    /// Label of the identifier field, e.g. `contactId`.
    const ID_LABEL: &'static str;

    fn id(&self) -> &str;

    /// Atomic multi-field update: either every field changes or none does.
    fn apply(&mut self, fields: Self::Fields, clock: &dyn Clock) -> Result<(), ValidationError>;

    /// A fresh, independently owned instance with the same values.
    fn copy(&self) -> Result<Self, ValidationError>;
}
