//! Validated contact, task, appointment and project records, and thread-safe
//! owner-scoped CRUD services over a pluggable store.
//!
//! ```
//! use std::sync::Arc;
//! use contacts_core::{Contact, Role, Services, SystemClock, User};
//!
//! let services = Services::in_memory(Arc::new(SystemClock));
//! let owner = User::new(1, "alice", "alice@example.com", Role::User).unwrap();
//!
//! let contact = Contact::new("1", "Al", "Sm", "5551234567", "1 Main St").unwrap();
//! services.contacts.add(&owner, contact).unwrap();
//!
//! let error = services
//!     .contacts
//!     .update_contact(&owner, "1", "Al", "Sm", "123", "1 Main St")
//!     .unwrap_err();
//! assert_eq!(error.to_string(), "phone must be exactly 10 digits");
//! ```

pub mod clock;
pub mod domain;
pub mod error;
pub mod service;
pub mod store;
pub mod user;
pub mod validation;

pub use clock::{Clock, FixedClock, SystemClock};
pub use domain::{
    Appointment, AppointmentFields, Contact, ContactFields, Entity, Project, ProjectFields,
    ProjectStatus, Task, TaskChange, TaskFields, TaskStatus,
};
pub use error::{ServiceError, StoreError, ValidationError};
pub use service::{AppointmentService, ContactService, ProjectService, Services, TaskService};
pub use store::{InMemoryLinkStore, InMemoryStore, LinkStore, ProjectContact, Store};
pub use user::{Role, User};
