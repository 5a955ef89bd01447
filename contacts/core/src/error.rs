//! Error types for every layer of the crate.
//!
//! Validation failures are caller bugs and carry a field-labelled message.
//! Store failures wrap validation failures and add conflict and backend cases.
//! Service failures are what callers above the service layer see.

use thiserror::Error;

/// A rejected field value.
///
/// The `Display` output of each variant is the exact message surfaced to callers,
/// e.g. `phone must be exactly 10 digits`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{label} must not be null or blank")]
    Blank { label: &'static str },

    #[error("{label} length must be between {min} and {max}")]
    Length {
        label: &'static str,
        min: usize,
        max: usize,
    },

    #[error("{label} must only contain digits 0-9")]
    NotDigits { label: &'static str },

    #[error("{label} must be exactly {length} digits")]
    DigitCount { label: &'static str, length: usize },

    #[error("{label} must be a valid email address")]
    Email { label: &'static str },

    #[error("{label} must not be null")]
    Missing { label: &'static str },

    #[error("{label} must not be in the past")]
    InPast { label: &'static str },

    /// An entity's internal state no longer satisfies its own invariants.
    #[error("{entity} copy source must not be null")]
    CorruptCopySource { entity: &'static str },
}

/// Failures reported by a [`Store`](crate::store::Store) implementation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The `(owner, id)` pair is already taken. Existing data is left untouched.
    #[error("{kind} with id '{id}' already exists")]
    Duplicate { kind: &'static str, id: String },

    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// The durable backing failed (I/O, connection, constraint other than uniqueness).
    #[error("store backend failure: {0}")]
    Backend(String),
}

/// Failures reported by the CRUD services.
///
/// Callers translating to HTTP map `Invalid` to 400, `NotFound` to 404,
/// `Duplicate` to 409 and `AccessDenied` to 403.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("{kind} with id '{id}' already exists")]
    Duplicate { kind: &'static str, id: String },

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("Only ADMIN users can access all {what}")]
    AccessDenied { what: &'static str },

    #[error("store failure: {0}")]
    Store(String),
}

impl From<StoreError> for ServiceError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::Duplicate { kind, id } => ServiceError::Duplicate { kind, id },
            StoreError::Invalid(validation) => ServiceError::Invalid(validation),
            StoreError::Backend(message) => ServiceError::Store(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_messages_are_field_labelled() {
        assert_eq!(
            ValidationError::Blank { label: "firstName" }.to_string(),
            "firstName must not be null or blank"
        );
        assert_eq!(
            ValidationError::Length {
                label: "address",
                min: 1,
                max: 30
            }
            .to_string(),
            "address length must be between 1 and 30"
        );
        assert_eq!(
            ValidationError::DigitCount {
                label: "phone",
                length: 10
            }
            .to_string(),
            "phone must be exactly 10 digits"
        );
        assert_eq!(
            ValidationError::CorruptCopySource { entity: "contact" }.to_string(),
            "contact copy source must not be null"
        );
    }

    #[test]
    fn test_store_errors_map_onto_service_errors() {
        // Arrange
        let duplicate = StoreError::Duplicate {
            kind: "Contact",
            id: "1".to_string(),
        };
        assert_eq!(
            ServiceError::from(duplicate).to_string(),
            "Contact with id '1' already exists"
        );

        // Act
        let invalid = StoreError::Invalid(ValidationError::NotDigits { label: "phone" });
        assert_eq!(
            ServiceError::from(invalid),
            ServiceError::Invalid(ValidationError::NotDigits { label: "phone" })
        );

        // Assert
        let backend = StoreError::Backend("connection reset".to_string());
        assert_eq!(
            ServiceError::from(backend).to_string(),
            "store failure: connection reset"
        );
    }
}
