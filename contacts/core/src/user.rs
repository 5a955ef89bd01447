//! The acting user every service call is made on behalf of.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::validation::{self, MAX_USERNAME_LENGTH};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "USER"),
            Role::Admin => write!(f, "ADMIN"),
        }
    }
}

/// An authenticated user. Entities are owned by the user that added them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: i64,
    username: String,
    email: String,
    role: Role,
}

impl User {
    pub fn new(id: i64, username: &str, email: &str, role: Role) -> Result<Self, ValidationError> {
        let username =
            validation::validate_trimmed_length(username, "username", 1, MAX_USERNAME_LENGTH)?;
        let email = validation::validate_email(email, "email")?;
        Ok(Self {
            id,
            username,
            email,
            role,
        })
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
