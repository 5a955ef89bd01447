use std::collections::HashMap;

use contacts_core::{Role, User, ValidationError};
use serde::Deserialize;

const ENV_PREFIX: &str = "CONTACTAPP";

/// Application configuration.
///
/// Read from `CONTACTAPP_*` environment variables, e.g. `CONTACTAPP_SEED_FILE`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// YAML file to seed the stores from at startup.
    #[serde(default)]
    pub seed_file: Option<String>,
    #[serde(default = "default_owner_id")]
    pub owner_id: i64,
    #[serde(default = "default_owner_username")]
    pub owner_username: String,
    #[serde(default = "default_owner_email")]
    pub owner_email: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Config::from_env_source(None)
    }

    pub fn from_toml(toml: &str) -> anyhow::Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// `source` replaces the process environment when given.
    fn from_env_source(source: Option<HashMap<String, String>>) -> anyhow::Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::Environment::with_prefix(ENV_PREFIX).source(source))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// The administrator that owns everything seeded at startup.
    pub fn owner(&self) -> Result<User, ValidationError> {
        User::new(
            self.owner_id,
            &self.owner_username,
            &self.owner_email,
            Role::Admin,
        )
    }
}

fn default_owner_id() -> i64 {
    1
}

fn default_owner_username() -> String {
    "admin".to_string()
}

fn default_owner_email() -> String {
    "admin@example.com".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    mod toml_tests {
        use super::*;

        #[test]
        fn test_config_from_toml() {
            // Arrange
            let toml_str = r#"
                seed_file = "seed.yml"
                owner_id = 42
                owner_username = "root"
                owner_email = "root@example.org"
            "#;

            // Act
            let config = Config::from_toml(toml_str).unwrap();

            // Assert
            assert_eq!(config.seed_file.as_deref(), Some("seed.yml"));
            assert_eq!(config.owner_id, 42);
            assert_eq!(config.owner_username, "root");
            assert_eq!(config.owner_email, "root@example.org");
        }

        #[test]
        fn test_config_defaults() {
            // Act
            let config = Config::from_toml("").unwrap();

            // Assert
            assert_eq!(
                config,
                Config {
                    seed_file: None,
                    owner_id: 1,
                    owner_username: "admin".to_string(),
                    owner_email: "admin@example.com".to_string(),
                }
            );
        }
    }

    #[test]
    fn test_config_from_prefixed_environment() {
        // Arrange
        let env = HashMap::from([
            ("CONTACTAPP_SEED_FILE".to_string(), "/tmp/seed.yml".to_string()),
            ("CONTACTAPP_OWNER_USERNAME".to_string(), "ops".to_string()),
            ("UNRELATED_VARIABLE".to_string(), "ignored".to_string()),
        ]);

        // Act
        let config = Config::from_env_source(Some(env)).unwrap();

        // Assert
        assert_eq!(config.seed_file.as_deref(), Some("/tmp/seed.yml"));
        assert_eq!(config.owner_username, "ops");
        assert_eq!(config.owner_email, "admin@example.com");
    }

    #[test]
    fn test_owner_is_an_admin() {
        // Arrange
        let config = Config::from_toml("").unwrap();

        // Act
        let owner = config.owner().unwrap();

        // Assert
        assert!(owner.is_admin());
        assert_eq!(owner.username(), "admin");
    }

    #[test]
    fn test_invalid_owner_email_is_rejected() {
        // Arrange
        let config = Config::from_toml(r#"owner_email = "not-an-email""#).unwrap();

        // Act
        let error = config.owner().unwrap_err();

        // Assert
        assert_eq!(error.to_string(), "email must be a valid email address");
    }
}
