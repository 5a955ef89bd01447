//! Startup wiring for the contact manager: configuration, seeding and a
//! summary of what the owner can see.

use std::sync::Arc;

use contacts_core::{Clock, Services};

pub mod config;
pub mod seed;

use config::Config;
use seed::{Seed, SeedReport};

/// What the owner holds once startup has finished.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Summary {
    pub seeded: Option<SeedReport>,
    pub contacts: usize,
    pub projects: usize,
    pub tasks: usize,
    pub appointments: usize,
    /// Ids of the owner's overdue tasks.
    pub overdue: Vec<String>,
}

/// Builds the services, applies the configured seed file and summarises the result.
pub fn run(config: &Config, clock: Arc<dyn Clock>) -> anyhow::Result<(Services, Summary)> {
    let services = Services::in_memory(clock);
    let owner = config.owner()?;

    let seeded = match &config.seed_file {
        Some(path) => Some(Seed::load(path)?.apply(&services, &owner)?),
        None => {
            tracing::info!("No seed file configured");
            None
        }
    };

    let summary = Summary {
        seeded,
        contacts: services.contacts.get_all(&owner)?.len(),
        projects: services.projects.get_all(&owner)?.len(),
        tasks: services.tasks.get_all(&owner)?.len(),
        appointments: services.appointments.get_all(&owner)?.len(),
        overdue: services
            .tasks
            .get_overdue(&owner)?
            .iter()
            .map(|task| task.task_id().to_string())
            .collect(),
    };
    Ok((services, summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use contacts_core::SystemClock;

    #[test]
    fn test_run_without_seed_is_empty() {
        // Arrange
        let config = Config::from_toml("").unwrap();

        // Act
        let (_, summary) = run(&config, Arc::new(SystemClock)).unwrap();

        // Assert
        assert_eq!(summary, Summary::default());
    }

    #[test]
    fn test_run_with_bundled_seed() {
        // Arrange
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/seed.yml");
        let config = Config::from_toml(&format!("seed_file = {path:?}")).unwrap();

        // Act
        let (services, summary) = run(&config, Arc::new(SystemClock)).unwrap();

        // Assert
        let owner = config.owner().unwrap();
        assert_eq!(summary.contacts, 3);
        assert_eq!(summary.projects, 2);
        assert_eq!(summary.tasks, 3);
        assert_eq!(summary.appointments, 2);
        assert!(summary.overdue.is_empty());
        assert_eq!(
            services.projects.get_project_contacts(&owner, "WEB").unwrap().len(),
            2
        );
    }

    #[test]
    fn test_missing_seed_file_is_an_error() {
        // Arrange
        let config = Config::from_toml(r#"seed_file = "/nonexistent/seed.yml""#).unwrap();

        // Act
        let Err(error) = run(&config, Arc::new(SystemClock)) else {
            panic!("run should fail without a readable seed file");
        };

        // Assert
        assert!(error.to_string().contains("Failed to read seed file"));
    }
}
