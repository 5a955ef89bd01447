use std::sync::Arc;

use contactapp::config::Config;
use contacts_core::SystemClock;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().init();
    let config = Config::from_env()?;
    let (_services, summary) = contactapp::run(&config, Arc::new(SystemClock))?;
    tracing::info!(
        contacts = summary.contacts,
        projects = summary.projects,
        tasks = summary.tasks,
        appointments = summary.appointments,
        "Started for {}",
        config.owner_username
    );
    for task_id in &summary.overdue {
        tracing::warn!("Task {} is overdue", task_id);
    }
    Ok(())
}
