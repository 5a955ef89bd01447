#![allow(dead_code)] // each test binary uses a different subset

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use contacts_core::{Contact, FixedClock, Role, Services, User};

pub struct TestContext {
    pub services: Services,
    pub clock: Arc<FixedClock>,
    pub alice: User,
    pub bob: User,
    pub admin: User,
}

/// Instant every test clock starts at.
pub fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 4, 1, 9, 30, 0).unwrap()
}

pub fn setup() -> TestContext {
    // Allow multiple calls to init for tests.
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let clock = Arc::new(FixedClock::new(start()));
    TestContext {
        services: Services::in_memory(clock.clone()),
        clock,
        alice: User::new(1, "alice", "alice@example.com", Role::User).expect("valid user"),
        bob: User::new(2, "bob", "bob@example.com", Role::User).expect("valid user"),
        admin: User::new(3, "admin", "admin@example.com", Role::Admin).expect("valid user"),
    }
}

pub fn contact(id: &str) -> Contact {
    Contact::new(id, "Al", "Sm", "5551234567", "1 Main St").expect("valid contact")
}
