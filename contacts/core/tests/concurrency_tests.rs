use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use contacts_core::{ContactFields, ServiceError};

mod common;

const THREADS: usize = 8;
const ROUNDS: usize = 200;

#[test]
fn racing_adds_of_one_id_admit_exactly_one() {
    let ctx = common::setup();
    let accepted = AtomicUsize::new(0);
    let rejected = AtomicUsize::new(0);

    thread::scope(|scope| {
        for _ in 0..THREADS {
            scope.spawn(|| match ctx.services.contacts.add(&ctx.alice, common::contact("1")) {
                Ok(()) => {
                    accepted.fetch_add(1, Ordering::SeqCst);
                }
                Err(ServiceError::Duplicate { .. }) => {
                    rejected.fetch_add(1, Ordering::SeqCst);
                }
                Err(other) => panic!("unexpected error: {other}"),
            });
        }
    });

    assert_eq!(accepted.load(Ordering::SeqCst), 1);
    assert_eq!(rejected.load(Ordering::SeqCst), THREADS - 1);
}

#[test]
fn racing_updates_never_tear_a_contact() {
    let ctx = common::setup();
    ctx.services
        .contacts
        .add(&ctx.alice, common::contact("1"))
        .expect("Failed to add contact");

    thread::scope(|scope| {
        for worker in 0..THREADS {
            let ctx = &ctx;
            scope.spawn(move || {
                for round in 0..ROUNDS {
                    let tag = format!("W{worker}R{round}");
                    let phone = format!("{:010}", worker * ROUNDS + round);
                    let fields = ContactFields::new(tag.clone(), tag.clone(), phone, tag);
                    let updated = ctx
                        .services
                        .contacts
                        .update(&ctx.alice, "1", fields)
                        .expect("Update should not fail");
                    assert!(updated);
                }
            });
        }
    });

    let stored = ctx
        .services
        .contacts
        .get_by_id(&ctx.alice, "1")
        .expect("Failed to get contact")
        .expect("Contact should exist");
    assert_eq!(stored.first_name(), stored.last_name());
    assert_eq!(stored.first_name(), stored.address());
    let (worker, round) = stored.first_name()[1..]
        .split_once('R')
        .expect("tag has a round");
    let expected_phone = format!(
        "{:010}",
        worker.parse::<usize>().expect("numeric worker") * ROUNDS
            + round.parse::<usize>().expect("numeric round")
    );
    assert_eq!(stored.phone(), expected_phone);
}

#[test]
fn updates_racing_a_delete_never_resurrect() {
    let ctx = common::setup();
    ctx.services
        .contacts
        .add(&ctx.alice, common::contact("1"))
        .expect("Failed to add contact");
    let deletions = AtomicUsize::new(0);

    thread::scope(|scope| {
        for worker in 0..THREADS {
            let ctx = &ctx;
            let deletions = &deletions;
            scope.spawn(move || {
                for _ in 0..ROUNDS {
                    if worker == 0 {
                        if ctx
                            .services
                            .contacts
                            .delete(&ctx.alice, "1")
                            .expect("Delete should not fail")
                        {
                            deletions.fetch_add(1, Ordering::SeqCst);
                        }
                    } else {
                        ctx.services
                            .contacts
                            .update(
                                &ctx.alice,
                                "1",
                                ContactFields::new("Bo", "Jo", "0000000000", "2 Elm St"),
                            )
                            .expect("Update should not fail");
                    }
                }
            });
        }
    });

    assert_eq!(deletions.load(Ordering::SeqCst), 1);
    assert_eq!(
        ctx.services
            .contacts
            .get_by_id(&ctx.alice, "1")
            .expect("Failed to get contact"),
        None
    );
}

#[test]
fn different_owners_do_not_contend_on_ids() {
    let ctx = common::setup();

    thread::scope(|scope| {
        for user in [&ctx.alice, &ctx.bob] {
            let services = &ctx.services;
            scope.spawn(move || {
                for n in 0..ROUNDS {
                    let id = n.to_string();
                    services
                        .contacts
                        .add(user, common::contact(&id))
                        .expect("Failed to add contact");
                }
            });
        }
    });

    assert_eq!(
        ctx.services.contacts.get_all(&ctx.alice).expect("Failed to list").len(),
        ROUNDS
    );
    assert_eq!(
        ctx.services
            .contacts
            .get_all_for_all_users(&ctx.admin)
            .expect("Admin should list all")
            .len(),
        2 * ROUNDS
    );
}
