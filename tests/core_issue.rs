use ticketlog::{
    core::ledger::{Ledger, LedgerError, RawTicketRow},
    ticket::TicketDraft,
};

fn raw(number: &str, contact: &str) -> RawTicketRow {
    RawTicketRow {
        number: number.to_string(),
        identifier: String::new(),
        name: "someone".to_string(),
        contact: contact.to_string(),
    }
}

#[test]
fn issue_yields_consecutive_numbers() {
    let mut ledger = Ledger::new();
    let n1 = ledger
        .issue(TicketDraft::addressed("0000000001", "Ann", "a1@example.com"))
        .expect("issue 1");
    let n2 = ledger
        .issue(TicketDraft::addressed("0000000002", "Bob", "b2@example.com"))
        .expect("issue 2");
    let n3 = ledger
        .issue(TicketDraft::addressed("0000000003", "Cho", "c3@example.com"))
        .expect("issue 3");

    assert_eq!((n1, n2, n3), (1, 2, 3));
    assert_eq!(ledger.next_number(), 4);
}

#[test]
fn duplicate_contact_is_rejected_without_mutation() {
    let mut ledger = Ledger::new();
    let n1 = ledger
        .issue(TicketDraft::addressed("0000000001", "Ann", "a1@example.com"))
        .expect("issue 1");
    assert_eq!(n1, 1);

    let dup = ledger.issue(TicketDraft::addressed("0000000009", "Imp", "a1@example.com"));
    assert_eq!(
        dup,
        Err(LedgerError::DuplicateContact("a1@example.com".to_string()))
    );
    assert_eq!(ledger.len(), 1);
    assert_eq!(ledger.next_number(), 2);

    let n2 = ledger
        .issue(TicketDraft::addressed("0000000002", "Bob", "b2@example.com"))
        .expect("issue 2");
    assert_eq!(n2, 2);
}

#[test]
fn paper_tickets_never_collide() {
    let mut ledger = Ledger::new();
    let n1 = ledger.issue(TicketDraft::paper("Ann")).expect("paper 1");
    let n2 = ledger.issue(TicketDraft::paper("Bob")).expect("paper 2");
    let n3 = ledger.issue(TicketDraft::paper("Cho")).expect("paper 3");

    assert_eq!((n1, n2, n3), (1, 2, 3));
    assert_eq!(ledger.len(), 3);
}

#[test]
fn reset_empties_log_and_rewinds_cursor() {
    let mut ledger = Ledger::new();
    for i in 0..5u64 {
        ledger
            .issue(TicketDraft::addressed("", "x", format!("u{i}@example.com")))
            .expect("issue");
    }
    assert_eq!(ledger.next_number(), 6);

    ledger.reset();
    assert!(ledger.is_empty());
    assert_eq!(ledger.next_number(), 1);

    // Contacts from before the reset are free again.
    let n = ledger
        .issue(TicketDraft::addressed("", "x", "u0@example.com"))
        .expect("reissue");
    assert_eq!(n, 1);
}

#[test]
fn cursor_override_applies_to_next_issue() {
    let mut ledger = Ledger::new();
    ledger
        .issue(TicketDraft::addressed("", "Ann", "a1@example.com"))
        .expect("issue");

    ledger.set_next_number(50).expect("override");
    assert_eq!(ledger.next_number(), 50);

    let n = ledger
        .issue(TicketDraft::addressed("", "Bob", "b2@example.com"))
        .expect("issue after override");
    assert_eq!(n, 50);
    assert_eq!(ledger.next_number(), 51);
}

#[test]
fn cursor_override_may_rewind_but_rejects_zero() {
    let mut ledger = Ledger::new();
    for i in 0..3u64 {
        ledger
            .issue(TicketDraft::addressed("", "x", format!("u{i}@example.com")))
            .expect("issue");
    }

    // Rewinding below issued numbers is allowed, only logged.
    ledger.set_next_number(2).expect("rewind");
    assert_eq!(ledger.next_number(), 2);
    assert_eq!(ledger.len(), 3);

    assert_eq!(
        ledger.set_next_number(0),
        Err(LedgerError::InvalidNumber(0))
    );
    assert_eq!(ledger.next_number(), 2);
}

#[test]
fn restore_skips_garbage_numbers_and_recomputes_cursor() {
    let rows = vec![
        raw("1", "a1@example.com"),
        raw("3", "b2@example.com"),
        raw("x", "c3@example.com"),
    ];
    let ledger = Ledger::restore(&rows);

    assert_eq!(ledger.next_number(), 4);
    assert_eq!(ledger.len(), 2);
    assert!(ledger.contains_contact("a1@example.com"));
    assert!(!ledger.contains_contact("c3@example.com"));
}

#[test]
fn restore_of_nothing_usable_starts_at_one() {
    assert_eq!(Ledger::restore(&[]).next_number(), 1);

    let rows = vec![raw("", "a@example.com"), raw("abc", "b@example.com"), raw("0", "c@example.com")];
    let ledger = Ledger::restore(&rows);
    assert_eq!(ledger.next_number(), 1);
    assert!(ledger.is_empty());
}

#[test]
fn restore_maps_sentinel_rows_outside_dedup() {
    let rows = vec![raw("1", "paper"), raw("2", "paper")];
    let mut ledger = Ledger::restore(&rows);

    assert_eq!(ledger.len(), 2);
    assert_eq!(ledger.next_number(), 3);
    let n = ledger.issue(TicketDraft::paper("walk-up")).expect("paper");
    assert_eq!(n, 3);
}

#[test]
fn by_contact_returns_insertion_ordered_records() {
    let mut ledger = Ledger::new();
    ledger
        .issue(TicketDraft::addressed("0000000001", "Ann", "a1@example.com"))
        .expect("issue");
    ledger.issue(TicketDraft::paper("Bob")).expect("paper");

    let hits = ledger.by_contact("a1@example.com");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].number, 1);
    assert_eq!(hits[0].name, "Ann");
    assert!(ledger.by_contact("missing@example.com").is_empty());
}
