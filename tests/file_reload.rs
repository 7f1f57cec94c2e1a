use std::fs;

use tempfile::TempDir;

use ticketlog::{
    persist::file::CsvTicketStore,
    session::LedgerSession,
    ticket::TicketDraft,
    types::Contact,
};

#[test]
fn csv_reload_round_trips_records_order_and_cursor() {
    let tmp = TempDir::new().expect("tmp");
    let active = tmp.path().join("tickets.csv");

    let store = CsvTicketStore::open(&active);
    let mut session = LedgerSession::open(Box::new(store)).expect("open");
    assert_eq!(session.next_number(), 1);

    session
        .issue(TicketDraft::addressed("0000000001", "Ann", "a1@example.com"))
        .expect("issue 1");
    session
        .issue(TicketDraft::paper("Walk-up"))
        .expect("issue 2");
    session
        .issue(TicketDraft::addressed("0000000003", "Cho", "c3@example.com"))
        .expect("issue 3");
    let before: Vec<_> = session.records().to_vec();
    drop(session);

    let reopened = CsvTicketStore::open(&active);
    let session = LedgerSession::open(Box::new(reopened)).expect("reopen");
    assert_eq!(session.records(), before.as_slice());
    assert_eq!(session.next_number(), 4);
    assert_eq!(session.records()[1].contact, Contact::Paper);
}

#[test]
fn csv_load_tolerates_garbage_number_rows() {
    let tmp = TempDir::new().expect("tmp");
    let active = tmp.path().join("tickets.csv");
    fs::write(
        &active,
        "number,identifier,name,contact\n1,0000000001,Ann,a1@example.com\n3,0000000003,Cho,c3@example.com\nx,junk,Junk,junk@example.com\n",
    )
    .expect("write");

    let mut session =
        LedgerSession::open(Box::new(CsvTicketStore::open(&active))).expect("open");
    assert_eq!(session.next_number(), 4);
    assert_eq!(session.records().len(), 2);

    let n = session
        .issue(TicketDraft::addressed("0000000004", "Dee", "d4@example.com"))
        .expect("issue");
    assert_eq!(n, 4);
}

#[test]
fn csv_load_falls_back_on_missing_or_foreign_columns() {
    let tmp = TempDir::new().expect("tmp");

    let empty = tmp.path().join("empty.csv");
    fs::write(&empty, "").expect("write");
    let session = LedgerSession::open(Box::new(CsvTicketStore::open(&empty))).expect("open");
    assert_eq!(session.next_number(), 1);
    assert!(session.records().is_empty());

    let foreign = tmp.path().join("foreign.csv");
    fs::write(&foreign, "a,b,c\n1,2,3\n4,5,6\n").expect("write");
    let session = LedgerSession::open(Box::new(CsvTicketStore::open(&foreign))).expect("open");
    assert_eq!(session.next_number(), 1);
    assert!(session.records().is_empty());
}

#[test]
fn csv_headers_match_by_name_not_position() {
    let tmp = TempDir::new().expect("tmp");
    let shuffled = tmp.path().join("shuffled.csv");
    fs::write(
        &shuffled,
        "contact,number,name\na1@example.com,7,Ann\n",
    )
    .expect("write");

    let session =
        LedgerSession::open(Box::new(CsvTicketStore::open(&shuffled))).expect("open");
    assert_eq!(session.next_number(), 8);
    let record = &session.records()[0];
    assert_eq!(record.name, "Ann");
    assert_eq!(record.identifier, "");
    assert_eq!(record.contact, Contact::Address("a1@example.com".to_string()));
}

#[test]
fn archive_survives_reset_and_keeps_accumulating() {
    let tmp = TempDir::new().expect("tmp");
    let active = tmp.path().join("tickets.csv");
    let archive = tmp.path().join("tickets_all.csv");

    let store = CsvTicketStore::with_archive(&active, &archive);
    let mut session = LedgerSession::open(Box::new(store)).expect("open");
    for i in 0..5u64 {
        session
            .issue(TicketDraft::addressed("", "x", format!("u{i}@example.com")))
            .expect("issue");
    }
    assert_eq!(session.archive().expect("archive").len(), 5);

    session.reset().expect("reset");
    assert!(session.records().is_empty());
    assert_eq!(session.next_number(), 1);
    assert_eq!(session.archive().expect("archive").len(), 5);

    session
        .issue(TicketDraft::addressed("", "y", "u0@example.com"))
        .expect("reissue after reset");
    let archived = session.archive().expect("archive");
    assert_eq!(archived.len(), 6);
    assert_eq!(archived[5].number, "1");
}

#[test]
fn export_renders_comma_and_tab_tables() {
    let mut session = LedgerSession::in_memory();
    session
        .issue(TicketDraft::addressed("0000000001", "Ann", "a1@example.com"))
        .expect("issue");
    session.issue(TicketDraft::paper("Bob")).expect("paper");

    let commas = session.export_delimited(b',').expect("csv export");
    assert!(commas.starts_with("number,identifier,name,contact\n"));
    assert!(commas.contains("1,0000000001,Ann,a1@example.com\n"));
    assert!(commas.contains("2,,Bob,paper\n"));

    let tabs = session.export_delimited(b'\t').expect("tsv export");
    assert!(tabs.starts_with("number\tidentifier\tname\tcontact\n"));
    assert!(tabs.contains("2\t\tBob\tpaper\n"));
}
