//! Sequential ticket issuance with an append-only durable log.
//!
//! # Examples
//!
//! In-memory usage with [`core::ledger::Ledger`]:
//! ```
//! use ticketlog::{
//!     core::ledger::{Ledger, LedgerError},
//!     ticket::TicketDraft,
//! };
//!
//! let mut ledger = Ledger::new();
//! let first = ledger
//!     .issue(TicketDraft::addressed("0000000001", "Ann", "a1@example.com"))
//!     .expect("issue");
//! assert_eq!(first, 1);
//!
//! let dup = ledger.issue(TicketDraft::addressed("0000000002", "Bob", "a1@example.com"));
//! assert!(matches!(dup, Err(LedgerError::DuplicateContact(_))));
//! ```
//!
//! Durable session behind the single-writer runtime:
//! ```no_run
//! use ticketlog::{
//!     persist::file::CsvTicketStore,
//!     runtime::handle::{RuntimeConfig, spawn_ticketlog},
//!     session::LedgerSession,
//!     ticket::TicketDraft,
//! };
//!
//! # #[tokio::main]
//! # async fn main() {
//! let store = CsvTicketStore::with_archive("tickets.csv", "tickets_all.csv");
//! let session = LedgerSession::open(Box::new(store)).expect("open session");
//! let handle = spawn_ticketlog(session, RuntimeConfig::default());
//! let number = handle
//!     .issue(TicketDraft::addressed("0000000001", "Ann", "a1@example.com"))
//!     .await
//!     .expect("issue");
//! assert_eq!(number, 1);
//! handle.shutdown().await.expect("shutdown");
//! # }
//! ```

/// In-memory ledger state machine and index helpers.
pub mod core;
/// Intake policies for the attendee populations.
pub mod intake;
/// Persistence abstraction with CSV and SQLite implementations.
pub mod persist;
/// Single-writer runtime handle and events.
pub mod runtime;
/// Synchronous session composing a ledger with a store.
pub mod session;
/// Ticket domain records and drafts.
pub mod ticket;
/// Shared primitive types and the contact model.
pub mod types;
