pub mod file;
pub mod sqlite;

use crate::{core::ledger::RawTicketRow, ticket::TicketRecord};

#[derive(Debug)]
pub enum PersistError {
    Io(std::io::Error),
    Csv(csv::Error),
    Sqlite(rusqlite::Error),
    Message(String),
}

impl From<std::io::Error> for PersistError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<csv::Error> for PersistError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

impl From<rusqlite::Error> for PersistError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

pub type PersistResult<T> = Result<T, PersistError>;

/// Durable backing for one active ticket log plus an optional archive.
///
/// `load` is lenient: malformed content degrades to fewer rows, never an
/// error. The commit methods are strict: they either make the new state
/// durable or return an error without damaging the previously readable state.
pub trait TicketStore: Send {
    /// Reads the active rows as stored, without interpreting the number field.
    fn load(&mut self) -> PersistResult<Vec<RawTicketRow>>;

    /// Durably records `existing` plus `issued` as the new active set and
    /// appends `issued` to the archive when one is kept.
    fn commit_issue(
        &mut self,
        existing: &[TicketRecord],
        issued: &TicketRecord,
    ) -> PersistResult<()>;

    /// Empties the active storage. Must not touch the archive.
    fn commit_reset(&mut self) -> PersistResult<()>;

    /// Reads the archive rows; empty when no archive is kept.
    fn load_archive(&mut self) -> PersistResult<Vec<RawTicketRow>> {
        Ok(Vec::new())
    }
}
