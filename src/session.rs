//! Synchronous composition of a [`Ledger`] with a durable [`TicketStore`].

use csv::WriterBuilder;

use crate::{
    core::ledger::{Ledger, LedgerError, RawTicketRow},
    persist::{PersistError, PersistResult, TicketStore},
    ticket::{TicketDraft, TicketRecord},
    types::TicketNumber,
};

#[derive(Debug)]
pub enum SessionError {
    Ledger(LedgerError),
    Persist(PersistError),
}

impl From<LedgerError> for SessionError {
    fn from(value: LedgerError) -> Self {
        Self::Ledger(value)
    }
}

impl From<PersistError> for SessionError {
    fn from(value: PersistError) -> Self {
        Self::Persist(value)
    }
}

/// One operating session over one ledger: every mutation is made durable
/// before the in-memory state changes, so a failed write leaves the session
/// exactly as it was before the call.
pub struct LedgerSession {
    ledger: Ledger,
    store: Option<Box<dyn TicketStore>>,
}

impl LedgerSession {
    /// Loads the stored rows and restores the ledger from them.
    ///
    /// Malformed content has already been degraded to fewer rows by the
    /// store; only genuinely unreadable storage surfaces an error here.
    pub fn open(mut store: Box<dyn TicketStore>) -> Result<Self, SessionError> {
        let rows = store.load()?;
        Ok(Self {
            ledger: Ledger::restore(&rows),
            store: Some(store),
        })
    }

    /// Session without durable storage, useful for dry runs and tests.
    pub fn in_memory() -> Self {
        Self {
            ledger: Ledger::new(),
            store: None,
        }
    }

    /// Allocates the next number for `draft`, makes the append durable, then
    /// commits it in memory. Returns the assigned number.
    pub fn issue(&mut self, draft: TicketDraft) -> Result<TicketNumber, SessionError> {
        let record = self.ledger.prepare(draft)?;
        if let Some(store) = self.store.as_mut() {
            store.commit_issue(self.ledger.records(), &record)?;
        }
        let number = record.number;
        self.ledger.commit(record);
        Ok(number)
    }

    /// Empties the active log and rewinds the cursor to 1. The archive, when
    /// one is kept, is not touched.
    pub fn reset(&mut self) -> Result<(), SessionError> {
        if let Some(store) = self.store.as_mut() {
            store.commit_reset()?;
        }
        self.ledger.reset();
        Ok(())
    }

    /// Operator override of the numbering cursor.
    ///
    /// Session-state only: a reload recomputes the cursor from the stored
    /// records, exactly as if the process had restarted.
    pub fn set_next_number(&mut self, n: TicketNumber) -> Result<(), SessionError> {
        self.ledger.set_next_number(n)?;
        Ok(())
    }

    pub fn records(&self) -> &[TicketRecord] {
        self.ledger.records()
    }

    pub fn next_number(&self) -> TicketNumber {
        self.ledger.next_number()
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Archive rows as stored, across all resets of the active log.
    pub fn archive(&mut self) -> Result<Vec<RawTicketRow>, SessionError> {
        match self.store.as_mut() {
            Some(store) => Ok(store.load_archive()?),
            None => Ok(Vec::new()),
        }
    }

    /// Renders the active log for the operator download surface.
    /// `b','` matches the stored shape, `b'\t'` the tab-separated export.
    pub fn export_delimited(&self, delimiter: u8) -> Result<String, SessionError> {
        render_delimited(self.ledger.records(), delimiter).map_err(SessionError::from)
    }
}

/// Serializes records to a delimited table with a header row.
pub fn render_delimited(records: &[TicketRecord], delimiter: u8) -> PersistResult<String> {
    let mut writer = WriterBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(crate::persist::file::COLUMNS)?;
    for record in records {
        writer.serialize(record)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| PersistError::Message(format!("export writer: {err}")))?;
    String::from_utf8(bytes).map_err(|err| PersistError::Message(format!("export utf8: {err}")))
}
