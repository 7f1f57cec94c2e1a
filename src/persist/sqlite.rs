//! SQLite-backed ticket store: active table plus append-only archive table.

use std::path::Path;

use rusqlite::{Connection, params};

use crate::{core::ledger::RawTicketRow, ticket::TicketRecord};

use super::{PersistResult, TicketStore};

/// SQLite implementation of [`crate::persist::TicketStore`].
///
/// Both tables carry the same column shape as the CSV files; the number
/// column is TEXT so that rows migrated from damaged files stay readable.
/// `commit_issue` updates the active table and the archive inside one
/// transaction, which gives the atomicity the file store can only
/// approximate.
pub struct SqliteTicketStore {
    conn: Connection,
}

impl SqliteTicketStore {
    /// Opens or creates a SQLite-backed store at `path`.
    ///
    /// Enables WAL mode and sets `synchronous=NORMAL`.
    pub fn open(path: impl AsRef<Path>) -> PersistResult<Self> {
        let conn = Connection::open(path)?;
        Self::init_connection(conn)
    }

    /// Opens an in-memory store.
    pub fn open_in_memory() -> PersistResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_connection(conn)
    }

    fn init_connection(conn: Connection) -> PersistResult<Self> {
        conn.execute_batch(include_str!("schema.sql"))?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        Ok(Self { conn })
    }

    fn read_table(&self, table: &str) -> PersistResult<Vec<RawTicketRow>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT number, identifier, name, contact FROM {table} ORDER BY position ASC"
        ))?;

        let rows = stmt.query_map([], |row| {
            Ok(RawTicketRow {
                number: row.get(0)?,
                identifier: row.get(1)?,
                name: row.get(2)?,
                contact: row.get(3)?,
            })
        })?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }
}

impl TicketStore for SqliteTicketStore {
    fn load(&mut self) -> PersistResult<Vec<RawTicketRow>> {
        self.read_table("tickets")
    }

    fn commit_issue(
        &mut self,
        existing: &[TicketRecord],
        issued: &TicketRecord,
    ) -> PersistResult<()> {
        let tx = self.conn.transaction()?;
        {
            // The active set is rewritten whole, matching the file store's contract.
            tx.execute("DELETE FROM tickets", [])?;
            let mut insert = tx.prepare(
                "INSERT INTO tickets(number, identifier, name, contact) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for record in existing.iter().chain(std::iter::once(issued)) {
                insert.execute(params![
                    record.number.to_string(),
                    record.identifier,
                    record.name,
                    record.contact.storage_str(),
                ])?;
            }

            tx.execute(
                "INSERT INTO archive(number, identifier, name, contact) VALUES (?1, ?2, ?3, ?4)",
                params![
                    issued.number.to_string(),
                    issued.identifier,
                    issued.name,
                    issued.contact.storage_str(),
                ],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    fn commit_reset(&mut self) -> PersistResult<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM tickets", [])?;
        tx.commit()?;
        Ok(())
    }

    fn load_archive(&mut self) -> PersistResult<Vec<RawTicketRow>> {
        self.read_table("archive")
    }
}
