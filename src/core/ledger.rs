use tracing::{debug, warn};

use crate::{
    core::indices::ContactIndex,
    ticket::{TicketDraft, TicketRecord},
    types::{Contact, TicketNumber},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    DuplicateContact(String),
    InvalidNumber(TicketNumber),
}

/// Row as it came back from storage, before the number field is parsed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawTicketRow {
    pub number: String,
    pub identifier: String,
    pub name: String,
    pub contact: String,
}

impl RawTicketRow {
    /// Builds the row written for `record`.
    pub fn from_record(record: &TicketRecord) -> Self {
        Self {
            number: record.number.to_string(),
            identifier: record.identifier.clone(),
            name: record.name.clone(),
            contact: record.contact.storage_str().to_string(),
        }
    }
}

/// Append-only ticket log plus the numbering cursor.
///
/// Invariant: `next_number == 1 + max(record numbers, default 0)` after every
/// restore and every commit, except immediately after an operator override
/// via [`Ledger::set_next_number`].
#[derive(Debug, Default)]
pub struct Ledger {
    records: Vec<TicketRecord>,
    by_contact: ContactIndex,
    next_number: TicketNumber,
}

impl Ledger {
    pub fn new() -> Self {
        Self {
            next_number: 1,
            ..Self::default()
        }
    }

    /// Rebuilds a ledger from stored rows, best effort.
    ///
    /// Rows without a parseable positive number are skipped; the cursor is
    /// recomputed from whatever survived. Garbage storage therefore degrades
    /// to a smaller (possibly empty) ledger instead of an error.
    pub fn restore(rows: &[RawTicketRow]) -> Self {
        let mut ledger = Self::new();
        let mut skipped = 0usize;

        for row in rows {
            let number = match row.number.trim().parse::<TicketNumber>() {
                Ok(n) if n > 0 => n,
                _ => {
                    skipped += 1;
                    continue;
                }
            };
            ledger.commit(TicketRecord {
                number,
                identifier: row.identifier.clone(),
                name: row.name.clone(),
                contact: Contact::from_storage(&row.contact),
            });
        }

        if skipped > 0 {
            warn!(skipped, "ignored stored rows without a usable ticket number");
        }
        debug!(
            records = ledger.records.len(),
            next = ledger.next_number,
            "ledger restored"
        );
        ledger
    }

    /// Checks the duplicate-contact rule and assigns the next number, without
    /// mutating the ledger. Callers persist the returned record first and
    /// [`Ledger::commit`] it once the write is durable.
    pub fn prepare(&self, draft: TicketDraft) -> Result<TicketRecord, LedgerError> {
        if let Contact::Address(addr) = &draft.contact {
            if self.by_contact.contains_key(addr.as_str()) {
                return Err(LedgerError::DuplicateContact(addr.clone()));
            }
        }

        Ok(TicketRecord {
            number: self.next_number,
            identifier: draft.identifier,
            name: draft.name,
            contact: draft.contact,
        })
    }

    /// Appends a record and advances the cursor past its number.
    pub fn commit(&mut self, record: TicketRecord) {
        self.next_number = self.next_number.max(record.number.saturating_add(1));
        if let Contact::Address(addr) = &record.contact {
            self.by_contact
                .entry(addr.clone())
                .or_default()
                .push(self.records.len());
        }
        self.records.push(record);
    }

    /// Prepare + commit in one step, for use without a durable store.
    pub fn issue(&mut self, draft: TicketDraft) -> Result<TicketNumber, LedgerError> {
        let record = self.prepare(draft)?;
        let number = record.number;
        self.commit(record);
        Ok(number)
    }

    /// Clears the active log and rewinds the cursor to 1.
    pub fn reset(&mut self) {
        self.records.clear();
        self.by_contact.clear();
        self.next_number = 1;
    }

    /// Operator override of the cursor. Records are untouched.
    ///
    /// A target at or below the highest issued number is allowed but logged:
    /// the next accepted ticket would repeat a number already on the log.
    pub fn set_next_number(&mut self, n: TicketNumber) -> Result<(), LedgerError> {
        if n == 0 {
            return Err(LedgerError::InvalidNumber(n));
        }
        let max = self.max_number();
        if n <= max {
            warn!(requested = n, max_issued = max, "cursor moved at or below an issued number");
        }
        self.next_number = n;
        Ok(())
    }

    pub fn records(&self) -> &[TicketRecord] {
        &self.records
    }

    pub fn next_number(&self) -> TicketNumber {
        self.next_number
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// True when a non-sentinel contact is already on the active log.
    pub fn contains_contact(&self, address: &str) -> bool {
        self.by_contact.contains_key(address)
    }

    /// All records issued to `address`, in insertion order.
    pub fn by_contact(&self, address: &str) -> Vec<&TicketRecord> {
        self.by_contact
            .get(address)
            .into_iter()
            .flat_map(|positions| positions.iter())
            .filter_map(|pos| self.records.get(*pos))
            .collect()
    }

    fn max_number(&self) -> TicketNumber {
        self.records.iter().map(|r| r.number).max().unwrap_or(0)
    }
}
