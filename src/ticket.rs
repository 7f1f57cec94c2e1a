//! Ticket domain record and draft types.

use serde::{Deserialize, Serialize};

use crate::types::{Contact, TicketNumber};

/// Fully materialized, authoritative ticket record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketRecord {
    /// Number assigned by the ledger, unique within the active log.
    pub number: TicketNumber,
    /// Caller-supplied attendee identifier; empty for guest tickets.
    pub identifier: String,
    /// Caller-supplied display name.
    pub name: String,
    /// De-duplication key.
    pub contact: Contact,
}

/// Insert payload used to create a new [`TicketRecord`].
///
/// The number is always assigned by the ledger, never by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketDraft {
    /// Caller-supplied attendee identifier; empty for guest tickets.
    pub identifier: String,
    /// Caller-supplied display name.
    pub name: String,
    /// De-duplication key.
    pub contact: Contact,
}

impl TicketDraft {
    /// Convenience constructor for an addressable draft.
    pub fn addressed(
        identifier: impl Into<String>,
        name: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            name: name.into(),
            contact: Contact::Address(address.into()),
        }
    }

    /// Convenience constructor for a paper (no-contact) draft.
    pub fn paper(name: impl Into<String>) -> Self {
        Self {
            identifier: String::new(),
            name: name.into(),
            contact: Contact::Paper,
        }
    }
}
