//! Shared primitive types and the contact model.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Monotonic ticket number assigned by the ledger.
pub type TicketNumber = u64;

/// Storage literal marking a ticket issued without an electronic contact.
pub const NO_CONTACT_SENTINEL: &str = "paper";

/// De-duplication key of a ticket.
///
/// The ledger never validates address syntax; it only compares addresses for
/// equality. [`Contact::Paper`] tickets are exempt from de-duplication, so any
/// number of them may coexist.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Contact {
    /// Deliverable address, opaque to the ledger.
    Address(String),
    /// No electronic contact; the ticket is handed over on paper.
    Paper,
}

impl Contact {
    /// Parses the stored column value, mapping the sentinel to [`Contact::Paper`].
    pub fn from_storage(value: &str) -> Self {
        if value == NO_CONTACT_SENTINEL {
            Self::Paper
        } else {
            Self::Address(value.to_string())
        }
    }

    /// Column value written to storage.
    pub fn storage_str(&self) -> &str {
        match self {
            Self::Address(addr) => addr,
            Self::Paper => NO_CONTACT_SENTINEL,
        }
    }

    /// Returns the address when one is present.
    pub fn address(&self) -> Option<&str> {
        match self {
            Self::Address(addr) => Some(addr),
            Self::Paper => None,
        }
    }

    /// True for the no-contact sentinel.
    pub fn is_paper(&self) -> bool {
        matches!(self, Self::Paper)
    }
}

impl fmt::Display for Contact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.storage_str())
    }
}

impl Serialize for Contact {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.storage_str())
    }
}

impl<'de> Deserialize<'de> for Contact {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(Self::from_storage(&value))
    }
}
