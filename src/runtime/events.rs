//! Runtime event stream payloads.

use crate::types::TicketNumber;

/// Events emitted from the single-writer runtime loop.
///
/// Every event is sent only after the corresponding write is durable; there
/// is no separate durability notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TicketEvent {
    /// A ticket was accepted and persisted.
    Issued {
        /// Assigned ticket number.
        number: TicketNumber,
    },
    /// The active log was cleared by an operator.
    LogCleared,
    /// The numbering cursor was moved by an operator.
    CounterMoved {
        /// New next number.
        next: TicketNumber,
    },
}
