use crate::ticket::TicketDraft;

/// Raw operator-entered form fields, before any validation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IntakeForm {
    /// Attendee identifier field; meaning depends on the policy.
    pub identifier: String,
    /// Display name field.
    pub name: String,
    /// Contact field; meaning depends on the policy.
    pub contact: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntakeError {
    EmptyName,
    BadIdentifier(String),
    BadContact(String),
}

/// Validates a form and constructs the draft handed to the ledger.
///
/// Each attendee population differs only here; the ledger behind the policy
/// is identical for all of them and enforces nothing but contact uniqueness.
pub trait IntakePolicy: Send + Sync {
    fn admit(&self, form: &IntakeForm) -> Result<TicketDraft, IntakeError>;
}
