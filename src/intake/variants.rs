use crate::{
    ticket::TicketDraft,
    types::{Contact, NO_CONTACT_SENTINEL},
};

use super::traits::{IntakeError, IntakeForm, IntakePolicy};

const STUDENT_ID_LEN: usize = 10;
const MAILBOX_LEN: usize = 7;

/// Students: fixed-length numeric identifier, institutional mailbox prefix.
/// The contact field holds only the mailbox; the address is built from it.
#[derive(Debug, Clone)]
pub struct StudentIntake {
    mail_domain: String,
}

impl StudentIntake {
    pub fn new(mail_domain: impl Into<String>) -> Self {
        Self {
            mail_domain: mail_domain.into(),
        }
    }
}

impl IntakePolicy for StudentIntake {
    fn admit(&self, form: &IntakeForm) -> Result<TicketDraft, IntakeError> {
        let name = require_name(form)?;

        let identifier = form.identifier.trim();
        if identifier.len() != STUDENT_ID_LEN || !identifier.chars().all(|c| c.is_ascii_digit()) {
            return Err(IntakeError::BadIdentifier(form.identifier.clone()));
        }

        let mailbox = form.contact.trim();
        if mailbox.len() != MAILBOX_LEN || !mailbox.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(IntakeError::BadContact(form.contact.clone()));
        }

        Ok(TicketDraft {
            identifier: identifier.to_string(),
            name,
            contact: Contact::Address(format!("{mailbox}@{}", self.mail_domain)),
        })
    }
}

/// General admission: free-form email, identifier passed through opaquely.
#[derive(Debug, Clone, Default)]
pub struct GeneralIntake;

impl IntakePolicy for GeneralIntake {
    fn admit(&self, form: &IntakeForm) -> Result<TicketDraft, IntakeError> {
        let name = require_name(form)?;
        let address = form.contact.trim();
        if !looks_deliverable(address) {
            return Err(IntakeError::BadContact(form.contact.clone()));
        }

        Ok(TicketDraft {
            identifier: form.identifier.trim().to_string(),
            name,
            contact: Contact::Address(address.to_string()),
        })
    }
}

/// Walk-up guests: no identifier, and entering the sentinel word selects a
/// paper ticket instead of an email delivery.
#[derive(Debug, Clone, Default)]
pub struct GuestIntake;

impl IntakePolicy for GuestIntake {
    fn admit(&self, form: &IntakeForm) -> Result<TicketDraft, IntakeError> {
        let name = require_name(form)?;
        let contact = form.contact.trim();

        if contact.eq_ignore_ascii_case(NO_CONTACT_SENTINEL) {
            return Ok(TicketDraft {
                identifier: String::new(),
                name,
                contact: Contact::Paper,
            });
        }

        if !looks_deliverable(contact) {
            return Err(IntakeError::BadContact(form.contact.clone()));
        }

        Ok(TicketDraft {
            identifier: String::new(),
            name,
            contact: Contact::Address(contact.to_string()),
        })
    }
}

fn require_name(form: &IntakeForm) -> Result<String, IntakeError> {
    let name = form.name.trim();
    if name.is_empty() {
        return Err(IntakeError::EmptyName);
    }
    Ok(name.to_string())
}

fn looks_deliverable(address: &str) -> bool {
    address.contains('@') && address.len() >= 5
}
