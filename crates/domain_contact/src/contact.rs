//! Contact and note model
//!
//! Contacts and notes live upstream. This system holds them only for the
//! duration of a request and never persists or deletes them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use core_kernel::{ContactId, NoteId};

use crate::fields::{FieldUpdateSet, UpdatableField};

/// Display name used when a contact has neither first nor last name
pub const UNNAMED: &str = "Unnamed";

/// Raw property map sent to the upstream when creating a contact
pub type ContactProperties = BTreeMap<String, String>;

/// A contact as currently represented upstream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Upstream-assigned identity
    pub id: ContactId,
    /// Natural secondary key used for idempotent lookup
    pub email: String,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub phone: Option<String>,
    pub lifecyclestage: Option<String>,
}

impl Contact {
    /// Creates a contact with only an id and email
    pub fn new(id: impl Into<ContactId>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            firstname: None,
            lastname: None,
            phone: None,
            lifecyclestage: None,
        }
    }

    /// Sets the first name
    pub fn with_firstname(mut self, firstname: impl Into<String>) -> Self {
        self.firstname = Some(firstname.into());
        self
    }

    /// Sets the last name
    pub fn with_lastname(mut self, lastname: impl Into<String>) -> Self {
        self.lastname = Some(lastname.into());
        self
    }

    /// Sets the phone number
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Returns the contact's display name
    ///
    /// See [`full_name`].
    pub fn display_name(&self) -> String {
        full_name(self.firstname.as_deref(), self.lastname.as_deref())
    }

    /// Applies a partial update; fields not in the set are left untouched
    pub fn apply(&mut self, updates: &FieldUpdateSet) {
        for (field, value) in updates.iter() {
            let slot = match field {
                UpdatableField::Firstname => &mut self.firstname,
                UpdatableField::Lastname => &mut self.lastname,
                UpdatableField::Phone => &mut self.phone,
                UpdatableField::Lifecyclestage => &mut self.lifecyclestage,
            };
            *slot = Some(value.to_string());
        }
    }
}

/// Joins first and last name with a single space and trims the result
///
/// Returns [`UNNAMED`] when both parts are absent or blank.
///
/// # Examples
///
/// ```
/// use domain_contact::full_name;
///
/// assert_eq!(full_name(Some("Ada"), Some("Lovelace")), "Ada Lovelace");
/// assert_eq!(full_name(Some("Ada"), None), "Ada");
/// assert_eq!(full_name(None, Some("  ")), "Unnamed");
/// ```
pub fn full_name(firstname: Option<&str>, lastname: Option<&str>) -> String {
    let joined = format!("{} {}", firstname.unwrap_or(""), lastname.unwrap_or(""));
    let trimmed = joined.trim();
    if trimmed.is_empty() {
        UNNAMED.to_string()
    } else {
        trimmed.to_string()
    }
}

/// A note created upstream and attached to exactly one contact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub body: String,
    /// Epoch milliseconds stamped when the note was created
    pub created_at_millis: i64,
}

/// A caller-supplied reference to a contact
///
/// Anything containing `@` is treated as an email; everything else is an
/// opaque upstream id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactIdentifier {
    Email(String),
    Id(ContactId),
}

impl ContactIdentifier {
    /// Classifies a raw identifier
    pub fn parse(raw: &str) -> Self {
        if raw.contains('@') {
            ContactIdentifier::Email(raw.to_string())
        } else {
            ContactIdentifier::Id(ContactId::new(raw))
        }
    }
}

impl fmt::Display for ContactIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContactIdentifier::Email(email) => f.write_str(email),
            ContactIdentifier::Id(id) => write!(f, "{}", id),
        }
    }
}
