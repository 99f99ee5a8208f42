//! Contact Domain
//!
//! This crate holds the CRM orchestration core: the contact and note model,
//! the rules for which caller-supplied values count as real field values,
//! the port through which the upstream contact system is reached, and the
//! service that composes upstream calls into the three business operations.
//!
//! # Operations
//!
//! - **Idempotent creation**: a contact is created only if no contact with
//!   the same email exists upstream. A repeat call returns the existing
//!   contact untouched.
//! - **Add note**: resolves the contact, creates a note, then associates the
//!   note with the contact. A failed association leaves the note upstream and
//!   is reported as an upstream error.
//! - **Update fields**: resolves the contact and applies only fields carrying
//!   real values; placeholder strings such as `"null"` are ignored.
//!
//! # Examples
//!
//! ```rust,ignore
//! use domain_contact::{CrmService, HubSpotAdapter, HubSpotConfig, NewContact};
//! use std::sync::Arc;
//!
//! let adapter = HubSpotAdapter::new(HubSpotConfig {
//!     access_token: token,
//!     ..Default::default()
//! })?;
//! let service = CrmService::new(Arc::new(adapter));
//!
//! let outcome = service
//!     .create_contact_idempotent(NewContact::new("ada@example.com").with_firstname("Ada"))
//!     .await?;
//! assert!(!outcome.already_existed);
//! ```

pub mod contact;
pub mod fields;
pub mod error;
pub mod ports;
pub mod adapters;
pub mod services;

pub use contact::{Contact, ContactIdentifier, ContactProperties, Note, full_name, UNNAMED};
pub use fields::{FieldUpdateSet, UpdatableField, is_real_value};
pub use error::CrmError;
pub use ports::ContactPort;
#[cfg(any(test, feature = "mock"))]
pub use ports::mock::{MockContactPort, PortCall, PortOperation};
pub use adapters::{HubSpotAdapter, HubSpotConfig};
pub use services::{
    CrmService,
    NewContact, CreateContactOutcome,
    NewNote, AddNoteOutcome,
    ContactFieldsUpdate, UpdateContactOutcome,
};
