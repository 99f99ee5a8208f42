//! Contact Domain Ports
//!
//! This module defines the port through which the contact domain reaches the
//! upstream contact-management system, enabling swappable implementations
//! (HubSpot REST, in-memory mock).
//!
//! # Contract
//!
//! Every method returns the upstream's current representation or fails with
//! [`UpstreamError`]. Implementations bound every call with a timeout and
//! never retry: a write retried behind the caller's back could be applied
//! twice upstream.
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_contact::{ContactPort, CrmService};
//! use std::sync::Arc;
//!
//! let port: Arc<dyn ContactPort> = Arc::new(adapter);
//! let service = CrmService::new(port);
//! ```

use async_trait::async_trait;

use core_kernel::{ContactId, NoteId, UpstreamError, DomainPort, HealthCheckable};

use crate::contact::{Contact, ContactProperties, Note};
use crate::fields::FieldUpdateSet;

/// The port trait for upstream contact operations
#[async_trait]
pub trait ContactPort: DomainPort + HealthCheckable {
    /// Finds a contact by exact email match
    ///
    /// Returns `Ok(None)` when nothing matches. When the upstream reports
    /// several matches, the first one is returned.
    async fn search_by_email(&self, email: &str) -> Result<Option<Contact>, UpstreamError>;

    /// Retrieves a contact by upstream id
    ///
    /// An unknown id is an `UpstreamError` (typically status 404).
    async fn get_by_id(&self, id: &ContactId) -> Result<Contact, UpstreamError>;

    /// Creates a contact from a property map
    async fn create_contact(&self, properties: ContactProperties) -> Result<Contact, UpstreamError>;

    /// Applies a partial update; fields not in `updates` are untouched upstream
    async fn update_contact(
        &self,
        id: &ContactId,
        updates: &FieldUpdateSet,
    ) -> Result<Contact, UpstreamError>;

    /// Creates a note stamped with the current time in epoch milliseconds
    async fn create_note(&self, body: &str) -> Result<Note, UpstreamError>;

    /// Associates an existing note with a contact
    async fn associate_note(&self, note_id: &NoteId, contact_id: &ContactId) -> Result<(), UpstreamError>;

    /// Returns the upstream UI link for a contact, derived from its id only
    fn contact_url(&self, id: &ContactId) -> String;
}

/// Mock implementation of ContactPort for testing
///
/// This adapter stores contacts and notes in memory, records every call in
/// order, and can be told to fail any operation.
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use chrono::Utc;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;
    use tokio::sync::RwLock;

    use core_kernel::{AdapterHealth, HealthCheckResult};

    /// Base URL used by [`MockContactPort::contact_url`]
    pub const MOCK_CONTACT_URL: &str = "https://crm.mock/contacts";

    /// Operations that can be made to fail
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum PortOperation {
        SearchByEmail,
        GetById,
        CreateContact,
        UpdateContact,
        CreateNote,
        AssociateNote,
        HealthCheck,
    }

    /// A recorded call with its arguments
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum PortCall {
        SearchByEmail(String),
        GetById(ContactId),
        CreateContact(ContactProperties),
        UpdateContact(ContactId, FieldUpdateSet),
        CreateNote(String),
        AssociateNote(NoteId, ContactId),
        HealthCheck,
    }

    impl PortCall {
        pub fn operation(&self) -> PortOperation {
            match self {
                PortCall::SearchByEmail(_) => PortOperation::SearchByEmail,
                PortCall::GetById(_) => PortOperation::GetById,
                PortCall::CreateContact(_) => PortOperation::CreateContact,
                PortCall::UpdateContact(..) => PortOperation::UpdateContact,
                PortCall::CreateNote(_) => PortOperation::CreateNote,
                PortCall::AssociateNote(..) => PortOperation::AssociateNote,
                PortCall::HealthCheck => PortOperation::HealthCheck,
            }
        }
    }

    /// In-memory mock implementation of ContactPort
    #[derive(Debug, Default)]
    pub struct MockContactPort {
        contacts: Arc<RwLock<Vec<Contact>>>,
        notes: Arc<RwLock<Vec<Note>>>,
        associations: Arc<RwLock<Vec<(NoteId, ContactId)>>>,
        calls: Arc<RwLock<Vec<PortCall>>>,
        failures: Arc<RwLock<HashSet<PortOperation>>>,
        next_id: AtomicU64,
    }

    impl MockContactPort {
        /// Creates a new mock port
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates with contacts for testing
        pub async fn with_contacts(contacts: Vec<Contact>) -> Self {
            let port = Self::new();
            port.contacts.write().await.extend(contacts);
            port
        }

        /// Makes every subsequent call of `operation` fail with status 500
        pub async fn fail_on(&self, operation: PortOperation) {
            self.failures.write().await.insert(operation);
        }

        /// Calls recorded so far, in order
        pub async fn calls(&self) -> Vec<PortCall> {
            self.calls.read().await.clone()
        }

        /// Recorded operations, in order
        pub async fn operations(&self) -> Vec<PortOperation> {
            self.calls.read().await.iter().map(PortCall::operation).collect()
        }

        /// Number of stored contacts with this email
        pub async fn count_with_email(&self, email: &str) -> usize {
            self.contacts
                .read()
                .await
                .iter()
                .filter(|c| c.email.eq_ignore_ascii_case(email))
                .count()
        }

        /// Current stored state of a contact
        pub async fn contact(&self, id: &ContactId) -> Option<Contact> {
            self.contacts.read().await.iter().find(|c| &c.id == id).cloned()
        }

        /// Notes created so far
        pub async fn notes(&self) -> Vec<Note> {
            self.notes.read().await.clone()
        }

        /// Note-to-contact associations made so far
        pub async fn associations(&self) -> Vec<(NoteId, ContactId)> {
            self.associations.read().await.clone()
        }

        async fn record(&self, call: PortCall) -> Result<(), UpstreamError> {
            let operation = call.operation();
            self.calls.write().await.push(call);
            if self.failures.read().await.contains(&operation) {
                return Err(UpstreamError::with_status(
                    format!("injected failure for {:?}", operation),
                    500,
                ));
            }
            Ok(())
        }

        fn next_id(&self) -> String {
            (1000 + self.next_id.fetch_add(1, Ordering::Relaxed)).to_string()
        }
    }

    impl DomainPort for MockContactPort {}

    #[async_trait]
    impl HealthCheckable for MockContactPort {
        async fn health_check(&self) -> HealthCheckResult {
            let status = match self.record(PortCall::HealthCheck).await {
                Ok(()) => AdapterHealth::Healthy,
                Err(_) => AdapterHealth::Unhealthy,
            };
            HealthCheckResult {
                adapter_id: "mock-contact-port".to_string(),
                status,
                latency_ms: 0,
                checked_at: Utc::now(),
            }
        }
    }

    #[async_trait]
    impl ContactPort for MockContactPort {
        async fn search_by_email(&self, email: &str) -> Result<Option<Contact>, UpstreamError> {
            self.record(PortCall::SearchByEmail(email.to_string())).await?;
            Ok(self
                .contacts
                .read()
                .await
                .iter()
                .find(|c| c.email.eq_ignore_ascii_case(email))
                .cloned())
        }

        async fn get_by_id(&self, id: &ContactId) -> Result<Contact, UpstreamError> {
            self.record(PortCall::GetById(id.clone())).await?;
            self.contact(id)
                .await
                .ok_or_else(|| UpstreamError::with_status(format!("Contact {} not found", id), 404))
        }

        async fn create_contact(&self, properties: ContactProperties) -> Result<Contact, UpstreamError> {
            self.record(PortCall::CreateContact(properties.clone())).await?;

            let contact = Contact {
                id: ContactId::new(self.next_id()),
                email: properties.get("email").cloned().unwrap_or_default(),
                firstname: properties.get("firstname").cloned(),
                lastname: properties.get("lastname").cloned(),
                phone: properties.get("phone").cloned(),
                lifecyclestage: properties.get("lifecyclestage").cloned(),
            };
            self.contacts.write().await.push(contact.clone());
            Ok(contact)
        }

        async fn update_contact(
            &self,
            id: &ContactId,
            updates: &FieldUpdateSet,
        ) -> Result<Contact, UpstreamError> {
            self.record(PortCall::UpdateContact(id.clone(), updates.clone())).await?;

            let mut contacts = self.contacts.write().await;
            let contact = contacts
                .iter_mut()
                .find(|c| &c.id == id)
                .ok_or_else(|| UpstreamError::with_status(format!("Contact {} not found", id), 404))?;
            contact.apply(updates);
            Ok(contact.clone())
        }

        async fn create_note(&self, body: &str) -> Result<Note, UpstreamError> {
            self.record(PortCall::CreateNote(body.to_string())).await?;

            let note = Note {
                id: NoteId::new(self.next_id()),
                body: body.to_string(),
                created_at_millis: Utc::now().timestamp_millis(),
            };
            self.notes.write().await.push(note.clone());
            Ok(note)
        }

        async fn associate_note(&self, note_id: &NoteId, contact_id: &ContactId) -> Result<(), UpstreamError> {
            self.record(PortCall::AssociateNote(note_id.clone(), contact_id.clone())).await?;
            self.associations
                .write()
                .await
                .push((note_id.clone(), contact_id.clone()));
            Ok(())
        }

        fn contact_url(&self, id: &ContactId) -> String {
            format!("{}/{}", MOCK_CONTACT_URL, id)
        }
    }
}
