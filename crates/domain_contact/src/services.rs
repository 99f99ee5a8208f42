//! Contact domain services
//!
//! `CrmService` implements the three business operations by composing
//! upstream calls through a [`ContactPort`]. It holds no mutable state: each
//! call is a self-contained sequence of dependent upstream calls, issued one
//! after the other.

use std::sync::Arc;
use tracing::{info, warn};

use core_kernel::{ContactId, NoteId, HealthCheckResult};

use crate::contact::{Contact, ContactIdentifier, ContactProperties};
use crate::error::CrmError;
use crate::fields::{FieldUpdateSet, UpdatableField};
use crate::ports::ContactPort;

/// Input for idempotent contact creation
#[derive(Debug, Clone, Default)]
pub struct NewContact {
    pub email: String,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub phone: Option<String>,
}

impl NewContact {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            ..Default::default()
        }
    }

    pub fn with_firstname(mut self, firstname: impl Into<String>) -> Self {
        self.firstname = Some(firstname.into());
        self
    }

    pub fn with_lastname(mut self, lastname: impl Into<String>) -> Self {
        self.lastname = Some(lastname.into());
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Builds the upstream property map
    ///
    /// Always contains `email`; optional fields appear only when present and
    /// non-empty, so no nulls or empty strings are sent upstream.
    pub fn to_properties(&self) -> ContactProperties {
        let mut properties = ContactProperties::new();
        properties.insert("email".to_string(), self.email.clone());

        let optional = [
            ("firstname", &self.firstname),
            ("lastname", &self.lastname),
            ("phone", &self.phone),
        ];
        for (name, value) in optional {
            if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                properties.insert(name.to_string(), value.to_string());
            }
        }
        properties
    }
}

/// Result of idempotent contact creation
#[derive(Debug, Clone)]
pub struct CreateContactOutcome {
    pub contact: Contact,
    pub contact_url: String,
    /// True when a contact with the email existed and nothing was written
    pub already_existed: bool,
    pub message: String,
}

/// Input for adding a note to a contact
#[derive(Debug, Clone, Default)]
pub struct NewNote {
    /// Email or upstream id of the contact
    pub contact_identifier: String,
    pub content: String,
}

/// Result of adding a note
#[derive(Debug, Clone)]
pub struct AddNoteOutcome {
    pub note_id: NoteId,
    pub contact_id: ContactId,
    pub contact_name: String,
    pub contact_url: String,
    pub message: String,
}

/// Input for a selective contact update
#[derive(Debug, Clone, Default)]
pub struct ContactFieldsUpdate {
    /// Email or upstream id of the contact
    pub contact_identifier: String,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub phone: Option<String>,
    pub lifecyclestage: Option<String>,
}

impl ContactFieldsUpdate {
    /// Builds the update set from fields carrying real values
    pub fn to_update_set(&self) -> FieldUpdateSet {
        let mut updates = FieldUpdateSet::new();
        for field in UpdatableField::ALL {
            let value = match field {
                UpdatableField::Firstname => self.firstname.as_deref(),
                UpdatableField::Lastname => self.lastname.as_deref(),
                UpdatableField::Phone => self.phone.as_deref(),
                UpdatableField::Lifecyclestage => self.lifecyclestage.as_deref(),
            };
            updates.insert_if_real(field, value);
        }
        updates
    }
}

/// Result of a selective contact update
#[derive(Debug, Clone)]
pub struct UpdateContactOutcome {
    pub contact_id: ContactId,
    /// Display name computed from the pre-update properties
    pub contact_name: String,
    pub contact_url: String,
    pub updated_fields: FieldUpdateSet,
    pub message: String,
}

/// Service orchestrating contact operations against the upstream
///
/// # Example
///
/// ```rust,ignore
/// let service = CrmService::new(Arc::new(adapter));
///
/// let outcome = service
///     .add_note_to_contact(NewNote {
///         contact_identifier: "ada@example.com".to_string(),
///         content: "Called about renewal".to_string(),
///     })
///     .await?;
/// println!("{}", outcome.message);
/// ```
#[derive(Clone)]
pub struct CrmService {
    port: Arc<dyn ContactPort>,
}

impl CrmService {
    /// Creates a service over the given upstream port
    pub fn new(port: Arc<dyn ContactPort>) -> Self {
        Self { port }
    }

    /// Returns the upstream UI link for a contact
    pub fn contact_url(&self, id: &ContactId) -> String {
        self.port.contact_url(id)
    }

    /// Probes the upstream
    ///
    /// Never fails; an unreachable upstream yields an unhealthy result.
    pub async fn upstream_health(&self) -> HealthCheckResult {
        self.port.health_check().await
    }

    /// Resolves an email or upstream id to a contact
    ///
    /// Emails are looked up by search; a miss is `ContactNotFound`. Ids are
    /// fetched directly and any failure, including transport errors, is
    /// reported as `ContactNotFound`. A failed email search is an upstream
    /// error.
    pub async fn resolve_contact(&self, identifier: &str) -> Result<Contact, CrmError> {
        match ContactIdentifier::parse(identifier) {
            ContactIdentifier::Email(email) => self
                .port
                .search_by_email(&email)
                .await?
                .ok_or_else(|| CrmError::not_found(identifier)),
            ContactIdentifier::Id(id) => self.port.get_by_id(&id).await.map_err(|e| {
                warn!(identifier, error = %e, "Contact lookup by id failed");
                CrmError::not_found(identifier)
            }),
        }
    }

    /// Resolves a contact, reporting every failure as `ContactNotFound`
    async fn resolve_or_not_found(&self, identifier: &str) -> Result<Contact, CrmError> {
        self.resolve_contact(identifier).await.map_err(|e| {
            if e.is_upstream() {
                warn!(identifier, error = %e, "Contact resolution failed");
            }
            CrmError::not_found(identifier)
        })
    }

    /// Creates a contact unless one with the same email already exists
    ///
    /// An existing contact is returned untouched, so repeated calls with the
    /// same email never produce a second contact.
    ///
    /// # Errors
    ///
    /// Returns `CrmError::Upstream` if the search or the create fails.
    pub async fn create_contact_idempotent(
        &self,
        request: NewContact,
    ) -> Result<CreateContactOutcome, CrmError> {
        info!(email = %request.email, "Creating contact");

        if let Some(existing) = self.port.search_by_email(&request.email).await? {
            info!(contact_id = %existing.id, "Contact already exists");
            let message = format!("{} already existed", existing.display_name());
            return Ok(CreateContactOutcome {
                contact_url: self.port.contact_url(&existing.id),
                contact: existing,
                already_existed: true,
                message,
            });
        }

        let mut created = self.port.create_contact(request.to_properties()).await?;
        if created.email.is_empty() {
            created.email = request.email;
        }

        info!(contact_id = %created.id, "Contact created");
        let message = format!("{} created successfully", created.display_name());
        Ok(CreateContactOutcome {
            contact_url: self.port.contact_url(&created.id),
            contact: created,
            already_existed: false,
            message,
        })
    }

    /// Creates a note and associates it with a contact
    ///
    /// Steps run in a fixed order: resolve the contact, validate the content,
    /// create the note, associate it. Resolution failure therefore wins over
    /// empty content.
    ///
    /// # Errors
    ///
    /// - `ContactNotFound` if the identifier cannot be resolved, whatever the cause
    /// - `Validation` if the content is empty or whitespace
    /// - `Upstream` if note creation or association fails. A failed
    ///   association leaves the created note upstream, unassociated; it is
    ///   not deleted.
    pub async fn add_note_to_contact(&self, request: NewNote) -> Result<AddNoteOutcome, CrmError> {
        info!(identifier = %request.contact_identifier, "Adding note to contact");

        let contact = self.resolve_or_not_found(&request.contact_identifier).await?;

        if request.content.trim().is_empty() {
            return Err(CrmError::validation("content required"));
        }

        let contact_name = contact.display_name();
        let note = self.port.create_note(&request.content).await?;

        if let Err(e) = self.port.associate_note(&note.id, &contact.id).await {
            warn!(
                note_id = %note.id,
                contact_id = %contact.id,
                error = %e,
                "Note created but association failed; note left unassociated"
            );
            return Err(e.into());
        }

        info!(note_id = %note.id, contact_id = %contact.id, "Note added to contact");
        Ok(AddNoteOutcome {
            message: format!("Note added successfully to contact {}", contact_name),
            contact_url: self.port.contact_url(&contact.id),
            note_id: note.id,
            contact_id: contact.id,
            contact_name,
        })
    }

    /// Applies the real-valued fields of `request` to a contact
    ///
    /// # Errors
    ///
    /// - `ContactNotFound` if the identifier cannot be resolved, whatever the cause
    /// - `Validation` if no field carries a real value; the upstream is not
    ///   called in that case
    /// - `Upstream` if the update fails
    pub async fn update_contact_fields(
        &self,
        request: ContactFieldsUpdate,
    ) -> Result<UpdateContactOutcome, CrmError> {
        info!(identifier = %request.contact_identifier, "Updating contact");

        let contact = self.resolve_or_not_found(&request.contact_identifier).await?;
        let contact_name = contact.display_name();

        let updates = request.to_update_set();
        if updates.is_empty() {
            return Err(CrmError::validation("no fields specified to update"));
        }

        self.port.update_contact(&contact.id, &updates).await?;

        let fields = updates.field_names();
        info!(contact_id = %contact.id, fields = ?fields, "Contact updated");

        Ok(UpdateContactOutcome {
            message: format!(
                "Contact {} updated successfully. Fields: {}",
                contact_name,
                fields.join(", ")
            ),
            contact_url: self.port.contact_url(&contact.id),
            contact_id: contact.id,
            contact_name,
            updated_fields: updates,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::mock::{MockContactPort, PortCall, PortOperation};

    fn ada() -> Contact {
        Contact::new("42", "ada@example.com")
            .with_firstname("Ada")
            .with_lastname("Lovelace")
    }

    async fn service_with(contacts: Vec<Contact>) -> (CrmService, Arc<MockContactPort>) {
        let port = Arc::new(MockContactPort::with_contacts(contacts).await);
        (CrmService::new(port.clone()), port)
    }

    // ========================================================================
    // Resolution
    // ========================================================================

    mod resolution {
        use super::*;

        #[tokio::test]
        async fn test_resolves_email_by_search() {
            let (service, port) = service_with(vec![ada()]).await;

            let contact = service.resolve_contact("ada@example.com").await.unwrap();

            assert_eq!(contact.id, ContactId::new("42"));
            assert_eq!(port.operations().await, vec![PortOperation::SearchByEmail]);
        }

        #[tokio::test]
        async fn test_resolves_id_by_get() {
            let (service, port) = service_with(vec![ada()]).await;

            let contact = service.resolve_contact("42").await.unwrap();

            assert_eq!(contact.email, "ada@example.com");
            assert_eq!(port.operations().await, vec![PortOperation::GetById]);
        }

        #[tokio::test]
        async fn test_email_miss_is_not_found() {
            let (service, _) = service_with(vec![]).await;

            let err = service.resolve_contact("nobody@example.com").await.unwrap_err();
            assert!(matches!(err, CrmError::ContactNotFound(ref id) if id == "nobody@example.com"));
        }

        #[tokio::test]
        async fn test_get_failure_collapses_to_not_found() {
            let (service, port) = service_with(vec![ada()]).await;
            port.fail_on(PortOperation::GetById).await;

            let err = service.resolve_contact("42").await.unwrap_err();
            assert!(err.is_not_found());
        }

        #[tokio::test]
        async fn test_search_failure_is_upstream() {
            let (service, port) = service_with(vec![]).await;
            port.fail_on(PortOperation::SearchByEmail).await;

            let err = service.resolve_contact("ada@example.com").await.unwrap_err();
            assert!(err.is_upstream());
        }
    }

    // ========================================================================
    // Idempotent creation
    // ========================================================================

    mod create_contact {
        use super::*;

        #[tokio::test]
        async fn test_second_create_returns_existing() {
            let (service, port) = service_with(vec![]).await;

            let first = service
                .create_contact_idempotent(NewContact::new("ada@example.com").with_firstname("Ada"))
                .await
                .unwrap();
            let second = service
                .create_contact_idempotent(NewContact::new("ada@example.com").with_firstname("Augusta"))
                .await
                .unwrap();

            assert!(!first.already_existed);
            assert!(second.already_existed);
            assert_eq!(first.contact.id, second.contact.id);
            assert_eq!(port.count_with_email("ada@example.com").await, 1);

            let stored = port.contact(&first.contact.id).await.unwrap();
            assert_eq!(stored.firstname.as_deref(), Some("Ada"));
        }

        #[tokio::test]
        async fn test_existing_contact_performs_no_write() {
            let (service, port) = service_with(vec![ada()]).await;

            let outcome = service
                .create_contact_idempotent(NewContact::new("ada@example.com"))
                .await
                .unwrap();

            assert!(outcome.already_existed);
            assert_eq!(outcome.message, "Ada Lovelace already existed");
            assert_eq!(port.operations().await, vec![PortOperation::SearchByEmail]);
        }

        #[tokio::test]
        async fn test_absent_fields_are_omitted() {
            let (service, port) = service_with(vec![]).await;

            let outcome = service
                .create_contact_idempotent(NewContact::new("ada@example.com").with_firstname("Ada"))
                .await
                .unwrap();

            assert_eq!(outcome.message, "Ada created successfully");
            let calls = port.calls().await;
            match &calls[1] {
                PortCall::CreateContact(properties) => {
                    let keys: Vec<_> = properties.keys().map(String::as_str).collect();
                    assert_eq!(keys, vec!["email", "firstname"]);
                }
                other => panic!("Expected CreateContact, got {other:?}"),
            }
        }

        #[tokio::test]
        async fn test_unnamed_contact_message() {
            let (service, _) = service_with(vec![]).await;

            let outcome = service
                .create_contact_idempotent(NewContact::new("anon@example.com"))
                .await
                .unwrap();

            assert_eq!(outcome.message, "Unnamed created successfully");
            assert_eq!(outcome.contact_url, format!("https://crm.mock/contacts/{}", outcome.contact.id));
        }

        #[tokio::test]
        async fn test_create_failure_is_upstream() {
            let (service, port) = service_with(vec![]).await;
            port.fail_on(PortOperation::CreateContact).await;

            let err = service
                .create_contact_idempotent(NewContact::new("ada@example.com"))
                .await
                .unwrap_err();
            assert!(err.is_upstream());
        }
    }

    // ========================================================================
    // Notes
    // ========================================================================

    mod add_note {
        use super::*;

        fn note(identifier: &str, content: &str) -> NewNote {
            NewNote {
                contact_identifier: identifier.to_string(),
                content: content.to_string(),
            }
        }

        #[tokio::test]
        async fn test_create_then_associate() {
            let (service, port) = service_with(vec![ada()]).await;

            let outcome = service.add_note_to_contact(note("42", "hello")).await.unwrap();

            let calls = port.calls().await;
            assert_eq!(calls.len(), 3);
            assert_eq!(calls[1], PortCall::CreateNote("hello".to_string()));
            assert_eq!(
                calls[2],
                PortCall::AssociateNote(outcome.note_id.clone(), ContactId::new("42"))
            );
            assert_eq!(outcome.contact_name, "Ada Lovelace");
            assert_eq!(outcome.message, "Note added successfully to contact Ada Lovelace");
        }

        #[tokio::test]
        async fn test_resolution_checked_before_content() {
            let (service, port) = service_with(vec![]).await;

            let err = service
                .add_note_to_contact(note("nobody@example.com", ""))
                .await
                .unwrap_err();

            assert!(err.is_not_found());
            assert!(port.notes().await.is_empty());
        }

        #[tokio::test]
        async fn test_blank_content_rejected() {
            let (service, port) = service_with(vec![ada()]).await;

            let err = service.add_note_to_contact(note("42", "   \n")).await.unwrap_err();

            assert!(matches!(err, CrmError::Validation(ref reason) if reason == "content required"));
            assert!(!port.operations().await.contains(&PortOperation::CreateNote));
        }

        #[tokio::test]
        async fn test_search_failure_reported_as_not_found() {
            let (service, port) = service_with(vec![ada()]).await;
            port.fail_on(PortOperation::SearchByEmail).await;

            let err = service
                .add_note_to_contact(note("ada@example.com", "hello"))
                .await
                .unwrap_err();
            assert!(err.is_not_found());
        }

        #[tokio::test]
        async fn test_association_failure_leaves_note() {
            let (service, port) = service_with(vec![ada()]).await;
            port.fail_on(PortOperation::AssociateNote).await;

            let err = service.add_note_to_contact(note("42", "hello")).await.unwrap_err();

            assert!(err.is_upstream());
            assert_eq!(port.notes().await.len(), 1);
            assert!(port.associations().await.is_empty());
            assert_eq!(
                port.operations().await,
                vec![
                    PortOperation::GetById,
                    PortOperation::CreateNote,
                    PortOperation::AssociateNote,
                ]
            );
        }

        #[tokio::test]
        async fn test_note_creation_failure_skips_association() {
            let (service, port) = service_with(vec![ada()]).await;
            port.fail_on(PortOperation::CreateNote).await;

            let err = service.add_note_to_contact(note("42", "hello")).await.unwrap_err();

            assert!(err.is_upstream());
            assert!(!port.operations().await.contains(&PortOperation::AssociateNote));
        }
    }

    // ========================================================================
    // Field updates
    // ========================================================================

    mod update_fields {
        use super::*;

        #[test]
        fn test_sentinel_filtering() {
            let request = ContactFieldsUpdate {
                contact_identifier: "42".to_string(),
                firstname: Some("  ".to_string()),
                lastname: Some("NULL".to_string()),
                phone: Some("555".to_string()),
                lifecyclestage: None,
            };

            let updates = request.to_update_set();
            assert_eq!(updates.field_names(), vec!["phone"]);
            assert_eq!(updates.get(UpdatableField::Phone), Some("555"));
        }

        #[tokio::test]
        async fn test_empty_update_set_never_calls_update() {
            let (service, port) = service_with(vec![ada()]).await;

            let err = service
                .update_contact_fields(ContactFieldsUpdate {
                    contact_identifier: "42".to_string(),
                    firstname: Some("none".to_string()),
                    lastname: Some("empty".to_string()),
                    ..Default::default()
                })
                .await
                .unwrap_err();

            assert!(matches!(err, CrmError::Validation(ref r) if r == "no fields specified to update"));
            assert!(!port.operations().await.contains(&PortOperation::UpdateContact));
        }

        #[tokio::test]
        async fn test_unknown_contact_is_not_found() {
            let (service, _) = service_with(vec![]).await;

            let err = service
                .update_contact_fields(ContactFieldsUpdate {
                    contact_identifier: "999".to_string(),
                    phone: Some("555".to_string()),
                    ..Default::default()
                })
                .await
                .unwrap_err();
            assert!(err.is_not_found());
        }

        #[tokio::test]
        async fn test_name_is_taken_before_update() {
            let (service, port) = service_with(vec![ada()]).await;

            let outcome = service
                .update_contact_fields(ContactFieldsUpdate {
                    contact_identifier: "ada@example.com".to_string(),
                    firstname: Some("Augusta".to_string()),
                    lifecyclestage: Some("customer".to_string()),
                    ..Default::default()
                })
                .await
                .unwrap();

            assert_eq!(outcome.contact_name, "Ada Lovelace");
            assert_eq!(
                outcome.message,
                "Contact Ada Lovelace updated successfully. Fields: firstname, lifecyclestage"
            );

            let stored = port.contact(&ContactId::new("42")).await.unwrap();
            assert_eq!(stored.firstname.as_deref(), Some("Augusta"));
            assert_eq!(stored.lastname.as_deref(), Some("Lovelace"));
            assert_eq!(stored.lifecyclestage.as_deref(), Some("customer"));
        }

        #[tokio::test]
        async fn test_update_failure_is_upstream() {
            let (service, port) = service_with(vec![ada()]).await;
            port.fail_on(PortOperation::UpdateContact).await;

            let err = service
                .update_contact_fields(ContactFieldsUpdate {
                    contact_identifier: "42".to_string(),
                    phone: Some("555".to_string()),
                    ..Default::default()
                })
                .await
                .unwrap_err();
            assert!(err.is_upstream());
        }
    }

    #[tokio::test]
    async fn test_upstream_health_reports_failure_as_unhealthy() {
        let (service, port) = service_with(vec![]).await;
        assert!(service.upstream_health().await.is_healthy());

        port.fail_on(PortOperation::HealthCheck).await;
        assert!(!service.upstream_health().await.is_healthy());
    }
}
