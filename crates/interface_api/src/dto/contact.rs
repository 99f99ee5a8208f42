//! Contact DTOs

use serde::{Deserialize, Serialize};
use validator::Validate;

use domain_contact::{
    AddNoteOutcome, ContactFieldsUpdate, CreateContactOutcome, FieldUpdateSet, NewContact, NewNote,
    UpdateContactOutcome,
};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateContactRequest {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub phone: Option<String>,
}

impl From<CreateContactRequest> for NewContact {
    fn from(request: CreateContactRequest) -> Self {
        NewContact {
            email: request.email,
            firstname: request.firstname,
            lastname: request.lastname,
            phone: request.phone,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AddNoteRequest {
    /// Email or upstream id of the contact
    pub contact_identifier: String,
    #[serde(default)]
    pub content: String,
}

impl From<AddNoteRequest> for NewNote {
    fn from(request: AddNoteRequest) -> Self {
        NewNote {
            contact_identifier: request.contact_identifier,
            content: request.content,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateContactRequest {
    /// Email or upstream id of the contact
    pub contact_identifier: String,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub phone: Option<String>,
    pub lifecyclestage: Option<String>,
}

impl From<UpdateContactRequest> for ContactFieldsUpdate {
    fn from(request: UpdateContactRequest) -> Self {
        ContactFieldsUpdate {
            contact_identifier: request.contact_identifier,
            firstname: request.firstname,
            lastname: request.lastname,
            phone: request.phone,
            lifecyclestage: request.lifecyclestage,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub id: String,
    pub email: String,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub phone: Option<String>,
    pub hubspot_url: String,
    pub message: String,
    pub already_existed: bool,
}

impl From<CreateContactOutcome> for ContactResponse {
    fn from(outcome: CreateContactOutcome) -> Self {
        let contact = outcome.contact;
        ContactResponse {
            id: contact.id.into_inner(),
            email: contact.email,
            firstname: contact.firstname,
            lastname: contact.lastname,
            phone: contact.phone,
            hubspot_url: outcome.contact_url,
            message: outcome.message,
            already_existed: outcome.already_existed,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NoteResponse {
    pub note_id: String,
    pub contact_id: String,
    pub contact_name: String,
    pub message: String,
    pub hubspot_url: String,
}

impl From<AddNoteOutcome> for NoteResponse {
    fn from(outcome: AddNoteOutcome) -> Self {
        NoteResponse {
            note_id: outcome.note_id.into_inner(),
            contact_id: outcome.contact_id.into_inner(),
            contact_name: outcome.contact_name,
            message: outcome.message,
            hubspot_url: outcome.contact_url,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ContactUpdateResponse {
    pub id: String,
    pub contact_name: String,
    pub updated_fields: FieldUpdateSet,
    pub message: String,
    pub hubspot_url: String,
}

impl From<UpdateContactOutcome> for ContactUpdateResponse {
    fn from(outcome: UpdateContactOutcome) -> Self {
        ContactUpdateResponse {
            id: outcome.contact_id.into_inner(),
            contact_name: outcome.contact_name,
            updated_fields: outcome.updated_fields,
            message: outcome.message,
            hubspot_url: outcome.contact_url,
        }
    }
}
