//! HTTP surface tests
//!
//! Every test drives the full router (middleware included) against the
//! in-memory contact port.

use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};

use core_kernel::ContactId;
use domain_contact::{Contact, CrmService, MockContactPort, PortOperation};
use interface_api::{config::ApiConfig, create_router};

fn ada() -> Contact {
    Contact::new("42", "ada@example.com")
        .with_firstname("Ada")
        .with_lastname("Lovelace")
}

async fn server_with(contacts: Vec<Contact>) -> (TestServer, Arc<MockContactPort>) {
    let port = Arc::new(MockContactPort::with_contacts(contacts).await);
    let crm = CrmService::new(port.clone());
    let server = TestServer::new(create_router(crm, ApiConfig::default()))
        .expect("test server should start");
    (server, port)
}

mod index_and_health {
    use super::*;

    #[tokio::test]
    async fn test_index_lists_endpoints() {
        let (server, _) = server_with(vec![]).await;

        let response = server.get("/").await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["message"], "CRM Integration API");
        assert_eq!(body["endpoints"]["create_contact"], "POST /crm/contact");
        assert_eq!(body["endpoints"]["update_contact"], "PATCH /crm/contact");
    }

    #[tokio::test]
    async fn test_health_reports_connected_upstream() {
        let (server, _) = server_with(vec![]).await;

        let response = server.get("/health").await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["hubspot_connected"], true);
    }

    #[tokio::test]
    async fn test_health_stays_ok_when_upstream_is_down() {
        let (server, port) = server_with(vec![]).await;
        port.fail_on(PortOperation::HealthCheck).await;

        let response = server.get("/health").await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["status"], "degraded");
        assert_eq!(body["hubspot_connected"], false);
    }

    #[tokio::test]
    async fn test_readiness_fails_when_upstream_is_down() {
        let (server, port) = server_with(vec![]).await;
        port.fail_on(PortOperation::HealthCheck).await;

        let response = server.get("/health/ready").await;
        response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_responses_carry_request_id() {
        let (server, _) = server_with(vec![]).await;

        let response = server.get("/health").await;
        assert!(response.headers().get("x-request-id").is_some());
    }
}

mod create_contact {
    use super::*;

    #[tokio::test]
    async fn test_create_then_repeat_is_idempotent() {
        let (server, port) = server_with(vec![]).await;
        let request = json!({
            "email": "grace@example.com",
            "firstname": "Grace",
            "lastname": "Hopper"
        });

        let first = server.post("/crm/contact").json(&request).await;
        first.assert_status(StatusCode::CREATED);
        let first: Value = first.json();
        assert_eq!(first["already_existed"], false);
        assert_eq!(first["message"], "Grace Hopper created successfully");

        let second = server.post("/crm/contact").json(&request).await;
        second.assert_status(StatusCode::CREATED);
        let second: Value = second.json();
        assert_eq!(second["already_existed"], true);
        assert_eq!(second["id"], first["id"]);
        assert_eq!(second["message"], "Grace Hopper already existed");

        assert_eq!(port.count_with_email("grace@example.com").await, 1);
    }

    #[tokio::test]
    async fn test_create_returns_contact_link() {
        let (server, _) = server_with(vec![]).await;

        let response = server
            .post("/crm/contact")
            .json(&json!({ "email": "new@example.com" }))
            .await;

        let body: Value = response.json();
        let id = body["id"].as_str().unwrap();
        assert_eq!(body["hubspot_url"], format!("https://crm.mock/contacts/{}", id));
        assert_eq!(body["message"], "Unnamed created successfully");
    }

    #[tokio::test]
    async fn test_invalid_email_is_unprocessable() {
        let (server, port) = server_with(vec![]).await;

        let response = server
            .post("/crm/contact")
            .json(&json!({ "email": "not-an-email" }))
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = response.json();
        assert_eq!(body["error"], "validation_error");
        assert!(port.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_upstream_failure_is_server_error() {
        let (server, port) = server_with(vec![]).await;
        port.fail_on(PortOperation::CreateContact).await;

        let response = server
            .post("/crm/contact")
            .json(&json!({ "email": "new@example.com" }))
            .await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = response.json();
        assert_eq!(body["error"], "upstream_error");
    }
}

mod add_note {
    use super::*;

    #[tokio::test]
    async fn test_note_is_created_and_associated() {
        let (server, port) = server_with(vec![ada()]).await;

        let response = server
            .post("/crm/contact/note")
            .json(&json!({
                "contact_identifier": "ada@example.com",
                "content": "Called about the engine"
            }))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["contact_id"], "42");
        assert_eq!(body["contact_name"], "Ada Lovelace");
        assert_eq!(body["message"], "Note added successfully to contact Ada Lovelace");

        let associations = port.associations().await;
        assert_eq!(associations.len(), 1);
        assert_eq!(associations[0].1, ContactId::new("42"));
    }

    #[tokio::test]
    async fn test_unknown_contact_wins_over_empty_content() {
        let (server, port) = server_with(vec![]).await;

        let response = server
            .post("/crm/contact/note")
            .json(&json!({ "contact_identifier": "nobody@example.com", "content": "" }))
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
        let body: Value = response.json();
        assert_eq!(body["message"], "Contact not found: nobody@example.com");
        assert!(port.notes().await.is_empty());
    }

    #[tokio::test]
    async fn test_blank_content_is_bad_request() {
        let (server, port) = server_with(vec![ada()]).await;

        let response = server
            .post("/crm/contact/note")
            .json(&json!({ "contact_identifier": "42", "content": "   " }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert!(port.notes().await.is_empty());
    }

    #[tokio::test]
    async fn test_failed_association_is_server_error() {
        let (server, port) = server_with(vec![ada()]).await;
        port.fail_on(PortOperation::AssociateNote).await;

        let response = server
            .post("/crm/contact/note")
            .json(&json!({ "contact_identifier": "42", "content": "Follow up" }))
            .await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        // The note stays upstream, unassociated
        assert_eq!(port.notes().await.len(), 1);
        assert!(port.associations().await.is_empty());
    }
}

mod update_contact {
    use super::*;

    #[tokio::test]
    async fn test_only_real_values_are_applied() {
        let (server, port) = server_with(vec![ada()]).await;

        let response = server
            .patch("/crm/contact")
            .json(&json!({
                "contact_identifier": "ada@example.com",
                "firstname": "null",
                "phone": "+44 20 7946 0000",
                "lifecyclestage": "customer"
            }))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["contact_name"], "Ada Lovelace");
        assert_eq!(
            body["message"],
            "Contact Ada Lovelace updated successfully. Fields: phone, lifecyclestage"
        );
        assert!(body["updated_fields"].get("firstname").is_none());

        let stored = port.contact(&ContactId::new("42")).await.unwrap();
        assert_eq!(stored.firstname.as_deref(), Some("Ada"));
        assert_eq!(stored.lifecyclestage.as_deref(), Some("customer"));
    }

    #[tokio::test]
    async fn test_updated_fields_keep_field_order() {
        let (server, _) = server_with(vec![ada()]).await;

        let response = server
            .patch("/crm/contact")
            .json(&json!({
                "contact_identifier": "42",
                "phone": "555-0100",
                "firstname": "Augusta"
            }))
            .await;

        response.assert_status_ok();
        let text = response.text();
        let firstname = text.find("\"firstname\"").unwrap();
        let phone = text.find("\"phone\"").unwrap();
        assert!(firstname < phone);
    }

    #[tokio::test]
    async fn test_only_placeholders_is_bad_request() {
        let (server, port) = server_with(vec![ada()]).await;

        let response = server
            .patch("/crm/contact")
            .json(&json!({
                "contact_identifier": "42",
                "firstname": "None",
                "phone": ""
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["message"], "no fields specified to update");
        assert!(!port.operations().await.contains(&PortOperation::UpdateContact));
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_found() {
        let (server, _) = server_with(vec![]).await;

        let response = server
            .patch("/crm/contact")
            .json(&json!({ "contact_identifier": "999", "phone": "555-0100" }))
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
    }
}
