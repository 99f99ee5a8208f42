//! HubSpot CRM Adapter
//!
//! This module provides the adapter for the HubSpot CRM v3 REST API. It
//! implements the `ContactPort` trait, translating between HubSpot's object
//! format (`{id, properties}`) and the domain's `Contact` and `Note` types.
//!
//! # Behaviour
//!
//! - One `reqwest::Client` with the bearer token and JSON content type as
//!   default headers and a uniform request timeout
//! - No retries and no circuit breaker: each failure surfaces immediately
//! - Request tracing through `tracing`
//!
//! # Error Handling
//!
//! Every failure is normalised to `UpstreamError`:
//! - Non-2xx responses -> `status: Some(code)`, message taken from the JSON
//!   body's `message` field when present
//! - Timeouts, connection failures, and undecodable bodies -> `status: None`
//! - Ids that cannot name a single path segment (empty, `.`, `..`) are
//!   rejected before any request is sent, with `status: None`

use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};

use core_kernel::{
    ContactId, NoteId, UpstreamError, DomainPort,
    HealthCheckable, HealthCheckResult, AdapterHealth,
};

use crate::contact::{Contact, ContactProperties, Note};
use crate::fields::FieldUpdateSet;
use crate::ports::ContactPort;

/// Properties requested on every contact read
const CONTACT_PROPERTIES: [&str; 5] = ["email", "firstname", "lastname", "phone", "lifecyclestage"];

/// Configuration for the HubSpot adapter
#[derive(Debug, Clone)]
pub struct HubSpotConfig {
    /// Base URL of the REST API
    pub base_url: String,

    /// Base URL of the HubSpot web app, used for contact links
    pub app_url: String,

    /// Private-app access token sent as a bearer credential
    pub access_token: String,

    /// Request timeout in seconds, applied to every call
    pub timeout_secs: u64,
}

impl Default for HubSpotConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.hubapi.com".to_string(),
            app_url: "https://app.hubspot.com".to_string(),
            access_token: String::new(),
            timeout_secs: 10,
        }
    }
}

/// HubSpot adapter implementing the ContactPort trait
///
/// # Example
///
/// ```rust,ignore
/// use domain_contact::adapters::{HubSpotAdapter, HubSpotConfig};
///
/// let adapter = HubSpotAdapter::new(HubSpotConfig {
///     access_token: "pat-na1-...".to_string(),
///     ..Default::default()
/// })?;
///
/// let contact = adapter.search_by_email("ada@example.com").await?;
/// ```
#[derive(Debug, Clone)]
pub struct HubSpotAdapter {
    config: HubSpotConfig,
    base_url: Url,
    client: Client,
}

impl HubSpotAdapter {
    /// Creates a new adapter with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL cannot carry a path, the access token
    /// is not a valid header value, or the HTTP client cannot be built.
    pub fn new(config: HubSpotConfig) -> Result<Self, UpstreamError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| UpstreamError::new(format!("invalid HubSpot base URL: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(UpstreamError::new(format!(
                "invalid HubSpot base URL: {}",
                config.base_url
            )));
        }

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.access_token))
            .map_err(|e| UpstreamError::new(format!("invalid access token: {e}")))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| UpstreamError::new(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { config, base_url, client })
    }

    /// Builds an endpoint URL below the base URL
    ///
    /// Each segment is percent-encoded on its own (`/` becomes `%2F`), so a
    /// caller-supplied id always stays one path level.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, UpstreamError> {
        if let Some(bad) = segments.iter().find(|s| matches!(**s, "" | "." | "..")) {
            return Err(UpstreamError::new(format!("invalid object id {:?}", bad)));
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| UpstreamError::new("HubSpot base URL cannot carry a path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Sends a request and decodes the JSON response body
    async fn send<R: DeserializeOwned>(&self, request: RequestBuilder) -> Result<R, UpstreamError> {
        let response = request.send().await.map_err(transport_error)?;
        let response = check_status(response).await?;
        response
            .json::<R>()
            .await
            .map_err(|e| UpstreamError::new(format!("invalid response from HubSpot: {e}")))
    }

    /// Sends a request whose response body is not needed
    async fn send_discarding(&self, request: RequestBuilder) -> Result<(), UpstreamError> {
        let response = request.send().await.map_err(transport_error)?;
        check_status(response).await?;
        Ok(())
    }
}

fn transport_error(err: reqwest::Error) -> UpstreamError {
    let message = if err.is_timeout() {
        format!("request to HubSpot timed out: {err}")
    } else {
        format!("connection error: {err}")
    };
    warn!(error = %message, "HubSpot request failed");
    UpstreamError::new(message)
}

async fn check_status(response: Response) -> Result<Response, UpstreamError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<HubSpotErrorBody>(&body)
        .ok()
        .and_then(|b| b.message)
        .unwrap_or_else(|| format!("HTTP {status}"));

    warn!(status = status.as_u16(), error = %message, "HubSpot returned an error");
    Err(UpstreamError::with_status(message, status.as_u16()))
}

impl DomainPort for HubSpotAdapter {}

#[async_trait]
impl HealthCheckable for HubSpotAdapter {
    /// Lists at most one contact to verify reachability and credentials
    async fn health_check(&self) -> HealthCheckResult {
        let start = Instant::now();
        let probe = async {
            let url = self.endpoint(&["crm", "v3", "objects", "contacts"])?;
            self.send_discarding(self.client.get(url).query(&[("limit", "1")])).await
        };

        let status = match probe.await {
            Ok(()) => AdapterHealth::Healthy,
            Err(e) => {
                debug!(error = %e, "HubSpot health probe failed");
                AdapterHealth::Unhealthy
            }
        };

        HealthCheckResult {
            adapter_id: "hubspot-adapter".to_string(),
            status,
            latency_ms: start.elapsed().as_millis() as u64,
            checked_at: Utc::now(),
        }
    }
}

#[async_trait]
impl ContactPort for HubSpotAdapter {
    #[instrument(skip(self))]
    async fn search_by_email(&self, email: &str) -> Result<Option<Contact>, UpstreamError> {
        debug!("Searching contact by email");

        let body = json!({
            "filterGroups": [{
                "filters": [{
                    "propertyName": "email",
                    "operator": "EQ",
                    "value": email,
                }]
            }],
            "properties": CONTACT_PROPERTIES,
        });

        let response: SearchResponse = self
            .send(
                self.client
                    .post(self.endpoint(&["crm", "v3", "objects", "contacts", "search"])?)
                    .json(&body),
            )
            .await?;

        if response.total == 0 {
            return Ok(None);
        }
        Ok(response.results.into_iter().next().map(HubSpotObject::into_contact))
    }

    #[instrument(skip(self), fields(contact_id = %id))]
    async fn get_by_id(&self, id: &ContactId) -> Result<Contact, UpstreamError> {
        debug!("Fetching contact by ID");

        let object: HubSpotObject = self
            .send(
                self.client
                    .get(self.endpoint(&["crm", "v3", "objects", "contacts", id.as_str()])?)
                    .query(&[("properties", CONTACT_PROPERTIES.join(","))]),
            )
            .await?;

        Ok(object.into_contact())
    }

    #[instrument(skip(self, properties))]
    async fn create_contact(&self, properties: ContactProperties) -> Result<Contact, UpstreamError> {
        debug!(fields = ?properties.keys().collect::<Vec<_>>(), "Creating contact");

        let object: HubSpotObject = self
            .send(
                self.client
                    .post(self.endpoint(&["crm", "v3", "objects", "contacts"])?)
                    .json(&json!({ "properties": properties })),
            )
            .await?;

        Ok(object.into_contact())
    }

    #[instrument(skip(self, updates), fields(contact_id = %id))]
    async fn update_contact(
        &self,
        id: &ContactId,
        updates: &FieldUpdateSet,
    ) -> Result<Contact, UpstreamError> {
        debug!(fields = ?updates.field_names(), "Updating contact");

        let object: HubSpotObject = self
            .send(
                self.client
                    .patch(self.endpoint(&["crm", "v3", "objects", "contacts", id.as_str()])?)
                    .json(&json!({ "properties": updates })),
            )
            .await?;

        Ok(object.into_contact())
    }

    #[instrument(skip(self, body))]
    async fn create_note(&self, body: &str) -> Result<Note, UpstreamError> {
        let timestamp_ms = Utc::now().timestamp_millis();
        debug!(timestamp_ms, "Creating note");

        let object: HubSpotObject = self
            .send(
                self.client
                    .post(self.endpoint(&["crm", "v3", "objects", "notes"])?)
                    .json(&json!({
                        "properties": {
                            "hs_note_body": body,
                            "hs_timestamp": timestamp_ms.to_string(),
                        }
                    })),
            )
            .await?;

        Ok(Note {
            id: NoteId::new(object.id),
            body: body.to_string(),
            created_at_millis: timestamp_ms,
        })
    }

    #[instrument(skip(self), fields(note_id = %note_id, contact_id = %contact_id))]
    async fn associate_note(&self, note_id: &NoteId, contact_id: &ContactId) -> Result<(), UpstreamError> {
        debug!("Associating note to contact");

        let url = self.endpoint(&[
            "crm",
            "v3",
            "objects",
            "notes",
            note_id.as_str(),
            "associations",
            "contacts",
            contact_id.as_str(),
            "note_to_contact",
        ])?;
        self.send_discarding(self.client.put(url)).await
    }

    fn contact_url(&self, id: &ContactId) -> String {
        format!(
            "{}/contacts/contact/{}",
            self.config.app_url.trim_end_matches('/'),
            id
        )
    }
}

// =============================================================================
// HubSpot API Data Transfer Objects
// =============================================================================

/// A CRM object as returned by HubSpot
#[derive(Debug, Deserialize)]
struct HubSpotObject {
    id: String,
    #[serde(default)]
    properties: Map<String, Value>,
}

impl HubSpotObject {
    fn into_contact(mut self) -> Contact {
        let mut take = |key: &str| -> Option<String> {
            self.properties
                .remove(key)
                .and_then(|v| v.as_str().map(str::to_string))
                .filter(|v| !v.is_empty())
        };

        Contact {
            email: take("email").unwrap_or_default(),
            firstname: take("firstname"),
            lastname: take("lastname"),
            phone: take("phone"),
            lifecyclestage: take("lifecyclestage"),
            id: ContactId::new(self.id),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    total: u64,
    #[serde(default)]
    results: Vec<HubSpotObject>,
}

#[derive(Debug, Deserialize)]
struct HubSpotErrorBody {
    message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = HubSpotConfig::default();
        assert_eq!(config.base_url, "https://api.hubapi.com");
        assert_eq!(config.timeout_secs, 10);
    }

    #[test]
    fn test_contact_url_is_derived_from_id() {
        let adapter = HubSpotAdapter::new(HubSpotConfig {
            access_token: "test".to_string(),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(
            adapter.contact_url(&ContactId::new("42")),
            "https://app.hubspot.com/contacts/contact/42"
        );
    }

    #[test]
    fn test_object_with_null_properties() {
        let object: HubSpotObject = serde_json::from_value(json!({
            "id": "7",
            "properties": {
                "email": null,
                "firstname": "Ada",
                "lastname": "",
                "hs_object_id": "7"
            }
        }))
        .unwrap();

        let contact = object.into_contact();
        assert_eq!(contact.id, ContactId::new("7"));
        assert_eq!(contact.email, "");
        assert_eq!(contact.firstname.as_deref(), Some("Ada"));
        assert_eq!(contact.lastname, None);
    }

    #[test]
    fn test_invalid_token_is_rejected() {
        let result = HubSpotAdapter::new(HubSpotConfig {
            access_token: "bad\ntoken".to_string(),
            ..Default::default()
        });
        assert!(result.is_err());
    }
}
