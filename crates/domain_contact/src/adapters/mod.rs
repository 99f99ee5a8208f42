//! External Adapters for the Contact Domain
//!
//! This module provides adapter implementations for connecting to the
//! upstream contact-management system. Adapters implement the `ContactPort`
//! trait, so the service can be wired to the real upstream in production and
//! to the in-memory mock in tests.
//!
//! # Available Adapters
//!
//! - **HubSpotAdapter**: Connects to the HubSpot CRM v3 REST API
//! - **MockContactPort**: In-memory mock for testing (re-exported from ports module)
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_contact::adapters::{HubSpotAdapter, HubSpotConfig};
//! use domain_contact::ContactPort;
//! use std::sync::Arc;
//!
//! let adapter = HubSpotAdapter::new(HubSpotConfig {
//!     access_token: "secret".to_string(),
//!     timeout_secs: 10,
//!     ..Default::default()
//! })?;
//! let port: Arc<dyn ContactPort> = Arc::new(adapter);
//! ```

pub mod hubspot;

pub use hubspot::{HubSpotAdapter, HubSpotConfig};
