//! Ports and Adapters Infrastructure
//!
//! This module provides the foundational types for the hexagonal
//! architecture (ports and adapters) used by the contact domain.
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Application Layer                        │
//! │                 (CrmService orchestration)                   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Port Traits                             │
//! │                      (ContactPort)                           │
//! │      Defined in the domain, depend only on core_kernel       │
//! └─────────────────────────────────────────────────────────────┘
//!                    ▲                         ▲
//!                    │                         │
//!         ┌─────────┴─────────┐     ┌────────┴────────┐
//!         │   Mock Adapter    │     │ External Adapter │
//!         │   (in-memory)     │     │  (HubSpot REST)  │
//!         └───────────────────┘     └──────────────────┘
//! ```
//!
//! Adapters report every failure as an [`UpstreamError`]. They never retry;
//! a failed call surfaces to the caller immediately.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for upstream port operations
///
/// Transport failures (connect, timeout, decode) carry no status. HTTP
/// failures carry the status code the upstream returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Upstream error: {message}")]
pub struct UpstreamError {
    /// Human-readable failure detail
    pub message: String,
    /// HTTP status returned by the upstream, if any
    pub status: Option<u16>,
}

impl UpstreamError {
    /// Creates an error with no HTTP status (transport-level failure)
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
        }
    }

    /// Creates an error carrying the upstream HTTP status
    pub fn with_status(message: impl Into<String>, status: u16) -> Self {
        Self {
            message: message.into(),
            status: Some(status),
        }
    }

    /// Returns true if the upstream answered 404
    pub fn is_not_found(&self) -> bool {
        self.status == Some(404)
    }

    /// Returns true if this failure may succeed when attempted again later
    ///
    /// Only recorded in failure logs; adapters never retry.
    pub fn is_transient(&self) -> bool {
        match self.status {
            None => true,
            Some(status) => status == 429 || status >= 500,
        }
    }
}

/// Marker trait for all domain ports
///
/// All port traits extend this marker so that adapters are thread-safe
/// and can be shared across request handlers.
pub trait DomainPort: Send + Sync + 'static {}

/// Health status for an adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdapterHealth {
    /// Upstream answered the probe
    Healthy,
    /// Upstream could not be reached or rejected the probe
    Unhealthy,
}

/// Health check result for an adapter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheckResult {
    /// Adapter identifier
    pub adapter_id: String,
    /// Current health status
    pub status: AdapterHealth,
    /// Latency of the health check in milliseconds
    pub latency_ms: u64,
    /// Timestamp of the health check
    pub checked_at: chrono::DateTime<chrono::Utc>,
}

impl HealthCheckResult {
    /// Returns true if the probe reached the upstream
    pub fn is_healthy(&self) -> bool {
        self.status == AdapterHealth::Healthy
    }
}

/// Trait for adapters that support health checks
///
/// Implementations must perform a bounded, read-only call and must not
/// surface upstream error detail in the result.
#[async_trait::async_trait]
pub trait HealthCheckable: Send + Sync {
    /// Performs a health check on the adapter
    async fn health_check(&self) -> HealthCheckResult;
}
