//! Core Kernel - Foundational types shared by the CRM facade
//!
//! This crate provides the building blocks used by the domain and API crates:
//! - Identifiers assigned by the upstream contact-management system
//! - The single failure kind raised by upstream adapters
//! - Port marker and health-probe contracts implemented by adapters

pub mod identifiers;
pub mod ports;

pub use identifiers::{ContactId, NoteId};
pub use ports::{
    UpstreamError, DomainPort,
    AdapterHealth, HealthCheckResult, HealthCheckable,
};
