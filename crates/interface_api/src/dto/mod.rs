//! Request/response data transfer objects

pub mod contact;
pub mod health;
