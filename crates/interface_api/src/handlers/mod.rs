//! Request handlers

pub mod contact;
pub mod health;

use std::future::Future;

use domain_contact::CrmError;

use crate::error::ApiError;

/// Runs an orchestrator call on its own task and waits for it
///
/// If the client disconnects, the handler future is dropped but the spawned
/// task keeps going, so an upstream call sequence is never cut off halfway.
pub(crate) async fn run_to_completion<F, T>(operation: F) -> Result<T, ApiError>
where
    F: Future<Output = Result<T, CrmError>> + Send + 'static,
    T: Send + 'static,
{
    tokio::spawn(operation)
        .await
        .map_err(|e| ApiError::Internal(format!("operation task failed: {e}")))?
        .map_err(ApiError::from)
}
