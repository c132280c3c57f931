//! Trait abstraction for the registration endpoint to enable mocking in tests

use crate::error::SubmitError;
use async_trait::async_trait;
use serde_json::Value;

/// Remote collaborator that accepts a registration payload
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegistrationClient: Send + Sync {
    /// Post `payload` to `endpoint`; `Ok` only when the record was created
    async fn register(&self, endpoint: &str, payload: &Value) -> Result<(), SubmitError>;
}
