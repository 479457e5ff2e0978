// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use soldium_model::{AuthError, AuthOperation, ValidationError};
use soldium_store::{DocumentStore, StoreError, StoreErrorCode};

pub mod accounts;
pub mod countdown;
pub mod live_view;
pub mod partnership;
pub mod review;
pub mod submission;

pub const AUDIT_TARGET: &str = "soldium_audit";

/// Failure of a workflow operation, before it is rendered for the wire.
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceError {
    Validation(ValidationError),
    Auth(AuthError, AuthOperation),
    Unauthenticated,
    Forbidden(&'static str),
    Store(StoreError),
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(e) => write!(f, "validation: {e}"),
            Self::Auth(e, _) => write!(f, "auth: {e}"),
            Self::Unauthenticated => f.write_str("unauthenticated"),
            Self::Forbidden(reason) => write!(f, "forbidden: {reason}"),
            Self::Store(e) => write!(f, "store: {e}"),
        }
    }
}

impl std::error::Error for ServiceError {}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Runs a blocking store call off the async workers.
pub(crate) async fn run_store<T, F>(store: &Arc<dyn DocumentStore>, op: F) -> Result<T, StoreError>
where
    T: Send + 'static,
    F: FnOnce(&dyn DocumentStore) -> Result<T, StoreError> + Send + 'static,
{
    let store = Arc::clone(store);
    tokio::task::spawn_blocking(move || op(store.as_ref()))
        .await
        .map_err(|e| StoreError::new(StoreErrorCode::Internal, format!("store task failed: {e}")))?
}
