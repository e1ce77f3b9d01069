use std::sync::Arc;

/// Unified failure type surfaced by a branch, its reaper, or its credit-governed fork.
#[derive(Debug, Clone, thiserror::Error)]
#[non_exhaustive]
pub enum BranchError {
    #[error("branch was cancelled")]
    Cancelled,

    #[error("user action failed: {0}")]
    ActionFailed(#[source] Arc<dyn std::error::Error + Send + Sync>),

    #[error("branch panicked: {0}")]
    Panicked(String),

    #[error("parent channel closed before result could be delivered")]
    ParentGone,
}

impl BranchError {
    pub fn from_action<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        BranchError::ActionFailed(Arc::new(err))
    }

    pub(crate) fn from_panic(payload: Box<dyn std::any::Any + Send>) -> Self {
        let msg = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "branch panicked with non-string payload".to_string());
        BranchError::Panicked(msg)
    }
}
