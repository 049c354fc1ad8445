//! Typed errors for context operations and source access.
//!
//! [`EngineError`] is what [`crate::ContextHandle`] callers see.
//! [`SourceError`] never leaves a pass: a source that fails a read or a write
//! is evicted and the pass moves on.

use thiserror::Error;

use autovolume_runtime::tokio_actor::CallError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    /// Element is no longer attached to its content tree.
    #[error("media element detached from its document")]
    Detached,
    /// Owning audio graph has been closed.
    #[error("audio graph closed")]
    Closed,
    /// Host refused the read or write.
    #[error("media source rejected access: {reason}")]
    Rejected { reason: String },
}

#[derive(Debug, Error)]
pub enum EngineError {
    /// Context actor call timed out.
    #[error("context command '{operation}' timed out after {timeout_ms}ms")]
    CommandTimedOut {
        operation: &'static str,
        timeout_ms: u128,
    },
    /// Context actor exited before answering.
    #[error("context exited while handling '{operation}'")]
    ContextExited { operation: &'static str },
    /// Context actor answered with a reply of the wrong shape.
    #[error("unexpected reply to '{operation}'")]
    UnexpectedReply { operation: &'static str },
}

impl EngineError {
    pub(crate) fn from_call_error(
        operation: &'static str,
        timeout: std::time::Duration,
        err: CallError,
    ) -> Self {
        match err {
            CallError::MailboxClosed | CallError::ActorStopped => {
                Self::ContextExited { operation }
            },
            CallError::Timeout => Self::CommandTimedOut {
                operation,
                timeout_ms: timeout.as_millis(),
            },
        }
    }
}
