use std::path::PathBuf;

use thiserror::Error;

use autovolume_runtime::tokio_actor::CallError;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("settings file {path} is not valid settings JSON: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("settings store task failed: {0}")]
    Task(String),
}

#[derive(Debug, Error)]
pub enum AggregatorError {
    #[error("aggregator command '{operation}' timed out after {timeout_ms}ms")]
    CommandTimedOut {
        operation: &'static str,
        timeout_ms: u128,
    },
    #[error("aggregator exited while handling '{operation}'")]
    Exited { operation: &'static str },
    #[error("unexpected reply to '{operation}'")]
    UnexpectedReply { operation: &'static str },
    #[error("failed to encode aggregator response: {0}")]
    Encode(#[from] serde_json::Error),
}

impl AggregatorError {
    pub(crate) fn from_call_error(
        operation: &'static str,
        timeout: std::time::Duration,
        err: CallError,
    ) -> Self {
        match err {
            CallError::MailboxClosed | CallError::ActorStopped => Self::Exited { operation },
            CallError::Timeout => Self::CommandTimedOut {
                operation,
                timeout_ms: timeout.as_millis(),
            },
        }
    }
}
