//! Stream error types

use std::error::Error as StdError;
use std::sync::Arc;
use thiserror::Error;

/// Terminal failure carried through a sequence's error channel
#[derive(Error, Debug, Clone)]
pub enum StreamError {
    /// The producer at the head of the sequence failed
    #[error("source failed: {0}")]
    Source(String),

    /// An observer-supplied callback returned an error
    #[error("callback failed: {0}")]
    Callback(#[source] Arc<dyn StdError + Send + Sync>),
}

impl StreamError {
    /// Create a source error from any displayable message
    pub fn source_failed(message: impl Into<String>) -> Self {
        StreamError::Source(message.into())
    }

    /// Wrap a callback error
    pub fn callback<E>(error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        StreamError::Callback(Arc::new(error))
    }
}

/// Misuse of a subscription handle
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionError {
    /// A single-assignment handle was given a second subscription
    #[error("subscription handle was already assigned")]
    AlreadyAssigned,
}

/// Result type for subscription handle operations
pub type Result<T> = std::result::Result<T, SubscriptionError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[derive(Debug, Error)]
    #[error("boom")]
    struct Boom;

    #[test]
    fn test_callback_error_keeps_source() {
        let error = StreamError::callback(Boom);
        assert_eq!(error.to_string(), "callback failed: boom");
        assert!(error.source().is_some());
    }

    #[test]
    fn test_source_error_message() {
        let error = StreamError::source_failed("clock stopped");
        assert_eq!(error.to_string(), "source failed: clock stopped");
    }
}
