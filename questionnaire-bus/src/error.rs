/// Error returned by a subscriber while handling an event.
///
/// The bus never surfaces these to the publisher. They are logged and
/// delivery continues with the next subscriber.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    /// The handler refused the event.
    #[error("Event rejected: {0}")]
    Rejected(String),

    /// Any other failure inside the handler.
    #[error("Handler failed: {0}")]
    Other(#[from] anyhow::Error),
}

impl HandlerError {
    /// Create a rejection with the given reason.
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected(reason.into())
    }

    /// Create a handler error from any error type.
    pub fn other(err: impl Into<anyhow::Error>) -> Self {
        Self::Other(err.into())
    }

    /// Check if this error is a rejection.
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }
}
