//! Error types for fetchain.

use derive_more::{Display, Error, From};

/// Boxed error produced by a [`Transport`](crate::Transport).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The transport's own failure, kept as the error source.
#[derive(Debug)]
pub struct TransportFailure(BoxError);

impl TransportFailure {
    /// The wrapped transport error.
    #[must_use]
    pub fn get_ref(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        &*self.0
    }

    /// Consume into the wrapped transport error.
    #[must_use]
    pub fn into_inner(self) -> BoxError {
        self.0
    }
}

impl std::fmt::Display for TransportFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for TransportFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&*self.0)
    }
}

// ============================================================================
// Error Type
// ============================================================================

/// Main error type for fetchain operations.
///
/// Nothing in the pipeline retries or swallows these: every error raised at
/// any chain position reaches the caller of [`Api::invoke`](crate::Api::invoke).
#[derive(Debug, Display, Error, From)]
pub enum Error {
    /// The endpoint (or base address) does not resolve to an absolute URL.
    #[display("invalid address '{address}': {source}")]
    #[from(skip)]
    InvalidAddress {
        /// The resolved address that failed to parse.
        address: String,
        /// Parser error.
        source: url::ParseError,
    },

    /// The context was committed without a transport.
    #[display("no transport configured")]
    #[from(skip)]
    NoTransportConfigured,

    /// The context was committed twice.
    #[display("request context already committed")]
    #[from(skip)]
    AlreadyCommitted,

    /// A middleware body failed.
    #[display("middleware error: {_0}")]
    #[from(skip)]
    Middleware(#[error(not(source))] String),

    /// A method token that is not one of the nine supported methods.
    #[display("unsupported HTTP method: {_0}")]
    #[from(skip)]
    InvalidMethod(#[error(not(source))] String),

    /// A response body that is not valid UTF-8.
    #[display("response body is not valid UTF-8: {_0}")]
    #[from]
    InvalidText(std::string::FromUtf8Error),

    /// The transport call failed.
    #[display("transport error: {_0}")]
    #[from(skip)]
    Transport(TransportFailure),

    /// JSON serialization error.
    #[display("JSON serialization error: {_0}")]
    #[from]
    JsonSerialization(serde_json::Error),

    /// JSON deserialization error with path context.
    #[display("JSON deserialization error at '{path}': {message}")]
    #[from(skip)]
    JsonDeserialization {
        /// JSON path to the error (e.g., "user.address.city").
        path: String,
        /// Error message.
        message: String,
    },

    /// Form URL-encoded serialization error.
    #[display("form serialization error: {_0}")]
    #[from]
    FormSerialization(serde_html_form::ser::Error),
}

/// Result type alias using [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a middleware error.
    #[must_use]
    pub fn middleware(message: impl Into<String>) -> Self {
        Self::Middleware(message.into())
    }

    /// Wrap a transport failure.
    #[must_use]
    pub fn transport(source: impl Into<BoxError>) -> Self {
        Self::Transport(TransportFailure(source.into()))
    }

    /// Create a JSON deserialization error with path context.
    #[must_use]
    pub fn json_deserialization(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::JsonDeserialization {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Returns `true` if the transport call failed.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Returns `true` if the address could not be resolved.
    #[must_use]
    pub const fn is_invalid_address(&self) -> bool {
        matches!(self, Self::InvalidAddress { .. })
    }

    /// The transport's own error, downcast to `E`.
    ///
    /// Returns `None` for non-transport errors or when the transport raised
    /// another error type.
    #[must_use]
    pub fn transport_error<E>(&self) -> Option<&E>
    where
        E: std::error::Error + 'static,
    {
        match self {
            Self::Transport(failure) => failure.0.downcast_ref::<E>(),
            _ => None,
        }
    }
}
