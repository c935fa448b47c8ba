//! Errors raised by [`HyperTransport`](crate::HyperTransport).
//!
//! They reach callers boxed inside [`Error::Transport`]; use
//! [`TransportError::of`] to get them back.

use std::time::Duration;

use derive_more::{Display, Error};

use crate::Error;

/// Failure of one transport call.
#[derive(Debug, Display, Error)]
pub enum TransportError {
    /// Connection could not be established or broke mid-exchange.
    #[display("connection error: {_0}")]
    Connection(#[error(not(source))] String),

    /// TLS handshake or certificate failure.
    #[display("TLS error: {_0}")]
    Tls(#[error(not(source))] String),

    /// The exchange did not finish in time.
    #[display("request timed out after {_0:?}")]
    Timeout(#[error(not(source))] Duration),

    /// The request's abort signal fired.
    #[display("request aborted")]
    Aborted,

    /// The request could not be turned into an HTTP message.
    #[display("invalid request: {_0}")]
    InvalidRequest(#[error(not(source))] String),

    /// A redirect was refused or could not be followed.
    #[display("redirect error: {_0}")]
    Redirect(#[error(not(source))] String),
}

impl TransportError {
    /// The transport error carried by `err`, if any.
    #[must_use]
    pub fn of(err: &Error) -> Option<&Self> {
        err.transport_error::<Self>()
    }

    /// Returns `true` for [`TransportError::Timeout`].
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }

    /// Returns `true` for [`TransportError::Aborted`].
    #[must_use]
    pub const fn is_aborted(&self) -> bool {
        matches!(self, Self::Aborted)
    }

    /// Returns `true` for connection and TLS failures.
    #[must_use]
    pub const fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::Tls(_))
    }
}
