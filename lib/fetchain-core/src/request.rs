//! Request descriptor handed to the transport.
//!
//! A [`Request`] is the immutable snapshot of a [`Context`](crate::Context)
//! taken by [`Context::commit`](crate::Context::commit). The same snapshot is
//! attached to the resulting [`Response`](crate::Response).

use std::collections::HashMap;
use std::sync::Arc;

use url::Url;

use crate::{AbortSignal, Body, Cache, Credentials, Method, Mode, Redirect, Referrer};

/// Header mapping; keys are kept exactly as supplied.
pub type Headers = HashMap<String, String>;

/// Everything the transport needs to perform one call.
#[derive(Debug, Clone)]
pub struct Request {
    pub(crate) method: Method,
    pub(crate) url: Url,
    pub(crate) headers: Arc<Headers>,
    pub(crate) body: Option<Body>,
    pub(crate) mode: Mode,
    pub(crate) credentials: Credentials,
    pub(crate) redirect: Redirect,
    pub(crate) cache: Cache,
    pub(crate) referrer: Referrer,
    pub(crate) signal: Option<AbortSignal>,
}

impl Request {
    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> Method {
        self.method
    }

    /// Target URL.
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Request headers.
    #[must_use]
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Single header value by exact name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Single header value, ignoring ASCII case.
    ///
    /// Transports use this to detect a user-supplied header whatever its
    /// spelling.
    #[must_use]
    pub fn header_ignore_case(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Request body.
    #[must_use]
    pub const fn body(&self) -> Option<&Body> {
        self.body.as_ref()
    }

    /// Request mode.
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// Credentials policy.
    #[must_use]
    pub const fn credentials(&self) -> Credentials {
        self.credentials
    }

    /// Redirect policy.
    #[must_use]
    pub const fn redirect(&self) -> Redirect {
        self.redirect
    }

    /// Cache policy.
    #[must_use]
    pub const fn cache(&self) -> Cache {
        self.cache
    }

    /// Referrer policy.
    #[must_use]
    pub const fn referrer(&self) -> Referrer {
        self.referrer
    }

    /// Cancellation signal.
    #[must_use]
    pub const fn signal(&self) -> Option<&AbortSignal> {
        self.signal.as_ref()
    }
}
