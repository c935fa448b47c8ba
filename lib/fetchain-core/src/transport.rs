//! The transport capability.
//!
//! A [`Transport`] performs the single network call at the end of a chain.
//! It is injected into an [`Api`](crate::Api) instead of being looked up in
//! process-wide state. Any `Fn(Arc<Request>) -> Future` closure is a
//! transport, which keeps test doubles short:
//!
//! ```
//! use std::collections::HashMap;
//! use std::sync::Arc;
//!
//! use fetchain_core::{Api, BoxError, Request, Response};
//!
//! let api = Api::with_transport("https://api.example.com", |request: Arc<Request>| async move {
//!     Ok::<_, BoxError>(Response::new(200, HashMap::new(), request.url().to_string()))
//! });
//! assert!(api.has_transport());
//! ```

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::{BoxError, Request, Response};

/// Future returned by [`Transport::send`].
pub type TransportFuture =
    Pin<Box<dyn Future<Output = Result<Response, BoxError>> + Send + 'static>>;

/// Capability that turns a committed [`Request`] into a [`Response`].
pub trait Transport: Send + Sync + 'static {
    /// Send the request.
    ///
    /// Implementations should honour [`Request::signal`] and fail when it
    /// fires. Errors are wrapped into [`Error::Transport`](crate::Error::Transport)
    /// by the caller.
    fn send(&self, request: Arc<Request>) -> TransportFuture;
}

impl<F, Fut> Transport for F
where
    F: Fn(Arc<Request>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Response, BoxError>> + Send + 'static,
{
    fn send(&self, request: Arc<Request>) -> TransportFuture {
        Box::pin(self(request))
    }
}
