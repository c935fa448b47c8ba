//! The API factory.
//!
//! An [`Api`] binds a base address and a transport. Every invocation builds
//! a fresh [`Context`], runs a fresh [`Pipeline`] over it, and resolves to
//! the outcome; nothing is shared between invocations except the base and
//! the transport handle.

use std::sync::Arc;

use tracing::debug;

use crate::{Context, Link, Pipeline, Response, Result, Transport};

/// Entry point bound to a base address.
///
/// Cloning is cheap; clones share the base and the transport.
#[derive(Clone)]
pub struct Api {
    base: Arc<str>,
    transport: Option<Arc<dyn Transport>>,
}

impl std::fmt::Debug for Api {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Api")
            .field("base", &self.base)
            .field("transport", &self.transport.is_some())
            .finish()
    }
}

impl Api {
    /// Bind `base` without a transport.
    ///
    /// Invocations fail with [`Error::NoTransportConfigured`](crate::Error::NoTransportConfigured)
    /// once a chain reaches its commit, unless a transport is installed first
    /// with [`Api::use_transport`].
    pub fn bind(base: impl Into<String>) -> Self {
        Self {
            base: Arc::from(base.into()),
            transport: None,
        }
    }

    /// Bind `base` with a transport.
    pub fn with_transport(base: impl Into<String>, transport: impl Transport) -> Self {
        let mut api = Self::bind(base);
        api.use_transport(transport);
        api
    }

    /// Install the transport used by later invocations. The last call wins.
    pub fn use_transport(&mut self, transport: impl Transport) -> &mut Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// The bound base address.
    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }

    /// `true` when a transport is installed.
    #[must_use]
    pub const fn has_transport(&self) -> bool {
        self.transport.is_some()
    }

    /// Fresh context for `endpoint` (or the base itself).
    ///
    /// # Errors
    ///
    /// [`Error::InvalidAddress`](crate::Error::InvalidAddress) when the
    /// resolved address is not a valid absolute URL.
    pub fn context(&self, endpoint: Option<&str>) -> Result<Context> {
        let ctx = Context::new(&self.base, endpoint)?;
        Ok(match &self.transport {
            Some(transport) => ctx.with_transport(Arc::clone(transport)),
            None => ctx,
        })
    }

    /// Run `links` against a fresh context for `endpoint`.
    ///
    /// # Errors
    ///
    /// Address resolution errors are returned before any middleware runs.
    /// Otherwise the error is whatever the chain produced.
    pub async fn invoke(
        &self,
        endpoint: Option<&str>,
        links: impl IntoIterator<Item = Link>,
    ) -> Result<Response> {
        let mut ctx = self.context(endpoint)?;
        let pipeline = Pipeline::new(links);
        debug!(
            url = %ctx.url(),
            middleware = pipeline.len(),
            "invoking pipeline"
        );
        pipeline.run(&mut ctx).await
    }

    /// Run `links` against the base address.
    ///
    /// # Errors
    ///
    /// See [`Api::invoke`].
    pub async fn call(&self, links: impl IntoIterator<Item = Link>) -> Result<Response> {
        self.invoke(None, links).await
    }

    /// Run `links` against `endpoint`, resolved relative to the base.
    ///
    /// # Errors
    ///
    /// See [`Api::invoke`].
    pub async fn at(
        &self,
        endpoint: &str,
        links: impl IntoIterator<Item = Link>,
    ) -> Result<Response> {
        self.invoke(Some(endpoint), links).await
    }
}
