//! Middleware-chain HTTP request builder.
//!
//! Each call builds a fresh request [`Context`], runs a chain of middleware
//! over it in order, and ends with one transport call. Middleware shape the
//! request before awaiting the rest of the chain and may inspect the
//! response afterwards.
//!
//! # Example
//!
//! ```ignore
//! use fetchain::prelude::*;
//! use fetchain::middleware::{POST, json, query};
//!
//! let api = fetchain::api("https://api.example.com");
//!
//! let response = api
//!     .at("/greetings", chain![
//!         POST,
//!         json(serde_json::json!({ "hello": "world" })),
//!         query(Query::new().param("lang", ["en", "fr"])),
//!     ])
//!     .await?;
//! println!("{} {}", response.status(), response.status_text());
//! ```

mod config;
mod connector;
mod error;
pub mod middleware;
pub mod prelude;
mod redirect;
mod transport;

pub use config::{TransportConfig, TransportConfigBuilder};
pub use error::TransportError;
pub use middleware::{Query, QueryOptions, QueryValue};
pub use redirect::DEFAULT_MAX_REDIRECTS;
pub use transport::HyperTransport;

// Re-export core types
pub use fetchain_core::{
    AbortController, AbortSignal, Api, Body, BoxError, BoxFuture, Cache, ContentType, Context,
    Credentials, Error, FnMiddleware, Form, Headers, Link, Method, Middleware, Mode, Next, Part,
    Pipeline, Redirect, Referrer, Request, Response, Result, Stage, Transport, TransportFailure,
    TransportFuture, chain, flatten, from_fn, from_json, resolve_address, to_form, to_json,
};

// Re-export http types for status codes and headers
pub use fetchain_core::{StatusCode, header};

/// An [`Api`] for `base` sending through a default [`HyperTransport`].
#[must_use]
pub fn api(base: impl Into<String>) -> Api {
    Api::with_transport(base, HyperTransport::new())
}

/// An [`Api`] for `base` sending through a [`HyperTransport`] built from `config`.
#[must_use]
pub fn api_with_config(base: impl Into<String>, config: TransportConfig) -> Api {
    Api::with_transport(base, HyperTransport::with_config(config))
}
