//! Core types for the fetchain request pipeline.
//!
//! A request is described by a chain of middleware run against a mutable
//! [`Context`]. The chain is flattened, run in order, and ends with a single
//! transport call ([`Context::commit`]). This crate holds the pieces that do
//! not depend on a network stack:
//! - [`Context`], [`Request`], [`Response`] - the request lifecycle
//! - [`Middleware`], [`Link`], [`from_fn`], [`chain!`] - building chains
//! - [`Pipeline`], [`Next`], [`Stage`] - running them
//! - [`Api`] - binding a base address and a [`Transport`]
//! - [`Error`] and [`Result`] - error handling
//! - [`StatusCode`] and [`header`] - re-exported from the `http` crate

mod api;
mod body;
mod chain;
mod context;
mod error;
mod executor;
mod method;
mod multipart;
mod policy;
pub mod prelude;
mod request;
mod response;
mod signal;
mod transport;

pub use api::Api;
pub use body::{Body, ContentType, from_json, to_form, to_json};
pub use chain::{FnMiddleware, Link, Middleware, flatten, from_fn};
pub use context::{Context, resolve_address};
pub use error::{BoxError, Error, Result, TransportFailure};
pub use executor::{Next, Pipeline, Stage};
pub use method::Method;
pub use multipart::{Form, Part};
pub use policy::{Cache, Credentials, Mode, Redirect, Referrer};
pub use request::{Headers, Request};
pub use response::Response;
pub use signal::{AbortController, AbortSignal};
pub use transport::{Transport, TransportFuture};

pub use futures_util::future::BoxFuture;
pub use http::{StatusCode, header};
