//! Ready-made chain middleware.
//!
//! Every item here is a [`Middleware`](crate::Middleware) (or a [`Link`](crate::Link)
//! group) meant for [`chain!`](crate::chain):
//!
//! | Item | Effect |
//! |------|--------|
//! | [`GET`] .. [`CONNECT`], [`method`] | set the method |
//! | [`json`], [`form`] | set `Content-Type` and an encoded body |
//! | [`file`] | `POST` + append a part to a multipart body |
//! | [`query`], [`query_with`] | edit the query string |
//! | [`abortable`] | attach an abort signal |
//! | [`header`], [`bearer_auth`], [`basic_auth`] | set headers |
//! | [`logging`], [`logging_debug`] | trace the request with `tracing` |
//!
//! # Example
//!
//! ```ignore
//! use fetchain::middleware::{POST, json, query, abortable};
//!
//! let response = api
//!     .at("/greetings", chain![POST, json(greeting), query(params), abortable(&controller)])
//!     .await?;
//! ```

mod abortable;
mod auth;
mod body;
mod logging;
mod methods;
mod query;

pub use abortable::abortable;
pub use auth::{basic_auth, bearer_auth, header};
pub use body::{file, form, json};
pub use logging::{LogLevel, Logging, logging, logging_debug};
pub use methods::{
    CONNECT, DELETE, GET, HEAD, OPTIONS, PATCH, POST, PUT, SetMethod, TRACE, method,
};
pub use query::{Query, QueryOptions, QueryValue, query, query_with};
