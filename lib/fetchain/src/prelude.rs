//! Prelude module for convenient imports.
//!
//! ```ignore
//! use fetchain::prelude::*;
//! ```

pub use crate::{
    AbortController, Api, Error, HyperTransport, Link, Method, Middleware, Query, QueryOptions,
    Request, Response, Result, TransportConfig, TransportError, chain, from_fn,
};
