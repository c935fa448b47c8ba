//! Prelude module for convenient imports.
//!
//! ```ignore
//! use fetchain_core::prelude::*;
//! ```

pub use crate::{
    AbortController, Api, Body, BoxFuture, Context, Error, Form, Link, Method, Middleware, Next,
    Part, Request, Response, Result, Transport, chain, from_fn, from_json, to_form, to_json,
};
