//! Header setters, including `Authorization` schemes.

use std::sync::Arc;

use base64::Engine;

use crate::{Middleware, from_fn};

/// Set header `name` to `value`, replacing an entry with the same name.
pub fn header(name: impl Into<String>, value: impl Into<String>) -> impl Middleware {
    let name: Arc<str> = Arc::from(name.into());
    let value: Arc<str> = Arc::from(value.into());
    from_fn(move |ctx, next| {
        ctx.set_header(&*name, &*value);
        next.run(ctx)
    })
}

/// `Authorization: Bearer <token>`.
pub fn bearer_auth(token: impl AsRef<str>) -> impl Middleware {
    header("Authorization", format!("Bearer {}", token.as_ref()))
}

/// `Authorization: Basic <base64(username:password)>`.
pub fn basic_auth(username: impl AsRef<str>, password: impl AsRef<str>) -> impl Middleware {
    let credentials = format!("{}:{}", username.as_ref(), password.as_ref());
    let encoded = base64::engine::general_purpose::STANDARD.encode(credentials);
    header("Authorization", format!("Basic {encoded}"))
}
