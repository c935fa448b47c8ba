//! Body encoders.
//!
//! [`json`] and [`form`] serialize when the middleware runs, so a
//! serialization failure surfaces as the invocation's error.

use bytes::Bytes;
use serde::Serialize;

use crate::{
    Body, ContentType, Error, Form, Link, Middleware, Part, from_fn, to_form, to_json,
};

use super::POST;

/// Set `Content-Type: application/json` and a JSON body.
pub fn json<T>(value: T) -> impl Middleware
where
    T: Serialize + Send + Sync + 'static,
{
    from_fn(move |ctx, next| match to_json(&value) {
        Ok(bytes) => {
            ctx.set_header("Content-Type", ContentType::Json.as_str());
            ctx.set_body(bytes);
            next.run(ctx)
        }
        Err(err) => Box::pin(async move { Err(err) }),
    })
}

/// Set `Content-Type: application/x-www-form-urlencoded` and an encoded body.
pub fn form<T>(value: T) -> impl Middleware
where
    T: Serialize + Send + Sync + 'static,
{
    from_fn(move |ctx, next| match to_form(&value) {
        Ok(bytes) => {
            ctx.set_header("Content-Type", ContentType::FormUrlEncoded.as_str());
            ctx.set_body(bytes);
            next.run(ctx)
        }
        Err(err) => Box::pin(async move { Err(err) }),
    })
}

/// Switch to `POST` and attach a file part to a multipart body.
///
/// The form is created on first use; later `file` links append to it. A
/// body that is not multipart is an error.
///
/// ```ignore
/// api.at("/upload", chain![
///     file("avatar", png_bytes, Some("me.png")),
///     file("notes", "plain text", None),
/// ]).await?;
/// ```
pub fn file(name: impl Into<String>, data: impl Into<Bytes>, filename: Option<&str>) -> Link {
    let part = Part::blob(name, data, filename);
    let attach = from_fn(move |ctx, next| {
        if ctx.body().is_none() {
            ctx.set_body(Form::new());
        }
        let Some(Body::Multipart(form)) = ctx.body_mut() else {
            let name = part.name().to_string();
            return Box::pin(async move {
                Err(Error::middleware(format!(
                    "cannot attach file '{name}': body is not multipart"
                )))
            });
        };
        form.append(part.clone());
        next.run(ctx)
    });
    Link::group([Link::from(POST), Link::from(attach)])
}
