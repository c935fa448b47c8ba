//! Method setters.

use crate::{BoxFuture, Context, Method, Middleware, Next, Response, Result};

/// Middleware that sets the request method, then continues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SetMethod(pub Method);

impl Middleware for SetMethod {
    fn handle<'a>(
        &'a self,
        ctx: &'a mut Context,
        next: Next<'a>,
    ) -> BoxFuture<'a, Result<Response>> {
        ctx.set_method(self.0);
        next.run(ctx)
    }
}

/// Set the method to `method`.
#[must_use]
pub const fn method(method: Method) -> SetMethod {
    SetMethod(method)
}

/// `GET`: transfer a representation of the target resource.
pub const GET: SetMethod = SetMethod(Method::Get);
/// `POST`: submit an entity to the target resource.
pub const POST: SetMethod = SetMethod(Method::Post);
/// `PUT`: replace the target resource with the payload.
pub const PUT: SetMethod = SetMethod(Method::Put);
/// `DELETE`: remove the target resource.
pub const DELETE: SetMethod = SetMethod(Method::Delete);
/// `PATCH`: apply partial modifications.
pub const PATCH: SetMethod = SetMethod(Method::Patch);
/// `HEAD`: like `GET` without a response body.
pub const HEAD: SetMethod = SetMethod(Method::Head);
/// `OPTIONS`: describe the communication options.
pub const OPTIONS: SetMethod = SetMethod(Method::Options);
/// `TRACE`: message loop-back test.
pub const TRACE: SetMethod = SetMethod(Method::Trace);
/// `CONNECT`: establish a tunnel.
pub const CONNECT: SetMethod = SetMethod(Method::Connect);
