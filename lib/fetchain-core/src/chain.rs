//! Middleware contract and chain flattening.
//!
//! A chain is written as a list of [`Link`]s. A link is either a single
//! middleware or a group of links, so a middleware factory can hand back
//! several steps at once (say "set method" then "attach body"). Before
//! execution the list is flattened depth-first, left to right:
//!
//! ```text
//! [a, [b, [c, d]], e]  ->  [a, b, c, d, e]
//! ```

use std::sync::Arc;

use futures_util::future::BoxFuture;

use crate::{Context, Next, Response, Result};

/// A participant in the request pipeline.
///
/// A middleware borrows the context for the duration of its call. It may
/// mutate it, await `next.run(ctx)` to execute the rest of the chain
/// (including the transport call), inspect the outcome, and return it.
/// Returning without calling `next` short-circuits the chain.
pub trait Middleware: Send + Sync + 'static {
    /// Handle one invocation.
    fn handle<'a>(&'a self, ctx: &'a mut Context, next: Next<'a>)
    -> BoxFuture<'a, Result<Response>>;
}

/// Middleware backed by a closure, see [`from_fn`].
#[derive(Clone, Copy)]
pub struct FnMiddleware<F> {
    f: F,
}

impl<F> std::fmt::Debug for FnMiddleware<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnMiddleware").finish_non_exhaustive()
    }
}

/// Turn a closure into a [`Middleware`].
///
/// ```
/// use fetchain_core::{Method, from_fn};
///
/// let post = from_fn(|ctx, next| {
///     Box::pin(async move {
///         ctx.set_method(Method::Post);
///         next.run(ctx).await
///     })
/// });
/// # let _ = post;
/// ```
pub fn from_fn<F>(f: F) -> FnMiddleware<F>
where
    F: for<'a> Fn(&'a mut Context, Next<'a>) -> BoxFuture<'a, Result<Response>>
        + Send
        + Sync
        + 'static,
{
    FnMiddleware { f }
}

impl<F> Middleware for FnMiddleware<F>
where
    F: for<'a> Fn(&'a mut Context, Next<'a>) -> BoxFuture<'a, Result<Response>>
        + Send
        + Sync
        + 'static,
{
    fn handle<'a>(
        &'a self,
        ctx: &'a mut Context,
        next: Next<'a>,
    ) -> BoxFuture<'a, Result<Response>> {
        (self.f)(ctx, next)
    }
}

/// One element of a chain: a middleware or a nested group.
#[derive(Clone)]
pub enum Link {
    /// A single middleware.
    Single(Arc<dyn Middleware>),
    /// Links expanded in place when the chain is flattened.
    Group(Vec<Link>),
}

impl std::fmt::Debug for Link {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Single(_) => f.write_str("Single(..)"),
            Self::Group(links) => f.debug_tuple("Group").field(links).finish(),
        }
    }
}

impl Link {
    /// Wrap a middleware.
    pub fn single(middleware: impl Middleware) -> Self {
        Self::Single(Arc::new(middleware))
    }

    /// Group links into one.
    pub fn group(links: impl IntoIterator<Item = Link>) -> Self {
        Self::Group(links.into_iter().collect())
    }

    /// Number of middleware this link contributes once flattened.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Group(links) => links.iter().map(Self::len).sum(),
        }
    }

    /// `true` when flattening contributes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn flatten_into(self, out: &mut Vec<Arc<dyn Middleware>>) {
        match self {
            Self::Single(middleware) => out.push(middleware),
            Self::Group(links) => {
                for link in links {
                    link.flatten_into(out);
                }
            }
        }
    }
}

impl<M: Middleware> From<M> for Link {
    fn from(middleware: M) -> Self {
        Self::single(middleware)
    }
}

impl From<Vec<Link>> for Link {
    fn from(links: Vec<Link>) -> Self {
        Self::Group(links)
    }
}

/// Flatten links into the execution order.
///
/// Groups are expanded recursively in place; empty groups vanish. No other
/// validation happens here.
pub fn flatten(links: impl IntoIterator<Item = Link>) -> Vec<Arc<dyn Middleware>> {
    let mut out = Vec::new();
    for link in links {
        link.flatten_into(&mut out);
    }
    out
}

/// Build a `Vec<Link>` from middleware and groups.
///
/// ```
/// use fetchain_core::{Link, chain, from_fn};
///
/// let noop = || from_fn(|ctx, next| next.run(ctx));
/// let links = chain![noop(), chain![noop(), chain![noop()]], noop()];
/// assert_eq!(Link::group(links).len(), 4);
/// ```
#[macro_export]
macro_rules! chain {
    ($($link:expr),* $(,)?) => {
        ::std::vec![$($crate::Link::from($link)),*]
    };
}
