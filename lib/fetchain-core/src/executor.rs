//! Pipeline execution.
//!
//! The executor walks the flattened chain by index. Each middleware receives
//! a [`Next`] pointing at the following position; running it either invokes
//! that middleware or, once the chain is exhausted, commits the context.
//! Control therefore nests like an onion: code before `next.run(ctx).await`
//! shapes the request, code after it sees the response.
//!
//! `Next` is `Copy`, so a middleware may run it more than once. The
//! remainder of the chain is then replayed, and its second commit fails with
//! [`Error::AlreadyCommitted`](crate::Error::AlreadyCommitted) instead of
//! reaching the network again.

use std::sync::Arc;

use futures_util::future::BoxFuture;
use tracing::trace;

use crate::{Context, Link, Middleware, Response, Result, flatten};

/// Position of a pipeline run, recorded on the [`Context`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Stage {
    /// Chain not started yet.
    #[default]
    Pending,
    /// Middleware at this (0-based) position was entered last.
    Running(usize),
    /// Chain exhausted; the transport call was issued.
    Committing,
    /// Outermost run settled.
    Done,
}

/// Continuation handed to a middleware: "run the rest of the chain".
#[derive(Clone, Copy)]
pub struct Next<'a> {
    chain: &'a [Arc<dyn Middleware>],
    position: usize,
}

impl std::fmt::Debug for Next<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Next")
            .field("position", &self.position)
            .field("remaining", &self.remaining())
            .finish()
    }
}

impl<'a> Next<'a> {
    pub(crate) const fn new(chain: &'a [Arc<dyn Middleware>]) -> Self {
        Self { chain, position: 0 }
    }

    /// Chain position this continuation will run.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Middleware left before the commit.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.chain.len().saturating_sub(self.position)
    }

    /// Run the remainder of the chain against `ctx`.
    pub fn run<'c>(self, ctx: &'c mut Context) -> BoxFuture<'c, Result<Response>>
    where
        'a: 'c,
    {
        if let Some(middleware) = self.chain.get(self.position) {
            trace!(position = self.position, "entering middleware");
            ctx.set_stage(Stage::Running(self.position));
            let next = Next {
                chain: self.chain,
                position: self.position + 1,
            };
            return middleware.handle(ctx, next);
        }

        trace!(length = self.chain.len(), "chain exhausted");
        Box::pin(ctx.commit())
    }
}

/// A flattened chain ready to run against contexts.
#[derive(Clone, Default)]
pub struct Pipeline {
    chain: Vec<Arc<dyn Middleware>>,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("length", &self.chain.len())
            .finish()
    }
}

impl Pipeline {
    /// Flatten `links` into a pipeline.
    pub fn new(links: impl IntoIterator<Item = Link>) -> Self {
        Self {
            chain: flatten(links),
        }
    }

    /// Number of middleware.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chain.len()
    }

    /// `true` when the run goes straight to the commit.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    /// Run the chain; the outcome is whatever the first middleware returns
    /// (or the commit result for an empty chain).
    pub async fn run(&self, ctx: &mut Context) -> Result<Response> {
        let result = Next::new(&self.chain).run(ctx).await;
        ctx.set_stage(Stage::Done);
        result
    }
}
