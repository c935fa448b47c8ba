//! Request/response logging middleware.
//!
//! Logs with the `tracing` crate. The request is logged as it stands at the
//! middleware's position, so put it last to see what the transport gets.

use std::time::Instant;

use tracing::{Instrument, Level, debug, info, span, warn};

use crate::{BoxFuture, Context, Middleware, Next, Response, Result};

/// Log level for the logging middleware.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    /// Log at debug level (request/response details).
    Debug,
    /// Log at info level (summary only).
    #[default]
    Info,
}

/// Middleware that logs the request and its outcome.
#[derive(Debug, Clone, Copy, Default)]
pub struct Logging {
    level: LogLevel,
}

impl Logging {
    /// Summary logging.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            level: LogLevel::Info,
        }
    }

    /// Logging with headers and response details.
    #[must_use]
    pub const fn debug() -> Self {
        Self {
            level: LogLevel::Debug,
        }
    }

    /// Configured level.
    #[must_use]
    pub const fn level(&self) -> LogLevel {
        self.level
    }
}

/// Summary logging middleware.
#[must_use]
pub const fn logging() -> Logging {
    Logging::new()
}

/// Debug logging middleware.
#[must_use]
pub const fn logging_debug() -> Logging {
    Logging::debug()
}

impl Middleware for Logging {
    fn handle<'a>(
        &'a self,
        ctx: &'a mut Context,
        next: Next<'a>,
    ) -> BoxFuture<'a, Result<Response>> {
        let method = ctx.method();
        let url = ctx.url().to_string();
        let level = self.level;

        let span = span!(Level::INFO, "http_request", %method, %url);

        Box::pin(
            async move {
                let start = Instant::now();

                match level {
                    LogLevel::Debug => {
                        debug!(
                            method = %method,
                            url = %url,
                            headers = ?ctx.headers(),
                            "sending request"
                        );
                    }
                    LogLevel::Info => {
                        info!(method = %method, url = %url, "sending request");
                    }
                }

                let result = next.run(ctx).await;

                // Saturating conversion to u64 (truncates after ~584 million years)
                let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

                match &result {
                    Ok(response) => {
                        let status = response.status();
                        if level == LogLevel::Debug {
                            debug!(status, headers = ?response.headers(), "response headers");
                        }
                        if response.is_success() {
                            info!(status, elapsed_ms, "request completed");
                        } else {
                            warn!(status, elapsed_ms, "request failed with HTTP error");
                        }
                    }
                    Err(err) => {
                        warn!(error = %err, elapsed_ms, "request failed");
                    }
                }

                result
            }
            .instrument(span),
        )
    }
}
