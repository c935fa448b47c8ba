//! Request policy enumerations.
//!
//! Each enum is closed and displays as the literal token that ends up in the
//! transport's request descriptor (e.g. [`Cache::NoStore`] is `"no-store"`).

use derive_more::Display;

/// Request mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display)]
pub enum Mode {
    /// Cross-origin requests allowed under CORS rules.
    #[default]
    #[display("cors")]
    Cors,
    /// Cross-origin requests without CORS.
    #[display("no-cors")]
    NoCors,
    /// Same-origin only.
    #[display("same-origin")]
    SameOrigin,
    /// Navigation request.
    #[display("navigate")]
    Navigate,
}

/// Credentials policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display)]
pub enum Credentials {
    /// Never send credentials.
    #[display("omit")]
    Omit,
    /// Always send credentials.
    #[default]
    #[display("include")]
    Include,
    /// Send credentials to the same origin only.
    #[display("same-origin")]
    SameOrigin,
}

/// Redirect policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display)]
pub enum Redirect {
    /// Follow redirects.
    #[default]
    #[display("follow")]
    Follow,
    /// Fail on redirect.
    #[display("error")]
    Error,
    /// Hand redirect responses back to the caller.
    #[display("manual")]
    Manual,
}

/// Cache policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display)]
pub enum Cache {
    /// Transport default.
    #[default]
    #[display("default")]
    Default,
    /// Bypass the cache and do not store the result.
    #[display("no-store")]
    NoStore,
    /// Bypass the cache and refresh it with the result.
    #[display("reload")]
    Reload,
    /// Revalidate before using a cached entry.
    #[display("no-cache")]
    NoCache,
    /// Use any cached entry, stale or not.
    #[display("force-cache")]
    ForceCache,
    /// Only use the cache.
    #[display("only-if-cached")]
    OnlyIfCached,
}

/// Referrer policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display)]
pub enum Referrer {
    /// No referrer (empty token).
    #[display("")]
    NoReferrer,
    /// Client-chosen referrer.
    #[default]
    #[display("about:client")]
    Client,
}
