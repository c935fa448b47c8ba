//! Settings read by [`HyperTransport`](crate::HyperTransport) when it is built.

use std::time::Duration;

use crate::redirect::DEFAULT_MAX_REDIRECTS;

/// Limits applied to every exchange a [`HyperTransport`](crate::HyperTransport) runs.
///
/// `timeout` bounds the whole exchange, redirect hops included, and expires
/// as [`TransportError::Timeout`](crate::TransportError::Timeout). An abort
/// signal on the request still wins over the timeout.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Deadline for one call, from first byte sent to last byte received.
    pub timeout: Duration,
    /// Deadline for opening a TCP connection.
    pub connect_timeout: Duration,
    /// Idle keep-alive connections kept per host for reuse.
    pub pool_idle_per_host: usize,
    /// How long an unused keep-alive connection stays in the pool.
    pub pool_idle_timeout: Duration,
    /// Redirect hops followed under [`Redirect::Follow`](crate::Redirect::Follow).
    pub max_redirects: usize,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            pool_idle_per_host: 32,
            pool_idle_timeout: Duration::from_secs(90),
            max_redirects: DEFAULT_MAX_REDIRECTS,
        }
    }
}

impl TransportConfig {
    /// Start from the defaults and override selected limits.
    #[must_use]
    pub fn builder() -> TransportConfigBuilder {
        TransportConfigBuilder::default()
    }
}

/// Builder for [`TransportConfig`]; unset fields keep their default.
#[derive(Debug, Clone, Default)]
pub struct TransportConfigBuilder {
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    pool_idle_per_host: Option<usize>,
    pool_idle_timeout: Option<Duration>,
    max_redirects: Option<usize>,
}

impl TransportConfigBuilder {
    /// Deadline for one call, redirects included.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Deadline for opening a connection.
    #[must_use]
    pub const fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Keep-alive connections pooled per host.
    #[must_use]
    pub const fn pool_idle_per_host(mut self, count: usize) -> Self {
        self.pool_idle_per_host = Some(count);
        self
    }

    /// Lifetime of an unused pooled connection.
    #[must_use]
    pub const fn pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.pool_idle_timeout = Some(timeout);
        self
    }

    /// Hops followed before the call fails with
    /// [`TransportError::Redirect`](crate::TransportError::Redirect).
    #[must_use]
    pub const fn max_redirects(mut self, max: usize) -> Self {
        self.max_redirects = Some(max);
        self
    }

    /// Finish, filling unset fields from [`TransportConfig::default`].
    #[must_use]
    pub fn build(self) -> TransportConfig {
        let defaults = TransportConfig::default();
        TransportConfig {
            timeout: self.timeout.unwrap_or(defaults.timeout),
            connect_timeout: self.connect_timeout.unwrap_or(defaults.connect_timeout),
            pool_idle_per_host: self
                .pool_idle_per_host
                .unwrap_or(defaults.pool_idle_per_host),
            pool_idle_timeout: self.pool_idle_timeout.unwrap_or(defaults.pool_idle_timeout),
            max_redirects: self.max_redirects.unwrap_or(defaults.max_redirects),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = TransportConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert_eq!(config.pool_idle_per_host, 32);
        assert_eq!(config.pool_idle_timeout, Duration::from_secs(90));
        assert_eq!(config.max_redirects, 10);
    }

    #[test]
    fn builder_overrides_only_what_is_set() {
        let config = TransportConfig::builder()
            .timeout(Duration::from_millis(500))
            .max_redirects(0)
            .build();

        assert_eq!(config.timeout, Duration::from_millis(500));
        assert_eq!(config.max_redirects, 0);
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert_eq!(config.pool_idle_per_host, 32);
    }
}
