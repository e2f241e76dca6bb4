#![forbid(unsafe_code)]

use std::time::Duration;

/// Network configuration (timeouts, connection pooling).
#[derive(Clone, Debug)]
pub struct NetOptions {
    /// Per-request timeout. Default: 10s.
    pub request_timeout: Duration,
    /// Max idle connections kept per host. Default: 4.
    pub pool_max_idle_per_host: usize,
}

impl Default for NetOptions {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(10),
            pool_max_idle_per_host: 4,
        }
    }
}

impl NetOptions {
    /// Set the per-request timeout.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the max idle connections kept per host.
    #[must_use]
    pub fn with_pool_max_idle_per_host(mut self, max: usize) -> Self {
        self.pool_max_idle_per_host = max;
        self
    }
}
