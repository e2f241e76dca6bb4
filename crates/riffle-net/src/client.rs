#![forbid(unsafe_code)]

use bytes::Bytes;
use reqwest::Client;
use tracing::trace;
use url::Url;

use crate::{
    error::{NetError, NetResult},
    types::NetOptions,
};

/// Thin wrapper over a shared `reqwest::Client` carrying [`NetOptions`].
#[derive(Clone, Debug)]
pub struct HttpClient {
    inner: Client,
    options: NetOptions,
}

impl HttpClient {
    /// # Panics
    ///
    /// Panics if the `reqwest::Client` builder fails to build.
    #[must_use]
    pub fn new(options: NetOptions) -> Self {
        let inner = Client::builder()
            .pool_max_idle_per_host(options.pool_max_idle_per_host)
            .build()
            .expect("failed to build reqwest client");
        Self { inner, options }
    }

    /// Fetch the full response body for `url`.
    ///
    /// # Errors
    ///
    /// Returns [`NetError`] on network failure, timeout, or a non-success
    /// HTTP status.
    pub async fn get_bytes(&self, url: Url) -> NetResult<Bytes> {
        trace!(%url, "GET");
        let resp = self
            .inner
            .get(url.clone())
            .timeout(self.options.request_timeout)
            .send()
            .await
            .map_err(NetError::from)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(NetError::http_status(status.as_u16(), url));
        }

        resp.bytes().await.map_err(NetError::from)
    }
}

impl From<NetOptions> for HttpClient {
    fn from(options: NetOptions) -> Self {
        Self::new(options)
    }
}
