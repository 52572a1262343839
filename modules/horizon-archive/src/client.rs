// Shared HTTP client: one user agent, one timeout, a fixed small retry.

use std::future::Future;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{ArchiveError, Result};

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
pub const MAX_RETRIES: u32 = 2;
/// Backoff before retry `n` is `n` times this.
pub const RETRY_BACKOFF: Duration = Duration::from_millis(1500);

#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    retries: u32,
    backoff: Duration,
}

impl HttpClient {
    pub fn new(user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            retries: MAX_RETRIES,
            backoff: RETRY_BACKOFF,
        })
    }

    /// Override the retry policy (tests use a zero backoff).
    pub fn with_retry(mut self, retries: u32, backoff: Duration) -> Self {
        self.retries = retries;
        self.backoff = backoff;
        self
    }

    pub async fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        self.with_retries(url, move || async move {
            let resp = self.client.get(url).send().await?.error_for_status()?;
            Ok::<_, ArchiveError>(resp.bytes().await?.to_vec())
        })
        .await
    }

    pub async fn post_json<T: DeserializeOwned>(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<T> {
        self.with_retries(url, move || async move {
            let resp = self
                .client
                .post(url)
                .json(body)
                .send()
                .await?
                .error_for_status()?;
            Ok::<_, ArchiveError>(resp.json::<T>().await?)
        })
        .await
    }

    async fn with_retries<T, F, Fut>(&self, url: &str, mut attempt_fn: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 0;
        loop {
            match attempt_fn().await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < self.retries => {
                    attempt += 1;
                    debug!(url, attempt, error = %e, "Request failed, retrying");
                    tokio::time::sleep(self.backoff * attempt).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
