use std::time::Duration;

use bytes::Bytes;
use futures_util::stream::BoxStream;
use futures_util::StreamExt;

use crate::{FailureKind, FetchError};

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    /// Upper bound for one whole transfer, body included.
    pub request_timeout: Duration,
    pub redirect_limit: usize,
    pub max_bytes: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(120),
            redirect_limit: 5,
            max_bytes: 64 * 1024 * 1024,
        }
    }
}

/// An open download whose body is pulled chunk by chunk.
#[async_trait::async_trait]
pub trait Transfer: Send {
    /// Expected body size when the server announced one.
    fn total_bytes(&self) -> Option<u64>;

    /// Next body chunk, or `None` once the body is exhausted.
    async fn next_chunk(&mut self) -> Result<Option<Bytes>, FetchError>;
}

#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    async fn open(&self, url: &str) -> Result<Box<dyn Transfer>, FetchError>;
}

#[derive(Debug, Clone, Default)]
pub struct ReqwestFetcher {
    settings: FetchSettings,
}

impl ReqwestFetcher {
    pub fn new(settings: FetchSettings) -> Self {
        Self { settings }
    }

    fn build_client(&self) -> Result<reqwest::Client, FetchError> {
        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .redirect(reqwest::redirect::Policy::limited(
                self.settings.redirect_limit,
            ))
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))
    }
}

#[async_trait::async_trait]
impl Fetcher for ReqwestFetcher {
    async fn open(&self, url: &str) -> Result<Box<dyn Transfer>, FetchError> {
        let parsed = url::Url::parse(url)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
        let client = self.build_client()?;

        let response = client.get(parsed).send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let total_bytes = response.content_length();
        if let Some(content_len) = total_bytes {
            if content_len > self.settings.max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.settings.max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        Ok(Box::new(ReqwestTransfer {
            total_bytes,
            received: 0,
            max_bytes: self.settings.max_bytes,
            stream: response.bytes_stream().boxed(),
        }))
    }
}

struct ReqwestTransfer {
    total_bytes: Option<u64>,
    received: u64,
    max_bytes: u64,
    stream: BoxStream<'static, reqwest::Result<Bytes>>,
}

#[async_trait::async_trait]
impl Transfer for ReqwestTransfer {
    fn total_bytes(&self) -> Option<u64> {
        self.total_bytes
    }

    async fn next_chunk(&mut self) -> Result<Option<Bytes>, FetchError> {
        let Some(chunk) = self.stream.next().await else {
            return Ok(None);
        };
        let chunk = chunk.map_err(map_reqwest_error)?;
        let next_len = self.received + chunk.len() as u64;
        if next_len > self.max_bytes {
            return Err(FetchError::new(
                FailureKind::TooLarge {
                    max_bytes: self.max_bytes,
                    actual: Some(next_len),
                },
                "response too large",
            ));
        }
        self.received = next_len;
        Ok(Some(chunk))
    }
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_redirect() {
        return FetchError::new(FailureKind::RedirectLimitExceeded, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}
