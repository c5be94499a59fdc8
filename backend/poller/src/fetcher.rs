use async_trait::async_trait;
use feed::NotificationRecord;
use reqwest::{
    Client,
    header::{HeaderMap, HeaderName, HeaderValue},
};

use crate::error::PollError;

/// One round trip against the aggregation endpoint.
///
/// Implementations never retry and never touch feed state. A failure means "no new
/// information this cycle", not "zero notifications".
#[async_trait]
pub trait FeedFetcher: Send + Sync {
    async fn fetch(&self) -> Result<Vec<NotificationRecord>, PollError>;
}

pub struct HttpFetcher {
    client: Client,
    url: String,
}

impl HttpFetcher {
    pub fn new(url: impl Into<String>) -> Result<Self, PollError> {
        Self::with_headers(url, HeaderMap::new())
    }

    pub fn with_headers(url: impl Into<String>, headers: HeaderMap) -> Result<Self, PollError> {
        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| PollError::Config(format!("http client: {e}")))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl FeedFetcher for HttpFetcher {
    async fn fetch(&self) -> Result<Vec<NotificationRecord>, PollError> {
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PollError::FetchFailed(format!("status {status}")));
        }

        let body = response.text().await?;

        Ok(serde_json::from_str(&body)?)
    }
}

/// Identity headers expected by the dashboard server.
pub fn viewer_headers(viewer: &str, admin: bool) -> Result<HeaderMap, PollError> {
    let mut headers = HeaderMap::new();

    let value = HeaderValue::from_str(viewer)
        .map_err(|e| PollError::Config(format!("viewer header: {e}")))?;
    headers.insert(HeaderName::from_static(feed::VIEWER_HEADER), value);

    if admin {
        headers.insert(
            HeaderName::from_static(feed::VIEWER_ADMIN_HEADER),
            HeaderValue::from_static("true"),
        );
    }

    Ok(headers)
}
