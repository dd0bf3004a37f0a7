//! HTTP transport used by the provider feeds
//!
//! Feeds only need "GET this URL, hand back status and body". Keeping that
//! behind a trait lets the aggregator run against canned responses.

use async_trait::async_trait;
use std::collections::HashMap;

use btc_core::{FeedConfig, FetchError, FetchResult, PriceFeedError, PriceFeedResult};

/// Raw HTTP response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(200, body)
    }

    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Issue one GET request. Transport-level failures only; status codes are
    /// left for the caller to judge.
    async fn get(&self, url: &str) -> FetchResult<HttpResponse>;
}

/// Production transport backed by reqwest
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(config: &FeedConfig) -> PriceFeedResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| PriceFeedError::Transport(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &str) -> FetchResult<HttpResponse> {
        let response = self
            .client
            .get(url)
            .header("accept", "application/json")
            .send()
            .await
            .map_err(classify_reqwest_error)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(classify_reqwest_error)?;

        Ok(HttpResponse { status, body })
    }
}

fn classify_reqwest_error(error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout
    } else if error.is_connect() {
        FetchError::Network(format!("connection failed: {error}"))
    } else {
        FetchError::Network(format!("request failed: {error}"))
    }
}

/// Transport answering from a fixed table of URLs.
///
/// Unknown URLs fail with a network error, as an unreachable host would.
#[derive(Debug, Clone, Default)]
pub struct StaticTransport {
    routes: HashMap<String, FetchResult<HttpResponse>>,
}

impl StaticTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(mut self, url: impl Into<String>, response: HttpResponse) -> Self {
        self.routes.insert(url.into(), Ok(response));
        self
    }

    pub fn with_json(self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.with_response(url, HttpResponse::ok(body))
    }

    pub fn with_failure(mut self, url: impl Into<String>, error: FetchError) -> Self {
        self.routes.insert(url.into(), Err(error));
        self
    }
}

#[async_trait]
impl HttpTransport for StaticTransport {
    async fn get(&self, url: &str) -> FetchResult<HttpResponse> {
        match self.routes.get(url) {
            Some(result) => result.clone(),
            None => Err(FetchError::Network(format!("no route to {url}"))),
        }
    }
}
