use std::io;
use std::time::Duration;

use bytes::Bytes;
use engine_logging::engine_debug;
use futures_util::stream::BoxStream;
use futures_util::{StreamExt, TryStreamExt};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE};

use crate::decode::decode_html;
use crate::{Failure, FailureKind};

const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Android 13; Mobile; rv:125.0) Gecko/125.0 Firefox/125.0";
const HTML_ACCEPT: &str = "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8";
const JSON_ACCEPT: &str = "application/json,text/javascript;q=0.9,*/*;q=0.5";

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    /// Deadline for page and JSON requests; also the idle read timeout for downloads.
    pub request_timeout: Duration,
    pub redirect_limit: usize,
    pub user_agent: String,
    pub max_portal_pages: u32,
    pub chunk_size: usize,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(60),
            redirect_limit: 10,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_portal_pages: 100,
            chunk_size: 8192,
        }
    }
}

/// Decoded HTML page and the URL it was served from after redirects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub url: String,
    pub html: String,
}

/// Streaming body of a binary download.
pub struct BinaryResponse {
    pub final_url: String,
    pub content_length: Option<u64>,
    pub body: BoxStream<'static, io::Result<Bytes>>,
}

impl std::fmt::Debug for BinaryResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BinaryResponse")
            .field("final_url", &self.final_url)
            .field("content_length", &self.content_length)
            .finish_non_exhaustive()
    }
}

/// How the pipeline talks to the outside world.
///
/// Implementations follow redirects and expose the post-redirect URL. Locators
/// and extractors are written once against this trait.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn fetch_page(&self, url: &str) -> Result<Page, Failure>;

    async fn fetch_json(&self, url: &str) -> Result<serde_json::Value, Failure>;

    async fn open_stream(&self, url: &str) -> Result<BinaryResponse, Failure>;
}

/// HTTP transport. Build one per pipeline run and share it between stages.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    settings: FetchSettings,
}

impl ReqwestTransport {
    pub fn new(settings: FetchSettings) -> Result<Self, Failure> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.8"));

        let client = reqwest::Client::builder()
            .user_agent(settings.user_agent.clone())
            .default_headers(headers)
            .connect_timeout(settings.connect_timeout)
            .read_timeout(settings.request_timeout)
            .redirect(reqwest::redirect::Policy::limited(settings.redirect_limit))
            .build()
            .map_err(|err| Failure::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { client, settings })
    }

    pub fn settings(&self) -> &FetchSettings {
        &self.settings
    }

    async fn get(
        &self,
        url: &str,
        accept: &str,
        deadline: Option<Duration>,
    ) -> Result<reqwest::Response, Failure> {
        let parsed = reqwest::Url::parse(url)
            .map_err(|err| Failure::new(FailureKind::InvalidUrl, format!("{url}: {err}")))?;

        let mut request = self.client.get(parsed).header(ACCEPT, accept);
        if let Some(deadline) = deadline {
            request = request.timeout(deadline);
        }
        let response = request.send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(Failure::new(
                FailureKind::HttpStatus(status.as_u16()),
                format!("{status} from {}", response.url()),
            ));
        }
        Ok(response)
    }
}

#[async_trait::async_trait]
impl Transport for ReqwestTransport {
    async fn fetch_page(&self, url: &str) -> Result<Page, Failure> {
        let response = self
            .get(url, HTML_ACCEPT, Some(self.settings.request_timeout))
            .await?;
        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());
        let bytes = response.bytes().await.map_err(map_reqwest_error)?;
        engine_debug!("URL:{} [{}/{}] -> \"-\" [1]", final_url, bytes.len(), bytes.len());

        let decoded = decode_html(&bytes, content_type.as_deref());
        Ok(Page {
            url: final_url,
            html: decoded.html,
        })
    }

    async fn fetch_json(&self, url: &str) -> Result<serde_json::Value, Failure> {
        let response = self
            .get(url, JSON_ACCEPT, Some(self.settings.request_timeout))
            .await?;
        let final_url = response.url().to_string();
        let bytes = response.bytes().await.map_err(map_reqwest_error)?;
        engine_debug!("URL:{} [{}/{}] -> \"-\" [1]", final_url, bytes.len(), bytes.len());

        serde_json::from_slice(&bytes)
            .map_err(|err| Failure::structure(format!("{final_url} did not return JSON: {err}")))
    }

    async fn open_stream(&self, url: &str) -> Result<BinaryResponse, Failure> {
        // No total deadline: large bodies are bounded by the client's read timeout.
        let response = self.get(url, "*/*", None).await?;
        let final_url = response.url().to_string();
        let content_length = response.content_length();
        let body = response
            .bytes_stream()
            .map_err(|err| {
                let kind = if err.is_timeout() {
                    io::ErrorKind::TimedOut
                } else {
                    io::ErrorKind::Other
                };
                io::Error::new(kind, err)
            })
            .boxed();

        Ok(BinaryResponse {
            final_url,
            content_length,
            body,
        })
    }
}

fn map_reqwest_error(err: reqwest::Error) -> Failure {
    if err.is_timeout() {
        return Failure::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_redirect() {
        return Failure::new(FailureKind::RedirectLimitExceeded, err.to_string());
    }
    Failure::new(FailureKind::Network, err.to_string())
}
