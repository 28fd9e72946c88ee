//! Page fetcher: URL validation and a single-GET download built on reqwest.

use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use tracing::{debug, warn};
use url::Url;

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(https?://)?([\w-]+\.)+[\w-]+(/[\w\-./?%&=]*)?$").unwrap()
});

/// Outcome of a download. Transport failures fold into `status`; callers
/// only ever check `status == 200` and the content-type prefix.
#[derive(Debug, Clone, Default)]
pub struct FetchedPage {
    pub status: u16,
    pub body: String,
    pub content_type: String,
}

/// Seam between the crawl engine and the network.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn download(&self, url: &str) -> FetchedPage;
}

/// A URL worth enqueuing: optional http/https scheme, a dotted authority,
/// and an optional path of URL-safe characters.
pub fn is_valid_url(url: &str) -> bool {
    !url.is_empty() && URL_RE.is_match(url)
}

/// HTTP fetcher over a shared `reqwest::Client` carrying the configured
/// User-Agent and a single total deadline per request.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str, timeout_secs: u64) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent.to_string())
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn download(&self, url: &str) -> FetchedPage {
        // An explicit scheme is required to resolve host and port; a URL that
        // merely passed enqueue validation is a client-side 400 here.
        let target = match Url::parse(url) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => parsed,
            _ => {
                warn!("invalid download url: {}", url);
                return FetchedPage {
                    status: 400,
                    ..Default::default()
                };
            }
        };

        debug!("downloading {}", target);

        let response = match self
            .client
            .get(target)
            .header(ACCEPT, ACCEPT_HTML)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!("download failed for {}: {}", url, e);
                return FetchedPage {
                    status: 500,
                    ..Default::default()
                };
            }
        };

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();

        match response.text().await {
            Ok(body) => FetchedPage {
                status,
                body,
                content_type,
            },
            Err(e) => {
                warn!("failed reading body of {}: {}", url, e);
                FetchedPage {
                    status: 500,
                    body: String::new(),
                    content_type,
                }
            }
        }
    }
}
