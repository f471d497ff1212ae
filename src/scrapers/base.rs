use crate::config::{ClientMode, FetchConfig};
use crate::errors::{Result, DataHubError};
use async_trait::async_trait;
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, CACHE_CONTROL, PRAGMA, USER_AGENT};
use reqwest::Client;

/// 一次 GET 请求的结果
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub status: u16,
    pub body: String,
}

impl FetchedPage {
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Source of raw HTML pages
#[async_trait]
pub trait PageSource {
    /// GET the given url and return its status code and body
    async fn get(&self, url: &str) -> Result<FetchedPage>;
}

/// 基于 reqwest 的页面来源，会话内复用连接
pub struct HttpPageSource {
    client: Client,
}

impl HttpPageSource {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let mut builder = Client::builder().timeout(config.timeout);

        if config.client_mode == ClientMode::Rich {
            builder = builder.default_headers(rich_headers(&config.user_agent)?);
        }

        let client = builder.build()?;

        Ok(Self { client })
    }
}

fn rich_headers(user_agent: &str) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(
        USER_AGENT,
        HeaderValue::from_str(user_agent)
            .map_err(|e| DataHubError::DataError(format!("Invalid user agent: {}", e)))?,
    );
    headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers.insert("Sec-Fetch-Dest", HeaderValue::from_static("document"));
    Ok(headers)
}

#[async_trait]
impl PageSource for HttpPageSource {
    async fn get(&self, url: &str) -> Result<FetchedPage> {
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        debug!("GET {} -> {} ({} bytes)", url, status, body.len());
        Ok(FetchedPage { status, body })
    }
}
