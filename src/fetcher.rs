use std::time::Duration;

use reqwest::Client;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue};
use tracing::debug;

use crate::Result;
use crate::utils::error::AppError;

// Header set impersonating a common desktop browser; plenty of product pages
// refuse the default reqwest user agent outright.
const ACCEPT_HTML: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8";
const ACCEPT_LANG: &str = "en-US,en;q=0.9";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    pub fn new(user_agent: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(ACCEPT_LANG));

        let client = Client::builder()
            .user_agent(user_agent)
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self { client })
    }

    /// Performs a single GET and returns the body. Transport errors and
    /// non-success statuses both surface as errors; there is no retry.
    pub async fn fetch(&self, url: &str) -> Result<String> {
        debug!(url, "fetching page");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::HttpStatus {
                status,
                url: url.to_string(),
            });
        }

        Ok(response.text().await?)
    }
}
