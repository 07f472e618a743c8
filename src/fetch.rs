use crate::error::ExtractError;
use log::debug;
use reqwest::Client;
use std::time::Duration;

/// Browser-like user agent; several recipe sites refuse requests that
/// identify as a plain HTTP library.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    pub fn new(timeout: Duration, user_agent: &str) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .expect("Failed to create HTTP client");

        PageFetcher { client }
    }

    /// Fetch a page body. A non-2xx status is a `Network` error, not an
    /// empty success.
    pub async fn fetch(&self, url: &str) -> Result<String, ExtractError> {
        debug!("fetching {url}");
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }
}

impl Default for PageFetcher {
    fn default() -> Self {
        PageFetcher::new(Duration::from_secs(30), DEFAULT_USER_AGENT)
    }
}
