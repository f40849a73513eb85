use async_trait::async_trait;
use chrono::NaiveDate;

use crate::{http::FeedHttpRequest, FetchError, SetupError};

/// The outside world as seen by the collector: a calendar and the network.
#[async_trait]
pub trait Environment {
    /// Gets the current local date.
    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }

    /// Fetches the body behind the given URL, rejecting bodies over `max_response_bytes`.
    async fn fetch(&self, url: &str, max_response_bytes: u64) -> Result<Vec<u8>, FetchError>;
}

/// An environment that talks to the real feed.
pub struct LiveEnvironment {
    client: reqwest::Client,
}

impl LiveEnvironment {
    /// Construct a new [LiveEnvironment].
    pub fn new() -> Result<Self, SetupError> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Environment for LiveEnvironment {
    async fn fetch(&self, url: &str, max_response_bytes: u64) -> Result<Vec<u8>, FetchError> {
        FeedHttpRequest::new(&self.client)
            .get(url)
            .max_response_bytes(max_response_bytes)
            .send()
            .await
    }
}
