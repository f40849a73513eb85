use crate::{FetchError, USER_AGENT};

/// Used to build a GET request for a feed document.
pub struct FeedHttpRequest<'a> {
    client: &'a reqwest::Client,
    url: String,
    max_response_bytes: Option<u64>,
}

impl<'a> FeedHttpRequest<'a> {
    /// Creates a new request to be built up. Every request carries the [USER_AGENT] header.
    pub fn new(client: &'a reqwest::Client) -> Self {
        Self {
            client,
            url: Default::default(),
            max_response_bytes: None,
        }
    }

    /// Assigns the URL to request.
    pub fn get(mut self, url: &str) -> Self {
        self.url = String::from(url);
        self
    }

    /// Rejects responses with a body larger than the given number of bytes.
    pub fn max_response_bytes(mut self, max_response_bytes: u64) -> Self {
        self.max_response_bytes = Some(max_response_bytes);
        self
    }

    fn http_error(&self, error: reqwest::Error) -> FetchError {
        FetchError::Http {
            url: self.url.clone(),
            error: error.to_string(),
        }
    }

    fn exceeds_limit(&self, length: u64) -> bool {
        matches!(self.max_response_bytes, Some(max) if length > max)
    }

    fn too_large(&self) -> FetchError {
        FetchError::ResponseTooLarge {
            url: self.url.clone(),
            max_response_bytes: self.max_response_bytes.unwrap_or_default(),
        }
    }

    /// Issues the request and returns the response body. The body is read
    /// chunk by chunk and abandoned as soon as it passes the size cap.
    pub async fn send(self) -> Result<Vec<u8>, FetchError> {
        let mut response = self
            .client
            .get(&self.url)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .send()
            .await
            .map_err(|error| self.http_error(error))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        if response
            .content_length()
            .map_or(false, |length| self.exceeds_limit(length))
        {
            return Err(self.too_large());
        }

        let mut body = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|error| self.http_error(error))?
        {
            body.extend_from_slice(&chunk);
            if self.exceeds_limit(body.len() as u64) {
                return Err(self.too_large());
            }
        }

        Ok(body)
    }
}
