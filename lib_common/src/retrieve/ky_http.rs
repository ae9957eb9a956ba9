//! # HTTP Retrieval Utilities
//!
//! A thin asynchronous wrapper around `reqwest` with standardized JSON
//! response handling. Requests are deliberately single-shot: no retry
//! layer, no client-side timeout override. A hung upstream blocks the
//! caller until the platform's own limit intervenes.

use reqwest::header::HeaderMap;
use reqwest::Url;
use serde::de::DeserializeOwned;

/// A standardized container for API responses.
///
/// Wraps the deserialized data along with metadata about the HTTP
/// transaction, such as status code and headers.
#[derive(Debug)]
pub struct ApiResponse<T> {
    /// The successfully deserialized response body, if any.
    pub data: Option<T>,
    /// The raw error body returned by the server if the request failed.
    pub error_body: Option<String>,
    /// The numeric HTTP status code.
    pub status: u16,
    /// Indicates if the status code was in the 2xx range.
    pub success: bool,
    /// The headers returned by the server.
    pub headers: HeaderMap,
}

/// A small asynchronous HTTP client bound to one base URL.
pub struct ApiClient {
    inner: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Creates a new `ApiClient` for the given absolute base URL.
    ///
    /// # Errors
    /// Fails if `base_url` is not a valid absolute URL.
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let url = Url::parse(base_url)?;
        Ok(Self {
            inner: reqwest::Client::new(),
            base_url: url,
        })
    }

    /// Performs a single GET request against `path` (joined to the base
    /// URL; an empty path addresses the base URL itself) and deserializes
    /// a 2xx body as JSON.
    ///
    /// # Errors
    /// Returns an error when the network transfer fails or a 2xx body is
    /// not valid JSON for `T`. Non-2xx responses are NOT errors at this
    /// layer; they come back as `ApiResponse { success: false, .. }` with
    /// the raw body captured for the caller's logging.
    pub async fn get_json<T>(&self, path: &str) -> anyhow::Result<ApiResponse<T>>
    where
        T: DeserializeOwned,
    {
        let full_url = self.base_url.join(path)?;
        let response: reqwest::Response = self.inner.get(full_url).send().await?;

        let status = response.status();
        let resp_headers = response.headers().clone();
        let success = status.is_success();

        if success {
            let data = response.json::<T>().await?;
            Ok(ApiResponse {
                data: Some(data),
                error_body: None,
                status: status.as_u16(),
                success: true,
                headers: resp_headers,
            })
        } else {
            let error_text = response.text().await.ok();
            Ok(ApiResponse {
                data: None,
                error_body: error_text,
                status: status.as_u16(),
                success: false,
                headers: resp_headers,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_relative_base_url() {
        assert!(ApiClient::new("api/rsi").is_err());
        assert!(ApiClient::new("https://example.com/api/rsi").is_ok());
    }

    #[test]
    fn empty_path_addresses_the_base_url() {
        let base = Url::parse("https://example.com/api/rsi").unwrap();
        assert_eq!(base.join("").unwrap().as_str(), "https://example.com/api/rsi");
    }
}
