//! HTTP transport for the scanner API.
//!
//! One scan is one GET request. The response body is returned untouched so
//! export mode can print it verbatim and decode errors can show it.

use crate::config::ApiOptions;
use crate::error::Result;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONNECTION};
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Build the scan URL for `domain`.
///
/// Without cached results the `clear` parameter asks the API for a fresh scan.
///
/// # Errors
///
/// Returns [`SiteCheckError::InvalidUrl`](crate::error::SiteCheckError::InvalidUrl)
/// if `base_url` cannot be parsed.
pub fn scan_url(base_url: &str, domain: &str, use_cached_results: bool) -> Result<Url> {
    let mut url = Url::parse(base_url).map_err(|e| crate::err!(InvalidUrl {
        url: base_url.to_string(),
        message: e.to_string(),
    }))?;

    {
        let mut query = url.query_pairs_mut();
        query.clear().append_key_only("json");
        if !use_cached_results {
            query.append_key_only("clear");
        }
        query.append_pair("scan", domain);
    }

    Ok(url)
}

/// Fetches raw scan responses.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform a GET request and return the response body.
    ///
    /// # Errors
    ///
    /// Returns a transport or timeout error if the request does not complete
    /// with a success status.
    async fn get(&self, url: &Url) -> Result<Vec<u8>>;
}

/// `reqwest`-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a transport using the configured timeout and User-Agent.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(options: &ApiOptions) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en"));

        let client = Client::builder()
            .timeout(Duration::from_secs(options.timeout_secs))
            .user_agent(options.user_agent.as_str())
            .default_headers(headers)
            .build()
            .map_err(|e| crate::err!(Transport {
                url: options.base_url.clone(),
                message: format!("Failed to create HTTP client: {e}"),
                status_code: None,
            }))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &Url) -> Result<Vec<u8>> {
        tracing::debug!(url = %url, "Sending scan request");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| request_error(url, &e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url = %url, status = %status, "Scanner API returned an error status");
            return Err(crate::err!(Transport {
                url: url.to_string(),
                message: format!("Status {status}"),
                status_code: Some(status.as_u16()),
            }));
        }

        let body = response.bytes().await.map_err(|e| request_error(url, &e))?;
        tracing::debug!(url = %url, bytes = body.len(), "Received scan response");

        Ok(body.to_vec())
    }
}

fn request_error(url: &Url, error: &reqwest::Error) -> crate::error::SiteCheckError {
    if error.is_timeout() {
        crate::err!(Timeout {
            url: url.to_string(),
            message: error.to_string(),
        })
    } else {
        crate::err!(Transport {
            url: url.to_string(),
            message: error.to_string(),
            status_code: error.status().map(|s| s.as_u16()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_BASE_URL;

    #[test]
    fn test_fresh_scan_url() {
        let url = scan_url(DEFAULT_BASE_URL, "example.com", false).unwrap();
        assert_eq!(
            url.as_str(),
            "https://sitecheck.sucuri.net/api/v2/?json&clear&scan=example.com"
        );
    }

    #[test]
    fn test_cached_scan_url() {
        let url = scan_url(DEFAULT_BASE_URL, "example.com", true).unwrap();
        assert_eq!(
            url.as_str(),
            "https://sitecheck.sucuri.net/api/v2/?json&scan=example.com"
        );
    }

    #[test]
    fn test_domain_is_passed_through_encoded() {
        let url = scan_url(DEFAULT_BASE_URL, "https://example.com/blog?p=1", true).unwrap();
        let scan: Vec<_> = url
            .query_pairs()
            .filter(|(key, _)| key == "scan")
            .map(|(_, value)| value.into_owned())
            .collect();
        assert_eq!(scan, vec!["https://example.com/blog?p=1"]);
    }

    #[test]
    fn test_base_url_query_is_replaced() {
        let url = scan_url("http://localhost:8080/api/v2/?stale=1", "example.com", true).unwrap();
        assert_eq!(url.query(), Some("json&scan=example.com"));
    }

    #[test]
    fn test_invalid_base_url() {
        let err = scan_url("not a url", "example.com", false).unwrap_err();
        assert!(matches!(err, crate::error::SiteCheckError::InvalidUrl { .. }));
    }

    #[test]
    fn test_http_transport_builds() {
        assert!(HttpTransport::new(&ApiOptions::default()).is_ok());
    }
}
