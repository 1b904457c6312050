//! Shared HTTP client for the terminology service

use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue};
use serde_json::Value;
use url::Url;

use crate::config::TerminologyConfig;
use crate::error::{LookupError, TerminologyError};

/// JSON-over-HTTP client bound to one terminology server.
#[derive(Debug, Clone)]
pub struct TerminologyClient {
    http: reqwest::Client,
    base_url: Url,
}

impl TerminologyClient {
    /// Build a client from configuration.
    ///
    /// Fails if a timeout is zero, the server URL is not an absolute http(s)
    /// URL, or the HTTP client cannot be created.
    pub fn new(config: &TerminologyConfig) -> Result<Self, TerminologyError> {
        config.validate()?;

        let base_url = Url::parse(&config.server_url)
            .map_err(|e| TerminologyError::InvalidUrl(format!("{}: {e}", config.server_url)))?;
        if base_url.cannot_be_a_base() || !matches!(base_url.scheme(), "http" | "https") {
            return Err(TerminologyError::InvalidUrl(config.server_url.clone()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let language = HeaderValue::from_str(&config.accept_language)
            .map_err(|e| TerminologyError::HttpClientError(e.to_string()))?;
        headers.insert(ACCEPT_LANGUAGE, language);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| TerminologyError::HttpClientError(e.to_string()))?;

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build an endpoint URL from path segments. Segments are percent-encoded.
    pub fn endpoint<'a, I>(&self, segments: I) -> Result<Url, LookupError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| LookupError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// GET a JSON document.
    pub async fn get_json(&self, url: Url, query: &[(&str, &str)]) -> Result<Value, LookupError> {
        tracing::debug!(url = %url, "Terminology request");

        let response = self.http.get(url.clone()).query(query).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| LookupError::Decode(e.to_string()))
    }
}
