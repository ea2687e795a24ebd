//! Authenticated HTTP transport for the Lidarr v1 API.
//!
//! Every other downstream module goes through [`Transport`]: it owns URL
//! construction, API-key injection, per-call deadlines and the translation
//! of HTTP failures into [`DownstreamError`].
//!
//! The API key can travel either as the `apikey` query parameter or as the
//! `X-Api-Key` header, selectable per call. URLs are only ever logged
//! through [`redact_api_key`], so the key never reaches a log line.

use std::time::Duration;

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Deadline for ordinary API calls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Deadline for metadata-refresh commands, which the service queues slowly.
pub const REFRESH_TIMEOUT: Duration = Duration::from_secs(90);

/// User agent sent with every request
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Errors from talking to the downstream library service.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DownstreamError {
    #[error("request to {endpoint} timed out after {timeout:?}")]
    Timeout { endpoint: String, timeout: Duration },

    #[error("HTTP {status} {reason}: {body}")]
    Http {
        status: u16,
        reason: String,
        body: String,
    },

    #[error("network error: {0}")]
    Network(String),

    #[error("failed to parse response: {0}")]
    Parse(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl DownstreamError {
    /// Whether this failure means "the record does not exist" rather than
    /// "something went wrong".
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Http { status: 404, .. })
    }
}

/// Where the API key travels for a given call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Auth {
    /// `X-Api-Key` header (default)
    #[default]
    Header,
    /// `apikey` query parameter
    QueryParam,
}

/// Per-call knobs for [`Transport::request`].
///
/// The typed `get`/`post`/`put`/`delete` helpers cover the common cases;
/// `request` with explicit options is the escape hatch when a call needs a
/// non-default method, deadline or key placement.
#[derive(Debug, Clone)]
pub struct RequestOptions<'a> {
    pub method: Method,
    pub query: &'a [(&'a str, String)],
    pub body: Option<serde_json::Value>,
    pub timeout: Duration,
    pub auth: Auth,
}

impl Default for RequestOptions<'_> {
    fn default() -> Self {
        Self {
            method: Method::GET,
            query: &[],
            body: None,
            timeout: DEFAULT_TIMEOUT,
            auth: Auth::default(),
        }
    }
}

/// HTTP client for the downstream library service.
///
/// Cheap to clone; the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct Transport {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl Transport {
    /// Fail fast on unusable settings, before any network call is attempted.
    pub fn validate(base_url: &str, api_key: &str) -> Result<(), DownstreamError> {
        if base_url.trim().is_empty() {
            return Err(DownstreamError::Config(
                "downstream base URL is not set".to_string(),
            ));
        }
        if api_key.trim().is_empty() {
            return Err(DownstreamError::Config(
                "downstream API key is not set".to_string(),
            ));
        }
        Ok(())
    }

    /// Create a transport for the service at `base_url`.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, DownstreamError> {
        let base_url = base_url.into();
        let api_key = api_key.into();
        Self::validate(&base_url, &api_key)?;

        let http = reqwest::Client::builder()
            .gzip(true)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| DownstreamError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// One call with every knob exposed: method, query, body, deadline and
    /// API-key placement.
    pub async fn request<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions<'_>,
    ) -> Result<T, DownstreamError> {
        let value = self
            .send(
                options.method,
                endpoint,
                options.query,
                options.body,
                options.timeout,
                options.auth,
            )
            .await?;
        from_value(value)
    }

    /// GET an endpoint and deserialize the JSON response.
    pub async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<T, DownstreamError> {
        let value = self
            .send(Method::GET, endpoint, query, None, DEFAULT_TIMEOUT, Auth::default())
            .await?;
        from_value(value)
    }

    /// POST a JSON body and deserialize the response.
    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T, DownstreamError> {
        self.post_with_timeout(endpoint, body, DEFAULT_TIMEOUT).await
    }

    /// POST with a caller-chosen deadline (refresh commands take longer).
    pub async fn post_with_timeout<T: DeserializeOwned, B: Serialize>(
        &self,
        endpoint: &str,
        body: &B,
        timeout: Duration,
    ) -> Result<T, DownstreamError> {
        let body = to_value(body)?;
        let value = self
            .send(Method::POST, endpoint, &[], Some(body), timeout, Auth::default())
            .await?;
        from_value(value)
    }

    /// PUT a full JSON object and deserialize the response.
    pub async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T, DownstreamError> {
        let body = to_value(body)?;
        let value = self
            .send(Method::PUT, endpoint, &[], Some(body), DEFAULT_TIMEOUT, Auth::default())
            .await?;
        from_value(value)
    }

    /// DELETE an endpoint, ignoring the response body.
    pub async fn delete(&self, endpoint: &str) -> Result<(), DownstreamError> {
        self.send(Method::DELETE, endpoint, &[], None, DEFAULT_TIMEOUT, Auth::default())
            .await?;
        Ok(())
    }

    /// Build the full request URL, optionally carrying the API key as a
    /// query parameter.
    fn build_url(&self, endpoint: &str, query: &[(&str, String)], auth: Auth) -> String {
        let mut url = format!("{}/api/v1/{}", self.base_url, endpoint);
        let mut sep = '?';
        for (key, value) in query {
            url.push(sep);
            url.push_str(key);
            url.push('=');
            url.push_str(&urlencoding::encode(value));
            sep = '&';
        }
        if auth == Auth::QueryParam {
            url.push(sep);
            url.push_str("apikey=");
            url.push_str(&urlencoding::encode(&self.api_key));
        }
        url
    }

    /// One HTTP exchange with a hard deadline.
    ///
    /// The deadline covers connect, send and body read; when it expires the
    /// in-flight exchange is dropped and a `Timeout` naming the endpoint is
    /// returned. Empty response bodies parse as JSON null.
    async fn send(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(&str, String)],
        body: Option<serde_json::Value>,
        timeout: Duration,
        auth: Auth,
    ) -> Result<serde_json::Value, DownstreamError> {
        let url = self.build_url(endpoint, query, auth);
        tracing::debug!(method = %method, url = %redact_api_key(&url), "downstream request");

        let mut request = self.http.request(method, &url);
        if auth == Auth::Header {
            request = request.header("X-Api-Key", &self.api_key);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let exchange = async {
            let response = request
                .send()
                .await
                .map_err(|e| DownstreamError::Network(e.to_string()))?;

            let status = response.status();
            let text = response
                .text()
                .await
                .map_err(|e| DownstreamError::Network(e.to_string()))?;

            if !status.is_success() {
                return Err(DownstreamError::Http {
                    status: status.as_u16(),
                    reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
                    body: text.chars().take(200).collect(),
                });
            }

            if text.trim().is_empty() {
                return Ok(serde_json::Value::Null);
            }
            serde_json::from_str(&text).map_err(|e| DownstreamError::Parse(e.to_string()))
        };

        match tokio::time::timeout(timeout, exchange).await {
            Ok(result) => result,
            Err(_) => Err(DownstreamError::Timeout {
                endpoint: endpoint.to_string(),
                timeout,
            }),
        }
    }
}

fn to_value<B: Serialize>(body: &B) -> Result<serde_json::Value, DownstreamError> {
    serde_json::to_value(body).map_err(|e| DownstreamError::Parse(e.to_string()))
}

fn from_value<T: DeserializeOwned>(value: serde_json::Value) -> Result<T, DownstreamError> {
    serde_json::from_value(value).map_err(|e| DownstreamError::Parse(e.to_string()))
}

/// Replace the `apikey` query value of a URL with a suffix-preserving mask.
///
/// Keys longer than three characters keep their last three characters; short
/// keys are masked entirely. For logging only, never for authorization.
pub fn redact_api_key(url: &str) -> String {
    let Some((base, query)) = url.split_once('?') else {
        return url.to_string();
    };
    let redacted: Vec<String> = query
        .split('&')
        .map(|pair| match pair.split_once('=') {
            Some((key, value)) if key.eq_ignore_ascii_case("apikey") => {
                let chars: Vec<char> = value.chars().collect();
                let suffix: String = if chars.len() > 3 {
                    chars[chars.len() - 3..].iter().collect()
                } else {
                    String::new()
                };
                format!("{key}=***{suffix}")
            }
            _ => pair.to_string(),
        })
        .collect();
    format!("{base}?{}", redacted.join("&"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn transport() -> Transport {
        Transport::new("http://lidarr.local:8686/", "secret-key-123").unwrap()
    }

    #[test]
    fn test_validate_rejects_missing_settings() {
        assert!(Transport::validate("", "key").is_err());
        assert!(Transport::validate("http://x", "  ").is_err());
        assert!(Transport::validate("http://x", "key").is_ok());
    }

    #[test]
    fn test_build_url_joins_base_and_query() {
        let t = transport();
        let url = t.build_url(
            "album/lookup",
            &[("term", "lidarr:rg 1".to_string())],
            Auth::Header,
        );
        assert_eq!(
            url,
            "http://lidarr.local:8686/api/v1/album/lookup?term=lidarr%3Arg%201"
        );
    }

    #[test]
    fn test_build_url_appends_api_key_when_requested() {
        let t = transport();
        let url = t.build_url("artist", &[], Auth::QueryParam);
        assert_eq!(
            url,
            "http://lidarr.local:8686/api/v1/artist?apikey=secret-key-123"
        );

        let with_query = t.build_url("album", &[("artistId", "7".to_string())], Auth::QueryParam);
        assert!(with_query.ends_with("album?artistId=7&apikey=secret-key-123"));
    }

    #[test]
    fn test_request_options_select_key_placement_per_call() {
        let t = transport();

        // Default placement is the header: the URL carries no key.
        let defaults = RequestOptions::default();
        assert_eq!(defaults.auth, Auth::Header);
        let url = t.build_url("artist", defaults.query, defaults.auth);
        assert!(!url.contains("apikey"));

        // Query placement is chosen per call through the public options.
        let options = RequestOptions {
            auth: Auth::QueryParam,
            ..Default::default()
        };
        let url = t.build_url("artist", options.query, options.auth);
        assert_eq!(
            url,
            "http://lidarr.local:8686/api/v1/artist?apikey=secret-key-123"
        );
    }

    #[test]
    fn test_redact_api_key_masks_value() {
        let url = "http://lidarr.local/api/v1/artist?artistId=7&apikey=secret-key-123";
        let redacted = redact_api_key(url);
        assert_eq!(
            redacted,
            "http://lidarr.local/api/v1/artist?artistId=7&apikey=***123"
        );
    }

    #[test]
    fn test_redact_api_key_short_keys_masked_entirely() {
        assert_eq!(redact_api_key("http://x/?apikey=abc"), "http://x/?apikey=***");
        assert_eq!(redact_api_key("http://x/?apikey="), "http://x/?apikey=***");
    }

    #[test]
    fn test_redact_leaves_urls_without_query_alone() {
        assert_eq!(redact_api_key("http://x/api/v1/artist"), "http://x/api/v1/artist");
    }

    #[test]
    fn test_not_found_detection() {
        let err = DownstreamError::Http {
            status: 404,
            reason: "Not Found".to_string(),
            body: String::new(),
        };
        assert!(err.is_not_found());

        let err = DownstreamError::Http {
            status: 500,
            reason: "Internal Server Error".to_string(),
            body: String::new(),
        };
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_timeout_error_names_endpoint() {
        let err = DownstreamError::Timeout {
            endpoint: "command".to_string(),
            timeout: Duration::from_secs(30),
        };
        let msg = err.to_string();
        assert!(msg.contains("command"));
        assert!(msg.contains("30"));
    }

    proptest! {
        // Keys longer than 3 characters keep exactly their last 3 characters
        // and leak nothing else.
        #[test]
        fn prop_redaction_preserves_only_suffix(key in "[A-Za-z0-9]{4,40}") {
            let url = format!("http://lidarr.local/api/v1/artist?apikey={key}");
            let redacted = redact_api_key(&url);

            let suffix = &key[key.len() - 3..];
            prop_assert_eq!(
                redacted,
                format!("http://lidarr.local/api/v1/artist?apikey=***{suffix}")
            );
        }
    }
}
