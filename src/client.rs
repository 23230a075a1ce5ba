//! The OpenAlex API client and its HTTP transport.

use crate::error::{OpenAlexError, Result};
use crate::rate_limit::RateLimiter;
use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Public OpenAlex API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.openalex.org";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Async client for the OpenAlex API.
///
/// Cheap to clone: clones share the connection pool and the rate limiter.
///
/// # Example
///
/// ```no_run
/// # async fn example() -> openalex_client::error::Result<()> {
/// use openalex_client::OpenAlexClient;
///
/// let client = OpenAlexClient::with_email("me@example.org");
/// let work = client.works().single("10.7717/peerj.4375", Some("doi")).await?;
/// println!("{}", work["display_name"]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct OpenAlexClient {
    pub(crate) http: Client,
    pub(crate) base_url: String,
    pub(crate) email: Option<String>,
    pub(crate) rate_limiter: RateLimiter,
}

impl OpenAlexClient {
    /// Create an anonymous client (common pool).
    pub fn new() -> Self {
        Self {
            http: build_http(DEFAULT_TIMEOUT),
            base_url: DEFAULT_BASE_URL.to_string(),
            email: None,
            rate_limiter: RateLimiter::default(),
        }
    }

    /// Create a client that identifies itself with a contact email (polite pool).
    pub fn with_email(email: impl Into<String>) -> Self {
        Self::new().email(email)
    }

    /// Create a client from `OPENALEX_EMAIL` and `OPENALEX_BASE_URL`, both optional.
    pub fn from_env() -> Result<Self> {
        let mut client = Self::new();

        if let Some(email) = non_empty_var("OPENALEX_EMAIL") {
            if !email.contains('@') {
                return Err(OpenAlexError::Config(format!(
                    "OPENALEX_EMAIL is not an email address: {}",
                    email
                )));
            }
            client = client.email(email);
        }
        if let Some(base_url) = non_empty_var("OPENALEX_BASE_URL") {
            url::Url::parse(&base_url).map_err(|e| {
                OpenAlexError::Config(format!("Invalid OPENALEX_BASE_URL '{}': {}", base_url, e))
            })?;
            client = client.with_base_url(base_url);
        }

        Ok(client)
    }

    /// Set the contact email sent with every request.
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Override the base URL (useful for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Override the rate limit (requests per second, `0` disables it).
    pub fn with_rate_limit(mut self, per_second: f64) -> Self {
        self.rate_limiter = RateLimiter::new(per_second);
        self
    }

    /// Override the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http = build_http(timeout);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn contact_email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// `User-Agent` value; carries `mailto:` when an email is configured.
    pub fn user_agent(&self) -> String {
        let agent = concat!("openalex-client/", env!("CARGO_PKG_VERSION"));
        match &self.email {
            Some(email) => format!("{} (mailto:{})", agent, email),
            None => agent.to_string(),
        }
    }

    /// GET `<base_url>/<path>` and parse the body as JSON.
    ///
    /// Non-2xx responses and unparseable bodies are returned as errors; nothing
    /// is retried.
    pub async fn get(&self, path: &str, params: &[(&str, &str)]) -> Result<Value> {
        self.rate_limiter.acquire().await;

        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        debug!(%url, ?params, "GET");
        let response = self
            .http
            .get(&url)
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, self.user_agent())
            .query(params)
            .send()
            .await?;

        let body = handle_response(response).await?;
        serde_json::from_str(&body)
            .map_err(|e| OpenAlexError::Parse(format!("Invalid JSON from '{}': {}", path, e)))
    }
}

impl Default for OpenAlexClient {
    fn default() -> Self {
        Self::new()
    }
}

fn build_http(timeout: Duration) -> Client {
    Client::builder()
        .timeout(timeout)
        .build()
        .expect("Failed to create HTTP client")
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Map status codes to errors, returning the body on success.
async fn handle_response(response: reqwest::Response) -> Result<String> {
    let status = response.status().as_u16();

    match status {
        200..=299 => Ok(response.text().await?),
        404 => {
            let url = response.url().to_string();
            Err(OpenAlexError::NotFound(url))
        }
        429 => {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_secs);
            Err(OpenAlexError::RateLimited { retry_after })
        }
        _ => {
            let body = response.text().await.unwrap_or_default();
            Err(OpenAlexError::Api {
                status,
                message: body,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(server: &MockServer) -> OpenAlexClient {
        OpenAlexClient::new()
            .with_base_url(server.uri())
            .with_rate_limit(0.0)
    }

    #[test]
    fn test_defaults() {
        let client = OpenAlexClient::new();
        assert_eq!(client.base_url(), "https://api.openalex.org");
        assert_eq!(client.contact_email(), None);
        assert!(client.user_agent().starts_with("openalex-client/"));
        assert!(!client.user_agent().contains("mailto"));
    }

    #[test]
    fn test_user_agent_with_email() {
        let client = OpenAlexClient::with_email("me@example.org");
        assert!(client.user_agent().ends_with("(mailto:me@example.org)"));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client = OpenAlexClient::new().with_base_url("http://localhost:1234/");
        assert_eq!(client.base_url(), "http://localhost:1234");
    }

    #[tokio::test]
    async fn test_get_sends_params_and_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/works"))
            .and(query_param("filter", "is_oa:true"))
            .and(header("accept", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "meta": {"count": 1},
                "results": []
            })))
            .expect(1)
            .mount(&server)
            .await;

        let value = test_client(&server)
            .email("me@example.org")
            .get("works", &[("filter", "is_oa:true")])
            .await
            .unwrap();
        assert_eq!(value["meta"]["count"], 1);

        let requests = server.received_requests().await.unwrap();
        let agent = requests[0].headers.get("user-agent").unwrap().to_str().unwrap();
        assert!(agent.contains("mailto:me@example.org"));
    }

    #[tokio::test]
    async fn test_get_maps_status_codes() {
        let server = MockServer::start().await;
        Mock::given(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(path("/busy"))
            .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "3"))
            .mount(&server)
            .await;
        Mock::given(path("/broken"))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
            .mount(&server)
            .await;

        let client = test_client(&server);
        assert!(matches!(
            client.get("missing", &[]).await,
            Err(OpenAlexError::NotFound(_))
        ));
        assert!(matches!(
            client.get("busy", &[]).await,
            Err(OpenAlexError::RateLimited { retry_after: Some(d) }) if d == Duration::from_secs(3)
        ));
        match client.get("broken", &[]).await {
            Err(OpenAlexError::Api { status, message }) => {
                assert_eq!(status, 500);
                assert_eq!(message, "internal");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_get_rejects_non_json_body() {
        let server = MockServer::start().await;
        Mock::given(path("/works/random"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let result = test_client(&server).get("works/random", &[]).await;
        assert!(matches!(result, Err(OpenAlexError::Parse(_))));
    }
}
