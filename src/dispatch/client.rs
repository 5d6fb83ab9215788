//! # API Client
//!
//! Thin wrapper over `reqwest` that resolves [`ApiRequest`]s against the
//! profile's base URL and decodes every answer as JSON.

use anyhow::{Context, Result};
use reqwest::{Client, Proxy, Url};
use serde_json::Value;

use super::error::DispatchError;
use super::routes::ApiRequest;
use crate::config::Profile;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Decoded server answer
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    status: u16,
    body: Value,
}

impl ApiResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn body(&self) -> &Value {
        &self.body
    }

    /// Text to show the user
    ///
    /// The `message` field verbatim, else the `error` field, else a
    /// generic line naming the status.
    pub fn message(&self) -> String {
        ["message", "error"]
            .iter()
            .find_map(|key| match self.body.get(key) {
                Some(Value::String(text)) => Some(text.clone()),
                Some(Value::Null) | None => None,
                Some(other) => Some(other.to_string()),
            })
            .unwrap_or_else(|| format!("Request completed with status {}", self.status))
    }
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a client from a connection profile
    pub fn new(profile: &Profile) -> Result<Self> {
        let base_url = Url::parse(profile.server())
            .with_context(|| format!("Invalid server URL '{}'", profile.server()))?;
        if base_url.cannot_be_a_base() {
            return Err(DispatchError::InvalidBaseUrl(base_url.to_string()).into());
        }

        let mut builder = Client::builder()
            .user_agent(profile.user_agent().unwrap_or(USER_AGENT))
            .danger_accept_invalid_certs(profile.insecure());

        if let Some(timeout) = profile.timeout() {
            builder = builder.timeout(timeout);
        }
        if let Some(proxy) = profile.proxy() {
            builder = builder
                .proxy(Proxy::all(proxy).with_context(|| format!("Invalid proxy URL '{proxy}'"))?);
        }

        let http = builder.build().context("Failed to build HTTP client")?;
        tracing::debug!("API client ready for {}", base_url);

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve a request's path segments against the base URL
    ///
    /// Each segment is percent-encoded on its own, so an identifier can
    /// never escape its path position.
    pub fn endpoint(&self, request: &ApiRequest) -> Result<Url, DispatchError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| DispatchError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(request.segments());
        Ok(url)
    }

    /// Send one request and decode the JSON answer
    ///
    /// Any status with a JSON body counts as a response; business failures
    /// are the caller's to present like any other message.
    pub async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, DispatchError> {
        let url = self.endpoint(request)?;
        tracing::debug!("Sending {} {}", request.method(), url);

        let mut builder = self.http.request(request.method().clone(), url);
        if let Some(body) = request.body() {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;
        tracing::debug!("Received status {} ({} bytes)", status, text.len());

        let body = serde_json::from_str(&text)
            .map_err(|source| DispatchError::Decode { status, source })?;
        Ok(ApiResponse::new(status, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::routes;
    use serde_json::json;

    fn client_for(server: &str) -> ApiClient {
        ApiClient::new(&Profile::blank("test").with_server(server)).unwrap()
    }

    #[test]
    fn message_should_prefer_message_then_error_then_status() {
        let with_message =
            ApiResponse::new(201, json!({"message": "User registered successfully"}));
        assert_eq!(with_message.message(), "User registered successfully");

        let with_error = ApiResponse::new(400, json!({"error": "Username already taken"}));
        assert_eq!(with_error.message(), "Username already taken");

        let with_token = ApiResponse::new(200, json!({"token": "abc"}));
        assert_eq!(with_token.message(), "Request completed with status 200");
    }

    #[test]
    fn endpoint_should_join_segments_onto_base() {
        let client = client_for("http://127.0.0.1:5000");
        let url = client.endpoint(&routes::delete_post("42", Default::default())).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:5000/posts/42");
    }

    #[test]
    fn endpoint_should_keep_base_path_prefix() {
        let client = client_for("https://blog.example.com/api/");
        let url = client.endpoint(&routes::list_comments()).unwrap();
        assert_eq!(url.as_str(), "https://blog.example.com/api/comments");
    }

    #[test]
    fn endpoint_should_encode_identifier_as_one_segment() {
        let client = client_for("http://localhost:5000");
        let url = client.endpoint(&routes::show_post("a/b c")).unwrap();
        assert_eq!(url.path(), "/blog_posts/a%2Fb%20c");
    }

    #[test]
    fn client_should_reject_unparseable_server() {
        let result = ApiClient::new(&Profile::blank("test").with_server("not a url"));
        assert!(result.is_err());
    }

    #[test]
    fn client_should_reject_base_that_cannot_carry_a_path() {
        let profile = Profile::blank("test").with_server("mailto:admin@example.com");
        let result = ApiClient::new(&profile);
        assert!(result.is_err());
    }
}
