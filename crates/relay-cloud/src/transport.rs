pub use reqwest::Method;
use reqwest::header::AUTHORIZATION;

use crate::error::TransportError;

/// Version prefix of the platform API.
const API_PREFIX: &str = "/1.0";

/// A single request against the platform API.
///
/// `path` is relative to the API root (`/apps/myapp-dev`); query and form
/// pairs keep their order and may repeat a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub form: Vec<(String, String)>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            form: Vec::new(),
        }
    }

    pub fn query(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query.push((key.to_owned(), value.into()));
        self
    }

    pub fn form(mut self, key: &str, value: impl Into<String>) -> Self {
        self.form.push((key.to_owned(), value.into()));
        self
    }

    /// First form value stored under `key`.
    pub fn form_value(&self, key: &str) -> Option<&str> {
        lookup(&self.form, key)
    }

    /// First query value stored under `key`.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        lookup(&self.query, key)
    }
}

fn lookup<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_no_content(&self) -> bool {
        self.status == 204
    }
}

/// Abstraction over the HTTP round-trip for testability.
///
/// Production code uses [`HttpTransport`]; tests use mockall-generated mocks
/// or the in-memory `fake::FakePlatform`.
#[allow(async_fn_in_trait)]
pub trait Transport: Send + Sync {
    /// Perform one request; any HTTP status is a successful round-trip.
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError>;
}

/// Real HTTP transport backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    target: String,
    token: Option<String>,
}

impl HttpTransport {
    /// `target` is the platform base URL; `token` is sent as a bearer token.
    pub fn new(target: &str, token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            target: target.trim_end_matches('/').to_owned(),
            token,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{API_PREFIX}{path}", self.target)
    }
}

impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let url = self.url(&request.path);
        tracing::debug!(method = %request.method, url = %url, "platform request");

        let mut req = self.client.request(request.method.clone(), &url);
        if let Some(token) = &self.token {
            req = req.header(AUTHORIZATION, format!("bearer {token}"));
        }
        if !request.query.is_empty() {
            req = req.query(&request.query);
        }
        if !request.form.is_empty() {
            req = req.form(&request.form);
        }

        let response = req.send().await.map_err(|e| TransportError::Request {
            url: url.clone(),
            source: e,
        })?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Body { url, source: e })?;

        tracing::debug!(status, "platform response");
        Ok(ApiResponse { status, body })
    }
}

/// Fetch a plain file published next to the platform API, such as the
/// shared `config.json` of a relay server.
pub async fn download(server: &str, file: &str) -> Result<String, TransportError> {
    let url = format!("{}/{file}", server.trim_end_matches('/'));
    tracing::debug!(url = %url, "downloading");

    let response = reqwest::get(&url)
        .await
        .map_err(|e| TransportError::Request {
            url: url.clone(),
            source: e,
        })?;
    let status = response.status().as_u16();
    let body = response.text().await.map_err(|e| TransportError::Body {
        url: url.clone(),
        source: e,
    })?;
    if status != 200 {
        return Err(TransportError::Download { url, status, body });
    }
    Ok(body)
}
