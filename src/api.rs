// API client module: a small blocking HTTP client for the quiz backend.
// Everything above this layer talks to a `Transport`, so the menus and the
// smoke sequence can run against an in-memory fake in tests.

use crate::error::ApiError;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

/// HTTP verbs the quiz API uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// One call to the API: verb, path below the base URL, optional JSON body
/// and optional bearer token.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
    pub token: Option<String>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        ApiRequest {
            method,
            path: path.into(),
            body: None,
            token: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    /// Attach a JSON body.
    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self, ApiError> {
        self.body = Some(serde_json::to_value(body).map_err(ApiError::Encode)?);
        Ok(self)
    }

    /// Attach the session token. It is forwarded as-is.
    pub fn bearer(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }
}

/// What came back from the server, successful or not.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    /// Parsed body, present only when the server labelled it as JSON.
    pub json: Option<Value>,
    /// Raw body text, always kept so it can be shown verbatim.
    pub text: String,
}

impl ApiResponse {
    pub fn from_json(status: u16, json: Value) -> Self {
        ApiResponse {
            status,
            text: json.to_string(),
            json: Some(json),
        }
    }

    pub fn from_text(status: u16, text: impl Into<String>) -> Self {
        ApiResponse {
            status,
            json: None,
            text: text.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The parsed body, or the raw text as a JSON string when the body was
    /// not JSON.
    pub fn payload(&self) -> Value {
        match &self.json {
            Some(json) => json.clone(),
            None => Value::String(self.text.clone()),
        }
    }

    /// Deserialize the body into a typed value.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        match &self.json {
            Some(json) => serde_json::from_value(json.clone()).map_err(ApiError::Decode),
            None => serde_json::from_str(&self.text).map_err(ApiError::Decode),
        }
    }

    /// Split on the status: 2xx goes through `on_success`, anything else is
    /// handed back untouched as a failure.
    pub fn into_reply<T>(
        self,
        on_success: impl FnOnce(&ApiResponse) -> Result<T, ApiError>,
    ) -> Result<Reply<T>, ApiError> {
        if self.is_success() {
            Ok(Reply::Success(on_success(&self)?))
        } else {
            Ok(Reply::Failure(self))
        }
    }
}

/// Outcome of an action once the request went through. `Failure` carries
/// the server's own response so its error text can be printed.
#[derive(Clone, Debug, PartialEq)]
pub enum Reply<T> {
    Success(T),
    Failure(ApiResponse),
}

/// Anything able to carry an `ApiRequest` to the backend.
pub trait Transport {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError>;
}

/// Blocking reqwest client bound to the API base URL.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .build()
            .map_err(|e| ApiError::Client(e.to_string()))?;
        Ok(ApiClient {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Build the Authorization header map when a token is set.
pub(crate) fn auth_headers(token: Option<&str>) -> Result<HeaderMap, ApiError> {
    let mut headers = HeaderMap::new();
    if let Some(t) = token {
        let val = format!("Bearer {}", t);
        headers.insert(AUTHORIZATION, HeaderValue::from_str(&val)?);
    }
    Ok(headers)
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map_or(false, |ct| ct.to_ascii_lowercase().contains("json"))
}

impl Transport for ApiClient {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        let url = self.url(&request.path);
        debug!(method = ?request.method, %url, "sending request");

        let mut req = self
            .client
            .request(request.method.into(), &url)
            .headers(auth_headers(request.token.as_deref())?);
        if let Some(body) = &request.body {
            req = req.json(body);
        }

        let res = req.send().map_err(|e| {
            warn!(%url, error = %e, "request failed");
            ApiError::Transport {
                url: url.clone(),
                reason: e.to_string(),
            }
        })?;

        let status = res.status();
        let json_body = is_json(res.headers());
        let text = res.text().map_err(|e| ApiError::Transport {
            url: url.clone(),
            reason: e.to_string(),
        })?;
        debug!(%url, status = status.as_u16(), "response received");

        // A body labelled JSON that does not parse is still shown as text.
        let json = if json_body {
            serde_json::from_str(&text).ok()
        } else {
            None
        };
        Ok(ApiResponse {
            status: status.as_u16(),
            json,
            text,
        })
    }
}
