use async_trait::async_trait;
use reqwest::{multipart, redirect, Client};
use shared::{
    domain::{FieldValue, FormFields, Method},
    error::{ConfigurationError, FailureReason},
    protocol::RequestDescriptor,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid request url {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("request timed out: {0}")]
    Timeout(String),
    #[error("request failed: {0}")]
    Request(String),
    #[error("failed to read response body: {0}")]
    Body(String),
}

impl TransportError {
    fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_body() || err.is_decode() {
            Self::Body(err.to_string())
        } else {
            Self::Request(err.to_string())
        }
    }
}

impl From<TransportError> for FailureReason {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Body(_) => FailureReason::malformed_body(err.to_string()),
            _ => FailureReason::transport(err.to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseHeaders(Vec<(String, String)>);

impl ResponseHeaders {
    pub fn new(headers: Vec<(String, String)>) -> Self {
        Self(headers)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn content_type(&self) -> Option<&str> {
        self.get("content-type")
    }
}

enum ResponseBody {
    Buffered(Vec<u8>),
    Http(reqwest::Response),
}

pub struct TransportResponse {
    status: u16,
    headers: ResponseHeaders,
    body: ResponseBody,
}

impl TransportResponse {
    pub fn new(status: u16, headers: ResponseHeaders, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers,
            body: ResponseBody::Buffered(body.into()),
        }
    }

    pub fn from_reqwest(response: reqwest::Response) -> Self {
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        Self {
            status: response.status().as_u16(),
            headers: ResponseHeaders::new(headers),
            body: ResponseBody::Http(response),
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn headers(&self) -> &ResponseHeaders {
        &self.headers
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_redirect(&self) -> bool {
        (300..400).contains(&self.status)
    }

    pub async fn bytes(self) -> Result<Vec<u8>, TransportError> {
        match self.body {
            ResponseBody::Buffered(bytes) => Ok(bytes),
            ResponseBody::Http(response) => response
                .bytes()
                .await
                .map(|bytes| bytes.to_vec())
                .map_err(TransportError::from_reqwest),
        }
    }

    pub async fn text(self) -> Result<String, TransportError> {
        match self.body {
            ResponseBody::Buffered(bytes) => Ok(String::from_utf8_lossy(&bytes).into_owned()),
            ResponseBody::Http(response) => {
                response.text().await.map_err(TransportError::from_reqwest)
            }
        }
    }
}

impl std::fmt::Debug for TransportResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Issues exactly one request. No retries, no built-in timeout.
    async fn send(&self, request: RequestDescriptor) -> Result<TransportResponse, TransportError>;
}

/// `reqwest`-backed transport. Redirects are surfaced as responses unless
/// the descriptor explicitly asks to follow them.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    manual_redirects: Client,
    following_redirects: Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, ConfigurationError> {
        let build = |policy: redirect::Policy| {
            Client::builder()
                .redirect(policy)
                .build()
                .map_err(|e| ConfigurationError::HttpClient(e.to_string()))
        };
        Ok(Self {
            manual_redirects: build(redirect::Policy::none())?,
            following_redirects: build(redirect::Policy::default())?,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: RequestDescriptor) -> Result<TransportResponse, TransportError> {
        let url = reqwest::Url::parse(&request.url).map_err(|e| TransportError::InvalidUrl {
            url: request.url.clone(),
            reason: e.to_string(),
        })?;
        let client = if request.follow_redirects {
            &self.following_redirects
        } else {
            &self.manual_redirects
        };

        let mut builder = client.request(http_method(request.method), url);
        builder = if request.method.encodes_fields_in_query() {
            builder.query(&request.body.text_pairs())
        } else {
            builder.multipart(multipart_body(&request.body)?)
        };
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await.map_err(TransportError::from_reqwest)?;
        Ok(TransportResponse::from_reqwest(response))
    }
}

fn http_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Head => reqwest::Method::HEAD,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}

fn multipart_body(fields: &FormFields) -> Result<multipart::Form, TransportError> {
    let mut form = multipart::Form::new();
    for field in fields {
        form = match &field.value {
            FieldValue::Text { value } => form.text(field.name.clone(), value.clone()),
            FieldValue::File {
                filename,
                mime_type,
                bytes,
            } => {
                let mut part = multipart::Part::bytes(bytes.clone()).file_name(filename.clone());
                if let Some(mime_type) = mime_type {
                    part = part
                        .mime_str(mime_type)
                        .map_err(TransportError::from_reqwest)?;
                }
                form.part(field.name.clone(), part)
            }
        };
    }
    Ok(form)
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
