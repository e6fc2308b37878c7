use crate::client::create_http_client;
use crate::error::{Error, Result};
use crate::options::CancelToken;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method, StatusCode};
use std::io::{Cursor, Read};
use std::sync::Arc;
use tokio::runtime::Runtime;
use url::Url;

/// A fully formed request, ready to be sent.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    /// Form-encoded body, only for POST
    pub body: Option<String>,
}

/// What came back from the server, body not yet read.
pub struct RawResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Box<dyn Read + Send>,
}

impl RawResponse {
    pub fn new(status: StatusCode, headers: HeaderMap, body: impl Read + Send + 'static) -> Self {
        RawResponse {
            status,
            headers,
            body: Box::new(body),
        }
    }

    /// Build a response from an in-memory body with the given content type
    pub fn from_bytes(status: StatusCode, content_type: &str, body: impl Into<Vec<u8>>) -> Self {
        let mut headers = HeaderMap::new();
        if let Ok(value) = HeaderValue::from_str(content_type) {
            headers.insert(CONTENT_TYPE, value);
        }
        RawResponse::new(status, headers, Cursor::new(body.into()))
    }

    /// Declared content type, if any and if it is valid text
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok())
    }
}

impl std::fmt::Debug for RawResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .field("body", &"<stream>")
            .finish()
    }
}

/// Sends requests. One network call per `execute`, no retries.
///
/// Implementations must be safe to share between threads; a single instance
/// serves every call made through a [`Client`](crate::Client).
pub trait Transport: Send + Sync {
    fn execute(&self, request: HttpRequest, cancel: Option<&CancelToken>) -> Result<RawResponse>;
}

/// [`Transport`] backed by reqwest.
///
/// Each call blocks the calling thread on a small internal runtime until the
/// reply has been received and its body fully read. With a [`CancelToken`],
/// the whole exchange, body included, is raced against the token; when the
/// token wins the in-flight request is dropped, which closes its connection.
///
/// Like any blocking client it must not be used from inside an async runtime.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    runtime: Arc<Runtime>,
}

impl ReqwestTransport {
    /// Create a transport around the default HTTP client
    pub fn new() -> Result<Self> {
        Self::with_client(create_http_client()?)
    }

    /// Use a preconfigured reqwest client
    pub fn with_client(client: Client) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("elasticemail-io")
            .enable_all()
            .build()
            .map_err(|e| Error::Configuration(format!("failed to start I/O runtime: {}", e)))?;
        Ok(ReqwestTransport {
            client,
            runtime: Arc::new(runtime),
        })
    }
}

impl Transport for ReqwestTransport {
    fn execute(&self, request: HttpRequest, cancel: Option<&CancelToken>) -> Result<RawResponse> {
        let fetch = fetch(&self.client, request);
        match cancel {
            None => self.runtime.block_on(fetch),
            Some(cancel) => self.runtime.block_on(async {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => Err(Error::Cancelled),
                    result = fetch => result,
                }
            }),
        }
    }
}

/// Send the request and read the whole body
async fn fetch(client: &Client, request: HttpRequest) -> Result<RawResponse> {
    let mut builder = client
        .request(request.method, request.url)
        .headers(request.headers);
    if let Some(body) = request.body {
        builder = builder.body(body);
    }

    let response = builder.send().await.map_err(Error::transport)?;
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.bytes().await.map_err(Error::transport)?;

    Ok(RawResponse::new(status, headers, Cursor::new(body.to_vec())))
}
