use crate::auth::apply_token;
use crate::client::Config;
use crate::error::{Error, Result};
use crate::options::CallOptions;
use crate::params::{encode, ParamMap, ToParams};
use crate::response::Response;
use crate::transport::{HttpRequest, ReqwestTransport, Transport};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, USER_AGENT};
use reqwest::Method;
use std::sync::Arc;
use std::time::Instant;
use url::Url;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Client for the Elastic Email API.
///
/// Holds the validated [`Config`], the [`Transport`] and a set of default
/// headers. Default headers may only be changed through
/// [`headers_mut`](Client::headers_mut) while the client is still uniquely
/// owned; once it is shared (`&Client`, `Arc<Client>`) it is read-only and
/// every call computes its own header set.
#[derive(Clone)]
pub struct Client {
    config: Config,
    transport: Arc<dyn Transport>,
    headers: HeaderMap,
}

impl Client {
    /// Create a client using the default HTTP transport
    pub fn new(config: Config) -> Result<Self> {
        Self::with_transport(config, ReqwestTransport::new()?)
    }

    /// Create a client that sends everything through `transport`
    pub fn with_transport(config: Config, transport: impl Transport + 'static) -> Result<Self> {
        Ok(Client {
            config: config.validate()?,
            transport: Arc::new(transport),
            headers: HeaderMap::new(),
        })
    }

    /// The validated configuration this client was built with
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Default headers sent with every call
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Change the default headers. Only possible while the client is not
    /// yet shared.
    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// Send a GET request, parameters in the query string
    pub fn get<P>(&self, path: &str, params: P, opts: &CallOptions) -> Response
    where
        P: ToParams,
    {
        self.request(Method::GET, path, params, opts)
    }

    /// Send a POST request, parameters in a form-encoded body
    pub fn post<P>(&self, path: &str, params: P, opts: &CallOptions) -> Response
    where
        P: ToParams,
    {
        self.request(Method::POST, path, params, opts)
    }

    /// Execute an API call and return its parsed outcome.
    ///
    /// Never fails outright: every error, from building the request to
    /// decoding the reply, is reported through the returned [`Response`].
    pub fn request<P>(&self, method: Method, path: &str, params: P, opts: &CallOptions) -> Response
    where
        P: ToParams,
    {
        let request = match self.build_request(method.clone(), path, params.to_params(), opts) {
            Ok(request) => request,
            Err(err) => {
                tracing::debug!(method = %method, path, error = %err, "could not build request");
                return Response::failed(err);
            }
        };

        if opts.is_cancelled() {
            tracing::debug!(method = %method, path, "call cancelled before dispatch");
            return Response::failed(Error::Cancelled);
        }

        let start = Instant::now();
        let raw = self.transport.execute(request, opts.cancel.as_ref());
        if let Err(ref err) = raw {
            tracing::warn!(method = %method, path, error = %err, "request failed");
        }

        let response = Response::parse(raw);
        tracing::debug!(
            method = %method,
            path,
            status = ?response.status(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            success = response.is_success(),
            "api call finished"
        );
        if let Some(err) = response.error().filter(|e| !e.is_api()) {
            tracing::debug!(path, error = %err, "response not usable");
        }
        response
    }

    /// Assemble the request for one call without sending it.
    ///
    /// The URL is `{base}/v{version}/{path}`. GET puts every parameter,
    /// the API key included, in the query string; POST puts them in a
    /// form-encoded body and leaves the URL bare. Headers are layered
    /// runtime defaults, then client defaults, then per-call overrides,
    /// each layer replacing same-named headers of the one before. The form
    /// content type is only sent when there is a body.
    pub fn build_request(
        &self,
        method: Method,
        path: &str,
        mut params: ParamMap,
        opts: &CallOptions,
    ) -> Result<HttpRequest> {
        let path = path.trim_start_matches('/');
        if path.is_empty() {
            return Err(Error::build("empty endpoint path"));
        }
        if path.contains(['?', '#']) {
            return Err(Error::build(format!("endpoint path {:?} must not carry a query", path)));
        }
        if path.split('/').any(is_dot_segment) {
            return Err(Error::build(format!("endpoint path {:?} must not contain dot segments", path)));
        }

        apply_token(&mut params, opts.api_key.as_deref(), &self.config.api_key);

        let mut url = Url::parse(&format!("{}/{}", self.config.versioned_url(), path))?;
        let mut headers = HeaderMap::new();
        let user_agent = format!(
            "elasticemail-rust/{} (API v{})",
            env!("CARGO_PKG_VERSION"),
            self.config.api_version
        );
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&user_agent)
                .map_err(|e| Error::build(format!("invalid user agent: {}", e)))?,
        );

        let body = match method {
            Method::GET => {
                url.set_query(Some(&encode(&params)));
                None
            }
            Method::POST => Some(encode(&params)),
            other => {
                return Err(Error::build(format!("unsupported HTTP method: {}", other)));
            }
        };

        overlay_headers(&mut headers, &self.headers);
        match body {
            Some(_) => {
                headers.insert(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE));
            }
            None => {
                headers.remove(CONTENT_TYPE);
            }
        }
        overlay_headers(&mut headers, &opts.headers);
        for name in &opts.remove_headers {
            headers.remove(name);
        }

        Ok(HttpRequest {
            method,
            url,
            headers,
            body,
        })
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.config)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

/// `.` or `..`, plain or percent-encoded; the URL parser would resolve them
fn is_dot_segment(segment: &str) -> bool {
    let decoded = segment.to_ascii_lowercase().replace("%2e", ".");
    decoded == "." || decoded == ".."
}

/// Replace every header named in `overrides`, keeping all of its values
fn overlay_headers(target: &mut HeaderMap, overrides: &HeaderMap) {
    for name in overrides.keys() {
        target.remove(name);
        for value in overrides.get_all(name) {
            target.append(name.clone(), value.clone());
        }
    }
}
