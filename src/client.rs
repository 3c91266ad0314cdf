use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, LOCATION, USER_AGENT};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::auth::AuthStore;
use crate::cancel::CancelHandle;
use crate::config::load_config;
use crate::error::{Error, ResponseDetails, Result, classify};
use crate::request::{RequestConfig, ResolvedRequest, resolve};

/// A successful response.
///
/// In the default buffered mode `body` holds the parsed JSON payload. In
/// stream mode the body is not read: `body` is `None` and `raw` holds the
/// live [`reqwest::Response`] for the caller to consume.
#[derive(Debug)]
pub struct ResponseEnvelope {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Option<Value>,
    pub raw: Option<reqwest::Response>,
}

impl ResponseEnvelope {
    /// Deserialize the buffered body into a typed value.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        let body = self.body.as_ref().ok_or_else(|| Error::UnexpectedResponse {
            message: "response has no buffered body to decode".to_string(),
            details: ResponseDetails {
                status: self.status,
                headers: self.headers.clone(),
                body: None,
            },
        })?;
        serde_json::from_value(body.clone()).map_err(|e| Error::UnexpectedResponse {
            message: format!("failed to decode response body: {e}"),
            details: ResponseDetails {
                status: self.status,
                headers: self.headers.clone(),
                body: Some(body.clone()),
            },
        })
    }
}

/// Client for the Stratus imagery API.
///
/// Cheap to clone; clones share the HTTP connection pool and the credential
/// store.
#[derive(Debug, Clone)]
pub struct Client {
    base_url: Url,
    auth: Arc<AuthStore>,
    http: reqwest::Client,
    max_redirects: usize,
    timeout: Option<Duration>,
}

impl Client {
    /// Creates a client using environment variables and/or `.stratusrc`.
    ///
    /// This is equivalent to `Client::new(None, None, None)`.
    pub fn from_env() -> Result<Self> {
        Self::new(None, None, None)
    }

    /// Creates a client using (in order of precedence):
    /// - explicit `url`/`key` arguments
    /// - environment variables `STRATUS_API_URL` / `STRATUS_API_KEY`
    /// - config file from `STRATUS_RC` or `.stratusrc`
    /// - the public endpoint, for the URL
    pub fn new(url: Option<String>, key: Option<String>, verify: Option<bool>) -> Result<Self> {
        let cfg = load_config(url, key, verify)?;

        let base_url = Url::parse(&cfg.url)
            .map_err(|e| Error::Config(format!("invalid base URL {}: {e}", cfg.url)))?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("stratusapi-rs/{}", env!("CARGO_PKG_VERSION")))
                .unwrap_or(HeaderValue::from_static("stratusapi-rs")),
        );

        // Redirects are followed by the dispatcher, not the transport.
        let mut builder = reqwest::Client::builder()
            .default_headers(default_headers)
            .redirect(reqwest::redirect::Policy::none());

        if !cfg.verify {
            builder = builder.danger_accept_invalid_certs(true);
        }

        let http = builder
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))?;

        let auth = Arc::new(AuthStore::new());
        if let Some(key) = cfg.key {
            auth.set_key(key);
        }

        Ok(Self {
            base_url,
            auth,
            http,
            max_redirects: 5,
            timeout: None,
        })
    }

    /// Per-request timeout. None by default; timeouts are otherwise the
    /// caller's responsibility.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Cap on redirect hops followed per request (default 5).
    pub fn with_max_redirects(mut self, max_redirects: usize) -> Self {
        self.max_redirects = max_redirects;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The credential store requests read from.
    pub fn auth(&self) -> &AuthStore {
        &self.auth
    }

    /// Drop all stored credentials.
    pub fn logout(&self) {
        self.auth.clear();
    }

    /// Issue a request described by `config`.
    ///
    /// Settles exactly once: with a [`ResponseEnvelope`] on success or with
    /// one [`Error`] otherwise. If a terminator was registered and its
    /// [`CancelHandle`] fires before the request settles, the outcome is
    /// [`Error::Aborted`] even if the transport completes afterwards.
    pub async fn request(&self, config: impl Into<RequestConfig>) -> Result<ResponseEnvelope> {
        let mut config = config.into();
        let terminator = config.terminator.take();
        let stream = config.stream;
        let resolved = resolve(&config, &self.base_url, &self.auth);

        tracing::debug!(method = %resolved.method, url = %resolved.url, "dispatching request");

        let cancel = CancelHandle::new();
        if let Some(terminator) = terminator {
            terminator(cancel.clone());
        }

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(Error::Aborted),
            outcome = self.dispatch(resolved, stream) => outcome,
        };

        // The abort flag is authoritative: a cancelled request never
        // surfaces a late success.
        if cancel.is_cancelled() {
            tracing::debug!("request aborted");
            return Err(Error::Aborted);
        }
        outcome
    }

    /// Issue a GET request.
    pub async fn get(&self, config: impl Into<RequestConfig>) -> Result<ResponseEnvelope> {
        self.request(config.into().with_method(Method::GET)).await
    }

    /// Issue a POST request.
    pub async fn post(&self, config: impl Into<RequestConfig>) -> Result<ResponseEnvelope> {
        self.request(config.into().with_method(Method::POST)).await
    }

    /// Issue a PUT request.
    pub async fn put(&self, config: impl Into<RequestConfig>) -> Result<ResponseEnvelope> {
        self.request(config.into().with_method(Method::PUT)).await
    }

    /// Issue a DELETE request.
    pub async fn delete(&self, config: impl Into<RequestConfig>) -> Result<ResponseEnvelope> {
        self.request(config.into().with_method(Method::DELETE)).await
    }

    async fn dispatch(&self, resolved: ResolvedRequest, stream: bool) -> Result<ResponseEnvelope> {
        let ResolvedRequest {
            url,
            method,
            headers,
            body,
        } = resolved;

        let mut request = self.http.request(method, url.as_str()).headers(headers);
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }
        if let Some(body) = body {
            request = request.body(body);
        }

        let mut response = request.send().await?;

        // A 302 is followed with a bare GET of the location value, itself
        // subject to the same handling, up to the hop cap.
        let mut hops = 0usize;
        while response.status() == StatusCode::FOUND {
            if hops >= self.max_redirects {
                return Err(Error::UnexpectedResponse {
                    message: format!("redirect limit of {} exceeded", self.max_redirects),
                    details: ResponseDetails {
                        status: response.status(),
                        headers: response.headers().clone(),
                        body: None,
                    },
                });
            }

            let location = response
                .headers()
                .get(LOCATION)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
                .ok_or_else(|| Error::UnexpectedResponse {
                    message: "redirect response without a location header".to_string(),
                    details: ResponseDetails {
                        status: response.status(),
                        headers: response.headers().clone(),
                        body: None,
                    },
                })?;

            let target = match response.url().join(&location) {
                Ok(resolved) => resolved.to_string(),
                Err(_) => location,
            };

            tracing::debug!(location = %target, "following redirect");
            hops += 1;
            response = self.http.get(target.as_str()).send().await?;
        }

        let status = response.status();
        let headers = response.headers().clone();

        if stream {
            if let Some(err) = classify(status, &headers, None) {
                return Err(err);
            }
            return Ok(ResponseEnvelope {
                status,
                headers,
                body: None,
                raw: Some(response),
            });
        }

        let text = response.text().await?;
        match serde_json::from_str::<Value>(&text) {
            Ok(parsed) => match classify(status, &headers, Some(&parsed)) {
                Some(err) => Err(err),
                None => Ok(ResponseEnvelope {
                    status,
                    headers,
                    body: Some(parsed),
                    raw: None,
                }),
            },
            Err(_) => {
                if let Some(err) = classify(status, &headers, None) {
                    return Err(err);
                }
                // A response that claims success but has an unparseable body
                // is never treated as valid.
                Err(Error::UnexpectedResponse {
                    message: "trouble parsing response body as JSON".to_string(),
                    details: ResponseDetails {
                        status,
                        headers,
                        body: None,
                    },
                })
            }
        }
    }
}
