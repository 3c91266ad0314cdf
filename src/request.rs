use reqwest::Method;
use reqwest::header::{
    ACCEPT, AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue,
};
use serde_json::Value;
use url::Url;

use crate::auth::AuthStore;
use crate::cancel::CancelHandle;
use crate::multipart;

/// A text file to upload as a `multipart/form-data` body.
///
/// Contents are text only; binary uploads are not supported.
#[derive(Debug, Clone)]
pub struct FilePayload {
    pub name: String,
    pub contents: String,
}

impl FilePayload {
    pub fn new(name: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            contents: contents.into(),
        }
    }
}

/// Request body. A request carries at most one of the two encodings.
#[derive(Debug, Clone, Default)]
pub(crate) enum Body {
    #[default]
    Empty,
    Json(Value),
    File(FilePayload),
}

pub(crate) type Terminator = Box<dyn FnOnce(CancelHandle) + Send>;

/// Description of a single API request.
///
/// Built with the `with_*` methods and handed to [`crate::Client::request`]
/// (or the verb shorthands). A bare URL converts into a GET config:
///
/// ```no_run
/// # use stratusapi::RequestConfig;
/// let config = RequestConfig::from("v0/scenes/ortho/");
/// ```
pub struct RequestConfig {
    pub(crate) url: String,
    pub(crate) method: Method,
    pub(crate) query: Vec<(String, String)>,
    pub(crate) body: Body,
    pub(crate) headers: HeaderMap,
    pub(crate) with_credentials: bool,
    pub(crate) stream: bool,
    pub(crate) terminator: Option<Terminator>,
}

impl RequestConfig {
    /// A GET request for `url`, resolved against the client's base URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: Method::GET,
            query: Vec::new(),
            body: Body::Empty,
            headers: HeaderMap::new(),
            with_credentials: true,
            stream: false,
            terminator: None,
        }
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Append query parameters. They are merged into any query string already
    /// present in the URL; on key collision these values win.
    pub fn with_query<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.query
            .extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn with_query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Use a JSON body. Replaces any previously set body.
    pub fn with_json(mut self, body: Value) -> Self {
        self.body = Body::Json(body);
        self
    }

    /// Upload a file as a multipart body. Replaces any previously set body.
    pub fn with_file(mut self, file: FilePayload) -> Self {
        self.body = Body::File(file);
        self
    }

    /// Set a header. Header names are case-insensitive; the last write wins,
    /// and explicit headers take precedence over automatically attached
    /// credentials.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Whether to attach stored credentials as an `authorization` header.
    /// Defaults to `true`.
    pub fn with_credentials(mut self, with_credentials: bool) -> Self {
        self.with_credentials = with_credentials;
        self
    }

    /// Resolve with the raw response handle instead of a buffered JSON body.
    pub fn with_stream(mut self, stream: bool) -> Self {
        self.stream = stream;
        self
    }

    /// Register a cancellation hook. The callback runs before dispatch and
    /// receives a [`CancelHandle`]; calling [`CancelHandle::cancel`] makes the
    /// request settle with [`crate::Error::Aborted`].
    pub fn with_terminator(mut self, terminator: impl FnOnce(CancelHandle) + Send + 'static) -> Self {
        self.terminator = Some(Box::new(terminator));
        self
    }
}

impl From<&str> for RequestConfig {
    fn from(url: &str) -> Self {
        RequestConfig::new(url)
    }
}

impl From<String> for RequestConfig {
    fn from(url: String) -> Self {
        RequestConfig::new(url)
    }
}

impl std::fmt::Debug for RequestConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestConfig")
            .field("url", &self.url)
            .field("method", &self.method)
            .field("query", &self.query)
            .field("body", &self.body)
            .field("headers", &self.headers)
            .field("with_credentials", &self.with_credentials)
            .field("stream", &self.stream)
            .field("terminator", &self.terminator.is_some())
            .finish()
    }
}

/// A fully normalized request, ready for dispatch.
#[derive(Debug, Clone)]
pub(crate) struct ResolvedRequest {
    pub(crate) url: String,
    pub(crate) method: Method,
    pub(crate) headers: HeaderMap,
    pub(crate) body: Option<String>,
}

/// Normalize a request config against a base URL and credential store.
///
/// This step only assembles data and never fails: a URL that does not parse
/// is passed through verbatim so the transport reports it as the failure.
pub(crate) fn resolve(config: &RequestConfig, base: &Url, auth: &AuthStore) -> ResolvedRequest {
    let url = match base.join(&config.url) {
        Ok(mut resolved) => {
            merge_query(&mut resolved, &config.query);
            resolved.to_string()
        }
        Err(_) => config.url.clone(),
    };

    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    for (name, value) in config.headers.iter() {
        headers.insert(name, value.clone());
    }

    // Body headers are forced after the caller's: they must describe the
    // encoded body.
    let body = match &config.body {
        Body::Empty => None,
        Body::Json(value) => {
            let encoded = value.to_string();
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            headers.insert(CONTENT_LENGTH, HeaderValue::from(encoded.len() as u64));
            Some(encoded)
        }
        Body::File(file) => {
            let boundary = multipart::generate_boundary();
            let encoded = multipart::encode(file, &boundary);
            let content_type = format!("multipart/form-data; boundary={boundary}");
            headers.insert(
                CONTENT_TYPE,
                HeaderValue::from_str(&content_type)
                    .unwrap_or(HeaderValue::from_static("multipart/form-data")),
            );
            headers.insert(CONTENT_LENGTH, HeaderValue::from(encoded.len() as u64));
            Some(encoded)
        }
    };

    // Credentials never overwrite an authorization header the caller set.
    if config.with_credentials && !headers.contains_key(AUTHORIZATION) {
        let credential = match (auth.token(), auth.key()) {
            (Some(token), _) => Some(format!("Bearer {token}")),
            (None, Some(key)) => Some(format!("api-key {key}")),
            (None, None) => None,
        };
        if let Some(credential) = credential {
            if let Ok(value) = HeaderValue::from_str(&credential) {
                headers.insert(AUTHORIZATION, value);
            }
        }
    }

    ResolvedRequest {
        url,
        method: config.method.clone(),
        headers,
        body,
    }
}

/// Merge config query pairs into a URL's query string. Pairs from the config
/// win on key collision; surviving URL pairs keep their original order.
fn merge_query(url: &mut Url, pairs: &[(String, String)]) {
    if pairs.is_empty() {
        return;
    }

    let mut merged: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| !pairs.iter().any(|(key, _)| key == k))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    merged.extend(pairs.iter().cloned());

    url.set_query(None);
    url.query_pairs_mut().extend_pairs(merged);
}
