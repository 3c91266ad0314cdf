use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use serde_json::Value;
use thiserror::Error as ThisError;

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Metadata kept from a response that was classified as a failure.
#[derive(Debug, Clone)]
pub struct ResponseDetails {
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// Parsed JSON body, when the response carried one we could decode.
    pub body: Option<Value>,
}

/// Failures surfaced by the client.
///
/// Every request settles with either a [`crate::ResponseEnvelope`] or exactly
/// one of these variants. Variants derived from an HTTP response carry the
/// original status, headers, and parsed body (when available) for caller
/// inspection.
#[derive(Debug, ThisError)]
pub enum Error {
    /// The server rejected the request as malformed (HTTP 400).
    #[error("bad request")]
    BadRequest(ResponseDetails),

    /// Missing or invalid credentials (HTTP 401).
    #[error("unauthorized")]
    Unauthorized(ResponseDetails),

    /// Credentials were valid but access is denied (HTTP 403).
    #[error("forbidden")]
    Forbidden(ResponseDetails),

    /// Any other non-success response, a redirect that could not be
    /// followed, or a success response whose body was not valid JSON.
    #[error("{message}")]
    UnexpectedResponse {
        message: String,
        details: ResponseDetails,
    },

    /// The caller aborted the request before it settled.
    #[error("request aborted")]
    Aborted,

    /// A failure below the HTTP layer (DNS, connect, TLS, invalid URL).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Client construction failed; never produced by the request path.
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Response metadata, for variants that carry it.
    pub fn details(&self) -> Option<&ResponseDetails> {
        match self {
            Error::BadRequest(d) | Error::Unauthorized(d) | Error::Forbidden(d) => Some(d),
            Error::UnexpectedResponse { details, .. } => Some(details),
            _ => None,
        }
    }

    /// Status code of the response behind this failure, if any.
    pub fn status(&self) -> Option<StatusCode> {
        self.details().map(|d| d.status)
    }
}

/// Classify a response by status. Returns `None` for success (2xx).
///
/// The body is whatever JSON could be parsed out of the response; error
/// classification itself only looks at the status line.
pub(crate) fn classify(
    status: StatusCode,
    headers: &HeaderMap,
    body: Option<&Value>,
) -> Option<Error> {
    if status.is_success() {
        return None;
    }

    let details = ResponseDetails {
        status,
        headers: headers.clone(),
        body: body.cloned(),
    };

    Some(match status.as_u16() {
        400 => Error::BadRequest(details),
        401 => Error::Unauthorized(details),
        403 => Error::Forbidden(details),
        _ => Error::UnexpectedResponse {
            message: format!("unexpected response status: {}", status.as_u16()),
            details,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(code: u16) -> StatusCode {
        StatusCode::from_u16(code).unwrap()
    }

    #[test]
    fn maps_client_errors_to_dedicated_variants() {
        let headers = HeaderMap::new();
        let body = serde_json::json!({"message": "nope"});

        let err = classify(status(400), &headers, Some(&body)).expect("failure expected");
        assert!(matches!(err, Error::BadRequest(_)));
        assert_eq!(err.details().unwrap().body.as_ref(), Some(&body));

        let err = classify(status(401), &headers, Some(&body)).expect("failure expected");
        assert!(matches!(err, Error::Unauthorized(_)));
        assert_eq!(err.status(), Some(status(401)));

        let err = classify(status(403), &headers, Some(&body)).expect("failure expected");
        assert!(matches!(err, Error::Forbidden(_)));
    }

    #[test]
    fn maps_client_errors_with_null_body() {
        let headers = HeaderMap::new();
        let err = classify(status(401), &headers, None).expect("failure expected");
        assert!(matches!(err, Error::Unauthorized(ref d) if d.body.is_none()));
    }

    #[test]
    fn maps_other_non_success_to_unexpected_response() {
        let headers = HeaderMap::new();
        for code in [301u16, 404, 418, 500, 503] {
            let err = classify(status(code), &headers, None).expect("failure expected");
            match err {
                Error::UnexpectedResponse { message, details } => {
                    assert_eq!(details.status.as_u16(), code);
                    assert!(message.contains(&code.to_string()));
                }
                other => panic!("status {code} mapped to {other:?}"),
            }
        }
    }

    #[test]
    fn success_statuses_classify_as_none() {
        let headers = HeaderMap::new();
        for code in [200u16, 201, 204, 299] {
            assert!(classify(status(code), &headers, None).is_none());
        }
    }
}
