use reqwest::{header::HeaderMap, Method};

/// Error type returned by this crate.
#[derive(Debug, thiserror::Error)]
pub enum MozscapeError {
    /// Network or request execution error from `reqwest`.
    #[error("transport error: {0}")]
    Transport(reqwest::Error),
    /// The API answered with a status other than `200 OK`.
    #[error("{0}")]
    Api(ApiError),
    /// A successful response body that could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),
    /// The configured host or base path does not form a valid request URL.
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    /// A caller-supplied argument the API does not accept.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl MozscapeError {
    /// Returns the API error details if this is an [`MozscapeError::Api`].
    pub fn as_api(&self) -> Option<&ApiError> {
        match self {
            Self::Api(err) => Some(err),
            _ => None,
        }
    }

    /// HTTP status of the failed response, if one was received.
    pub fn status(&self) -> Option<u16> {
        self.as_api().map(|err| err.status)
    }
}

impl From<ApiError> for MozscapeError {
    fn from(err: ApiError) -> Self {
        Self::Api(err)
    }
}

/// Non-200 response from the Mozscape API, kept with enough request context
/// to debug the call without repeating it.
#[derive(Clone, Debug, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    /// `error_message` from the response body, or a generic fallback.
    pub message: String,
    pub status: u16,
    /// Raw response body.
    pub body: String,
    /// Response headers.
    pub headers: HeaderMap,
    pub request: RequestInfo,
}

/// Method, URI and headers of the request that produced an [`ApiError`].
///
/// The `Authorization` header is never recorded.
#[derive(Clone, Debug)]
pub struct RequestInfo {
    pub method: Method,
    pub uri: String,
    pub headers: HeaderMap,
}

impl ApiError {
    pub(crate) fn from_response(
        status: u16,
        body: String,
        headers: HeaderMap,
        request: RequestInfo,
    ) -> Self {
        let message =
            error_message(&body).unwrap_or_else(|| format!("http error {status}: {body}"));
        Self {
            message,
            status,
            body,
            headers,
            request,
        }
    }

    /// Parses the raw body as JSON, if it is JSON.
    pub fn json_body(&self) -> Option<serde_json::Value> {
        serde_json::from_str(&self.body).ok()
    }
}

fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("error_message")?
        .as_str()
        .map(str::to_owned)
}
