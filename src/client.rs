use std::fmt;
use std::time::Duration;

use reqwest::{header, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use crate::{
    endpoints::{self, ApiRequest, LinksOptions, MetadataOption, TopPagesOptions},
    error::{ApiError, RequestInfo},
    ClientOptions, MozscapeError, Result,
};

#[derive(Clone)]
/// HTTP client for the Mozscape API.
///
/// Credentials and options are fixed at construction. The client is cheap to
/// clone and can be shared between tasks.
pub struct MozscapeClient {
    http: reqwest::Client,
    access_id: String,
    secret_key: String,
    options: ClientOptions,
}

impl fmt::Debug for MozscapeClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MozscapeClient")
            .field("access_id", &self.access_id)
            .field("secret_key", &"<redacted>")
            .field("options", &self.options)
            .finish()
    }
}

impl MozscapeClient {
    /// Creates a client for the public API from an access id and secret key.
    pub fn new(access_id: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            access_id: access_id.into(),
            secret_key: secret_key.into(),
            options: ClientOptions::default(),
        }
    }

    /// Creates a client from environment variables.
    ///
    /// Reads:
    /// - `MOZSCAPE_ACCESS_ID`
    /// - `MOZSCAPE_SECRET_KEY`
    ///
    /// Returns an error if either variable is missing or empty.
    ///
    /// **Not available on `wasm32` targets.**
    ///
    /// # Example
    ///
    /// ```no_run
    /// use mozscape_http::MozscapeClient;
    ///
    /// let moz = MozscapeClient::from_env().expect("missing MOZSCAPE_* env vars");
    /// ```
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_env() -> std::result::Result<Self, String> {
        let access_id = std::env::var("MOZSCAPE_ACCESS_ID")
            .map_err(|_| "missing MOZSCAPE_ACCESS_ID environment variable".to_owned())?;
        let secret_key = std::env::var("MOZSCAPE_SECRET_KEY")
            .map_err(|_| "missing MOZSCAPE_SECRET_KEY environment variable".to_owned())?;
        if access_id.trim().is_empty() {
            return Err("MOZSCAPE_ACCESS_ID is set but empty".to_owned());
        }
        if secret_key.trim().is_empty() {
            return Err("MOZSCAPE_SECRET_KEY is set but empty".to_owned());
        }
        Ok(Self::new(access_id.trim(), secret_key.trim()))
    }

    /// Applies client options such as host, user agent and timeout.
    pub fn with_options(mut self, opts: ClientOptions) -> Self {
        self.options = opts;
        self
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    pub fn access_id(&self) -> &str {
        &self.access_id
    }

    /// Fetches URL metrics for `url`.
    ///
    /// Column names missing from [`crate::URL_METRICS_FLAGS`] are ignored.
    pub async fn url_metrics<I, S>(&self, url: &str, cols: I) -> Result<serde_json::Value>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.send(&endpoints::url_metrics(url, cols)).await
    }

    /// Fetches links pointing at `url`.
    pub async fn links(
        &self,
        url: &str,
        scope: &str,
        options: &LinksOptions,
    ) -> Result<serde_json::Value> {
        self.send(&endpoints::links(url, scope, options)).await
    }

    /// Fetches anchor text metrics, sorted by linking domains.
    pub async fn anchor_text<I, S>(
        &self,
        url: &str,
        scope: &str,
        cols: I,
    ) -> Result<serde_json::Value>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.send(&endpoints::anchor_text(url, scope, cols)).await
    }

    /// Fetches the top pages of the domain of `url`.
    pub async fn top_pages<I, S>(
        &self,
        url: &str,
        cols: I,
        options: &TopPagesOptions,
    ) -> Result<serde_json::Value>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.send(&endpoints::top_pages(url, cols, options)).await
    }

    /// Fetches index metadata.
    pub async fn metadata(&self, option: MetadataOption) -> Result<serde_json::Value> {
        self.send(&endpoints::metadata(option)).await
    }

    /// Builds the full request URL for `request`.
    ///
    /// `http://<host>/<base path>/<endpoint>/<resource>[?<params>]`, with the
    /// resource encoded as one path segment.
    pub fn request_url(&self, request: &ApiRequest) -> Result<Url> {
        let base = format!("http://{}/", self.options.host.trim_end_matches('/'));
        let mut url = Url::parse(&base)
            .map_err(|err| MozscapeError::InvalidUrl(format!("{base}: {err}")))?;

        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| MozscapeError::InvalidUrl(format!("{base}: cannot be a base")))?;
            segments.pop_if_empty();
            segments.extend(self.options.base_path.split('/').filter(|s| !s.is_empty()));
            segments.push(request.endpoint);
            segments.push(&request.resource);
        }

        request.params.append_to(&mut url);
        Ok(url)
    }

    /// Sends one authenticated GET and decodes the JSON body into `T`.
    ///
    /// Exactly one attempt is made. Any status other than `200 OK` becomes
    /// [`MozscapeError::Api`].
    pub async fn send<T: DeserializeOwned>(&self, request: &ApiRequest) -> Result<T> {
        let url = self.request_url(request)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(endpoint = request.endpoint, url = %url, "sending mozscape request");

        // On WASM, reqwest uses AbortController for the timeout.
        let http_request = self
            .http
            .get(url)
            .basic_auth(&self.access_id, Some(&self.secret_key))
            .header(header::USER_AGENT, &self.options.user_agent)
            .header(header::ACCEPT, "application/json")
            .timeout(Duration::from_millis(self.options.timeout_ms))
            .build()
            .map_err(MozscapeError::Transport)?;

        let request_info = request_info(&http_request);

        let response = match self.http.execute(http_request).await {
            Ok(response) => response,
            Err(err) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(endpoint = request.endpoint, error = %err, "mozscape transport error");
                return Err(MozscapeError::Transport(err));
            }
        };

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await.map_err(MozscapeError::Transport)?;

        if status != StatusCode::OK {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                endpoint = request.endpoint,
                status = status.as_u16(),
                "mozscape request failed"
            );
            return Err(ApiError::from_response(status.as_u16(), body, headers, request_info).into());
        }

        serde_json::from_str::<T>(&body).map_err(|err| {
            MozscapeError::Decode(format!("invalid response JSON: {err}; body: {body}"))
        })
    }
}

fn request_info(request: &reqwest::Request) -> RequestInfo {
    let mut headers = request.headers().clone();
    headers.remove(header::AUTHORIZATION);
    RequestInfo {
        method: request.method().clone(),
        uri: request.url().to_string(),
        headers,
    }
}
