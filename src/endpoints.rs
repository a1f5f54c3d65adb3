//! Pure request builders, one per API endpoint.
//!
//! Each builder turns call arguments into an [`ApiRequest`]: the endpoint
//! name, the resource it applies to and the query parameters. Nothing here
//! touches the network; [`crate::MozscapeClient`] sends the result.

use std::{fmt, str::FromStr};

use crate::{
    flags::{ANCHOR_TEXT_FLAGS, LINK_FLAGS, URL_METRICS_FLAGS},
    MozscapeError, QueryParams,
};

/// Sort order sent with every anchor text request.
pub const ANCHOR_TEXT_SORT: &str = "domains_linking_page";
pub const DEFAULT_TOP_PAGES_OFFSET: u64 = 0;
pub const DEFAULT_TOP_PAGES_LIMIT: u64 = 1000;

/// One endpoint call, ready to be sent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiRequest {
    /// Endpoint name, e.g. `url-metrics`.
    pub endpoint: &'static str,
    /// Target URL or metadata keyword. Sent as a single encoded path segment.
    pub resource: String,
    pub params: QueryParams,
}

impl ApiRequest {
    pub fn new(endpoint: &'static str, resource: impl Into<String>, params: QueryParams) -> Self {
        Self {
            endpoint,
            resource: resource.into(),
            params,
        }
    }

    /// Unencoded `endpoint/resource` path, for logs and diagnostics.
    pub fn path(&self) -> String {
        format!("{}/{}", self.endpoint, self.resource)
    }
}

/// Optional parameters for the links endpoint.
///
/// Fields left as `None` are omitted from the request entirely.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LinksOptions {
    pub sort: Option<String>,
    /// Filter terms, sent joined with `+`.
    pub filter: Option<Vec<String>>,
    /// URL metrics columns for the link target.
    pub target_cols: Option<Vec<String>>,
    /// URL metrics columns for the link source.
    pub source_cols: Option<Vec<String>>,
    pub link_cols: Option<Vec<String>>,
}

impl LinksOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    pub fn filter<I, S>(mut self, filter: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filter = Some(collect_strings(filter));
        self
    }

    pub fn target_cols<I, S>(mut self, cols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.target_cols = Some(collect_strings(cols));
        self
    }

    pub fn source_cols<I, S>(mut self, cols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.source_cols = Some(collect_strings(cols));
        self
    }

    pub fn link_cols<I, S>(mut self, cols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.link_cols = Some(collect_strings(cols));
        self
    }
}

/// Paging for the top pages endpoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TopPagesOptions {
    /// Defaults to [`DEFAULT_TOP_PAGES_OFFSET`].
    pub offset: Option<u64>,
    /// Defaults to [`DEFAULT_TOP_PAGES_LIMIT`].
    pub limit: Option<u64>,
}

impl TopPagesOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Index metadata that can be queried.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MetadataOption {
    LastUpdate,
    NextUpdate,
    IndexStatus,
}

impl MetadataOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LastUpdate => "last_update",
            Self::NextUpdate => "next_update",
            Self::IndexStatus => "index_status",
        }
    }
}

impl fmt::Display for MetadataOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetadataOption {
    type Err = MozscapeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "last_update" => Ok(Self::LastUpdate),
            "next_update" => Ok(Self::NextUpdate),
            "index_status" => Ok(Self::IndexStatus),
            other => Err(MozscapeError::InvalidArgument(format!(
                "unknown metadata option '{other}'"
            ))),
        }
    }
}

/// `url-metrics/<url>` with `Cols`.
pub fn url_metrics<I, S>(url: &str, cols: I) -> ApiRequest
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let params = QueryParams::new().with("Cols", URL_METRICS_FLAGS.bitmask(cols));
    ApiRequest::new("url-metrics", url, params)
}

/// `links/<url>` with `Scope` plus whichever [`LinksOptions`] fields are set.
pub fn links(url: &str, scope: &str, options: &LinksOptions) -> ApiRequest {
    let mut params = QueryParams::new().with("Scope", scope);

    if let Some(sort) = &options.sort {
        params.push("Sort", sort.as_str());
    }
    if let Some(filter) = &options.filter {
        params.push("Filter", filter.join("+"));
    }
    if let Some(cols) = &options.target_cols {
        params.push("TargetCols", URL_METRICS_FLAGS.bitmask(cols));
    }
    if let Some(cols) = &options.source_cols {
        params.push("SourceCols", URL_METRICS_FLAGS.bitmask(cols));
    }
    if let Some(cols) = &options.link_cols {
        params.push("LinkCols", LINK_FLAGS.bitmask(cols));
    }

    ApiRequest::new("links", url, params)
}

/// `anchor-text/<url>` with `Scope`, `Cols` and the fixed `Sort`.
pub fn anchor_text<I, S>(url: &str, scope: &str, cols: I) -> ApiRequest
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let params = QueryParams::new()
        .with("Scope", scope)
        .with("Cols", ANCHOR_TEXT_FLAGS.bitmask(cols))
        .with("Sort", ANCHOR_TEXT_SORT);
    ApiRequest::new("anchor-text", url, params)
}

/// `top-pages/<url>` with `Cols`, `Offset` and `Limit`.
pub fn top_pages<I, S>(url: &str, cols: I, options: &TopPagesOptions) -> ApiRequest
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let params = QueryParams::new()
        .with("Cols", URL_METRICS_FLAGS.bitmask(cols))
        .with("Offset", options.offset.unwrap_or(DEFAULT_TOP_PAGES_OFFSET))
        .with("Limit", options.limit.unwrap_or(DEFAULT_TOP_PAGES_LIMIT));
    ApiRequest::new("top-pages", url, params)
}

/// `metadata/<option>` without parameters.
pub fn metadata(option: MetadataOption) -> ApiRequest {
    ApiRequest::new("metadata", option.as_str(), QueryParams::new())
}

fn collect_strings<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    values.into_iter().map(Into::into).collect()
}
