//! `mozscape-http` is an async HTTP client for the Mozscape SEO metrics API.
//!
//! The crate wraps the read-only endpoints with one method each:
//! - [`MozscapeClient::url_metrics`]
//! - [`MozscapeClient::links`]
//! - [`MozscapeClient::anchor_text`]
//! - [`MozscapeClient::top_pages`]
//! - [`MozscapeClient::metadata`]
//!
//! Columns are selected by name and translated into the numeric bit fields
//! the API expects through the tables in [`flags`]. Names a table does not
//! know are dropped silently; check them with [`FlagTable::unknown`] first
//! if that matters.
//!
//! ```no_run
//! # async fn run() -> mozscape_http::Result<()> {
//! use mozscape_http::MozscapeClient;
//!
//! let moz = MozscapeClient::new("member-xxxxxxxxxx", "secret");
//! let metrics = moz
//!     .url_metrics("moz.com/blog", ["title", "page_authority", "domain_authority"])
//!     .await?;
//! println!("{metrics}");
//! # Ok(())
//! # }
//! ```

mod client;
pub mod endpoints;
mod error;
pub mod flags;
mod options;
mod params;

pub use client::MozscapeClient;
pub use endpoints::{ApiRequest, LinksOptions, MetadataOption, TopPagesOptions};
pub use error::{ApiError, MozscapeError, RequestInfo};
pub use flags::{
    translate_bitfield, FlagTable, ANCHOR_TEXT_FLAGS, LINK_FLAGS, URL_METRICS_FLAGS,
};
pub use options::{ClientOptions, DEFAULT_BASE_PATH, DEFAULT_HOST, DEFAULT_USER_AGENT};
pub use params::{ParamValue, QueryParams};

pub type Result<T> = std::result::Result<T, MozscapeError>;
