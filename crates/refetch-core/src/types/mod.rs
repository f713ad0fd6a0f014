//! Validated configuration types.

mod base_url;

pub use base_url::BaseUrl;
