//! Base URL type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

use crate::error::{Error, InvalidInputError};

/// A validated base URL for the request pipeline.
///
/// The base URL is supplied once at pipeline construction. Relative request
/// targets are joined onto it; absolute `http(s)` targets pass through
/// unchanged.
///
/// URLs must use HTTPS (or HTTP for localhost) and have a host.
///
/// # Example
///
/// ```
/// use refetch_core::BaseUrl;
///
/// let base = BaseUrl::new("https://api.example.com").unwrap();
/// assert_eq!(base.join("v1/items"), "https://api.example.com/v1/items");
/// assert_eq!(base.join("/v1/items"), "https://api.example.com/v1/items");
/// assert_eq!(
///     base.join("https://other.example.com/x"),
///     "https://other.example.com/x"
/// );
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BaseUrl(Url);

impl BaseUrl {
    /// Create a new base URL from a string, validating the format.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is not valid or doesn't meet requirements.
    pub fn new(s: impl AsRef<str>) -> Result<Self, Error> {
        let s = s.as_ref();
        let url = Url::parse(s).map_err(|e| InvalidInputError::BaseUrl {
            value: s.to_string(),
            reason: e.to_string(),
        })?;

        Self::validate(&url, s)?;

        // Normalize: remove trailing slash
        let normalized = if url.path() == "/" {
            let mut u = url.clone();
            u.set_path("");
            u
        } else {
            url
        };

        Ok(Self(normalized))
    }

    /// Resolve a request target against this base.
    ///
    /// Absolute `http(s)` targets are returned unchanged; anything else is
    /// treated as a path and prefixed with the base URL.
    pub fn join(&self, target: &str) -> String {
        if target.starts_with("http://") || target.starts_with("https://") {
            return target.to_string();
        }
        // The URL crate always adds a trailing slash to root paths,
        // so trim before joining
        let base = self.0.as_str().trim_end_matches('/');
        format!("{}/{}", base, target.trim_start_matches('/'))
    }

    /// Returns the base URL as a string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the inner URL.
    pub fn as_url(&self) -> &Url {
        &self.0
    }

    /// Returns the host string.
    pub fn host(&self) -> Option<&str> {
        self.0.host_str()
    }

    fn validate(url: &Url, original: &str) -> Result<(), Error> {
        // Must be absolute
        if url.cannot_be_a_base() {
            return Err(InvalidInputError::BaseUrl {
                value: original.to_string(),
                reason: "must be an absolute URL".to_string(),
            }
            .into());
        }

        let scheme = url.scheme();

        // Must be HTTPS (or HTTP for localhost)
        let is_localhost = url
            .host_str()
            .is_some_and(|h| h == "localhost" || h == "127.0.0.1" || h == "::1");

        if scheme != "https" && !(scheme == "http" && is_localhost) {
            return Err(InvalidInputError::BaseUrl {
                value: original.to_string(),
                reason: "must use HTTPS (HTTP allowed only for localhost)".to_string(),
            }
            .into());
        }

        // Must have a host
        if url.host_str().is_none() {
            return Err(InvalidInputError::BaseUrl {
                value: original.to_string(),
                reason: "must have a host".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BaseUrl {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for BaseUrl {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.0.as_str())
    }
}

impl<'de> Deserialize<'de> for BaseUrl {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        BaseUrl::new(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_https() {
        let base = BaseUrl::new("https://api.example.com").unwrap();
        assert_eq!(base.host(), Some("api.example.com"));
    }

    #[test]
    fn accepts_http_localhost() {
        assert!(BaseUrl::new("http://localhost:8000").is_ok());
        assert!(BaseUrl::new("http://127.0.0.1:8000").is_ok());
    }

    #[test]
    fn rejects_http_non_localhost() {
        assert!(BaseUrl::new("http://api.example.com").is_err());
    }

    #[test]
    fn rejects_non_http_scheme() {
        assert!(BaseUrl::new("ftp://example.com").is_err());
        assert!(BaseUrl::new("not a url").is_err());
    }

    #[test]
    fn join_prefixes_relative_targets() {
        let base = BaseUrl::new("https://api.example.com").unwrap();
        assert_eq!(base.join("users/me/"), "https://api.example.com/users/me/");
        assert_eq!(base.join("/users/me/"), "https://api.example.com/users/me/");
    }

    #[test]
    fn join_passes_absolute_targets_through() {
        let base = BaseUrl::new("https://api.example.com").unwrap();
        assert_eq!(
            base.join("https://cdn.example.com/asset.png"),
            "https://cdn.example.com/asset.png"
        );
    }

    #[test]
    fn join_normalizes_trailing_slash() {
        let base = BaseUrl::new("https://api.example.com/").unwrap();
        assert_eq!(base.join("items"), "https://api.example.com/items");
    }
}
