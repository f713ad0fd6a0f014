//! Per-call request options.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::multipart;

use refetch_core::error::InvalidInputError;
use refetch_core::Result;

/// Options for a single pipeline call: extra headers and an optional body.
///
/// The pipeline merges `headers` over its own defaults
/// (`Authorization`, `Content-Type: application/json`), with these taking
/// precedence.
#[derive(Debug, Default)]
pub struct RequestOptions {
    pub headers: HeaderMap,
    pub body: Body,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a header, overriding the pipeline default of the same name.
    pub fn header(mut self, name: &str, value: &str) -> Result<Self> {
        let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
            InvalidInputError::Header {
                name: name.to_string(),
                reason: e.to_string(),
            }
        })?;
        let value = HeaderValue::from_str(value).map_err(|e| InvalidInputError::Header {
            name: name.to_string(),
            reason: e.to_string(),
        })?;
        self.headers.insert(name, value);
        Ok(self)
    }

    /// Attach a JSON body.
    pub fn json(mut self, value: serde_json::Value) -> Self {
        self.body = Body::Json(value);
        self
    }

    /// Attach a multipart body.
    ///
    /// The pipeline omits its `Content-Type` default for multipart bodies
    /// so the transport can set the boundary itself.
    pub fn multipart(mut self, parts: Vec<Part>) -> Self {
        self.body = Body::Multipart(parts);
        self
    }
}

/// Request body of a pipeline call.
///
/// Parts of a multipart body own their data, so the pipeline can rebuild
/// the body for the single retry after a token refresh.
#[derive(Debug, Default)]
pub enum Body {
    #[default]
    Empty,
    Json(serde_json::Value),
    Multipart(Vec<Part>),
}

/// One field of a multipart body.
#[derive(Debug)]
pub struct Part {
    pub(crate) name: String,
    pub(crate) value: PartValue,
}

#[derive(Debug)]
pub(crate) enum PartValue {
    Text(String),
    Bytes {
        data: Vec<u8>,
        filename: Option<String>,
        mime: Option<String>,
    },
}

impl Part {
    /// A plain text field.
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: PartValue::Text(value.into()),
        }
    }

    /// A binary field, e.g. a file upload.
    pub fn bytes(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            value: PartValue::Bytes {
                data,
                filename: None,
                mime: None,
            },
        }
    }

    /// Set the filename reported for a binary field.
    pub fn file_name(mut self, filename: impl Into<String>) -> Self {
        if let PartValue::Bytes {
            filename: slot, ..
        } = &mut self.value
        {
            *slot = Some(filename.into());
        }
        self
    }

    /// Set the MIME type reported for a binary field.
    pub fn mime(mut self, mime: impl Into<String>) -> Self {
        if let PartValue::Bytes { mime: slot, .. } = &mut self.value {
            *slot = Some(mime.into());
        }
        self
    }
}

/// Build a reqwest multipart form from owned parts.
///
/// Called once per dispatch, cloning part data, because a form is consumed
/// by the request it is attached to.
pub(crate) fn multipart_form(parts: &[Part]) -> Result<multipart::Form> {
    let mut form = multipart::Form::new();
    for part in parts {
        let built = match &part.value {
            PartValue::Text(text) => multipart::Part::text(text.clone()),
            PartValue::Bytes {
                data,
                filename,
                mime,
            } => {
                let mut built = multipart::Part::bytes(data.clone());
                if let Some(filename) = filename {
                    built = built.file_name(filename.clone());
                }
                if let Some(mime) = mime {
                    built = built.mime_str(mime).map_err(|e| InvalidInputError::Body {
                        reason: e.to_string(),
                    })?;
                }
                built
            }
        };
        form = form.part(part.name.clone(), built);
    }
    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_overrides_are_recorded() {
        let options = RequestOptions::new()
            .header("Content-Type", "text/plain")
            .unwrap();
        assert_eq!(
            options.headers.get("content-type").unwrap(),
            "text/plain"
        );
    }

    #[test]
    fn invalid_header_name_is_rejected() {
        assert!(RequestOptions::new().header("bad header", "x").is_err());
    }

    #[test]
    fn default_body_is_empty() {
        assert!(matches!(RequestOptions::new().body, Body::Empty));
    }
}
