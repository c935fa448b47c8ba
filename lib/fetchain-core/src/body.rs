//! Request body payloads and serialization helpers.
//!
//! The pipeline never interprets a [`Body`]; encoding it is the business of
//! the middleware that set it and of the transport that sends it.

use bytes::Bytes;

use crate::{Form, Result};

/// Content type for request bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    /// JSON content type (`application/json`).
    Json,
    /// Form URL-encoded content type (`application/x-www-form-urlencoded`).
    FormUrlEncoded,
    /// Plain text content type (`text/plain`).
    PlainText,
    /// Binary content type (`application/octet-stream`).
    OctetStream,
}

impl ContentType {
    /// Get the MIME type string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::FormUrlEncoded => "application/x-www-form-urlencoded",
            Self::PlainText => "text/plain",
            Self::OctetStream => "application/octet-stream",
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Request payload carried by a [`Context`](crate::Context).
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// Already encoded bytes.
    Bytes(Bytes),
    /// Multipart form, encoded by the transport.
    Multipart(Form),
}

impl Body {
    /// The raw bytes, if this is not a multipart body.
    #[must_use]
    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Self::Bytes(bytes) => Some(bytes),
            Self::Multipart(_) => None,
        }
    }

    /// The multipart form, if any.
    #[must_use]
    pub fn as_multipart(&self) -> Option<&Form> {
        match self {
            Self::Multipart(form) => Some(form),
            Self::Bytes(_) => None,
        }
    }

    /// Encode into bytes plus the content type implied by the payload.
    ///
    /// Only multipart bodies imply a content type (their boundary).
    #[must_use]
    pub fn into_bytes(self) -> (Option<String>, Bytes) {
        match self {
            Self::Bytes(bytes) => (None, bytes),
            Self::Multipart(form) => {
                let (content_type, bytes) = form.into_body();
                (Some(content_type), bytes)
            }
        }
    }
}

impl From<Bytes> for Body {
    fn from(bytes: Bytes) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Self::Bytes(Bytes::from(text))
    }
}

impl From<&'static str> for Body {
    fn from(text: &'static str) -> Self {
        Self::Bytes(Bytes::from_static(text.as_bytes()))
    }
}

impl From<Form> for Body {
    fn from(form: Form) -> Self {
        Self::Multipart(form)
    }
}

/// Serialize a value to JSON bytes.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
///
/// # Example
///
/// ```
/// use fetchain_core::to_json;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Greeting { hello: String }
///
/// let greeting = Greeting { hello: "world".to_string() };
/// let bytes = to_json(&greeting).expect("serialize");
/// assert_eq!(bytes.as_ref(), br#"{"hello":"world"}"#);
/// ```
pub fn to_json<T: serde::Serialize>(value: &T) -> Result<Bytes> {
    serde_json::to_vec(value)
        .map(Bytes::from)
        .map_err(Into::into)
}

/// Serialize a value to form URL-encoded bytes.
///
/// Uses `serde_html_form`, which supports `Vec<T>` for repeated fields
/// (e.g., `tags=a&tags=b&tags=c`).
///
/// # Errors
///
/// Returns an error if form serialization fails.
pub fn to_form<T: serde::Serialize>(value: &T) -> Result<Bytes> {
    serde_html_form::to_string(value)
        .map(|s| Bytes::from(s.into_bytes()))
        .map_err(Into::into)
}

/// Deserialize JSON bytes to a value with path-aware error messages.
///
/// # Errors
///
/// Returns an error if JSON deserialization fails, with the error message
/// including the path to the problematic field (e.g., "user.address.city").
pub fn from_json<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let mut deserializer = serde_json::Deserializer::from_slice(bytes);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|e| {
        crate::Error::json_deserialization(e.path().to_string(), e.inner().to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_type_as_str() {
        assert_eq!(ContentType::Json.as_str(), "application/json");
        assert_eq!(
            ContentType::FormUrlEncoded.to_string(),
            "application/x-www-form-urlencoded"
        );
    }

    #[test]
    fn bytes_body_has_no_implied_content_type() {
        let body = Body::from("hello");
        assert_eq!(body.as_bytes().map(Bytes::as_ref), Some(&b"hello"[..]));
        assert!(body.as_multipart().is_none());

        let (content_type, bytes) = body.into_bytes();
        assert!(content_type.is_none());
        assert_eq!(bytes.as_ref(), b"hello");
    }

    #[test]
    fn multipart_body_implies_boundary() {
        let body = Body::from(Form::with_boundary("xyz").text("a", "1"));
        let (content_type, bytes) = body.into_bytes();
        assert_eq!(
            content_type.as_deref(),
            Some("multipart/form-data; boundary=xyz")
        );
        assert!(bytes.starts_with(b"--xyz\r\n"));
    }

    #[test]
    fn to_form_with_vec() {
        #[derive(serde::Serialize)]
        struct Search {
            q: String,
            tags: Vec<String>,
        }

        let search = Search {
            q: "rust lang".to_string(),
            tags: vec!["a".to_string(), "b".to_string()],
        };
        let bytes = to_form(&search).expect("serialize");
        assert_eq!(bytes.as_ref(), b"q=rust+lang&tags=a&tags=b");
    }

    #[test]
    fn from_json_missing_field_error_with_path() {
        #[derive(Debug, serde::Deserialize)]
        struct Address {
            #[allow(dead_code)]
            city: String,
        }

        #[derive(Debug, serde::Deserialize)]
        struct User {
            #[allow(dead_code)]
            address: Address,
        }

        let result: Result<User> = from_json(br#"{"address":{}}"#);
        let msg = result.expect_err("should fail").to_string();
        assert!(msg.contains("address"), "missing path in: {msg}");
        assert!(msg.contains("city"), "missing field in: {msg}");
    }
}
