//! HTTP request builder.

use crate::FetchError;
use serde::Serialize;
use std::collections::HashMap;
use url::Url;

/// HTTP methods used by the store API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    /// Convert to HTTP method string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }

    /// Whether repeating the request has the same effect as sending it once.
    pub fn is_idempotent(&self) -> bool {
        matches!(self, Method::Get | Method::Put | Method::Delete)
    }

    /// Convert to the `http` crate's method type.
    pub fn to_http(&self) -> http::Method {
        match self {
            Method::Get => http::Method::GET,
            Method::Post => http::Method::POST,
            Method::Put => http::Method::PUT,
            Method::Patch => http::Method::PATCH,
            Method::Delete => http::Method::DELETE,
        }
    }
}

/// A builder for constructing HTTP requests.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestBuilder {
    pub(crate) method: Method,
    pub(crate) url: Url,
    pub(crate) headers: HashMap<String, String>,
    pub(crate) body: Option<Vec<u8>>,
}

impl RequestBuilder {
    /// Create a new request builder.
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HashMap::new(),
            body: None,
        }
    }

    /// Parse a URL and create a request builder.
    pub fn parse(method: Method, url: &str) -> Result<Self, FetchError> {
        Ok(Self::new(method, Url::parse(url)?))
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// URL path, without query.
    pub fn path(&self) -> &str {
        self.url.path()
    }

    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Get a header value, case-insensitively.
    pub fn header_value(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    /// Parse the body as JSON.
    pub fn body_json<T: serde::de::DeserializeOwned>(&self) -> Option<T> {
        self.body
            .as_deref()
            .and_then(|b| serde_json::from_slice(b).ok())
    }

    /// Add a header to the request.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Append query parameters.
    pub fn query<K: AsRef<str>, V: AsRef<str>>(mut self, params: &[(K, V)]) -> Self {
        if !params.is_empty() {
            let mut pairs = self.url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k.as_ref(), v.as_ref());
            }
        }
        self
    }

    /// Set the request body as JSON.
    pub fn json<T: Serialize>(mut self, value: &T) -> Result<Self, FetchError> {
        let json = serde_json::to_vec(value)?;
        self.headers
            .insert("Content-Type".to_string(), "application/json".to_string());
        self.body = Some(json);
        Ok(self)
    }

    /// Add a bearer token authorization header.
    pub fn bearer_auth(self, token: impl AsRef<str>) -> Self {
        self.header("Authorization", format!("Bearer {}", token.as_ref()))
    }

    /// Set the Accept header.
    pub fn accept(self, content_type: impl Into<String>) -> Self {
        self.header("Accept", content_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idempotent_methods() {
        assert!(Method::Get.is_idempotent());
        assert!(Method::Put.is_idempotent());
        assert!(Method::Delete.is_idempotent());
        assert!(!Method::Post.is_idempotent());
        assert!(!Method::Patch.is_idempotent());
    }

    #[test]
    fn test_query_params_are_encoded() {
        let req = RequestBuilder::parse(Method::Get, "https://api.example.com/api/products")
            .unwrap()
            .query(&[("search", "ticket to ride"), ("page", "2")]);
        assert_eq!(req.url().query(), Some("search=ticket+to+ride&page=2"));
        assert_eq!(req.path(), "/api/products");
    }

    #[test]
    fn test_json_body_sets_content_type() {
        let req = RequestBuilder::parse(Method::Post, "https://api.example.com/api/cart")
            .unwrap()
            .json(&serde_json::json!({ "quantity": 2 }))
            .unwrap();
        assert_eq!(req.header_value("content-type"), Some("application/json"));
        let body: serde_json::Value = req.body_json().unwrap();
        assert_eq!(body["quantity"], 2);
    }

    #[test]
    fn test_bearer_auth() {
        let req = RequestBuilder::parse(Method::Get, "https://api.example.com/")
            .unwrap()
            .bearer_auth("abc");
        assert_eq!(req.header_value("Authorization"), Some("Bearer abc"));
    }

    #[test]
    fn test_invalid_url() {
        assert!(matches!(
            RequestBuilder::parse(Method::Get, "not a url"),
            Err(FetchError::InvalidUrl(_))
        ));
    }
}
