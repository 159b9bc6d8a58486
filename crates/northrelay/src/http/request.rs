//! Outgoing request description

use bytes::Bytes;
use http::Method;
use serde::Serialize;
use serde_json::Value;

use crate::error::{Error, Result};

/// One API call, independent of the transport that sends it.
///
/// The request is immutable once handed to the client, and is replayed as-is
/// on every retry attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: Option<Bytes>,
}

impl ApiRequest {
    /// Create a request for `path` (relative to the base URL, starting with `/`).
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    /// `GET path`
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// `POST path`
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// `PUT path`
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    /// `PATCH path`
    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    /// `DELETE path`
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Append a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Append a query parameter when `value` is present.
    pub fn query_opt(self, key: impl Into<String>, value: Option<impl ToString>) -> Self {
        match value {
            Some(value) => self.query(key, value),
            None => self,
        }
    }

    /// Append every field of `params` as a query parameter.
    ///
    /// `params` must serialize to a JSON object. Null fields are skipped;
    /// strings are used verbatim and other scalars in their JSON form.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialization`](crate::Error::Serialization) if
    /// `params` cannot be serialized, or
    /// [`Error::InvalidRequest`](crate::Error::InvalidRequest) if it is not an
    /// object.
    pub fn query_params<T: Serialize + ?Sized>(mut self, params: &T) -> Result<Self> {
        let fields = match serde_json::to_value(params)? {
            Value::Object(fields) => fields,
            Value::Null => return Ok(self),
            other => {
                return Err(Error::InvalidRequest(format!(
                    "query parameters must be an object, got {other}"
                )));
            }
        };

        for (key, value) in fields {
            match value {
                Value::Null => {}
                Value::String(s) => self.query.push((key, s)),
                other => self.query.push((key, other.to_string())),
            }
        }
        Ok(self)
    }

    /// Set a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialization`](crate::Error::Serialization) if `body`
    /// cannot be serialized.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        self.body = Some(Bytes::from(serde_json::to_vec(body)?));
        Ok(self)
    }

    /// Get the method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Get the path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Get the query parameters in insertion order.
    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    /// Get the serialized body.
    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }
}
