use crate::domain::errors::RequestError;
use hyper::http::Uri;
use serde_json::{Map, Value};
use std::fmt;

/// Host and port every catalog request is sent to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // IPv6 literals need brackets inside an authority
        if self.host.contains(':') && !self.host.starts_with('[') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

/// Represents a validated URL
#[derive(Debug, Clone)]
pub struct Url(pub Uri);

impl Url {
    /// Creates a new Url with validation
    ///
    /// # Arguments
    /// * `url` - The URL string to parse
    ///
    /// # Returns
    /// * `Ok(Url)` - Validated URL
    /// * `Err(RequestError::InvalidUrl)` - If the URL is invalid
    pub fn new(url: &str) -> Result<Self, RequestError> {
        let uri = url.parse::<Uri>().map_err(|source| RequestError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;
        Ok(Url(uri))
    }

    /// Joins an endpoint and an origin-form path into an absolute `http` URL
    pub fn for_endpoint(endpoint: &Endpoint, path: &str) -> Result<Self, RequestError> {
        if !path.starts_with('/') {
            return Err(RequestError::RelativePath(path.to_string()));
        }
        Self::new(&format!("http://{endpoint}{path}"))
    }

    /// `host:port` part of the URL, if any
    pub fn authority(&self) -> Option<&str> {
        self.0.authority().map(|authority| authority.as_str())
    }

    /// Returns the URL as a string
    pub fn as_str(&self) -> String {
        self.0.to_string()
    }
}

/// Represents a validated JSON body
#[derive(Debug, Clone, PartialEq)]
pub struct JsonBody(pub String);

impl JsonBody {
    /// Serializes a configured body mapping; an empty mapping means no body
    pub fn encode(fields: &Map<String, Value>) -> Result<Option<Self>, RequestError> {
        if fields.is_empty() {
            return Ok(None);
        }
        let json = serde_json::to_string(fields)?;
        Ok(Some(JsonBody(json)))
    }
}
