use crate::domain::value_objects::{JsonBody, Url};
use hyper::StatusCode;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// HTTP verbs a configured request may use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub const ALL: [Method; 4] = [Method::Get, Method::Post, Method::Put, Method::Delete];

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named request as it appears under `requests` in the configuration file
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RequestSpec {
    pub title: String,
    #[serde(rename = "type")]
    pub method: Method,
    pub path: String,
    #[serde(default)]
    pub body: Option<Map<String, Value>>,
    #[serde(default)]
    pub headers: Option<BTreeMap<String, String>>,
}

/// A catalog entry the operator can select from the menu
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub key: String,
    pub title: String,
    pub method: Method,
    pub path: String,
    pub body: Map<String, Value>,
    pub headers: BTreeMap<String, String>,
}

/// Transport-level request descriptor
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    pub headers: Vec<(String, String)>, // Key-value pairs for headers
    pub body: Option<JsonBody>,
}

/// Transport-level response descriptor
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub reason: String,
    pub body: String,
}
