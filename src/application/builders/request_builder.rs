use crate::domain::entities::{HttpRequest, Method, Request};
use crate::domain::errors::RequestError;
use crate::domain::value_objects::{Endpoint, JsonBody, Url};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

pub struct RequestBuilder {
    method: Option<Method>,
    url: Option<Url>,
    headers: Vec<(String, String)>,
    body: Option<JsonBody>,
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self {
            method: None,
            url: None,
            headers: Vec::new(),
            body: None,
        }
    }

    /// Prefills a builder from a catalog entry aimed at `endpoint`
    pub fn for_request(endpoint: &Endpoint, request: &Request) -> Result<Self, RequestError> {
        Self::new()
            .method(request.method)
            .url(endpoint, &request.path)?
            .headers(&request.headers)
            .body(&request.body)
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    pub fn url(mut self, endpoint: &Endpoint, path: &str) -> Result<Self, RequestError> {
        self.url = Some(Url::for_endpoint(endpoint, path)?);
        Ok(self)
    }

    pub fn headers(mut self, headers: &BTreeMap<String, String>) -> Self {
        self.headers
            .extend(headers.iter().map(|(name, value)| (name.clone(), value.clone())));
        self
    }

    pub fn body(mut self, fields: &Map<String, Value>) -> Result<Self, RequestError> {
        self.body = JsonBody::encode(fields)?;
        Ok(self)
    }

    pub fn build(self) -> Result<HttpRequest, RequestError> {
        Ok(HttpRequest {
            method: self.method.ok_or(RequestError::MissingMethod)?,
            url: self.url.ok_or(RequestError::MissingUrl)?,
            headers: self.headers,
            body: self.body,
        })
    }
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(method: Method, path: &str, body: Value) -> Request {
        Request {
            key: "1".to_string(),
            title: "widget".to_string(),
            method,
            path: path.to_string(),
            body: body.as_object().cloned().unwrap_or_default(),
            headers: BTreeMap::from([("X-Trace".to_string(), "abc".to_string())]),
        }
    }

    #[test]
    fn builds_request_from_catalog_entry() {
        let endpoint = Endpoint::new("127.0.0.1", 8080);
        let request = RequestBuilder::for_request(
            &endpoint,
            &entry(Method::Post, "/items", json!({"name": "widget"})),
        )
        .unwrap()
        .build()
        .unwrap();

        assert_eq!(request.method, Method::Post);
        assert_eq!(request.url.as_str(), "http://127.0.0.1:8080/items");
        assert_eq!(
            request.headers,
            vec![("X-Trace".to_string(), "abc".to_string())]
        );
        assert_eq!(request.body, Some(JsonBody(r#"{"name":"widget"}"#.to_string())));
    }

    #[test]
    fn empty_body_sends_nothing() {
        let endpoint = Endpoint::new("localhost", 8888);
        let request = RequestBuilder::for_request(&endpoint, &entry(Method::Get, "/health", json!({})))
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(request.body, None);
    }

    #[test]
    fn missing_parts_are_reported() {
        assert!(matches!(
            RequestBuilder::new().build(),
            Err(RequestError::MissingMethod)
        ));
        assert!(matches!(
            RequestBuilder::new().method(Method::Get).build(),
            Err(RequestError::MissingUrl)
        ));
    }

    #[test]
    fn relative_paths_are_rejected() {
        let endpoint = Endpoint::new("localhost", 8888);
        let result = RequestBuilder::for_request(&endpoint, &entry(Method::Get, "health", json!({})));
        assert!(matches!(result, Err(RequestError::RelativePath(_))));
    }
}
