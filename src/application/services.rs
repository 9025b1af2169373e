use crate::domain::entities::{HttpRequest, HttpResponse};
use crate::domain::errors::{DispatchError, RequestError, TransportError};
use crate::domain::value_objects::Url;
use async_trait::async_trait;

/// Trait for HTTP clients to enable mocking and dependency inversion
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Application service for orchestrating HTTP request workflows
pub struct HttpRequestService {
    http_client: Box<dyn HttpClient>,
}

impl HttpRequestService {
    pub fn new(http_client: Box<dyn HttpClient>) -> Self {
        Self { http_client }
    }

    /// Sends a single HTTP request
    pub async fn send_request(&self, request: HttpRequest) -> Result<HttpResponse, DispatchError> {
        RequestValidator::validate(&request)?;
        Ok(self.http_client.send(request).await?)
    }
}

/// Domain service for request validation
pub struct RequestValidator;

impl RequestValidator {
    pub fn validate(request: &HttpRequest) -> Result<(), RequestError> {
        Self::validate_url(&request.url)
    }

    fn validate_url(url: &Url) -> Result<(), RequestError> {
        let absolute = url.0.scheme_str() == Some("http") && url.authority().is_some();
        if !absolute {
            return Err(RequestError::NotAbsolute(url.as_str()));
        }
        if !url.0.path().starts_with('/') {
            return Err(RequestError::RelativePath(url.0.path().to_string()));
        }
        Ok(())
    }
}
