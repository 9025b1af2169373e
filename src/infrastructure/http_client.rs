use crate::application::services::HttpClient;
use crate::domain::entities::{HttpRequest, HttpResponse, Method as DomainMethod};
use crate::domain::errors::TransportError;
use crate::domain::value_objects::{JsonBody, Url};

use async_trait::async_trait;
use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::header::{CONTENT_TYPE, HeaderValue};
use hyper::{Method, Request as HyperRequest, Response as HyperResponse};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::{Client, Error as ClientError};
use hyper_util::rt::TokioExecutor;
use std::error::Error as _;
use tracing::debug;

/// Infrastructure implementation of HttpClient using Hyper
///
/// Idle connections are never kept, so every dispatch opens a fresh
/// connection and it is closed once the response has been read.
pub struct HyperHttpClient {
    client: Client<HttpConnector, Full<Bytes>>,
}

impl HyperHttpClient {
    pub fn new() -> Self {
        let connector = HttpConnector::new();
        let client = Client::builder(TokioExecutor::new())
            .pool_max_idle_per_host(0)
            .build::<HttpConnector, Full<Bytes>>(connector);
        Self { client }
    }
}

impl Default for HyperHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for HyperHttpClient {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let address = request.url.authority().unwrap_or_default().to_string();
        let hyper_request = RequestAdapter::to_hyper_request(request)?;
        let hyper_response = self.execute_http_request(hyper_request, &address).await?;
        ResponseAdapter::to_domain_response(hyper_response).await
    }
}

impl HyperHttpClient {
    async fn execute_http_request(
        &self,
        request: HyperRequest<Full<Bytes>>,
        address: &str,
    ) -> Result<HyperResponse<Incoming>, TransportError> {
        debug!(%address, "Opening connection");
        self.client
            .request(request)
            .await
            .map_err(|err| ErrorAdapter::to_transport_error(err, address))
    }
}

/// Adapter for converting domain requests to Hyper requests
struct RequestAdapter;

impl RequestAdapter {
    fn to_hyper_request(
        domain_request: HttpRequest,
    ) -> Result<HyperRequest<Full<Bytes>>, TransportError> {
        let method = MethodAdapter::to_hyper_method(domain_request.method);
        let uri = UriAdapter::to_hyper_uri(&domain_request.url);
        let body = BodyAdapter::to_hyper_body(&domain_request.body);

        let mut builder = HyperRequest::builder().method(method).uri(uri.clone());

        for (name, value) in &domain_request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        // Host is filled in by the client only when the configuration left it out.
        builder = HeaderAdapter::add_json_content_type(builder, &domain_request.body);

        Ok(builder.body(body)?)
    }
}

/// Adapter for converting domain responses from Hyper responses
struct ResponseAdapter;

impl ResponseAdapter {
    async fn to_domain_response(
        hyper_response: HyperResponse<Incoming>,
    ) -> Result<HttpResponse, TransportError> {
        let status = hyper_response.status();
        let reason = hyper_response
            .extensions()
            .get::<hyper::ext::ReasonPhrase>()
            .map(|phrase| String::from_utf8_lossy(phrase.as_bytes()).into_owned())
            .or_else(|| status.canonical_reason().map(str::to_string))
            .unwrap_or_default();
        let body = Self::extract_response_body(hyper_response).await?;

        Ok(HttpResponse {
            status,
            reason,
            body,
        })
    }

    async fn extract_response_body(
        response: HyperResponse<Incoming>,
    ) -> Result<String, TransportError> {
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .map_err(TransportError::Body)?
            .to_bytes();

        Ok(String::from_utf8(body_bytes.to_vec())?)
    }
}

/// Adapter for classifying client failures
struct ErrorAdapter;

impl ErrorAdapter {
    fn to_transport_error(err: ClientError, address: &str) -> TransportError {
        if err.is_connect() {
            return TransportError::Connect {
                address: address.to_string(),
                source: err,
            };
        }
        let incomplete = err
            .source()
            .and_then(|source| source.downcast_ref::<hyper::Error>())
            .is_some_and(hyper::Error::is_incomplete_message);
        if incomplete {
            TransportError::ConnectionClosed
        } else {
            TransportError::Exchange(err)
        }
    }
}

/// Adapter for converting domain HTTP methods to Hyper methods
struct MethodAdapter;

impl MethodAdapter {
    fn to_hyper_method(domain_method: DomainMethod) -> Method {
        match domain_method {
            DomainMethod::Get => Method::GET,
            DomainMethod::Post => Method::POST,
            DomainMethod::Put => Method::PUT,
            DomainMethod::Delete => Method::DELETE,
        }
    }
}

/// Adapter for converting domain URLs to Hyper URIs
struct UriAdapter;

impl UriAdapter {
    fn to_hyper_uri(domain_url: &Url) -> &hyper::Uri {
        &domain_url.0
    }
}

/// Adapter for converting domain request bodies to Hyper bodies
struct BodyAdapter;

impl BodyAdapter {
    fn to_hyper_body(domain_body: &Option<JsonBody>) -> Full<Bytes> {
        match domain_body {
            Some(json_body) => Full::new(Bytes::from(json_body.0.clone())),
            None => Full::new(Bytes::new()),
        }
    }
}

/// Adapter for handling HTTP headers
struct HeaderAdapter;

impl HeaderAdapter {
    /// Marks JSON bodies unless a content type was configured explicitly
    fn add_json_content_type(
        builder: http::request::Builder,
        body: &Option<JsonBody>,
    ) -> http::request::Builder {
        let configured = builder
            .headers_ref()
            .is_some_and(|headers| headers.contains_key(CONTENT_TYPE));
        if body.is_some() && !configured {
            builder.header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
        } else {
            builder
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::serve_once;
    use tokio::net::TcpListener;

    fn request(method: DomainMethod, address: &str, path: &str) -> HttpRequest {
        HttpRequest {
            method,
            url: Url::new(&format!("http://{address}{path}")).unwrap(),
            headers: Vec::new(),
            body: None,
        }
    }

    fn occurrences(raw: &str, header: &str) -> usize {
        raw.lines()
            .filter(|line| line.to_ascii_lowercase().starts_with(header))
            .count()
    }

    #[tokio::test]
    async fn get_request_reports_status_reason_and_body() {
        let (address, server) =
            serve_once("HTTP/1.1 200 OK\r\ncontent-length: 4\r\n\r\npong").await;

        let response = HyperHttpClient::new()
            .send(request(DomainMethod::Get, &address, "/health"))
            .await
            .unwrap();

        assert_eq!(response.status.as_u16(), 200);
        assert_eq!(response.reason, "OK");
        assert_eq!(response.body, "pong");
        let raw = server.await.unwrap();
        assert!(raw.starts_with("GET /health HTTP/1.1\r\n"));
        assert!(raw.contains(&format!("host: {address}")));
    }

    #[tokio::test]
    async fn server_closing_after_response_still_delivers_it() {
        let client = HyperHttpClient::new();
        for _ in 0..3 {
            let (address, _server) = serve_once(
                "HTTP/1.1 200 OK\r\ncontent-length: 4\r\nconnection: close\r\n\r\npong",
            )
            .await;

            let response = client
                .send(request(DomainMethod::Get, &address, "/health"))
                .await
                .unwrap();

            assert_eq!(response.body, "pong");
        }
    }

    #[tokio::test]
    async fn body_delimited_by_close_is_read_to_the_end() {
        let (address, _server) = serve_once("HTTP/1.0 200 OK\r\n\r\nuntil eof").await;

        let response = HyperHttpClient::new()
            .send(request(DomainMethod::Get, &address, "/"))
            .await
            .unwrap();

        assert_eq!(response.body, "until eof");
    }

    #[tokio::test]
    async fn hang_up_before_response_is_connection_closed() {
        let (address, _server) = serve_once("").await;

        let err = HyperHttpClient::new()
            .send(request(DomainMethod::Get, &address, "/"))
            .await
            .unwrap_err();

        assert!(matches!(err, TransportError::ConnectionClosed));
    }

    #[tokio::test]
    async fn custom_reason_phrase_is_preserved() {
        let (address, _server) =
            serve_once("HTTP/1.1 418 Short And Stout\r\ncontent-length: 0\r\n\r\n").await;

        let response = HyperHttpClient::new()
            .send(request(DomainMethod::Delete, &address, "/test"))
            .await
            .unwrap();

        assert_eq!(response.status.as_u16(), 418);
        assert_eq!(response.reason, "Short And Stout");
    }

    #[tokio::test]
    async fn post_sends_json_body_and_headers() {
        let (address, server) =
            serve_once("HTTP/1.1 201 Created\r\ncontent-length: 0\r\n\r\n").await;
        let mut outgoing = request(DomainMethod::Post, &address, "/items");
        outgoing.headers = vec![("X-Trace".to_string(), "abc".to_string())];
        outgoing.body = Some(JsonBody(r#"{"name":"widget"}"#.to_string()));

        let response = HyperHttpClient::new().send(outgoing).await.unwrap();

        assert_eq!(response.status.as_u16(), 201);
        let raw = server.await.unwrap();
        assert!(raw.starts_with("POST /items HTTP/1.1\r\n"));
        assert!(raw.contains("content-type: application/json"));
        assert!(raw.contains("x-trace: abc"));
        assert!(raw.ends_with(r#"{"name":"widget"}"#));
    }

    #[tokio::test]
    async fn configured_host_and_content_type_replace_defaults() {
        let (address, server) =
            serve_once("HTTP/1.1 204 No Content\r\ncontent-length: 0\r\n\r\n").await;
        let mut outgoing = request(DomainMethod::Put, &address, "/items/1");
        outgoing.headers = vec![
            ("Host".to_string(), "api.internal".to_string()),
            ("Content-Type".to_string(), "application/merge-patch+json".to_string()),
        ];
        outgoing.body = Some(JsonBody(r#"{"n":1}"#.to_string()));

        HyperHttpClient::new().send(outgoing).await.unwrap();

        let raw = server.await.unwrap();
        assert_eq!(occurrences(&raw, "host:"), 1);
        assert!(raw.contains("host: api.internal"));
        assert_eq!(occurrences(&raw, "content-type:"), 1);
        assert!(raw.contains("content-type: application/merge-patch+json"));
    }

    #[tokio::test]
    async fn refused_connection_is_a_connect_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap().to_string();
        drop(listener);

        let err = HyperHttpClient::new()
            .send(request(DomainMethod::Get, &address, "/"))
            .await
            .unwrap_err();

        assert!(matches!(err, TransportError::Connect { .. }));
    }

    #[tokio::test]
    async fn invalid_header_name_fails_before_connecting() {
        let mut outgoing = request(DomainMethod::Get, "127.0.0.1:1", "/");
        outgoing.headers = vec![("bad header".to_string(), "x".to_string())];

        let err = HyperHttpClient::new().send(outgoing).await.unwrap_err();

        assert!(matches!(err, TransportError::Build(_)));
    }
}
