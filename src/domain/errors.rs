use std::string::FromUtf8Error;
use std::time::Duration;
use thiserror::Error;

/// A request descriptor could not be assembled
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("HTTP method is required")]
    MissingMethod,
    #[error("request URL is required")]
    MissingUrl,
    #[error("invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        source: http::uri::InvalidUri,
    },
    #[error("request path must start with '/': '{0}'")]
    RelativePath(String),
    #[error("URL must be absolute http://host:port/path, got '{0}'")]
    NotAbsolute(String),
    #[error("failed to encode request body: {0}")]
    Body(#[from] serde_json::Error),
}

/// The HTTP exchange itself failed
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to connect to {address}: {source}")]
    Connect {
        address: String,
        source: hyper_util::client::legacy::Error,
    },
    #[error("failed to build HTTP request: {0}")]
    Build(#[from] http::Error),
    #[error("HTTP request execution failed: {0}")]
    Exchange(hyper_util::client::legacy::Error),
    #[error("connection closed before a response arrived")]
    ConnectionClosed,
    #[error("failed to read response body: {0}")]
    Body(hyper::Error),
    #[error("response body contains invalid UTF-8: {0}")]
    Decode(#[from] FromUtf8Error),
}

/// Everything that can go wrong while dispatching a catalog request
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Request(#[from] RequestError),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
}
