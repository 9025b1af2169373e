use crate::application::builders::request_builder::RequestBuilder;
use crate::application::catalog::RequestCatalog;
use crate::application::services::HttpRequestService;
use crate::domain::entities::{HttpResponse, Request};
use crate::domain::errors::DispatchError;
use crate::domain::value_objects::Endpoint;
use crate::infrastructure::output::format_response_body;

use async_trait::async_trait;
use std::io;
use std::time::Duration;
use thiserror::Error;
use tracing::instrument::WithSubscriber;
use tracing::{Dispatch, debug, info, warn};

pub const EXIT_COMMAND: &str = "0";

/// Why reading the next command did not produce one
#[derive(Debug, Error)]
pub enum InputError {
    #[error("input stream closed")]
    Closed,
    #[error("failed to read command: {0}")]
    Io(#[from] io::Error),
    #[error("no command entered within {0:?}")]
    TimedOut(Duration),
}

/// Line-oriented supply of operator commands
#[async_trait]
pub trait CommandSource: Send {
    async fn next_command(&mut self) -> Result<String, InputError>;
}

/// How the interactive loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    ExitCommand,
    InputClosed,
    InputTimedOut,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DispatcherState<'a> {
    AwaitingInput,
    Dispatching(&'a Request),
    Terminated(Termination),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timeouts {
    pub request: Option<Duration>,
    pub input: Option<Duration>,
}

/// Interactive loop mapping menu selections to HTTP exchanges
pub struct Dispatcher {
    catalog: RequestCatalog,
    endpoint: Endpoint,
    service: HttpRequestService,
    timeouts: Timeouts,
    log: Dispatch,
}

impl Dispatcher {
    pub fn new(
        catalog: RequestCatalog,
        endpoint: Endpoint,
        service: HttpRequestService,
        log: Dispatch,
    ) -> Self {
        Self {
            catalog,
            endpoint,
            service,
            timeouts: Timeouts::default(),
            log,
        }
    }

    pub fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Runs until the exit command, end of input or an input timeout
    pub async fn run(&self, source: &mut dyn CommandSource) -> Termination {
        self.drive(source).with_subscriber(self.log.clone()).await
    }

    /// Resolves one command against the catalog
    pub fn select(&self, command: &str) -> DispatcherState<'_> {
        tracing::dispatcher::with_default(&self.log, || self.transition(command))
    }

    /// Sends one catalog entry and logs the outcome
    pub async fn dispatch(&self, request: &Request) -> Result<HttpResponse, DispatchError> {
        self.exchange(request).with_subscriber(self.log.clone()).await
    }

    async fn drive(&self, source: &mut dyn CommandSource) -> Termination {
        let mut state = DispatcherState::AwaitingInput;
        loop {
            state = match state {
                DispatcherState::AwaitingInput => {
                    self.render_menu();
                    match self.read_command(source).await {
                        Ok(command) => self.select(&command),
                        Err(err) => DispatcherState::Terminated(Self::close_input(&err)),
                    }
                }
                DispatcherState::Dispatching(request) => {
                    // Outcome is already logged; failures never end the loop.
                    let _ = self.dispatch(request).await;
                    DispatcherState::AwaitingInput
                }
                DispatcherState::Terminated(reason) => return reason,
            };
        }
    }

    fn render_menu(&self) {
        info!("{EXIT_COMMAND}: exit application");
        for entry in self.catalog.iter() {
            info!("{}: {}", entry.key, entry.title);
        }
    }

    async fn read_command(&self, source: &mut dyn CommandSource) -> Result<String, InputError> {
        match self.timeouts.input {
            Some(limit) => tokio::time::timeout(limit, source.next_command())
                .await
                .map_err(|_| InputError::TimedOut(limit))?,
            None => source.next_command().await,
        }
    }

    fn close_input(err: &InputError) -> Termination {
        match err {
            InputError::TimedOut(_) => {
                warn!(error = %err, "Input timed out, exiting application...");
                Termination::InputTimedOut
            }
            _ => {
                info!(reason = %err, "Input finished, exiting application...");
                Termination::InputClosed
            }
        }
    }

    fn transition(&self, command: &str) -> DispatcherState<'_> {
        let command = command.trim();
        if command == EXIT_COMMAND {
            info!("'{EXIT_COMMAND}' selected, exiting application...");
            return DispatcherState::Terminated(Termination::ExitCommand);
        }
        if command.is_empty() {
            return DispatcherState::AwaitingInput;
        }
        match self.catalog.get(command) {
            Some(request) => DispatcherState::Dispatching(request),
            None => {
                warn!(command, "Unknown command code!");
                DispatcherState::AwaitingInput
            }
        }
    }

    async fn exchange(&self, request: &Request) -> Result<HttpResponse, DispatchError> {
        info!(
            key = %request.key,
            method = %request.method,
            path = %request.path,
            "Sending '{}'", request.title
        );
        match self.send(request).await {
            Ok(response) => {
                info!(
                    "Status: {} and reason: {}",
                    response.status.as_u16(),
                    response.reason
                );
                info!("Response body:\n{}", format_response_body(&response.body));
                Ok(response)
            }
            Err(err) => {
                warn!(error = %err, "Request '{}' failed", request.title);
                Err(err)
            }
        }
    }

    async fn send(&self, request: &Request) -> Result<HttpResponse, DispatchError> {
        let outgoing = RequestBuilder::for_request(&self.endpoint, request)?.build()?;
        debug!(url = %outgoing.url.as_str(), "Built request");

        let exchange = self.service.send_request(outgoing);
        match self.timeouts.request {
            Some(limit) => tokio::time::timeout(limit, exchange)
                .await
                .map_err(|_| DispatchError::Timeout(limit))?,
            None => exchange.await,
        }
    }
}
