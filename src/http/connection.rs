use std::time::Duration;

use anyhow::Context;
use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::timeout;

use crate::access::AccessPolicy;
use crate::config::ServerConfig;
use crate::http::mime::content_type;
use crate::http::parser::{find_line_end, parse_request_line, ParseError, MAX_REQUEST_LINE};
use crate::http::request::{Method, ParsedRequestLine};
use crate::http::response::StatusCode;
use crate::http::writer::ResponseWriter;
use crate::logging::LogSink;
use crate::resource::{Resource, ResourceResolver};
use crate::status::StatusReport;

/// Path served by the diagnostics page instead of the file tree.
pub const STATUS_PATH: &str = "/status";

/// How long to keep draining a client after our response is out, so unread
/// request headers do not turn the close into a reset.
const LINGER: Duration = Duration::from_millis(500);

/// Everything a connection needs, shared by all of them.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    policy: AccessPolicy,
    resolver: ResourceResolver,
    logs: LogSink,
    io_timeout: Duration,
}

impl Dispatcher {
    pub fn new(
        policy: AccessPolicy,
        resolver: ResourceResolver,
        logs: LogSink,
        io_timeout: Duration,
    ) -> Self {
        Self {
            policy,
            resolver,
            logs,
            io_timeout,
        }
    }

    pub fn from_config(config: &ServerConfig, logs: LogSink) -> Self {
        Self::new(
            AccessPolicy::from_config(config),
            ResourceResolver::new(&config.root, config.default_document.clone()),
            logs,
            config.io_timeout(),
        )
    }

    pub fn logs(&self) -> &LogSink {
        &self.logs
    }

    /// Handles one connection from start to close.
    pub async fn dispatch<S>(&self, stream: S, client_ip: &str)
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        Connection::new(self, stream, client_ip).run().await
    }
}

#[derive(Debug)]
pub enum Route {
    StatusPage(ParsedRequestLine),
    StaticFile(ParsedRequestLine),
    /// Methods other than GET are answered as not found.
    Unsupported(ParsedRequestLine),
}

impl Route {
    pub fn for_request(line: ParsedRequestLine) -> Self {
        match line.method {
            Method::GET if line.path() == STATUS_PATH => Route::StatusPage(line),
            Method::GET => Route::StaticFile(line),
            _ => Route::Unsupported(line),
        }
    }

    fn request(&self) -> &ParsedRequestLine {
        match self {
            Route::StatusPage(line) | Route::StaticFile(line) | Route::Unsupported(line) => line,
        }
    }
}

/// What was sent, kept for the log line.
#[derive(Debug)]
pub struct Outcome {
    pub request: ParsedRequestLine,
    pub status: StatusCode,
    pub bytes: u64,
    /// Set when the response was a failure that belongs in the error log.
    pub failure: Option<String>,
}

pub enum ConnectionState {
    AwaitingRequestLine,
    Routed(Route),
    Responded(Outcome),
    Errored(anyhow::Error),
    Closed,
}

pub struct Connection<'d, S> {
    dispatcher: &'d Dispatcher,
    stream: S,
    client_ip: String,
    buffer: BytesMut,
    state: ConnectionState,
}

impl<'d, S> Connection<'d, S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(dispatcher: &'d Dispatcher, stream: S, client_ip: impl Into<String>) -> Self {
        Self {
            dispatcher,
            stream,
            client_ip: client_ip.into(),
            buffer: BytesMut::with_capacity(1024),
            state: ConnectionState::AwaitingRequestLine,
        }
    }

    pub async fn run(mut self) {
        let dispatcher = self.dispatcher;
        let logs = &dispatcher.logs;
        let io_timeout = dispatcher.io_timeout;

        let decision = dispatcher.policy.decide(&self.client_ip);
        if !decision.is_accepted() {
            logs.error(format!(
                "connection refused for {}: {}",
                self.client_ip,
                decision.reason()
            ))
            .await;
            return;
        }

        loop {
            let state = std::mem::replace(&mut self.state, ConnectionState::Closed);
            self.state = match state {
                ConnectionState::AwaitingRequestLine => {
                    match timeout(io_timeout, self.read_request_line()).await {
                        Ok(Ok(line)) => ConnectionState::Routed(Route::for_request(line)),
                        Ok(Err(e)) => ConnectionState::Errored(e),
                        Err(_) => ConnectionState::Errored(anyhow::anyhow!(
                            "timed out after {:?} waiting for request line",
                            io_timeout
                        )),
                    }
                }

                ConnectionState::Routed(route) => {
                    let target = route.request().target.clone();
                    match timeout(io_timeout, self.respond(route)).await {
                        Ok(Ok(outcome)) => ConnectionState::Responded(outcome),
                        Ok(Err(e)) => ConnectionState::Errored(
                            e.context(format!("failed to send response for {}", target)),
                        ),
                        Err(_) => ConnectionState::Errored(anyhow::anyhow!(
                            "timed out after {:?} sending response for {}",
                            io_timeout,
                            target
                        )),
                    }
                }

                ConnectionState::Responded(outcome) => {
                    self.log_outcome(&outcome).await;
                    self.linger().await;
                    ConnectionState::Closed
                }

                ConnectionState::Errored(e) => {
                    logs.error(format!("{}: {:#}", self.client_ip, e)).await;
                    let _ = self.stream.shutdown().await;
                    ConnectionState::Closed
                }

                ConnectionState::Closed => break,
            };
        }
    }

    async fn read_request_line(&mut self) -> anyhow::Result<ParsedRequestLine> {
        loop {
            if let Some(end) = find_line_end(&self.buffer) {
                if end > MAX_REQUEST_LINE {
                    return Err(ParseError::TooLong.into());
                }
                let line = self.buffer.split_to(end);
                return Ok(parse_request_line(&line)?);
            }

            if self.buffer.len() >= MAX_REQUEST_LINE {
                return Err(ParseError::TooLong.into());
            }

            let n = self
                .stream
                .read_buf(&mut self.buffer)
                .await
                .context("failed to read request line")?;

            if n == 0 {
                // Peer closed; an unterminated line is still worth a try.
                if self.buffer.is_empty() {
                    return Err(ParseError::Missing.into());
                }
                let line = self.buffer.split();
                return Ok(parse_request_line(&line)?);
            }
        }
    }

    async fn respond(&mut self, route: Route) -> anyhow::Result<Outcome> {
        let dispatcher = self.dispatcher;
        let resolver = &dispatcher.resolver;
        let mut writer = ResponseWriter::new(&mut self.stream);

        match route {
            Route::StatusPage(request) => {
                let root = resolver.root().to_path_buf();
                let report = tokio::task::spawn_blocking(move || StatusReport::collect(&root))
                    .await
                    .context("status probe panicked")?;
                let bytes = writer.write_status_page(&report.to_html()).await?;
                Ok(Outcome {
                    request,
                    status: StatusCode::Ok,
                    bytes,
                    failure: None,
                })
            }

            Route::StaticFile(request) => match resolver.resolve(request.path()).await {
                Resource::Found(found) => {
                    let mime = content_type(&found.path);
                    let bytes = writer.write_found(found, mime).await?;
                    Ok(Outcome {
                        request,
                        status: StatusCode::Ok,
                        bytes,
                        failure: None,
                    })
                }
                Resource::NotFound(reason) => {
                    let bytes = writer.write_not_found().await?;
                    Ok(Outcome {
                        request,
                        status: StatusCode::NotFound,
                        bytes,
                        failure: Some(reason.describe()),
                    })
                }
            },

            Route::Unsupported(request) => {
                let bytes = writer.write_not_found().await?;
                let failure = format!("method {} not supported", request.method);
                Ok(Outcome {
                    request,
                    status: StatusCode::NotFound,
                    bytes,
                    failure: Some(failure),
                })
            }
        }
    }

    async fn log_outcome(&self, outcome: &Outcome) {
        let logs = &self.dispatcher.logs;
        let summary = format!(
            "{} \"{} {}\" {}",
            self.client_ip,
            outcome.request.method,
            outcome.request.target,
            outcome.status.as_u16()
        );

        match &outcome.failure {
            Some(reason) => logs.error(format!("{}: {}", summary, reason)).await,
            None => logs.access(format!("{} {}", summary, outcome.bytes)).await,
        }
    }

    /// Closes our side, then reads and discards whatever the client still
    /// sends until it closes too or `LINGER` runs out.
    async fn linger(&mut self) {
        if self.stream.shutdown().await.is_err() {
            return;
        }

        let mut scratch = [0u8; 1024];
        let drain = async {
            loop {
                match self.stream.read(&mut scratch).await {
                    Ok(0) | Err(_) => break,
                    Ok(_) => {}
                }
            }
        };
        let _ = timeout(LINGER, drain).await;
    }
}
