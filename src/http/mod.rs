//! HTTP protocol handling.
//!
//! Just enough HTTP/1.1 to serve one request per connection: the request
//! line is read, headers and bodies are ignored, and exactly one response is
//! written before the connection is closed.
//!
//! - **`connection`**: the per-connection state machine and the shared [`connection::Dispatcher`]
//! - **`parser`**: request-line parsing
//! - **`request`**: the parsed request line
//! - **`response`**: status codes and the response builder
//! - **`writer`**: serialises and writes responses to the client
//! - **`mime`**: MIME type detection based on file extensions
//!
//! # Connection State Machine
//!
//! ```text
//!   access policy ── rejected ──────────────────────────────┐
//!        │ accepted                                         │
//!        ▼                                                  │
//!  ┌─────────────────────┐                                  │
//!  │ AwaitingRequestLine │ ── EOF / malformed / timeout ─┐  │
//!  └──────────┬──────────┘                               │  │
//!             │ request line parsed                      ▼  │
//!             ▼                                   ┌─────────┐
//!  ┌─────────────────────┐                        │ Errored │
//!  │       Routed        │ ── write failure ────▶ └────┬────┘
//!  └──────────┬──────────┘                             │  │
//!             │ response written                       │  │
//!             ▼                                        │  │
//!  ┌─────────────────────┐                             │  │
//!  │      Responded      │                             │  │
//!  └──────────┬──────────┘                             │  │
//!             ▼                                        ▼  ▼
//!  ┌──────────────────────────────────────────────────────────┐
//!  │                         Closed                           │
//!  └──────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use gatehouse::http::connection::Dispatcher;
//! use gatehouse::server::client_ip;
//! use tokio::net::TcpListener;
//!
//! let dispatcher = Dispatcher::from_config(&config, logs);
//! let listener = TcpListener::bind("127.0.0.1:8080").await?;
//! let (socket, peer) = listener.accept().await?;
//! dispatcher.dispatch(socket, &client_ip(&peer)).await;
//! ```

pub mod connection;
pub mod mime;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
