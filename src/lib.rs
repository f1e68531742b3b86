//! Gatehouse - static file server with IP filtering
//!
//! Serves files from a document root over HTTP/1.1, one request per
//! connection, after checking each client against allow/deny patterns.
//! Outcomes are recorded in access and error log files.

pub mod access;
pub mod cli;
pub mod config;
pub mod http;
pub mod logging;
pub mod resource;
pub mod server;
pub mod status;
