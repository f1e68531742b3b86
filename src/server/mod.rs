//! TCP accept loop

pub mod listener;

pub use listener::{client_ip, Server};
