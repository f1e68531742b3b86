//! Client IP filtering
//!
//! Every connection is classified before a single byte of the request is
//! read. Rejected clients are logged and disconnected without a response.

pub mod pattern;
pub mod policy;

pub use pattern::IpPattern;
pub use policy::{AccessPolicy, PolicyDecision};
