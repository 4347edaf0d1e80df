//! HTTP-to-TCP translation layer for the ballot voting system.
//!
//! The gateway is an ordinary protocol client of the vote server: each
//! inbound HTTP request opens a fresh short-lived connection through the
//! [`FailoverClient`], which walks an ordered backend list until one
//! answers. A request is never satisfied by responses assembled from two
//! different backends.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod failover;
pub mod http;
pub mod wire;

pub use error::{GatewayError, GatewayResult};
pub use failover::FailoverClient;
pub use http::router;
