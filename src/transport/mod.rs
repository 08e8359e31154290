//! Transport invoker
//!
//! Runs grpcurl and curl as child processes and normalizes every result
//! into a [`TestOutcome`].

mod client;
mod command;
mod curl;
#[cfg(test)]
pub(crate) mod fake;
mod grpcurl;
mod outcome;

pub use client::{ensure_installed, grpcurl_install_hint, CliTransport, GatewayClient};
#[cfg(test)]
pub use client::{Target, Transport, TransportRequest};
pub use command::CommandInvoker;
pub use curl::CurlOptions;
pub use grpcurl::GrpcurlOptions;
pub use outcome::{TestOutcome, TransportError};
