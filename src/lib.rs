//! Utusan - one-shot proxied transfer client.
//!
//! A small library core with a thin binary: resolve a [`config::Config`],
//! build a [`relay::RelayClient`] and perform a single blocking transfer
//! through an HTTP proxy.

pub mod config;
pub mod error;
pub mod relay;

pub use config::Config;
pub use error::{ConfigError, RelayError};
pub use relay::RelayClient;
