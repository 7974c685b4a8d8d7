//! The proxied transfer engine.
//!
//! One absolute-form HTTP/1.1 exchange over a TCP connection to the
//! proxy: the full target URL rides in the request line and is never
//! interpreted locally, so the engine relays any scheme it is handed.

mod client;
mod request;
mod response;

pub use client::RelayClient;
pub use request::build_relay_request;
pub use response::{parse_status_line, StatusLine};
