//! The relay client: one TCP connection to the proxy, one exchange.

use std::io::{BufReader, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use tracing::{debug, info};
use url::Url;

use crate::error::RelayError;

use super::request::{build_relay_request, scheme_default_port};
use super::response::{read_response, StatusLine};

/// Performs a single proxied transfer.
///
/// The client owns the proxy endpoint and socket timeout settings for
/// the lifetime of one invocation; each call to [`RelayClient::perform`]
/// opens one connection, sends one request and reads one response. All
/// resources are released by drop on every path.
pub struct RelayClient {
    proxy: Url,
    connect_timeout: Option<Duration>,
    io_timeout: Option<Duration>,
}

impl RelayClient {
    /// Create a client relaying through the given HTTP proxy.
    pub fn new(proxy: Url) -> Self {
        Self {
            proxy,
            connect_timeout: None,
            io_timeout: None,
        }
    }

    /// Set a timeout for establishing the proxy connection. None, the
    /// default, blocks indefinitely.
    pub fn with_connect_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set read/write timeouts on the proxy socket. None, the default,
    /// blocks indefinitely.
    pub fn with_io_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.io_timeout = timeout;
        self
    }

    /// The proxy this client relays through.
    pub fn proxy(&self) -> &Url {
        &self.proxy
    }

    /// Resolve the proxy authority to a socket address.
    fn proxy_addr(&self) -> Result<SocketAddr, RelayError> {
        let host = self.proxy.host_str().ok_or_else(|| RelayError::UnrelayableUrl {
            url: self.proxy.to_string(),
            reason: "proxy has no host".to_string(),
        })?;

        let port = self
            .proxy
            .port_or_known_default()
            .or_else(|| scheme_default_port(self.proxy.scheme()))
            .ok_or_else(|| RelayError::UnrelayableUrl {
                url: self.proxy.to_string(),
                reason: "proxy has no port".to_string(),
            })?;

        let authority = format!("{}:{}", host, port);
        let mut addrs = authority
            .to_socket_addrs()
            .map_err(|source| RelayError::Resolve {
                authority: authority.clone(),
                source,
            })?;

        addrs.next().ok_or_else(|| RelayError::Resolve {
            authority,
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no addresses resolved"),
        })
    }

    fn connect(&self, addr: SocketAddr) -> Result<TcpStream, RelayError> {
        let stream = match self.connect_timeout {
            Some(timeout) => TcpStream::connect_timeout(&addr, timeout),
            None => TcpStream::connect(addr),
        }
        .map_err(|source| RelayError::Connect {
            proxy: addr.to_string(),
            source,
        })?;

        stream.set_read_timeout(self.io_timeout)?;
        stream.set_write_timeout(self.io_timeout)?;

        Ok(stream)
    }

    /// Perform one transfer of `target` through the proxy.
    ///
    /// Success is a 2xx answer from the proxy; any other status, and any
    /// transport failure along the way, is an error.
    pub fn perform(&self, target: &Url) -> Result<StatusLine, RelayError> {
        let request = build_relay_request(target)?;
        let addr = self.proxy_addr()?;

        debug!("Connecting to proxy {}", addr);
        let mut stream = self.connect(addr)?;

        debug!("Relaying {} through {}", target, addr);
        stream.write_all(&request)?;
        stream.flush()?;

        let mut reader = BufReader::new(stream);
        let status = read_response(&mut reader)?;

        if !status.is_success() {
            return Err(RelayError::ProxyStatus {
                code: status.code,
                reason: status.reason,
            });
        }

        info!("Transfer complete: {} {}", status.code, status.reason);
        Ok(status)
    }
}
