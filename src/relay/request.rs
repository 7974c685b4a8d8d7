//! Absolute-form request serialization.

use url::Url;

use crate::error::RelayError;

/// User-Agent sent with every relayed request.
pub const USER_AGENT: &str = concat!("utusan/", env!("CARGO_PKG_VERSION"));

/// Well-known default ports, used for authority resolution only and
/// never echoed into the Host header.
pub fn scheme_default_port(scheme: &str) -> Option<u16> {
    match scheme {
        "coap" | "coap+udp" => Some(5683),
        "coaps" => Some(5684),
        "http" => Some(80),
        "https" => Some(443),
        _ => None,
    }
}

/// Host header value: the target authority, with the port only when
/// the URL names one explicitly.
fn host_header(target: &Url) -> Result<String, RelayError> {
    let host = target.host_str().ok_or_else(|| RelayError::UnrelayableUrl {
        url: target.to_string(),
        reason: "no host".to_string(),
    })?;

    Ok(match target.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}

/// The URL as it appears in the request line. Rebuilt from components
/// so that an empty path becomes `/` and any fragment is dropped.
fn request_target(target: &Url) -> Result<String, RelayError> {
    let mut form = format!("{}://{}", target.scheme(), host_header(target)?);

    let path = target.path();
    form.push_str(if path.is_empty() { "/" } else { path });

    if let Some(query) = target.query() {
        form.push('?');
        form.push_str(query);
    }

    Ok(form)
}

/// Serialize the absolute-form GET request for `target`.
pub fn build_relay_request(target: &Url) -> Result<Vec<u8>, RelayError> {
    let request = format!(
        "GET {} HTTP/1.1\r\n\
         Host: {}\r\n\
         User-Agent: {}\r\n\
         Accept: */*\r\n\
         Proxy-Connection: close\r\n\
         \r\n",
        request_target(target)?,
        host_header(target)?,
        USER_AGENT,
    );

    Ok(request.into_bytes())
}
