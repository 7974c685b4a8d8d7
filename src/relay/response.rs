//! Proxy response handling.
//!
//! Only the status line decides the outcome. Headers and body are
//! drained and discarded, never inspected.

use std::io::{self, BufRead};

use tracing::debug;

use crate::error::RelayError;

/// The parsed first line of the proxy's response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub code: u16,
    pub reason: String,
}

impl StatusLine {
    /// A 2xx answer from the proxy counts as a successful transfer.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.code)
    }
}

/// Parse an HTTP status line of the form `HTTP/<version> <code> <reason>`.
pub fn parse_status_line(line: &str) -> Result<StatusLine, RelayError> {
    let line = line.trim_end_matches(['\r', '\n']);
    let mut parts = line.splitn(3, ' ');

    let version = parts.next().unwrap_or("");
    if !version.starts_with("HTTP/") {
        return Err(RelayError::MalformedResponse(format!(
            "bad status line '{}'",
            line
        )));
    }

    let code = parts
        .next()
        .and_then(|code| code.parse::<u16>().ok())
        .ok_or_else(|| {
            RelayError::MalformedResponse(format!("bad status code in '{}'", line))
        })?;

    let reason = parts.next().unwrap_or("").to_string();

    Ok(StatusLine { code, reason })
}

/// Read the proxy's response: parse the status line, then drain the
/// rest of the stream so the peer sees a clean close.
pub fn read_response<R: BufRead>(reader: &mut R) -> Result<StatusLine, RelayError> {
    let mut line = String::new();
    let bytes_read = reader.read_line(&mut line)?;
    if bytes_read == 0 {
        return Err(RelayError::MalformedResponse(
            "empty response from proxy".to_string(),
        ));
    }

    let status = parse_status_line(&line)?;

    // The outcome is already decided; a drain failure must not flip it.
    if let Err(e) = io::copy(reader, &mut io::sink()) {
        debug!("Error draining proxy response: {}", e);
    }

    Ok(status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    mod parse_status_line_tests {
        use super::*;

        #[test]
        fn parses_ok_line() {
            let status = parse_status_line("HTTP/1.1 200 OK\r\n").unwrap();
            assert_eq!(status.code, 200);
            assert_eq!(status.reason, "OK");
            assert!(status.is_success());
        }

        #[test]
        fn parses_multiword_reason() {
            let status = parse_status_line("HTTP/1.1 502 Bad Gateway\r\n").unwrap();
            assert_eq!(status.code, 502);
            assert_eq!(status.reason, "Bad Gateway");
            assert!(!status.is_success());
        }

        #[test]
        fn accepts_missing_reason() {
            let status = parse_status_line("HTTP/1.0 204\r\n").unwrap();
            assert_eq!(status.code, 204);
            assert_eq!(status.reason, "");
            assert!(status.is_success());
        }

        #[test]
        fn rejects_non_http_prefix() {
            let err = parse_status_line("ICY 200 OK\r\n").unwrap_err();
            assert!(matches!(err, RelayError::MalformedResponse(_)));
        }

        #[test]
        fn rejects_non_numeric_code() {
            let err = parse_status_line("HTTP/1.1 abc OK\r\n").unwrap_err();
            assert!(matches!(err, RelayError::MalformedResponse(_)));
        }

        #[test]
        fn rejects_bare_version() {
            let err = parse_status_line("HTTP/1.1\r\n").unwrap_err();
            assert!(matches!(err, RelayError::MalformedResponse(_)));
        }

        #[test]
        fn three_hundreds_are_not_success() {
            let status = parse_status_line("HTTP/1.1 301 Moved Permanently").unwrap();
            assert!(!status.is_success());
        }
    }

    mod read_response_tests {
        use super::*;

        #[test]
        fn reads_status_and_drains_rest() {
            let raw = "HTTP/1.1 200 OK\r\nContent-Length: 5\r\n\r\nhello";
            let mut reader = Cursor::new(raw.as_bytes());

            let status = read_response(&mut reader).unwrap();
            assert_eq!(status.code, 200);
            // Everything after the status line was consumed.
            assert_eq!(reader.position() as usize, raw.len());
        }

        #[test]
        fn empty_stream_is_malformed() {
            let mut reader = Cursor::new(&b""[..]);
            let err = read_response(&mut reader).unwrap_err();
            assert!(matches!(err, RelayError::MalformedResponse(_)));
        }

        #[test]
        fn garbage_first_line_is_malformed() {
            let mut reader = Cursor::new(&b"not an http response\r\n"[..]);
            let err = read_response(&mut reader).unwrap_err();
            assert!(matches!(err, RelayError::MalformedResponse(_)));
        }
    }
}
