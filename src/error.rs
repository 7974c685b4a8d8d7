use thiserror::Error;

/// Errors raised while resolving configuration, before any network activity.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileRead {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid {key} value '{value}': {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },

    #[error("Unsupported proxy scheme '{0}': only http proxies are supported")]
    UnsupportedProxyScheme(String),

    #[error("Proxy URL '{0}' has no host")]
    ProxyMissingHost(String),
}

/// Errors raised by the relay exchange itself.
///
/// Every variant collapses to a single printed diagnostic at the binary
/// level; the `Display` strings are that diagnostic.
#[derive(Error, Debug)]
pub enum RelayError {
    #[error("URL '{url}' cannot be relayed: {reason}")]
    UnrelayableUrl { url: String, reason: String },

    #[error("Could not resolve proxy address {authority}: {source}")]
    Resolve {
        authority: String,
        source: std::io::Error,
    },

    #[error("Could not connect to proxy {proxy}: {source}")]
    Connect {
        proxy: String,
        source: std::io::Error,
    },

    #[error("I/O error talking to proxy: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed response from proxy: {0}")]
    MalformedResponse(String),

    #[error("Proxy answered {code} {reason}")]
    ProxyStatus { code: u16, reason: String },
}
