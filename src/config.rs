//! Configuration resolution.
//!
//! Defaults reproduce the fixed endpoints of the transfer exactly; the
//! optional config file, `UTUSAN_*` environment variables and CLI flags
//! override them in that order.

use std::path::Path;
use std::time::Duration;

use url::Url;

use crate::error::ConfigError;

const DEFAULT_CONFIG_PATH: &str = "/etc/utusan.conf";
const DEFAULT_LOG_FILTER: &str = "utusan=error";

/// Target requested when nothing overrides it.
pub const DEFAULT_TARGET_URL: &str = "coap://[::1]/";
/// Proxy relayed through when nothing overrides it.
pub const DEFAULT_PROXY_URL: &str = "http://0.0.0.0:8000";

/// Resolved settings for one invocation.
#[derive(Debug, Clone)]
pub struct Config {
    pub target: Url,
    pub proxy: Url,
    /// Timeout for establishing the proxy connection. None blocks
    /// indefinitely.
    pub connect_timeout: Option<Duration>,
    /// Timeout for socket reads and writes. None blocks indefinitely.
    pub io_timeout: Option<Duration>,
    pub log_filter: String,
}

/// Values passed on the command line. These win over the config file
/// and the environment.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub target: Option<String>,
    pub proxy: Option<String>,
    pub connect_timeout_secs: Option<u64>,
    pub io_timeout_secs: Option<u64>,
}

impl Config {
    /// Resolve configuration from defaults, the optional key=value
    /// config file, environment variables and CLI overrides, in that
    /// order. A missing config file is not an error.
    pub fn load(cli: &Overrides) -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("UTUSAN_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let mut target = DEFAULT_TARGET_URL.to_string();
        let mut proxy = DEFAULT_PROXY_URL.to_string();
        let mut connect_timeout_secs: Option<u64> = None;
        let mut io_timeout_secs: Option<u64> = None;
        let mut log_filter = DEFAULT_LOG_FILTER.to_string();

        if Path::new(&config_path).exists() {
            let content = std::fs::read_to_string(&config_path).map_err(|source| {
                ConfigError::FileRead {
                    path: config_path.clone(),
                    source,
                }
            })?;
            for line in content.lines() {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }
                if let Some((key, value)) = line.split_once('=') {
                    let key = key.trim();
                    let value = value.trim();
                    match key {
                        "target" => target = value.to_string(),
                        "proxy" => proxy = value.to_string(),
                        "connect_timeout_secs" => {
                            connect_timeout_secs = Some(parse_secs(key, value)?);
                        }
                        "io_timeout_secs" => {
                            io_timeout_secs = Some(parse_secs(key, value)?);
                        }
                        "log_filter" => log_filter = value.to_string(),
                        _ => {}
                    }
                }
            }
        }

        // Environment overrides
        if let Ok(val) = std::env::var("UTUSAN_TARGET") {
            target = val;
        }
        if let Ok(val) = std::env::var("UTUSAN_PROXY") {
            proxy = val;
        }

        // CLI overrides win last
        if let Some(val) = &cli.target {
            target = val.clone();
        }
        if let Some(val) = &cli.proxy {
            proxy = val.clone();
        }
        if let Some(val) = cli.connect_timeout_secs {
            connect_timeout_secs = Some(val);
        }
        if let Some(val) = cli.io_timeout_secs {
            io_timeout_secs = Some(val);
        }

        let target = parse_url(&target)?;
        let proxy = parse_url(&proxy)?;
        validate_proxy(&proxy)?;

        Ok(Config {
            target,
            proxy,
            connect_timeout: connect_timeout_secs.map(Duration::from_secs),
            io_timeout: io_timeout_secs.map(Duration::from_secs),
            log_filter,
        })
    }
}

fn parse_secs(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        reason: "expected a whole number of seconds".to_string(),
    })
}

fn parse_url(value: &str) -> Result<Url, ConfigError> {
    Url::parse(value).map_err(|source| ConfigError::InvalidUrl {
        url: value.to_string(),
        source,
    })
}

/// The relay speaks plain HTTP to the proxy; anything else is refused
/// before a socket is opened.
fn validate_proxy(proxy: &Url) -> Result<(), ConfigError> {
    if proxy.scheme() != "http" {
        return Err(ConfigError::UnsupportedProxyScheme(proxy.scheme().to_string()));
    }
    if proxy.host_str().is_none() {
        return Err(ConfigError::ProxyMissingHost(proxy.to_string()));
    }
    Ok(())
}
