//! Error types for proxy validation, parsing and collection operations

use thiserror::Error;

/// All failures the crate can surface to a caller
#[derive(Debug, Error)]
pub enum ProxyError {
    /// The IP field was present but not a string (structured-record ingestion)
    #[error("invalid ip: expected a string, got {0}")]
    InvalidIpType(String),

    /// The IP string is not a strict dotted quad with octets in 0-255
    #[error("invalid ip value: {0:?} is not a dotted-quad address")]
    InvalidIpValue(String),

    /// The port was neither an integer nor a string of digits
    #[error("invalid port: {0}")]
    InvalidPortType(String),

    /// The proxy type string is not one of http, socks4, socks5
    #[error("invalid proxy type: {0:?}")]
    InvalidProxyType(String),

    /// The numeric proxy type code is outside the legacy range (1, 2, 3)
    #[error("invalid proxy type code: {0} is not in the legacy range (1, 2, 3)")]
    InvalidProxyTypeCode(i64),

    /// No built-in layout matched the line
    #[error("can not parse proxy from line {0:?}")]
    CannotParseProxy(String),

    /// A custom parser failed to produce a proxy for the line
    #[error("custom parser did not return a proxy for line {0:?}")]
    InvalidCustomParserResult(String),

    /// `Unity::remove` was called with a proxy not in the collection
    #[error("proxy not found in collection")]
    ProxyNotFound,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, ProxyError>;
