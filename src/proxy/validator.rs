//! Field-level validation for IP addresses, ports and structured record values

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::error::{ProxyError, Result};

/// Strict dotted-quad pattern, octets 0-255, no leading zeros, no trailing
/// segments
static IP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(25[0-5]|2[0-4][0-9]|1[0-9]{2}|[1-9]?[0-9])(\.(25[0-5]|2[0-4][0-9]|1[0-9]{2}|[1-9]?[0-9])){3}$")
        .expect("ip regex is valid")
});

/// Check that `ip` is a strict four-octet dotted-decimal address.
pub fn validate_ip(ip: &str) -> Result<()> {
    if !IP_REGEX.is_match(ip) {
        return Err(ProxyError::InvalidIpValue(ip.to_string()));
    }
    Ok(())
}

/// Parse a port given as a string of digits.
pub fn parse_port(port: &str) -> Result<u32> {
    if port.is_empty() || !port.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ProxyError::InvalidPortType(format!(
            "expected digits, got {port:?}"
        )));
    }
    port.parse::<u32>()
        .map_err(|_| ProxyError::InvalidPortType(format!("port {port:?} is out of range")))
}

/// Extract the IP field from a structured record value.
///
/// Only a JSON string is acceptable; a missing or differently typed value is
/// an `InvalidIpType`.
pub fn ip_from_value(value: Option<&Value>) -> Result<&str> {
    match value {
        Some(Value::String(ip)) => Ok(ip),
        Some(other) => Err(ProxyError::InvalidIpType(json_kind(other).to_string())),
        None => Err(ProxyError::InvalidIpType("nothing".to_string())),
    }
}

/// Extract the port field from a structured record value.
///
/// Accepts a JSON non-negative integer or a string of digits, matching the
/// string-or-int contract of [`parse_port`].
pub fn port_from_value(value: Option<&Value>) -> Result<u32> {
    match value {
        Some(Value::Number(n)) => {
            let port = n
                .as_u64()
                .ok_or_else(|| ProxyError::InvalidPortType(format!("got {n}")))?;
            u32::try_from(port)
                .map_err(|_| ProxyError::InvalidPortType(format!("port {port} is out of range")))
        }
        Some(Value::String(s)) => parse_port(s),
        Some(other) => Err(ProxyError::InvalidPortType(format!(
            "expected integer or string, got {}",
            json_kind(other)
        ))),
        None => Err(ProxyError::InvalidPortType("expected integer or string, got nothing".to_string())),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a bool",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validate_ip_accepts_valid_quads() {
        for ip in ["0.0.0.0", "127.0.0.1", "255.255.255.255", "1.2.3.4", "192.168.100.200"] {
            assert!(validate_ip(ip).is_ok(), "{ip} should be accepted");
        }
    }

    #[test]
    fn test_validate_ip_rejects_octet_over_255() {
        for ip in ["256.0.0.1", "1.2.3.999", "300.300.300.300"] {
            assert!(matches!(validate_ip(ip), Err(ProxyError::InvalidIpValue(_))), "{ip}");
        }
    }

    #[test]
    fn test_validate_ip_rejects_wrong_segment_count() {
        for ip in ["1.2.3", "1.2.3.4.5", "1.2.3.4.", ".1.2.3.4", "1..2.3"] {
            assert!(validate_ip(ip).is_err(), "{ip}");
        }
    }

    #[test]
    fn test_validate_ip_rejects_non_numeric() {
        for ip in ["invalid", "a.b.c.d", "1.2.3.x", ""] {
            assert!(validate_ip(ip).is_err(), "{ip:?}");
        }
    }

    #[test]
    fn test_parse_port() {
        assert_eq!(parse_port("8080").unwrap(), 8080);
        assert_eq!(parse_port("0").unwrap(), 0);
        assert!(matches!(parse_port(""), Err(ProxyError::InvalidPortType(_))));
        assert!(matches!(parse_port("80a"), Err(ProxyError::InvalidPortType(_))));
        assert!(matches!(parse_port("-1"), Err(ProxyError::InvalidPortType(_))));
        assert!(matches!(parse_port("99999999999999"), Err(ProxyError::InvalidPortType(_))));
    }

    #[test]
    fn test_ip_from_value() {
        let ip = json!("10.0.0.1");
        assert_eq!(ip_from_value(Some(&ip)).unwrap(), "10.0.0.1");
        let not_a_string = json!(42);
        assert!(matches!(
            ip_from_value(Some(&not_a_string)),
            Err(ProxyError::InvalidIpType(_))
        ));
        assert!(matches!(ip_from_value(None), Err(ProxyError::InvalidIpType(_))));
    }

    #[test]
    fn test_port_from_value() {
        assert_eq!(port_from_value(Some(&json!(8080))).unwrap(), 8080);
        assert_eq!(port_from_value(Some(&json!("8080"))).unwrap(), 8080);
        assert!(matches!(
            port_from_value(Some(&json!(-1))),
            Err(ProxyError::InvalidPortType(_))
        ));
        assert!(matches!(
            port_from_value(Some(&json!([1, 2]))),
            Err(ProxyError::InvalidPortType(_))
        ));
        assert!(matches!(port_from_value(None), Err(ProxyError::InvalidPortType(_))));
    }
}
