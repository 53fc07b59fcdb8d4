//! Layout inference for proxy list lines
//!
//! Proxy sources emit one endpoint per line in a handful of common shapes
//! with inconsistent separators. The parser tries an ordered list of layout
//! candidates and takes the first one that both matches the line and yields a
//! valid [`Proxy`].

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{ProxyError, Result};
use crate::proxy::models::{Proxy, ProxyType};
use crate::proxy::validator;

/// A caller-supplied replacement for the built-in layouts.
///
/// Returning `None` means the parser could not produce a proxy for the line
/// and surfaces as [`ProxyError::InvalidCustomParserResult`].
pub type LineParser = dyn Fn(&str) -> Option<Proxy> + Send + Sync;

// Separators between any two fields may differ within one line.
const SEP: &str = r"[:;@,]";
const IP: &str = r"(\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3})";
const PORT: &str = r"(\d+)";
const WORD: &str = r"(\w+)";

static CREDS_FIRST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("{WORD}{SEP}{WORD}{SEP}{IP}{SEP}{PORT}")).expect("layout regex is valid")
});

static IP_FIRST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("{IP}{SEP}{PORT}{SEP}{WORD}{SEP}{WORD}")).expect("layout regex is valid")
});

static BARE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("{IP}{SEP}{PORT}")).expect("layout regex is valid")
});

/// Field order of a layout candidate's capture groups
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldOrder {
    /// `login SEP password SEP ip SEP port`
    CredsFirst,
    /// `ip SEP port SEP login SEP password`
    IpFirst,
    /// `ip SEP port`, no credentials
    Bare,
}

fn layouts() -> [(&'static Regex, FieldOrder); 3] {
    [
        (&*CREDS_FIRST, FieldOrder::CredsFirst),
        (&*IP_FIRST, FieldOrder::IpFirst),
        (&*BARE, FieldOrder::Bare),
    ]
}

/// Parse a single proxy line by trying each built-in layout in order.
///
/// The line carries no scheme information, so `default_type` is assigned to
/// the result. Fails with [`ProxyError::CannotParseProxy`] when no layout
/// matches.
pub fn parse_line(line: &str, default_type: ProxyType) -> Result<Proxy> {
    for (pattern, order) in layouts() {
        if let Some(proxy) = try_layout(line, pattern, order, default_type) {
            return Ok(proxy);
        }
    }
    Err(ProxyError::CannotParseProxy(line.trim().to_string()))
}

/// Parse a line through a caller-supplied parser; the built-in layouts are
/// never consulted.
pub fn parse_line_with(line: &str, parser: &LineParser) -> Result<Proxy> {
    parser(line).ok_or_else(|| ProxyError::InvalidCustomParserResult(line.trim().to_string()))
}

/// Attempt one layout candidate.
///
/// A pattern match whose extracted fields fail validation (an octet over 255,
/// a port out of range) counts as a miss so the next candidate gets its turn.
fn try_layout(
    line: &str,
    pattern: &Regex,
    order: FieldOrder,
    default_type: ProxyType,
) -> Option<Proxy> {
    let caps = pattern.captures(line)?;

    let (ip, port, creds) = match order {
        FieldOrder::CredsFirst => (&caps[3], &caps[4], Some((&caps[1], &caps[2]))),
        FieldOrder::IpFirst => (&caps[1], &caps[2], Some((&caps[3], &caps[4]))),
        FieldOrder::Bare => (&caps[1], &caps[2], None),
    };

    let port = validator::parse_port(port).ok()?;
    match creds {
        Some((login, password)) => {
            Proxy::with_auth(ip, port, default_type, login, password).ok()
        }
        None => Proxy::new(ip, port, default_type).ok(),
    }
}
