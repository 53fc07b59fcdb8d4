//! Proxy module for validating, parsing and collecting proxies
//!
//! This module provides functionality for:
//! - Validating IP, port and proxy type fields
//! - Inferring the layout of raw proxy lines (IP:PORT, USER:PASS@IP:PORT, etc.)
//! - Collecting proxies with bulk ingestion and an error-tolerance policy
//! - Shaping proxies into the configuration formats of downstream clients

pub mod models;
pub mod parser;
pub mod unity;
pub mod validator;

pub use models::{ClientConfig, Proxy, ProxyType};
pub use parser::{parse_line, parse_line_with, LineParser};
pub use unity::Unity;
