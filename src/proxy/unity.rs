//! Ordered proxy collection with bulk ingestion and error-tolerance policy

use log::warn;
use serde_json::Value;
use std::collections::VecDeque;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::ops::Index;
use std::path::Path;

use crate::error::{ProxyError, Result};
use crate::proxy::models::{Proxy, ProxyType};
use crate::proxy::parser::{self, LineParser};
use crate::proxy::validator;

/// An ordered collection of proxies.
///
/// Insertion order is preserved and duplicates are allowed. The error
/// tolerance policy and the optional custom line parser are fixed at
/// construction. When tolerance is on, failed adds are logged and swallowed;
/// either way a failed add never grows the collection.
///
/// `Unity` is plain single-threaded state; callers needing concurrent access
/// must serialize externally.
pub struct Unity {
    proxies: Vec<Proxy>,
    ignore_parse_errors: bool,
    custom_parser: Option<Box<LineParser>>,
}

impl Default for Unity {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Unity {
    /// Create an empty collection with the given tolerance policy.
    pub fn new(ignore_parse_errors: bool) -> Self {
        Self {
            proxies: Vec::new(),
            ignore_parse_errors,
            custom_parser: None,
        }
    }

    /// Create an empty collection whose line parsing is delegated entirely to
    /// `parser`; the built-in layouts are never attempted.
    pub fn with_parser(
        ignore_parse_errors: bool,
        parser: impl Fn(&str) -> Option<Proxy> + Send + Sync + 'static,
    ) -> Self {
        Self {
            proxies: Vec::new(),
            ignore_parse_errors,
            custom_parser: Some(Box::new(parser)),
        }
    }

    /// Parse a line and append the result.
    pub fn add_by_line(&mut self, line: &str, proxy_type: ProxyType) -> Result<()> {
        let parsed = match &self.custom_parser {
            Some(custom) => parser::parse_line_with(line, custom.as_ref()),
            None => parser::parse_line(line, proxy_type),
        };
        self.push_guarded("add_by_line", parsed)
    }

    /// Construct a proxy from explicit field values and append it.
    pub fn add_by_values(
        &mut self,
        ip: &str,
        port: u32,
        proxy_type: ProxyType,
        login: Option<&str>,
        password: Option<&str>,
    ) -> Result<()> {
        let built = Proxy::new(ip, port, proxy_type).map(|mut proxy| {
            proxy.set_login(login.map(str::to_string));
            proxy.set_password(password.map(str::to_string));
            proxy
        });
        self.push_guarded("add_by_values", built)
    }

    /// Remove the first proxy equal to `proxy`.
    pub fn remove(&mut self, proxy: &Proxy) -> Result<()> {
        match self.proxies.iter().position(|p| p == proxy) {
            Some(index) => {
                self.proxies.remove(index);
                Ok(())
            }
            None => Err(ProxyError::ProxyNotFound),
        }
    }

    pub fn len(&self) -> usize {
        self.proxies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proxies.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Proxy> {
        self.proxies.get(index)
    }

    /// Iterate over the proxies in insertion order. Each call yields a fresh
    /// iterator, so an exhausted iteration can simply be restarted.
    pub fn iter(&self) -> std::slice::Iter<'_, Proxy> {
        self.proxies.iter()
    }

    /// Ingest one line per read until the source is exhausted.
    ///
    /// Blank and `#`-comment lines are skipped; anything else goes through
    /// [`add_by_line`](Self::add_by_line) and the tolerance policy.
    pub fn load_reader<R: BufRead>(&mut self, reader: R, proxy_type: ProxyType) -> Result<()> {
        for line in reader.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            self.add_by_line(line, proxy_type)?;
        }
        Ok(())
    }

    /// Ingest a text file, one proxy line at a time.
    pub fn load_txt_file<P: AsRef<Path>>(&mut self, path: P, proxy_type: ProxyType) -> Result<()> {
        let file = File::open(path)?;
        self.load_reader(BufReader::new(file), proxy_type)
    }

    /// Ingest a JSON file holding an array of proxy records.
    pub fn load_json_file<P: AsRef<Path>>(&mut self, path: P, proxy_type: ProxyType) -> Result<()> {
        let content = std::fs::read_to_string(path)?;
        let records: Vec<Value> = serde_json::from_str(&content)?;
        self.load_records(&records, proxy_type)
    }

    /// Ingest structured records with keys `ip`, `port`, `username` or
    /// `login`, and `password`. `username` wins when both credential keys are
    /// present. Per-record failures go through the tolerance policy.
    pub fn load_records(&mut self, records: &[Value], proxy_type: ProxyType) -> Result<()> {
        for record in records {
            let built = Self::record_to_proxy(record, proxy_type);
            self.push_guarded("load_records", built)?;
        }
        Ok(())
    }

    /// Export a deep copy of the proxies, in order.
    ///
    /// Mutating an exported proxy never affects the one still held here.
    pub fn to_vec(&self) -> Vec<Proxy> {
        self.proxies.clone()
    }

    /// Export the proxies into a work queue, deep-copying each element.
    pub fn to_queue(&self) -> VecDeque<Proxy> {
        self.proxies.iter().cloned().collect()
    }

    fn record_to_proxy(record: &Value, proxy_type: ProxyType) -> Result<Proxy> {
        let ip = validator::ip_from_value(record.get("ip"))?;
        let port = validator::port_from_value(record.get("port"))?;
        // a username that is missing or not usable as a string falls back to
        // the login key
        let login = record
            .get("username")
            .and_then(Value::as_str)
            .or_else(|| record.get("login").and_then(Value::as_str));
        let password = record.get("password").and_then(Value::as_str);

        let mut proxy = Proxy::new(ip, port, proxy_type)?;
        proxy.set_login(login.map(str::to_string));
        proxy.set_password(password.map(str::to_string));
        Ok(proxy)
    }

    // The single place where errors may be absorbed.
    fn push_guarded(&mut self, operation: &str, built: Result<Proxy>) -> Result<()> {
        match built {
            Ok(proxy) => {
                self.proxies.push(proxy);
                Ok(())
            }
            Err(err) if self.ignore_parse_errors => {
                warn!("ignored error in {operation}: {err}");
                Ok(())
            }
            Err(err) => Err(err),
        }
    }
}

impl Index<usize> for Unity {
    type Output = Proxy;

    fn index(&self, index: usize) -> &Proxy {
        &self.proxies[index]
    }
}

impl<'a> IntoIterator for &'a Unity {
    type Item = &'a Proxy;
    type IntoIter = std::slice::Iter<'a, Proxy>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Debug for Unity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Unity")
            .field("proxies", &self.proxies)
            .field("ignore_parse_errors", &self.ignore_parse_errors)
            .field("custom_parser", &self.custom_parser.as_ref().map(|_| ".."))
            .finish()
    }
}
