use std::net::IpAddr;

use chrono::{DateTime, Local};
use serde::Serialize;

/// Framework-free view of an inbound request. The HTTP layer builds one of
/// these per page view; nothing in core touches the server framework.
#[derive(Debug, Clone, Default)]
pub struct RawRequest {
    pub remote_addr: Option<IpAddr>,
    pub method: String,
    pub uri: String,
    pub query: String,
    /// Header name/value pairs in arrival order. Lookup is case-insensitive.
    pub headers: Vec<(String, String)>,
}

impl RawRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Value of one cookie from the Cookie header, if present.
    pub fn cookie(&self, name: &str) -> Option<&str> {
        let raw = self.header("cookie")?;
        raw.split(';').map(str::trim).find_map(|pair| {
            let (k, v) = pair.split_once('=')?;
            (k == name).then_some(v)
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    Http,
    Https,
}

/// The fixed set of request attributes submitted for classification.
/// Built once per page view and never mutated; both the audit log and the
/// classifier consume it. Serialized field names match the log format the
/// upstream deployment already produces.
#[derive(Debug, Clone, Serialize)]
pub struct SignalSet {
    pub timestamp: DateTime<Local>,
    #[serde(rename = "ip_address")]
    pub client_ip: String,
    pub user_agent: String,
    pub referer: String,
    pub request_uri: String,
    #[serde(rename = "request_method")]
    pub method: String,
    pub query_string: String,
    #[serde(rename = "browser_language")]
    pub accept_language: String,
    pub host: String,
    #[serde(rename = "protocol")]
    pub scheme: Scheme,
    #[serde(rename = "session_id")]
    pub session_token: String,
}
