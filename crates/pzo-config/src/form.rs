//! Typed view over the effective config.
//!
//! Missing keys fall back to defaults; present keys with the wrong type are
//! errors. Environment overrides are applied through an injected lookup so
//! callers read the environment in one place.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use serde_json::Value;
use tracing::debug;

/// Comma-separated YAML paths in merge order.
pub const ENV_CONFIG_PATHS: &str = "PZO_CONFIG";
pub const ENV_DAEMON_ADDR: &str = "PZO_DAEMON_ADDR";
pub const ENV_ENDPOINT_URL: &str = "PZO_ENDPOINT_URL";

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:9009";
const DEFAULT_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_ADDR: ([u8; 4], u16) = ([127, 0, 0, 1], 9009);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormConfig {
    /// Base URL of the order-acceptance service; `/api/order` is appended.
    ///
    /// Unless set explicitly, it follows `server_addr` while the desk is
    /// enabled, so the daemon posts to its own desk.
    pub endpoint_base_url: String,
    /// Transport timeout for one submission.
    pub endpoint_timeout: Duration,
    pub server_addr: SocketAddr,
    /// Mount the local order desk at `POST /api/order`.
    pub desk_enabled: bool,
    /// Set once `/endpoint/base_url` or `PZO_ENDPOINT_URL` supplied the URL.
    endpoint_pinned: bool,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            endpoint_base_url: DEFAULT_BASE_URL.to_string(),
            endpoint_timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            server_addr: SocketAddr::from(DEFAULT_ADDR),
            desk_enabled: true,
            endpoint_pinned: false,
        }
    }
}

impl FormConfig {
    pub fn from_config_json(v: &Value) -> Result<Self> {
        let mut cfg = FormConfig::default();

        if let Some(s) = read_str(v, "/endpoint/base_url")? {
            cfg.endpoint_base_url = s.to_string();
            cfg.endpoint_pinned = true;
        }
        if let Some(ms) = read_u64(v, "/endpoint/timeout_ms")? {
            cfg.endpoint_timeout = Duration::from_millis(ms);
        }
        if let Some(s) = read_str(v, "/server/addr")? {
            cfg.server_addr = s
                .parse()
                .with_context(|| format!("/server/addr is not a socket address: {s}"))?;
        }
        if let Some(b) = read_bool(v, "/desk/enabled")? {
            cfg.desk_enabled = b;
        }

        cfg.follow_desk();
        Ok(cfg)
    }

    /// Apply `PZO_DAEMON_ADDR` and `PZO_ENDPOINT_URL` from `lookup`.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = lookup(ENV_DAEMON_ADDR) {
            self.server_addr = addr
                .trim()
                .parse()
                .with_context(|| format!("{ENV_DAEMON_ADDR} is not a socket address: {addr}"))?;
            debug!(addr = %self.server_addr, "server address overridden from env");
        }
        if let Some(url) = lookup(ENV_ENDPOINT_URL) {
            let url = url.trim();
            if !url.is_empty() {
                self.endpoint_base_url = url.to_string();
                self.endpoint_pinned = true;
                debug!(url, "endpoint overridden from env");
            }
        }
        self.follow_desk();
        Ok(self)
    }

    // Point an unpinned endpoint at the local desk on the final address.
    fn follow_desk(&mut self) {
        if self.endpoint_pinned || !self.desk_enabled {
            return;
        }
        let mut target = self.server_addr;
        if target.ip().is_unspecified() {
            target.set_ip(IpAddr::V4(Ipv4Addr::LOCALHOST));
        }
        self.endpoint_base_url = format!("http://{target}");
    }
}

/// Split a `PZO_CONFIG` value into paths, dropping empty segments.
pub fn split_config_paths(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

fn read_str<'a>(v: &'a Value, ptr: &str) -> Result<Option<&'a str>> {
    match v.pointer(ptr) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(other) => Err(anyhow!("{ptr} must be a string, got {other}")),
    }
}

fn read_u64(v: &Value, ptr: &str) -> Result<Option<u64>> {
    match v.pointer(ptr) {
        None | Some(Value::Null) => Ok(None),
        Some(n) => n
            .as_u64()
            .map(Some)
            .ok_or_else(|| anyhow!("{ptr} must be a non-negative integer, got {n}")),
    }
}

fn read_bool(v: &Value, ptr: &str) -> Result<Option<bool>> {
    match v.pointer(ptr) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(other) => Err(anyhow!("{ptr} must be a boolean, got {other}")),
    }
}
