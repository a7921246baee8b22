use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// NodeAddress
// ---------------------------------------------------------------------------

/// A fully qualified node endpoint: `scheme://host:port`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeAddress {
    pub scheme: String,
    pub host: String,
    pub port: u16,
}

static ADDRESS_RE: OnceLock<Regex> = OnceLock::new();

fn address_re() -> &'static Regex {
    ADDRESS_RE.get_or_init(|| {
        Regex::new(r"^(https?)://([A-Za-z0-9][A-Za-z0-9.\-]*):([0-9]{1,5})/?$").unwrap()
    })
}

impl NodeAddress {
    /// Parse a `scheme://host:port` string. Returns `None` for anything else.
    pub fn parse(raw: &str) -> Option<Self> {
        let caps = address_re().captures(raw.trim())?;
        let port = caps[3].parse::<u16>().ok()?;
        Some(Self {
            scheme: caps[1].to_string(),
            host: caps[2].to_string(),
            port,
        })
    }

    /// Qualify a bare `host` or `host:port` with `scheme` and `port`.
    ///
    /// Strings that already carry a scheme are returned unchanged, so a
    /// malformed URL still fails validation downstream.
    pub fn complete(raw: &str, scheme: &str, port: u16) -> String {
        let raw = raw.trim();
        if raw.contains("://") {
            return raw.to_string();
        }
        if raw.contains(':') {
            format!("{scheme}://{raw}")
        } else {
            format!("{scheme}://{raw}:{port}")
        }
    }
}

impl fmt::Display for NodeAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}:{}", self.scheme, self.host, self.port)
    }
}

// ---------------------------------------------------------------------------
// Host extraction
// ---------------------------------------------------------------------------

/// Bare host of `address`, which may be a full URL or `host[:port]`.
///
/// Nodes are registered by URL while machines are known by bare address,
/// so lookups across the two compare hosts.
pub fn host_of(address: &str) -> &str {
    let rest = match address.find("://") {
        Some(i) => &address[i + 3..],
        None => address,
    };
    let rest = rest.split('/').next().unwrap_or(rest);
    rest.split(':').next().unwrap_or(rest)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
