use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_MAX_RETRY: u32 = 3;
pub const DEFAULT_WAIT_SECONDS: u64 = 180;
pub const DEFAULT_NODE_SCHEME: &str = "http";
pub const DEFAULT_NODE_PORT: u16 = 4243;

// ---------------------------------------------------------------------------
// RecycleOptions
// ---------------------------------------------------------------------------

/// Parameters of one recycle run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecycleOptions {
    /// Delete the old node's machine from the IaaS after migrating.
    #[serde(default)]
    pub remove_machine_from_iaas: bool,
    /// Report the message sequence without mutating anything.
    #[serde(default)]
    pub dry_run: bool,
    #[serde(default = "default_max_retry")]
    pub max_retry: u32,
    #[serde(default = "default_wait", with = "seconds")]
    pub wait: Duration,
    /// Scheme given to node addresses reported without one.
    #[serde(default = "default_node_scheme")]
    pub node_scheme: String,
    /// Port given to node addresses reported without one.
    #[serde(default = "default_node_port")]
    pub node_port: u16,
}

fn default_max_retry() -> u32 {
    DEFAULT_MAX_RETRY
}

fn default_wait() -> Duration {
    Duration::from_secs(DEFAULT_WAIT_SECONDS)
}

fn default_node_scheme() -> String {
    DEFAULT_NODE_SCHEME.to_string()
}

fn default_node_port() -> u16 {
    DEFAULT_NODE_PORT
}

impl Default for RecycleOptions {
    fn default() -> Self {
        Self {
            remove_machine_from_iaas: false,
            dry_run: false,
            max_retry: default_max_retry(),
            wait: default_wait(),
            node_scheme: default_node_scheme(),
            node_port: default_node_port(),
        }
    }
}

mod seconds {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_secs)
    }
}
