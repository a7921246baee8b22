use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Free-form key/value metadata attached to nodes and machines.
pub type Metadata = BTreeMap<String, String>;

// ---------------------------------------------------------------------------
// Node
// ---------------------------------------------------------------------------

/// A pool-registered compute endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub address: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub metadata: Metadata,
}

impl Node {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            status: String::new(),
            metadata: Metadata::new(),
        }
    }

    pub fn pool(&self) -> Option<&str> {
        self.metadata.get("pool").map(String::as_str)
    }
}

// ---------------------------------------------------------------------------
// Machine
// ---------------------------------------------------------------------------

/// Infrastructure resource backing zero or one node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Machine {
    pub id: String,
    #[serde(default)]
    pub iaas: String,
    #[serde(default)]
    pub status: String,
    pub address: String,
    #[serde(default)]
    pub creation_params: Metadata,
}

/// The subset of a machine exposed by metadata lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineMetadata {
    pub id: String,
    pub metadata: Metadata,
}

impl From<&Machine> for MachineMetadata {
    fn from(machine: &Machine) -> Self {
        Self {
            id: machine.id.clone(),
            metadata: machine.creation_params.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Template
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateParam {
    pub name: String,
    pub value: String,
}

/// A named provisioning recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub name: String,
    #[serde(default)]
    pub iaas: String,
    #[serde(default)]
    pub params: Vec<TemplateParam>,
}

impl Template {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            iaas: String::new(),
            params: Vec::new(),
        }
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.value.as_str())
    }

    /// True when the recipe provisions nodes into `pool`.
    pub fn targets_pool(&self, pool: &str) -> bool {
        self.param("pool") == Some(pool)
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
