//! Wire types of the tsuru API and their conversion into domain types.
//!
//! tsuru serialises Go structs with their exported field names, so most
//! payloads use PascalCase keys. Missing and `null` collections are both
//! treated as empty.

use recycle_core::{Machine, Metadata, Node, Template, TemplateParam};
use serde::{Deserialize, Deserializer};

fn null_as_default<'de, D, T>(d: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Nodes
// ---------------------------------------------------------------------------

/// `GET /docker/node`. The embedded `machines` array is ignored; machine
/// lookups go through `/iaas/machines`.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct NodeList {
    #[serde(default, deserialize_with = "null_as_default")]
    pub nodes: Vec<WireNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct WireNode {
    pub address: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub metadata: Metadata,
    #[serde(default)]
    pub status: String,
}

impl From<WireNode> for Node {
    fn from(n: WireNode) -> Self {
        Node {
            address: n.address,
            status: n.status,
            metadata: n.metadata,
        }
    }
}

// ---------------------------------------------------------------------------
// Machines
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct WireMachine {
    pub id: String,
    #[serde(default)]
    pub iaas: String,
    #[serde(default)]
    pub status: String,
    pub address: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub creation_params: Metadata,
}

impl From<WireMachine> for Machine {
    fn from(m: WireMachine) -> Self {
        Machine {
            id: m.id,
            iaas: m.iaas,
            status: m.status,
            address: m.address,
            creation_params: m.creation_params,
        }
    }
}

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct WireTemplate {
    pub name: String,
    #[serde(rename = "IaaSName", default)]
    pub iaas_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Vec<WireTemplateData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct WireTemplateData {
    pub name: String,
    #[serde(default)]
    pub value: String,
}

impl From<WireTemplate> for Template {
    fn from(t: WireTemplate) -> Self {
        Template {
            name: t.name,
            iaas: t.iaas_name,
            params: t
                .data
                .into_iter()
                .map(|d| TemplateParam {
                    name: d.name,
                    value: d.value,
                })
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Move progress
// ---------------------------------------------------------------------------

/// One object of the `POST /docker/containers/move` response stream.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct MoveMessage {
    #[serde(rename = "Message", default)]
    pub message: String,
    #[serde(rename = "Error", default)]
    pub error: String,
}
