use std::collections::HashSet;
use std::time::Duration;

use recycle_core::{
    host_of, Machine, MachineMetadata, Metadata, Node, NodeAddress, PoolGateway, ProgressStream,
    RecycleError, Template,
};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::AUTHORIZATION;
use reqwest::Url;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::config::TsuruConfig;
use crate::stream::MoveStream;
use crate::types::{NodeList, WireMachine, WireTemplate};
use crate::{Result, TsuruError};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

// ─── TsuruClient ──────────────────────────────────────────────────────────

/// Blocking tsuru API client.
///
/// The underlying HTTP client has no overall timeout because container
/// moves stream for as long as the migration runs; every other request gets
/// [`TsuruConfig::request_timeout`].
pub struct TsuruClient {
    config: TsuruConfig,
    http: Client,
}

impl TsuruClient {
    pub fn new(config: TsuruConfig) -> Result<Self> {
        let http = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(None::<Duration>)
            .build()?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &TsuruConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.target(), path)
    }

    /// `base` with `segments` appended, each percent-encoded as one segment.
    fn url_with_segments(&self, path: &str, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.url(path))
            .map_err(|_| TsuruError::InvalidTarget(self.config.target().to_string()))?;
        url.path_segments_mut()
            .map_err(|_| TsuruError::InvalidTarget(self.config.target().to_string()))?
            .extend(segments);
        Ok(url)
    }

    fn send(&self, req: RequestBuilder) -> Result<Response> {
        let resp = req
            .header(AUTHORIZATION, format!("bearer {}", self.config.token()))
            .send()?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(TsuruError::Status {
                status: status.as_u16(),
                body: body.trim().to_string(),
            });
        }
        Ok(resp)
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str, what: &'static str) -> Result<T> {
        debug!(path, "GET");
        let req = self
            .http
            .get(self.url(path))
            .timeout(self.config.request_timeout);
        let body = self.send(req)?.text()?;
        serde_json::from_str(&body).map_err(|source| TsuruError::Decode { what, source })
    }

    fn node_list(&self) -> Result<NodeList> {
        let value: serde_json::Value = self.get_json("/docker/node", "node list")?;
        // Older API versions answer with a bare array when nothing is registered.
        if !value.is_object() {
            return Ok(NodeList::default());
        }
        serde_json::from_value(value).map_err(|source| TsuruError::Decode {
            what: "node list",
            source,
        })
    }

    fn all_nodes(&self) -> Result<Vec<Node>> {
        Ok(self.node_list()?.nodes.into_iter().map(Node::from).collect())
    }

    fn machines(&self) -> Result<Vec<Machine>> {
        let machines: Vec<WireMachine> = self.get_json("/iaas/machines", "machine list")?;
        Ok(machines.into_iter().map(Machine::from).collect())
    }

    fn templates(&self) -> Result<Vec<Template>> {
        let templates: Vec<WireTemplate> = self.get_json("/iaas/templates", "template list")?;
        Ok(templates.into_iter().map(Template::from).collect())
    }

    fn post_node(&self, register: bool, form: &[(String, String)]) -> Result<()> {
        let req = self
            .http
            .post(self.url("/docker/node"))
            .query(&[("register", if register { "true" } else { "false" })])
            .form(form)
            .timeout(self.config.request_timeout);
        self.send(req)?;
        Ok(())
    }

    fn pool_nodes(&self, pool: &str) -> Result<Vec<Node>> {
        Ok(self
            .all_nodes()?
            .into_iter()
            .filter(|n| n.pool() == Some(pool))
            .collect())
    }

    fn find_machine(&self, address: &str) -> Result<Option<Machine>> {
        let host = host_of(address);
        Ok(self.machines()?.into_iter().find(|m| m.address == host))
    }
}

/// Address present in `after` but not in `before`.
pub(crate) fn find_new_node(before: &[Node], after: &[Node]) -> Option<String> {
    let known: HashSet<&str> = before.iter().map(|n| n.address.as_str()).collect();
    let mut added = after
        .iter()
        .map(|n| n.address.as_str())
        .filter(|a| !known.contains(a));
    let first = added.next()?.to_string();
    if let Some(other) = added.next() {
        info!(node = %first, other, "more than one node appeared while provisioning");
    }
    Some(first)
}

// ─── PoolGateway ──────────────────────────────────────────────────────────

impl PoolGateway for TsuruClient {
    fn list_nodes(&self, pool: &str) -> recycle_core::Result<Vec<Node>> {
        self.pool_nodes(pool)
            .map_err(|e| RecycleError::Backend(format!("Error getting nodes: {e}")))
    }

    fn list_machines(&self) -> recycle_core::Result<Vec<Machine>> {
        self.machines()
            .map_err(|e| RecycleError::Backend(format!("Error getting machines: {e}")))
    }

    fn list_templates(&self, pool: &str) -> recycle_core::Result<Vec<Template>> {
        let templates = self
            .templates()
            .map_err(|e| RecycleError::Backend(format!("Error getting machines templates: {e}")))?;
        Ok(templates
            .into_iter()
            .filter(|t| t.targets_pool(pool))
            .collect())
    }

    fn create_node(&self, pool: &str, template: &Template) -> recycle_core::Result<String> {
        let provision = || -> Result<Option<String>> {
            let before = self.all_nodes()?;
            self.post_node(
                false,
                &[
                    ("template".to_string(), template.name.clone()),
                    ("pool".to_string(), pool.to_string()),
                ],
            )?;
            let after = self.all_nodes()?;
            Ok(find_new_node(&before, &after))
        };
        match provision() {
            Ok(Some(address)) => Ok(address),
            Ok(None) => Err(RecycleError::NewNodeProvision(format!(
                "no new node registered on pool \"{pool}\" using template {template}"
            ))),
            Err(e) => Err(RecycleError::NewNodeProvision(e.to_string())),
        }
    }

    fn add_node(
        &self,
        pool: &str,
        address: &NodeAddress,
        metadata: &Metadata,
    ) -> recycle_core::Result<()> {
        let mut form: Vec<(String, String)> = metadata
            .iter()
            .filter(|(k, _)| !matches!(k.as_str(), "address" | "pool" | "register"))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        form.push(("address".to_string(), address.to_string()));
        form.push(("pool".to_string(), pool.to_string()));
        form.push(("register".to_string(), "true".to_string()));
        self.post_node(true, &form)
            .map_err(|e| RecycleError::Registration(e.to_string()))
    }

    fn deregister_node(&self, address: &str) -> recycle_core::Result<()> {
        let deregister = || -> Result<()> {
            let url = self.url_with_segments("/docker/node", &[address])?;
            debug!(%url, "DELETE");
            self.send(self.http.delete(url).timeout(self.config.request_timeout))?;
            Ok(())
        };
        deregister().map_err(|e| RecycleError::NodeDeregistration(e.to_string()))
    }

    fn decommission_machine(&self, address: &str) -> recycle_core::Result<()> {
        let machine = self
            .find_machine(address)
            .map_err(|e| RecycleError::MachineDecommission(e.to_string()))?
            .ok_or_else(|| {
                RecycleError::MachineDecommission(format!(
                    "machine {} not found on IaaS",
                    host_of(address)
                ))
            })?;
        let delete = || -> Result<()> {
            let url = self.url_with_segments("/iaas/machines", &[&machine.id])?;
            debug!(%url, "DELETE");
            self.send(self.http.delete(url).timeout(self.config.request_timeout))?;
            Ok(())
        };
        delete().map_err(|e| RecycleError::MachineDecommission(e.to_string()))
    }

    fn move_containers(
        &self,
        from: &NodeAddress,
        to: &NodeAddress,
    ) -> recycle_core::Result<ProgressStream<'_>> {
        debug!(from = %from, to = %to, "POST /docker/containers/move");
        let req = self
            .http
            .post(self.url("/docker/containers/move"))
            .form(&[("from", from.host.as_str()), ("to", to.host.as_str())]);
        let resp = self
            .send(req)
            .map_err(|e| RecycleError::Backend(format!("Error moving containers: {e}")))?;
        Ok(Box::new(MoveStream::new(resp)))
    }

    fn node_metadata(&self, address: &str) -> recycle_core::Result<Option<Metadata>> {
        let host = host_of(address);
        let nodes = self
            .all_nodes()
            .map_err(|e| RecycleError::Backend(format!("Error getting nodes: {e}")))?;
        Ok(nodes
            .into_iter()
            .find(|n| host_of(&n.address) == host)
            .map(|n| n.metadata))
    }

    fn machine_metadata(&self, address: &str) -> recycle_core::Result<Option<MachineMetadata>> {
        let machine = self
            .find_machine(address)
            .map_err(|e| RecycleError::Backend(format!("Error getting machines: {e}")))?;
        Ok(machine.as_ref().map(MachineMetadata::from))
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────
