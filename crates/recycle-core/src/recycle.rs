//! Pool-level replace loop.
//!
//! Every node present when the run starts is replaced exactly once, in
//! snapshot order, and the next node is not touched until the previous one
//! has been fully provisioned, deregistered, migrated and (optionally)
//! decommissioned. The first error aborts the run; nothing already done is
//! rolled back. Re-running against the new node snapshot is the recovery
//! path.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::address::NodeAddress;
use crate::classifier::LineClassifier;
use crate::config::RecycleOptions;
use crate::error::{RecycleError, Result};
use crate::gateway::PoolGateway;
use crate::migrate::ContainerMigrator;
use crate::report::{Pause, Reporter};

// ---------------------------------------------------------------------------
// RecycleStep / RecycleSummary
// ---------------------------------------------------------------------------

/// What happened to one original node.
#[derive(Debug, Clone, Serialize)]
pub struct RecycleStep {
    pub old_address: String,
    pub template: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_address: Option<String>,
    /// Attempts the migration took; `None` in dry runs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub migration_attempts: Option<u32>,
    pub decommissioned: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecycleSummary {
    pub pool: String,
    pub dry_run: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub steps: Vec<RecycleStep>,
}

impl RecycleSummary {
    pub fn recycled(&self) -> usize {
        self.steps.len()
    }
}

// ---------------------------------------------------------------------------
// RecycleOrchestrator
// ---------------------------------------------------------------------------

pub struct RecycleOrchestrator<'a> {
    gateway: &'a dyn PoolGateway,
    classifier: &'a dyn LineClassifier,
    pause: &'a dyn Pause,
}

impl<'a> RecycleOrchestrator<'a> {
    pub fn new(
        gateway: &'a dyn PoolGateway,
        classifier: &'a dyn LineClassifier,
        pause: &'a dyn Pause,
    ) -> Self {
        Self {
            gateway,
            classifier,
            pause,
        }
    }

    /// Replace every node currently in `pool`.
    pub fn recycle(
        &self,
        pool: &str,
        opts: &RecycleOptions,
        out: &mut dyn Reporter,
    ) -> Result<RecycleSummary> {
        let started_at = Utc::now();

        // Snapshot once: replacement nodes must never be recycled in the same run.
        let nodes: Vec<String> = self
            .gateway
            .list_nodes(pool)?
            .into_iter()
            .map(|n| n.address)
            .collect();
        let templates = self.gateway.list_templates(pool)?;
        if templates.is_empty() {
            return Err(RecycleError::NoTemplates {
                pool: pool.to_string(),
            });
        }

        info!(
            pool,
            nodes = nodes.len(),
            templates = templates.len(),
            dry_run = opts.dry_run,
            "starting pool recycle"
        );

        let migrator = ContainerMigrator::new(
            self.gateway,
            self.classifier,
            self.pause,
            opts.max_retry,
            opts.wait,
        );

        let mut steps = Vec::with_capacity(nodes.len());
        for (index, old_address) in nodes.iter().enumerate() {
            let template = &templates[index % templates.len()];

            out.progress(&format!(
                "Creating new node on pool \"{pool}\" using \"{template}\" template"
            ))?;

            if opts.dry_run {
                out.progress(&format!(
                    "Removing node \"{old_address}\" from pool \"{pool}\""
                ))?;
                out.progress(&format!(
                    "Moving all containers on old node \"{old_address}\" to new node"
                ))?;
                out.progress("")?;
                steps.push(RecycleStep {
                    old_address: old_address.clone(),
                    template: template.name.clone(),
                    new_address: None,
                    migration_attempts: None,
                    decommissioned: false,
                });
                continue;
            }

            let new_address = self.gateway.create_node(pool, template)?;
            info!(pool, template = %template, node = %new_address, "new node created");

            out.progress(&format!(
                "Removing node \"{old_address}\" from pool \"{pool}\""
            ))?;
            self.gateway.deregister_node(old_address)?;

            out.progress(&format!(
                "Moving all containers from old node \"{old_address}\" to new node \"{new_address}\""
            ))?;
            let source = NodeAddress::complete(old_address, &opts.node_scheme, opts.node_port);
            let dest = NodeAddress::complete(&new_address, &opts.node_scheme, opts.node_port);
            let attempt = migrator.migrate(&source, &dest, out).inspect_err(|e| {
                debug!(pool, node = %old_address, error = %e, "aborting recycle");
            })?;

            let decommissioned = opts.remove_machine_from_iaas;
            if decommissioned {
                self.gateway.decommission_machine(old_address)?;
                out.progress(&format!("Machine {old_address} removed from IaaS"))?;
            }
            out.progress("")?;

            steps.push(RecycleStep {
                old_address: old_address.clone(),
                template: template.name.clone(),
                new_address: Some(new_address),
                migration_attempts: Some(attempt.index + 1),
                decommissioned,
            });
        }

        info!(pool, recycled = steps.len(), "pool recycle finished");
        Ok(RecycleSummary {
            pool: pool.to_string(),
            dry_run: opts.dry_run,
            started_at,
            finished_at: Utc::now(),
            steps,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
