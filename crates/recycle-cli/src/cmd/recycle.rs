use crate::connect::Connection;
use crate::output::print_json;
use anyhow::Context;
use clap::Args;
use recycle_core::config::{
    DEFAULT_MAX_RETRY, DEFAULT_NODE_PORT, DEFAULT_NODE_SCHEME, DEFAULT_WAIT_SECONDS,
};
use recycle_core::{MarkerClassifier, RecycleOptions, RecycleOrchestrator, StdReporter, ThreadPause};
use std::time::Duration;
use tracing::info;

#[derive(Args)]
pub struct RecycleArgs {
    /// Pool whose nodes are replaced
    #[arg(short, long)]
    pub pool: String,

    /// Also destroy the old machines on the IaaS
    #[arg(short = 'r', long)]
    pub remove_from_iaas: bool,

    /// Print the plan without touching the pool
    #[arg(short, long)]
    pub dry_run: bool,

    /// Retries allowed when moving containers off a node
    #[arg(short, long, default_value_t = DEFAULT_MAX_RETRY)]
    pub max_retry: u32,

    /// Seconds to wait between container move retries
    #[arg(short = 't', long = "timeout", default_value_t = DEFAULT_WAIT_SECONDS)]
    pub wait: u64,

    /// Docker API port used for nodes registered without one
    #[arg(short = 'P', long, default_value_t = DEFAULT_NODE_PORT)]
    pub docker_port: u16,

    /// Docker API scheme used for nodes registered without one
    #[arg(
        short = 's',
        long,
        default_value = DEFAULT_NODE_SCHEME,
        value_parser = ["http", "https"]
    )]
    pub docker_scheme: String,
}

impl RecycleArgs {
    fn options(&self) -> RecycleOptions {
        RecycleOptions {
            remove_machine_from_iaas: self.remove_from_iaas,
            dry_run: self.dry_run,
            max_retry: self.max_retry,
            wait: Duration::from_secs(self.wait),
            node_scheme: self.docker_scheme.clone(),
            node_port: self.docker_port,
        }
    }
}

pub fn run(conn: &Connection, args: RecycleArgs, json: bool) -> anyhow::Result<()> {
    let client = conn.client()?;
    let opts = args.options();

    let classifier = MarkerClassifier::default();
    let pause = ThreadPause;
    let mut reporter = StdReporter;

    let summary = RecycleOrchestrator::new(&client, &classifier, &pause)
        .recycle(&args.pool, &opts, &mut reporter)
        .with_context(|| format!("failed to recycle pool \"{}\"", args.pool))?;

    info!(
        pool = %summary.pool,
        recycled = summary.recycled(),
        dry_run = summary.dry_run,
        "recycle finished"
    );

    if json {
        print_json(&summary)?;
    }
    Ok(())
}
