use crate::connect::Connection;
use crate::output::{print_json, print_line};
use anyhow::Context;
use clap::Args;
use recycle_core::config::{DEFAULT_NODE_PORT, DEFAULT_NODE_SCHEME};
use recycle_core::register_node;

#[derive(Args)]
pub struct RegisterArgs {
    /// Pool the node joins
    #[arg(short, long)]
    pub pool: String,

    /// Host name or IP of the node
    #[arg(long)]
    pub host: String,

    /// Docker API port
    #[arg(short = 'P', long, default_value_t = DEFAULT_NODE_PORT)]
    pub docker_port: u16,

    /// Docker API scheme
    #[arg(
        short = 's',
        long,
        default_value = DEFAULT_NODE_SCHEME,
        value_parser = ["http", "https"]
    )]
    pub docker_scheme: String,

    /// Copy metadata from this existing node
    #[arg(long)]
    pub like: Option<String>,
}

pub fn run(conn: &Connection, args: RegisterArgs, json: bool) -> anyhow::Result<()> {
    let client = conn.client()?;
    let address = register_node(
        &client,
        &args.pool,
        &args.host,
        &args.docker_scheme,
        args.docker_port,
        args.like.as_deref(),
    )
    .with_context(|| format!("failed to register {} in pool \"{}\"", args.host, args.pool))?;

    if json {
        print_json(&serde_json::json!({
            "pool": args.pool,
            "address": address.to_string(),
        }))?;
    } else {
        print_line(&format!(
            "Node {address} registered in pool \"{}\"",
            args.pool
        ))?;
    }
    Ok(())
}
