mod cmd;
mod connect;
mod output;

use clap::{Parser, Subcommand};
use cmd::{recycle::RecycleArgs, register::RegisterArgs};
use connect::Connection;

#[derive(Parser)]
#[command(
    name = "pool-recycle",
    about = "Replace every node of a tsuru pool with freshly provisioned ones, one at a time",
    version,
    propagate_version = true
)]
struct Cli {
    /// tsuru API endpoint
    #[arg(long, global = true, env = "TSURU_TARGET")]
    target: Option<String>,

    /// tsuru API token
    #[arg(long, global = true, env = "TSURU_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recycle every node of a pool
    Recycle(RecycleArgs),

    /// List nodes registered to a pool
    Nodes {
        /// Pool name
        #[arg(short, long)]
        pool: String,
    },

    /// List IaaS templates targeting a pool
    Templates {
        /// Pool name
        #[arg(short, long)]
        pool: String,
    },

    /// List IaaS machines
    Machines,

    /// Register an externally provisioned node in a pool
    Register(RegisterArgs),
}

fn main() {
    let cli = Cli::parse();

    // stdout carries the recycle progress; diagnostics go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let conn = Connection::new(cli.target, cli.token);

    let result = match cli.command {
        Commands::Recycle(args) => cmd::recycle::run(&conn, args, cli.json),
        Commands::Nodes { pool } => cmd::list::nodes(&conn, &pool, cli.json),
        Commands::Templates { pool } => cmd::list::templates(&conn, &pool, cli.json),
        Commands::Machines => cmd::list::machines(&conn, cli.json),
        Commands::Register(args) => cmd::register::run(&conn, args, cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
