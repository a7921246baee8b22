//! `tsuru-client`: blocking driver for the tsuru pool-management API.
//!
//! Implements [`recycle_core::PoolGateway`] over HTTP so the recycle
//! workflow can list, provision, deregister and decommission nodes and
//! stream container moves.
//!
//! # Architecture
//!
//! ```text
//! TsuruConfig     ← target + bearer token, validated once
//!     │
//!     ▼
//! TsuruClient     ← reqwest blocking client, one request per gateway call
//!     │              (list/create/remove nodes, machines, templates)
//!     ▼
//! MoveStream      ← implements Iterator<Item = Result<String>>
//!                    decodes the move response body lazily
//! ```
//!
//! # Quick start
//!
//! ```rust,ignore
//! use recycle_core::PoolGateway;
//! use tsuru_client::{TsuruClient, TsuruConfig};
//!
//! let client = TsuruClient::new(TsuruConfig::from_env()?)?;
//! for node in client.list_nodes("foobar")? {
//!     println!("{}", node.address);
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod stream;

mod types;

pub use client::TsuruClient;
pub use config::TsuruConfig;
pub use error::TsuruError;
pub use stream::MoveStream;

/// Convenience `Result` alias for this crate.
pub type Result<T> = std::result::Result<T, TsuruError>;
