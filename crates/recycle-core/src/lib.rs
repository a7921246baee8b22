pub mod address;
pub mod classifier;
pub mod config;
pub mod error;
pub mod gateway;
pub mod migrate;
pub mod recycle;
pub mod register;
pub mod report;
pub mod types;

#[cfg(test)]
mod test_support;

pub use address::{host_of, NodeAddress};
pub use classifier::{LineClassifier, LineKind, MarkerClassifier};
pub use config::RecycleOptions;
pub use error::{RecycleError, Result};
pub use gateway::{PoolGateway, ProgressStream};
pub use migrate::{AttemptOutcome, ContainerMigrator, MigrationAttempt};
pub use recycle::{RecycleOrchestrator, RecycleStep, RecycleSummary};
pub use register::register_node;
pub use report::{Channel, MemoryReporter, Pause, Reporter, StdReporter, ThreadPause};
pub use types::{Machine, MachineMetadata, Metadata, Node, Template, TemplateParam};
