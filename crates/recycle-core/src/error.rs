use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecycleError {
    #[error("no templates found for pool \"{pool}\"")]
    NoTemplates { pool: String },

    #[error("node address {source_address} or {dest_address} are invalid")]
    InvalidAddress {
        source_address: String,
        dest_address: String,
    },

    #[error("error adding new node on IaaS: {0}")]
    NewNodeProvision(String),

    #[error("error removing node from pool: {0}")]
    NodeDeregistration(String),

    /// Retry budget exhausted. `errors` holds every error line already
    /// surfaced on the error channel, in order.
    #[error("max retry reached for moving on {attempts} attempts")]
    MoveNodeContainers { attempts: u32, errors: Vec<String> },

    #[error("error removing machine from IaaS: {0}")]
    MachineDecommission(String),

    #[error("error registering node: {0}")]
    Registration(String),

    #[error("{0}")]
    Backend(String),

    #[error("error writing output: {0}")]
    Output(#[from] std::io::Error),
}

impl RecycleError {
    /// Error lines accumulated by a failed migration; empty for other kinds.
    pub fn error_lines(&self) -> &[String] {
        match self {
            RecycleError::MoveNodeContainers { errors, .. } => errors,
            _ => &[],
        }
    }
}

pub type Result<T> = std::result::Result<T, RecycleError>;
