use anyhow::Context;
use tsuru_client::{TsuruClient, TsuruConfig};

/// Connection settings collected from flags or the environment.
///
/// Validation is deferred until a command actually needs the API, so
/// `--help` and argument errors never depend on the environment.
pub struct Connection {
    target: Option<String>,
    token: Option<String>,
}

impl Connection {
    pub fn new(target: Option<String>, token: Option<String>) -> Self {
        Self { target, token }
    }

    pub fn client(&self) -> anyhow::Result<TsuruClient> {
        let config = TsuruConfig::new(self.target.clone(), self.token.clone())?;
        TsuruClient::new(config).context("failed to build tsuru client")
    }
}
