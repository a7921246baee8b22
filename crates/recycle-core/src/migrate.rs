//! Bounded-retry container migration.
//!
//! One [`ContainerMigrator::migrate`] call drives the backend's streamed
//! `move` operation until an attempt ends with a success line and no error
//! lines, or until the retry budget is spent:
//!
//! ```text
//! ATTEMPTING ──success──▶ SUCCESS
//!     │
//!     └─incomplete─▶ RETRYING ──pause──▶ ATTEMPTING   (attempt < max_retry)
//!                        │
//!                        └─────────────▶ FAILED       (budget exhausted)
//! ```

use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info};

use crate::address::NodeAddress;
use crate::classifier::{LineClassifier, LineKind};
use crate::error::{RecycleError, Result};
use crate::gateway::PoolGateway;
use crate::report::{Pause, Reporter};

// ---------------------------------------------------------------------------
// MigrationAttempt
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptOutcome {
    Success,
    /// At least one error line was seen.
    Error,
    /// Stream was empty or ended without a success line.
    Incomplete,
}

/// One try of moving containers; never outlives the `migrate` call.
#[derive(Debug, Clone, Serialize)]
pub struct MigrationAttempt {
    /// Zero-based.
    pub index: u32,
    pub lines: Vec<String>,
    pub outcome: AttemptOutcome,
}

// ---------------------------------------------------------------------------
// ContainerMigrator
// ---------------------------------------------------------------------------

pub struct ContainerMigrator<'a> {
    gateway: &'a dyn PoolGateway,
    classifier: &'a dyn LineClassifier,
    pause: &'a dyn Pause,
    max_retry: u32,
    wait: Duration,
}

impl<'a> ContainerMigrator<'a> {
    pub fn new(
        gateway: &'a dyn PoolGateway,
        classifier: &'a dyn LineClassifier,
        pause: &'a dyn Pause,
        max_retry: u32,
        wait: Duration,
    ) -> Self {
        Self {
            gateway,
            classifier,
            pause,
            max_retry,
            wait,
        }
    }

    /// Move every container from `source` to `dest`.
    ///
    /// Both addresses must be `scheme://host:port`; otherwise this fails with
    /// [`RecycleError::InvalidAddress`] before touching the backend. At most
    /// `max_retry + 1` attempts are made, with a pause between consecutive
    /// attempts and none after the last.
    pub fn migrate(
        &self,
        source: &str,
        dest: &str,
        out: &mut dyn Reporter,
    ) -> Result<MigrationAttempt> {
        let (from, to) = match (NodeAddress::parse(source), NodeAddress::parse(dest)) {
            (Some(from), Some(to)) => (from, to),
            _ => {
                return Err(RecycleError::InvalidAddress {
                    source_address: source.to_string(),
                    dest_address: dest.to_string(),
                })
            }
        };

        let mut errors: Vec<String> = Vec::new();
        let mut index = 0;
        loop {
            let attempt = self.attempt(index, &from, &to, out, &mut errors)?;
            debug!(attempt = index, outcome = ?attempt.outcome, lines = attempt.lines.len(), "move attempt finished");
            if attempt.outcome == AttemptOutcome::Success {
                info!(%source, %dest, attempts = index + 1, "containers moved");
                return Ok(attempt);
            }

            if index >= self.max_retry {
                info!(%source, %dest, attempts = index + 1, "giving up on moving containers");
                return Err(RecycleError::MoveNodeContainers {
                    attempts: index + 1,
                    errors,
                });
            }

            out.progress(&format!(
                "Retrying move containers from {source} to {dest}. Waiting for {} seconds...",
                self.wait.as_secs()
            ))?;
            self.pause.pause(self.wait);
            index += 1;
        }
    }

    fn attempt(
        &self,
        index: u32,
        from: &NodeAddress,
        to: &NodeAddress,
        out: &mut dyn Reporter,
        errors: &mut Vec<String>,
    ) -> Result<MigrationAttempt> {
        let mut lines = Vec::new();
        let mut saw_error = false;

        let stream = match self.gateway.move_containers(from, to) {
            Ok(stream) => stream,
            Err(e) => {
                let line = e.to_string();
                out.error(&line)?;
                errors.push(line.clone());
                return Ok(MigrationAttempt {
                    index,
                    lines: vec![line],
                    outcome: AttemptOutcome::Error,
                });
            }
        };

        for item in stream {
            match item {
                Ok(message) => {
                    let line = message.strip_suffix('\n').unwrap_or(&message).to_string();
                    match self.classifier.classify(&line) {
                        LineKind::Error => {
                            saw_error = true;
                            out.error(&line)?;
                            errors.push(line.clone());
                        }
                        LineKind::Progress => out.progress(&line)?,
                    }
                    lines.push(line);
                }
                Err(e) => {
                    let line = e.to_string();
                    saw_error = true;
                    out.error(&line)?;
                    errors.push(line.clone());
                    lines.push(line);
                    break;
                }
            }
        }

        let outcome = if saw_error {
            AttemptOutcome::Error
        } else {
            match lines.last() {
                Some(last) if self.classifier.is_success(last) => AttemptOutcome::Success,
                _ => AttemptOutcome::Incomplete,
            }
        };

        Ok(MigrationAttempt {
            index,
            lines,
            outcome,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
