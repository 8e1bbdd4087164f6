//! Error taxonomy.
//!
//! Structural invalidity of an artifact and insufficiency are not errors; they are data on
//! the artifact and the workflow state. Only codec failures, collaborator failures and
//! misuse of the thread API are reported here.

use std::path::PathBuf;
use thiserror::Error;

use crate::types::ThreadId;

/// XML codec failure.
#[derive(Debug, Error)]
pub enum CodecError {
  /// The generated document failed validation. Indicates an upstream defect: the workflow
  /// let an artifact reach generation that should not have.
  #[error("generated invalid BPMN XML: {}", .problems.join("; "))]
  Invalid { problems: Vec<String> },
  #[error("failed to write XML: {0}")]
  Write(String),
}

/// Failure of an external collaborator (analyst or clarifier).
#[derive(Debug, Error)]
pub enum CollaboratorError {
  /// Output could not be parsed into the expected structure, or violated its constraints.
  #[error("{collaborator} returned malformed output: {reason}")]
  Malformed {
    collaborator: &'static str,
    reason: String,
  },
  /// The collaborator could not be invoked.
  #[error("{collaborator} invocation failed: {reason}")]
  Invocation {
    collaborator: &'static str,
    reason: String,
  },
  /// The collaborator produced no output.
  #[error("{collaborator} returned no output")]
  Empty { collaborator: &'static str },
}

/// Workflow failure.
#[derive(Debug, Error)]
pub enum WorkflowError {
  #[error(transparent)]
  Collaborator(#[from] CollaboratorError),
  #[error(transparent)]
  Codec(#[from] CodecError),
  #[error("unknown thread: {0}")]
  UnknownThread(ThreadId),
  #[error("thread {0} is not waiting for input")]
  NotSuspended(ThreadId),
  #[error("thread {0} is already running")]
  ThreadBusy(ThreadId),
  #[error("revision limit of {limit} reached without a sufficient process")]
  RevisionLimit { limit: u32 },
}

/// Configuration loading failure.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read config {}: {source}", .path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
  #[error("invalid config: {0}")]
  Parse(#[from] serde_json::Error),
}
