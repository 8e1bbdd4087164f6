//! Checkpoint of one conversation thread, held by the in-memory checkpointer.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{RunLog, Stage, ThreadId, WorkflowState};

/// Where a thread's execution stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
  /// A run is in progress; no resumption may start.
  Running,
  /// Halted before `next_stage`, waiting for a human message.
  Suspended,
  /// Reached the terminal stage.
  Completed,
  /// The last run aborted with an error; the state is as of the last completed stage.
  Failed,
}

impl fmt::Display for RunStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      RunStatus::Running => write!(f, "running"),
      RunStatus::Suspended => write!(f, "suspended"),
      RunStatus::Completed => write!(f, "completed"),
      RunStatus::Failed => write!(f, "failed"),
    }
  }
}

/// Snapshot of a thread: its state, the stage to run next and its status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
  pub thread_id: ThreadId,
  pub state: WorkflowState,
  pub next_stage: Stage,
  pub status: RunStatus,
  pub log: RunLog,
  /// Error message of the last failed run.
  pub failure: Option<String>,
}

impl Checkpoint {
  pub fn is_suspended(&self) -> bool {
    self.status == RunStatus::Suspended
  }

  pub fn is_completed(&self) -> bool {
    self.status == RunStatus::Completed
  }
}
