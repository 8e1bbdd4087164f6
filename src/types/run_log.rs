//! DTOs for run.log.json: the stages a thread has executed, for debugging and traceability.

use serde::{Deserialize, Serialize};

use super::{Phase, Stage, ThreadId};

/// Current run log format version.
pub const RUN_LOG_VERSION: u32 = 1;

/// One executed stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunStepEntry {
  /// 1-based step index across the whole thread.
  pub step: u32,
  pub stage: Stage,
  /// Phase recorded on the state after the stage ran.
  pub phase_after: Phase,
  /// Revision counter after the stage ran.
  pub revision: u32,
  /// Stage selected next (`None` once the thread completed).
  pub next_stage: Option<Stage>,
  /// Missing-information entries after the stage ran.
  pub missing_info_after: usize,
  /// RFC 3339 timestamp.
  pub recorded_at: String,
}

/// Root structure for run.log.json.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunLog {
  pub version: u32,
  pub thread_id: ThreadId,
  /// RFC 3339 timestamp of thread start.
  pub started_at: String,
  /// RFC 3339 timestamp when the thread reached a terminal status.
  pub finished_at: Option<String>,
  pub steps: Vec<RunStepEntry>,
}

impl RunLog {
  pub fn new(thread_id: ThreadId, started_at: impl Into<String>) -> Self {
    Self {
      version: RUN_LOG_VERSION,
      thread_id,
      started_at: started_at.into(),
      finished_at: None,
      steps: vec![],
    }
  }

  /// Index the next recorded step will get.
  pub fn next_step(&self) -> u32 {
    self.steps.len() as u32 + 1
  }

  /// Stages executed so far, in order.
  pub fn stages(&self) -> Vec<Stage> {
    self.steps.iter().map(|s| s.stage).collect()
  }
}
