//! Logical phase of a conversation and the stages of the state machine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Logical phase recorded on the workflow state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
  Clarification,
  Validation,
  Generation,
  Completed,
}

impl fmt::Display for Phase {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Phase::Clarification => write!(f, "clarification"),
      Phase::Validation => write!(f, "validation"),
      Phase::Generation => write!(f, "generation"),
      Phase::Completed => write!(f, "completed"),
    }
  }
}

/// A state of the workflow state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
  Analyze,
  Critique,
  Clarify,
  Generate,
  Completed,
}

impl fmt::Display for Stage {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Stage::Analyze => write!(f, "analyze"),
      Stage::Critique => write!(f, "critique"),
      Stage::Clarify => write!(f, "clarify"),
      Stage::Generate => write!(f, "generate"),
      Stage::Completed => write!(f, "completed"),
    }
  }
}

/// Last explicit instruction from the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserIntent {
  ContinueInterview,
  ApproveArtifact,
  ModifyStructure,
  Cancel,
}
