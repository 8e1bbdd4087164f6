//! Contracts for the two LLM-backed stages.
//!
//! The workflow treats both as opaque: it hands over the conversation and gets structured data
//! back. Implementations must not fill gaps with invented facts; anything the conversation does
//! not settle belongs in [ProcessUpdate::missing_information].

use async_trait::async_trait;

use crate::error::CollaboratorError;
use crate::types::{ClarificationQuestion, Message, ProcessArtifact, ProcessUpdate};

/// Turns the conversation into a proposed change to the artifact.
#[async_trait]
pub trait Analyst: Send + Sync {
  async fn analyze(
    &self,
    messages: &[Message],
    artifact: &ProcessArtifact,
  ) -> Result<ProcessUpdate, CollaboratorError>;
}

/// Produces exactly one question addressing the most critical gap.
#[async_trait]
pub trait Clarifier: Send + Sync {
  async fn clarify(
    &self,
    messages: &[Message],
    missing_info: &[String],
  ) -> Result<ClarificationQuestion, CollaboratorError>;
}

/// Checks the constraints serde cannot express on an analyst reply.
pub fn check_update(update: ProcessUpdate) -> Result<ProcessUpdate, CollaboratorError> {
  update
    .check()
    .map_err(|reason| CollaboratorError::Malformed {
      collaborator: "analyst",
      reason,
    })?;
  Ok(update)
}

/// Checks the constraints serde cannot express on a clarifier reply.
pub fn check_question(
  question: ClarificationQuestion,
) -> Result<ClarificationQuestion, CollaboratorError> {
  question
    .check()
    .map_err(|reason| CollaboratorError::Malformed {
      collaborator: "clarifier",
      reason,
    })?;
  Ok(question)
}
