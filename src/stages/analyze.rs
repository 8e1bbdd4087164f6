//! Analyze stage: ask the analyst for a process update and merge it into the artifact.

use tracing::{debug, instrument, warn};

use crate::collaborator::Analyst;
use crate::config::WorkflowConfig;
use crate::error::WorkflowError;
use crate::types::{Phase, StateUpdate, WorkflowState};

/// Runs one analyze pass.
///
/// Fails with [WorkflowError::RevisionLimit] when the thread has already used
/// `config.max_revisions` passes, and with [WorkflowError::Collaborator] when the analyst fails.
/// Structural problems in the merged artifact are not errors; they stay on the artifact.
#[instrument(level = "trace", skip(state, analyst, config), fields(revision = state.revision_count))]
pub async fn analyze<A>(
  state: &WorkflowState,
  analyst: &A,
  config: &WorkflowConfig,
) -> Result<StateUpdate, WorkflowError>
where
  A: Analyst + ?Sized,
{
  if state.revision_count >= config.max_revisions {
    warn!(limit = config.max_revisions, "revision limit reached");
    return Err(WorkflowError::RevisionLimit {
      limit: config.max_revisions,
    });
  }

  let update = analyst.analyze(&state.messages, &state.artifact).await?;
  let artifact = state.artifact.merge(&update);
  debug!(
    nodes = artifact.nodes().len(),
    edges = artifact.edges().len(),
    is_valid = artifact.is_valid(),
    confidence = update.confidence,
    "artifact merged"
  );

  Ok(StateUpdate {
    artifact: Some(artifact),
    phase: Some(Phase::Validation),
    revision_count: Some(state.revision_count + 1),
    last_update: Some(update),
    ..StateUpdate::default()
  })
}
