//! Critique stage: deterministic sufficiency check of the merged artifact.

use tracing::{instrument, warn};

use crate::config::WorkflowConfig;
use crate::error::WorkflowError;
use crate::types::{Phase, ProcessArtifact, ProcessUpdate, Stage, StateUpdate, WorkflowState};

/// Result of a critique pass.
#[derive(Debug, Clone, PartialEq)]
pub struct CritiqueOutput {
  pub is_sufficient: bool,
  /// Every reason the artifact is not yet sufficient, in check order.
  pub missing_info: Vec<String>,
}

/// Collects every reason `artifact` is not ready for generation.
///
/// Checks, in order: start event, end event, at least one sequence flow when there are nodes,
/// the analyst's own gaps, the analyst's confidence against `confidence_threshold`, and finally
/// the artifact's integrity errors.
pub fn sufficiency_report(
  artifact: &ProcessArtifact,
  last_update: Option<&ProcessUpdate>,
  confidence_threshold: f64,
) -> Vec<String> {
  let mut missing = Vec::new();
  if !artifact.has_start() {
    missing.push("missing start event".to_string());
  }
  if !artifact.has_end() {
    missing.push("missing end event".to_string());
  }
  if !artifact.nodes().is_empty() && artifact.edges().is_empty() {
    missing.push("no sequence flow connections".to_string());
  }
  if let Some(update) = last_update {
    missing.extend(update.missing_information.iter().cloned());
    if update.confidence < confidence_threshold {
      missing.push(format!(
        "analyst confidence {:.2} is below the {:.2} threshold",
        update.confidence, confidence_threshold
      ));
    }
  }
  missing.extend(artifact.validation_errors().iter().cloned());
  missing
}

impl CritiqueOutput {
  /// State delta for this result: sufficiency, missing information and the next phase.
  pub fn into_update(self) -> StateUpdate {
    let phase = if self.is_sufficient {
      Phase::Generation
    } else {
      Phase::Clarification
    };
    StateUpdate {
      phase: Some(phase),
      is_sufficient: Some(self.is_sufficient),
      missing_info: Some(self.missing_info),
      ..StateUpdate::default()
    }
  }
}

/// Evaluates sufficiency of `state`.
#[instrument(level = "trace", skip(state, config))]
pub fn critique(state: &WorkflowState, config: &WorkflowConfig) -> CritiqueOutput {
  let missing_info = sufficiency_report(
    &state.artifact,
    state.last_update.as_ref(),
    config.confidence_threshold,
  );
  let is_sufficient = missing_info.is_empty();
  if !is_sufficient {
    warn!(reasons = missing_info.len(), "artifact insufficient");
  }
  CritiqueOutput {
    is_sufficient,
    missing_info,
  }
}

/// Next stage after critique.
///
/// An insufficient artifact goes to Clarify only while analyze passes remain; once
/// `max_revisions` passes are used up the thread fails with [WorkflowError::RevisionLimit]
/// instead of asking the user a question nobody will analyze.
pub fn route_critique(
  state: &WorkflowState,
  config: &WorkflowConfig,
) -> Result<Stage, WorkflowError> {
  if state.is_sufficient {
    return Ok(Stage::Generate);
  }
  if state.revision_count >= config.max_revisions {
    warn!(limit = config.max_revisions, "revision limit reached");
    return Err(WorkflowError::RevisionLimit {
      limit: config.max_revisions,
    });
  }
  Ok(Stage::Clarify)
}
