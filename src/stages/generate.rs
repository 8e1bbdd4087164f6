//! Generate stage: serialize the artifact to validated BPMN XML.

use tracing::{info, instrument};

use crate::codec::generate_bpmn;
use crate::config::WorkflowConfig;
use crate::error::CodecError;
use crate::types::{Phase, StateUpdate, WorkflowState};

#[instrument(level = "trace", skip(state, config))]
pub fn generate(state: &WorkflowState, config: &WorkflowConfig) -> Result<StateUpdate, CodecError> {
  let xml = generate_bpmn(&state.artifact, &config.layout)?;
  info!(
    process_id = %state.artifact.process_id(),
    bytes = xml.len(),
    "bpmn generated"
  );
  Ok(StateUpdate {
    phase: Some(Phase::Completed),
    bpmn_xml: Some(xml),
    ..StateUpdate::default()
  })
}
