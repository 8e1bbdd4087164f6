//! BPMN 2.0 XML codec.
//!
//! [generate_bpmn] lays out an artifact, writes the process model and Diagram Interchange, then
//! runs both validation passes. Any validation problem is fatal: the caller gets
//! [CodecError::Invalid] listing every problem from both passes, never the markup.

mod validator;
mod writer;

pub use validator::{check_structure, check_well_formed};
pub use writer::{
  BPMN_DI_NS, BPMN_MODEL_NS, DC_NS, DI_NS, TARGET_NAMESPACE, flow_ids, write_definitions,
};

use tracing::instrument;

use crate::config::LayoutConfig;
use crate::error::CodecError;
use crate::layout::compute_layout;
use crate::types::ProcessArtifact;

/// Runs both validation passes and aggregates their problems.
pub fn validate(xml: &str) -> Result<(), CodecError> {
  let mut problems = check_well_formed(xml);
  problems.extend(check_structure(xml));
  if problems.is_empty() {
    Ok(())
  } else {
    Err(CodecError::Invalid { problems })
  }
}

/// Generates validated BPMN XML (UTF-8, with XML declaration) for `artifact`.
#[instrument(level = "trace", skip(artifact, layout), fields(process_id = %artifact.process_id()))]
pub fn generate_bpmn(artifact: &ProcessArtifact, layout: &LayoutConfig) -> Result<String, CodecError> {
  let geometry = compute_layout(artifact, layout);
  let xml = write_definitions(artifact, &geometry)?;
  validate(&xml)?;
  Ok(xml)
}
