//! # bpmn-weaver
//!
//! Turns a conversation about a business process into a BPMN 2.0 XML document.
//!
//! ## Architecture
//!
//! - [types]: the process artifact (nodes, sequence flows, data elements) with its integrity
//!   check and pure merge, plus the workflow state and checkpoint types.
//! - [layout]: deterministic Manhattan grid coordinates and orthogonal connector waypoints.
//! - [codec]: BPMN XML with Diagram Interchange, validated in two passes before it is returned.
//! - [workflow]: the Analyze → Critique → (Clarify | Generate) state machine, suspending before
//!   Clarify until the user answers.
//!
//! The analyst and clarifier are external collaborators behind the [collaborator] traits;
//! [agent_run::CommandAgent] backs both with an external command.

pub mod agent_run;
#[cfg(test)]
mod agent_run_test;
pub mod checkpointer;
pub mod codec;
pub mod collaborator;
pub mod config;
pub mod error;
pub mod layout;
#[cfg(test)]
mod layout_test;
pub mod run_log_io;
pub mod stages;
pub mod types;
pub mod workflow;

pub use agent_run::CommandAgent;
pub use codec::generate_bpmn;
pub use config::{LayoutConfig, WorkflowConfig};
pub use error::{CodecError, CollaboratorError, ConfigError, WorkflowError};
pub use types::{Checkpoint, ProcessArtifact, RunStatus, ThreadId, WorkflowState};
pub use workflow::{StageEvent, Workflow};
