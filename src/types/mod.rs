//! Process model and workflow types.
//!
//! The artifact types ([ProcessArtifact], [Node], [Edge], data elements) form the intermediate
//! graph that the layout engine and XML codec consume. The workflow types ([WorkflowState],
//! [Checkpoint], [RunLog]) carry a conversation thread between stages.

mod checkpoint;
mod clarification;
mod data;
mod decision_record;
mod edge;
mod message;
mod node;
mod phase;
mod process_artifact;
mod process_update;
#[cfg(test)]
mod process_update_test;
mod run_log;
mod thread_id;
mod workflow_state;

pub use checkpoint::{Checkpoint, RunStatus};
pub use clarification::{ClarificationQuestion, QuestionKind};
pub use data::{AssociationDirection, DataAssociation, DataObject};
pub use decision_record::DecisionRecord;
pub use edge::Edge;
pub use message::{Message, Role};
pub use node::{BoundaryEventKind, GatewayKind, LoopKind, Node, NodeKind};
pub use phase::{Phase, Stage, UserIntent};
pub use process_artifact::{ArtifactParts, ProcessArtifact};
pub use process_update::ProcessUpdate;
pub use run_log::{RUN_LOG_VERSION, RunLog, RunStepEntry};
pub use thread_id::ThreadId;
pub use workflow_state::{DEFAULT_PROCESS_ID, DEFAULT_PROCESS_NAME, StateUpdate, WorkflowState};
