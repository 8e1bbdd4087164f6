//! State threaded through the workflow stages, and the delta each stage returns.

use serde::{Deserialize, Serialize};

use super::{Message, Phase, ProcessArtifact, ProcessUpdate, UserIntent};

/// Process id given to the artifact of a new conversation.
pub const DEFAULT_PROCESS_ID: &str = "process_1";
/// Process name given to the artifact of a new conversation.
pub const DEFAULT_PROCESS_NAME: &str = "Generated Process";

/// Everything one conversation thread knows. Stages never mutate it; they return a
/// [StateUpdate] that the workflow applies with [WorkflowState::apply].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowState {
  /// Append-only conversation history.
  pub messages: Vec<Message>,
  pub artifact: ProcessArtifact,
  pub phase: Phase,
  /// Number of analyze passes run so far.
  pub revision_count: u32,
  pub is_sufficient: bool,
  pub user_approved: bool,
  pub missing_info: Vec<String>,
  pub last_update: Option<ProcessUpdate>,
  /// Reserved for retrieved reference material; always `None` for now.
  pub knowledge_context: Option<String>,
  pub user_intent: Option<UserIntent>,
  /// Generated BPMN XML once the generate stage has run.
  pub bpmn_xml: Option<String>,
}

impl WorkflowState {
  /// Fresh state for a new thread: empty artifact and the user's first message.
  pub fn new(first_message: impl Into<String>) -> Self {
    Self::with_artifact(
      first_message,
      ProcessArtifact::empty(DEFAULT_PROCESS_ID, DEFAULT_PROCESS_NAME),
    )
  }

  pub fn with_artifact(first_message: impl Into<String>, artifact: ProcessArtifact) -> Self {
    Self {
      messages: vec![Message::human(first_message)],
      artifact,
      phase: Phase::Clarification,
      revision_count: 0,
      is_sufficient: false,
      user_approved: false,
      missing_info: vec![],
      last_update: None,
      knowledge_context: None,
      user_intent: None,
      bpmn_xml: None,
    }
  }

  /// Returns the state with `update` applied. Messages are appended; every other `Some`
  /// field replaces the current value.
  pub fn apply(mut self, update: StateUpdate) -> Self {
    self.messages.extend(update.messages);
    if let Some(artifact) = update.artifact {
      self.artifact = artifact;
    }
    if let Some(phase) = update.phase {
      self.phase = phase;
    }
    if let Some(revision_count) = update.revision_count {
      self.revision_count = revision_count;
    }
    if let Some(is_sufficient) = update.is_sufficient {
      self.is_sufficient = is_sufficient;
    }
    if let Some(user_approved) = update.user_approved {
      self.user_approved = user_approved;
    }
    if let Some(missing_info) = update.missing_info {
      self.missing_info = missing_info;
    }
    if let Some(last_update) = update.last_update {
      self.last_update = Some(last_update);
    }
    if let Some(user_intent) = update.user_intent {
      self.user_intent = Some(user_intent);
    }
    if let Some(bpmn_xml) = update.bpmn_xml {
      self.bpmn_xml = Some(bpmn_xml);
    }
    self
  }

  /// Most recent message, if any.
  pub fn last_message(&self) -> Option<&Message> {
    self.messages.last()
  }
}

/// Delta returned by a stage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateUpdate {
  /// Messages to append to the history.
  pub messages: Vec<Message>,
  pub artifact: Option<ProcessArtifact>,
  pub phase: Option<Phase>,
  pub revision_count: Option<u32>,
  pub is_sufficient: Option<bool>,
  pub user_approved: Option<bool>,
  pub missing_info: Option<Vec<String>>,
  pub last_update: Option<ProcessUpdate>,
  pub user_intent: Option<UserIntent>,
  pub bpmn_xml: Option<String>,
}
