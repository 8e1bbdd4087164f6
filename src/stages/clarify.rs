//! Clarify stage: turn the missing-information list into one question for the user.

use tracing::instrument;

use crate::collaborator::Clarifier;
use crate::error::CollaboratorError;
use crate::types::{ClarificationQuestion, Message, StateUpdate, WorkflowState};

/// Conversation message for `question`. Choice options are listed one per line.
pub fn question_message(question: &ClarificationQuestion) -> Message {
  let mut content = question.question_text.clone();
  for option in question.options.iter().flatten() {
    content.push_str("\n- ");
    content.push_str(option);
  }
  Message::assistant(content)
}

/// Asks the clarifier for a question and appends it to the conversation. The artifact is not
/// touched.
#[instrument(level = "trace", skip(state, clarifier), fields(gaps = state.missing_info.len()))]
pub async fn clarify<C>(
  state: &WorkflowState,
  clarifier: &C,
) -> Result<StateUpdate, CollaboratorError>
where
  C: Clarifier + ?Sized,
{
  let question = clarifier
    .clarify(&state.messages, &state.missing_info)
    .await?;
  Ok(StateUpdate {
    messages: vec![question_message(&question)],
    ..StateUpdate::default()
  })
}
