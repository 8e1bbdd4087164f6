//! Question produced by the clarifier when the artifact is insufficient.

use serde::{Deserialize, Serialize};

/// Shape of the answer a question expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
  Open,
  Choice,
  Confirmation,
}

/// A single clarification question for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClarificationQuestion {
  pub question_text: String,
  pub question_kind: QuestionKind,
  /// Only populated for [QuestionKind::Choice].
  #[serde(default)]
  pub options: Option<Vec<String>>,
  /// Why the question is being asked (internal reasoning, not shown to the user).
  #[serde(default)]
  pub rationale: String,
}

impl ClarificationQuestion {
  pub fn open(question_text: impl Into<String>, rationale: impl Into<String>) -> Self {
    Self {
      question_text: question_text.into(),
      question_kind: QuestionKind::Open,
      options: None,
      rationale: rationale.into(),
    }
  }

  /// Checks that `options` is present exactly when the question is a choice.
  pub fn check(&self) -> Result<(), String> {
    if self.question_text.trim().is_empty() {
      return Err("question_text is empty".to_string());
    }
    match (self.question_kind, &self.options) {
      (QuestionKind::Choice, Some(opts)) if !opts.is_empty() => Ok(()),
      (QuestionKind::Choice, _) => Err("choice question without options".to_string()),
      (_, Some(opts)) if !opts.is_empty() => {
        Err("options are only allowed on choice questions".to_string())
      }
      _ => Ok(()),
    }
  }
}
