//! Agent invocation: run an external agent command with a JSON request on stdin and parse the
//! JSON object it prints on stdout.
//!
//! Request: `{"task": "analyze"|"clarify", "messages": [...], "artifact": {...},
//! "missing_information": [...]}`. The reply may be bare JSON or wrapped in a fenced code block.

use std::process::Stdio;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{instrument, warn};

use crate::collaborator::{Analyst, Clarifier, check_question, check_update};
use crate::error::CollaboratorError;
use crate::types::{ClarificationQuestion, Message, ProcessArtifact, ProcessUpdate};

#[derive(Debug, Serialize)]
struct AgentRequest<'a> {
  task: &'static str,
  messages: &'a [Message],
  #[serde(skip_serializing_if = "Option::is_none")]
  artifact: Option<&'a ProcessArtifact>,
  missing_information: &'a [String],
}

/// Collaborator backed by an external command (e.g. `my-agent --json`). Implements both
/// [Analyst] and [Clarifier]; the `task` field of the request tells them apart.
#[derive(Debug, Clone)]
pub struct CommandAgent {
  program: String,
  args: Vec<String>,
}

impl CommandAgent {
  /// Splits `agent_cmd` on whitespace into program and arguments.
  pub fn new(agent_cmd: &str) -> Result<Self, CollaboratorError> {
    let mut parts = agent_cmd.split_whitespace().map(str::to_string);
    let program = parts.next().ok_or_else(|| CollaboratorError::Invocation {
      collaborator: "agent",
      reason: "agent_cmd is empty".to_string(),
    })?;
    Ok(Self {
      program,
      args: parts.collect(),
    })
  }

  #[instrument(level = "trace", skip(self, request), fields(task = request.task))]
  async fn call<T: DeserializeOwned>(
    &self,
    collaborator: &'static str,
    request: &AgentRequest<'_>,
  ) -> Result<T, CollaboratorError> {
    let invocation = |reason: String| CollaboratorError::Invocation {
      collaborator,
      reason,
    };
    let payload = serde_json::to_vec(request).map_err(|e| invocation(e.to_string()))?;

    let mut child = Command::new(&self.program)
      .args(&self.args)
      .stdin(Stdio::piped())
      .stdout(Stdio::piped())
      .stderr(Stdio::inherit())
      .kill_on_drop(true)
      .spawn()
      .map_err(|e| invocation(format!("agent spawn: {e}")))?;

    // stdin is written while stdout is drained; the pipe closes when the write finishes
    let stdin = child.stdin.take();
    let write_request = async move {
      if let Some(mut stdin) = stdin {
        stdin.write_all(&payload).await?;
        stdin.write_all(b"\n").await?;
      }
      Ok::<(), std::io::Error>(())
    };
    let (written, output) = tokio::join!(write_request, child.wait_with_output());
    if let Err(e) = written {
      warn!(error = %e, "agent did not read the full request");
    }
    let output = output.map_err(|e| invocation(format!("agent wait: {e}")))?;
    if !output.status.success() {
      let msg = output
        .status
        .code()
        .map(|c| format!("agent exit {c}"))
        .unwrap_or_else(|| "agent signal".to_string());
      return Err(invocation(msg));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    parse_reply(collaborator, &stdout)
  }
}

/// Extracts the JSON object from agent output: the body of the first fenced block if there is
/// one, else the span from the first `{` to the last `}`.
pub fn extract_json(output: &str) -> Option<&str> {
  let trimmed = output.trim();
  if trimmed.is_empty() {
    return None;
  }
  if let Some(start) = trimmed.find("```") {
    let after = &trimmed[start + 3..];
    // skip the info string (e.g. `json`)
    let body_start = after.find('\n').map(|i| i + 1).unwrap_or(0);
    let body = &after[body_start..];
    let body = body.find("```").map(|end| &body[..end]).unwrap_or(body);
    return Some(body.trim());
  }
  let open = trimmed.find('{')?;
  let close = trimmed.rfind('}')?;
  (close > open).then(|| &trimmed[open..=close])
}

/// Parses an agent reply into `T`.
pub fn parse_reply<T: DeserializeOwned>(
  collaborator: &'static str,
  output: &str,
) -> Result<T, CollaboratorError> {
  if output.trim().is_empty() {
    return Err(CollaboratorError::Empty { collaborator });
  }
  let json = extract_json(output).ok_or_else(|| CollaboratorError::Malformed {
    collaborator,
    reason: "no JSON object in output".to_string(),
  })?;
  serde_json::from_str(json).map_err(|e| CollaboratorError::Malformed {
    collaborator,
    reason: e.to_string(),
  })
}

#[async_trait]
impl Analyst for CommandAgent {
  async fn analyze(
    &self,
    messages: &[Message],
    artifact: &ProcessArtifact,
  ) -> Result<ProcessUpdate, CollaboratorError> {
    let request = AgentRequest {
      task: "analyze",
      messages,
      artifact: Some(artifact),
      missing_information: &[],
    };
    check_update(self.call("analyst", &request).await?)
  }
}

#[async_trait]
impl Clarifier for CommandAgent {
  async fn clarify(
    &self,
    messages: &[Message],
    missing_info: &[String],
  ) -> Result<ClarificationQuestion, CollaboratorError> {
    let request = AgentRequest {
      task: "clarify",
      messages,
      artifact: None,
      missing_information: missing_info,
    };
    check_question(self.call("clarifier", &request).await?)
  }
}
