//! Tests for the command-backed collaborator.

use crate::agent_run::{CommandAgent, extract_json, parse_reply};
use crate::collaborator::{Analyst, Clarifier};
use crate::error::CollaboratorError;
use crate::types::{Message, ProcessArtifact, ProcessUpdate, QuestionKind};

#[test]
fn extract_json_from_fenced_block() {
  let out = "Here you go:\n```json\n{\"a\": 1}\n```\nbye";
  assert_eq!(extract_json(out), Some("{\"a\": 1}"));
}

#[test]
fn extract_json_from_bare_object_with_noise() {
  assert_eq!(extract_json("note {\"a\": {\"b\": 2}} end"), Some("{\"a\": {\"b\": 2}}"));
  assert_eq!(extract_json("no braces here"), None);
  assert_eq!(extract_json("   "), None);
}

#[test]
fn parse_reply_distinguishes_empty_and_malformed() {
  let empty: Result<ProcessUpdate, _> = parse_reply("analyst", "\n");
  assert!(matches!(empty, Err(CollaboratorError::Empty { collaborator: "analyst" })));

  let malformed: Result<ProcessUpdate, _> = parse_reply("analyst", "{\"reasoning\": \"x\"}");
  assert!(matches!(malformed, Err(CollaboratorError::Malformed { .. })));
}

#[test]
fn empty_command_is_rejected() {
  assert!(matches!(
    CommandAgent::new("   "),
    Err(CollaboratorError::Invocation { .. })
  ));
}

#[cfg(unix)]
fn script(dir: &tempfile::TempDir, body: &str) -> String {
  let path = dir.path().join("agent.sh");
  std::fs::write(&path, format!("cat > /dev/null\n{body}\n")).unwrap();
  format!("sh {}", path.display())
}

#[cfg(unix)]
#[tokio::test]
async fn analyst_parses_fenced_reply() {
  let dir = tempfile::tempdir().unwrap();
  let cmd = script(
    &dir,
    r#"cat <<'EOF'
```json
{"reasoning": "two events", "new_nodes": [{"id": "s", "label": "Start", "type": "StartEvent"}],
 "confidence": 0.8, "missing_information": ["who approves?"]}
```
EOF"#,
  );
  let agent = CommandAgent::new(&cmd).unwrap();
  let update = agent
    .analyze(&[Message::human("hi")], &ProcessArtifact::empty("p", "P"))
    .await
    .unwrap();
  assert_eq!(update.new_nodes.len(), 1);
  assert_eq!(update.missing_information, vec!["who approves?"]);
}

#[cfg(unix)]
#[tokio::test]
async fn analyst_rejects_out_of_range_confidence() {
  let dir = tempfile::tempdir().unwrap();
  let cmd = script(
    &dir,
    r#"echo '{"reasoning": "", "confidence": 1.5, "missing_information": []}'"#,
  );
  let agent = CommandAgent::new(&cmd).unwrap();
  let r = agent
    .analyze(&[Message::human("hi")], &ProcessArtifact::empty("p", "P"))
    .await;
  assert!(matches!(
    r,
    Err(CollaboratorError::Malformed {
      collaborator: "analyst",
      ..
    })
  ));
}

#[cfg(unix)]
#[tokio::test]
async fn clarifier_parses_question() {
  let dir = tempfile::tempdir().unwrap();
  let cmd = script(
    &dir,
    r#"echo '{"question_text": "Who approves?", "question_kind": "open", "rationale": "missing role"}'"#,
  );
  let agent = CommandAgent::new(&cmd).unwrap();
  let q = agent
    .clarify(&[Message::human("hi")], &["missing end event".to_string()])
    .await
    .unwrap();
  assert_eq!(q.question_text, "Who approves?");
  assert_eq!(q.question_kind, QuestionKind::Open);
}

#[cfg(unix)]
#[tokio::test]
async fn failing_command_is_an_invocation_error() {
  let dir = tempfile::tempdir().unwrap();
  let cmd = script(&dir, "exit 3");
  let agent = CommandAgent::new(&cmd).unwrap();
  let r = agent.clarify(&[], &[]).await;
  match r {
    Err(CollaboratorError::Invocation { reason, .. }) => assert_eq!(reason, "agent exit 3"),
    other => panic!("expected invocation error, got {other:?}"),
  }
}

#[cfg(unix)]
#[tokio::test]
async fn silent_command_is_empty() {
  let dir = tempfile::tempdir().unwrap();
  let cmd = script(&dir, "true");
  let agent = CommandAgent::new(&cmd).unwrap();
  let r = agent.clarify(&[], &[]).await;
  assert!(matches!(r, Err(CollaboratorError::Empty { .. })));
}

#[tokio::test]
async fn missing_program_is_an_invocation_error() {
  let agent = CommandAgent::new("definitely-not-a-real-agent-binary-xyz").unwrap();
  let r = agent.clarify(&[], &[]).await;
  assert!(matches!(r, Err(CollaboratorError::Invocation { .. })));
}

#[cfg(unix)]
#[tokio::test]
async fn large_request_and_chatty_agent_do_not_block_each_other() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("chatty.sh");
  std::fs::write(
    &path,
    "head -c 300000 /dev/zero | tr '\\0' ' '\n\
     cat > /dev/null\n\
     echo '{\"reasoning\": \"\", \"confidence\": 0.8, \"missing_information\": []}'\n",
  )
  .unwrap();
  let agent = CommandAgent::new(&format!("sh {}", path.display())).unwrap();
  let update = agent
    .analyze(
      &[Message::human("x".repeat(300_000))],
      &ProcessArtifact::empty("p", "P"),
    )
    .await
    .unwrap();
  assert_eq!(update.confidence, 0.8);
}
