//! CLI: describe a business process in a conversation and get a `.bpmn` file.
//!
//! The analyst and clarifier are an external agent command that reads a JSON request on stdin
//! and prints a JSON reply (see `bpmn_weaver::agent_run`). Whenever the process is not yet
//! complete the CLI shows the clarifier's latest question (or, before the first question, what
//! is missing) and waits for the next answer on stdin; an empty line or `quit` abandons the
//! conversation.
//!
//! Usage: `bpmn_chat --agent-cmd "my-agent --json" "Invoices are approved by a manager"`
//!
//! The run log and last checkpoint are written to the run directory after every run.
//!
//! Set RUST_LOG=bpmn_weaver=trace for TRACE-level spans and events.

use std::env;
use std::path::PathBuf;
use std::process;

use bpmn_weaver::run_log_io::write_run_dir;
use bpmn_weaver::types::Role;
use bpmn_weaver::{Checkpoint, CommandAgent, Workflow, WorkflowConfig, WorkflowError};
use clap::Parser;
use futures::StreamExt;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const RUN_DIR: &str = ".bpmn-weaver";

/// Turn a conversation into BPMN 2.0 XML.
#[derive(Parser, Debug)]
#[command(name = "bpmn_chat")]
#[command(
  after_help = r#"Environment variables (override the matching flags when set):
  BPMN_AGENT_CMD       Agent command used for analysis and clarification questions.
  BPMN_MAX_REVISIONS   Maximum analysis passes per conversation.

Examples:
  bpmn_chat --agent-cmd "my-agent --json" "Refund requests are checked by support"
  bpmn_chat --config weaver.json --out refunds.bpmn"#
)]
struct Args {
  /// Agent command (program and arguments). Overridden by BPMN_AGENT_CMD if set.
  #[arg(long, value_name = "CMD")]
  agent_cmd: Option<String>,

  /// JSON file with workflow and layout settings.
  #[arg(long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Where to write the generated BPMN.
  #[arg(long, value_name = "FILE", default_value = "process.bpmn")]
  out: PathBuf,

  /// Directory for run.log.json and checkpoint.json.
  #[arg(long, value_name = "DIR", default_value = RUN_DIR)]
  run_dir: PathBuf,

  /// First message. Read from stdin when omitted.
  #[arg(value_name = "MESSAGE")]
  message: Option<String>,
}

fn fail(msg: impl std::fmt::Display) -> ! {
  eprintln!("Error: {msg}");
  process::exit(1);
}

fn persist(args: &Args, result: &Result<Checkpoint, WorkflowError>) {
  if let Ok(cp) = result {
    if let Err(e) = write_run_dir(&args.run_dir, cp) {
      warn!(error = %e, run_dir = %args.run_dir.display(), "could not write run directory");
    }
  }
}

#[tokio::main]
async fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_writer(std::io::stderr)
    .init();

  let args = Args::parse();

  let mut config = match &args.config {
    Some(path) => WorkflowConfig::from_json_file(path).unwrap_or_else(|e| fail(e)),
    None => WorkflowConfig::default(),
  };
  // Env vars override flags and config file.
  if let Ok(v) = env::var("BPMN_MAX_REVISIONS") {
    config.max_revisions = v
      .parse()
      .unwrap_or_else(|e| fail(format!("BPMN_MAX_REVISIONS={v}: {e}")));
  }
  let agent_cmd = env::var("BPMN_AGENT_CMD")
    .ok()
    .or_else(|| args.agent_cmd.clone())
    .unwrap_or_else(|| fail("no agent command (use --agent-cmd or BPMN_AGENT_CMD)"));
  info!(agent_cmd = %agent_cmd, max_revisions = config.max_revisions, run_dir = %args.run_dir.display(), "options (env or flags)");

  let agent = CommandAgent::new(&agent_cmd).unwrap_or_else(|e| fail(e));
  let mut workflow = Workflow::new(agent.clone(), agent, config);
  let mut events = workflow.subscribe();
  let progress = tokio::spawn(async move {
    while let Some(event) = events.next().await {
      eprintln!(
        "  [{}] revision {} -> {}",
        event.stage, event.revision, event.next_stage
      );
    }
  });

  let mut stdin = BufReader::new(tokio::io::stdin()).lines();
  let first = match args.message.clone() {
    Some(m) => m,
    None => {
      println!("Describe your process:");
      match stdin.next_line().await {
        Ok(Some(line)) if !line.trim().is_empty() => line,
        _ => fail("no process description given"),
      }
    }
  };

  let mut result = workflow.start(first).await;
  persist(&args, &result);
  loop {
    let cp = match result {
      Ok(cp) => cp,
      Err(e) => fail(e),
    };
    if cp.is_completed() {
      let xml = cp.state.bpmn_xml.unwrap_or_default();
      let written = async {
        let mut file = tokio::fs::File::create(&args.out).await?;
        file.write_all(xml.as_bytes()).await?;
        file.flush().await
      };
      if let Err(e) = written.await {
        fail(format!("writing {}: {e}", args.out.display()));
      }
      println!("BPMN written to {}", args.out.display());
      break;
    }

    match cp.state.last_message() {
      Some(question) if question.role == Role::Assistant => {
        println!("Assistant: {}", question.content);
      }
      _ => {
        println!("The process is not complete yet. Missing:");
        for item in &cp.state.missing_info {
          println!("  - {item}");
        }
      }
    }
    println!("Your answer (empty line to quit):");
    let answer = match stdin.next_line().await {
      Ok(Some(line)) if !line.trim().is_empty() && line.trim() != "quit" => line,
      _ => {
        let _ = workflow.cancel(cp.thread_id).await;
        println!("Conversation abandoned.");
        process::exit(1);
      }
    };
    result = workflow.resume(cp.thread_id, answer).await;
    persist(&args, &result);
  }

  drop(workflow);
  let _ = progress.await;
}
