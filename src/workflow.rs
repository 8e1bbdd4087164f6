//! Workflow state machine: Analyze → Critique → (Clarify | Generate).
//!
//! Stages run one at a time, each to completion. A run stops in three ways:
//!
//! - **Suspended** right before Clarify, when critique finds the artifact insufficient. The
//!   caller supplies the user's answer with [Workflow::resume], which appends it to the
//!   conversation and continues at Clarify, then Analyze.
//! - **Completed** after Generate stored the BPMN XML on the state.
//! - **Failed** when a collaborator or the codec fails, or when critique still finds the
//!   artifact insufficient after the last allowed analyze pass. The state is kept as of the last
//!   completed stage and the error is returned to the caller.
//!
//! Every executed stage is appended to the thread's [RunLog] and, when subscribed, sent as a
//! [StageEvent].

use chrono::Utc;
use serde::Serialize;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::{info, instrument, warn};

use crate::checkpointer::MemoryCheckpointer;
use crate::collaborator::{Analyst, Clarifier};
use crate::config::WorkflowConfig;
use crate::error::WorkflowError;
use crate::stages::{analyze, clarify, critique, generate, route_critique};
use crate::types::{
  Checkpoint, Message, Phase, RunLog, RunStatus, RunStepEntry, Stage, StateUpdate, ThreadId,
  WorkflowState,
};

/// Progress notification for one executed stage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageEvent {
  pub thread_id: ThreadId,
  pub stage: Stage,
  pub phase: Phase,
  pub revision: u32,
  /// Stage that runs next, or [Stage::Completed].
  pub next_stage: Stage,
  /// True when the run halted waiting for user input.
  pub suspended: bool,
}

/// Drives conversation threads through the stages.
pub struct Workflow<A, C> {
  analyst: A,
  clarifier: C,
  config: WorkflowConfig,
  checkpoints: MemoryCheckpointer,
  events: Option<mpsc::UnboundedSender<StageEvent>>,
}

impl<A, C> Workflow<A, C>
where
  A: Analyst,
  C: Clarifier,
{
  pub fn new(analyst: A, clarifier: C, config: WorkflowConfig) -> Self {
    Self {
      analyst,
      clarifier,
      config,
      checkpoints: MemoryCheckpointer::new(),
      events: None,
    }
  }

  /// Uses `checkpoints` instead of a private store.
  pub fn with_checkpointer(mut self, checkpoints: MemoryCheckpointer) -> Self {
    self.checkpoints = checkpoints;
    self
  }

  /// Returns a stream of [StageEvent]s for every stage executed from now on. A later call
  /// replaces the previous subscriber.
  pub fn subscribe(&mut self) -> UnboundedReceiverStream<StageEvent> {
    let (tx, rx) = mpsc::unbounded_channel();
    self.events = Some(tx);
    UnboundedReceiverStream::new(rx)
  }

  pub fn config(&self) -> &WorkflowConfig {
    &self.config
  }

  /// Starts a new thread with the user's first message and runs it until it suspends,
  /// completes or fails.
  #[instrument(level = "trace", skip(self, first_message))]
  pub async fn start(&self, first_message: impl Into<String>) -> Result<Checkpoint, WorkflowError> {
    let thread_id = ThreadId::new();
    let checkpoint = Checkpoint {
      thread_id,
      state: WorkflowState::new(first_message),
      next_stage: Stage::Analyze,
      status: RunStatus::Running,
      log: RunLog::new(thread_id, Utc::now().to_rfc3339()),
      failure: None,
    };
    info!(%thread_id, "thread started");
    self.checkpoints.put(checkpoint.clone()).await;
    self.drive(checkpoint).await
  }

  /// Appends the user's answer to a suspended thread and continues at Clarify.
  ///
  /// Fails with [WorkflowError::UnknownThread], [WorkflowError::NotSuspended] when the thread
  /// is not waiting for input, or [WorkflowError::ThreadBusy] when another resumption already
  /// claimed it.
  #[instrument(level = "trace", skip(self, message))]
  pub async fn resume(
    &self,
    thread_id: ThreadId,
    message: impl Into<String>,
  ) -> Result<Checkpoint, WorkflowError> {
    let mut checkpoint = self.checkpoints.claim_suspended(thread_id).await?;
    checkpoint.state = checkpoint.state.apply(StateUpdate {
      messages: vec![Message::human(message)],
      ..StateUpdate::default()
    });
    info!(%thread_id, next_stage = %checkpoint.next_stage, "thread resumed");
    self.drive(checkpoint).await
  }

  /// Current checkpoint of a thread.
  pub async fn inspect(&self, thread_id: ThreadId) -> Result<Checkpoint, WorkflowError> {
    self
      .checkpoints
      .get(thread_id)
      .await
      .ok_or(WorkflowError::UnknownThread(thread_id))
  }

  /// Abandons a thread that is not running and returns its last checkpoint.
  #[instrument(level = "trace", skip(self))]
  pub async fn cancel(&self, thread_id: ThreadId) -> Result<Checkpoint, WorkflowError> {
    let checkpoint = self.checkpoints.remove(thread_id).await?;
    info!(%thread_id, status = %checkpoint.status, "thread cancelled");
    Ok(checkpoint)
  }

  /// Runs stages from `checkpoint.next_stage` and stores the result, failed or not.
  async fn drive(&self, mut checkpoint: Checkpoint) -> Result<Checkpoint, WorkflowError> {
    match self.run_stages(&mut checkpoint).await {
      Ok(()) => {
        self.checkpoints.put(checkpoint.clone()).await;
        Ok(checkpoint)
      }
      Err(e) => {
        warn!(thread_id = %checkpoint.thread_id, stage = %checkpoint.next_stage, error = %e, "run failed");
        checkpoint.status = RunStatus::Failed;
        checkpoint.failure = Some(e.to_string());
        checkpoint.log.finished_at = Some(Utc::now().to_rfc3339());
        self.checkpoints.put(checkpoint).await;
        Err(e)
      }
    }
  }

  async fn run_stages(&self, checkpoint: &mut Checkpoint) -> Result<(), WorkflowError> {
    loop {
      let stage = checkpoint.next_stage;
      let state = &checkpoint.state;
      let update = match stage {
        Stage::Analyze => analyze(state, &self.analyst, &self.config).await?,
        Stage::Critique => critique(state, &self.config).into_update(),
        Stage::Clarify => clarify(state, &self.clarifier).await?,
        Stage::Generate => generate(state, &self.config)?,
        Stage::Completed => {
          checkpoint.status = RunStatus::Completed;
          return Ok(());
        }
      };
      checkpoint.state = checkpoint.state.clone().apply(update);

      let next = match stage {
        Stage::Analyze => Stage::Critique,
        Stage::Critique => route_critique(&checkpoint.state, &self.config)?,
        Stage::Clarify => Stage::Analyze,
        Stage::Generate | Stage::Completed => Stage::Completed,
      };
      let suspended = next == Stage::Clarify;
      self.record(checkpoint, stage, next, suspended);
      checkpoint.next_stage = next;

      if suspended {
        checkpoint.status = RunStatus::Suspended;
        return Ok(());
      }
      if next == Stage::Completed {
        checkpoint.status = RunStatus::Completed;
        checkpoint.log.finished_at = Some(Utc::now().to_rfc3339());
        return Ok(());
      }
    }
  }

  fn record(&self, checkpoint: &mut Checkpoint, stage: Stage, next: Stage, suspended: bool) {
    let state = &checkpoint.state;
    info!(
      thread_id = %checkpoint.thread_id,
      stage = %stage,
      revision = state.revision_count,
      phase = %state.phase,
      next = %next,
      "stage executed"
    );
    checkpoint.log.steps.push(RunStepEntry {
      step: checkpoint.log.next_step(),
      stage,
      phase_after: state.phase,
      revision: state.revision_count,
      next_stage: (next != Stage::Completed).then_some(next),
      missing_info_after: state.missing_info.len(),
      recorded_at: Utc::now().to_rfc3339(),
    });
    if let Some(tx) = &self.events {
      let _ = tx.send(StageEvent {
        thread_id: checkpoint.thread_id,
        stage,
        phase: state.phase,
        revision: state.revision_count,
        next_stage: next,
        suspended,
      });
    }
  }
}
