//! In-memory checkpoint store keyed by thread id.
//!
//! The store is the single owner of every thread's latest [Checkpoint]. A thread whose
//! checkpoint is [RunStatus::Running] belongs to the task driving it; nobody else may resume
//! or cancel it until that run stores its result.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::instrument;

use crate::error::WorkflowError;
use crate::types::{Checkpoint, RunStatus, ThreadId};

#[derive(Debug, Clone, Default)]
pub struct MemoryCheckpointer {
  threads: Arc<Mutex<HashMap<ThreadId, Checkpoint>>>,
}

impl MemoryCheckpointer {
  pub fn new() -> Self {
    Self::default()
  }

  /// Stores `checkpoint`, replacing any previous one for the same thread.
  #[instrument(level = "trace", skip(self, checkpoint), fields(thread_id = %checkpoint.thread_id))]
  pub async fn put(&self, checkpoint: Checkpoint) {
    self
      .threads
      .lock()
      .await
      .insert(checkpoint.thread_id, checkpoint);
  }

  pub async fn get(&self, thread_id: ThreadId) -> Option<Checkpoint> {
    self.threads.lock().await.get(&thread_id).cloned()
  }

  /// Claims a suspended thread for resumption: marks it running and returns its checkpoint.
  ///
  /// Only one claim can succeed per suspension; a second concurrent claim gets
  /// [WorkflowError::ThreadBusy].
  #[instrument(level = "trace", skip(self))]
  pub async fn claim_suspended(&self, thread_id: ThreadId) -> Result<Checkpoint, WorkflowError> {
    let mut threads = self.threads.lock().await;
    let checkpoint = threads
      .get_mut(&thread_id)
      .ok_or(WorkflowError::UnknownThread(thread_id))?;
    match checkpoint.status {
      RunStatus::Suspended => {
        checkpoint.status = RunStatus::Running;
        Ok(checkpoint.clone())
      }
      RunStatus::Running => Err(WorkflowError::ThreadBusy(thread_id)),
      RunStatus::Completed | RunStatus::Failed => Err(WorkflowError::NotSuspended(thread_id)),
    }
  }

  /// Drops a thread that is not currently running and returns its last checkpoint.
  #[instrument(level = "trace", skip(self))]
  pub async fn remove(&self, thread_id: ThreadId) -> Result<Checkpoint, WorkflowError> {
    let mut threads = self.threads.lock().await;
    match threads.get(&thread_id).map(|cp| cp.status) {
      None => Err(WorkflowError::UnknownThread(thread_id)),
      Some(RunStatus::Running) => Err(WorkflowError::ThreadBusy(thread_id)),
      Some(_) => threads
        .remove(&thread_id)
        .ok_or(WorkflowError::UnknownThread(thread_id)),
    }
  }

  /// Ids of every stored thread, sorted.
  pub async fn thread_ids(&self) -> Vec<ThreadId> {
    let mut ids: Vec<ThreadId> = self.threads.lock().await.keys().copied().collect();
    ids.sort();
    ids
  }
}
