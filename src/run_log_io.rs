//! Run directory files: the thread's run log and its last checkpoint, both as pretty JSON.

use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::instrument;

use crate::types::{Checkpoint, RunLog};

/// Filename of the run log under a run directory.
pub const RUN_LOG_FILENAME: &str = "run.log.json";
/// Filename of the checkpoint under a run directory.
pub const CHECKPOINT_FILENAME: &str = "checkpoint.json";

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), std::io::Error> {
  let json = serde_json::to_string_pretty(value)
    .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
  if let Some(parent) = path.parent() {
    std::fs::create_dir_all(parent)?;
  }
  std::fs::write(path, json)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, std::io::Error> {
  let bytes = std::fs::read(path)?;
  serde_json::from_slice(&bytes).map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}

/// Writes `log` to `path`, creating the parent directory if needed.
#[instrument(level = "trace", skip(path, log))]
pub fn write_run_log(path: &Path, log: &RunLog) -> Result<(), std::io::Error> {
  write_json(path, log)
}

/// Loads a run log. Fails if the file is missing or not a run log.
#[instrument(level = "trace", skip(path))]
pub fn load_run_log(path: &Path) -> Result<RunLog, std::io::Error> {
  read_json(path)
}

#[instrument(level = "trace", skip(path, cp))]
pub fn save_checkpoint(path: &Path, cp: &Checkpoint) -> Result<(), std::io::Error> {
  write_json(path, cp)
}

/// Loads a checkpoint. The artifact's integrity check runs again on load.
#[instrument(level = "trace", skip(path))]
pub fn load_checkpoint(path: &Path) -> Result<Checkpoint, std::io::Error> {
  read_json(path)
}

/// Writes both files of `cp` under `run_dir`.
pub fn write_run_dir(run_dir: &Path, cp: &Checkpoint) -> Result<(), std::io::Error> {
  write_run_log(&run_dir.join(RUN_LOG_FILENAME), &cp.log)?;
  save_checkpoint(&run_dir.join(CHECKPOINT_FILENAME), cp)
}
