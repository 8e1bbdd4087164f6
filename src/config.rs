//! Workflow and layout configuration.
//!
//! Every field has a default, so a JSON file only needs the keys it overrides.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::instrument;

use crate::error::ConfigError;

/// Default minimum analyst confidence for a sufficient artifact.
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.70;
/// Default cap on analyze passes per thread.
pub const DEFAULT_MAX_REVISIONS: u32 = 10;

/// Geometry constants of the Manhattan grid layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
  pub origin_x: i32,
  pub origin_y: i32,
  /// Horizontal advance between consecutive nodes.
  pub horizontal_step: i32,
  /// Vertical offset of data objects relative to their task (negative is up).
  pub data_object_offset_y: i32,
  pub boundary_offset_x: i32,
  pub boundary_offset_y: i32,
  /// Vertical center difference above which a connector gets an elbow.
  pub elbow_threshold: i32,
}

impl Default for LayoutConfig {
  fn default() -> Self {
    Self {
      origin_x: 200,
      origin_y: 200,
      horizontal_step: 180,
      data_object_offset_y: -100,
      boundary_offset_x: 80,
      boundary_offset_y: 60,
      elbow_threshold: 10,
    }
  }
}

/// Workflow configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
  /// Analyst confidence below this makes the artifact insufficient.
  pub confidence_threshold: f64,
  /// Maximum analyze passes per thread before the run is aborted.
  pub max_revisions: u32,
  pub layout: LayoutConfig,
}

impl Default for WorkflowConfig {
  fn default() -> Self {
    Self {
      confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
      max_revisions: DEFAULT_MAX_REVISIONS,
      layout: LayoutConfig::default(),
    }
  }
}

impl WorkflowConfig {
  /// Loads a config from a JSON file. Missing keys keep their defaults.
  #[instrument(level = "trace", skip(path))]
  pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
    let bytes = std::fs::read(path).map_err(|source| ConfigError::Io {
      path: path.to_path_buf(),
      source,
    })?;
    Self::from_json_slice(&bytes)
  }

  pub fn from_json_slice(bytes: &[u8]) -> Result<Self, ConfigError> {
    Ok(serde_json::from_slice(bytes)?)
  }
}
