use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::models::ZipBatchError;

/// Direction of one batch job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Direction {
    Compress,
    Decompress,
}

/// Immutable description of one batch invocation.
///
/// Validated at construction: sources must be readable files and the
/// destination an existing directory. A request is consumed by exactly one
/// `BatchRunner::submit` call and does not outlive it.
#[derive(Debug)]
pub struct JobRequest {
    sources: Vec<PathBuf>,
    destination: PathBuf,
    direction: Direction,
}

impl JobRequest {
    /// Build a request, checking its invariants up front.
    ///
    /// Decompression unpacks exactly one archive at a time, so a decompress
    /// request must carry exactly one source.
    pub fn new(
        sources: Vec<PathBuf>,
        destination: PathBuf,
        direction: Direction,
    ) -> Result<Self, ZipBatchError> {
        if sources.is_empty() {
            return Err(ZipBatchError::InvalidRequest(
                "no source files given".to_string(),
            ));
        }

        if direction == Direction::Decompress && sources.len() != 1 {
            return Err(ZipBatchError::InvalidRequest(format!(
                "decompression takes exactly one archive, got {}",
                sources.len()
            )));
        }

        for source in &sources {
            if !source.is_file() {
                return Err(ZipBatchError::InvalidRequest(format!(
                    "source {} is not a readable file",
                    source.display()
                )));
            }
        }

        if !destination.is_dir() {
            return Err(ZipBatchError::InvalidRequest(format!(
                "destination {} is not a directory",
                destination.display()
            )));
        }

        Ok(Self {
            sources,
            destination,
            direction,
        })
    }

    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }
}

/// Progress tick emitted after each unit of work finishes, never before.
///
/// `percent` is `floor(completed / total * 100)` and monotonically
/// non-decreasing within one job.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEvent {
    pub completed: usize,
    pub total: usize,
    pub percent: u8,
}

impl ProgressEvent {
    pub fn new(completed: usize, total: usize) -> Self {
        let percent = if total == 0 {
            100
        } else {
            ((completed as f64 / total as f64) * 100.0).floor() as u8
        };
        Self {
            completed,
            total,
            percent,
        }
    }
}

/// Terminal value of one job, delivered exactly once, always last.
#[derive(Debug)]
pub enum JobOutcome {
    Succeeded,
    Failed(ZipBatchError),
}

impl JobOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, JobOutcome::Succeeded)
    }
}
