use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use crate::core::compression::{is_valid_archive, StreamCodec, ZipCodec};
use crate::models::{Direction, JobOutcome, JobRequest, ZipBatchError};
use crate::utils::progress::ProgressEmitter;

/// Batch job runner
///
/// Sequences the files of one `JobRequest` through a codec on a background
/// thread, so the submitting thread never blocks. At most one job runs per
/// runner instance at a time; independent runners share no mutable state and
/// may run concurrently. Processing within a job is strictly sequential
/// because progress accounting and fail-fast semantics depend on a
/// deterministic per-file order.
pub struct BatchRunner {
    codec: Arc<dyn StreamCodec>,
    busy: Arc<AtomicBool>,
}

impl BatchRunner {
    /// Runner backed by the shipped zip codec.
    pub fn new() -> Self {
        Self::with_codec(Arc::new(ZipCodec::new()))
    }

    pub fn with_codec(codec: Arc<dyn StreamCodec>) -> Self {
        Self {
            codec,
            busy: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Start a job and return immediately.
    ///
    /// Fails with `RunnerBusy` if a job submitted through this runner is
    /// still running. Progress ticks and the terminal outcome flow through
    /// `emitter`; the outcome is delivered exactly once, always last.
    pub fn submit(
        &self,
        request: JobRequest,
        emitter: ProgressEmitter,
    ) -> Result<JobHandle, ZipBatchError> {
        if self.busy.swap(true, Ordering::AcqRel) {
            return Err(ZipBatchError::RunnerBusy);
        }

        let codec = Arc::clone(&self.codec);
        let busy = Arc::clone(&self.busy);
        let cancelled = Arc::new(AtomicBool::new(false));
        let cancel_flag = Arc::clone(&cancelled);

        let spawned = thread::Builder::new()
            .name("zipbatch-job".to_string())
            .spawn(move || {
                let outcome = run_job(codec.as_ref(), &request, &emitter, &cancel_flag);
                match &outcome {
                    JobOutcome::Succeeded => tracing::info!("job completed"),
                    JobOutcome::Failed(cause) => tracing::warn!(%cause, "job failed"),
                }
                emitter.emit_done(outcome);
                busy.store(false, Ordering::Release);
            });

        match spawned {
            Ok(handle) => Ok(JobHandle {
                cancelled,
                thread: handle,
            }),
            Err(e) => {
                self.busy.store(false, Ordering::Release);
                Err(ZipBatchError::Io(format!(
                    "failed to spawn job thread: {}",
                    e
                )))
            }
        }
    }
}

impl Default for BatchRunner {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle to one running job.
pub struct JobHandle {
    cancelled: Arc<AtomicBool>,
    thread: thread::JoinHandle<()>,
}

impl JobHandle {
    /// Request a cooperative stop. The flag is checked only at file
    /// boundaries; the in-flight file operation runs to completion (or its
    /// own failure), never interrupted mid-stream. A cancelled job ends with
    /// `Failed(Cancelled)`.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Block until the job's background thread exits.
    pub fn wait(self) {
        let _ = self.thread.join();
    }
}

fn run_job(
    codec: &dyn StreamCodec,
    request: &JobRequest,
    emitter: &ProgressEmitter,
    cancelled: &AtomicBool,
) -> JobOutcome {
    let total = request.sources().len();
    tracing::info!(files = total, direction = ?request.direction(), "job started");

    for (index, source) in request.sources().iter().enumerate() {
        if cancelled.load(Ordering::Acquire) {
            return JobOutcome::Failed(ZipBatchError::Cancelled);
        }

        match request.direction() {
            Direction::Compress => match codec.compress_one(source, request.destination()) {
                Ok(_) => emitter.emit_progress(index + 1, total),
                Err(cause) => return JobOutcome::Failed(cause),
            },
            Direction::Decompress => {
                if !is_valid_archive(source) {
                    return JobOutcome::Failed(ZipBatchError::NotAnArchive(
                        source.display().to_string(),
                    ));
                }
                // The codec ticks once per materialized entry
                if let Err(cause) =
                    codec.decompress_one(source, request.destination(), Some(emitter))
                {
                    return JobOutcome::Failed(cause);
                }
            }
        }
    }

    JobOutcome::Succeeded
}
