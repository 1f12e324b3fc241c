use crossbeam_channel::{bounded, Receiver, Sender};

use crate::models::{JobOutcome, ProgressEvent};

/// Message flowing from the runner to its consumer.
///
/// Within one job the stream is ordered: zero or more `Progress` ticks with
/// strictly increasing `completed`, then exactly one `Done`.
#[derive(Debug)]
pub enum JobUpdate {
    Progress(ProgressEvent),
    Done(JobOutcome),
}

/// Create a bounded runner-to-consumer channel.
///
/// Size the capacity at least `units + 1` (file count plus the terminal
/// message) if no tick may be dropped; a lagging consumer only ever loses
/// ticks, never the outcome.
pub fn progress_channel(capacity: usize) -> (ProgressEmitter, Receiver<JobUpdate>) {
    let (tx, rx) = bounded(capacity);
    (ProgressEmitter { tx }, rx)
}

/// Producer half of the progress channel.
///
/// Delivery is fire-and-forget from the runner's perspective: progress ticks
/// are dropped rather than blocking when the channel is full, and a consumer
/// that has gone away is ignored entirely.
pub struct ProgressEmitter {
    tx: Sender<JobUpdate>,
}

impl ProgressEmitter {
    /// Emit a progress tick for `completed` of `total` finished units.
    pub fn emit_progress(&self, completed: usize, total: usize) {
        let event = ProgressEvent::new(completed, total);
        tracing::debug!(completed, total, percent = event.percent, "progress");
        let _ = self.tx.try_send(JobUpdate::Progress(event));
    }

    /// Deliver the terminal outcome. Called exactly once per job, after the
    /// last tick; waits for channel room rather than dropping the message.
    pub fn emit_done(&self, outcome: JobOutcome) {
        let _ = self.tx.send(JobUpdate::Done(outcome));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ZipBatchError;

    #[test]
    fn test_updates_arrive_in_order() {
        let (emitter, rx) = progress_channel(8);
        emitter.emit_progress(1, 2);
        emitter.emit_progress(2, 2);
        emitter.emit_done(JobOutcome::Succeeded);

        match rx.recv().unwrap() {
            JobUpdate::Progress(event) => assert_eq!(event.percent, 50),
            other => panic!("expected progress, got {:?}", other),
        }
        match rx.recv().unwrap() {
            JobUpdate::Progress(event) => assert_eq!(event.percent, 100),
            other => panic!("expected progress, got {:?}", other),
        }
        assert!(matches!(rx.recv().unwrap(), JobUpdate::Done(JobOutcome::Succeeded)));
    }

    #[test]
    fn test_ticks_are_lossy_when_consumer_lags() {
        let (emitter, rx) = progress_channel(1);
        emitter.emit_progress(1, 3);
        // Channel full: these two are dropped, not blocked on
        emitter.emit_progress(2, 3);
        emitter.emit_progress(3, 3);

        match rx.recv().unwrap() {
            JobUpdate::Progress(event) => assert_eq!(event.completed, 1),
            other => panic!("expected progress, got {:?}", other),
        }
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_emit_ignores_dropped_consumer() {
        let (emitter, rx) = progress_channel(1);
        drop(rx);
        emitter.emit_progress(1, 1);
        emitter.emit_done(JobOutcome::Failed(ZipBatchError::Cancelled));
    }
}
