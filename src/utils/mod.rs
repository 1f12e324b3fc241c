pub mod progress;

pub use progress::{progress_channel, JobUpdate, ProgressEmitter};
