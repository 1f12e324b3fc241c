pub mod error;
pub mod job;

// Re-export commonly used types
pub use error::ZipBatchError;
pub use job::{Direction, JobOutcome, JobRequest, ProgressEvent};
