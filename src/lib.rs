//! zipbatch — batch archive engine.
//!
//! Streams input files through a zip/deflate codec (one source file per
//! produced archive), or unpacks one archive into a directory, sequencing
//! multiple files as a single job on a background thread. Progress ticks and
//! a terminal outcome flow to the caller over a bounded channel, so a driving
//! interface never blocks and never polls.
//!
//! ```no_run
//! use zipbatch::{progress_channel, BatchRunner, Direction, JobRequest, JobUpdate};
//!
//! # fn main() -> Result<(), zipbatch::ZipBatchError> {
//! let request = JobRequest::new(
//!     vec!["a.txt".into(), "b.txt".into()],
//!     "out".into(),
//!     Direction::Compress,
//! )?;
//!
//! let runner = BatchRunner::new();
//! let (emitter, updates) = progress_channel(16);
//! let handle = runner.submit(request, emitter)?;
//!
//! for update in updates.iter() {
//!     match update {
//!         JobUpdate::Progress(event) => println!("{}%", event.percent),
//!         JobUpdate::Done(outcome) => println!("{:?}", outcome),
//!     }
//! }
//! handle.wait();
//! # Ok(())
//! # }
//! ```

// Module declarations
pub mod core;
pub mod models;
pub mod utils;

pub use crate::core::compression::{is_valid_archive, StreamCodec, ZipCodec};
pub use crate::core::runner::{BatchRunner, JobHandle};
pub use models::{Direction, JobOutcome, JobRequest, ProgressEvent, ZipBatchError};
pub use utils::progress::{progress_channel, JobUpdate, ProgressEmitter};
