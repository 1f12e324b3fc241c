use thiserror::Error;

/// Error taxonomy for the zipbatch engine.
///
/// Per-file errors abort the remainder of the current job (fail-fast) and
/// surface as the job's terminal `Failed` outcome; they are never retried
/// internally.
#[derive(Error, Debug)]
pub enum ZipBatchError {
    #[error("I/O failure: {0}")]
    Io(String),

    #[error("invalid entry name '{name}' in archive {archive}")]
    InvalidEntryName { name: String, archive: String },

    #[error("not a valid archive: {0}")]
    NotAnArchive(String),

    #[error("invalid job request: {0}")]
    InvalidRequest(String),

    #[error("a job is already running on this runner")]
    RunnerBusy,

    #[error("job cancelled")]
    Cancelled,
}

impl From<std::io::Error> for ZipBatchError {
    fn from(err: std::io::Error) -> Self {
        ZipBatchError::Io(err.to_string())
    }
}

// Presentation collaborators usually want a plain string
impl From<ZipBatchError> for String {
    fn from(err: ZipBatchError) -> String {
        err.to_string()
    }
}
