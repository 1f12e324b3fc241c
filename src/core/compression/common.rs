// Codec trait for per-file archive transforms

use std::path::{Path, PathBuf};

use crate::models::ZipBatchError;
use crate::utils::progress::ProgressEmitter;

/// Per-file transform into and out of a compressed container.
///
/// A codec knows nothing about batching: it handles exactly one source file
/// (or one archive) per call. Sequencing, progress accounting and
/// cancellation live in the runner.
pub trait StreamCodec: Send + Sync {
    /// File extension appended to produced archives (without the dot).
    fn extension(&self) -> &'static str;

    /// Compress one file into `dest_dir/<file name>.<extension>` holding a
    /// single entry named after the source. Returns the archive path.
    ///
    /// Must stream in bounded chunks and must not leave a truncated container
    /// behind on failure.
    fn compress_one(&self, source: &Path, dest_dir: &Path) -> Result<PathBuf, ZipBatchError>;

    /// Unpack every entry of `archive` into `dest_dir`, streaming
    /// chunk-by-chunk. Returns the written file paths in stored order.
    ///
    /// Entry names are used verbatim under `dest_dir`; names that are empty
    /// or resolve outside it must fail with `InvalidEntryName`. When a
    /// progress emitter is given, one tick is emitted per materialized file.
    fn decompress_one(
        &self,
        archive: &Path,
        dest_dir: &Path,
        progress: Option<&ProgressEmitter>,
    ) -> Result<Vec<PathBuf>, ZipBatchError>;
}
