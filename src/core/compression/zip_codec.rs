use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use zip::{write::SimpleFileOptions, CompressionMethod, ZipArchive, ZipWriter};

use crate::core::compression::common::StreamCodec;
use crate::models::ZipBatchError;
use crate::utils::progress::ProgressEmitter;

/// ZIP codec
///
/// Packs exactly one Deflate entry per produced archive and unpacks archives
/// entry-by-entry. All output goes through a staged temp file that is
/// atomically persisted on success, so a failure mid-stream never leaves a
/// readable-but-corrupt result; existing outputs are overwritten.
pub struct ZipCodec;

impl ZipCodec {
    pub fn new() -> Self {
        Self
    }
}

impl StreamCodec for ZipCodec {
    fn extension(&self) -> &'static str {
        "zip"
    }

    /// Compress one file into `dest_dir/<file name>.zip`.
    ///
    /// The source is streamed through `io::copy` in fixed-size chunks, so
    /// memory use is bounded regardless of file size.
    fn compress_one(&self, source: &Path, dest_dir: &Path) -> Result<PathBuf, ZipBatchError> {
        let entry_name = source
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| {
                ZipBatchError::InvalidRequest(format!(
                    "source {} has no file name",
                    source.display()
                ))
            })?;

        let output_path = dest_dir.join(format!("{}.{}", entry_name, self.extension()));

        let mut reader = File::open(source).map_err(|e| {
            ZipBatchError::Io(format!("failed to open source {}: {}", source.display(), e))
        })?;

        // Staged in the destination directory; dropped (deleted) on any
        // failure before persist
        let staging = tempfile::Builder::new()
            .prefix(".zipbatch-")
            .tempfile_in(dest_dir)
            .map_err(|e| {
                ZipBatchError::Io(format!(
                    "failed to create staging file in {}: {}",
                    dest_dir.display(),
                    e
                ))
            })?;

        let mut zip = ZipWriter::new(staging);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        zip.start_file(entry_name.as_str(), options).map_err(|e| {
            ZipBatchError::Io(format!("failed to start entry '{}': {}", entry_name, e))
        })?;

        io::copy(&mut reader, &mut zip).map_err(|e| {
            ZipBatchError::Io(format!("failed to compress {}: {}", source.display(), e))
        })?;

        let staging = zip.finish().map_err(|e| {
            ZipBatchError::Io(format!(
                "failed to finalize archive for {}: {}",
                source.display(),
                e
            ))
        })?;

        staging.persist(&output_path).map_err(|e| {
            ZipBatchError::Io(format!(
                "failed to write archive {}: {}",
                output_path.display(),
                e.error
            ))
        })?;

        tracing::debug!(source = %source.display(), archive = %output_path.display(), "compressed");
        Ok(output_path)
    }

    /// Unpack every entry of `archive` into `dest_dir` in stored order.
    ///
    /// Entry names are used verbatim to build destination paths, so empty
    /// names and names resolving outside `dest_dir` (zip-slip) are rejected.
    /// A container with zero entries succeeds with nothing written.
    fn decompress_one(
        &self,
        archive: &Path,
        dest_dir: &Path,
        progress: Option<&ProgressEmitter>,
    ) -> Result<Vec<PathBuf>, ZipBatchError> {
        let file = File::open(archive).map_err(|e| {
            ZipBatchError::Io(format!("failed to open archive {}: {}", archive.display(), e))
        })?;

        let mut zip = ZipArchive::new(file)
            .map_err(|e| ZipBatchError::NotAnArchive(format!("{}: {}", archive.display(), e)))?;

        // Progress total counts file entries only; directory entries are
        // created but not reported
        let mut total_files = 0usize;
        for index in 0..zip.len() {
            let entry = zip.by_index(index).map_err(|e| {
                ZipBatchError::Io(format!(
                    "failed to read entry {} of {}: {}",
                    index,
                    archive.display(),
                    e
                ))
            })?;
            if entry.is_file() {
                total_files += 1;
            }
        }

        let mut written = Vec::new();

        for index in 0..zip.len() {
            let mut entry = zip.by_index(index).map_err(|e| {
                ZipBatchError::Io(format!(
                    "failed to read entry {} of {}: {}",
                    index,
                    archive.display(),
                    e
                ))
            })?;

            let name = entry.name().to_string();
            if name.is_empty() {
                return Err(ZipBatchError::InvalidEntryName {
                    name,
                    archive: archive.display().to_string(),
                });
            }

            // Zip-slip guard: reject rather than silently skip
            let relative = entry.enclosed_name().ok_or_else(|| ZipBatchError::InvalidEntryName {
                name: name.clone(),
                archive: archive.display().to_string(),
            })?;

            let output_path = dest_dir.join(relative);

            if entry.is_dir() {
                fs::create_dir_all(&output_path).map_err(|e| {
                    ZipBatchError::Io(format!(
                        "failed to create directory {}: {}",
                        output_path.display(),
                        e
                    ))
                })?;
                continue;
            }

            if let Some(parent) = output_path.parent() {
                fs::create_dir_all(parent).map_err(|e| {
                    ZipBatchError::Io(format!(
                        "failed to create parent directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }

            let mut staging = tempfile::Builder::new()
                .prefix(".zipbatch-")
                .tempfile_in(output_path.parent().unwrap_or(dest_dir))
                .map_err(|e| {
                    ZipBatchError::Io(format!(
                        "failed to create staging file in {}: {}",
                        dest_dir.display(),
                        e
                    ))
                })?;

            io::copy(&mut entry, &mut staging).map_err(|e| {
                ZipBatchError::Io(format!(
                    "failed to extract '{}' from {}: {}",
                    name,
                    archive.display(),
                    e
                ))
            })?;

            staging.persist(&output_path).map_err(|e| {
                ZipBatchError::Io(format!(
                    "failed to write {}: {}",
                    output_path.display(),
                    e.error
                ))
            })?;

            written.push(output_path);
            if let Some(emitter) = progress {
                emitter.emit_progress(written.len(), total_files);
            }
        }

        tracing::debug!(archive = %archive.display(), files = written.len(), "decompressed");
        Ok(written)
    }
}

impl Default for ZipCodec {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::progress::{progress_channel, JobUpdate};
    use tempfile::TempDir;

    fn write_source(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    /// Build an archive with arbitrary entry names, bypassing compress_one.
    fn write_archive(path: &Path, entries: &[(&str, &[u8])]) {
        let file = File::create(path).unwrap();
        let mut zip = ZipWriter::new(file);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        for (name, content) in entries {
            zip.start_file(*name, options).unwrap();
            io::copy(&mut io::Cursor::new(content), &mut zip).unwrap();
        }
        zip.finish().unwrap();
    }

    #[test]
    fn test_round_trip_is_byte_identical() {
        let source_dir = TempDir::new().unwrap();
        let archive_dir = TempDir::new().unwrap();
        let restore_dir = TempDir::new().unwrap();

        let content: Vec<u8> = (0..50_000u32).map(|i| (i % 251) as u8).collect();
        let source = write_source(source_dir.path(), "data.bin", &content);

        let codec = ZipCodec::new();
        let archive = codec.compress_one(&source, archive_dir.path()).unwrap();
        assert_eq!(archive, archive_dir.path().join("data.bin.zip"));

        let written = codec
            .decompress_one(&archive, restore_dir.path(), None)
            .unwrap();
        assert_eq!(written, vec![restore_dir.path().join("data.bin")]);
        assert_eq!(fs::read(&written[0]).unwrap(), content);
    }

    #[test]
    fn test_round_trip_empty_file() {
        let source_dir = TempDir::new().unwrap();
        let archive_dir = TempDir::new().unwrap();
        let restore_dir = TempDir::new().unwrap();

        let source = write_source(source_dir.path(), "empty.txt", b"");

        let codec = ZipCodec::new();
        let archive = codec.compress_one(&source, archive_dir.path()).unwrap();
        let written = codec
            .decompress_one(&archive, restore_dir.path(), None)
            .unwrap();

        assert_eq!(written.len(), 1);
        assert_eq!(fs::read(&written[0]).unwrap(), b"");
    }

    #[test]
    fn test_compress_overwrites_existing_archive() {
        let source_dir = TempDir::new().unwrap();
        let archive_dir = TempDir::new().unwrap();

        let source = write_source(source_dir.path(), "a.txt", b"fresh content");
        fs::write(archive_dir.path().join("a.txt.zip"), b"stale").unwrap();

        let codec = ZipCodec::new();
        let archive = codec.compress_one(&source, archive_dir.path()).unwrap();

        let restore_dir = TempDir::new().unwrap();
        let written = codec
            .decompress_one(&archive, restore_dir.path(), None)
            .unwrap();
        assert_eq!(fs::read(&written[0]).unwrap(), b"fresh content");
    }

    #[test]
    fn test_compress_unreadable_source_leaves_no_output() {
        let archive_dir = TempDir::new().unwrap();

        let codec = ZipCodec::new();
        let result = codec.compress_one(Path::new("/nonexistent/input.txt"), archive_dir.path());
        assert!(matches!(result, Err(ZipBatchError::Io(_))));

        // No truncated container, no leftover staging file
        assert_eq!(fs::read_dir(archive_dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_decompress_empty_container() {
        let archive_dir = TempDir::new().unwrap();
        let restore_dir = TempDir::new().unwrap();

        let archive = archive_dir.path().join("empty.zip");
        write_archive(&archive, &[]);

        let (emitter, rx) = progress_channel(8);
        let codec = ZipCodec::new();
        let written = codec
            .decompress_one(&archive, restore_dir.path(), Some(&emitter))
            .unwrap();

        assert!(written.is_empty());
        assert_eq!(fs::read_dir(restore_dir.path()).unwrap().count(), 0);
        // Zero entries means zero progress ticks
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_decompress_preserves_nested_entries() {
        let archive_dir = TempDir::new().unwrap();
        let restore_dir = TempDir::new().unwrap();

        let archive = archive_dir.path().join("nested.zip");
        write_archive(
            &archive,
            &[("top.txt", b"top"), ("a/b/deep.txt", b"deep file")],
        );

        let codec = ZipCodec::new();
        let written = codec
            .decompress_one(&archive, restore_dir.path(), None)
            .unwrap();

        assert_eq!(written.len(), 2);
        assert_eq!(
            fs::read(restore_dir.path().join("a/b/deep.txt")).unwrap(),
            b"deep file"
        );
    }

    #[test]
    fn test_decompress_emits_tick_per_entry() {
        let archive_dir = TempDir::new().unwrap();
        let restore_dir = TempDir::new().unwrap();

        let archive = archive_dir.path().join("three.zip");
        write_archive(&archive, &[("a", b"1"), ("b", b"2"), ("c", b"3")]);

        let (emitter, rx) = progress_channel(8);
        let codec = ZipCodec::new();
        codec
            .decompress_one(&archive, restore_dir.path(), Some(&emitter))
            .unwrap();
        drop(emitter);

        let percents: Vec<u8> = rx
            .iter()
            .map(|update| match update {
                JobUpdate::Progress(event) => event.percent,
                other => panic!("unexpected update {:?}", other),
            })
            .collect();
        assert_eq!(percents, vec![33, 66, 100]);
    }

    #[test]
    fn test_decompress_rejects_path_traversal() {
        let archive_dir = TempDir::new().unwrap();
        let restore_base = TempDir::new().unwrap();
        let restore_dir = restore_base.path().join("dest");
        fs::create_dir(&restore_dir).unwrap();

        let archive = archive_dir.path().join("evil.zip");
        write_archive(&archive, &[("../evil.txt", b"escape attempt")]);

        let codec = ZipCodec::new();
        let result = codec.decompress_one(&archive, &restore_dir, None);
        assert!(matches!(
            result,
            Err(ZipBatchError::InvalidEntryName { .. })
        ));

        // Nothing escaped the destination directory
        assert!(!restore_base.path().join("evil.txt").exists());
        assert_eq!(fs::read_dir(&restore_dir).unwrap().count(), 0);
    }

    #[test]
    fn test_decompress_non_archive_fails() {
        let dir = TempDir::new().unwrap();
        let restore_dir = TempDir::new().unwrap();

        let bogus = write_source(dir.path(), "not.zip", b"this is not a zip container");

        let codec = ZipCodec::new();
        let result = codec.decompress_one(&bogus, restore_dir.path(), None);
        assert!(matches!(result, Err(ZipBatchError::NotAnArchive(_))));
    }
}
