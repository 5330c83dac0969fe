//! # Export Manager Module
//!
//! Packages compression results into downloadable artifacts.
//!
//! ## Responsibilities:
//! - Derive per-result output filenames (`photo.png` -> `photo-compressed.png`)
//! - Export one result through the file-save capability
//! - Export all results as a single timestamped ZIP archive
//!
//! ## Capabilities:
//! - `FileSaver`: hands a named blob to the outside world (default writes to
//!   an output directory on disk)
//! - `ArchiveBuilder`: serializes (name, blob) pairs into one archive blob
//!   (default backed by the `zip` crate)
//!
//! Duplicate derived names inside an archive are not de-duplicated; the last
//! entry wins. Export failures never touch the retained result set.

use crate::error::CompressError;
use crate::media::MediaType;
use crate::results::ProcessedImage;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Suffix appended to the source file stem of every exported result.
const COMPRESSED_SUFFIX: &str = "-compressed";
/// Extension used when the output media type carries no usable extension.
const FALLBACK_EXTENSION: &str = "jpg";

/// Capability that hands a finished blob to the user, fire-and-forget.
pub trait FileSaver: Send + Sync {
    fn save(&self, filename: &str, blob: &[u8]) -> Result<(), CompressError>;
}

/// Default saver: writes blobs into an output directory.
pub struct DiskSaver {
    out_dir: PathBuf,
}

impl DiskSaver {
    pub fn new(out_dir: PathBuf) -> Self {
        Self { out_dir }
    }
}

impl FileSaver for DiskSaver {
    fn save(&self, filename: &str, blob: &[u8]) -> Result<(), CompressError> {
        std::fs::create_dir_all(&self.out_dir)?;
        std::fs::write(self.out_dir.join(filename), blob)?;
        Ok(())
    }
}

/// Capability that serializes a set of named blobs into one archive blob.
pub trait ArchiveBuilder: Send + Sync {
    fn build(&self, entries: &[(String, &[u8])]) -> Result<Vec<u8>, CompressError>;
}

/// Default archive builder producing a ZIP blob.
#[derive(Default)]
pub struct ZipArchiveBuilder;

impl ZipArchiveBuilder {
    pub fn new() -> Self {
        Self
    }
}

impl ArchiveBuilder for ZipArchiveBuilder {
    fn build(&self, entries: &[(String, &[u8])]) -> Result<Vec<u8>, CompressError> {
        let mut writer = ZipWriter::new(std::io::Cursor::new(Vec::new()));
        let options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        for (name, blob) in entries {
            writer
                .start_file(name.as_str(), options)
                .map_err(|e| CompressError::Export(e.to_string()))?;
            writer
                .write_all(blob)
                .map_err(|e| CompressError::Export(e.to_string()))?;
        }

        let cursor = writer
            .finish()
            .map_err(|e| CompressError::Export(e.to_string()))?;
        Ok(cursor.into_inner())
    }
}

/// Packages results into downloadable artifacts via the save and archive
/// capabilities.
pub struct ExportManager {
    saver: Box<dyn FileSaver>,
    archiver: Box<dyn ArchiveBuilder>,
}

impl ExportManager {
    pub fn new(saver: Box<dyn FileSaver>, archiver: Box<dyn ArchiveBuilder>) -> Self {
        Self { saver, archiver }
    }

    /// Save one result under its derived filename. Returns the filename used.
    pub fn export_one(&self, item: &ProcessedImage) -> Result<String, CompressError> {
        let filename = derive_output_name(&item.name, &item.media_type);
        self.saver.save(&filename, &item.blob)?;
        info!("exported {}", filename);
        Ok(filename)
    }

    /// Archive every result under its derived filename and save the archive
    /// under a timestamped name. Returns the archive filename.
    pub fn export_all(&self, items: &[ProcessedImage]) -> Result<String, CompressError> {
        if items.is_empty() {
            return Err(CompressError::Export("nothing to export".to_string()));
        }

        let entries: Vec<(String, &[u8])> = items
            .iter()
            .map(|item| {
                (
                    derive_output_name(&item.name, &item.media_type),
                    item.blob.as_ref(),
                )
            })
            .collect();

        let archive = self.archiver.build(&entries)?;
        let filename = archive_filename(chrono::Local::now());
        self.saver.save(&filename, &archive)?;
        info!("exported {} file(s) into {}", items.len(), filename);
        Ok(filename)
    }
}

/// Derive the output filename for a result: source stem, `-compressed`
/// suffix, extension taken from the output media type.
pub fn derive_output_name(original: &str, media_type: &MediaType) -> String {
    let stem = original
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(original);
    let extension = media_type.extension().unwrap_or(FALLBACK_EXTENSION);
    format!("{}{}.{}", stem, COMPRESSED_SUFFIX, extension)
}

fn archive_filename(now: chrono::DateTime<chrono::Local>) -> String {
    format!("compressed-images-{}.zip", now.format("%Y%m%d-%H%M%S"))
}
