//! # Session Orchestrator Module
//!
//! Ties the settings store, the retained source list, the batch pipeline, the
//! result collection and the export manager together behind one interface.
//!
//! ## Flow:
//! 1. `select_files` retains the chosen sources for the whole session
//! 2. `apply_settings` validates and stores new settings; this never triggers
//!    reprocessing on its own
//! 3. `run` discards the previous result set (releasing its preview handles),
//!    snapshots the current settings and feeds the retained sources through
//!    the pipeline, streaming results to the caller's observer
//! 4. `export_one` / `export_all` package current results on demand
//!
//! A re-run always consumes the retained originals, never the previous run's
//! outputs, so repeated compression never compounds quality loss. Run
//! failures are logged, the processing flag is cleared on every exit path and
//! partial results that already streamed stay visible.

use crate::codec::{ImageCodec, RasterCodec};
use crate::compressor::ImageCompressor;
use crate::config::CompressionSettings;
use crate::error::CompressError;
use crate::export::ExportManager;
use crate::handle::{DisplayHandles, HandleRegistry};
use crate::pipeline::BatchPipeline;
use crate::results::{ProcessedImage, ResultSet, SavingsSummary};
use crate::source::SourceFile;
use std::sync::Arc;
use tracing::{error, warn};
use uuid::Uuid;

/// One user session: retained sources, current settings, current results.
pub struct CompressorSession {
    settings: CompressionSettings,
    sources: Vec<SourceFile>,
    results: ResultSet,
    pipeline: BatchPipeline,
    export: ExportManager,
    processing: bool,
}

impl CompressorSession {
    /// Create a session with the default codec and handle registry.
    pub fn new(
        settings: CompressionSettings,
        export: ExportManager,
    ) -> Result<Self, CompressError> {
        Self::with_codec(settings, export, Arc::new(RasterCodec::new()))
    }

    /// Create a session with a custom codec capability.
    pub fn with_codec(
        settings: CompressionSettings,
        export: ExportManager,
        codec: Arc<dyn ImageCodec>,
    ) -> Result<Self, CompressError> {
        settings
            .validate()
            .map_err(|e| CompressError::Validation(e.to_string()))?;

        let handles: Arc<dyn DisplayHandles> = Arc::new(HandleRegistry::new());
        let compressor = ImageCompressor::new(codec, handles.clone());

        Ok(Self {
            settings,
            sources: Vec::new(),
            results: ResultSet::new(handles),
            pipeline: BatchPipeline::new(compressor),
            export,
            processing: false,
        })
    }

    /// Replace the retained source list with a new selection.
    pub fn select_files(&mut self, sources: Vec<SourceFile>) {
        self.sources = sources;
    }

    pub fn sources(&self) -> &[SourceFile] {
        &self.sources
    }

    pub fn settings(&self) -> &CompressionSettings {
        &self.settings
    }

    /// Store new settings. Reprocessing only happens on an explicit `run`.
    pub fn apply_settings(&mut self, settings: CompressionSettings) -> Result<(), CompressError> {
        settings
            .validate()
            .map_err(|e| CompressError::Validation(e.to_string()))?;
        self.settings = settings;
        Ok(())
    }

    /// Run the batch pipeline over the retained sources.
    ///
    /// The previous result set is discarded (and its preview handles
    /// released) before the first file is processed. An invalid selection is
    /// rejected up front and leaves the previous results untouched. On
    /// failure the run aborts; results streamed before the failure remain
    /// available.
    pub async fn run<F>(&mut self, on_item: F) -> Result<(), CompressError>
    where
        F: FnMut(&ProcessedImage),
    {
        if !self.sources.iter().any(SourceFile::is_image) {
            warn!("selection contains no image files, keeping previous results");
            return Err(CompressError::InvalidSelection);
        }

        self.results.clear();
        self.processing = true;

        let settings = self.settings.clone();
        let outcome = self
            .pipeline
            .run(&self.sources, &settings, &mut self.results, on_item)
            .await;

        self.processing = false;

        if let Err(ref e) = outcome {
            error!("batch run failed: {}", e);
        }
        outcome
    }

    pub fn is_processing(&self) -> bool {
        self.processing
    }

    pub fn results(&self) -> &ResultSet {
        &self.results
    }

    /// Aggregate savings over the current results.
    pub fn summary(&self) -> SavingsSummary {
        self.results.summary()
    }

    /// Export a single result by identity. Returns the filename used.
    pub fn export_one(&self, id: Uuid) -> Result<String, CompressError> {
        let item = self
            .results
            .get(id)
            .ok_or_else(|| CompressError::Export(format!("no result with id {}", id)))?;
        self.export.export_one(item)
    }

    /// Export all current results as one archive. Returns the archive name.
    pub fn export_all(&self) -> Result<String, CompressError> {
        self.export.export_all(self.results.items())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::{DiskSaver, ZipArchiveBuilder};
    use image::{DynamicImage, ImageOutputFormat, RgbImage};
    use std::io::Cursor;
    use tempfile::TempDir;

    fn png_source(name: &str, width: u32, height: u32) -> SourceFile {
        let img = DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x % 200) as u8, (y % 200) as u8, 140])
        }));
        let mut cursor = Cursor::new(Vec::new());
        img.write_to(&mut cursor, ImageOutputFormat::Png).unwrap();
        SourceFile::new(name, cursor.into_inner())
    }

    fn session(out_dir: &TempDir) -> CompressorSession {
        let export = ExportManager::new(
            Box::new(DiskSaver::new(out_dir.path().to_path_buf())),
            Box::new(ZipArchiveBuilder::new()),
        );
        CompressorSession::new(CompressionSettings::default(), export).unwrap()
    }

    #[tokio::test]
    async fn test_run_streams_results_and_summary() {
        let out_dir = TempDir::new().unwrap();
        let mut session = session(&out_dir);
        session.select_files(vec![
            png_source("one.png", 40, 30),
            png_source("two.png", 50, 20),
        ]);

        let mut streamed = 0;
        session.run(|_| streamed += 1).await.unwrap();

        assert_eq!(streamed, 2);
        assert_eq!(session.results().len(), 2);
        assert!(!session.is_processing());

        let summary = session.summary();
        assert!(summary.total_original > 0);
        assert!((0.0..=100.0).contains(&summary.percent_saved()));
    }

    #[tokio::test]
    async fn test_apply_settings_does_not_reprocess() {
        let out_dir = TempDir::new().unwrap();
        let mut session = session(&out_dir);
        session.select_files(vec![png_source("one.png", 40, 30)]);
        session.run(|_| {}).await.unwrap();
        let before = session.results().items()[0].id;

        session
            .apply_settings(CompressionSettings {
                quality: 0.3,
                max_width: 320,
                max_height: 320,
            })
            .unwrap();

        // Results are untouched until an explicit re-run
        assert_eq!(session.results().items()[0].id, before);
    }

    #[tokio::test]
    async fn test_rerun_replaces_results_from_originals() {
        let out_dir = TempDir::new().unwrap();
        let mut session = session(&out_dir);
        let source = png_source("photo.png", 800, 600);
        let original_size = source.size();
        session.select_files(vec![source]);

        session.run(|_| {}).await.unwrap();
        let first_id = session.results().items()[0].id;

        session
            .apply_settings(CompressionSettings {
                quality: 0.9,
                max_width: 400,
                max_height: 400,
            })
            .unwrap();
        session.run(|_| {}).await.unwrap();

        let item = &session.results().items()[0];
        // Fresh identity, derived from the retained original source
        assert_ne!(item.id, first_id);
        assert_eq!(item.original_size, original_size);
        assert_eq!(item.compressed_dimensions.width, 400);
        assert_eq!(session.results().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_selection_leaves_session_stable() {
        let out_dir = TempDir::new().unwrap();
        let mut session = session(&out_dir);
        session.select_files(vec![SourceFile::new("doc.txt", b"words".to_vec())]);

        let err = session.run(|_| {}).await.unwrap_err();
        assert!(matches!(err, CompressError::InvalidSelection));
        assert!(!session.is_processing());
        assert!(session.results().is_empty());
    }

    #[tokio::test]
    async fn test_prior_results_survive_invalid_selection() {
        let out_dir = TempDir::new().unwrap();
        let mut session = session(&out_dir);
        session.select_files(vec![png_source("keep.png", 20, 20)]);
        session.run(|_| {}).await.unwrap();
        let kept = session.results().items()[0].id;
        let preview = session.results().items()[0].preview;

        session.select_files(vec![SourceFile::new("notes.txt", b"words".to_vec())]);
        let err = session.run(|_| {}).await.unwrap_err();
        assert!(matches!(err, CompressError::InvalidSelection));

        // Recoverable with no state change: results and their preview
        // handles are untouched
        assert_eq!(session.results().len(), 1);
        assert_eq!(session.results().items()[0].id, kept);
        assert_eq!(session.results().items()[0].preview, preview);
        assert!(!session.is_processing());
    }

    #[tokio::test]
    async fn test_export_one_unknown_id() {
        let out_dir = TempDir::new().unwrap();
        let session = session(&out_dir);
        assert!(matches!(
            session.export_one(Uuid::new_v4()),
            Err(CompressError::Export(_))
        ));
    }

    #[tokio::test]
    async fn test_run_then_export_all() {
        let out_dir = TempDir::new().unwrap();
        let mut session = session(&out_dir);
        session.select_files(vec![
            png_source("a.png", 20, 20),
            png_source("b.png", 20, 20),
        ]);
        session.run(|_| {}).await.unwrap();

        let archive = session.export_all().unwrap();
        assert!(out_dir.path().join(&archive).exists());
    }
}
