//! # Batch Pipeline Module
//!
//! Sequential orchestration of the single-image compressor over a selection.
//!
//! ## Responsibilities:
//! - Filter the selection down to image media types, warning per exclusion
//! - Fail with `InvalidSelection` when nothing in the selection is an image
//! - Process the remaining sources strictly in input order, one at a time
//! - Stream each result into the result set (and to the observer) the moment
//!   it completes, so a consumer can render partial progress
//!
//! ## Policy choices:
//! - **Fail-fast**: the first per-file failure aborts the run; already
//!   streamed results stay in the collection
//! - **Sequential by design**: one decode/encode pipeline active at a time
//!   bounds peak memory and keeps result order equal to input order
//! - **Settings snapshot**: the settings value passed in is used unchanged
//!   for every file of the run

use crate::compressor::ImageCompressor;
use crate::config::CompressionSettings;
use crate::error::CompressError;
use crate::results::{ProcessedImage, ResultSet};
use crate::source::SourceFile;
use tracing::{info, warn};

/// Sequential batch runner over a list of source files.
pub struct BatchPipeline {
    compressor: ImageCompressor,
}

impl BatchPipeline {
    pub fn new(compressor: ImageCompressor) -> Self {
        Self { compressor }
    }

    /// Compress every image in `candidates` under one settings snapshot,
    /// appending results to `results` in input order as they complete.
    ///
    /// `on_item` fires once per appended result. On the first per-file
    /// failure the error propagates and remaining files are not processed.
    pub async fn run<F>(
        &self,
        candidates: &[SourceFile],
        settings: &CompressionSettings,
        results: &mut ResultSet,
        mut on_item: F,
    ) -> Result<(), CompressError>
    where
        F: FnMut(&ProcessedImage),
    {
        let images: Vec<&SourceFile> = candidates
            .iter()
            .filter(|source| {
                if source.is_image() {
                    true
                } else {
                    warn!(
                        "skipping non-image file: {} ({})",
                        source.name, source.media_type
                    );
                    false
                }
            })
            .collect();

        if images.is_empty() {
            return Err(CompressError::InvalidSelection);
        }

        info!("compressing {} file(s)", images.len());

        for source in images {
            let item = self.compressor.compress(source, settings).await?;
            on_item(results.push(item));
        }

        Ok(())
    }
}
