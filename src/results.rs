//! # Result Collection and Aggregation Module
//!
//! The observable result collection for a batch run, plus the savings
//! aggregator derived from it.
//!
//! ## Responsibilities:
//! - `ProcessedImage`: per-file compression result record
//! - `ResultSet`: ordered, append-only-per-run collection that owns every
//!   preview handle it contains
//! - `SavingsSummary`: aggregate bytes/percent saved over the current results
//! - Human-readable byte formatting for reports
//!
//! ## Handle ownership:
//! The result set releases all preview handles when it is cleared or dropped.
//! Clearing happens exactly once per run, before any new result is appended,
//! so handles never outlive the results they belong to.
//!
//! ## Aggregation rules:
//! - Total saved is signed: results may be larger than their sources
//! - Percent saved is clamped to 0 so a net-increase run reports 0%, and an
//!   empty (or zero-byte) result set reports 0%

use crate::handle::{DisplayHandle, DisplayHandles};
use crate::media::MediaType;
use crate::probe::Dimensions;
use std::sync::Arc;
use uuid::Uuid;

/// One compression result, derived from exactly one source file plus the
/// settings snapshot active at derivation time.
#[derive(Debug, Clone)]
pub struct ProcessedImage {
    pub id: Uuid,
    pub name: String,
    pub original_size: u64,
    pub compressed_size: u64,
    pub original_dimensions: Dimensions,
    pub compressed_dimensions: Dimensions,
    pub media_type: MediaType,
    pub blob: Arc<[u8]>,
    pub preview: DisplayHandle,
}

impl ProcessedImage {
    /// Fraction of this item's bytes saved, clamped to 0 for items that grew.
    pub fn savings_ratio(&self) -> f64 {
        if self.original_size == 0 {
            return 0.0;
        }
        (1.0 - self.compressed_size as f64 / self.original_size as f64).max(0.0)
    }
}

/// Ordered result collection for the current run, owner of all preview
/// handles within it.
pub struct ResultSet {
    handles: Arc<dyn DisplayHandles>,
    items: Vec<ProcessedImage>,
}

impl ResultSet {
    pub fn new(handles: Arc<dyn DisplayHandles>) -> Self {
        Self {
            handles,
            items: Vec::new(),
        }
    }

    /// Append a freshly produced result, preserving input order.
    pub fn push(&mut self, item: ProcessedImage) -> &ProcessedImage {
        self.items.push(item);
        self.items.last().expect("just pushed")
    }

    pub fn items(&self) -> &[ProcessedImage] {
        &self.items
    }

    pub fn get(&self, id: Uuid) -> Option<&ProcessedImage> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Discard all results, releasing every preview handle first.
    pub fn clear(&mut self) {
        for item in self.items.drain(..) {
            self.handles.release(item.preview);
        }
    }

    /// Aggregate savings over the current results.
    pub fn summary(&self) -> SavingsSummary {
        let mut summary = SavingsSummary::default();
        for item in &self.items {
            summary.total_original += item.original_size;
            summary.total_compressed += item.compressed_size;
        }
        summary
    }
}

impl Drop for ResultSet {
    fn drop(&mut self) {
        self.clear();
    }
}

/// Aggregate byte totals for a result set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SavingsSummary {
    pub total_original: u64,
    pub total_compressed: u64,
}

impl SavingsSummary {
    /// Net bytes saved; negative when results grew overall.
    pub fn total_saved(&self) -> i64 {
        self.total_original as i64 - self.total_compressed as i64
    }

    /// Percentage saved in [0, 100]; net increases display as 0%.
    pub fn percent_saved(&self) -> f64 {
        if self.total_original == 0 {
            return 0.0;
        }
        (self.total_saved() as f64 / self.total_original as f64 * 100.0).max(0.0)
    }
}

/// Format a byte count for display.
///
/// One decimal below ten units, an integer at or above: 1536 -> "1.5 KB",
/// 15360 -> "15 KB".
pub fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else if size < 10.0 {
        format!("{:.1} {}", size, UNITS[unit_index])
    } else {
        format!("{} {}", size.round() as u64, UNITS[unit_index])
    }
}
