//! # Shrinkpack Library
//!
//! Local batch image compression with per-file savings metrics and ZIP export.
//!
//! ## Module architecture:
//! - `config`: Compression settings, validation and JSON persistence
//! - `error`: Custom error types for the pipeline and its capabilities
//! - `media`: Declared media types and their classification
//! - `source`: Retained source files and image discovery
//! - `handle`: Revocable display handles for previews
//! - `probe`: Natural dimension probing (raster headers, SVG attributes)
//! - `codec`: Re-encode capability and the `image`-backed default codec
//! - `compressor`: Single-image compression pipeline
//! - `pipeline`: Sequential batch orchestration with streamed results
//! - `results`: Result collection, handle ownership and savings aggregation
//! - `export`: Per-file and archive export through save capabilities
//! - `session`: Session orchestrator tying everything together
//! - `progress`: CLI progress reporting
//!
//! ## Usage:
//! ```rust,no_run
//! use shrinkpack::{CompressionSettings, CompressorSession, ExportManager};
//! use shrinkpack::{DiskSaver, SourceFile, ZipArchiveBuilder};
//!
//! # async fn demo() -> Result<(), shrinkpack::CompressError> {
//! let export = ExportManager::new(
//!     Box::new(DiskSaver::new("compressed".into())),
//!     Box::new(ZipArchiveBuilder::new()),
//! );
//! let mut session = CompressorSession::new(CompressionSettings::default(), export)?;
//! session.select_files(vec![SourceFile::new("photo.png", std::fs::read("photo.png")?)]);
//! session.run(|item| println!("{}: {:.1}% saved", item.name, item.savings_ratio() * 100.0)).await?;
//! session.export_all()?;
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod compressor;
pub mod config;
pub mod error;
pub mod export;
pub mod handle;
pub mod media;
pub mod pipeline;
pub mod probe;
pub mod progress;
pub mod results;
pub mod session;
pub mod source;

pub use codec::{EncodedImage, ImageCodec, RasterCodec, ReencodeRequest};
pub use config::CompressionSettings;
pub use error::{CodecError, CompressError};
pub use export::{ArchiveBuilder, DiskSaver, ExportManager, FileSaver, ZipArchiveBuilder};
pub use handle::{DisplayHandle, DisplayHandles, HandleRegistry};
pub use media::MediaType;
pub use pipeline::BatchPipeline;
pub use probe::{probe_dimensions, Dimensions};
pub use progress::ProgressManager;
pub use results::{format_size, ProcessedImage, ResultSet, SavingsSummary};
pub use session::CompressorSession;
pub use source::{find_image_files, SourceFile};
