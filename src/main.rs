//! # Shrinkpack - Main Entry Point
//!
//! CLI front-end for the batch image compressor.
//!
//! ## Execution flow:
//! 1. Parse CLI arguments (inputs, quality, dimension bounds, export mode)
//! 2. Configure logging (INFO, or DEBUG with the verbose flag)
//! 3. Discover and load the selected image files
//! 4. Run the batch pipeline with a progress bar
//! 5. Report per-file and aggregate savings
//! 6. Export the results individually or as one ZIP archive
//!
//! ## Example:
//! ```bash
//! shrinkpack ./photos --quality 0.7 --max-width 1920 --archive --verbose
//! ```

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use shrinkpack::{
    find_image_files, format_size, CompressionSettings, CompressorSession, DiskSaver,
    ExportManager, ProcessedImage, ProgressManager, SourceFile, ZipArchiveBuilder,
};

#[derive(Parser)]
#[command(name = "shrinkpack")]
#[command(about = "Compress images locally and export them individually or as a ZIP archive")]
struct Args {
    /// Image files or directories to compress
    inputs: Vec<PathBuf>,

    /// Output quality as a fraction (0.0-1.0)
    #[arg(short, long, default_value = "0.7")]
    quality: f64,

    /// Maximum output width in pixels
    #[arg(long, default_value = "1920")]
    max_width: u32,

    /// Maximum output height in pixels
    #[arg(long, default_value = "1920")]
    max_height: u32,

    /// Output directory for compressed files
    #[arg(short, long, default_value = "compressed")]
    output: PathBuf,

    /// Export all results as a single ZIP archive instead of individual files
    #[arg(long)]
    archive: bool,

    /// Load settings from a JSON file (overrides quality/dimension flags)
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    if args.inputs.is_empty() {
        return Err(anyhow::anyhow!("No input files or directories given"));
    }

    for input in &args.inputs {
        if !input.exists() {
            return Err(anyhow::anyhow!("Input does not exist: {}", input.display()));
        }
    }

    let settings = match &args.settings {
        Some(path) => CompressionSettings::from_file(path).await?,
        None => CompressionSettings::clamped(args.quality, args.max_width, args.max_height),
    };

    info!(
        "🎯 Settings: quality {:.2}, longest edge {}",
        settings.quality,
        settings
            .target_longest_edge()
            .map(|e| format!("{} px", e))
            .unwrap_or_else(|| "unconstrained".to_string())
    );

    // Expand directories and load every selected file into memory
    let mut sources = Vec::new();
    for input in &args.inputs {
        for path in find_image_files(input) {
            sources.push(SourceFile::from_path(&path).await?);
        }
    }

    if sources.is_empty() {
        return Err(anyhow::anyhow!("No image files found in the selection"));
    }
    info!("Found {} image file(s) to compress", sources.len());

    let export = ExportManager::new(
        Box::new(DiskSaver::new(args.output.clone())),
        Box::new(ZipArchiveBuilder::new()),
    );
    let mut session = CompressorSession::new(settings, export)?;
    session.select_files(sources);

    let progress = ProgressManager::new(session.sources().len() as u64);
    let run_outcome = session
        .run(|item: &ProcessedImage| {
            progress.update(&format!(
                "✅ {}: {:.1}% saved",
                item.name,
                item.savings_ratio() * 100.0
            ));
        })
        .await;

    if run_outcome.is_err() {
        progress.abandon("❌ compression failed");
        // Details are already in the log; keep the user-facing message generic
        return Err(anyhow::anyhow!("Compression run failed"));
    }

    let summary = session.summary();
    progress.finish(&format!(
        "Compressed {} file(s) | saved {} ({:.1}%)",
        session.results().len(),
        format_size(summary.total_saved().max(0) as u64),
        summary.percent_saved()
    ));

    print_report(&session);

    if args.archive {
        let archive = session.export_all()?;
        info!("📦 Archive written to {}", args.output.join(archive).display());
    } else {
        for item in session.results().items() {
            let filename = session.export_one(item.id)?;
            info!("💾 {}", args.output.join(filename).display());
        }
    }

    Ok(())
}

fn print_report(session: &CompressorSession) {
    info!("=== Compression Report ===");
    for item in session.results().items() {
        info!(
            "{}: {} -> {} ({:.1}% saved), {}x{} -> {}x{}",
            item.name,
            format_size(item.original_size),
            format_size(item.compressed_size),
            item.savings_ratio() * 100.0,
            item.original_dimensions.width,
            item.original_dimensions.height,
            item.compressed_dimensions.width,
            item.compressed_dimensions.height,
        );
    }

    let summary = session.summary();
    info!("Total input: {}", format_size(summary.total_original));
    info!("Total output: {}", format_size(summary.total_compressed));
    info!("Bytes saved: {}", format_size(summary.total_saved().max(0) as u64));
    info!("Percent saved: {:.2}%", summary.percent_saved());
}
