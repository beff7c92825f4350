//! # Easel Thumbnail Backfill
//!
//! Operational tool that regenerates thumbnails for images already in the
//! upload directory. Runs independently of the API server, for recovery
//! after a lost `thumbs/` directory or a thumbnail-size change.
//!
//! The scan covers regular files with an allowed image extension directly
//! in the upload directory. Existing thumbnails are kept unless `--force`
//! is given. Per-file failures are logged and counted but never abort the
//! run; the exit code is non-zero only when the upload directory itself is
//! missing or unreadable.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p easel-thumbs -- --uploads-dir data/uploads
//! cargo run -p easel-thumbs -- --force
//! ```

use anyhow::{bail, Context, Result};
use clap::Parser;
use easel_shared::images::{store, thumbnails};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Thumbnail backfill for the Easel upload directory
#[derive(Parser)]
#[command(name = "easel-thumbs")]
#[command(about = "Regenerate thumbnails for stored uploads", long_about = None)]
struct Cli {
    /// Directory holding the uploaded images
    #[arg(long, default_value = "data/uploads")]
    uploads_dir: PathBuf,

    /// Overwrite thumbnails that already exist
    #[arg(long)]
    force: bool,

    /// Thumbnail bounding box edge in pixels
    #[arg(long, default_value_t = 300)]
    size: u32,
}

/// Counters for one backfill run
///
/// `candidates` counts files with an allowed image extension; `skipped`
/// also includes files that were passed over for having no image
/// extension at all.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct Summary {
    candidates: u32,
    created: u32,
    skipped: u32,
    failed: u32,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "easel_thumbs=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let summary = run(&cli.uploads_dir, cli.force, cli.size)?;

    println!("--- Backfill result ---");
    println!("Candidates: {}", summary.candidates);
    println!("Created:    {}", summary.created);
    println!("Skipped:    {}", summary.skipped);
    println!("Failed:     {}", summary.failed);

    Ok(())
}

/// Scans the upload directory and fills in missing thumbnails
///
/// The `thumbs/` subdirectory is created if absent. Subdirectories
/// (including `thumbs/` itself) are never scanned.
fn run(uploads_dir: &Path, force: bool, size: u32) -> Result<Summary> {
    if !uploads_dir.is_dir() {
        bail!("Uploads directory not found: {}", uploads_dir.display());
    }

    let thumbs_dir = uploads_dir.join(thumbnails::THUMBS_SUBDIR);
    std::fs::create_dir_all(&thumbs_dir)
        .with_context(|| format!("creating {}", thumbs_dir.display()))?;

    let mut summary = Summary::default();

    let entries = std::fs::read_dir(uploads_dir)
        .with_context(|| format!("reading {}", uploads_dir.display()))?;

    for entry in entries {
        let entry = entry.with_context(|| format!("reading {}", uploads_dir.display()))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let filename = entry.file_name();
        let Some(filename) = filename.to_str() else {
            summary.skipped += 1;
            continue;
        };

        if store::allowed_extension(filename).is_none() {
            summary.skipped += 1;
            continue;
        }

        summary.candidates += 1;
        let dest = thumbs_dir.join(filename);

        if dest.exists() && !force {
            summary.skipped += 1;
            continue;
        }

        match thumbnails::generate_for_file(&path, &dest, size) {
            Ok(()) => {
                summary.created += 1;
                tracing::info!(thumbnail = %dest.display(), "Created thumbnail");
            }
            Err(e) => {
                summary.failed += 1;
                tracing::warn!(
                    source = %path.display(),
                    error = %e,
                    "Thumbnail generation failed"
                );
            }
        }
    }

    Ok(summary)
}
