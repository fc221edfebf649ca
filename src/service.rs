//! Documentation Service
//!
//! The outer driver: reads each file, runs one transform pass over it,
//! and writes the result. Files are processed sequentially. A cooperative
//! shutdown flag is consulted between files only, so a file in progress
//! always finishes (or is skipped whole) and is never partially written.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, error, info, warn};

use crate::fs::FileSystemService;
use crate::syntax::ParsedModule;
use crate::transform::DocTransformer;
use crate::types::Result;

// =============================================================================
// Shutdown Flag
// =============================================================================

/// Cooperative cancellation flag shared with the signal listener.
///
/// Setting it gates the scheduling of further files; it never interrupts
/// a walk already underway.
#[derive(Debug, Clone, Default)]
pub struct ShutdownFlag {
    requested: Arc<AtomicBool>,
}

impl ShutdownFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self) {
        self.requested.store(true, Ordering::SeqCst);
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }
}

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Files attempted.
    pub total: usize,

    /// Files updated (or that would be updated in dry-run mode).
    pub updated: usize,
}

// =============================================================================
// Documentation Service
// =============================================================================

/// Drives the per-file transform pipeline.
pub struct DocumentationService {
    transformer: DocTransformer,
    fs: FileSystemService,
    dry_run: bool,
}

impl DocumentationService {
    pub fn new(transformer: DocTransformer, fs: FileSystemService, dry_run: bool) -> Self {
        Self {
            transformer,
            fs,
            dry_run,
        }
    }

    /// Transform one file. Returns whether the file was (or, in dry-run
    /// mode, would be) updated.
    pub async fn process_file(&self, path: &Path) -> Result<bool> {
        let source = self.fs.read_file(path)?;
        let module = ParsedModule::parse(&path.to_string_lossy(), &source)?;
        let outcome = self.transformer.transform(&module).await;

        debug!(
            "{}: {} declarations processed, {} failed",
            path.display(),
            outcome.processed,
            outcome.failed
        );

        if !outcome.modified {
            return Ok(false);
        }
        if self.dry_run {
            info!("Would update {} [dry-run]", path.display());
            return Ok(true);
        }

        self.fs.write_file(path, &outcome.code)?;
        info!("Updated {}", path.display());
        Ok(true)
    }

    /// Process every resolved path sequentially.
    ///
    /// Per-file errors are logged and counted in `total` without
    /// stopping the run. The shutdown flag stops the loop before the
    /// next file.
    pub async fn process_paths(&self, paths: &[PathBuf], shutdown: &ShutdownFlag) -> RunSummary {
        let files = self.fs.resolve_paths(paths);
        let mut summary = RunSummary::default();

        for path in files {
            if shutdown.is_requested() {
                warn!("Shutdown requested, stopping before {}", path.display());
                break;
            }

            summary.total += 1;
            match self.process_file(&path).await {
                Ok(true) => summary.updated += 1,
                Ok(false) => {}
                Err(e) => error!("Failed to process {}: {}", path.display(), e),
            }
        }

        summary
    }
}

// =============================================================================
// Tests
// =============================================================================
