//! Recursive size scanning of cache targets.
//!
//! A scan never fails: a missing target reads as `found: false`, and a file
//! that errors mid-walk (permissions, deleted under us) is skipped without
//! aborting the walk. Symlinks are not followed, so a junction pointing
//! outside a target can neither inflate the total nor loop the walk.

use rayon::prelude::*;
use serde::Serialize;
use std::path::Path;
use walkdir::WalkDir;

use crate::paths;
use crate::registry::CacheTarget;

/// Size of a single target, as observed during one scan pass.
#[derive(Debug, Clone, Serialize)]
pub struct ScanResult {
    pub label: String,
    /// Sum of readable file sizes; `None` when the path does not exist.
    pub size_bytes: Option<u64>,
    pub found: bool,
}

/// One full scan pass over a set of targets, in declaration order.
#[derive(Debug, Serialize)]
pub struct ScanReport {
    pub results: Vec<ScanResult>,
    pub total_bytes: u64,
}

/// Recursively sum file sizes under `path`.
///
/// Returns `(0, false)` if the path does not exist. Unreadable entries are
/// skipped and contribute nothing.
pub fn scan_size(path: &Path) -> (u64, bool) {
    if !path.exists() {
        return (0, false);
    }
    (dir_size(path), true)
}

/// Scan a single target by resolving its template.
pub fn scan_target(target: &CacheTarget) -> ScanResult {
    let path = paths::resolve(&target.template);
    let (size, found) = scan_size(&path);
    log::debug!(
        "scanned {}: {} ({} bytes)",
        target.label,
        if found { "found" } else { "not found" },
        size
    );
    ScanResult {
        label: target.label.clone(),
        size_bytes: found.then_some(size),
        found,
    }
}

/// Scan every target concurrently.
///
/// Results come back in the order the targets were given, regardless of
/// which scan finishes first; the total is computed only once all scans
/// are in.
pub fn scan_all(targets: &[CacheTarget]) -> ScanReport {
    let results: Vec<ScanResult> = targets.par_iter().map(scan_target).collect();
    let total_bytes = results.iter().filter_map(|r| r.size_bytes).sum();
    ScanReport {
        results,
        total_bytes,
    }
}

fn dir_size(path: &Path) -> u64 {
    WalkDir::new(path)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| e.metadata().ok())
        .map(|m| m.len())
        .sum()
}

// ============================================================================
// Tests
// ============================================================================
