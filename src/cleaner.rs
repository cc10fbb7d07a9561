//! Deletion of cache target contents.
//!
//! Cleaning is best-effort and per-entry: every file deletion is attempted
//! independently, a locked or permission-denied file is skipped, and the
//! walk always runs to completion. Only registry targets can be cleaned;
//! the function signature takes a [`CacheTarget`], so there is no way to
//! hand the cleaner an arbitrary path.

use rayon::prelude::*;
use serde::Serialize;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use crate::paths;
use crate::registry::CacheTarget;

/// What happened to a single target during a clean pass.
#[derive(Debug, Clone, Serialize)]
pub struct CleanOutcome {
    pub label: String,
    /// Files successfully deleted. Skipped files are not counted.
    pub files_removed: u64,
    pub found: bool,
}

/// One full clean pass, one outcome per target in registry order.
#[derive(Debug, Serialize)]
pub struct CleanReport {
    pub outcomes: Vec<CleanOutcome>,
}

impl CleanReport {
    pub fn total_files_removed(&self) -> u64 {
        self.outcomes.iter().map(|o| o.files_removed).sum()
    }
}

/// Delete the contents of a single target.
///
/// A missing path is `found: false` with nothing done. After the contents
/// are gone the root itself is removed, and recreated empty for targets
/// that need it (the temp root, the shader folder).
pub fn clean_target(target: &CacheTarget) -> CleanOutcome {
    let path = paths::resolve(&target.template);

    if !path.exists() {
        return CleanOutcome {
            label: target.label.clone(),
            files_removed: 0,
            found: false,
        };
    }

    if paths::is_protected(&path) {
        log::warn!(
            "refusing to clean {}: resolved to protected path {}",
            target.label,
            path.display()
        );
        return CleanOutcome {
            label: target.label.clone(),
            files_removed: 0,
            found: true,
        };
    }

    let files_removed = remove_contents(&path);
    let _ = fs::remove_dir(&path);
    if target.recreate_root {
        if let Err(e) = fs::create_dir_all(&path) {
            log::warn!("could not recreate {}: {e}", path.display());
        }
    }

    log::info!("cleaned {}: {} files removed", target.label, files_removed);
    CleanOutcome {
        label: target.label.clone(),
        files_removed,
        found: true,
    }
}

/// Clean every target concurrently, reporting in registry order.
pub fn clean_all(targets: &[CacheTarget]) -> CleanReport {
    let outcomes: Vec<CleanOutcome> = targets.par_iter().map(clean_target).collect();
    CleanReport { outcomes }
}

/// Delete everything under `root`, counting files that actually went away.
///
/// Walks contents-first so directories are empty by the time we try to
/// remove them. Directory removals are best-effort and uncounted; symlinks
/// are removed as entries, never followed.
fn remove_contents(root: &Path) -> u64 {
    let mut removed: u64 = 0;
    let walker = WalkDir::new(root)
        .follow_links(false)
        .contents_first(true)
        .min_depth(1);

    for entry in walker.into_iter().filter_map(|e| e.ok()) {
        let path = entry.path();
        if entry.file_type().is_dir() {
            if let Err(e) = fs::remove_dir(path) {
                log::debug!("skipping dir {}: {e}", path.display());
            }
        } else if remove_file_forced(path) {
            removed += 1;
        } else {
            log::debug!("skipping file {}", path.display());
        }
    }
    removed
}

/// Remove a file, clearing the read-only bit and retrying once if the
/// first attempt fails.
fn remove_file_forced(path: &Path) -> bool {
    if fs::remove_file(path).is_ok() {
        return true;
    }
    set_writable(path);
    fs::remove_file(path).is_ok()
}

fn set_writable(path: &Path) {
    if let Ok(metadata) = fs::metadata(path) {
        let mut perms = metadata.permissions();
        if perms.readonly() {
            #[allow(clippy::permissions_set_readonly_false)]
            perms.set_readonly(false);
            let _ = fs::set_permissions(path, perms);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
