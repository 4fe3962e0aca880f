use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use sitegen_core::{normalize_relative_path, AssetCopyEntry, IgnoreRules};
use sitegen_logging::{sitegen_debug, sitegen_warn};
use walkdir::WalkDir;

use crate::persist::{resolve_output_path, PersistError};

#[derive(Debug, thiserror::Error)]
pub enum CopyError {
    #[error("failed to copy {source_path:?} to {target:?}: {error}")]
    Io {
        source_path: PathBuf,
        target: PathBuf,
        error: std::io::Error,
    },
    #[error("failed to walk directory: {0}")]
    Walk(#[from] walkdir::Error),
    #[error(transparent)]
    Persist(#[from] PersistError),
}

/// Result of copying one entry. Targets are output-relative with `/` separators.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopyOutcome {
    pub copied: Vec<String>,
    pub ignored: usize,
    pub failed: usize,
    /// Files skipped because an earlier entry already wrote that output path.
    pub duplicates: usize,
}

impl CopyOutcome {
    pub fn merge(&mut self, other: CopyOutcome) {
        self.copied.extend(other.copied);
        self.ignored += other.ignored;
        self.failed += other.failed;
        self.duplicates += other.duplicates;
    }
}

/// Copies static files into the output directory, honouring ignore globs and
/// per-entry extension exclusions.
#[derive(Debug, Clone, Default)]
pub struct AssetCopier {
    rules: IgnoreRules,
}

impl AssetCopier {
    pub fn new(rules: IgnoreRules) -> Self {
        Self { rules }
    }

    pub fn copy(&self, entry: &AssetCopyEntry, output_root: &Path) -> CopyOutcome {
        self.copy_claiming(entry, output_root, &mut HashSet::new())
    }

    /// Copies every entry in order. When two entries produce the same output
    /// path, the file from the earlier entry is kept.
    pub fn copy_all(&self, entries: &[AssetCopyEntry], output_root: &Path) -> CopyOutcome {
        let mut claimed = HashSet::new();
        let mut outcome = CopyOutcome::default();
        for entry in entries {
            outcome.merge(self.copy_claiming(entry, output_root, &mut claimed));
        }
        outcome
    }

    fn copy_claiming(
        &self,
        entry: &AssetCopyEntry,
        output_root: &Path,
        claimed: &mut HashSet<String>,
    ) -> CopyOutcome {
        let source = &entry.source_path;
        if source.is_file() {
            self.copy_single(entry, output_root, claimed)
        } else if source.is_dir() {
            self.copy_tree(entry, output_root, claimed)
        } else {
            sitegen_warn!("Copy source {:?} does not exist; skipping", source);
            CopyOutcome::default()
        }
    }

    fn copy_single(
        &self,
        entry: &AssetCopyEntry,
        output_root: &Path,
        claimed: &mut HashSet<String>,
    ) -> CopyOutcome {
        let mut outcome = CopyOutcome::default();
        let mut target = entry.target_key();
        if target.is_empty() {
            target = entry
                .source_path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
        }

        if self.should_skip(entry, &entry.source_path, &target) {
            outcome.ignored += 1;
            return outcome;
        }
        if !claimed.insert(target.clone()) {
            sitegen_debug!("{} already copied; skipping {:?}", target, entry.source_path);
            outcome.duplicates += 1;
            return outcome;
        }

        let result = resolve_output_path(output_root, &target)
            .map_err(CopyError::from)
            .and_then(|dest| {
                if let Some(parent) = dest.parent() {
                    create_dir(parent)?;
                }
                copy_file(&entry.source_path, &dest)
            });
        match result {
            Ok(()) => outcome.copied.push(target),
            Err(err) => {
                sitegen_warn!("Skipping copy of {:?}: {}", entry.source_path, err);
                outcome.failed += 1;
            }
        }
        outcome
    }

    fn copy_tree(
        &self,
        entry: &AssetCopyEntry,
        output_root: &Path,
        claimed: &mut HashSet<String>,
    ) -> CopyOutcome {
        let mut outcome = CopyOutcome::default();
        let target_root = entry.target_key();
        let mut planned: Vec<(PathBuf, String, PathBuf)> = Vec::new();

        for item in WalkDir::new(&entry.source_path).sort_by_file_name() {
            let item = match item {
                Ok(item) => item,
                Err(err) => {
                    sitegen_warn!("Skipping unreadable entry under {:?}: {}", entry.source_path, err);
                    outcome.failed += 1;
                    continue;
                }
            };
            if !item.file_type().is_file() {
                continue;
            }

            let relative = match item.path().strip_prefix(&entry.source_path) {
                Ok(rel) => normalize_relative_path(&rel.to_string_lossy()),
                Err(_) => continue,
            };
            let target = if target_root.is_empty() {
                relative
            } else {
                format!("{target_root}/{relative}")
            };

            if self.should_skip(entry, item.path(), &target) {
                outcome.ignored += 1;
                continue;
            }
            if !claimed.insert(target.clone()) {
                sitegen_debug!("{} already copied; skipping {:?}", target, item.path());
                outcome.duplicates += 1;
                continue;
            }

            match resolve_output_path(output_root, &target) {
                Ok(dest) => planned.push((item.path().to_path_buf(), target, dest)),
                Err(err) => {
                    sitegen_warn!("Skipping {:?}: {}", item.path(), err);
                    outcome.failed += 1;
                }
            }
        }

        // All destination folders exist before the first file lands.
        let dirs: BTreeSet<PathBuf> = planned
            .iter()
            .filter_map(|(_, _, dest)| dest.parent().map(Path::to_path_buf))
            .collect();
        let mut failed_dirs = BTreeSet::new();
        for dir in dirs {
            if let Err(err) = create_dir(&dir) {
                sitegen_warn!("{}", err);
                failed_dirs.insert(dir);
            }
        }

        for (source, target, dest) in planned {
            let parent_failed = dest
                .parent()
                .is_some_and(|parent| failed_dirs.contains(parent));
            if parent_failed {
                outcome.failed += 1;
                continue;
            }
            match copy_file(&source, &dest) {
                Ok(()) => outcome.copied.push(target),
                Err(err) => {
                    sitegen_warn!("{}", err);
                    outcome.failed += 1;
                }
            }
        }

        sitegen_debug!(
            "Copied {} file(s) from {:?} ({} ignored, {} failed)",
            outcome.copied.len(),
            entry.source_path,
            outcome.ignored,
            outcome.failed
        );
        outcome
    }

    fn should_skip(&self, entry: &AssetCopyEntry, source: &Path, target: &str) -> bool {
        let excluded = source
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| entry.is_extension_excluded(ext));
        if excluded {
            sitegen_debug!("Excluded by extension: {}", target);
            return true;
        }
        if let Some(pattern) = self.rules.matching_pattern(target) {
            sitegen_debug!("Ignored {} (matches {})", target, pattern);
            return true;
        }
        false
    }
}

fn create_dir(dir: &Path) -> Result<(), CopyError> {
    fs::create_dir_all(dir).map_err(|error| CopyError::Io {
        source_path: dir.to_path_buf(),
        target: dir.to_path_buf(),
        error,
    })
}

fn copy_file(source: &Path, dest: &Path) -> Result<(), CopyError> {
    fs::copy(source, dest)
        .map(|_| ())
        .map_err(|error| CopyError::Io {
            source_path: source.to_path_buf(),
            target: dest.to_path_buf(),
            error,
        })
}
