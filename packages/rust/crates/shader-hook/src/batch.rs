//! Batch injection across a shader tree.
//!
//! Files are independent, so they are processed in parallel with rayon. The
//! only shared state is a set of atomic counters and a concurrent map of
//! per-file failures; one unreadable or unwritable file never stops the rest.

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use dashmap::DashMap;
use rayon::prelude::*;

use crate::diff::generate_unified_diff;
use crate::error::HookError;
use crate::io::{read_shader_source, write_patched};
use crate::pipeline::TransformationPipeline;
use crate::profile::InjectionProfile;
use crate::types::{Document, FileVerdict, ShaderKind};

/// Configuration for a batch run.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Compute verdicts without writing files or backups.
    pub dry_run: bool,
    /// Keep a `.bak` copy of each file before its first patch.
    pub backup: bool,
    /// Maximum file size in bytes (default 1MB).
    pub max_file_size: u64,
    /// Number of parallel workers (0 = rayon default).
    pub workers: usize,
    /// Directory names never descended into.
    pub skip_dirs: Vec<String>,
    /// Attach a unified diff to each changed report.
    pub show_diff: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            dry_run: false,
            backup: true,
            max_file_size: 1_048_576,
            workers: 0,
            skip_dirs: vec![".git".to_string()],
            show_diff: false,
        }
    }
}

/// Result for one successfully processed file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    /// File path as enumerated.
    pub path: PathBuf,
    /// Detected stage, `None` when skipped.
    pub kind: Option<ShaderKind>,
    /// Terminal verdict.
    pub verdict: FileVerdict,
    /// Patched text was written to disk.
    pub written: bool,
    /// Backup created by this run.
    pub backup: Option<PathBuf>,
    /// Diff preview, when requested and the file changed.
    pub diff: Option<String>,
}

/// Totals and per-file results of a batch run.
#[derive(Debug, Default)]
pub struct BatchStats {
    /// Files handed to the pipeline (failures included).
    pub files_scanned: usize,
    /// Files whose verdict lists at least one step.
    pub files_changed: usize,
    /// Files of an unrecognized kind.
    pub files_skipped: usize,
    /// Files that failed with an I/O error.
    pub files_failed: usize,
    /// Reports for every file that did not fail, sorted by path.
    pub reports: Vec<FileReport>,
    /// Failure message per path.
    pub errors: BTreeMap<PathBuf, String>,
}

/// Every regular file under `root` whose extension `profile` classifies.
///
/// Hidden and git-ignored files are included; `skip_dirs` components are
/// pruned. The result is sorted.
#[must_use]
pub fn collect_shader_files(
    root: &Path,
    profile: &InjectionProfile,
    skip_dirs: &[String],
) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = ignore::WalkBuilder::new(root)
        .standard_filters(false)
        .build()
        .filter_map(|result| match result {
            Ok(entry) => Some(entry),
            Err(error) => {
                tracing::warn!(error = %error, "walk error; entry ignored");
                None
            }
        })
        .filter(|entry| entry.file_type().is_some_and(|t| t.is_file()))
        .map(ignore::DirEntry::into_path)
        .filter(|path| !in_skipped_dir(path, root, skip_dirs))
        .filter(|path| profile.classify(path).is_some())
        .collect();
    files.sort();
    files
}

fn in_skipped_dir(path: &Path, root: &Path, skip_dirs: &[String]) -> bool {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let Some(parent) = relative.parent() else {
        return false;
    };
    parent.components().any(|component| match component {
        Component::Normal(name) => skip_dirs.iter().any(|skip| name.to_string_lossy() == *skip),
        _ => false,
    })
}

impl TransformationPipeline {
    /// Read, patch and (unless dry-run) write one file.
    ///
    /// # Errors
    /// Read or write failures; content that matches no anchor is a
    /// `NoChanges` verdict, not an error.
    pub fn process_file(&self, path: &Path, config: &BatchConfig) -> Result<FileReport, HookError> {
        let Some(kind) = self.profile().classify(path) else {
            return Ok(FileReport {
                path: path.to_path_buf(),
                kind: None,
                verdict: FileVerdict::Skip,
                written: false,
                backup: None,
                diff: None,
            });
        };

        let original = read_shader_source(path, config.max_file_size)?;
        let outcome = self.run(&Document::new(original.as_str()), kind);
        let verdict = outcome.verdict();

        let mut report = FileReport {
            path: path.to_path_buf(),
            kind: Some(kind),
            verdict,
            written: false,
            backup: None,
            diff: None,
        };
        if !outcome.changed() {
            return Ok(report);
        }

        let patched = outcome.document.into_text();
        if config.show_diff {
            report.diff = Some(generate_unified_diff(&original, &patched));
        }
        if !config.dry_run {
            report.backup = write_patched(path, &original, &patched, config.backup)?;
            report.written = true;
            tracing::info!(
                path = %path.display(),
                reason = %report.verdict.reason(false),
                "patched shader"
            );
        }
        Ok(report)
    }

    /// Patch every shader under `root`.
    #[must_use]
    pub fn batch_inject(&self, root: &Path, config: &BatchConfig) -> BatchStats {
        let files = collect_shader_files(root, self.profile(), &config.skip_dirs);

        let files_scanned = AtomicUsize::new(0);
        let files_changed = AtomicUsize::new(0);
        let files_skipped = AtomicUsize::new(0);
        let errors: DashMap<PathBuf, String> = DashMap::new();

        let work = || -> Vec<FileReport> {
            files
                .par_iter()
                .filter_map(|path| {
                    files_scanned.fetch_add(1, Ordering::Relaxed);
                    match self.process_file(path, config) {
                        Ok(report) => {
                            match &report.verdict {
                                FileVerdict::Skip => {
                                    files_skipped.fetch_add(1, Ordering::Relaxed);
                                }
                                FileVerdict::Applied(_) => {
                                    files_changed.fetch_add(1, Ordering::Relaxed);
                                }
                                FileVerdict::NoChanges => {}
                            }
                            Some(report)
                        }
                        Err(error) => {
                            tracing::warn!(
                                path = %path.display(),
                                error = %error,
                                "failed to process shader"
                            );
                            errors.insert(path.clone(), error.to_string());
                            None
                        }
                    }
                })
                .collect()
        };

        let mut reports = if config.workers > 0 {
            match rayon::ThreadPoolBuilder::new()
                .num_threads(config.workers)
                .build()
            {
                Ok(pool) => pool.install(work),
                Err(error) => {
                    tracing::warn!(error = %error, "worker pool unavailable; using global pool");
                    work()
                }
            }
        } else {
            work()
        };
        reports.sort_by(|a, b| a.path.cmp(&b.path));

        let errors: BTreeMap<PathBuf, String> = errors.into_iter().collect();
        BatchStats {
            files_scanned: files_scanned.load(Ordering::Relaxed),
            files_changed: files_changed.load(Ordering::Relaxed),
            files_skipped: files_skipped.load(Ordering::Relaxed),
            files_failed: errors.len(),
            reports,
            errors,
        }
    }
}
