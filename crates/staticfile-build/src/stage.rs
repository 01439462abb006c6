use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use staticfile_core::Report;

use crate::root::normalize;

/// Names that are never moved into `public/`, whatever the dotfile policy.
pub const EXCLUDED_NAMES: &[&str] = &[
    "Staticfile",
    "Staticfile.auth",
    "manifest.yml",
    ".profile",
    ".profile.d",
    "stackato.yml",
    ".cloudfoundry",
];

const STAGING_PREFIX: &str = "staticfile-buildpack.approot.";

/// Name of the serving root inside the build directory.
pub const PUBLIC_DIR: &str = "public";

/// Whether a top-level entry of the app root stays out of `public/`.
pub fn should_skip(name: &OsStr, host_dot_files: bool) -> bool {
    if EXCLUDED_NAMES.iter().any(|ex| name == OsStr::new(ex)) {
        return true;
    }
    !host_dot_files && name.as_encoded_bytes().starts_with(b".")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanEntry {
    pub source: PathBuf,
    pub skip: bool,
}

/// Move decisions for the immediate children of an app root.
///
/// Subdirectories are single entries; nothing below the top level is
/// inspected.
#[derive(Debug, Clone, Default)]
pub struct StagingPlan {
    pub entries: Vec<PlanEntry>,
}

impl StagingPlan {
    pub fn scan(app_root: &Path, host_dot_files: bool) -> Result<Self, StageError> {
        let read_dir = std::fs::read_dir(app_root).map_err(|e| StageError::ReadDir {
            path: app_root.to_path_buf(),
            source: e,
        })?;

        let mut entries = Vec::new();
        for entry in read_dir {
            let entry = entry.map_err(|e| StageError::ReadDir {
                path: app_root.to_path_buf(),
                source: e,
            })?;
            let skip = should_skip(&entry.file_name(), host_dot_files);
            entries.push(PlanEntry {
                source: entry.path(),
                skip,
            });
        }
        entries.sort_by(|a, b| a.source.cmp(&b.source));

        Ok(Self { entries })
    }

    /// Entries that will be moved.
    pub fn moves(&self) -> impl Iterator<Item = &Path> {
        self.entries
            .iter()
            .filter(|e| !e.skip)
            .map(|e| e.source.as_path())
    }
}

/// Moves the app root's content into `<build_dir>/public`.
///
/// Entries are renamed (not copied) into a fresh staging directory outside
/// the build tree, which then replaces `public/` wholesale. When the app
/// root already is `public/`, nothing happens.
///
/// On a failed move the staging directory is left behind with whatever was
/// already moved into it; it is never deleted together with app files.
pub fn stage_public(
    build_dir: &Path,
    app_root: &Path,
    host_dot_files: bool,
    report: &mut Report,
) -> Result<(), StageError> {
    report.step("Copying project files into public");

    let public_dir = build_dir.join(PUBLIC_DIR);
    let public_abs = std::path::absolute(&public_dir).map_err(|e| StageError::Resolve {
        path: public_dir.clone(),
        source: e,
    })?;
    if normalize(&public_abs) == normalize(app_root) {
        tracing::debug!(path = %public_dir.display(), "app root is already public");
        return Ok(());
    }

    let plan = StagingPlan::scan(app_root, host_dot_files)?;

    let staging_dir = tempfile::Builder::new()
        .prefix(STAGING_PREFIX)
        .tempdir()
        .map_err(|e| StageError::TempDir { source: e })?
        .keep();

    for entry in &plan.entries {
        if entry.skip {
            tracing::debug!(path = %entry.source.display(), "skipping");
            continue;
        }
        let Some(name) = entry.source.file_name() else {
            continue;
        };
        let dest = staging_dir.join(name);
        tracing::debug!(from = %entry.source.display(), to = %dest.display(), "moving");
        std::fs::rename(&entry.source, &dest).map_err(|e| StageError::Move {
            from: entry.source.clone(),
            to: dest.clone(),
            source: e,
        })?;
    }

    remove_existing(&public_dir)?;

    std::fs::rename(&staging_dir, &public_dir).map_err(|e| StageError::Publish {
        from: staging_dir.clone(),
        to: public_dir.clone(),
        source: e,
    })?;

    Ok(())
}

fn remove_existing(path: &Path) -> Result<(), StageError> {
    let removed = match std::fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => std::fs::remove_dir_all(path),
        Ok(_) => std::fs::remove_file(path),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => Err(e),
    };
    removed.map_err(|e| StageError::Cleanup {
        path: path.to_path_buf(),
        source: e,
    })
}

#[derive(Debug, thiserror::Error)]
pub enum StageError {
    #[error("failed to resolve public directory {path}")]
    Resolve {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to read app root {path}")]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to create staging directory")]
    TempDir { source: std::io::Error },
    #[error("failed to move {from} to {to}")]
    Move {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to remove existing public directory {path}")]
    Cleanup {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to move staging directory {from} to {to}")]
    Publish {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },
}
