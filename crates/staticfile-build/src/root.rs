use std::path::{Component, Path, PathBuf};

use staticfile_core::Report;

/// Resolves the application root from the `root` directive.
///
/// An empty `root_dir` means the build directory itself. The result is
/// absolute and lexically normalized; it must exist and be a directory.
pub fn resolve_app_root(
    build_dir: &Path,
    root_dir: &str,
    report: &mut Report,
) -> Result<PathBuf, RootError> {
    let relative = if root_dir.is_empty() { "." } else { root_dir };

    let joined = build_dir.join(relative);
    let absolute = std::path::absolute(&joined).map_err(|e| RootError::Resolve {
        path: joined.clone(),
        source: e,
    })?;
    let root = normalize(&absolute);

    report.step(format!("Root folder {}", root.display()));

    let metadata = match std::fs::metadata(&root) {
        Ok(metadata) => metadata,
        Err(e) => {
            tracing::debug!(path = %root.display(), error = %e, "root directory stat failed");
            return Err(RootError::NotFound {
                root: relative.to_owned(),
            });
        }
    };
    if !metadata.is_dir() {
        return Err(RootError::NotADirectory {
            root: relative.to_owned(),
        });
    }

    Ok(root)
}

/// Drops `.` components and folds `..` into its parent without touching
/// the filesystem. Leading `..` of a relative path are kept; `..` at the
/// filesystem root is dropped.
pub(crate) fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                Some(Component::ParentDir | Component::CurDir) | None => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[derive(Debug, thiserror::Error)]
pub enum RootError {
    #[error("failed to resolve root directory {path}")]
    Resolve {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("the application Staticfile specifies a root directory {root} that does not exist")]
    NotFound { root: String },
    #[error(
        "the application Staticfile specifies a root directory {root} that is a plain file, but was expected to be a directory"
    )]
    NotADirectory { root: String },
}
