use std::path::{Path, PathBuf};

use staticfile_core::{Report, SiteConfig};

use crate::configure::{ConfigureError, conf_dir, configure_nginx};
use crate::root::{RootError, normalize, resolve_app_root};
use crate::stage::{StageError, stage_public};
use crate::startup::{StartupError, write_startup_files};

/// Inputs of one finalize run.
#[derive(Debug, Clone)]
pub struct Finalizer {
    pub build_dir: PathBuf,
    /// Where `profile.d` scripts go. Startup files are skipped when `None`.
    pub dep_dir: Option<PathBuf>,
}

impl Finalizer {
    pub fn new(build_dir: impl Into<PathBuf>) -> Self {
        Self {
            build_dir: build_dir.into(),
            dep_dir: None,
        }
    }

    pub fn with_dep_dir(mut self, dep_dir: impl Into<PathBuf>) -> Self {
        self.dep_dir = Some(dep_dir.into());
        self
    }
}

/// Run the full pipeline: Staticfile → root → stage → nginx → startup.
///
/// Notices go to `report` as each stage runs, so a failed run still shows
/// how far it got.
pub fn run(finalizer: &Finalizer, report: &mut Report) -> Result<SiteConfig, FinalizeError> {
    let build_dir = finalizer.build_dir.as_path();

    let config =
        SiteConfig::from_build_dir(build_dir, report).map_err(FinalizeError::LoadStaticfile)?;

    let app_root = resolve_app_root(build_dir, &config.root_dir, report)?;

    warnings(build_dir, &config, report);

    stage_public(build_dir, &app_root, config.host_dot_files, report)?;

    configure_nginx(build_dir, &config, report)?;

    if let Some(dep_dir) = &finalizer.dep_dir {
        write_startup_files(build_dir, dep_dir)?;
    }

    tracing::info!(build_dir = %build_dir.display(), "finalize complete");
    Ok(config)
}

// Blank lines that set the nginx/conf warning apart from the build log.
const PADDING: &str = "\n\n\n";

/// Advisory checks for directive combinations that rarely do what was meant.
pub fn warnings(build_dir: &Path, config: &SiteConfig, report: &mut Report) {
    if !config.location_include.is_empty() && config.root_dir.is_empty() {
        report.warning(
            "The location_include directive only works in conjunction with root.\n\
             Please specify root to use location_include",
        );
    }

    let root_is_build_dir = normalize(Path::new(&config.root_dir)).as_os_str().is_empty();
    if root_is_build_dir && conf_dir(build_dir).exists() {
        report.info(PADDING);
        report.warning(
            "You have an nginx/conf directory, but have not set *root*, or have set it to '.'.\n\
             If you are using the nginx/conf directory for nginx configuration, you probably \
             need to also set the *root* directive.",
        );
        report.info(PADDING);
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FinalizeError {
    #[error("unable to load Staticfile")]
    LoadStaticfile(#[source] staticfile_core::Error),
    #[error("invalid root directory")]
    InvalidRoot(#[from] RootError),
    #[error("unable to copy project files")]
    Stage(#[from] StageError),
    #[error("unable to configure nginx")]
    Configure(#[from] ConfigureError),
    #[error("unable to write startup files")]
    Startup(#[from] StartupError),
}
