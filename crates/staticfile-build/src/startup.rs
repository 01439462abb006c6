use std::path::{Path, PathBuf};

use crate::fs::{SCRIPT_MODE, create_dir_all, write_with_mode};

/// Sourced at container start: resolves the ERB placeholders in nginx.conf
/// and creates the log pipes.
pub const PROFILE_SCRIPT: &str = r#"
export APP_ROOT=$HOME
export LD_LIBRARY_PATH=$APP_ROOT/nginx/lib:$LD_LIBRARY_PATH

mv $APP_ROOT/nginx/conf/nginx.conf $APP_ROOT/nginx/conf/nginx.conf.erb
erb $APP_ROOT/nginx/conf/nginx.conf.erb > $APP_ROOT/nginx/conf/nginx.conf

if [[ ! -f $APP_ROOT/nginx/logs/access.log ]]; then
    mkfifo $APP_ROOT/nginx/logs/access.log
fi

if [[ ! -f $APP_ROOT/nginx/logs/error.log ]]; then
    mkfifo $APP_ROOT/nginx/logs/error.log
fi
"#;

/// Relays the nginx log pipes to stdout/stderr.
pub const START_LOGGING_SCRIPT: &str = r#"
cat < $APP_ROOT/nginx/logs/access.log &
(>&2 cat) < $APP_ROOT/nginx/logs/error.log &
"#;

pub const BOOT_SCRIPT: &str = r#"#!/bin/sh
set -ex
$APP_ROOT/start_logging.sh
nginx -p $APP_ROOT/nginx -c $APP_ROOT/nginx/conf/nginx.conf
"#;

/// Writes `<dep_dir>/profile.d/staticfile.sh`, `<build_dir>/start_logging.sh`
/// and `<build_dir>/boot.sh`, all executable.
pub fn write_startup_files(build_dir: &Path, dep_dir: &Path) -> Result<(), StartupError> {
    let profile_d = dep_dir.join("profile.d");
    create_dir_all(&profile_d).map_err(|e| StartupError::CreateDir {
        path: profile_d.clone(),
        source: e,
    })?;

    let scripts = [
        (profile_d.join("staticfile.sh"), PROFILE_SCRIPT),
        (build_dir.join("start_logging.sh"), START_LOGGING_SCRIPT),
        (build_dir.join("boot.sh"), BOOT_SCRIPT),
    ];
    for (path, contents) in scripts {
        write_with_mode(&path, contents.as_bytes(), SCRIPT_MODE)
            .map_err(|e| StartupError::Write { path, source: e })?;
    }

    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("failed to create directory {path}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write startup script {path}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}
