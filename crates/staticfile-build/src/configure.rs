use std::path::{Path, PathBuf};

use staticfile_core::auth::AUTH_FILE;
use staticfile_core::{Report, SiteConfig};

use crate::fs::{FILE_MODE, create_dir_all, write_with_mode};
use crate::mime::MIME_TYPES;
use crate::nginx::NginxConfGenerator;
use crate::stage::PUBLIC_DIR;

pub const NGINX_CONF: &str = "nginx.conf";
pub const MIME_TYPES_FILE: &str = "mime.types";
pub const HTPASSWD: &str = ".htpasswd";

/// `<build_dir>/nginx/conf`
pub fn conf_dir(build_dir: &Path) -> PathBuf {
    build_dir.join("nginx").join("conf")
}

/// `<build_dir>/nginx/logs`
pub fn logs_dir(build_dir: &Path) -> PathBuf {
    build_dir.join("nginx").join("logs")
}

/// Content for one nginx config file: an operator override from
/// `public/`, or the generated text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedConfig {
    Override(PathBuf),
    Generated(String),
}

impl RenderedConfig {
    /// Picks `<build_dir>/public/<name>` when present, else `generate()`.
    pub fn resolve(build_dir: &Path, name: &str, generate: impl FnOnce() -> String) -> Self {
        let custom = build_dir.join(PUBLIC_DIR).join(name);
        if custom.exists() {
            Self::Override(custom)
        } else {
            Self::Generated(generate())
        }
    }

    pub fn is_override(&self) -> bool {
        matches!(self, Self::Override(_))
    }

    /// Raw bytes of the config, reading the override file if needed.
    pub fn contents(&self) -> Result<Vec<u8>, ConfigureError> {
        match self {
            Self::Override(path) => std::fs::read(path).map_err(|e| ConfigureError::Read {
                path: path.clone(),
                source: e,
            }),
            Self::Generated(text) => Ok(text.as_bytes().to_vec()),
        }
    }

    /// Writes the config to `dest`. Overrides are copied byte-for-byte.
    pub fn write_to(&self, dest: &Path) -> Result<(), ConfigureError> {
        match self {
            Self::Override(path) => std::fs::copy(path, dest)
                .map(|_| ())
                .map_err(|e| ConfigureError::Copy {
                    from: path.clone(),
                    to: dest.to_path_buf(),
                    source: e,
                }),
            Self::Generated(text) => {
                write_with_mode(dest, text.as_bytes(), FILE_MODE).map_err(|e| {
                    ConfigureError::Write {
                        path: dest.to_path_buf(),
                        source: e,
                    }
                })
            }
        }
    }
}

/// The nginx.conf that `configure_nginx` would install.
pub fn nginx_conf(build_dir: &Path, config: &SiteConfig) -> RenderedConfig {
    RenderedConfig::resolve(build_dir, NGINX_CONF, || {
        NginxConfGenerator::new(config).render()
    })
}

/// Writes `nginx.conf`, `mime.types`, and (with basic auth) `.htpasswd`
/// under `<build_dir>/nginx/conf`.
pub fn configure_nginx(
    build_dir: &Path,
    config: &SiteConfig,
    report: &mut Report,
) -> Result<(), ConfigureError> {
    report.step("Configuring nginx");

    let conf_dir = conf_dir(build_dir);
    for dir in [conf_dir.clone(), logs_dir(build_dir)] {
        create_dir_all(&dir).map_err(|e| ConfigureError::CreateDir {
            path: dir.clone(),
            source: e,
        })?;
    }

    let nginx_conf = nginx_conf(build_dir, config);
    if nginx_conf.is_override() {
        report.warning(
            "overriding nginx.conf is deprecated and highly discouraged, as it breaks the \
             functionality of the Staticfile and Staticfile.auth configuration directives. \
             Please use the NGINX buildpack available at: \
             https://github.com/cloudfoundry/nginx-buildpack",
        );
    }
    nginx_conf.write_to(&conf_dir.join(NGINX_CONF))?;

    let mime_types = RenderedConfig::resolve(build_dir, MIME_TYPES_FILE, || {
        MIME_TYPES.to_owned()
    });
    mime_types.write_to(&conf_dir.join(MIME_TYPES_FILE))?;

    if config.basic_auth {
        let auth_file = build_dir.join(AUTH_FILE);
        let htpasswd = conf_dir.join(HTPASSWD);
        std::fs::copy(&auth_file, &htpasswd).map_err(|e| ConfigureError::Copy {
            from: auth_file,
            to: htpasswd,
            source: e,
        })?;
    }

    tracing::info!(conf_dir = %conf_dir.display(), "nginx configured");
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigureError {
    #[error("failed to create directory {path}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write {path}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to copy {from} to {to}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to read {path}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}
