use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read Staticfile at {path}")]
    StaticfileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse Staticfile at {path}")]
    StaticfileParse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("Staticfile at {path} must be a mapping of directives")]
    NotAMapping { path: PathBuf },

    // ── Directive values ──
    #[error("Staticfile at {path} has a directive with an invalid value")]
    InvalidDirective {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("failed to serialize site configuration")]
    Serialize(#[source] serde_yaml::Error),
}
