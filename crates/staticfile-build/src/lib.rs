//! Asset staging and nginx configuration for Staticfile apps.
//!
//! # Finalize pipeline
//!
//! ```text
//! staticfile finalize <build_dir>
//!   1. Staticfile ── SiteConfig::from_build_dir() (directives + Staticfile.auth)
//!   2. Root       ── resolve_app_root()
//!   3. Warnings   ── finalize::warnings()
//!   4. Stage      ── stage_public(): app root → tmp → public/
//!   5. nginx      ── configure_nginx(): nginx.conf, mime.types, .htpasswd
//!   6. Startup    ── write_startup_files() (with --dep-dir)
//! ```
//!
//! # Staging strategy
//!
//! Top-level entries of the app root are renamed into a staging directory
//! outside the build tree, which then replaces `public/`:
//! - `Staticfile`, `Staticfile.auth`, `manifest.yml`, `.profile`,
//!   `.profile.d`, `stackato.yml`, `.cloudfoundry` are always left out
//! - other dotfiles are left out unless `host_dot_files` is enabled
//!
//! # Overrides
//!
//! `public/nginx.conf` and `public/mime.types` win over generated content
//! and are copied verbatim.

pub mod configure;
pub mod finalize;
mod fs;
pub mod mime;
pub mod nginx;
pub mod root;
pub mod stage;
pub mod startup;

pub use configure::{RenderedConfig, configure_nginx};
pub use finalize::{FinalizeError, Finalizer};
pub use nginx::NginxConfGenerator;
pub use root::{RootError, resolve_app_root};
pub use stage::{StagingPlan, stage_public};
pub use startup::write_startup_files;
