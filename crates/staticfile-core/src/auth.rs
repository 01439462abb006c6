use std::path::{Path, PathBuf};

use crate::report::Report;

/// htpasswd-formatted credentials file next to the Staticfile.
pub const AUTH_FILE: &str = "Staticfile.auth";

const AUTH_DOCS: &str = "http://docs.cloudfoundry.org/buildpacks/staticfile/index.html#authentication";

/// Returns the credentials file path when basic auth should be enabled.
///
/// Only the file's existence is checked; its contents are never read here.
pub fn detect(build_dir: &Path, report: &mut Report) -> Option<PathBuf> {
    let path = build_dir.join(AUTH_FILE);
    if !path.exists() {
        return None;
    }

    report.step("Enabling basic authentication using Staticfile.auth");
    report.protip("Learn about basic authentication", AUTH_DOCS);
    Some(path)
}
