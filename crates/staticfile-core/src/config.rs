use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;

use crate::directive::{DIRECTIVES, Directives, expand_status_code};
use crate::report::Report;

/// File name of the site configuration inside the build directory.
pub const STATICFILE: &str = "Staticfile";

const HSTS_DOCS: &str = "https://docs.cloudfoundry.org/buildpacks/staticfile/index.html#strict-security";

/// Compiled Staticfile settings.
///
/// Built once from the Staticfile and the auth probe, then only read by
/// root resolution and the nginx compiler.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SiteConfig {
    /// Content root relative to the build directory; empty means the build
    /// directory itself.
    pub root_dir: String,
    pub host_dot_files: bool,
    /// Extra nginx file included in `location /`; empty disables it.
    pub location_include: String,
    pub directory_index: bool,
    pub ssi: bool,
    pub push_state: bool,
    pub hsts: bool,
    pub hsts_include_subdomains: bool,
    pub hsts_preload: bool,
    pub force_https: bool,
    /// nginx status code list -> error page path.
    pub status_codes: BTreeMap<String, String>,
    /// Set when `Staticfile.auth` sits next to the Staticfile.
    pub basic_auth: bool,
}

impl SiteConfig {
    /// Load `<build_dir>/Staticfile` and probe for `Staticfile.auth`.
    pub fn from_build_dir(build_dir: &Path, report: &mut Report) -> crate::Result<Self> {
        let config = Self::load(build_dir, report)?;
        let basic_auth = crate::auth::detect(build_dir, report).is_some();
        Ok(Self { basic_auth, ..config })
    }

    /// Load `<build_dir>/Staticfile`, or return defaults if not found.
    pub fn load(build_dir: &Path, report: &mut Report) -> crate::Result<Self> {
        let path = build_dir.join(STATICFILE);
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no Staticfile, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(crate::Error::StaticfileRead { path, source: e }),
        };

        let directives = Directives::from_yaml(&content, &path)?;
        Ok(Self::from_directives(&directives, report))
    }

    /// Apply recognized directives in their fixed order. Unknown keys are
    /// ignored.
    pub fn from_directives(directives: &Directives, report: &mut Report) -> Self {
        let mut config = Self::default();

        for directive in DIRECTIVES {
            let Some(value) = directives.text(directive.key) else {
                continue;
            };
            if let Some(step) = (directive.apply)(&mut config, value) {
                report.step(step);
            }
        }

        let codes = directives.status_codes();
        if !codes.is_empty() {
            report.step("Enabling custom pages for status_codes");
            config.status_codes = codes
                .iter()
                .map(|(code, page)| (expand_status_code(code).to_owned(), page.clone()))
                .collect();
        }

        if !config.hsts && (config.hsts_include_subdomains || config.hsts_preload) {
            report.warning(
                "http_strict_transport_security is not enabled while \
                 http_strict_transport_security_include_subdomains or \
                 http_strict_transport_security_preload have been enabled.",
            );
            report.protip(
                "http_strict_transport_security_include_subdomains and \
                 http_strict_transport_security_preload do nothing without \
                 http_strict_transport_security enabled.",
                HSTS_DOCS,
            );
        }

        config
    }

    /// Effective configuration as YAML, using the field names above.
    pub fn to_yaml(&self) -> crate::Result<String> {
        serde_yaml::to_string(self).map_err(crate::Error::Serialize)
    }
}
