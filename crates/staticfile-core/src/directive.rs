//! Raw Staticfile directives and the fixed order in which they apply.
//!
//! A Staticfile is a flat YAML mapping. Directive values are kept as the
//! scalar's source text, so `ssi: True` stays `"True"` and `root: 1.10`
//! stays `"1.10"` instead of going through YAML's bool and float typing.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use serde_yaml::Value;

use crate::config::SiteConfig;

/// Recognized keys, each read as plain text. Other keys are ignored.
#[derive(Debug, Deserialize)]
struct StaticfileDoc {
    root: Option<String>,
    host_dot_files: Option<String>,
    location_include: Option<String>,
    directory: Option<String>,
    ssi: Option<String>,
    pushstate: Option<String>,
    http_strict_transport_security: Option<String>,
    http_strict_transport_security_include_subdomains: Option<String>,
    http_strict_transport_security_preload: Option<String>,
    force_https: Option<String>,
    status_codes: Option<BTreeMap<String, String>>,
}

/// Parsed but uninterpreted Staticfile content.
#[derive(Debug, Clone, Default)]
pub struct Directives {
    values: BTreeMap<String, String>,
    status_codes: BTreeMap<String, String>,
}

impl Directives {
    /// Parse YAML content. Empty or comment-only content yields no directives.
    pub fn from_yaml(content: &str, origin: &Path) -> crate::Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let shape: Value =
            serde_yaml::from_str(content).map_err(|e| crate::Error::StaticfileParse {
                path: origin.to_path_buf(),
                source: e,
            })?;
        match shape {
            Value::Null => return Ok(Self::default()),
            Value::Mapping(_) => {}
            _ => {
                return Err(crate::Error::NotAMapping {
                    path: origin.to_path_buf(),
                });
            }
        }

        // Second pass over the text: typed fields see the raw scalars.
        let doc: StaticfileDoc =
            serde_yaml::from_str(content).map_err(|e| crate::Error::InvalidDirective {
                path: origin.to_path_buf(),
                source: e,
            })?;
        Ok(doc.into())
    }

    /// Build directives from plain key/value pairs.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let values = pairs
            .into_iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Self {
            values,
            status_codes: BTreeMap::new(),
        }
    }

    /// Text of a scalar directive, or `None` when the key is absent or null.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// `status_codes` entries as written, before wildcard expansion.
    pub fn status_codes(&self) -> &BTreeMap<String, String> {
        &self.status_codes
    }
}

impl From<StaticfileDoc> for Directives {
    fn from(doc: StaticfileDoc) -> Self {
        let values = [
            ("root", doc.root),
            ("host_dot_files", doc.host_dot_files),
            ("location_include", doc.location_include),
            ("directory", doc.directory),
            ("ssi", doc.ssi),
            ("pushstate", doc.pushstate),
            (
                "http_strict_transport_security",
                doc.http_strict_transport_security,
            ),
            (
                "http_strict_transport_security_include_subdomains",
                doc.http_strict_transport_security_include_subdomains,
            ),
            (
                "http_strict_transport_security_preload",
                doc.http_strict_transport_security_preload,
            ),
            ("force_https", doc.force_https),
        ]
        .into_iter()
        .filter_map(|(key, value)| Some((key.to_owned(), value?)))
        .collect();

        Self {
            values,
            status_codes: match doc.status_codes {
                Some(codes) => codes,
                None => BTreeMap::new(),
            },
        }
    }
}

/// Whether a directive value switches a feature on.
///
/// Exact, case-sensitive match; surrounding whitespace is not trimmed.
pub fn is_enabled(value: &str) -> bool {
    value == "enabled" || value == "true"
}

/// A recognized scalar directive. `apply` returns the step message to
/// record when the directive changed the configuration.
pub(crate) struct Directive {
    pub key: &'static str,
    pub apply: fn(&mut SiteConfig, &str) -> Option<String>,
}

/// Scalar directives in application order.
pub(crate) const DIRECTIVES: &[Directive] = &[
    Directive {
        key: "root",
        apply: apply_root,
    },
    Directive {
        key: "host_dot_files",
        apply: apply_host_dot_files,
    },
    Directive {
        key: "location_include",
        apply: apply_location_include,
    },
    Directive {
        key: "directory",
        apply: apply_directory,
    },
    Directive {
        key: "ssi",
        apply: apply_ssi,
    },
    Directive {
        key: "pushstate",
        apply: apply_pushstate,
    },
    Directive {
        key: "http_strict_transport_security",
        apply: apply_hsts,
    },
    Directive {
        key: "http_strict_transport_security_include_subdomains",
        apply: apply_hsts_include_subdomains,
    },
    Directive {
        key: "http_strict_transport_security_preload",
        apply: apply_hsts_preload,
    },
    Directive {
        key: "force_https",
        apply: apply_force_https,
    },
];

fn apply_root(config: &mut SiteConfig, value: &str) -> Option<String> {
    if !value.is_empty() {
        config.root_dir = value.to_owned();
    }
    None
}

fn apply_host_dot_files(config: &mut SiteConfig, value: &str) -> Option<String> {
    enable(&mut config.host_dot_files, value, "Enabling hosting of dotfiles")
}

fn apply_location_include(config: &mut SiteConfig, value: &str) -> Option<String> {
    config.location_include = value.to_owned();
    (!value.is_empty()).then(|| format!("Enabling location include file {value}"))
}

// Any non-empty value turns the index on, `directory: false` included.
fn apply_directory(config: &mut SiteConfig, value: &str) -> Option<String> {
    if value.is_empty() {
        return None;
    }
    config.directory_index = true;
    Some("Enabling directory index for folders without index.html files".to_owned())
}

fn apply_ssi(config: &mut SiteConfig, value: &str) -> Option<String> {
    enable(&mut config.ssi, value, "Enabling SSI")
}

fn apply_pushstate(config: &mut SiteConfig, value: &str) -> Option<String> {
    enable(&mut config.push_state, value, "Enabling pushstate")
}

fn apply_hsts(config: &mut SiteConfig, value: &str) -> Option<String> {
    enable(&mut config.hsts, value, "Enabling HSTS")
}

fn apply_hsts_include_subdomains(config: &mut SiteConfig, value: &str) -> Option<String> {
    enable(
        &mut config.hsts_include_subdomains,
        value,
        "Enabling HSTS includeSubDomains",
    )
}

fn apply_hsts_preload(config: &mut SiteConfig, value: &str) -> Option<String> {
    enable(&mut config.hsts_preload, value, "Enabling HSTS Preload")
}

fn apply_force_https(config: &mut SiteConfig, value: &str) -> Option<String> {
    enable(&mut config.force_https, value, "Enabling HTTPS redirect")
}

fn enable(flag: &mut bool, value: &str, step: &str) -> Option<String> {
    if !is_enabled(value) {
        return None;
    }
    *flag = true;
    Some(step.to_owned())
}

const CLIENT_ERROR_CODES: &str = "400 401 402 403 404 405 406 407 408 409 410 411 412 413 414 415 416 417 418 421 422 423 424 426 428 429 431 451";
const SERVER_ERROR_CODES: &str = "500 501 502 503 504 505 506 507 508 510 511";

/// Expand `4xx`/`5xx` wildcard keys into the codes nginx can intercept.
pub(crate) fn expand_status_code(key: &str) -> &str {
    if key.contains("4xx") {
        CLIENT_ERROR_CODES
    } else if key.contains("5xx") {
        SERVER_ERROR_CODES
    } else {
        key
    }
}
