//! Core types for the Staticfile nginx compiler.
//!
//! This crate defines the compiled site configuration ([`SiteConfig`]),
//! the Staticfile directive parser ([`Directives`]), basic-auth detection,
//! the build [`Report`], and shared error types.

pub mod auth;
pub mod config;
pub mod directive;
pub mod error;
pub mod report;

pub use config::{STATICFILE, SiteConfig};
pub use directive::{Directives, is_enabled};
pub use error::{Error, Result};
pub use report::{Notice, Report};
