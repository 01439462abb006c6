//! Build output collected while the pipeline runs.
//!
//! Each stage pushes [`Notice`]s onto a [`Report`] it receives by `&mut`
//! instead of writing to a shared logger. The CLI prints the report in the
//! buildpack log format once the pipeline returns (successfully or not).

use std::fmt;

/// Indentation used by buildpack output for everything except step headers.
const INDENT: &str = "       ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// A stage or a directive taking effect (`-----> ...`).
    Step(String),
    Info(String),
    Warning(String),
    /// Advisory pointer to documentation.
    Protip { tip: String, link: String },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Step(msg) => write!(f, "-----> {msg}"),
            Notice::Info(msg) => write!(f, "{INDENT}{}", indent_continuation(msg)),
            Notice::Warning(msg) => {
                write!(f, "{INDENT}**WARNING** {}", indent_continuation(msg))
            }
            Notice::Protip { tip, link } => {
                write!(f, "{INDENT}PRO TIP: {tip}\n{INDENT}Visit {link}")
            }
        }
    }
}

fn indent_continuation(msg: &str) -> String {
    msg.replace('\n', &format!("\n{INDENT}"))
}

/// Ordered list of notices produced by a build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    notices: Vec<Notice>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&mut self, msg: impl Into<String>) {
        self.push(Notice::Step(msg.into()));
    }

    pub fn info(&mut self, msg: impl Into<String>) {
        self.push(Notice::Info(msg.into()));
    }

    pub fn warning(&mut self, msg: impl Into<String>) {
        self.push(Notice::Warning(msg.into()));
    }

    pub fn protip(&mut self, tip: impl Into<String>, link: impl Into<String>) {
        self.push(Notice::Protip {
            tip: tip.into(),
            link: link.into(),
        });
    }

    pub fn push(&mut self, notice: Notice) {
        tracing::debug!(%notice, "build notice");
        self.notices.push(notice);
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }

    /// Step messages in the order they were recorded.
    pub fn steps(&self) -> Vec<&str> {
        self.notices
            .iter()
            .filter_map(|n| match n {
                Notice::Step(msg) => Some(msg.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn warnings(&self) -> Vec<&str> {
        self.notices
            .iter()
            .filter_map(|n| match n {
                Notice::Warning(msg) => Some(msg.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for notice in &self.notices {
            writeln!(f, "{notice}")?;
        }
        Ok(())
    }
}
