use std::path::{Path, PathBuf};

use arch_lint::rules::{NoErrorSwallowing, NoSilentResultDrop};
use arch_lint::{Analyzer, Severity};

const MEMBERS: &[&str] = &["staticfile-core", "staticfile-build", "staticfile-cli"];

fn crates_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("crates directory")
        .to_path_buf()
}

/// Every pipeline stage is fatal on error, so no member may swallow a
/// `Result` (AL003) or drop one silently (AL013). Test code is excluded.
#[test]
fn members_propagate_every_error() {
    for member in MEMBERS {
        let root = crates_dir().join(member);
        let analyzer = Analyzer::builder()
            .root(root.as_path())
            .exclude("**/target/**")
            .exclude("**/tests/**")
            .rule(NoErrorSwallowing::new())
            .rule(NoSilentResultDrop::new())
            .build()
            .expect("build analyzer");

        let result = analyzer.analyze().expect("analyze");

        assert!(
            !result.has_violations_at(Severity::Warning),
            "{member}:\n{}",
            result.format_test_report(Severity::Warning)
        );
    }
}
