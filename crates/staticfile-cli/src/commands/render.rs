use staticfile_build::configure::nginx_conf;
use staticfile_core::{Report, SiteConfig};
use std::io::Write;
use std::path::Path;

pub fn render(build_dir: &Path) -> anyhow::Result<()> {
    let mut report = Report::new();
    let config = SiteConfig::from_build_dir(build_dir, &mut report)?;
    for notice in report.notices() {
        eprintln!("{notice}");
    }

    let contents = nginx_conf(build_dir, &config).contents()?;
    std::io::stdout().write_all(&contents)?;
    Ok(())
}
