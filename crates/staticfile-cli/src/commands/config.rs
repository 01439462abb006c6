use staticfile_core::{Report, SiteConfig};
use std::path::Path;

pub fn config(build_dir: &Path) -> anyhow::Result<()> {
    let config = SiteConfig::from_build_dir(build_dir, &mut Report::new())?;
    print!("{}", config.to_yaml()?);
    Ok(())
}
