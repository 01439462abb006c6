//! Filesystem helpers that pin permissions on unix.

use std::io;
use std::path::Path;

pub(crate) const DIR_MODE: u32 = 0o755;
pub(crate) const FILE_MODE: u32 = 0o644;
pub(crate) const SCRIPT_MODE: u32 = 0o755;

/// `create_dir_all` with owner-writable, world-readable directories.
pub(crate) fn create_dir_all(path: &Path) -> io::Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        std::fs::DirBuilder::new()
            .recursive(true)
            .mode(DIR_MODE)
            .create(path)
    }
    #[cfg(not(unix))]
    {
        std::fs::create_dir_all(path)
    }
}

/// Writes `contents` and sets `mode` on unix.
#[cfg_attr(not(unix), allow(unused_variables))]
pub(crate) fn write_with_mode(path: &Path, contents: &[u8], mode: u32) -> io::Result<()> {
    std::fs::write(path, contents)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))?;
    }
    Ok(())
}
