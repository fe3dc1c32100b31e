//! Command implementations.

pub mod evaluate;
pub mod policy;

pub use self::evaluate::execute_evaluate;
pub use self::policy::execute_policy;

use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Replace `path` with `contents` without ever leaving it half written.
///
/// The bytes go to a temporary file in the same directory, which is synced
/// and then renamed over the target.
pub(crate) fn write_atomic(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut staged = NamedTempFile::new_in(dir)?;
    staged.write_all(contents)?;
    staged.as_file().sync_all()?;
    staged.persist(path).map_err(|e| e.error)?;
    Ok(())
}
