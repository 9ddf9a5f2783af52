use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::Write;
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// Ensure the parent directory of `path` exists and has restrictive permissions on Unix.
pub fn ensure_parent_secure(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("Failed to create data directory")?;
        #[cfg(unix)]
        {
            let perm = fs::Permissions::from_mode(0o700);
            let _ = fs::set_permissions(parent, perm);
        }
    }
    Ok(())
}

/// Atomically write `bytes` to `path` with secure permissions (0600 on Unix).
pub fn atomic_write_secure(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp_path: PathBuf = path.with_extension("tmp");
    {
        let mut tmp = File::create(&tmp_path).context("Failed to create temporary file")?;
        tmp.write_all(bytes)?;
        let _ = tmp.sync_data();
    }

    #[cfg(unix)]
    {
        let perm = fs::Permissions::from_mode(0o600);
        let _ = fs::set_permissions(&tmp_path, perm);
    }

    fs::rename(&tmp_path, path).context("Failed to replace file atomically")?;
    Ok(())
}

#[cfg(unix)]
fn set_perm_0600(path: &Path) {
    if let Ok(meta) = fs::metadata(path) {
        let mut perm = meta.permissions();
        perm.set_mode(0o600);
        let _ = fs::set_permissions(path, perm);
    }
}

pub fn backup_path(path: &Path, n: usize) -> PathBuf {
    PathBuf::from(format!("{}.{n}", path.display()))
}

/// Rotate backups and write atomically, keeping up to `n` backups named
/// `<file>.1` (newest) .. `<file>.n` (oldest).
pub fn write_with_backups_n(path: &Path, bytes: &[u8], n: usize) -> Result<()> {
    ensure_parent_secure(path)?;

    if n > 0 {
        let _ = fs::remove_file(backup_path(path, n));

        for i in (1..n).rev() {
            let src = backup_path(path, i);
            let dst = backup_path(path, i + 1);
            if src.exists() {
                let _ = fs::rename(&src, &dst);
                #[cfg(unix)]
                set_perm_0600(&dst);
            }
        }

        if path.exists() {
            let first = backup_path(path, 1);
            fs::copy(path, &first).context("Failed to back up previous file")?;
            #[cfg(unix)]
            set_perm_0600(&first);
        }
    }

    atomic_write_secure(path, bytes)
}
