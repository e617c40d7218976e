use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

pub fn set_permissions(file: &fs::File, path: &Path, mode: u32) -> Result<()> {
    #[cfg(unix)]
    {
        let perm = fs::Permissions::from_mode(mode);
        file.set_permissions(perm)
            .with_context(|| format!("set permissions {:o} on {}", mode, path.display()))?;
    }
    Ok(())
}

/// Permission bits of `path` (without file type bits).
pub fn mode(path: &Path) -> Result<u32> {
    let meta = fs::metadata(path).with_context(|| format!("stat {}", path.display()))?;
    #[cfg(unix)]
    {
        Ok(meta.permissions().mode() & 0o777)
    }
    #[cfg(not(unix))]
    {
        let _ = meta;
        Ok(0)
    }
}

/// True when neither group nor others have any access.
pub fn is_owner_only(mode: u32) -> bool {
    mode & 0o077 == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_only() {
        assert!(is_owner_only(0o600));
        assert!(is_owner_only(0o400));
        assert!(!is_owner_only(0o640));
        assert!(!is_owner_only(0o604));
    }

    #[cfg(unix)]
    #[test]
    fn test_set_and_read_mode() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        set_permissions(tmp.as_file(), tmp.path(), 0o640).unwrap();
        assert_eq!(mode(tmp.path()).unwrap(), 0o640);
    }
}
