//! Resolving the location of a store file from configuration.

use std::path::{Path, PathBuf};

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

/// Expand `path` and create its parent directory if it does not exist yet.
pub fn prepare_store_path(path: &Path) -> std::io::Result<PathBuf> {
  let path = expand_tilde(path);
  if let Some(parent) = path.parent()
    && !parent.as_os_str().is_empty()
  {
    std::fs::create_dir_all(parent)?;
  }
  Ok(path)
}

#[cfg(test)]
mod tests {
  use uuid::Uuid;

  use super::*;

  #[test]
  fn tilde_expands_to_home() {
    if let Ok(home) = std::env::var("HOME") {
      assert_eq!(expand_tilde(Path::new("~/x.db")), PathBuf::from(home).join("x.db"));
    }
    assert_eq!(expand_tilde(Path::new("/abs/x.db")), PathBuf::from("/abs/x.db"));
    assert_eq!(expand_tilde(Path::new("rel.db")), PathBuf::from("rel.db"));
  }

  #[test]
  fn parent_directory_is_created() {
    let dir = std::env::temp_dir().join(format!("lc-path-{}", Uuid::new_v4()));
    let path = prepare_store_path(&dir.join("nested").join("local.db")).unwrap();
    assert!(path.parent().unwrap().is_dir());
    std::fs::remove_dir_all(&dir).unwrap();
  }
}
