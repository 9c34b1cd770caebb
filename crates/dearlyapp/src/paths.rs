use crate::error::{DearlyError, Result};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "dearly.toml";

/// File written by the flat-file generation of the app (every card as one JSON array).
pub const LEGACY_BLOB_FILE: &str = "savedCards.json";

/// Locations under the persistent-storage root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DearlyPaths {
    pub root: PathBuf,
}

impl DearlyPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Use `root` when given, otherwise the OS data directory for dearly
    /// (e.g. `~/.local/share/dearly` on Linux).
    pub fn resolve(root: Option<PathBuf>) -> Result<Self> {
        if let Some(root) = root {
            return Ok(Self::new(root));
        }
        let dirs = ProjectDirs::from("com", "dearly", "dearly").ok_or_else(|| {
            DearlyError::Store("Could not determine a data directory".to_string())
        })?;
        Ok(Self::new(dirs.data_dir()))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_file(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }

    pub fn database(&self, file_name: &str) -> PathBuf {
        self.root.join(file_name)
    }

    pub fn legacy_blob(&self) -> PathBuf {
        self.root.join(LEGACY_BLOB_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_root_wins() {
        let paths = DearlyPaths::resolve(Some(PathBuf::from("/tmp/cards"))).unwrap();
        assert_eq!(paths.root(), Path::new("/tmp/cards"));
        assert_eq!(
            paths.legacy_blob(),
            PathBuf::from("/tmp/cards/savedCards.json")
        );
        assert_eq!(paths.config_file(), PathBuf::from("/tmp/cards/dearly.toml"));
        assert_eq!(
            paths.database("dearly.sqlite"),
            PathBuf::from("/tmp/cards/dearly.sqlite")
        );
    }
}
