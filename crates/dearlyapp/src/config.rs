//! # Configuration
//!
//! Dearly configuration is managed by [`confique`], which handles layered loading
//! from a TOML file, environment variables and compiled defaults.
//!
//! ## Storage Hierarchy
//!
//! Configuration is resolved in priority order:
//! 1. **Environment variables**: `DEARLY_JPEG_QUALITY`, `DEARLY_DATABASE_FILE`,
//!    `DEARLY_DEFAULT_SORT`.
//! 2. **Config file**: `<root>/dearly.toml`.
//! 3. **Compiled Defaults**: Built-in fallbacks via `#[config(default = ...)]`.
//!
//! The storage root itself is not a config value: it decides where the config
//! file lives. See [`crate::paths::DearlyPaths`].
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `jpeg_quality` | `80` | JPEG quality (1-100) for stored faces |
//! | `database_file` | `dearly.sqlite` | Record database, relative to the root |
//! | `default_sort` | unset (`newest`) | Initial sort: `newest`, `oldest` or `favorites` |

use crate::collection::SortOption;
use crate::error::{DearlyError, Result};
use confique::Config;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for dearly, stored in `dearly.toml`.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DearlyConfig {
    /// JPEG quality for stored card faces, 1 (smallest) to 100 (best).
    #[config(env = "DEARLY_JPEG_QUALITY", default = 80)]
    pub jpeg_quality: u8,

    /// File name of the record database inside the storage root.
    #[config(env = "DEARLY_DATABASE_FILE", default = "dearly.sqlite")]
    pub database_file: String,

    /// Sort applied when the collection is first shown. Newest first when unset.
    #[config(env = "DEARLY_DEFAULT_SORT")]
    pub default_sort: Option<SortOption>,
}

impl Default for DearlyConfig {
    fn default() -> Self {
        Self {
            jpeg_quality: crate::images::DEFAULT_JPEG_QUALITY,
            database_file: "dearly.sqlite".to_string(),
            default_sort: None,
        }
    }
}

impl DearlyConfig {
    /// Load from environment and `config_file` (skipped when absent), over defaults.
    pub fn load(config_file: &Path) -> Result<Self> {
        let config = Self::builder().env().file(config_file).load()?;
        config.validate()?;
        Ok(config)
    }

    pub fn default_sort(&self) -> SortOption {
        self.default_sort.unwrap_or_default()
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(DearlyError::InvalidConfig(format!(
                "jpeg_quality must be between 1 and 100, got {}",
                self.jpeg_quality
            )));
        }
        let db = Path::new(&self.database_file);
        if self.database_file.trim().is_empty() || db.is_absolute() || db.components().count() != 1
        {
            return Err(DearlyError::InvalidConfig(format!(
                "database_file must be a plain file name, got {:?}",
                self.database_file
            )));
        }
        Ok(())
    }
}
