//! # Opening a Storage Root
//!
//! [`initialize`] turns an optional root override into a ready collection:
//!
//! 1. Resolve the root: the override if given, else the OS data directory
//!    (via the `directories` crate).
//! 2. Load [`DearlyConfig`] from the environment and `<root>/dearly.toml`.
//! 3. Delete the legacy `savedCards.json` blob if one is left over.
//! 4. Open the SQLite record database and the image directory.
//! 5. Load every card into a [`CardCollection`], starting in the configured sort mode.
//!
//! Every step except the card load is fatal. A failing card load is logged and
//! yields an empty collection, see [`CardCollection::load`].

use crate::collection::CardCollection;
use crate::config::DearlyConfig;
use crate::error::Result;
use crate::images::fs::ImageStore;
use crate::legacy;
use crate::paths::DearlyPaths;
use crate::store::card_store::CardStore;
use crate::store::sqlite_backend::SqliteBackend;
use std::path::PathBuf;
use tracing::debug;

/// The production store: SQLite records, JPEG files on disk.
pub type DiskStore = CardStore<SqliteBackend, ImageStore>;

pub struct DearlyContext {
    pub paths: DearlyPaths,
    pub config: DearlyConfig,
    pub collection: CardCollection<DiskStore>,
}

/// Opens the store under `root` and builds the collection.
pub fn open_store(paths: &DearlyPaths, config: &DearlyConfig) -> Result<DiskStore> {
    legacy::remove_legacy_blob(paths)?;
    let backend = SqliteBackend::open(&paths.database(&config.database_file))?;
    let images = ImageStore::open(paths.root().to_path_buf())?.with_quality(config.jpeg_quality);
    Ok(CardStore::new(backend, images))
}

pub fn initialize(root_override: Option<PathBuf>) -> Result<DearlyContext> {
    let paths = DearlyPaths::resolve(root_override)?;
    let config = DearlyConfig::load(&paths.config_file())?;
    debug!(root = %paths.root().display(), ?config, "initializing dearly");

    let store = open_store(&paths, &config)?;
    let mut collection = CardCollection::load(store);
    collection.set_sort_option(config.default_sort());

    Ok(DearlyContext {
        paths,
        config,
        collection,
    })
}
