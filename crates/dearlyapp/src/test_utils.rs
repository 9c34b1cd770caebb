use crate::collection::CardCollection;
use crate::images::fs::ImageStore;
use crate::images::memory::MemImageStore;
use crate::model::CardFaces;
use crate::store::card_store::CardStore;
use crate::store::mem_backend::MemBackend;
use crate::store::sqlite_backend::SqliteBackend;
use image::{ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;
use std::path::PathBuf;
use tempfile::TempDir;

/// A small PNG, as a scanner might hand over.
pub fn png_bytes() -> Vec<u8> {
    let image = RgbaImage::from_fn(32, 48, |x, y| {
        Rgba([(x * 8) as u8, (y * 5) as u8, 120, 255])
    });
    let mut out = Cursor::new(Vec::new());
    image
        .write_to(&mut out, ImageFormat::Png)
        .expect("failed to encode test png");
    out.into_inner()
}

pub fn traditional_faces() -> CardFaces<Vec<u8>> {
    CardFaces::Traditional {
        front: png_bytes(),
        back: png_bytes(),
        inside_left: png_bytes(),
        inside_right: png_bytes(),
    }
}

pub fn flat_faces() -> CardFaces<Vec<u8>> {
    CardFaces::TwoSided {
        front: png_bytes(),
        back: png_bytes(),
    }
}

pub fn mem_collection() -> CardCollection<CardStore<MemBackend, MemImageStore>> {
    CardCollection::load(CardStore::new(MemBackend::new(), MemImageStore::new()))
}

pub struct TestEnv {
    // We keep _temp_dir to ensure the directory is not dropped until the test is done
    pub _temp_dir: TempDir,
    pub root: PathBuf,
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl TestEnv {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("failed to create temp dir");
        let root = temp_dir.path().to_path_buf();
        Self {
            _temp_dir: temp_dir,
            root,
        }
    }

    /// A fresh store over this environment's root. Reopening sees earlier writes.
    pub fn store(&self) -> CardStore<SqliteBackend, ImageStore> {
        let backend =
            SqliteBackend::open(&self.root.join("dearly.sqlite")).expect("failed to open db");
        let images = ImageStore::open(self.root.clone()).expect("failed to open image store");
        CardStore::new(backend, images)
    }

    pub fn collection(&self) -> CardCollection<CardStore<SqliteBackend, ImageStore>> {
        CardCollection::load(self.store())
    }
}
