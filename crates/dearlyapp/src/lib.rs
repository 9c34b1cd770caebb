//! # Dearly
//!
//! Storage for a keepsake box of greeting cards: every card is scanned face by
//! face, its images kept as JPEG files and its details kept as a record.
//!
//! ## Architecture
//!
//! Three layers, each only talking to the one below it:
//!
//! 1. **[`collection`]**: the in-memory list of cards and the browsing state
//!    around it (sort, occasion filter, search, multi-select). The only entry
//!    point for clients. Mutations are write-through.
//! 2. **[`store`]**: the [`store::DataStore`] trait and [`store::card_store::CardStore`],
//!    which keeps records and images in lockstep. Records live in SQLite.
//! 3. **[`images`]**: the [`images::ImageStorage`] trait. Faces are stored under
//!    `CardImages/<uuid>/` and referenced by root-relative paths.
//!
//! Around them:
//! - [`model`]: `Card`, `CardFaces`, `CardMetadata` and friends.
//! - [`scan`]: capture of one card before it is persisted.
//! - [`init`]: opening a storage root (paths, config, legacy cleanup).
//! - [`generate`]: procedurally drawn sample cards.
//!
//! ## Testing
//!
//! Both storage seams have in-memory implementations
//! ([`store::mem_backend::MemBackend`], [`images::memory::MemImageStore`]) with
//! failure simulation. The `test_utils` feature exposes a tempdir-backed `TestEnv`
//! for integration tests.

pub mod collection;
pub mod config;
pub mod error;
pub mod generate;
pub mod images;
pub mod init;
pub mod legacy;
pub mod model;
pub mod paths;
pub mod scan;
pub mod store;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
