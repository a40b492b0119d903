//! Static content for the camp combat rules.
//!
//! [`ContentBundle`] holds mob templates, camps, zones, loot tables, items and
//! classes keyed by id and implements [`combat_core::ContentOracle`]. With the
//! `loaders` feature (default) the bundle and the combat tunables are read
//! from RON and TOML files by [`ContentFactory`].
//!
//! Content is consumed by the rules through the oracle and never appears in
//! saved character state.

pub mod bundle;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use bundle::ContentBundle;

#[cfg(feature = "loaders")]
pub use loaders::{CatalogLoader, ConfigLoader, ContentFactory, LoadResult};
