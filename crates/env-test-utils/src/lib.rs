//! Shared test utilities for the environment-composer workspace.
//!
//! Standardised fixtures for overlay and façade tests. Dev-dependency
//! only — never published.
//!
//! # Modules
//!
//! - [`bundles`] — [`BundleFixture`] building module bundle trees on disk
//! - [`resolver`] — [`FixedResolver`] with a canned, ordered module list

pub mod bundles;
pub mod resolver;

pub use bundles::BundleFixture;
pub use resolver::{FixedResolver, module};
