//! Dependency graph resolver contract

use env_model::{Module, ModuleId};

use crate::Result;

/// Resolves a top-level module identifier into the ordered list of
/// participating modules.
///
/// The output contains the top-level module and every transitive
/// dependency whose artifact name matches the module filter, each
/// populated with identity fields only (`id`, `short_name`,
/// `top_level_short_name`).
///
/// **Order is semantically load-bearing**: list index is the overlay
/// precedence, ascending — the highest index wins conflicts. The order
/// must be deterministic for identical inputs; how it is computed is up
/// to the implementation.
///
/// Implementations are injected into [`crate::Environment`] at
/// construction; there is no runtime service discovery.
pub trait DependencyResolver: Send + Sync {
    fn resolve(&self, top_level: &ModuleId) -> Result<Vec<Module>>;
}
