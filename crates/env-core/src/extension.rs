//! Extension pipeline contract

use env_model::Module;

use crate::{Environment, Result};

/// An externally supplied transformation of the final module list.
///
/// Extensions run strictly in registration order, after every module has
/// been configured. Each receives the environment (to query resolved
/// resource paths) and the previous stage's list; its output replaces
/// that list wholesale. Nothing validates that an extension preserves
/// module identities or count — this is a deliberate extensibility
/// point.
///
/// The environment's own module list is still being computed while
/// extensions run, so implementations must work from the supplied list
/// rather than calling [`Environment::modules`].
///
/// An extension error aborts the whole pipeline; there is no isolation
/// between extensions.
pub trait Extension: Send + Sync {
    /// Name used in logs and error reports.
    fn name(&self) -> &str {
        "extension"
    }

    fn apply(&self, environment: &Environment, modules: Vec<Module>) -> Result<Vec<Module>>;
}
