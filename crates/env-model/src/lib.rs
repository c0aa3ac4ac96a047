//! Module identity and value model for Environment Composer
//!
//! Immutable identifiers, module records, and the module-name inclusion
//! filter. Pipeline stages never mutate a [`Module`] in place; they derive
//! a new value through [`Module::to_builder`].

pub mod error;
pub mod filter;
pub mod id;
pub mod module;

pub use error::{Error, Result};
pub use filter::{DEFAULT_MODULE_FILTER, ModuleNameFilter};
pub use id::ModuleId;
pub use module::{Module, ModuleBuilder, Volume};
