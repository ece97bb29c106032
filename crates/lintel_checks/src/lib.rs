//! # lintel_checks
//!
//! Built-in check modules for lintel.
//!
//! Every module adds its factories to a [`CheckFactories`] list; the binary
//! builds that list once at startup with [`builtin_factories`].
//!
//! ## Example
//!
//! ```rust
//! let factories = lintel_checks::builtin_factories()?;
//! assert!(factories.contains("llvm-namespace-comment"));
//! # Ok::<(), lintel_plugin::PluginError>(())
//! ```

pub mod llvm;

use lintel_plugin::{CheckFactories, CheckModule, PluginError};
use tracing::debug;

/// Returns every built-in check module, in registration order.
pub fn builtin_modules() -> Vec<Box<dyn CheckModule>> {
    vec![Box::new(llvm::LlvmModule)]
}

/// Builds the factory list of all built-in modules.
///
/// # Errors
///
/// Fails if two modules claim the same check name.
pub fn builtin_factories() -> Result<CheckFactories, PluginError> {
    let mut factories = CheckFactories::new();
    for module in builtin_modules() {
        module.add_check_factories(&mut factories)?;
        debug!("Loaded check module '{}'", module.name());
    }
    Ok(factories)
}
