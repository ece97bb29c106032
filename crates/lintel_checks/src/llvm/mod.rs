//! Checks enforcing LLVM coding conventions.

mod namespace_comment;

use lintel_plugin::{CheckFactories, CheckModule, PluginError};

pub use namespace_comment::NamespaceCommentCheck;

/// The `llvm` check module.
#[derive(Debug, Default, Clone, Copy)]
pub struct LlvmModule;

impl CheckModule for LlvmModule {
    fn name(&self) -> &str {
        "llvm"
    }

    fn add_check_factories(&self, factories: &mut CheckFactories) -> Result<(), PluginError> {
        let pattern = namespace_comment::comment_pattern()?;
        factories.register(namespace_comment::NAME, move |options| {
            let check = NamespaceCommentCheck::new(pattern.clone(), options)?;
            Ok(Box::new(check) as Box<dyn lintel_plugin::Check>)
        })
    }
}
