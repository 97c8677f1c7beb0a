//! A scope for functions.
//!
//! Accessor functions referenced during lowering are declared here lazily, so a module holds
//! both definitions and bodiless declarations.

use crate::{context::Context, function::Function};

/// A wrapper around an [ECS](https://github.com/orlp/slotmap) handle into the
/// [`Context`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Module(pub slotmap::DefaultKey);

#[doc(hidden)]
pub struct ModuleContent {
    pub name: String,
    pub functions: Vec<Function>,
}

impl Module {
    /// Return a new module handle.
    pub fn new(context: &mut Context, name: impl Into<String>) -> Module {
        let content = ModuleContent {
            name: name.into(),
            functions: Vec::new(),
        };
        Module(context.modules.insert(content))
    }

    pub fn get_name<'a>(&self, context: &'a Context) -> &'a str {
        &context.modules[self.0].name
    }

    /// Return an iterator over each of the [`Function`]s in this module.
    pub fn function_iter(&self, context: &Context) -> std::vec::IntoIter<Function> {
        context.modules[self.0].functions.clone().into_iter()
    }

    /// Return the function named `name`, if one is defined or declared in this module.
    pub fn get_function(&self, context: &Context, name: &str) -> Option<Function> {
        context.modules[self.0]
            .functions
            .iter()
            .find(|function| function.get_name(context) == name)
            .copied()
    }
}
