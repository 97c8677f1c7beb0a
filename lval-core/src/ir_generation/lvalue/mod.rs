//! Locations of assignable expressions.
//!
//! An [LValue] is a chain of [PathComponent]s built root first.  The root takes no base; every
//! later component is applied to whatever the component before it produced.  Physical
//! components compute addresses, the logical [AccessorLocation] goes through a getter and a
//! setter.
//!
//! An [LValue] is consumed by the load, store or address walk it is handed to.  Reading and
//! then writing the same expression builds it twice.

mod access;
mod accessor;
mod builder;
mod component;

pub use accessor::AccessorLocation;
pub use component::*;

use lval_ir::Type;
use tracing::trace;

#[derive(Debug, Default)]
pub struct LValue<'a> {
    components: Vec<PathComponent<'a>>,
}

impl<'a> LValue<'a> {
    pub fn new() -> Self {
        LValue {
            components: Vec::new(),
        }
    }

    /// Append a component.  Only root components may come first, and only first.
    pub fn add(&mut self, component: impl Into<PathComponent<'a>>) {
        let component = component.into();
        let is_first = self.components.is_empty();
        debug_assert!(
            match &component {
                PathComponent::Physical(physical) => physical.is_root() == is_first,
                PathComponent::Logical(_) => true,
            },
            "Root lvalue components must come first, and only first."
        );
        trace!(position = self.components.len(), ?component, "adding lvalue path component");
        self.components.push(component);
    }

    pub fn components(&self) -> &[PathComponent<'a>] {
        &self.components
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Whether every component computes an address, i.e. no accessor is involved.
    pub fn is_physical(&self) -> bool {
        self.components.iter().all(PathComponent::is_physical)
    }

    /// The lowered type of the value the whole path denotes.
    pub fn object_type(&self) -> Option<Type> {
        self.components.last().map(PathComponent::object_type)
    }

    pub fn into_components(self) -> Vec<PathComponent<'a>> {
        self.components
    }
}
