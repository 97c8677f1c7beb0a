//! Ownership tracking for values produced during lowering.
//!
//! A retained reference is paired with a release obligation pushed on the [CleanupStack].  The
//! obligations are discharged when the enclosing cleanup scope is left, on success and on error
//! alike (see `FnCompiler::compile_with_cleanup_scope`).

use lval_ir::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleanupHandle(usize);

/// Who is responsible for the value's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    /// A trivial value, or one whose lifetime is guaranteed by someone else.
    Unmanaged,
    /// An address of storage, passed in place.  Never retained or released.
    LValue,
    /// A retained reference which is released by the cleanup behind the handle.
    Owned(CleanupHandle),
}

/// An IR value together with its [Ownership].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManagedValue {
    value: Value,
    ownership: Ownership,
}

impl ManagedValue {
    pub fn unmanaged(value: Value) -> ManagedValue {
        ManagedValue {
            value,
            ownership: Ownership::Unmanaged,
        }
    }

    pub fn for_lvalue(value: Value) -> ManagedValue {
        ManagedValue {
            value,
            ownership: Ownership::LValue,
        }
    }

    pub(crate) fn owned(value: Value, handle: CleanupHandle) -> ManagedValue {
        ManagedValue {
            value,
            ownership: Ownership::Owned(handle),
        }
    }

    pub fn value(&self) -> Value {
        self.value
    }

    pub fn ownership(&self) -> Ownership {
        self.ownership
    }

    pub fn is_lvalue(&self) -> bool {
        matches!(self.ownership, Ownership::LValue)
    }

    pub fn has_cleanup(&self) -> bool {
        matches!(self.ownership, Ownership::Owned(_))
    }
}

#[derive(Debug, Default)]
pub(crate) struct CleanupStack {
    releases: Vec<Value>,
}

impl CleanupStack {
    /// Owe a release of `value` to the innermost cleanup scope.
    pub(crate) fn push_release(&mut self, value: Value) -> CleanupHandle {
        self.releases.push(value);
        CleanupHandle(self.releases.len() - 1)
    }

    pub(crate) fn depth(&self) -> usize {
        self.releases.len()
    }

    /// Remove every obligation pushed since the stack was `depth` deep, innermost first.
    pub(crate) fn pop_to(&mut self, depth: usize) -> Vec<Value> {
        let mut popped = self.releases.split_off(depth.min(self.releases.len()));
        popped.reverse();
        popped
    }
}

#[cfg(test)]
mod tests {
    use lval_ir::{Context, Module, Type, Value};

    use super::*;

    #[test]
    fn pop_to_releases_innermost_first() {
        let mut context = Context::new();
        let _ = Module::new(&mut context, "test");
        let node = Type::new_reference(&mut context, "Node");
        let a = Value::new_argument(&mut context, node);
        let b = Value::new_argument(&mut context, node);
        let c = Value::new_argument(&mut context, node);

        let mut stack = CleanupStack::default();
        stack.push_release(a);
        let depth = stack.depth();
        let b_handle = stack.push_release(b);
        let c_handle = stack.push_release(c);
        assert_ne!(b_handle, c_handle);
        assert!(ManagedValue::owned(b, b_handle).has_cleanup());

        assert_eq!(stack.pop_to(depth), vec![c, b]);
        assert_eq!(stack.depth(), 1);
        assert_eq!(stack.pop_to(0), vec![a]);
        assert!(stack.pop_to(0).is_empty());
    }
}
