//! A value representing a function-local variable.

use crate::{
    context::Context,
    irtype::{Type, TypeContent},
};

/// A wrapper around an [ECS](https://github.com/orlp/slotmap) handle into the
/// [`Context`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct LocalVar(pub slotmap::DefaultKey);

#[doc(hidden)]
#[derive(Clone, Debug)]
pub struct LocalVarContent {
    pub ptr_ty: Type,
    pub mutable: bool,
}

impl LocalVar {
    /// Return a new local of a specific type.  Temporaries created while lowering are always
    /// mutable.
    pub fn new(context: &mut Context, ty: Type, mutable: bool) -> Self {
        let ptr_ty = Type::new_ptr(context, ty);
        let content = LocalVarContent { ptr_ty, mutable };
        LocalVar(context.local_vars.insert(content))
    }

    /// Return the type of this local variable, which is always a pointer.
    pub fn get_type(&self, context: &Context) -> Type {
        context.local_vars[self.0].ptr_ty
    }

    /// Return the inner (pointed to) type.
    pub fn get_inner_type(&self, context: &Context) -> Type {
        let TypeContent::Pointer(inner_ty) = self.get_type(context).get_content(context) else {
            unreachable!("Local var type is always a pointer.")
        };
        *inner_ty
    }

    /// Return whether this local variable is mutable.
    pub fn is_mutable(&self, context: &Context) -> bool {
        context.local_vars[self.0].mutable
    }
}
