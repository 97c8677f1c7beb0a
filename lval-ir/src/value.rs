//! The base descriptor for various values within the IR.
//!
//! [`Value`]s can be function arguments, constants and instructions.  [`Instruction`]s generally
//! refer to each other and to constants via the [`Value`] wrapper.
//!
//! Like most IR data structures they are `Copy` and cheap to pass around by value.

use crate::{constant::Constant, context::Context, instruction::Instruction, irtype::Type};

/// A wrapper around an [ECS](https://github.com/orlp/slotmap) handle into the
/// [`Context`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct Value(pub slotmap::DefaultKey);

#[doc(hidden)]
#[derive(Debug, Clone)]
pub enum ValueContent {
    Argument(Type),
    Constant(Constant),
    Instruction(Instruction),
}

impl Value {
    /// Return a new argument [`Value`].
    pub fn new_argument(context: &mut Context, ty: Type) -> Value {
        let content = ValueContent::Argument(ty);
        Value(context.values.insert(content))
    }

    /// Return a new constant [`Value`].
    pub fn new_constant(context: &mut Context, constant: Constant) -> Value {
        let content = ValueContent::Constant(constant);
        Value(context.values.insert(content))
    }

    /// Return a new instruction [`Value`].
    pub fn new_instruction(context: &mut Context, instruction: Instruction) -> Value {
        let content = ValueContent::Instruction(instruction);
        Value(context.values.insert(content))
    }

    /// Return whether this is a constant value.
    pub fn is_constant(&self, context: &Context) -> bool {
        matches!(context.values[self.0], ValueContent::Constant(_))
    }

    /// Return whether this is a function argument.
    pub fn is_argument(&self, context: &Context) -> bool {
        matches!(context.values[self.0], ValueContent::Argument(_))
    }

    /// Return whether this value is an instruction, and specifically a 'terminator'.
    pub fn is_terminator(&self, context: &Context) -> bool {
        match &context.values[self.0] {
            ValueContent::Instruction(ins) => ins.is_terminator(),
            _ => false,
        }
    }

    /// Get a reference to this value as an instruction, iff it is one.
    pub fn get_instruction<'a>(&self, context: &'a Context) -> Option<&'a Instruction> {
        if let ValueContent::Instruction(ins) = &context.values[self.0] {
            Some(ins)
        } else {
            None
        }
    }

    /// Get a reference to this value as a constant, iff it is one.
    pub fn get_constant<'a>(&self, context: &'a Context) -> Option<&'a Constant> {
        if let ValueContent::Constant(c) = &context.values[self.0] {
            Some(c)
        } else {
            None
        }
    }

    /// Get the type for this value, if found.
    ///
    /// Arguments and constants always have a type, but only some instructions do.
    pub fn get_type(&self, context: &Context) -> Option<Type> {
        match &context.values[self.0] {
            ValueContent::Argument(ty) => Some(*ty),
            ValueContent::Constant(c) => Some(c.ty),
            ValueContent::Instruction(ins) => ins.get_type(context),
        }
    }

    /// Whether this value is an address.
    pub fn is_ptr(&self, context: &Context) -> bool {
        self.get_type(context)
            .is_some_and(|ty| ty.is_ptr(context))
    }

    /// Whether this value is an ownership-counted reference.
    pub fn has_reference_semantics(&self, context: &Context) -> bool {
        self.get_type(context)
            .is_some_and(|ty| ty.has_reference_semantics(context))
    }
}
