//! Instructions for memory access, reference counting and calls.
//!
//! Assignable expressions are lowered to a handful of address computations
//! ([`Instruction::GetLocal`], [`Instruction::RefElemAddr`], [`Instruction::ElemAddr`]), memory
//! reads and writes, and calls to accessor functions bracketed by retains and releases.

use crate::{
    block::Block,
    context::Context,
    function::Function,
    irtype::Type,
    local_var::LocalVar,
    value::{Value, ValueContent},
};

#[derive(Debug, Clone)]
pub enum Instruction {
    /// A function call with a list of arguments.  Generic callees are applied to `substitutions`,
    /// and `return_type` is the callee's return type after substitution.
    Call {
        callee: Function,
        substitutions: Vec<Type>,
        args: Vec<Value>,
        return_type: Type,
    },
    /// Translate a pointer from a base aggregate in memory to its `index`th element.
    ElemAddr {
        base: Value,
        index: u64,
        elem_ptr_ty: Type,
    },
    /// Return a pointer to a local variable.
    GetLocal(LocalVar),
    /// Read a value from a memory pointer.
    Load(Value),
    /// Translate a reference to a class instance into a pointer to one of its stored fields.
    RefElemAddr {
        base: Value,
        field: String,
        elem_ptr_ty: Type,
    },
    /// Drop one ownership count of a reference.
    Release(Value),
    /// Return from a function.
    Ret(Value, Type),
    /// Add one ownership count to a reference.
    Retain(Value),
    /// Write a value to a memory pointer.
    Store {
        dst_val_ptr: Value,
        stored_val: Value,
    },
}

impl Instruction {
    /// Some [`Instruction`]s can return a value, but for some a return value doesn't make sense.
    ///
    /// Terminators such as `Ret` do not have a type.
    pub fn get_type(&self, context: &Context) -> Option<Type> {
        match self {
            Instruction::Call { return_type, .. } => Some(*return_type),

            // Load needs to strip the pointer from the source type.
            Instruction::Load(ptr_val) => ptr_val
                .get_type(context)
                .and_then(|ty| ty.get_pointee_type(context)),

            // These return pointer types.
            Instruction::ElemAddr { elem_ptr_ty, .. } => Some(*elem_ptr_ty),
            Instruction::RefElemAddr { elem_ptr_ty, .. } => Some(*elem_ptr_ty),
            Instruction::GetLocal(local_var) => Some(local_var.get_type(context)),

            // Memory writes and reference counting return unit.
            Instruction::Store { .. } | Instruction::Retain(_) | Instruction::Release(_) => {
                Some(Type::get_unit(context))
            }

            Instruction::Ret(..) => None,
        }
    }

    pub fn get_operands(&self) -> Vec<Value> {
        match self {
            Instruction::Call { args, .. } => args.clone(),
            Instruction::ElemAddr { base, .. } => vec![*base],
            Instruction::GetLocal(_) => vec![],
            Instruction::Load(v) => vec![*v],
            Instruction::RefElemAddr { base, .. } => vec![*base],
            Instruction::Release(v) => vec![*v],
            Instruction::Ret(v, _) => vec![*v],
            Instruction::Retain(v) => vec![*v],
            Instruction::Store {
                dst_val_ptr,
                stored_val,
            } => vec![*dst_val_ptr, *stored_val],
        }
    }

    pub fn may_have_side_effect(&self) -> bool {
        match self {
            Instruction::Call { .. }
            | Instruction::Release(_)
            | Instruction::Ret(..)
            | Instruction::Retain(_)
            | Instruction::Store { .. } => true,

            Instruction::ElemAddr { .. }
            | Instruction::GetLocal(_)
            | Instruction::Load(_)
            | Instruction::RefElemAddr { .. } => false,
        }
    }

    pub fn is_terminator(&self) -> bool {
        matches!(self, Instruction::Ret(..))
    }
}

/// Iterate over all [`Instruction`]s in a specific [`Block`].
pub struct InstructionIterator {
    instructions: Vec<slotmap::DefaultKey>,
    next: usize,
}

impl InstructionIterator {
    pub fn new(context: &Context, block: &Block) -> Self {
        // Copy all the current instruction indices, so they may be modified in the context during
        // iteration.
        InstructionIterator {
            instructions: context.blocks[block.0]
                .instructions
                .iter()
                .map(|val| val.0)
                .collect(),
            next: 0,
        }
    }
}

impl Iterator for InstructionIterator {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        let idx = self.instructions.get(self.next)?;
        self.next += 1;
        Some(Value(*idx))
    }
}

/// Provide a context for appending new [`Instruction`]s to a [`Block`].
pub struct InstructionInserter<'a> {
    context: &'a mut Context,
    block: Block,
}

macro_rules! make_instruction {
    ($self: ident, $ctor: expr) => {{
        let instruction_val = Value::new_instruction($self.context, $ctor);
        $self.context.blocks[$self.block.0]
            .instructions
            .push(instruction_val);
        instruction_val
    }};
}

impl<'a> InstructionInserter<'a> {
    /// Return a new [`InstructionInserter`] context for `block`.
    pub fn new(context: &'a mut Context, block: Block) -> InstructionInserter<'a> {
        InstructionInserter { context, block }
    }

    pub fn call(
        self,
        callee: Function,
        substitutions: Vec<Type>,
        args: &[Value],
        return_type: Type,
    ) -> Value {
        make_instruction!(
            self,
            Instruction::Call {
                callee,
                substitutions,
                args: args.to_vec(),
                return_type,
            }
        )
    }

    // elem_addr() and ref_elem_addr() take the element type and store the pointer to that type
    // in the instruction, which is later returned by Instruction::get_type().
    pub fn elem_addr(self, base: Value, index: u64, elem_ty: Type) -> Value {
        let elem_ptr_ty = Type::new_ptr(self.context, elem_ty);
        make_instruction!(
            self,
            Instruction::ElemAddr {
                base,
                index,
                elem_ptr_ty,
            }
        )
    }

    pub fn get_local(self, local_var: LocalVar) -> Value {
        make_instruction!(self, Instruction::GetLocal(local_var))
    }

    pub fn load(self, src_val: Value) -> Value {
        make_instruction!(self, Instruction::Load(src_val))
    }

    pub fn ref_elem_addr(self, base: Value, field: impl Into<String>, elem_ty: Type) -> Value {
        let elem_ptr_ty = Type::new_ptr(self.context, elem_ty);
        make_instruction!(
            self,
            Instruction::RefElemAddr {
                base,
                field: field.into(),
                elem_ptr_ty,
            }
        )
    }

    pub fn release(self, value: Value) -> Value {
        make_instruction!(self, Instruction::Release(value))
    }

    pub fn ret(self, value: Value, ty: Type) -> Value {
        make_instruction!(self, Instruction::Ret(value, ty))
    }

    pub fn retain(self, value: Value) -> Value {
        make_instruction!(self, Instruction::Retain(value))
    }

    pub fn store(self, dst_val_ptr: Value, stored_val: Value) -> Value {
        make_instruction!(
            self,
            Instruction::Store {
                dst_val_ptr,
                stored_val,
            }
        )
    }
}

impl Value {
    /// Return the instruction this value wraps, if it is a `GetLocal`, as its local variable.
    pub fn get_local_var(&self, context: &Context) -> Option<LocalVar> {
        match &context.values[self.0] {
            ValueContent::Instruction(Instruction::GetLocal(local_var)) => Some(*local_var),
            _ => None,
        }
    }
}
