//! Code to validate the IR in a [`Context`].
//!
//! During creation, deserialization and optimization the IR should be verified to be in a
//! consistent valid state, using the functions in this module.

use crate::{
    block::Block,
    context::Context,
    error::IrError,
    function::Function,
    instruction::Instruction,
    irtype::Type,
    value::Value,
};

impl Context {
    /// Verify the contents of this [`Context`] is valid.
    pub fn verify(&self) -> Result<(), IrError> {
        for (key, _) in &self.functions {
            self.verify_function(Function(key))?;
        }
        Ok(())
    }

    /// Verify a single function.  Declarations are trivially valid.
    pub fn verify_function(&self, function: Function) -> Result<(), IrError> {
        for block in function.blocks(self) {
            self.verify_block(function, *block)?;
        }
        Ok(())
    }

    fn verify_block(&self, function: Function, block: Block) -> Result<(), IrError> {
        let num_ins = block.num_instructions(self);
        for (idx, ins_val) in block.instruction_iter(self).enumerate() {
            let Some(ins) = ins_val.get_instruction(self) else {
                continue;
            };
            if ins.is_terminator() && idx + 1 != num_ins {
                return Err(IrError::MisplacedTerminator(block.get_label(self)));
            }
            InstructionVerifier {
                context: self,
                function,
            }
            .verify_instruction(ins)?;
        }
        Ok(())
    }
}

struct InstructionVerifier<'a> {
    context: &'a Context,
    function: Function,
}

impl<'a> InstructionVerifier<'a> {
    fn verify_instruction(&self, instruction: &Instruction) -> Result<(), IrError> {
        match instruction {
            Instruction::Call {
                callee,
                substitutions,
                args,
                ..
            } => self.verify_call(callee, substitutions, args),
            Instruction::ElemAddr {
                base,
                index,
                elem_ptr_ty,
            } => self.verify_elem_addr(base, *index, elem_ptr_ty),
            Instruction::GetLocal(_) => Ok(()),
            Instruction::Load(ptr) => self.verify_load(ptr),
            Instruction::RefElemAddr { base, .. } => self.verify_ref_elem_addr(base),
            Instruction::Release(val) | Instruction::Retain(val) => self.verify_ref_count(val),
            Instruction::Ret(val, ty) => self.verify_ret(val, ty),
            Instruction::Store {
                dst_val_ptr,
                stored_val,
            } => self.verify_store(dst_val_ptr, stored_val),
        }
    }

    fn type_of(&self, value: &Value) -> Result<Type, IrError> {
        value
            .get_type(self.context)
            .ok_or(IrError::VerifyUntypedValue)
    }

    fn verify_call(
        &self,
        callee: &Function,
        substitutions: &[Type],
        args: &[Value],
    ) -> Result<(), IrError> {
        let name = callee.get_name(self.context).to_owned();
        let num_params = callee.num_args(self.context);
        if num_params != args.len() {
            return Err(IrError::VerifyCallArgCountMismatch(
                name,
                num_params,
                args.len(),
            ));
        }
        // Generic callees are declared against their first instantiation, so only monomorphic
        // calls can be checked argument by argument.
        if substitutions.is_empty() {
            for (idx, ((_, param), arg)) in callee.args_iter(self.context).zip(args).enumerate() {
                let param_ty = self.type_of(param)?;
                let arg_ty = self.type_of(arg)?;
                if param_ty != arg_ty {
                    return Err(IrError::VerifyCallArgTypeMismatch(
                        name,
                        idx,
                        param_ty.as_string(self.context),
                        arg_ty.as_string(self.context),
                    ));
                }
            }
        }
        Ok(())
    }

    fn verify_elem_addr(
        &self,
        base: &Value,
        index: u64,
        elem_ptr_ty: &Type,
    ) -> Result<(), IrError> {
        let base_ty = self.type_of(base)?;
        let Some(aggregate_ty) = base_ty.get_pointee_type(self.context) else {
            return Err(IrError::VerifyElemAddrFromNonPointer(
                base_ty.as_string(self.context),
            ));
        };
        let Some(num_fields) = aggregate_ty.num_fields(self.context) else {
            return Err(IrError::VerifyElemAddrOnNonAggregate(
                aggregate_ty.as_string(self.context),
            ));
        };
        let field_ty = aggregate_ty
            .get_field_type(self.context, index)
            .ok_or_else(|| {
                IrError::VerifyElemAddrIndexOutOfRange(
                    index,
                    format!("{} ({num_fields} fields)", aggregate_ty.as_string(self.context)),
                )
            })?;
        if elem_ptr_ty.get_pointee_type(self.context) != Some(field_ty) {
            return Err(IrError::VerifyElemAddrInconsistentTypes(
                field_ty.as_string(self.context),
                elem_ptr_ty.as_string(self.context),
            ));
        }
        Ok(())
    }

    fn verify_load(&self, ptr: &Value) -> Result<(), IrError> {
        let ptr_ty = self.type_of(ptr)?;
        if !ptr_ty.is_ptr(self.context) {
            return Err(IrError::VerifyLoadFromNonPointer(
                ptr_ty.as_string(self.context),
            ));
        }
        Ok(())
    }

    fn verify_ref_elem_addr(&self, base: &Value) -> Result<(), IrError> {
        let base_ty = self.type_of(base)?;
        if !base_ty.has_reference_semantics(self.context) {
            return Err(IrError::VerifyRefElemAddrFromNonReference(
                base_ty.as_string(self.context),
            ));
        }
        Ok(())
    }

    fn verify_ref_count(&self, val: &Value) -> Result<(), IrError> {
        let ty = self.type_of(val)?;
        if !ty.has_reference_semantics(self.context) {
            return Err(IrError::VerifyRefCountOfNonReference(
                ty.as_string(self.context),
            ));
        }
        Ok(())
    }

    fn verify_ret(&self, val: &Value, ty: &Type) -> Result<(), IrError> {
        let fn_ret_ty = self.function.get_return_type(self.context);
        let val_ty = self.type_of(val)?;
        if fn_ret_ty != *ty || val_ty != *ty {
            return Err(IrError::VerifyReturnMismatchedTypes(
                val_ty.as_string(self.context),
                fn_ret_ty.as_string(self.context),
            ));
        }
        Ok(())
    }

    fn verify_store(&self, dst_val_ptr: &Value, stored_val: &Value) -> Result<(), IrError> {
        let dst_ty = self.type_of(dst_val_ptr)?;
        let Some(pointee_ty) = dst_ty.get_pointee_type(self.context) else {
            return Err(IrError::VerifyStoreToNonPointer(
                dst_ty.as_string(self.context),
            ));
        };
        let stored_ty = self.type_of(stored_val)?;
        if pointee_ty != stored_ty {
            return Err(IrError::VerifyStoreMismatchedTypes(
                pointee_ty.as_string(self.context),
                stored_ty.as_string(self.context),
            ));
        }
        Ok(())
    }
}
