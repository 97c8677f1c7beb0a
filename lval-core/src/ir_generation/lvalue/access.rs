use lval_error::error::CompileError;
use lval_ir::{Context, Value};
use lval_types::Span;
use tracing::trace;

use crate::ir_generation::{cleanup::ManagedValue, function::FnCompiler};

use super::{AccessorLocation, LValue, PathComponent};

/// A logical component which was read part way along a store walk, and the temporary its value
/// was materialized into.
struct WriteBack<'a> {
    accessor: AccessorLocation<'a>,
    base: Option<Value>,
    temporary: Value,
}

impl<'eng> FnCompiler<'eng> {
    /// Read the value at `lvalue`.
    pub(crate) fn emit_load_from_lvalue(
        &mut self,
        context: &mut Context,
        lvalue: LValue<'_>,
        span: &Span,
    ) -> Result<ManagedValue, CompileError> {
        let mut components = lvalue.into_components();
        let terminal = components.pop().ok_or_else(|| empty_lvalue(span))?;
        let mut base = None;
        for component in &components {
            base = Some(self.emit_component_base(context, component, base, span)?);
        }
        match terminal {
            PathComponent::Physical(physical) => {
                let value = physical.offset(context, self.current_block, base, span)?;
                // A bare reference at the end of the path is its own value.
                if value.is_ptr(context) {
                    Ok(ManagedValue::unmanaged(
                        self.current_block.append(context).load(value),
                    ))
                } else {
                    Ok(ManagedValue::unmanaged(value))
                }
            }
            PathComponent::Logical(accessor) => {
                self.load_and_materialize(context, &accessor, base, span)
            }
        }
    }

    /// Write `value` to `lvalue`.
    ///
    /// Accessor components before the terminal one are read into temporaries on the way in, and
    /// each temporary is written back through its setter afterwards, innermost first.
    pub(crate) fn emit_assign_to_lvalue(
        &mut self,
        context: &mut Context,
        lvalue: LValue<'_>,
        value: Value,
        span: &Span,
    ) -> Result<(), CompileError> {
        let mut components = lvalue.into_components();
        let terminal = components.pop().ok_or_else(|| empty_lvalue(span))?;
        let mut write_backs = Vec::new();
        let mut base = None;
        for component in components {
            let next = self.emit_component_base(context, &component, base, span)?;
            if let PathComponent::Logical(accessor) = component {
                // Mutating through a reference needs no write-back.
                if next.is_ptr(context) {
                    write_backs.push(WriteBack {
                        accessor,
                        base,
                        temporary: next,
                    });
                }
            }
            base = Some(next);
        }

        match terminal {
            PathComponent::Physical(physical) => {
                let address = physical.offset(context, self.current_block, base, span)?;
                if !address.is_ptr(context) {
                    return Err(CompileError::Internal(
                        "Cannot store to a bare reference.",
                        span.clone(),
                    ));
                }
                self.current_block.append(context).store(address, value);
            }
            PathComponent::Logical(accessor) => {
                self.store_rvalue(context, &accessor, value, base, span)?;
            }
        }

        for write_back in write_backs.into_iter().rev() {
            trace!(
                setter = %write_back.accessor.setter().function_name(self.engines.de()),
                "writing back accessor temporary"
            );
            let updated = self
                .current_block
                .append(context)
                .load(write_back.temporary);
            self.store_rvalue(
                context,
                &write_back.accessor,
                updated,
                write_back.base,
                span,
            )?;
        }
        Ok(())
    }

    /// The address denoted by a path of physical components.
    pub(crate) fn emit_address_of_lvalue(
        &mut self,
        context: &mut Context,
        lvalue: LValue<'_>,
        span: &Span,
    ) -> Result<Value, CompileError> {
        if lvalue.is_empty() {
            return Err(empty_lvalue(span));
        }
        let mut base = None;
        for component in lvalue.components() {
            let PathComponent::Physical(physical) = component else {
                return Err(CompileError::Unimplemented(
                    "Taking the address of a location reached through accessors.",
                    span.clone(),
                ));
            };
            base = Some(physical.offset(context, self.current_block, base, span)?);
        }
        match base {
            Some(address) if address.is_ptr(context) => Ok(address),
            _ => Err(CompileError::Internal(
                "Cannot take the address of a bare reference.",
                span.clone(),
            )),
        }
    }

    // The base a non-terminal component hands to the next one.  An accessor value is moved into
    // a temporary so the components after it have an address to work from, unless it is a
    // reference.
    fn emit_component_base(
        &mut self,
        context: &mut Context,
        component: &PathComponent<'_>,
        base: Option<Value>,
        span: &Span,
    ) -> Result<Value, CompileError> {
        match component {
            PathComponent::Physical(physical) => {
                physical.offset(context, self.current_block, base, span)
            }
            PathComponent::Logical(accessor) => {
                let value = self
                    .load_and_materialize(context, accessor, base, span)?
                    .value();
                if value.has_reference_semantics(context) {
                    Ok(value)
                } else {
                    self.emit_materialize_value(context, value, span)
                }
            }
        }
    }
}

fn empty_lvalue(span: &Span) -> CompileError {
    CompileError::Internal("Lvalue has no path components.", span.clone())
}
