use itertools::Itertools;
use lval_error::error::CompileError;
use lval_ir::{Context, Function, Type, Value};
use lval_types::Span;
use tracing::trace;

use crate::{
    decl_engine::AccessorRef,
    ir_generation::{cleanup::ManagedValue, function::FnCompiler},
    language::ty::TyExpression,
    type_system::Substitution,
};

/// A property or subscript which is only reachable through its getter and setter.
///
/// The substitutions and the subscript index are borrowed from the expression tree being
/// lowered.
#[derive(Debug)]
pub struct AccessorLocation<'a> {
    getter: AccessorRef,
    setter: AccessorRef,
    substitutions: &'a [Substitution],
    index: Option<&'a TyExpression>,
    object_type: Type,
}

impl<'a> AccessorLocation<'a> {
    /// A location with no setter is read-only and cannot be represented here.
    pub fn new(
        getter: Option<AccessorRef>,
        setter: Option<AccessorRef>,
        substitutions: &'a [Substitution],
        index: Option<&'a TyExpression>,
        object_type: Type,
        span: &Span,
    ) -> Result<Self, CompileError> {
        let (Some(getter), Some(setter)) = (getter, setter) else {
            return Err(CompileError::Internal(
                "Settable lvalue must have both a getter and a setter.",
                span.clone(),
            ));
        };
        Ok(AccessorLocation {
            getter,
            setter,
            substitutions,
            index,
            object_type,
        })
    }

    pub fn getter(&self) -> AccessorRef {
        self.getter
    }

    pub fn setter(&self) -> AccessorRef {
        self.setter
    }

    pub fn substitutions(&self) -> &'a [Substitution] {
        self.substitutions
    }

    pub fn index(&self) -> Option<&'a TyExpression> {
        self.index
    }

    /// The lowered type of the value after substitution.
    pub fn object_type(&self) -> Type {
        self.object_type
    }
}

/// The leading arguments shared by the getter and setter calls, in call order.
struct AccessorArgs {
    base: Option<ManagedValue>,
    index: Option<Value>,
}

impl AccessorArgs {
    fn named_values(&self) -> Vec<(&'static str, Value)> {
        self.base
            .iter()
            .map(|base| ("self", base.value()))
            .chain(self.index.iter().map(|index| ("index", *index)))
            .collect()
    }
}

impl<'eng> FnCompiler<'eng> {
    /// Read the value of `accessor` through its getter.
    pub(crate) fn load_and_materialize(
        &mut self,
        context: &mut Context,
        accessor: &AccessorLocation<'_>,
        base: Option<Value>,
        span: &Span,
    ) -> Result<ManagedValue, CompileError> {
        self.compile_with_cleanup_scope(context, |fn_compiler, context| {
            let args = fn_compiler.prepare_accessor_args(context, accessor, base, span)?;
            let result = fn_compiler.emit_accessor_call(
                context,
                accessor.getter,
                accessor.substitutions,
                args.named_values(),
                accessor.object_type,
                span,
            )?;
            Ok(ManagedValue::unmanaged(result))
        })
    }

    /// Write `value` through the setter of `accessor`.
    pub(crate) fn store_rvalue(
        &mut self,
        context: &mut Context,
        accessor: &AccessorLocation<'_>,
        value: Value,
        base: Option<Value>,
        span: &Span,
    ) -> Result<(), CompileError> {
        self.compile_with_cleanup_scope(context, |fn_compiler, context| {
            let args = fn_compiler.prepare_accessor_args(context, accessor, base, span)?;
            let mut call_args = args.named_values();
            call_args.push(("value", value));
            let unit = Type::get_unit(context);
            fn_compiler.emit_accessor_call(
                context,
                accessor.setter,
                accessor.substitutions,
                call_args,
                unit,
                span,
            )?;
            Ok(())
        })
    }

    /// Marshal the base and the subscript index for an accessor call.
    ///
    /// An address base is passed in place.  A reference base is retained first and released
    /// when the enclosing cleanup scope ends, so evaluating the index cannot free it.  The index
    /// is evaluated after the base is secured, on every call.
    fn prepare_accessor_args(
        &mut self,
        context: &mut Context,
        accessor: &AccessorLocation<'_>,
        base: Option<Value>,
        span: &Span,
    ) -> Result<AccessorArgs, CompileError> {
        let base = match base {
            None => None,
            Some(base) => {
                match (base.is_ptr(context), base.has_reference_semantics(context)) {
                    (true, false) => Some(ManagedValue::for_lvalue(base)),
                    (false, true) => {
                        trace!("retaining accessor base");
                        self.current_block.append(context).retain(base);
                        let handle = self.cleanups.push_release(base);
                        Some(ManagedValue::owned(base, handle))
                    }
                    _ => {
                        return Err(CompileError::Internal(
                            "Accessor base must be either an address or a reference.",
                            span.clone(),
                        ))
                    }
                }
            }
        };
        let index = match accessor.index {
            Some(index) => Some(self.compile_rvalue(context, index)?),
            None => None,
        };
        Ok(AccessorArgs { base, index })
    }

    fn emit_accessor_call(
        &mut self,
        context: &mut Context,
        accessor: AccessorRef,
        substitutions: &[Substitution],
        args: Vec<(&'static str, Value)>,
        return_type: Type,
        span: &Span,
    ) -> Result<Value, CompileError> {
        let callee = self.get_or_declare_accessor(context, accessor, &args, return_type, span)?;
        let substitutions = self.lower_substitutions(context, substitutions);
        let arg_values = args.into_iter().map(|(_, value)| value).collect_vec();
        trace!(
            accessor = callee.get_name(context),
            args = arg_values.len(),
            "emitting accessor call"
        );
        Ok(self
            .current_block
            .append(context)
            .call(callee, substitutions, &arg_values, return_type))
    }

    // Accessors are defined elsewhere.  They are declared in the module on first use, with a
    // signature taken from the arguments of that use.
    fn get_or_declare_accessor(
        &mut self,
        context: &mut Context,
        accessor: AccessorRef,
        args: &[(&'static str, Value)],
        return_type: Type,
        span: &Span,
    ) -> Result<Function, CompileError> {
        let name = accessor.function_name(self.engines.de());
        if let Some(function) = self.module.get_function(context, &name) {
            return Ok(function);
        }
        let params = args
            .iter()
            .map(|(arg_name, value)| {
                value
                    .get_type(context)
                    .map(|ty| ((*arg_name).to_owned(), ty))
                    .ok_or_else(|| {
                        CompileError::Internal("Accessor argument has no type.", span.clone())
                    })
            })
            .collect::<Result<Vec<_>, CompileError>>()?;
        Ok(Function::new_declaration(
            context,
            self.module,
            name,
            params,
            return_type,
        ))
    }
}
