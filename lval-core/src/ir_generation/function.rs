use itertools::Itertools;
use lval_error::error::CompileError;
use lval_ir::{Block, Constant, Context, Function, LocalVar, Module, Type, Value};
use lval_types::Span;
use rustc_hash::FxHashMap;
use tracing::trace;

use crate::{
    decl_engine::DeclId,
    language::ty::{self, TyExpressionVariant, TyFunctionDecl, TyVarDecl, VarStorage},
    type_system::Substitution,
    Engines,
};

use super::{
    cleanup::{CleanupStack, ManagedValue},
    compile::lower_fn_signature,
    convert::{convert_literal_to_value, convert_resolved_typeid},
};

/// Lowers the expressions of one function body into its blocks.
pub(crate) struct FnCompiler<'eng> {
    pub(super) engines: &'eng Engines,
    pub(super) module: Module,
    pub(super) function: Function,
    pub(super) current_block: Block,
    locals: FxHashMap<DeclId<TyVarDecl>, LocalVar>,
    arguments: FxHashMap<DeclId<TyVarDecl>, Value>,
    pub(super) cleanups: CleanupStack,
}

impl<'eng> FnCompiler<'eng> {
    pub(crate) fn new(
        engines: &'eng Engines,
        context: &Context,
        module: Module,
        function: Function,
    ) -> Result<Self, CompileError> {
        let current_block = function.get_entry_block(context).ok_or_else(|| {
            CompileError::InternalOwned(
                format!(
                    "Cannot compile into function '{}' without an entry block.",
                    function.get_name(context)
                ),
                Span::dummy(),
            )
        })?;
        Ok(FnCompiler {
            engines,
            module,
            function,
            current_block,
            locals: FxHashMap::default(),
            arguments: FxHashMap::default(),
            cleanups: CleanupStack::default(),
        })
    }

    pub(crate) fn bind_argument(&mut self, var: DeclId<TyVarDecl>, value: Value) {
        self.arguments.insert(var, value);
    }

    /// Allocate function local storage for `var`.
    pub(crate) fn declare_local(
        &mut self,
        context: &mut Context,
        var: DeclId<TyVarDecl>,
    ) -> Result<LocalVar, CompileError> {
        let decl = self.engines.de().get_var(&var);
        let ty = convert_resolved_typeid(self.engines, context, decl.type_id);
        let local = self
            .function
            .new_local_var(context, decl.name.as_str().to_owned(), ty, true)
            .map_err(|ir_error| CompileError::InternalOwned(ir_error.to_string(), decl.span))?;
        self.locals.insert(var, local);
        Ok(local)
    }

    /// Run `inner` in a new cleanup scope.  Releases owed to the scope are emitted when it is
    /// left, whether `inner` succeeded or not.
    pub(super) fn compile_with_cleanup_scope<F, T>(
        &mut self,
        context: &mut Context,
        inner: F,
    ) -> Result<T, CompileError>
    where
        F: FnOnce(&mut FnCompiler<'eng>, &mut Context) -> Result<T, CompileError>,
    {
        let depth = self.cleanups.depth();
        let result = inner(self, context);
        for value in self.cleanups.pop_to(depth) {
            trace!("emitting scoped release");
            self.current_block.append(context).release(value);
        }
        result
    }

    pub(crate) fn compile_expression(
        &mut self,
        context: &mut Context,
        ast_expr: &ty::TyExpression,
    ) -> Result<ManagedValue, CompileError> {
        match &ast_expr.expression {
            TyExpressionVariant::Literal(l) => Ok(ManagedValue::unmanaged(
                convert_literal_to_value(context, l),
            )),
            TyExpressionVariant::DeclRef(var) => {
                match self.engines.de().get_var(var).storage {
                    VarStorage::Stored => self.compile_decl_ref(context, var, &ast_expr.span),
                    VarStorage::Computed { .. } => self.compile_load_via_lvalue(context, ast_expr),
                }
            }
            TyExpressionVariant::Materialize(inner) => self
                .compile_materialize(context, inner)
                .map(ManagedValue::unmanaged),
            TyExpressionVariant::DotSyntaxBaseIgnored { lhs, rhs } => {
                self.compile_expression(context, lhs)?;
                self.compile_expression(context, rhs)
            }
            TyExpressionVariant::MemberRef { .. }
            | TyExpressionVariant::Subscript { .. }
            | TyExpressionVariant::TupleElement { .. } => {
                self.compile_load_via_lvalue(context, ast_expr)
            }
            TyExpressionVariant::AddressOf(inner) => {
                let lvalue = self.compile_lvalue(context, inner)?;
                self.emit_address_of_lvalue(context, lvalue, &ast_expr.span)
                    .map(ManagedValue::for_lvalue)
            }
            TyExpressionVariant::Paren(inner) | TyExpressionVariant::Requalify(inner) => {
                self.compile_expression(context, inner)
            }
            TyExpressionVariant::FunctionApplication { decl, arguments } => {
                self.compile_fn_call(context, decl, arguments)
            }
            TyExpressionVariant::Load(inner) => {
                let lvalue = self.compile_lvalue(context, inner)?;
                self.emit_load_from_lvalue(context, lvalue, &ast_expr.span)
            }
            TyExpressionVariant::Assign { dest, source } => {
                self.compile_assignment(context, dest, source)
            }
        }
    }

    pub(super) fn compile_rvalue(
        &mut self,
        context: &mut Context,
        ast_expr: &ty::TyExpression,
    ) -> Result<Value, CompileError> {
        self.compile_expression(context, ast_expr)
            .map(|managed| managed.value())
    }

    // The expression is itself the access, so the location is built without first checking
    // whether the whole expression is a reference.
    fn compile_load_via_lvalue(
        &mut self,
        context: &mut Context,
        ast_expr: &ty::TyExpression,
    ) -> Result<ManagedValue, CompileError> {
        let lvalue = self.build_lvalue(context, ast_expr)?;
        self.emit_load_from_lvalue(context, lvalue, &ast_expr.span)
    }

    fn compile_decl_ref(
        &mut self,
        context: &mut Context,
        var: &DeclId<TyVarDecl>,
        span: &Span,
    ) -> Result<ManagedValue, CompileError> {
        // Locals first, they may shadow the arguments.
        if let Some(local) = self.locals.get(var).copied() {
            let ptr = self.current_block.append(context).get_local(local);
            Ok(ManagedValue::for_lvalue(ptr))
        } else if let Some(arg) = self.arguments.get(var).copied() {
            // Inout arguments are passed by address.
            Ok(if arg.is_ptr(context) {
                ManagedValue::for_lvalue(arg)
            } else {
                ManagedValue::unmanaged(arg)
            })
        } else {
            Err(CompileError::InternalOwned(
                format!(
                    "Unable to resolve variable '{}'.",
                    self.engines.de().get_var(var).name
                ),
                span.clone(),
            ))
        }
    }

    pub(super) fn compile_materialize(
        &mut self,
        context: &mut Context,
        inner: &ty::TyExpression,
    ) -> Result<Value, CompileError> {
        let value = self.compile_rvalue(context, inner)?;
        self.emit_materialize_value(context, value, &inner.span)
    }

    /// Store `value` into fresh temporary storage and return its address.
    pub(super) fn emit_materialize_value(
        &mut self,
        context: &mut Context,
        value: Value,
        span: &Span,
    ) -> Result<Value, CompileError> {
        let ty = value.get_type(context).ok_or_else(|| {
            CompileError::Internal("Cannot materialize an untyped value.", span.clone())
        })?;
        let temp = self
            .function
            .new_unique_local_var(context, "__tmp".to_owned(), ty, true);
        let addr = self.current_block.append(context).get_local(temp);
        self.current_block.append(context).store(addr, value);
        Ok(addr)
    }

    fn compile_fn_call(
        &mut self,
        context: &mut Context,
        decl_id: &DeclId<TyFunctionDecl>,
        ast_args: &[ty::TyExpression],
    ) -> Result<ManagedValue, CompileError> {
        // Arguments are evaluated left to right, before the callee is looked up.
        let args = ast_args
            .iter()
            .map(|arg| self.compile_rvalue(context, arg))
            .collect::<Result<Vec<_>, CompileError>>()?;
        let callee = self.get_or_declare_function(context, decl_id);
        let return_type = callee.get_return_type(context);
        let call = self
            .current_block
            .append(context)
            .call(callee, Vec::new(), &args, return_type);
        Ok(ManagedValue::unmanaged(call))
    }

    fn get_or_declare_function(
        &mut self,
        context: &mut Context,
        decl_id: &DeclId<TyFunctionDecl>,
    ) -> Function {
        let decl = self.engines.de().get_function(decl_id);
        match self.module.get_function(context, decl.name.as_str()) {
            Some(function) => function,
            None => {
                let (args, return_type) = lower_fn_signature(self.engines, context, &decl);
                Function::new_declaration(
                    context,
                    self.module,
                    decl.name.as_str().to_owned(),
                    args,
                    return_type,
                )
            }
        }
    }

    // The source is evaluated before any part of the destination.
    fn compile_assignment(
        &mut self,
        context: &mut Context,
        dest: &ty::TyExpression,
        source: &ty::TyExpression,
    ) -> Result<ManagedValue, CompileError> {
        let value = self.compile_rvalue(context, source)?;
        let lvalue = self.compile_lvalue(context, dest)?;
        self.emit_assign_to_lvalue(context, lvalue, value, &dest.span)?;
        Ok(ManagedValue::unmanaged(Constant::get_unit(context)))
    }

    /// The IR types of the substitutions at an access site.
    pub(super) fn lower_substitutions(
        &self,
        context: &mut Context,
        substitutions: &[Substitution],
    ) -> Vec<Type> {
        substitutions
            .iter()
            .map(|substitution| {
                convert_resolved_typeid(self.engines, context, substitution.type_id)
            })
            .collect_vec()
    }
}
