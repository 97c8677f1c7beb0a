use lval_error::error::CompileError;
use lval_ir::{Constant, Context, Function, Module, Type};
use tracing::{debug, info};

use crate::{decl_engine::DeclId, language::ty::TyFunctionDecl, BuildConfig, Engines};

use super::{convert::convert_resolved_typeid, function::FnCompiler};

/// Lower the function behind `decl_id` into `module`.
///
/// Functions without a body become declarations.  Otherwise the body expressions are compiled
/// in order and the value of the last one is returned, unless the function returns unit.
pub fn compile_function(
    engines: &Engines,
    context: &mut Context,
    module: Module,
    decl_id: &DeclId<TyFunctionDecl>,
    config: &BuildConfig,
) -> Result<Function, CompileError> {
    let decl = engines.de().get_function(decl_id);
    let name = decl.name.as_str().to_owned();
    let (args, return_type) = lower_fn_signature(engines, context, &decl);

    let Some(body) = &decl.body else {
        return Ok(Function::new_declaration(
            context,
            module,
            name,
            args,
            return_type,
        ));
    };

    let function = Function::new(context, module, name, args, return_type);
    let mut compiler = FnCompiler::new(engines, context, module, function)?;
    for param in &decl.parameters {
        let param_name = engines.de().get_var(&param.var).name;
        let value = function
            .get_arg(context, param_name.as_str())
            .ok_or_else(|| {
                CompileError::InternalOwned(
                    format!("Missing argument '{param_name}' in '{}'.", decl.name),
                    decl.span.clone(),
                )
            })?;
        compiler.bind_argument(param.var, value);
    }
    for local in &decl.locals {
        compiler.declare_local(context, *local)?;
    }

    let mut last_value = None;
    for ast_expr in body {
        last_value = Some(compiler.compile_rvalue(context, ast_expr)?);
    }
    let ret_value = if return_type.is_unit(context) {
        Constant::get_unit(context)
    } else {
        last_value.ok_or_else(|| {
            CompileError::Internal(
                "Function with a non-unit return type has an empty body.",
                decl.span.clone(),
            )
        })?
    };
    compiler
        .current_block
        .append(context)
        .ret(ret_value, return_type);
    debug!(function = %decl.name, "compiled function");

    if config.verify_ir {
        context
            .verify()
            .map_err(|ir_error| CompileError::InternalOwned(ir_error.to_string(), decl.span))?;
    }
    if config.print_ir {
        info!("{}", context);
    }

    Ok(function)
}

/// The IR argument list and return type of a function.  Inout parameters are passed by address.
pub(super) fn lower_fn_signature(
    engines: &Engines,
    context: &mut Context,
    decl: &TyFunctionDecl,
) -> (Vec<(String, Type)>, Type) {
    let args = decl
        .parameters
        .iter()
        .map(|param| {
            let var = engines.de().get_var(&param.var);
            let ty = convert_resolved_typeid(engines, context, var.type_id);
            let ty = if param.is_inout {
                Type::new_ptr(context, ty)
            } else {
                ty
            };
            (var.name.as_str().to_owned(), ty)
        })
        .collect();
    let return_type = convert_resolved_typeid(engines, context, decl.return_type);
    (args, return_type)
}
