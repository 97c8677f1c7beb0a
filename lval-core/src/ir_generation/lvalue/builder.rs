use lval_error::error::CompileError;
use lval_ir::Context;
use lval_types::Span;
use tracing::{debug, error};

use crate::{
    decl_engine::{AccessorOwner, AccessorRef, DeclId},
    ir_generation::{
        function::FnCompiler,
        types::{get_struct_field_index, get_type_lowering},
    },
    language::ty::{TyExpression, TyExpressionVariant, TyVarDecl, VarStorage},
    type_system::{Substitution, TypeId, TypeInfo},
};

use super::{AccessorLocation, BareReference, DirectAddress, LValue, ReferenceField, ValueField};

impl<'eng> FnCompiler<'eng> {
    /// Build the location of an assignable expression.  Sub-expressions are visited base first,
    /// each appending the component for its own layer.
    pub(crate) fn compile_lvalue<'a>(
        &mut self,
        context: &mut Context,
        ast_expr: &'a TyExpression,
    ) -> Result<LValue<'a>, CompileError> {
        let lvalue = self.compile_lvalue_rec(context, ast_expr)?;
        debug!(
            kind = ast_expr.expression.kind_name(),
            components = lvalue.len(),
            "built lvalue"
        );
        Ok(lvalue)
    }

    // Any expression of reference type can root a path, whether or not it denotes storage.
    fn compile_lvalue_rec<'a>(
        &mut self,
        context: &mut Context,
        ast_expr: &'a TyExpression,
    ) -> Result<LValue<'a>, CompileError> {
        if self.engines.te().has_reference_semantics(ast_expr.return_type) {
            let value = self.compile_rvalue(context, ast_expr)?;
            let mut lvalue = LValue::new();
            lvalue.add(BareReference::new(context, value, &ast_expr.span)?);
            return Ok(lvalue);
        }
        self.build_lvalue(context, ast_expr)
    }

    /// Dispatch on the kind of `ast_expr`, without first checking whether the expression as a
    /// whole is a reference.
    pub(crate) fn build_lvalue<'a>(
        &mut self,
        context: &mut Context,
        ast_expr: &'a TyExpression,
    ) -> Result<LValue<'a>, CompileError> {
        let span = &ast_expr.span;
        match &ast_expr.expression {
            TyExpressionVariant::DeclRef(var) => {
                let decl = self.engines.de().get_var(var);
                match decl.storage {
                    VarStorage::Computed { .. } => {
                        let accessor = self.property_accessor(
                            context,
                            var,
                            &[],
                            ast_expr.return_type,
                            span,
                        )?;
                        let mut lvalue = LValue::new();
                        lvalue.add(accessor);
                        Ok(lvalue)
                    }
                    VarStorage::Stored => {
                        let address = self.compile_rvalue(context, ast_expr)?;
                        if !address.is_ptr(context) {
                            return Err(CompileError::InternalOwned(
                                format!("Reference to '{}' is not an address.", decl.name),
                                span.clone(),
                            ));
                        }
                        let mut lvalue = LValue::new();
                        lvalue.add(DirectAddress::new(context, address, span)?);
                        Ok(lvalue)
                    }
                }
            }
            TyExpressionVariant::Materialize(inner) => {
                let address = self.compile_materialize(context, inner)?;
                let mut lvalue = LValue::new();
                lvalue.add(DirectAddress::new(context, address, span)?);
                Ok(lvalue)
            }
            TyExpressionVariant::DotSyntaxBaseIgnored { lhs, rhs } => {
                self.compile_expression(context, lhs)?;
                self.compile_lvalue_rec(context, rhs)
            }
            TyExpressionVariant::MemberRef {
                base,
                member,
                substitutions,
            } => {
                let mut lvalue = self.compile_lvalue_rec(context, base)?;
                let decl = self.engines.de().get_var(member);
                if !decl.is_stored() {
                    let accessor = self.property_accessor(
                        context,
                        member,
                        substitutions,
                        ast_expr.return_type,
                        span,
                    )?;
                    lvalue.add(accessor);
                    return Ok(lvalue);
                }

                let field = get_type_lowering(self.engines, context, ast_expr.return_type);
                if !field.is_loadable() {
                    return Err(CompileError::Unimplemented(
                        "Access to address-only stored properties.",
                        span.clone(),
                    ));
                }
                let base_type = self.engines.te().get_rvalue_type(base.return_type);
                match self.engines.te().get(base_type) {
                    TypeInfo::Class(_) => {
                        lvalue.add(ReferenceField::new(decl.name, field.ir_type));
                    }
                    TypeInfo::Struct(struct_decl) => {
                        let index =
                            get_struct_field_index(self.engines, &struct_decl, member, span)?;
                        lvalue.add(ValueField::new(index, field.ir_type));
                    }
                    _ => {
                        return Err(CompileError::Internal(
                            "Stored member access on a base which is not a struct or a class.",
                            span.clone(),
                        ))
                    }
                }
                Ok(lvalue)
            }
            TyExpressionVariant::Subscript {
                base,
                decl,
                index,
                substitutions,
            } => {
                let mut lvalue = self.compile_lvalue_rec(context, base)?;
                let owner = AccessorOwner::Subscript(*decl);
                let object_type =
                    get_type_lowering(self.engines, context, ast_expr.return_type).ir_type;
                lvalue.add(AccessorLocation::new(
                    Some(AccessorRef::getter(owner)),
                    AccessorRef::setter(self.engines.de(), owner),
                    substitutions,
                    Some(&**index),
                    object_type,
                    span,
                )?);
                Ok(lvalue)
            }
            TyExpressionVariant::TupleElement { base, index } => {
                let mut lvalue = self.compile_lvalue_rec(context, base)?;
                let element = get_type_lowering(self.engines, context, ast_expr.return_type);
                if !element.is_loadable() {
                    return Err(CompileError::Unimplemented(
                        "Access to address-only tuple elements.",
                        span.clone(),
                    ));
                }
                lvalue.add(ValueField::new(*index as u64, element.ir_type));
                Ok(lvalue)
            }
            TyExpressionVariant::AddressOf(inner) | TyExpressionVariant::Paren(inner) => {
                self.compile_lvalue_rec(context, inner)
            }
            TyExpressionVariant::Requalify(inner) => {
                if !self.engines.te().is_lvalue(ast_expr.return_type) {
                    return Err(CompileError::Internal(
                        "Qualification conversion of an lvalue must produce an lvalue type.",
                        span.clone(),
                    ));
                }
                self.compile_lvalue_rec(context, inner)
            }
            TyExpressionVariant::Literal(_)
            | TyExpressionVariant::FunctionApplication { .. }
            | TyExpressionVariant::Load(_)
            | TyExpressionVariant::Assign { .. } => {
                let kind = ast_expr.expression.kind_name();
                error!(?ast_expr, "unsupported lvalue expression `{kind}`");
                Err(CompileError::UnsupportedLValue {
                    kind,
                    span: span.clone(),
                })
            }
        }
    }

    fn property_accessor<'a>(
        &mut self,
        context: &mut Context,
        var: &DeclId<TyVarDecl>,
        substitutions: &'a [Substitution],
        type_id: TypeId,
        span: &Span,
    ) -> Result<AccessorLocation<'a>, CompileError> {
        let owner = AccessorOwner::Var(*var);
        let object_type = get_type_lowering(self.engines, context, type_id).ir_type;
        AccessorLocation::new(
            Some(AccessorRef::getter(owner)),
            AccessorRef::setter(self.engines.de(), owner),
            substitutions,
            None,
            object_type,
            span,
        )
    }
}

#[cfg(test)]
mod tests {
    use lval_ir::{Function, Instruction, Module, Type};
    use lval_types::{integer_bits::IntegerBits, Ident};

    use super::*;
    use crate::{
        decl_engine::{AccessorKind, DeclEngineInsert},
        ir_generation::lvalue::{PathComponent, PhysicalComponent},
        language::{
            ty::{TyClassDecl, TyStructDecl, TySubscriptDecl},
            Literal,
        },
        Engines,
    };

    struct Types {
        u64_ty: TypeId,
        point: TypeId,
        x: DeclId<TyVarDecl>,
        y: DeclId<TyVarDecl>,
        norm: DeclId<TyVarDecl>,
    }

    fn var(engines: &Engines, name: &str, type_id: TypeId, storage: VarStorage) -> DeclId<TyVarDecl> {
        engines.de().insert(TyVarDecl {
            name: Ident::new_no_span(name),
            type_id,
            storage,
            span: Span::dummy(),
        })
    }

    // struct Point { x: u64, norm: u64 { get set }, y: u64 }
    fn point_types(engines: &Engines) -> Types {
        let u64_ty = engines
            .te()
            .insert(TypeInfo::UnsignedInteger(IntegerBits::SixtyFour));
        let x = var(engines, "x", u64_ty, VarStorage::Stored);
        let norm = var(engines, "norm", u64_ty, VarStorage::Computed { settable: true });
        let y = var(engines, "y", u64_ty, VarStorage::Stored);
        let point_decl = engines.de().insert(TyStructDecl {
            name: Ident::new_no_span("Point"),
            members: vec![x, norm, y],
            span: Span::dummy(),
        });
        let point = engines.te().insert(TypeInfo::Struct(point_decl));
        Types {
            u64_ty,
            point,
            x,
            y,
            norm,
        }
    }

    fn expr(expression: TyExpressionVariant, return_type: TypeId) -> TyExpression {
        TyExpression::new(expression, return_type, Span::dummy())
    }

    fn setup<'eng>(
        engines: &'eng Engines,
        context: &mut Context,
    ) -> (FnCompiler<'eng>, Function) {
        let module = Module::new(context, "test");
        let unit = Type::get_unit(context);
        let function = Function::new(context, module, "f".to_owned(), vec![], unit);
        let compiler = FnCompiler::new(engines, context, module, function).unwrap();
        (compiler, function)
    }

    #[test]
    fn stored_field_of_local_struct() {
        let engines = Engines::default();
        let mut context = Context::new();
        let types = point_types(&engines);
        let (mut compiler, _) = setup(&engines, &mut context);
        let point_var = var(&engines, "point", types.point, VarStorage::Stored);
        compiler.declare_local(&mut context, point_var).unwrap();

        let lvalue_point = engines.te().insert_lvalue(types.point);
        let lvalue_u64 = engines.te().insert_lvalue(types.u64_ty);
        let point_y = expr(
            TyExpressionVariant::MemberRef {
                base: Box::new(expr(TyExpressionVariant::DeclRef(point_var), lvalue_point)),
                member: types.y,
                substitutions: vec![],
            },
            lvalue_u64,
        );
        let lvalue = compiler.compile_lvalue(&mut context, &point_y).unwrap();

        assert_eq!(lvalue.len(), 2);
        assert!(lvalue.is_physical());
        let components = lvalue.components();
        assert!(matches!(
            components[0],
            PathComponent::Physical(PhysicalComponent::DirectAddress(_))
        ));
        // The computed `norm` sits between `x` and `y` but takes no storage.
        let PathComponent::Physical(PhysicalComponent::ValueField(field)) = &components[1] else {
            panic!("expected a value field, found {:?}", components[1]);
        };
        assert_eq!(field.index(), 1);
        assert_eq!(lvalue.object_type(), Some(Type::get_uint64(&context)));

        let TypeInfo::Struct(point_decl) = engines.te().get(types.point) else {
            unreachable!()
        };
        let x_index =
            get_struct_field_index(&engines, &point_decl, &types.x, &Span::dummy()).unwrap();
        assert_eq!(x_index, 0);
    }

    #[test]
    fn computed_member_of_local_struct() {
        let engines = Engines::default();
        let mut context = Context::new();
        let types = point_types(&engines);
        let (mut compiler, _) = setup(&engines, &mut context);
        let point_var = var(&engines, "point", types.point, VarStorage::Stored);
        compiler.declare_local(&mut context, point_var).unwrap();

        let lvalue_point = engines.te().insert_lvalue(types.point);
        let lvalue_u64 = engines.te().insert_lvalue(types.u64_ty);
        let point_norm = expr(
            TyExpressionVariant::MemberRef {
                base: Box::new(expr(TyExpressionVariant::DeclRef(point_var), lvalue_point)),
                member: types.norm,
                substitutions: vec![],
            },
            lvalue_u64,
        );
        let lvalue = compiler.compile_lvalue(&mut context, &point_norm).unwrap();

        assert_eq!(lvalue.len(), 2);
        assert!(!lvalue.is_physical());
        let accessor = lvalue.components()[1].as_logical().unwrap();
        assert_eq!(accessor.getter().kind, AccessorKind::Getter);
        assert_eq!(accessor.setter().kind, AccessorKind::Setter);
        assert_eq!(accessor.getter().owner, AccessorOwner::Var(types.norm));
        assert!(accessor.index().is_none());
        assert!(accessor.substitutions().is_empty());
    }

    #[test]
    fn computed_global_is_a_single_logical_component() {
        let engines = Engines::default();
        let mut context = Context::new();
        let types = point_types(&engines);
        let (mut compiler, function) = setup(&engines, &mut context);
        let counter = var(
            &engines,
            "counter",
            types.u64_ty,
            VarStorage::Computed { settable: true },
        );

        let lvalue_u64 = engines.te().insert_lvalue(types.u64_ty);
        let counter_ref = expr(TyExpressionVariant::DeclRef(counter), lvalue_u64);
        let lvalue = compiler.compile_lvalue(&mut context, &counter_ref).unwrap();

        assert_eq!(lvalue.len(), 1);
        let accessor = lvalue.components()[0].as_logical().unwrap();
        assert_eq!(accessor.getter().owner, accessor.setter().owner);
        // Building the location calls nothing yet.
        let entry = function.get_entry_block(&context).unwrap();
        assert_eq!(entry.num_instructions(&context), 0);
    }

    #[test]
    fn read_only_property_is_rejected() {
        let engines = Engines::default();
        let mut context = Context::new();
        let types = point_types(&engines);
        let (mut compiler, _) = setup(&engines, &mut context);
        let len = var(
            &engines,
            "len",
            types.u64_ty,
            VarStorage::Computed { settable: false },
        );

        let len_ref = expr(TyExpressionVariant::DeclRef(len), types.u64_ty);
        assert!(matches!(
            compiler.compile_lvalue(&mut context, &len_ref),
            Err(CompileError::Internal(..))
        ));
    }

    #[test]
    fn class_field_through_bare_reference() {
        let engines = Engines::default();
        let mut context = Context::new();
        let types = point_types(&engines);
        let value = var(&engines, "value", types.u64_ty, VarStorage::Stored);
        let class_decl = engines.de().insert(TyClassDecl {
            name: Ident::new_no_span("Node"),
            members: vec![value],
            span: Span::dummy(),
        });
        let node = engines.te().insert(TypeInfo::Class(class_decl));

        let module = Module::new(&mut context, "test");
        let unit = Type::get_unit(&context);
        let node_ir = Type::new_reference(&mut context, "Node");
        let function = Function::new(
            &mut context,
            module,
            "f".to_owned(),
            vec![("n".to_owned(), node_ir)],
            unit,
        );
        let mut compiler = FnCompiler::new(&engines, &context, module, function).unwrap();
        let n = var(&engines, "n", node, VarStorage::Stored);
        let n_arg = function.get_arg(&context, "n").unwrap();
        compiler.bind_argument(n, n_arg);

        let lvalue_u64 = engines.te().insert_lvalue(types.u64_ty);
        let n_value = expr(
            TyExpressionVariant::MemberRef {
                base: Box::new(expr(TyExpressionVariant::DeclRef(n), node)),
                member: value,
                substitutions: vec![],
            },
            lvalue_u64,
        );
        let lvalue = compiler.compile_lvalue(&mut context, &n_value).unwrap();

        let components = lvalue.components();
        assert_eq!(components.len(), 2);
        let PathComponent::Physical(PhysicalComponent::BareReference(root)) = &components[0]
        else {
            panic!("expected a bare reference root, found {:?}", components[0]);
        };
        assert_eq!(root.value(), n_arg);
        let PathComponent::Physical(PhysicalComponent::ReferenceField(field)) = &components[1]
        else {
            panic!("expected a reference field, found {:?}", components[1]);
        };
        assert_eq!(field.field().as_str(), "value");
    }

    #[test]
    fn subscript_carries_its_index_and_substitutions() {
        let engines = Engines::default();
        let mut context = Context::new();
        let types = point_types(&engines);
        let element = engines
            .te()
            .insert(TypeInfo::Archetype(Ident::new_no_span("Element")));
        let items = engines.de().insert(TySubscriptDecl {
            name: Ident::new_no_span("items"),
            index_type: types.u64_ty,
            element_type: element,
            settable: true,
            span: Span::dummy(),
        });
        let list_decl = engines.de().insert(TyClassDecl {
            name: Ident::new_no_span("List"),
            members: vec![],
            span: Span::dummy(),
        });
        let list = engines.te().insert(TypeInfo::Class(list_decl));

        let module = Module::new(&mut context, "test");
        let unit = Type::get_unit(&context);
        let list_ir = Type::new_reference(&mut context, "List");
        let function = Function::new(
            &mut context,
            module,
            "f".to_owned(),
            vec![("l".to_owned(), list_ir)],
            unit,
        );
        let mut compiler = FnCompiler::new(&engines, &context, module, function).unwrap();
        let l = var(&engines, "l", list, VarStorage::Stored);
        compiler.bind_argument(l, function.get_arg(&context, "l").unwrap());

        let lvalue_u64 = engines.te().insert_lvalue(types.u64_ty);
        let subscript = expr(
            TyExpressionVariant::Subscript {
                base: Box::new(expr(TyExpressionVariant::DeclRef(l), list)),
                decl: items,
                index: Box::new(expr(
                    TyExpressionVariant::Literal(Literal::UnsignedInteger(
                        IntegerBits::SixtyFour,
                        3,
                    )),
                    types.u64_ty,
                )),
                substitutions: vec![Substitution::new(
                    Ident::new_no_span("Element"),
                    types.u64_ty,
                )],
            },
            lvalue_u64,
        );
        let lvalue = compiler.compile_lvalue(&mut context, &subscript).unwrap();

        assert_eq!(lvalue.len(), 2);
        assert!(lvalue.components()[0]
            .as_physical()
            .is_some_and(PhysicalComponent::is_root));
        let accessor = lvalue.components()[1].as_logical().unwrap();
        assert_eq!(accessor.getter().owner, AccessorOwner::Subscript(items));
        assert_eq!(accessor.substitutions().len(), 1);
        let TyExpressionVariant::Subscript { index, .. } = &subscript.expression else {
            unreachable!()
        };
        assert!(std::ptr::eq(accessor.index().unwrap(), &**index));
        // The index is only evaluated when an accessor is called.
        let entry = function.get_entry_block(&context).unwrap();
        assert_eq!(entry.num_instructions(&context), 0);
    }

    #[test]
    fn requalify_requires_an_lvalue_type() {
        let engines = Engines::default();
        let mut context = Context::new();
        let types = point_types(&engines);
        let (mut compiler, _) = setup(&engines, &mut context);
        let point_var = var(&engines, "point", types.point, VarStorage::Stored);
        compiler.declare_local(&mut context, point_var).unwrap();
        let lvalue_point = engines.te().insert_lvalue(types.point);
        let point_ref = || expr(TyExpressionVariant::DeclRef(point_var), lvalue_point);

        let good = expr(
            TyExpressionVariant::Requalify(Box::new(point_ref())),
            lvalue_point,
        );
        assert_eq!(compiler.compile_lvalue(&mut context, &good).unwrap().len(), 1);

        let bad = expr(
            TyExpressionVariant::Requalify(Box::new(point_ref())),
            types.point,
        );
        assert!(matches!(
            compiler.compile_lvalue(&mut context, &bad),
            Err(CompileError::Internal(..))
        ));
    }

    #[test]
    fn transparent_wrappers_and_materialize() {
        let engines = Engines::default();
        let mut context = Context::new();
        let types = point_types(&engines);
        let (mut compiler, function) = setup(&engines, &mut context);

        let seven = expr(
            TyExpressionVariant::Literal(Literal::UnsignedInteger(IntegerBits::SixtyFour, 7)),
            types.u64_ty,
        );
        let lvalue_u64 = engines.te().insert_lvalue(types.u64_ty);
        let wrapped = expr(
            TyExpressionVariant::Paren(Box::new(expr(
                TyExpressionVariant::AddressOf(Box::new(expr(
                    TyExpressionVariant::Materialize(Box::new(seven)),
                    lvalue_u64,
                ))),
                lvalue_u64,
            ))),
            lvalue_u64,
        );
        let lvalue = compiler.compile_lvalue(&mut context, &wrapped).unwrap();
        assert_eq!(lvalue.len(), 1);
        assert!(matches!(
            lvalue.components()[0],
            PathComponent::Physical(PhysicalComponent::DirectAddress(_))
        ));

        let entry = function.get_entry_block(&context).unwrap();
        let instructions = entry.instructions(&context);
        assert!(matches!(instructions[0], Instruction::GetLocal(_)));
        assert!(matches!(instructions[1], Instruction::Store { .. }));
        assert!(function.get_local_var(&context, "__tmp").is_some());
    }
}
