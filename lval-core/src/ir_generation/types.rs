use lval_error::error::CompileError;
use lval_ir::{Context, Type};
use lval_types::Span;

use crate::{
    decl_engine::DeclId,
    language::ty::{TyStructDecl, TyVarDecl},
    type_system::{TypeId, TypeInfo},
    Engines,
};

use super::convert::convert_resolved_typeid;

/// How values of a surface type are represented once lowered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TypeLowering {
    pub(crate) ir_type: Type,
    /// Values of the type have no known layout and can only be manipulated in memory.
    pub(crate) is_address_only: bool,
    pub(crate) has_reference_semantics: bool,
}

impl TypeLowering {
    pub(crate) fn is_loadable(&self) -> bool {
        !self.is_address_only
    }
}

pub(crate) fn get_type_lowering(
    engines: &Engines,
    context: &mut Context,
    type_id: TypeId,
) -> TypeLowering {
    let type_id = engines.te().get_rvalue_type(type_id);
    TypeLowering {
        ir_type: convert_resolved_typeid(engines, context, type_id),
        is_address_only: is_address_only(engines, type_id),
        has_reference_semantics: engines.te().has_reference_semantics(type_id),
    }
}

fn is_address_only(engines: &Engines, type_id: TypeId) -> bool {
    match engines.te().get(type_id) {
        TypeInfo::Archetype(_) => true,
        TypeInfo::Tuple(fields) => fields.iter().any(|ty| is_address_only(engines, *ty)),
        TypeInfo::Struct(decl_id) => stored_member_types(engines, &decl_id)
            .into_iter()
            .any(|ty| is_address_only(engines, ty)),
        TypeInfo::LValue(inner) => is_address_only(engines, inner),
        TypeInfo::Unit
        | TypeInfo::Boolean
        | TypeInfo::UnsignedInteger(_)
        | TypeInfo::Class(_) => false,
    }
}

fn stored_member_types(engines: &Engines, decl_id: &DeclId<TyStructDecl>) -> Vec<TypeId> {
    engines
        .de()
        .get_struct(decl_id)
        .members
        .iter()
        .map(|member| engines.de().get_var(member))
        .filter(|member| member.is_stored())
        .map(|member| member.type_id)
        .collect()
}

pub(super) fn create_struct_aggregate(
    engines: &Engines,
    context: &mut Context,
    decl_id: &DeclId<TyStructDecl>,
) -> Type {
    let field_types = stored_member_types(engines, decl_id)
        .into_iter()
        .map(|ty| convert_resolved_typeid(engines, context, ty))
        .collect();
    Type::new_struct(context, field_types)
}

pub(super) fn create_tuple_aggregate(
    engines: &Engines,
    context: &mut Context,
    fields: &[TypeId],
) -> Type {
    let field_types = fields
        .iter()
        .map(|ty| convert_resolved_typeid(engines, context, *ty))
        .collect();
    Type::new_struct(context, field_types)
}

/// The flat index of `field` in the lowered layout of `struct_decl`.  Computed members take no
/// storage, so they are skipped when counting.
pub(crate) fn get_struct_field_index(
    engines: &Engines,
    struct_decl: &DeclId<TyStructDecl>,
    field: &DeclId<TyVarDecl>,
    span: &Span,
) -> Result<u64, CompileError> {
    let decl = engines.de().get_struct(struct_decl);
    decl.members
        .iter()
        .filter(|member| engines.de().get_var(member).is_stored())
        .position(|member| member == field)
        .map(|idx| idx as u64)
        .ok_or_else(|| {
            CompileError::InternalOwned(
                format!(
                    "Unknown stored field '{}' for struct '{}'.",
                    engines.de().get_var(field).name,
                    decl.name
                ),
                span.clone(),
            )
        })
}
