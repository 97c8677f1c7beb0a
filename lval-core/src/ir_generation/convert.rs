use lval_ir::{Constant, Context, Type, Value};

use crate::{
    language::Literal,
    type_system::{TypeId, TypeInfo},
    Engines,
};

use super::types::{create_struct_aggregate, create_tuple_aggregate};

pub(super) fn convert_literal_to_value(context: &mut Context, ast_literal: &Literal) -> Value {
    match ast_literal {
        Literal::Unit => Constant::get_unit(context),
        Literal::Boolean(b) => Constant::get_bool(context, *b),
        Literal::UnsignedInteger(bits, n) => Constant::get_uint(context, bits.width(), *n),
    }
}

/// Lower a surface type to its IR storage type.
///
/// An lvalue type lowers to the type of the storage it denotes; the address itself is a
/// pointer to that.
pub(crate) fn convert_resolved_typeid(
    engines: &Engines,
    context: &mut Context,
    type_id: TypeId,
) -> Type {
    match engines.te().get(type_id) {
        TypeInfo::Unit => Type::get_unit(context),
        TypeInfo::Boolean => Type::get_bool(context),
        TypeInfo::UnsignedInteger(bits) => Type::new_uint(context, bits.width()),
        TypeInfo::Struct(decl_id) => create_struct_aggregate(engines, context, &decl_id),
        TypeInfo::Class(decl_id) => {
            let name = engines.de().get_class(&decl_id).name;
            Type::new_reference(context, name.as_str())
        }
        TypeInfo::Tuple(fields) => create_tuple_aggregate(engines, context, &fields),
        TypeInfo::Archetype(name) => Type::new_opaque(context, name.as_str()),
        TypeInfo::LValue(inner) => convert_resolved_typeid(engines, context, inner),
    }
}
