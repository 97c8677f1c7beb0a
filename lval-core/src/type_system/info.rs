use lval_types::{integer_bits::IntegerBits, Ident};

use crate::{
    decl_engine::DeclId,
    language::ty::{TyClassDecl, TyStructDecl},
    type_system::TypeId,
};

/// The surface types seen by lowering.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeInfo {
    Unit,
    Boolean,
    UnsignedInteger(IntegerBits),
    /// A value-type aggregate, stored inline.
    Struct(DeclId<TyStructDecl>),
    /// A class instance, held through an ownership-counted reference.
    Class(DeclId<TyClassDecl>),
    Tuple(Vec<TypeId>),
    /// A generic type parameter.  Its layout is unknown so values of it are address-only.
    Archetype(Ident),
    /// The type of an assignable expression which denotes storage of the inner type.
    LValue(TypeId),
}

impl TypeInfo {
    pub fn is_lvalue(&self) -> bool {
        matches!(self, TypeInfo::LValue(_))
    }

    /// Only class instances have reference semantics; an lvalue of a class type is storage
    /// holding a reference, not a reference itself.
    pub fn has_reference_semantics(&self) -> bool {
        matches!(self, TypeInfo::Class(_))
    }
}
