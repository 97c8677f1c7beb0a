//! Each of the valid `Value` types.
//!
//! These are the *lowered* forms of surface types:
//! - [`TypeContent::Struct`] holds the flat storage layout of value-type aggregates and tuples.
//! - [`TypeContent::Reference`] is an ownership-counted reference to a class instance.  It is the
//!   only type with reference semantics.
//! - [`TypeContent::Opaque`] stands for a generic value whose layout is unknown; it can only be
//!   manipulated in memory.
//! - [`TypeContent::Pointer`] is an address of a value of its pointee type.

use crate::context::Context;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Type(pub slotmap::DefaultKey);

#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum TypeContent {
    Unit,
    Bool,
    Uint(u16),
    Struct(Vec<Type>),
    Reference(String),
    Opaque(String),
    Pointer(Type),
}

impl Type {
    fn get_or_create_unique_type(context: &mut Context, t: TypeContent) -> Type {
        // Trying to avoiding cloning t unless we're creating a new type.
        if let Some(ty) = context.type_map.get(&t).copied() {
            ty
        } else {
            let new_type = Type(context.types.insert(t.clone()));
            context.type_map.insert(t, new_type);
            new_type
        }
    }

    /// Get Type if it already exists.
    pub fn get_type(context: &Context, t: &TypeContent) -> Option<Type> {
        context.type_map.get(t).copied()
    }

    pub fn create_basic_types(context: &mut Context) {
        Self::get_or_create_unique_type(context, TypeContent::Unit);
        Self::get_or_create_unique_type(context, TypeContent::Bool);
        Self::get_or_create_unique_type(context, TypeContent::Uint(8));
        Self::get_or_create_unique_type(context, TypeContent::Uint(16));
        Self::get_or_create_unique_type(context, TypeContent::Uint(32));
        Self::get_or_create_unique_type(context, TypeContent::Uint(64));
    }

    /// Get the content for this [Type].
    pub fn get_content<'a>(&self, context: &'a Context) -> &'a TypeContent {
        &context.types[self.0]
    }

    /// Get unit type
    pub fn get_unit(context: &Context) -> Type {
        Self::get_type(context, &TypeContent::Unit).expect("create_basic_types not called")
    }

    /// Get bool type
    pub fn get_bool(context: &Context) -> Type {
        Self::get_type(context, &TypeContent::Bool).expect("create_basic_types not called")
    }

    /// New unsigned integer type
    pub fn new_uint(context: &mut Context, width: u16) -> Type {
        Self::get_or_create_unique_type(context, TypeContent::Uint(width))
    }

    /// Get u64 type
    pub fn get_uint64(context: &Context) -> Type {
        Self::get_type(context, &TypeContent::Uint(64)).expect("create_basic_types not called")
    }

    /// Get struct type
    pub fn new_struct(context: &mut Context, fields: Vec<Type>) -> Type {
        Self::get_or_create_unique_type(context, TypeContent::Struct(fields))
    }

    /// Get the type of a reference to an instance of the class `name`.
    pub fn new_reference(context: &mut Context, name: impl Into<String>) -> Type {
        Self::get_or_create_unique_type(context, TypeContent::Reference(name.into()))
    }

    /// Get the opaque type standing in for the generic parameter `name`.
    pub fn new_opaque(context: &mut Context, name: impl Into<String>) -> Type {
        Self::get_or_create_unique_type(context, TypeContent::Opaque(name.into()))
    }

    /// New pointer type
    pub fn new_ptr(context: &mut Context, to_ty: Type) -> Type {
        Self::get_or_create_unique_type(context, TypeContent::Pointer(to_ty))
    }

    /// Return a string representation of type, used for printing.
    pub fn as_string(&self, context: &Context) -> String {
        match self.get_content(context) {
            TypeContent::Unit => "()".into(),
            TypeContent::Bool => "bool".into(),
            TypeContent::Uint(nbits) => format!("u{nbits}"),
            TypeContent::Struct(fields) => format!(
                "{{ {} }}",
                fields
                    .iter()
                    .map(|ty| ty.as_string(context))
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            TypeContent::Reference(name) => format!("ref {name}"),
            TypeContent::Opaque(name) => format!("opaque {name}"),
            TypeContent::Pointer(ty) => format!("ptr {}", ty.as_string(context)),
        }
    }

    /// Is unit type
    pub fn is_unit(&self, context: &Context) -> bool {
        matches!(*self.get_content(context), TypeContent::Unit)
    }

    /// Is bool type
    pub fn is_bool(&self, context: &Context) -> bool {
        matches!(*self.get_content(context), TypeContent::Bool)
    }

    /// Is unsigned integer type
    pub fn is_uint(&self, context: &Context) -> bool {
        matches!(*self.get_content(context), TypeContent::Uint(_))
    }

    /// Is struct type
    pub fn is_struct(&self, context: &Context) -> bool {
        matches!(*self.get_content(context), TypeContent::Struct(_))
    }

    /// Is opaque type
    pub fn is_opaque(&self, context: &Context) -> bool {
        matches!(*self.get_content(context), TypeContent::Opaque(_))
    }

    /// Is this an address, i.e. a pointer to some other type.
    pub fn is_ptr(&self, context: &Context) -> bool {
        matches!(*self.get_content(context), TypeContent::Pointer(_))
    }

    /// Whether values of this type are ownership-counted references.
    pub fn has_reference_semantics(&self, context: &Context) -> bool {
        matches!(*self.get_content(context), TypeContent::Reference(_))
    }

    /// Get pointed to type iff self is a pointer.
    pub fn get_pointee_type(&self, context: &Context) -> Option<Type> {
        if let TypeContent::Pointer(to_ty) = self.get_content(context) {
            Some(*to_ty)
        } else {
            None
        }
    }

    /// Get the type of the `idx`th field iff self is a struct.
    pub fn get_field_type(&self, context: &Context, idx: u64) -> Option<Type> {
        if let TypeContent::Struct(fields) = self.get_content(context) {
            fields.get(idx as usize).copied()
        } else {
            None
        }
    }

    /// Get the number of fields iff self is a struct.
    pub fn num_fields(&self, context: &Context) -> Option<usize> {
        if let TypeContent::Struct(fields) = self.get_content(context) {
            Some(fields.len())
        } else {
            None
        }
    }
}
