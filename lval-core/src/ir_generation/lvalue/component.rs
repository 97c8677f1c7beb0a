use lval_error::error::CompileError;
use lval_ir::{Block, Context, Type, Value};
use lval_types::{Ident, Span};

use super::AccessorLocation;

/// One link of an [LValue](super::LValue).
#[derive(Debug)]
pub enum PathComponent<'a> {
    Physical(PhysicalComponent),
    Logical(AccessorLocation<'a>),
}

impl<'a> PathComponent<'a> {
    pub fn is_physical(&self) -> bool {
        matches!(self, PathComponent::Physical(_))
    }

    pub fn is_logical(&self) -> bool {
        matches!(self, PathComponent::Logical(_))
    }

    pub fn as_physical(&self) -> Option<&PhysicalComponent> {
        match self {
            PathComponent::Physical(physical) => Some(physical),
            PathComponent::Logical(_) => None,
        }
    }

    pub fn as_logical(&self) -> Option<&AccessorLocation<'a>> {
        match self {
            PathComponent::Physical(_) => None,
            PathComponent::Logical(accessor) => Some(accessor),
        }
    }

    pub fn object_type(&self) -> Type {
        match self {
            PathComponent::Physical(physical) => physical.object_type(),
            PathComponent::Logical(accessor) => accessor.object_type(),
        }
    }
}

/// A component which computes an address, or a reference, from its base without side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhysicalComponent {
    DirectAddress(DirectAddress),
    BareReference(BareReference),
    ReferenceField(ReferenceField),
    ValueField(ValueField),
}

impl PhysicalComponent {
    /// Root components start a path and take no base.
    pub fn is_root(&self) -> bool {
        matches!(
            self,
            PhysicalComponent::DirectAddress(_) | PhysicalComponent::BareReference(_)
        )
    }

    /// The lowered type of the storage this component denotes.
    pub fn object_type(&self) -> Type {
        match self {
            PhysicalComponent::DirectAddress(direct) => direct.object_type,
            PhysicalComponent::BareReference(reference) => reference.object_type,
            PhysicalComponent::ReferenceField(field) => field.object_type,
            PhysicalComponent::ValueField(field) => field.object_type,
        }
    }

    /// Compute this component's address, appending any instructions to `block`.
    ///
    /// `base` must be present exactly when this is not a root component.
    pub fn offset(
        &self,
        context: &mut Context,
        block: Block,
        base: Option<Value>,
        span: &Span,
    ) -> Result<Value, CompileError> {
        match (self, base) {
            (PhysicalComponent::DirectAddress(direct), None) => Ok(direct.address),
            (PhysicalComponent::BareReference(reference), None) => Ok(reference.value),
            (PhysicalComponent::ReferenceField(field), Some(base)) => {
                field.offset(context, block, base, span)
            }
            (PhysicalComponent::ValueField(field), Some(base)) => {
                field.offset(context, block, base, span)
            }
            (
                PhysicalComponent::DirectAddress(_) | PhysicalComponent::BareReference(_),
                Some(_),
            ) => Err(CompileError::Internal(
                "Root lvalue component must not have a base.",
                span.clone(),
            )),
            (PhysicalComponent::ReferenceField(_) | PhysicalComponent::ValueField(_), None) => {
                Err(CompileError::Internal(
                    "Non-root lvalue component must have a base.",
                    span.clone(),
                ))
            }
        }
    }
}

/// A root holding an address which was computed up front.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectAddress {
    address: Value,
    object_type: Type,
}

impl DirectAddress {
    pub fn new(context: &Context, address: Value, span: &Span) -> Result<Self, CompileError> {
        let object_type = address
            .get_type(context)
            .and_then(|ty| ty.get_pointee_type(context))
            .ok_or_else(|| {
                CompileError::Internal(
                    "Direct address lvalue component must wrap an address.",
                    span.clone(),
                )
            })?;
        Ok(DirectAddress {
            address,
            object_type,
        })
    }

    pub fn address(&self) -> Value {
        self.address
    }
}

/// A root holding a reference, so fields of arbitrary reference-typed expressions can be
/// accessed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BareReference {
    value: Value,
    object_type: Type,
}

impl BareReference {
    pub fn new(context: &Context, value: Value, span: &Span) -> Result<Self, CompileError> {
        let object_type = value
            .get_type(context)
            .filter(|ty| ty.has_reference_semantics(context))
            .ok_or_else(|| {
                CompileError::Internal(
                    "Bare reference lvalue component must wrap a reference.",
                    span.clone(),
                )
            })?;
        Ok(BareReference { value, object_type })
    }

    pub fn value(&self) -> Value {
        self.value
    }
}

/// A stored field of a class instance, addressed through a reference to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceField {
    field: Ident,
    object_type: Type,
}

impl ReferenceField {
    pub fn new(field: Ident, object_type: Type) -> Self {
        ReferenceField { field, object_type }
    }

    pub fn field(&self) -> &Ident {
        &self.field
    }

    fn offset(
        &self,
        context: &mut Context,
        block: Block,
        base: Value,
        span: &Span,
    ) -> Result<Value, CompileError> {
        if base.is_ptr(context) || !base.has_reference_semantics(context) {
            return Err(CompileError::Internal(
                "Reference field base must be a reference, not an address.",
                span.clone(),
            ));
        }
        Ok(block
            .append(context)
            .ref_elem_addr(base, self.field.as_str(), self.object_type))
    }
}

/// An element of a value-type aggregate, addressed by its flat index in the lowered layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueField {
    index: u64,
    object_type: Type,
}

impl ValueField {
    pub fn new(index: u64, object_type: Type) -> Self {
        ValueField { index, object_type }
    }

    pub fn index(&self) -> u64 {
        self.index
    }

    fn offset(
        &self,
        context: &mut Context,
        block: Block,
        base: Value,
        span: &Span,
    ) -> Result<Value, CompileError> {
        if !base.is_ptr(context) || base.has_reference_semantics(context) {
            return Err(CompileError::Internal(
                "Value field base must be the address of an aggregate.",
                span.clone(),
            ));
        }
        Ok(block
            .append(context)
            .elem_addr(base, self.index, self.object_type))
    }
}

macro_rules! impl_from_physical {
    ($($variant:ident),*) => {
        $(
            impl From<$variant> for PhysicalComponent {
                fn from(component: $variant) -> Self {
                    PhysicalComponent::$variant(component)
                }
            }

            impl<'a> From<$variant> for PathComponent<'a> {
                fn from(component: $variant) -> Self {
                    PathComponent::Physical(PhysicalComponent::$variant(component))
                }
            }
        )*
    };
}
impl_from_physical!(DirectAddress, BareReference, ReferenceField, ValueField);

impl<'a> From<AccessorLocation<'a>> for PathComponent<'a> {
    fn from(accessor: AccessorLocation<'a>) -> Self {
        PathComponent::Logical(accessor)
    }
}
