use lval_types::{Ident, Span, Spanned};

use crate::{decl_engine::DeclId, language::ty::TyExpression, type_system::TypeId};

/// How a variable or property holds its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarStorage {
    /// Backed by storage: a local, a parameter, or a field of its aggregate.
    Stored,
    /// Implemented by a getter and, when `settable`, a setter.
    Computed { settable: bool },
}

/// A local variable, function parameter, struct/class field or computed property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TyVarDecl {
    pub name: Ident,
    pub type_id: TypeId,
    pub storage: VarStorage,
    pub span: Span,
}

impl TyVarDecl {
    pub fn is_stored(&self) -> bool {
        matches!(self.storage, VarStorage::Stored)
    }
}

/// A value-type aggregate.  Only the stored members occupy space in its layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TyStructDecl {
    pub name: Ident,
    pub members: Vec<DeclId<TyVarDecl>>,
    pub span: Span,
}

/// A reference-counted class.  Its stored members are addressed by name through a reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TyClassDecl {
    pub name: Ident,
    pub members: Vec<DeclId<TyVarDecl>>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TySubscriptDecl {
    pub name: Ident,
    pub index_type: TypeId,
    pub element_type: TypeId,
    pub settable: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TyFunctionParameter {
    pub var: DeclId<TyVarDecl>,
    /// Passed by address so the callee may write through it.
    pub is_inout: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TyFunctionDecl {
    pub name: Ident,
    pub parameters: Vec<TyFunctionParameter>,
    pub return_type: TypeId,
    /// Locals declared anywhere in the body.
    pub locals: Vec<DeclId<TyVarDecl>>,
    /// `None` for functions defined elsewhere, which lower to declarations.
    pub body: Option<Vec<TyExpression>>,
    pub span: Span,
}

macro_rules! impl_spanned {
    ($($decl:ty),*) => {
        $(
            impl Spanned for $decl {
                fn span(&self) -> Span {
                    self.span.clone()
                }
            }
        )*
    };
}
impl_spanned!(TyVarDecl, TyStructDecl, TyClassDecl, TySubscriptDecl, TyFunctionDecl);
