use lval_types::{Span, Spanned};
use strum::IntoStaticStr;

use crate::{
    decl_engine::DeclId,
    language::{
        ty::{TyFunctionDecl, TySubscriptDecl, TyVarDecl},
        Literal,
    },
    type_system::{Substitution, TypeId},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TyExpression {
    pub expression: TyExpressionVariant,
    pub return_type: TypeId,
    pub span: Span,
}

impl TyExpression {
    pub fn new(expression: TyExpressionVariant, return_type: TypeId, span: Span) -> TyExpression {
        TyExpression {
            expression,
            return_type,
            span,
        }
    }
}

impl Spanned for TyExpression {
    fn span(&self) -> Span {
        self.span.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, IntoStaticStr)]
pub enum TyExpressionVariant {
    Literal(Literal),
    /// A reference to a variable or property declaration.  Stored declarations have an lvalue
    /// type, by-value parameters have the plain type of their value.
    DeclRef(DeclId<TyVarDecl>),
    /// Evaluate the inner rvalue into fresh temporary storage.
    Materialize(Box<TyExpression>),
    /// Evaluate `lhs` for its side effects only, then `rhs`.  Used when a member is reached
    /// through a base which does not participate in the access, e.g. a static property.
    DotSyntaxBaseIgnored {
        lhs: Box<TyExpression>,
        rhs: Box<TyExpression>,
    },
    /// Member access.  `substitutions` is empty unless the member is accessed generically.
    MemberRef {
        base: Box<TyExpression>,
        member: DeclId<TyVarDecl>,
        substitutions: Vec<Substitution>,
    },
    Subscript {
        base: Box<TyExpression>,
        decl: DeclId<TySubscriptDecl>,
        index: Box<TyExpression>,
        substitutions: Vec<Substitution>,
    },
    TupleElement {
        base: Box<TyExpression>,
        index: usize,
    },
    AddressOf(Box<TyExpression>),
    Paren(Box<TyExpression>),
    /// A qualification conversion of an lvalue.
    Requalify(Box<TyExpression>),
    FunctionApplication {
        decl: DeclId<TyFunctionDecl>,
        arguments: Vec<TyExpression>,
    },
    /// Read the value out of an lvalue.
    Load(Box<TyExpression>),
    Assign {
        dest: Box<TyExpression>,
        source: Box<TyExpression>,
    },
}

impl TyExpressionVariant {
    /// The name of the variant, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        self.into()
    }
}
