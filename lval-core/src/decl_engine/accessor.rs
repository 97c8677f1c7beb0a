use crate::{
    decl_engine::{DeclEngine, DeclId},
    language::ty::{TySubscriptDecl, TyVarDecl, VarStorage},
};

/// A declaration which is read and written through accessor functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessorOwner {
    /// A computed property, either free standing or a member.
    Var(DeclId<TyVarDecl>),
    Subscript(DeclId<TySubscriptDecl>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessorKind {
    Getter,
    Setter,
}

/// A reference to one accessor function of an [AccessorOwner].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccessorRef {
    pub owner: AccessorOwner,
    pub kind: AccessorKind,
}

impl AccessorOwner {
    pub fn is_settable(&self, decl_engine: &DeclEngine) -> bool {
        match self {
            AccessorOwner::Var(var) => matches!(
                decl_engine.get_var(var).storage,
                VarStorage::Computed { settable: true }
            ),
            AccessorOwner::Subscript(subscript) => decl_engine.get_subscript(subscript).settable,
        }
    }

    // The declaration id keeps apart the symbols of declarations sharing a name.
    fn symbol(&self, decl_engine: &DeclEngine) -> String {
        match self {
            AccessorOwner::Var(var) => {
                format!("{}_{}", decl_engine.get_var(var).name, var.inner())
            }
            AccessorOwner::Subscript(subscript) => format!(
                "{}_subscript_{}",
                decl_engine.get_subscript(subscript).name,
                subscript.inner()
            ),
        }
    }
}

impl AccessorRef {
    pub fn getter(owner: AccessorOwner) -> AccessorRef {
        AccessorRef {
            owner,
            kind: AccessorKind::Getter,
        }
    }

    /// The setter of `owner`, or `None` if it is read-only.
    pub fn setter(decl_engine: &DeclEngine, owner: AccessorOwner) -> Option<AccessorRef> {
        owner.is_settable(decl_engine).then_some(AccessorRef {
            owner,
            kind: AccessorKind::Setter,
        })
    }

    /// The name of the function implementing this accessor, e.g. `count_3.get`.  Distinct
    /// declarations never share a name.
    pub fn function_name(&self, decl_engine: &DeclEngine) -> String {
        let suffix = match self.kind {
            AccessorKind::Getter => "get",
            AccessorKind::Setter => "set",
        };
        format!("{}.{suffix}", self.owner.symbol(decl_engine))
    }
}
