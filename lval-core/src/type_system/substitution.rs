use lval_types::Ident;

use crate::type_system::TypeId;

/// A generic parameter of an accessed declaration bound to a concrete type at the access site.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Substitution {
    pub parameter: Ident,
    pub type_id: TypeId,
}

impl Substitution {
    pub fn new(parameter: Ident, type_id: TypeId) -> Substitution {
        Substitution { parameter, type_id }
    }
}
