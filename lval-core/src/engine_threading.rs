use crate::{decl_engine::DeclEngine, type_system::TypeEngine};

/// The engines threaded through every stage of lowering.
#[derive(Debug, Default)]
pub struct Engines {
    type_engine: TypeEngine,
    decl_engine: DeclEngine,
}

impl Engines {
    pub fn new(type_engine: TypeEngine, decl_engine: DeclEngine) -> Engines {
        Engines {
            type_engine,
            decl_engine,
        }
    }

    pub fn te(&self) -> &TypeEngine {
        &self.type_engine
    }

    pub fn de(&self) -> &DeclEngine {
        &self.decl_engine
    }
}
