use crate::{
    concurrent_slab::ConcurrentSlab,
    decl_engine::DeclId,
    language::ty::{TyClassDecl, TyFunctionDecl, TyStructDecl, TySubscriptDecl, TyVarDecl},
};

/// Used inside of lowering to look up declarations.
#[derive(Debug, Default)]
pub struct DeclEngine {
    function_slab: ConcurrentSlab<TyFunctionDecl>,
    struct_slab: ConcurrentSlab<TyStructDecl>,
    class_slab: ConcurrentSlab<TyClassDecl>,
    var_slab: ConcurrentSlab<TyVarDecl>,
    subscript_slab: ConcurrentSlab<TySubscriptDecl>,
}

pub trait DeclEngineGet<I, U> {
    fn get(&self, index: &I) -> U;
}

pub trait DeclEngineInsert<T> {
    fn insert(&self, decl: T) -> DeclId<T>;
}

macro_rules! decl_engine_get {
    ($slab:ident, $decl:ty) => {
        impl DeclEngineGet<DeclId<$decl>, $decl> for DeclEngine {
            fn get(&self, index: &DeclId<$decl>) -> $decl {
                self.$slab.get(index.inner())
            }
        }
    };
}
decl_engine_get!(function_slab, TyFunctionDecl);
decl_engine_get!(struct_slab, TyStructDecl);
decl_engine_get!(class_slab, TyClassDecl);
decl_engine_get!(var_slab, TyVarDecl);
decl_engine_get!(subscript_slab, TySubscriptDecl);

macro_rules! decl_engine_insert {
    ($slab:ident, $decl:ty) => {
        impl DeclEngineInsert<$decl> for DeclEngine {
            fn insert(&self, decl: $decl) -> DeclId<$decl> {
                DeclId::new(self.$slab.insert(decl))
            }
        }
    };
}
decl_engine_insert!(function_slab, TyFunctionDecl);
decl_engine_insert!(struct_slab, TyStructDecl);
decl_engine_insert!(class_slab, TyClassDecl);
decl_engine_insert!(var_slab, TyVarDecl);
decl_engine_insert!(subscript_slab, TySubscriptDecl);

impl DeclEngine {
    /// Friendly helper method for calling the `get` method from the
    /// implementation of [DeclEngineGet] for [TyFunctionDecl]
    ///
    /// Calling `get` directly is equivalent to this method, but this method
    /// adds additional syntax that some users may find helpful.
    pub fn get_function(&self, index: &DeclId<TyFunctionDecl>) -> TyFunctionDecl {
        self.get(index)
    }

    /// Friendly helper method for calling the `get` method from the
    /// implementation of [DeclEngineGet] for [TyStructDecl]
    pub fn get_struct(&self, index: &DeclId<TyStructDecl>) -> TyStructDecl {
        self.get(index)
    }

    /// Friendly helper method for calling the `get` method from the
    /// implementation of [DeclEngineGet] for [TyClassDecl]
    pub fn get_class(&self, index: &DeclId<TyClassDecl>) -> TyClassDecl {
        self.get(index)
    }

    pub fn get_var(&self, index: &DeclId<TyVarDecl>) -> TyVarDecl {
        self.get(index)
    }

    pub fn get_subscript(&self, index: &DeclId<TySubscriptDecl>) -> TySubscriptDecl {
        self.get(index)
    }
}
