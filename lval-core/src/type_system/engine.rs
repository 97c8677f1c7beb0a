use std::sync::RwLock;

use rustc_hash::FxHashMap;

use crate::{
    concurrent_slab::ConcurrentSlab,
    type_system::{TypeId, TypeInfo},
};

#[derive(Debug, Default)]
pub struct TypeEngine {
    slab: ConcurrentSlab<TypeInfo>,
    id_map: RwLock<FxHashMap<TypeInfo, TypeId>>,
}

impl TypeEngine {
    /// Inserts a [TypeInfo] into the [TypeEngine] and returns a [TypeId] referring to that
    /// [TypeInfo].  Equal types share an id.
    pub fn insert(&self, ty: TypeInfo) -> TypeId {
        let mut id_map = self.id_map.write().unwrap();
        if let Some(type_id) = id_map.get(&ty) {
            return *type_id;
        }
        let type_id = TypeId::new(self.slab.insert(ty.clone()));
        id_map.insert(ty, type_id);
        type_id
    }

    /// Inserts the lvalue type denoting storage of `ty`.
    pub fn insert_lvalue(&self, ty: TypeId) -> TypeId {
        self.insert(TypeInfo::LValue(ty))
    }

    pub fn get(&self, id: TypeId) -> TypeInfo {
        self.slab.get(id.index())
    }

    /// Strip an outer [TypeInfo::LValue], giving the type of the value held in the storage.
    pub fn get_rvalue_type(&self, id: TypeId) -> TypeId {
        match self.get(id) {
            TypeInfo::LValue(inner) => inner,
            _ => id,
        }
    }

    pub fn is_lvalue(&self, id: TypeId) -> bool {
        self.get(id).is_lvalue()
    }

    pub fn has_reference_semantics(&self, id: TypeId) -> bool {
        self.get(id).has_reference_semantics()
    }
}
