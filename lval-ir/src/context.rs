//! The main handle to an IR instance.
//!
//! [`Context`] contains several [slotmap](https://github.com/orlp/slotmap) collections to
//! maintain the IR ECS.
//!
//! It is passed around as a mutable reference to many of the IR APIs.

use rustc_hash::FxHashMap;
use slotmap::{DefaultKey, SlotMap};

use crate::{
    block::BlockContent,
    function::FunctionContent,
    irtype::{Type, TypeContent},
    local_var::LocalVarContent,
    module::ModuleContent,
    value::ValueContent,
};

/// The main IR context handle.
///
/// Every module, function, block, value, local and type is stored here.
#[derive(Default)]
pub struct Context {
    pub(crate) modules: SlotMap<DefaultKey, ModuleContent>,
    pub(crate) functions: SlotMap<DefaultKey, FunctionContent>,
    pub(crate) blocks: SlotMap<DefaultKey, BlockContent>,
    pub(crate) values: SlotMap<DefaultKey, ValueContent>,
    pub(crate) local_vars: SlotMap<DefaultKey, LocalVarContent>,
    pub(crate) types: SlotMap<DefaultKey, TypeContent>,
    pub(crate) type_map: FxHashMap<TypeContent, Type>,

    next_unique_sym_tag: u64,
}

impl Context {
    /// A fresh context with the basic types already created.
    pub fn new() -> Self {
        let mut context = Context::default();
        Type::create_basic_types(&mut context);
        context
    }

    /// Get a globally unique symbol.
    ///
    /// The name will be in the form `"anon_N"`, where `N` is an incrementing decimal.
    pub fn get_unique_name(&mut self) -> String {
        format!("anon_{}", self.get_unique_id())
    }

    /// Get a globally unique symbol id.
    pub fn get_unique_id(&mut self) -> u64 {
        let sym = self.next_unique_sym_tag;
        self.next_unique_sym_tag += 1;
        sym
    }
}

use std::fmt::{Display, Error, Formatter};

impl Display for Context {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "{}", crate::printer::to_string(self))
    }
}

impl From<Context> for String {
    fn from(context: Context) -> Self {
        crate::printer::to_string(&context)
    }
}
