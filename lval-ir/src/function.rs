//! A typical function data type.
//!
//! [`Function`] is named, takes zero or more arguments and has an optional return value.  It
//! contains a collection of [`Block`]s.
//!
//! It also maintains a collection of local values which can be typically regarded as variables
//! existing in the function scope.

use std::collections::BTreeMap;

use crate::{
    block::Block,
    context::Context,
    error::IrError,
    irtype::Type,
    local_var::LocalVar,
    module::Module,
    value::Value,
};

/// A wrapper around an [ECS](https://github.com/orlp/slotmap) handle into the
/// [`Context`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Function(pub slotmap::DefaultKey);

#[doc(hidden)]
pub struct FunctionContent {
    pub name: String,
    pub arguments: Vec<(String, Value)>,
    pub return_type: Type,
    pub blocks: Vec<Block>,
    pub is_declaration: bool,
    pub local_storage: BTreeMap<String, LocalVar>, // BTree rather than Hash for deterministic ordering.

    next_label_idx: u64,
}

impl Function {
    /// Return a new [`Function`] handle.
    ///
    /// Creates a [`Function`] in the `context` within `module` and returns a handle.  An entry
    /// block labeled `entry` is created for it.
    pub fn new(
        context: &mut Context,
        module: Module,
        name: String,
        args: Vec<(String, Type)>,
        return_type: Type,
    ) -> Function {
        let func = Self::new_content(context, module, name, args, return_type, false);
        let entry_block = Block::new(context, func, Some("entry".to_owned()));
        context.functions[func.0].blocks.push(entry_block);
        func
    }

    /// Return a new bodiless [`Function`] declaration.  Calls may refer to it but it has no
    /// blocks.
    pub fn new_declaration(
        context: &mut Context,
        module: Module,
        name: String,
        args: Vec<(String, Type)>,
        return_type: Type,
    ) -> Function {
        Self::new_content(context, module, name, args, return_type, true)
    }

    fn new_content(
        context: &mut Context,
        module: Module,
        name: String,
        args: Vec<(String, Type)>,
        return_type: Type,
        is_declaration: bool,
    ) -> Function {
        let arguments = args
            .into_iter()
            .map(|(name, ty)| (name, Value::new_argument(context, ty)))
            .collect();
        let content = FunctionContent {
            name,
            arguments,
            return_type,
            blocks: Vec::new(),
            is_declaration,
            local_storage: BTreeMap::new(),
            next_label_idx: 0,
        };
        let func = Function(context.functions.insert(content));
        context.modules[module.0].functions.push(func);
        func
    }

    /// Create and append a new [`Block`] to this function.
    pub fn create_block(&self, context: &mut Context, label: Option<String>) -> Block {
        let block = Block::new(context, *self, label);
        context.functions[self.0].blocks.push(block);
        block
    }

    /// Return a label which is unique within this function, based on `hint` if given.
    pub fn get_unique_label(&self, context: &mut Context, hint: Option<String>) -> String {
        match hint {
            Some(hint) => {
                if context.functions[self.0]
                    .blocks
                    .iter()
                    .any(|block| context.blocks[block.0].label == hint)
                {
                    let idx = self.get_next_label_idx(context);
                    self.get_unique_label(context, Some(format!("{hint}{idx}")))
                } else {
                    hint
                }
            }
            None => {
                let idx = self.get_next_label_idx(context);
                self.get_unique_label(context, Some(format!("block{idx}")))
            }
        }
    }

    fn get_next_label_idx(&self, context: &mut Context) -> u64 {
        let func = &mut context.functions[self.0];
        let idx = func.next_label_idx;
        func.next_label_idx += 1;
        idx
    }

    /// Return the function name.
    pub fn get_name<'a>(&self, context: &'a Context) -> &'a str {
        &context.functions[self.0].name
    }

    /// Return the return type of this function.
    pub fn get_return_type(&self, context: &Context) -> Type {
        context.functions[self.0].return_type
    }

    /// Whether this function is a declaration without a body.
    pub fn is_declaration(&self, context: &Context) -> bool {
        context.functions[self.0].is_declaration
    }

    /// Return the number of arguments this function takes.
    pub fn num_args(&self, context: &Context) -> usize {
        context.functions[self.0].arguments.len()
    }

    /// Return the entry block for this function.
    ///
    /// Declarations have no blocks and therefore no entry block.
    pub fn get_entry_block(&self, context: &Context) -> Option<Block> {
        context.functions[self.0].blocks.first().copied()
    }

    /// Return the blocks of this function in layout order.
    pub fn blocks<'a>(&self, context: &'a Context) -> &'a [Block] {
        &context.functions[self.0].blocks
    }

    /// Return the named argument value, if it exists.
    pub fn get_arg(&self, context: &Context, name: &str) -> Option<Value> {
        context.functions[self.0]
            .arguments
            .iter()
            .find_map(|(arg_name, val)| (arg_name == name).then_some(*val))
    }

    /// Return an iterator for each of the function arguments.
    pub fn args_iter<'a>(&self, context: &'a Context) -> impl Iterator<Item = &'a (String, Value)> {
        context.functions[self.0].arguments.iter()
    }

    /// Return the local variable named `name`, if it exists.
    pub fn get_local_var(&self, context: &Context, name: &str) -> Option<LocalVar> {
        context.functions[self.0].local_storage.get(name).copied()
    }

    /// Return an iterator over the local variables, ordered by name.
    pub fn locals_iter<'a>(
        &self,
        context: &'a Context,
    ) -> impl Iterator<Item = (&'a String, &'a LocalVar)> {
        context.functions[self.0].local_storage.iter()
    }

    /// Add a value to the function local storage.
    ///
    /// The name must be unique to this function, else an error is returned.
    pub fn new_local_var(
        &self,
        context: &mut Context,
        name: String,
        local_type: Type,
        mutable: bool,
    ) -> Result<LocalVar, IrError> {
        if context.functions[self.0].local_storage.contains_key(&name) {
            return Err(IrError::FunctionLocalClobbered(
                context.functions[self.0].name.clone(),
                name,
            ));
        }
        let var = LocalVar::new(context, local_type, mutable);
        context.functions[self.0].local_storage.insert(name, var);
        Ok(var)
    }

    /// Add a value to the function local storage, by forcing the name to be unique if needed.
    ///
    /// Will use the provided name as a hint and rename to guarantee insertion.
    pub fn new_unique_local_var(
        &self,
        context: &mut Context,
        name: String,
        local_type: Type,
        mutable: bool,
    ) -> LocalVar {
        let func = &context.functions[self.0];
        let mut new_name = name.clone();
        let mut n = 0;
        while func.local_storage.contains_key(&new_name) {
            new_name = format!("{name}{n}");
            n += 1;
        }
        let var = LocalVar::new(context, local_type, mutable);
        context.functions[self.0].local_storage.insert(new_name, var);
        var
    }

    /// Return the name under which `local_var` is stored, if it belongs to this function.
    pub fn lookup_local_name<'a>(
        &self,
        context: &'a Context,
        local_var: &LocalVar,
    ) -> Option<&'a String> {
        context.functions[self.0]
            .local_storage
            .iter()
            .find_map(|(name, var)| (var == local_var).then_some(name))
    }
}
