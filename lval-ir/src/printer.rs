//! Print IR to human readable text.
//!
//! Values are named `vN` in order of first use.  Constants are materialized on their own line
//! just before the first instruction that uses them.

use rustc_hash::FxHashMap;

use itertools::Itertools;

use crate::{
    block::Block,
    context::Context,
    function::Function,
    instruction::Instruction,
    module::Module,
    value::{Value, ValueContent},
};

/// Render every module in `context`.
pub fn to_string(context: &Context) -> String {
    context
        .modules
        .iter()
        .map(|(key, _)| module_to_string(context, Module(key)))
        .join("\n")
}

fn module_to_string(context: &Context, module: Module) -> String {
    let mut out = format!("module {} {{\n", module.get_name(context));
    for function in module.function_iter(context) {
        out.push_str(&function_to_string(context, function));
    }
    out.push_str("}\n");
    out
}

fn function_to_string(context: &Context, function: Function) -> String {
    let ret_ty = function.get_return_type(context).as_string(context);
    if function.is_declaration(context) {
        let arg_tys = function
            .args_iter(context)
            .map(|(_, arg)| type_string(context, arg))
            .join(", ");
        return format!(
            "    declare fn {}({arg_tys}) -> {ret_ty}\n",
            function.get_name(context)
        );
    }

    let args = function
        .args_iter(context)
        .map(|(name, arg)| format!("{name}: {}", type_string(context, arg)))
        .join(", ");
    let mut out = format!(
        "    fn {}({args}) -> {ret_ty} {{\n",
        function.get_name(context)
    );
    for (name, local_var) in function.locals_iter(context) {
        let mutability = if local_var.is_mutable(context) {
            "mut "
        } else {
            ""
        };
        out.push_str(&format!(
            "        local {mutability}{} {name}\n",
            local_var.get_inner_type(context).as_string(context)
        ));
    }

    let mut namer = Namer::new(function);
    for block in function.blocks(context) {
        out.push_str(&block_to_string(context, &mut namer, *block));
    }
    out.push_str("    }\n");
    out
}

fn block_to_string(context: &Context, namer: &mut Namer, block: Block) -> String {
    let mut out = format!("\n        {}:\n", block.get_label(context));
    for ins_val in block.instruction_iter(context) {
        let Some(ins) = ins_val.get_instruction(context) else {
            continue;
        };
        for operand in ins.get_operands() {
            if let ValueContent::Constant(constant) = &context.values[operand.0] {
                if !namer.is_known(&operand) {
                    let name = namer.name(context, &operand);
                    out.push_str(&format!(
                        "        {name} = {}\n",
                        constant.as_string(context)
                    ));
                }
            }
        }
        let text = instruction_to_string(context, namer, ins);
        let produces_value = ins
            .get_type(context)
            .is_some_and(|ty| !ty.is_unit(context));
        if produces_value {
            let name = namer.name(context, &ins_val);
            out.push_str(&format!("        {name} = {text}\n"));
        } else {
            out.push_str(&format!("        {text}\n"));
        }
    }
    out
}

fn instruction_to_string(context: &Context, namer: &mut Namer, ins: &Instruction) -> String {
    match ins {
        Instruction::Call {
            callee,
            substitutions,
            args,
            return_type,
        } => {
            let subs = if substitutions.is_empty() {
                String::new()
            } else {
                format!(
                    "<{}>",
                    substitutions
                        .iter()
                        .map(|ty| ty.as_string(context))
                        .join(", ")
                )
            };
            let args = args
                .iter()
                .map(|arg| namer.name(context, arg))
                .join(", ");
            format!(
                "call {}{subs}({args}) : {}",
                callee.get_name(context),
                return_type.as_string(context)
            )
        }
        Instruction::ElemAddr {
            base,
            index,
            elem_ptr_ty,
        } => format!(
            "elem_addr {}, {index} : {}",
            namer.name(context, base),
            elem_ptr_ty.as_string(context)
        ),
        Instruction::GetLocal(local_var) => {
            let name = namer
                .function
                .lookup_local_name(context, local_var)
                .map_or("<unknown>", |name| name.as_str());
            format!(
                "get_local {}, {name}",
                local_var.get_type(context).as_string(context)
            )
        }
        Instruction::Load(ptr) => format!("load {}", namer.name(context, ptr)),
        Instruction::RefElemAddr {
            base,
            field,
            elem_ptr_ty,
        } => format!(
            "ref_elem_addr {}, {field} : {}",
            namer.name(context, base),
            elem_ptr_ty.as_string(context)
        ),
        Instruction::Release(val) => format!("release {}", namer.name(context, val)),
        Instruction::Ret(val, ty) => {
            format!("ret {} {}", ty.as_string(context), namer.name(context, val))
        }
        Instruction::Retain(val) => format!("retain {}", namer.name(context, val)),
        Instruction::Store {
            dst_val_ptr,
            stored_val,
        } => format!(
            "store {} to {}",
            namer.name(context, stored_val),
            namer.name(context, dst_val_ptr)
        ),
    }
}

fn type_string(context: &Context, value: &Value) -> String {
    value
        .get_type(context)
        .map_or_else(|| "<untyped>".to_owned(), |ty| ty.as_string(context))
}

struct Namer {
    function: Function,
    names: FxHashMap<Value, String>,
    next_value_idx: u64,
}

impl Namer {
    fn new(function: Function) -> Self {
        Namer {
            function,
            names: FxHashMap::default(),
            next_value_idx: 0,
        }
    }

    fn name(&mut self, context: &Context, value: &Value) -> String {
        match &context.values[value.0] {
            ValueContent::Argument(_) => self
                .function
                .args_iter(context)
                .find(|(_, arg)| arg == value)
                .map(|(name, _)| name.clone())
                .unwrap_or_else(|| self.default_name(value)),
            ValueContent::Constant(_) | ValueContent::Instruction(_) => self.default_name(value),
        }
    }

    fn default_name(&mut self, value: &Value) -> String {
        self.names.get(value).cloned().unwrap_or_else(|| {
            let new_name = format!("v{}", self.next_value_idx);
            self.next_value_idx += 1;
            self.names.insert(*value, new_name.clone());
            new_name
        })
    }

    fn is_known(&self, value: &Value) -> bool {
        self.names.contains_key(value)
    }
}
