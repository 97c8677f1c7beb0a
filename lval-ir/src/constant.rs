//! [`Constant`] is a typed constant value.

use crate::{context::Context, irtype::Type, value::Value};

/// A [`Type`] and constant value, including [`ConstantValue::Unit`] for unit constants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constant {
    pub ty: Type,
    pub value: ConstantValue,
}

/// A constant representation of each of the supported [`Type`]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstantValue {
    Unit,
    Bool(bool),
    Uint(u64),
}

impl Constant {
    pub fn new_unit(context: &Context) -> Self {
        Constant {
            ty: Type::get_unit(context),
            value: ConstantValue::Unit,
        }
    }

    pub fn new_bool(context: &Context, b: bool) -> Self {
        Constant {
            ty: Type::get_bool(context),
            value: ConstantValue::Bool(b),
        }
    }

    pub fn new_uint(context: &mut Context, nbits: u16, n: u64) -> Self {
        Constant {
            ty: Type::new_uint(context, nbits),
            value: ConstantValue::Uint(n),
        }
    }

    pub fn get_unit(context: &mut Context) -> Value {
        let new_const = Constant::new_unit(context);
        Value::new_constant(context, new_const)
    }

    pub fn get_bool(context: &mut Context, value: bool) -> Value {
        let new_const = Constant::new_bool(context, value);
        Value::new_constant(context, new_const)
    }

    pub fn get_uint(context: &mut Context, nbits: u16, value: u64) -> Value {
        let new_const = Constant::new_uint(context, nbits, value);
        Value::new_constant(context, new_const)
    }

    /// Return a string representation of this constant, used for printing.
    pub fn as_string(&self, context: &Context) -> String {
        match &self.value {
            ConstantValue::Unit => "const unit ()".to_owned(),
            ConstantValue::Bool(b) => format!("const bool {b}"),
            ConstantValue::Uint(n) => format!("const {} {n}", self.ty.as_string(context)),
        }
    }
}
