//! The typed tree handed to lowering.

mod declaration;
mod expression;

pub use declaration::*;
pub use expression::*;
