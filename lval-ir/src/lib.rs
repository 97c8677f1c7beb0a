//! The IR that assignable expressions are lowered into.
//!
//! Everything lives in a [`Context`]; the handle types ([`Value`], [`Type`], [`Function`],
//! [`Block`], ...) are small `Copy` keys into its arenas.

pub mod block;
pub use block::*;
pub mod constant;
pub use constant::*;
pub mod context;
pub use context::*;
pub mod error;
pub use error::*;
pub mod function;
pub use function::*;
pub mod instruction;
pub use instruction::*;
pub mod irtype;
pub use irtype::*;
pub mod local_var;
pub use local_var::*;
pub mod module;
pub use module::*;
pub mod printer;
pub use printer::*;
pub mod value;
pub use value::*;
pub mod verify;
