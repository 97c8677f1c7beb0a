//! Lowering of typed functions to IR.
//!
//! The interesting part lives in [lvalue]: assignable expressions are first built into an
//! [lvalue::LValue], a chain of path components, which is then walked to emit loads, stores and
//! accessor calls.

mod cleanup;
mod compile;
mod convert;
mod function;
pub mod lvalue;
mod types;

pub use cleanup::{ManagedValue, Ownership};
pub use compile::compile_function;
