pub mod ty;

mod literal;

pub use literal::*;
