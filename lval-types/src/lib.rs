pub mod ident;
pub use ident::*;

pub mod integer_bits;

pub mod span;
pub use span::*;
