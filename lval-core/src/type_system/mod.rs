mod engine;
mod id;
mod info;
mod substitution;

pub use engine::*;
pub use id::*;
pub use info::*;
pub use substitution::*;
