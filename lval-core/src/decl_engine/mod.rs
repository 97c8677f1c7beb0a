//! Storage for typed declarations, addressed by typed [DeclId]s.

mod accessor;
mod engine;
mod id;

pub use accessor::*;
pub use engine::*;
pub use id::*;
