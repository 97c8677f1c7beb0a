pub mod build_config;
mod concurrent_slab;
pub mod decl_engine;
pub mod engine_threading;
pub mod ir_generation;
pub mod language;
pub mod type_system;

pub use build_config::BuildConfig;
pub use engine_threading::Engines;
pub use ir_generation::compile_function;
