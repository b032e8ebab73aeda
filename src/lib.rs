pub mod adapters;
pub mod core;
pub mod lm;
pub mod orchestrator;
pub mod search;
pub mod tools;

pub use core::types;
pub use core::types::*;
pub use orchestrator::conduct_deep_research;
