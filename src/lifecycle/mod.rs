pub mod engine;
pub mod inputs;
pub mod rules;

pub use engine::LifecycleEngine;
pub use inputs::*;
