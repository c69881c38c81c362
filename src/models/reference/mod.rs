pub mod guard;
pub mod queries;
pub mod types;

pub use guard::ensure_unreferenced;
pub use queries::*;
pub use types::*;
