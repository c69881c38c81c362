pub mod memory;
pub mod queries;
pub mod status;
pub mod store;
pub mod types;

pub use memory::MemoryProposalStore;
pub use queries::PgProposalStore;
pub use status::*;
pub use store::*;
pub use types::*;
