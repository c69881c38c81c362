pub mod proposal;
pub mod reference;
