//! Domain models for the rxguard interaction core.

mod assessment;
mod prescription;
mod record;

pub use assessment::*;
pub use prescription::*;
pub use record::*;
