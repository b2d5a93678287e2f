// Re-export all model types for ease of use

pub mod book;
pub mod reports;

pub use book::*;
pub use reports::*;
