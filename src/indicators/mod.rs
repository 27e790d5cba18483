pub mod structure;

pub use structure::*;
