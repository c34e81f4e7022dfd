pub mod field;
pub mod scalar;

pub use field::FieldElement;
pub use scalar::*;
