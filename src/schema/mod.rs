pub mod conversion;
pub mod definition;
pub mod field;
pub mod structure;

pub use conversion::*;
pub use definition::*;
pub use field::*;
