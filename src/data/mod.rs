pub mod model;
pub mod snapshot;

pub use model::*;
pub use snapshot::*;
