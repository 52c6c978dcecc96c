pub mod error;
pub mod model;

pub use error::DecodeError;
pub use model::*;
