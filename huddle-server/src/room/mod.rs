mod broadcast;
mod outbox;
mod registry;

pub use outbox::*;
pub use registry::*;
