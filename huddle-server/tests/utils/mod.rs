
pub use test_client::*;
