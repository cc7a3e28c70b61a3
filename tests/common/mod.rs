//! Common test utilities for extended-unrar end-to-end tests

#[allow(dead_code)]
pub mod assertions;

#[allow(unused_imports)]
pub use assertions::*;
pub use config::*;
#[allow(unused_imports)]
pub use fixtures::*;
