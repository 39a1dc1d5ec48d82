//! Test doubles for code built on this crate
//!
//! Available to unit tests and, through the `test-util` feature, to integration
//! tests and downstream dev-dependencies.

pub mod fixtures;
pub mod helpers;
pub mod mocks;

pub use self::fixtures::*;
pub use self::helpers::*;
pub use self::mocks::*;
