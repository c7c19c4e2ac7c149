// Shared test support code for integration tests.

pub mod common;
pub mod providers;

pub use common::*;
pub use providers::{Call, Op, ScriptedProvider};
