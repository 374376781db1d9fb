//! Certification Harness - execution queue and test-program model
//!
//! This library tracks what a certification test run should execute, in
//! what order, and which DUT features decide whether a test case is
//! eligible. Executing test steps is left to the caller's [`worker::Executor`].

pub mod cli;
pub mod commands;
pub mod common;
pub mod plan;
pub mod program;
pub mod queue;
pub mod script;
pub mod worker;

// Re-export commonly used types for tests
pub use common::{Error, Result};
pub use program::{TestCase, TestProgram, TestProgramFeature};
pub use queue::{ExecutionQueue, Task, TaskId, TaskRange};
