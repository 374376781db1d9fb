//! Task execution queue

mod execution;
mod task;

pub use execution::ExecutionQueue;
pub use task::{Task, TaskId, TaskRange};
