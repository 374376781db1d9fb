//! Worker loop
//!
//! Workers pull tasks from a shared execution queue and hand them to an
//! [`Executor`]. Failures are collected as script errors; a failing task
//! never stops the worker. A worker exits once the queue has stayed empty
//! for its idle timeout.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use crate::common::{Error, Result};
use crate::queue::{ExecutionQueue, Task, TaskId};
use crate::script::{FlaggedElement, ScriptError, ScriptErrorHandler};

/// Runs a single task
#[async_trait]
pub trait Executor<T>: Send + Sync {
    async fn execute(&self, task: &T) -> std::result::Result<(), ScriptError>;
}

/// Records the order tasks arrive in without running them
#[derive(Debug, Default)]
pub struct DryRunExecutor {
    executed: Mutex<Vec<TaskId>>,
}

impl DryRunExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Identifiers of every task seen so far, in arrival order
    pub fn executed(&self) -> Vec<TaskId> {
        self.executed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl<T: Task + Sync> Executor<T> for DryRunExecutor {
    async fn execute(&self, task: &T) -> std::result::Result<(), ScriptError> {
        self.executed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(task.task_id());
        Ok(())
    }
}

/// Result of one executed task
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TaskOutcome {
    Passed,
    Failed { error: ScriptError },
}

/// A task outcome together with where it ran
#[derive(Debug, Clone, Serialize)]
pub struct TaskRecord {
    pub task_id: TaskId,
    pub worker: usize,
    pub outcome: TaskOutcome,
}

/// Outcomes gathered by one or more workers
#[derive(Debug, Default, Serialize)]
pub struct RunReport {
    pub records: Vec<TaskRecord>,
    /// Failures keyed by task identifier
    pub errors: Vec<FlaggedElement>,
}

impl RunReport {
    pub fn passed(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.outcome == TaskOutcome::Passed)
            .count()
    }

    pub fn failed(&self) -> usize {
        self.records.len() - self.passed()
    }

    pub fn merge(&mut self, other: RunReport) {
        self.records.extend(other.records);
        self.errors.extend(other.errors);
    }
}

/// A single consumer of an execution queue
pub struct Worker<T, E> {
    id: usize,
    queue: Arc<ExecutionQueue<T>>,
    executor: Arc<E>,
    idle_timeout: Duration,
}

impl<T, E> Worker<T, E>
where
    T: Task + Send + Sync,
    E: Executor<T>,
{
    pub fn new(id: usize, queue: Arc<ExecutionQueue<T>>, executor: Arc<E>) -> Self {
        Self {
            id,
            queue,
            executor,
            idle_timeout: Duration::from_millis(500),
        }
    }

    pub fn with_idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    /// Execute tasks until the queue stays idle
    #[tracing::instrument(skip(self), fields(worker = self.id, queue = %self.queue.name()))]
    pub async fn run(self) -> RunReport {
        let mut report = RunReport::default();
        let mut errors = ScriptErrorHandler::new();

        loop {
            let task = match self.queue.dequeue_timeout(self.idle_timeout).await {
                Ok(task) => task,
                Err(Error::DequeueTimeout { .. }) => {
                    tracing::debug!("Queue idle, worker exiting");
                    break;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Dequeue failed, worker exiting");
                    break;
                }
            };

            let task_id = task.task_id();
            tracing::debug!(task = %task_id, "Executing task");

            let outcome = match self.executor.execute(&task).await {
                Ok(()) => {
                    tracing::info!(task = %task_id, "Task passed");
                    TaskOutcome::Passed
                }
                Err(error) => {
                    tracing::warn!(task = %task_id, error = %error, "Task failed");
                    errors.flag(task_id.to_string(), error.clone());
                    TaskOutcome::Failed { error }
                }
            };

            report.records.push(TaskRecord {
                task_id,
                worker: self.id,
                outcome,
            });
        }

        report.errors = errors.into_errors();
        report
    }
}

/// Run `count` workers against one queue and merge their reports
pub async fn run_pool<T, E>(
    queue: Arc<ExecutionQueue<T>>,
    executor: Arc<E>,
    count: usize,
    idle_timeout: Duration,
) -> Result<RunReport>
where
    T: Task + Send + Sync + 'static,
    E: Executor<T> + 'static,
{
    tracing::info!(
        queue = %queue.name(),
        workers = count,
        tasks = queue.count(),
        "Starting workers"
    );

    let handles = (0..count.max(1)).map(|id| {
        let worker = Worker::new(id, Arc::clone(&queue), Arc::clone(&executor))
            .with_idle_timeout(idle_timeout);
        tokio::spawn(worker.run())
    });

    let mut report = RunReport::default();
    for joined in futures_util::future::join_all(handles).await {
        let worker_report =
            joined.map_err(|e| Error::Internal(format!("worker panicked: {}", e)))?;
        report.merge(worker_report);
    }

    tracing::info!(
        passed = report.passed(),
        failed = report.failed(),
        "Workers finished"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::ScriptErrorKind;

    #[derive(Debug, Clone)]
    struct Step(String);

    impl Task for Step {
        fn task_id(&self) -> TaskId {
            TaskId::new(self.0.clone())
        }
    }

    struct FailOn(&'static str);

    #[async_trait]
    impl Executor<Step> for FailOn {
        async fn execute(&self, task: &Step) -> std::result::Result<(), ScriptError> {
            if task.0 == self.0 {
                Err(ScriptError::new(ScriptErrorKind::InvalidExpression, "bad step", 3))
            } else {
                Ok(())
            }
        }
    }

    fn queue_of(names: &[&str]) -> Arc<ExecutionQueue<Step>> {
        let queue = Arc::new(ExecutionQueue::new("test"));
        queue.enqueue_all(names.iter().map(|n| Step(n.to_string())));
        queue
    }

    #[tokio::test]
    async fn test_single_worker_runs_in_order() {
        let queue = queue_of(&["a", "b", "c"]);
        let executor = Arc::new(DryRunExecutor::new());

        let report = Worker::new(0, Arc::clone(&queue), Arc::clone(&executor))
            .with_idle_timeout(Duration::from_millis(10))
            .run()
            .await;

        assert_eq!(report.passed(), 3);
        assert!(queue.is_empty());
        let order: Vec<_> = executor.executed().iter().map(|id| id.to_string()).collect();
        assert_eq!(order, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_failure_does_not_stop_worker() {
        let queue = queue_of(&["a", "b", "c"]);
        let report = Worker::new(0, queue, Arc::new(FailOn("b")))
            .with_idle_timeout(Duration::from_millis(10))
            .run()
            .await;

        assert_eq!(report.records.len(), 3);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].element, "b");
        assert_eq!(report.errors[0].error.status(), 3);
    }

    #[tokio::test]
    async fn test_pool_executes_each_task_once() {
        let names: Vec<String> = (0..50).map(|i| format!("t{i}")).collect();
        let queue = Arc::new(ExecutionQueue::new("pool"));
        queue.enqueue_all(names.iter().cloned().map(Step));
        let executor = Arc::new(DryRunExecutor::new());

        let report = run_pool(queue, Arc::clone(&executor), 4, Duration::from_millis(20))
            .await
            .unwrap();

        assert_eq!(report.passed(), 50);
        let mut executed: Vec<_> = executor.executed().iter().map(|id| id.to_string()).collect();
        executed.sort();
        let mut expected = names.clone();
        expected.sort();
        assert_eq!(executed, expected);
    }
}
