//! Named FIFO execution queue
//!
//! Every operation takes the queue lock for its whole critical section, so
//! readers always see a consistent state and mutations never interleave.
//! Consumers that want to wait for work use [`ExecutionQueue::dequeue_timeout`];
//! there is no unbounded blocking dequeue.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::Notify;
use tokio::time::Instant;

use crate::common::{Error, Result};

use super::task::{Task, TaskId, TaskRange};

/// A named queue of tasks waiting to be executed
pub struct ExecutionQueue<T> {
    name: String,
    items: Mutex<VecDeque<T>>,
    /// Signalled once per enqueued task
    available: Notify,
}

impl<T> ExecutionQueue<T> {
    pub fn name(&self) -> &str {
        &self.name
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<T>> {
        // A panic while holding the lock cannot leave the deque half-updated
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Task> ExecutionQueue<T> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            items: Mutex::new(VecDeque::new()),
            available: Notify::new(),
        }
    }

    // === Mutation ===

    /// Append a task to the tail
    pub fn enqueue(&self, task: T) {
        self.lock().push_back(task);
        self.available.notify_one();
    }

    /// Insert a task at the head, ahead of everything already queued
    pub fn enqueue_front(&self, task: T) {
        self.lock().push_front(task);
        self.available.notify_one();
    }

    /// Append several tasks to the tail under a single lock
    pub fn enqueue_all(&self, tasks: impl IntoIterator<Item = T>) -> usize {
        let added = {
            let mut items = self.lock();
            let before = items.len();
            items.extend(tasks);
            items.len() - before
        };
        for _ in 0..added {
            self.available.notify_one();
        }
        added
    }

    /// Remove and return the head task
    pub fn dequeue(&self) -> Result<T> {
        self.try_dequeue()
            .ok_or_else(|| Error::empty_queue(&self.name))
    }

    /// Remove and return the head task, if any
    pub fn try_dequeue(&self) -> Option<T> {
        self.lock().pop_front()
    }

    /// Wait up to `timeout` for a task to become available
    pub async fn dequeue_timeout(&self, timeout: Duration) -> Result<T> {
        let now = Instant::now();
        let deadline = now.checked_add(timeout).unwrap_or_else(|| far_future(now));

        loop {
            let notified = self.available.notified();
            tokio::pin!(notified);
            // Register before checking so an enqueue in between is not missed
            notified.as_mut().enable();

            if let Some(task) = self.try_dequeue() {
                return Ok(task);
            }

            if tokio::time::timeout_at(deadline, notified).await.is_err() {
                return self.try_dequeue().ok_or_else(|| {
                    Error::dequeue_timeout(&self.name, saturating_millis(timeout))
                });
            }
        }
    }

    /// Remove every queued task without running it
    pub fn drain(&self) -> Vec<T> {
        self.lock().drain(..).collect()
    }

    /// Remove the first task with the given identifier
    pub fn remove(&self, task_id: &TaskId) -> Option<T> {
        let mut items = self.lock();
        let index = items.iter().position(|t| t.task_id() == *task_id)?;
        items.remove(index)
    }

    /// Remove the first task with the same identifier as `task`
    pub fn remove_task(&self, task: &T) -> Option<T> {
        self.remove(&task.task_id())
    }

    // === Queries ===

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn count(&self) -> usize {
        self.lock().len()
    }

    /// Identifiers of the tasks inside `range`, in queue order
    pub fn get_task_ids(&self, range: TaskRange) -> Vec<TaskId> {
        let items = self.lock();
        items
            .range(range.bounds(items.len()))
            .map(|t| t.task_id())
            .collect()
    }

    /// Identifiers of every queued task
    pub fn snapshot(&self) -> Vec<TaskId> {
        self.get_task_ids(TaskRange::ALL)
    }

    /// Returns true if a task with this identifier is queued
    pub fn contains(&self, task_id: &TaskId) -> bool {
        self.lock().iter().any(|t| t.task_id() == *task_id)
    }
}

impl<T: Task + Clone> ExecutionQueue<T> {
    /// Copies of the tasks inside `range`, in queue order
    pub fn get_tasks(&self, range: TaskRange) -> Vec<T> {
        let items = self.lock();
        items.range(range.bounds(items.len())).cloned().collect()
    }

    /// Copy of the first task with the given identifier, leaving the queue unchanged
    pub fn fetch_task(&self, task_id: &TaskId) -> Option<T> {
        self.lock().iter().find(|t| t.task_id() == *task_id).cloned()
    }
}

impl<T> std::fmt::Debug for ExecutionQueue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutionQueue")
            .field("name", &self.name)
            .field("count", &self.lock().len())
            .finish()
    }
}

/// Whole milliseconds of `d`, capped at `u64::MAX`
fn saturating_millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

/// A deadline far enough out to never fire, for timeouts that overflow `Instant`
fn far_future(now: Instant) -> Instant {
    now + Duration::from_secs(86_400 * 365 * 30)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[derive(Debug, Clone, PartialEq)]
    struct Job(&'static str);

    impl Task for Job {
        fn task_id(&self) -> TaskId {
            TaskId::from(self.0)
        }
    }

    fn ids(queue: &ExecutionQueue<Job>) -> Vec<String> {
        queue.snapshot().into_iter().map(|id| id.to_string()).collect()
    }

    #[test]
    fn test_fifo_order() {
        let queue = ExecutionQueue::new("q");
        queue.enqueue(Job("a"));
        queue.enqueue(Job("b"));
        queue.enqueue(Job("c"));

        assert_eq!(queue.dequeue().unwrap(), Job("a"));
        assert_eq!(queue.dequeue().unwrap(), Job("b"));
        assert_eq!(queue.dequeue().unwrap(), Job("c"));
    }

    #[test]
    fn test_front_insertion() {
        let queue = ExecutionQueue::new("q");
        queue.enqueue(Job("a"));
        queue.enqueue(Job("b"));
        queue.enqueue_front(Job("c"));
        assert_eq!(ids(&queue), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_front_insertions_stack() {
        let queue = ExecutionQueue::new("q");
        queue.enqueue(Job("a"));
        queue.enqueue_front(Job("x"));
        queue.enqueue_front(Job("y"));
        assert_eq!(ids(&queue), vec!["y", "x", "a"]);
    }

    #[test]
    fn test_dequeue_empty_fails() {
        let queue: ExecutionQueue<Job> = ExecutionQueue::new("empty");
        let err = queue.dequeue().unwrap_err();
        assert!(matches!(err, Error::EmptyQueue { ref queue } if queue == "empty"));
        assert!(queue.try_dequeue().is_none());
    }

    #[test]
    fn test_duplicates_are_kept() {
        let queue = ExecutionQueue::new("q");
        queue.enqueue(Job("a"));
        queue.enqueue(Job("a"));
        assert_eq!(queue.count(), 2);
        assert_eq!(queue.dequeue().unwrap(), Job("a"));
        assert_eq!(queue.dequeue().unwrap(), Job("a"));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_drain_is_idempotent() {
        let queue = ExecutionQueue::new("q");
        queue.enqueue_all([Job("a"), Job("b")]);

        assert_eq!(queue.drain().len(), 2);
        assert!(queue.is_empty());
        assert!(queue.drain().is_empty());
        assert!(queue.is_empty());
    }

    #[test]
    fn test_slices() {
        let queue = ExecutionQueue::new("q");
        queue.enqueue_all([Job("a"), Job("b"), Job("c"), Job("d"), Job("e")]);

        let slice = queue.get_task_ids(TaskRange::new(1, Some(2)));
        assert_eq!(slice, vec![TaskId::from("b"), TaskId::from("c")]);

        assert!(queue.get_task_ids(TaskRange::new(5, None)).is_empty());
        assert!(queue.get_task_ids(TaskRange::new(9, Some(1))).is_empty());
        assert_eq!(queue.get_task_ids(TaskRange::new(3, Some(10))).len(), 2);

        let tasks = queue.get_tasks(TaskRange::new(4, None));
        assert_eq!(tasks, vec![Job("e")]);
        assert_eq!(queue.count(), 5);
    }

    #[test]
    fn test_fetch_does_not_reorder() {
        let queue = ExecutionQueue::new("q");
        queue.enqueue_all([Job("a"), Job("b"), Job("c")]);

        assert_eq!(queue.fetch_task(&TaskId::from("b")), Some(Job("b")));
        assert_eq!(queue.fetch_task(&TaskId::from("z")), None);
        assert_eq!(ids(&queue), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_remove_first_match() {
        let queue = ExecutionQueue::new("q");
        queue.enqueue_all([Job("a"), Job("b"), Job("a")]);

        assert_eq!(queue.remove(&TaskId::from("a")), Some(Job("a")));
        assert_eq!(ids(&queue), vec!["b", "a"]);
        assert_eq!(queue.remove_task(&Job("b")), Some(Job("b")));
        assert_eq!(queue.remove(&TaskId::from("missing")), None);
        assert_eq!(queue.count(), 1);
    }

    #[test]
    fn test_contains() {
        let queue = ExecutionQueue::new("q");
        queue.enqueue_all([Job("a"), Job("b")]);

        assert!(queue.contains(&TaskId::from("b")));
        assert!(!queue.contains(&TaskId::from("z")));
        queue.remove(&TaskId::from("b"));
        assert!(!queue.contains(&TaskId::from("b")));
    }

    #[test]
    fn test_poisoned_lock_keeps_tasks() {
        let queue = Arc::new(ExecutionQueue::new("q"));
        queue.enqueue(Job("a"));

        let poisoner = Arc::clone(&queue);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.items.lock().unwrap();
            panic!("poison the queue lock");
        })
        .join();

        assert!(queue.items.is_poisoned());
        assert_eq!(queue.count(), 1);
        assert!(format!("{:?}", queue).contains("count: 1"));
    }

    #[test]
    fn test_saturating_millis() {
        assert_eq!(saturating_millis(Duration::from_millis(250)), 250);
        assert_eq!(saturating_millis(Duration::MAX), u64::MAX);
    }

    #[tokio::test]
    async fn test_dequeue_timeout_expires() {
        let queue: ExecutionQueue<Job> = ExecutionQueue::new("idle");
        let err = queue
            .dequeue_timeout(Duration::from_millis(20))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::DequeueTimeout { millis: 20, .. }));
    }

    #[tokio::test]
    async fn test_dequeue_timeout_wakes_on_enqueue() {
        let queue = Arc::new(ExecutionQueue::new("q"));

        let producer = {
            let queue = Arc::clone(&queue);
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(20)).await;
                queue.enqueue(Job("late"));
            })
        };

        let task = queue.dequeue_timeout(Duration::from_secs(5)).await.unwrap();
        assert_eq!(task, Job("late"));
        producer.await.unwrap();
    }

    #[tokio::test]
    async fn test_dequeue_timeout_returns_queued_task_immediately() {
        let queue = ExecutionQueue::new("q");
        queue.enqueue(Job("ready"));
        let task = queue.dequeue_timeout(Duration::ZERO).await.unwrap();
        assert_eq!(task, Job("ready"));
    }
}
