//! Queue-level task identity

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::common::{Error, Result};

/// Stable identifier of a queued task
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for TaskId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Anything that can be placed on an execution queue
///
/// The queue only looks at the identifier.
pub trait Task {
    fn task_id(&self) -> TaskId;
}

/// A window over the queue used by the slicing queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskRange {
    pub offset: usize,
    /// `None` runs to the end of the queue
    pub length: Option<usize>,
}

impl TaskRange {
    /// The whole queue
    pub const ALL: TaskRange = TaskRange {
        offset: 0,
        length: None,
    };

    pub fn new(offset: usize, length: Option<usize>) -> Self {
        Self { offset, length }
    }

    /// Build a range from raw integers, where a length of `-1` means "to the end"
    pub fn from_raw(offset: i64, length: i64) -> Result<Self> {
        if offset < 0 || length < -1 {
            return Err(Error::Range { offset, length });
        }
        let length = if length == -1 {
            None
        } else {
            Some(length as usize)
        };
        Ok(Self {
            offset: offset as usize,
            length,
        })
    }

    /// Clamp the window to a sequence of `len` items
    pub(crate) fn bounds(&self, len: usize) -> std::ops::Range<usize> {
        let start = self.offset.min(len);
        let end = match self.length {
            Some(length) => start.saturating_add(length).min(len),
            None => len,
        };
        start..end
    }
}

impl Default for TaskRange {
    fn default() -> Self {
        Self::ALL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_rejects_negative_offset() {
        assert!(matches!(
            TaskRange::from_raw(-1, -1),
            Err(Error::Range {
                offset: -1,
                length: -1
            })
        ));
        assert!(TaskRange::from_raw(0, -2).is_err());
    }

    #[test]
    fn test_from_raw_to_end() {
        let range = TaskRange::from_raw(2, -1).unwrap();
        assert_eq!(range, TaskRange::new(2, None));
    }

    #[test]
    fn test_bounds_clamp() {
        assert_eq!(TaskRange::new(1, Some(2)).bounds(5), 1..3);
        assert_eq!(TaskRange::new(3, Some(10)).bounds(5), 3..5);
        assert_eq!(TaskRange::new(7, None).bounds(5), 5..5);
        assert_eq!(TaskRange::new(0, Some(usize::MAX)).bounds(5), 0..5);
    }
}
