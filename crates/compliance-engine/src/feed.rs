//! Bounded live feed of recent issues

use std::collections::VecDeque;

use shared_types::Issue;

pub const DEFAULT_FEED_CAPACITY: usize = 100;

/// FIFO of the most recent issues; pushing past capacity drops the oldest
#[derive(Debug, Clone)]
pub struct IssueFeed {
    capacity: usize,
    issues: VecDeque<Issue>,
}

impl IssueFeed {
    /// A zero capacity is bumped to one
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            issues: VecDeque::with_capacity(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn push(&mut self, issue: Issue) {
        if self.issues.len() == self.capacity {
            self.issues.pop_front();
        }
        self.issues.push_back(issue);
    }

    pub fn extend<I: IntoIterator<Item = Issue>>(&mut self, issues: I) {
        for issue in issues {
            self.push(issue);
        }
    }

    /// The newest `n` issues, newest first
    pub fn latest(&self, n: usize) -> Vec<Issue> {
        self.issues.iter().rev().take(n).cloned().collect()
    }
}

impl Default for IssueFeed {
    fn default() -> Self {
        Self::new(DEFAULT_FEED_CAPACITY)
    }
}
