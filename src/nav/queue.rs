//! # Transition Queue
//!
//! Strict FIFO of pending transitions with explicit suspend/resume.
//!
//! The coordinator suspends the queue when it starts a transition and
//! resumes it only once that transition's visual change has completed, so
//! the head of the queue stays parked across readiness waits and animations.
//!
//! ```text
//!   enqueue ──▶ [ c | b | a ] ──take_next──▶ a   (suspend)
//!                                  ⋮
//!                        visual done for a      (resume)
//!               [ c | b ]     ──take_next──▶ b   (suspend)
//! ```

use std::collections::VecDeque;

#[derive(Debug)]
pub struct TransitionQueue<T> {
    pending: VecDeque<T>,
    suspended: bool,
}

impl<T> Default for TransitionQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TransitionQueue<T> {
    pub fn new() -> Self {
        Self {
            pending: VecDeque::new(),
            suspended: false,
        }
    }

    pub fn enqueue(&mut self, task: T) {
        self.pending.push_back(task);
    }

    /// Blocks the head of the queue from starting.
    pub fn suspend(&mut self) {
        self.suspended = true;
    }

    pub fn resume(&mut self) {
        self.suspended = false;
    }

    /// Pops the head, unless the queue is suspended.
    pub fn take_next(&mut self) -> Option<T> {
        if self.suspended {
            return None;
        }
        self.pending.pop_front()
    }

    /// Tasks waiting behind the one in flight.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
