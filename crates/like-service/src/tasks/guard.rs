//! Overlap guard for periodic tasks

use std::sync::atomic::{AtomicBool, Ordering};

/// Lets at most one run of a task proceed at a time
#[derive(Debug, Default)]
pub struct OverlapGuard {
    running: AtomicBool,
}

impl OverlapGuard {
    pub const fn new() -> Self {
        Self {
            running: AtomicBool::new(false),
        }
    }

    /// Claim the task. Returns None while another run holds it.
    pub fn try_acquire(&self) -> Option<OverlapPermit<'_>> {
        if self.running.swap(true, Ordering::AcqRel) {
            None
        } else {
            Some(OverlapPermit { guard: self })
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}

/// Releases the guard on drop
#[derive(Debug)]
pub struct OverlapPermit<'a> {
    guard: &'a OverlapGuard,
}

impl Drop for OverlapPermit<'_> {
    fn drop(&mut self) {
        self.guard.running.store(false, Ordering::Release);
    }
}
