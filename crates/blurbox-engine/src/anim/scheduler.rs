use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Arms the next display-refresh callback.
///
/// The winit host requests a redraw; tests count calls.
pub trait Scheduler {
    fn schedule_next(&mut self);
}

/// Control directive returned by frame sinks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Cooperative cancellation flag shared with the animation driver.
///
/// Once stopped, the driver runs no further frame and schedules nothing.
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    stopped: Arc<AtomicBool>,
}

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.stopped.store(true, Ordering::Release);
    }

    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_flag() {
        let a = StopHandle::new();
        let b = a.clone();
        assert!(!b.is_stopped());
        a.stop();
        assert!(b.is_stopped());
    }
}
