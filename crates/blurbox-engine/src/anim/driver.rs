use std::time::Instant;

use crate::sim::RectState;
use crate::time::{FrameClock, FrameTime};

use super::scheduler::{AppControl, Scheduler, StopHandle};

/// Consumer of each advanced frame (the renderer in the real host).
pub trait FrameSink {
    fn draw(&mut self, state: &RectState) -> AppControl;
}

/// Outcome of one `on_frame` call.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum FrameStatus {
    /// First callback: clock primed, nothing updated or drawn.
    Primed,
    /// State advanced and drawn.
    Advanced(FrameTime),
    /// Driver stopped; nothing happened.
    Stopped,
}

/// Per-refresh loop: tick, update, draw, reschedule.
///
/// Owns the only mutable simulation state.
#[derive(Debug)]
pub struct AnimationDriver {
    state: RectState,
    clock: FrameClock,
    stop: StopHandle,
}

impl AnimationDriver {
    pub fn new(state: RectState, clock: FrameClock) -> Self {
        Self {
            state,
            clock,
            stop: StopHandle::new(),
        }
    }

    /// Arms the first frame.
    pub fn start(&self, scheduler: &mut impl Scheduler) {
        if !self.stop.is_stopped() {
            scheduler.schedule_next();
        }
    }

    /// Runs one display callback at time `now`.
    pub fn on_frame(
        &mut self,
        now: Instant,
        sink: &mut impl FrameSink,
        scheduler: &mut impl Scheduler,
    ) -> FrameStatus {
        if self.stop.is_stopped() {
            return FrameStatus::Stopped;
        }

        let status = match self.clock.tick(now) {
            None => {
                log::debug!("frame clock primed");
                FrameStatus::Primed
            }
            Some(ft) => {
                self.state.update(ft.dt);
                if sink.draw(&self.state) == AppControl::Exit {
                    log::warn!("frame {} requested exit; stopping animation", ft.frame_index);
                    self.stop.stop();
                }
                FrameStatus::Advanced(ft)
            }
        };

        if !self.stop.is_stopped() {
            scheduler.schedule_next();
        }

        status
    }

    /// Handle that cancels future frames.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    #[inline]
    pub fn state(&self) -> &RectState {
        &self.state
    }

    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.stop.is_stopped()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::coords::{Vec2, Viewport};
    use crate::sim::BounceParams;

    #[derive(Default)]
    struct CountingScheduler {
        armed: usize,
    }

    impl Scheduler for CountingScheduler {
        fn schedule_next(&mut self) {
            self.armed += 1;
        }
    }

    struct RecordingSink {
        drawn: Vec<RectState>,
        exit_after: Option<usize>,
    }

    impl RecordingSink {
        fn new() -> Self {
            Self {
                drawn: Vec::new(),
                exit_after: None,
            }
        }
    }

    impl FrameSink for RecordingSink {
        fn draw(&mut self, state: &RectState) -> AppControl {
            self.drawn.push(state.clone());
            match self.exit_after {
                Some(n) if self.drawn.len() >= n => AppControl::Exit,
                _ => AppControl::Continue,
            }
        }
    }

    fn driver(position: Vec2, velocity: Vec2) -> AnimationDriver {
        let state = RectState::new(
            position,
            velocity,
            Vec2::new(100.0, 100.0),
            Viewport::new(800.0, 600.0),
            BounceParams::default(),
        )
        .unwrap();
        AnimationDriver::new(state, FrameClock::new())
    }

    #[test]
    fn start_arms_one_frame() {
        let d = driver(Vec2::new(10.0, 10.0), Vec2::new(200.0, 200.0));
        let mut sched = CountingScheduler::default();
        d.start(&mut sched);
        assert_eq!(sched.armed, 1);
    }

    #[test]
    fn priming_frame_leaves_state_untouched() {
        let mut d = driver(Vec2::new(10.0, 10.0), Vec2::new(200.0, 200.0));
        let before = d.state().clone();
        let mut sink = RecordingSink::new();
        let mut sched = CountingScheduler::default();

        let status = d.on_frame(Instant::now(), &mut sink, &mut sched);

        assert_eq!(status, FrameStatus::Primed);
        assert_eq!(d.state(), &before);
        assert!(sink.drawn.is_empty());
        assert_eq!(sched.armed, 1);
    }

    #[test]
    fn each_frame_updates_draws_and_rearms_once() {
        let t0 = Instant::now();
        let mut d = driver(Vec2::new(100.0, 100.0), Vec2::new(100.0, 50.0));
        let mut sink = RecordingSink::new();
        let mut sched = CountingScheduler::default();

        d.on_frame(t0, &mut sink, &mut sched);
        for i in 1..=3 {
            let status = d.on_frame(t0 + Duration::from_millis(100 * i), &mut sink, &mut sched);
            assert!(matches!(status, FrameStatus::Advanced(_)));
        }

        assert_eq!(sched.armed, 4);
        assert_eq!(sink.drawn.len(), 3);
        let p = d.state().position();
        assert!((p.x - 130.0).abs() < 1e-3 && (p.y - 115.0).abs() < 1e-3, "{p:?}");
        assert_eq!(sink.drawn.last(), Some(d.state()));
    }

    #[test]
    fn stop_prevents_next_frame_and_rescheduling() {
        let t0 = Instant::now();
        let mut d = driver(Vec2::new(100.0, 100.0), Vec2::new(100.0, 50.0));
        let mut sink = RecordingSink::new();
        let mut sched = CountingScheduler::default();

        d.on_frame(t0, &mut sink, &mut sched);
        d.stop_handle().stop();
        let before = d.state().clone();

        let status = d.on_frame(t0 + Duration::from_millis(16), &mut sink, &mut sched);

        assert_eq!(status, FrameStatus::Stopped);
        assert_eq!(d.state(), &before);
        assert!(sink.drawn.is_empty());
        assert_eq!(sched.armed, 1);
    }

    #[test]
    fn sink_exit_stops_the_driver() {
        let t0 = Instant::now();
        let mut d = driver(Vec2::new(100.0, 100.0), Vec2::new(100.0, 50.0));
        let mut sink = RecordingSink::new();
        sink.exit_after = Some(1);
        let mut sched = CountingScheduler::default();

        d.on_frame(t0, &mut sink, &mut sched);
        d.on_frame(t0 + Duration::from_millis(16), &mut sink, &mut sched);

        assert!(d.is_stopped());
        assert_eq!(sched.armed, 1);
        assert_eq!(
            d.on_frame(t0 + Duration::from_millis(32), &mut sink, &mut sched),
            FrameStatus::Stopped
        );
        assert_eq!(sink.drawn.len(), 1);
    }

    #[test]
    fn wall_crossing_through_the_driver() {
        let t0 = Instant::now();
        let mut d = driver(Vec2::new(10.0, 10.0), Vec2::new(-200.0, -200.0));
        let mut sink = RecordingSink::new();
        let mut sched = CountingScheduler::default();

        d.on_frame(t0, &mut sink, &mut sched);
        d.on_frame(t0 + Duration::from_millis(100), &mut sink, &mut sched);

        let s = d.state();
        assert_eq!(s.position(), Vec2::zero());
        assert_eq!(s.velocity(), Vec2::new(200.0, 200.0));
        assert!((s.blur() - 100.0).abs() < 1e-4);
    }
}
