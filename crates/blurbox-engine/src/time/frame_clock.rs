use std::time::{Duration, Instant};

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameTime {
    /// Time elapsed since the previous tick, in seconds. Never negative.
    pub dt: f32,

    /// Timestamp passed to the tick.
    pub now: Instant,

    /// Frames advanced since priming, starting at 0.
    pub frame_index: u64,
}

/// Derives per-frame `dt` from callback timestamps.
///
/// The first tick only records a baseline (priming) and yields no `FrameTime`.
/// Timestamps are supplied by the caller so that tests can drive the clock
/// deterministically.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last: Option<Instant>,
    frame_index: u64,
    dt_max: Option<Duration>,
}

impl FrameClock {
    /// Creates an unprimed clock without a `dt` clamp.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an unprimed clock whose `dt` never exceeds `dt_max`.
    ///
    /// Keeps the simulation stable after stalls (debugger, minimized window).
    pub fn with_max_dt(dt_max: Duration) -> Self {
        Self {
            dt_max: Some(dt_max),
            ..Self::default()
        }
    }

    /// Whether a baseline timestamp has been recorded.
    #[inline]
    pub fn is_primed(&self) -> bool {
        self.last.is_some()
    }

    /// Forgets the baseline; the next tick primes again.
    ///
    /// Useful after surface reconfigure events or when resuming from suspension.
    pub fn reset(&mut self) {
        self.last = None;
    }

    /// Advances the clock to `now`.
    ///
    /// Returns `None` when priming. A `now` earlier than the previous tick yields
    /// `dt == 0` and does not move the baseline backwards.
    pub fn tick(&mut self, now: Instant) -> Option<FrameTime> {
        let Some(last) = self.last else {
            self.last = Some(now);
            return None;
        };

        let mut dt = now.saturating_duration_since(last);
        if let Some(dt_max) = self.dt_max {
            dt = dt.min(dt_max);
        }

        self.last = Some(last.max(now));

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            now,
            frame_index: self.frame_index,
        };

        self.frame_index = self.frame_index.wrapping_add(1);

        Some(ft)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn first_tick_primes() {
        let mut clock = FrameClock::new();
        assert!(!clock.is_primed());
        assert_eq!(clock.tick(Instant::now()), None);
        assert!(clock.is_primed());
    }

    #[test]
    fn dt_is_elapsed_seconds() {
        let t0 = Instant::now();
        let mut clock = FrameClock::new();
        clock.tick(t0);

        let ft = clock.tick(t0 + ms(16)).unwrap();
        assert!((ft.dt - 0.016).abs() < 1e-6);
        assert_eq!(ft.frame_index, 0);

        let ft = clock.tick(t0 + ms(48)).unwrap();
        assert!((ft.dt - 0.032).abs() < 1e-6);
        assert_eq!(ft.frame_index, 1);
    }

    #[test]
    fn backwards_time_yields_zero_dt() {
        let t0 = Instant::now();
        let mut clock = FrameClock::new();
        clock.tick(t0 + ms(100));

        let ft = clock.tick(t0).unwrap();
        assert_eq!(ft.dt, 0.0);

        // Baseline stays at the later timestamp.
        let ft = clock.tick(t0 + ms(110)).unwrap();
        assert!((ft.dt - 0.010).abs() < 1e-6);
    }

    #[test]
    fn max_dt_clamps_stalls() {
        let t0 = Instant::now();
        let mut clock = FrameClock::with_max_dt(ms(250));
        clock.tick(t0);

        let ft = clock.tick(t0 + Duration::from_secs(5)).unwrap();
        assert!((ft.dt - 0.25).abs() < 1e-6);
    }

    #[test]
    fn reset_requires_priming_again() {
        let t0 = Instant::now();
        let mut clock = FrameClock::new();
        clock.tick(t0);
        clock.tick(t0 + ms(16));

        clock.reset();
        assert!(!clock.is_primed());
        assert_eq!(clock.tick(t0 + ms(5000)), None);
        assert!(clock.tick(t0 + ms(5016)).unwrap().dt < 0.02);
    }
}
