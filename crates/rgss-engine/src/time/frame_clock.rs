use std::time::{Duration, Instant};

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Time elapsed since the previous frame tick, in seconds.
    pub dt: f32,

    /// Monotonic timestamp taken at the tick.
    pub now: Instant,

    /// Monotonic frame counter.
    pub frame_index: u64,

    /// Time left until the next frame is due. Always zero at a variable rate.
    pub wait: Duration,
}

/// Frame clock producing `FrameTime` snapshots.
///
/// At a fixed rate the clock keeps an absolute deadline per frame, so short
/// sleeps do not accumulate drift. A frame that runs past its deadline by more
/// than one whole period re-bases the schedule instead of trying to catch up.
///
/// Delta time is clamped to avoid pathological values when the application is
/// paused by the debugger or stalls.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    next_deadline: Instant,
    frame_index: u64,
    period: Duration,
    fixed: bool,
    dt_min: Duration,
    dt_max: Duration,
}

fn period_for(frame_rate: u32) -> Duration {
    Duration::from_secs(1) / frame_rate.max(1)
}

impl FrameClock {
    /// Creates a clock at `frame_rate` with default clamps.
    pub fn new(frame_rate: u32, fixed: bool) -> Self {
        Self::starting_at(Instant::now(), frame_rate, fixed)
    }

    /// Creates a clock whose baseline is `start`.
    pub fn starting_at(start: Instant, frame_rate: u32, fixed: bool) -> Self {
        let period = period_for(frame_rate);
        Self {
            last: start,
            next_deadline: start + period,
            frame_index: 0,
            period,
            fixed,
            dt_min: Duration::from_micros(100), // 0.0001s
            dt_max: Duration::from_millis(250), // 0.25s
        }
    }

    #[inline]
    pub fn frame_rate(&self) -> u32 {
        (Duration::from_secs(1).as_nanos() / self.period.as_nanos().max(1)) as u32
    }

    #[inline]
    pub fn period(&self) -> Duration {
        self.period
    }

    #[inline]
    pub fn is_fixed(&self) -> bool {
        self.fixed
    }

    #[inline]
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Changes the rate. The next deadline is re-based on the last tick.
    pub fn set_frame_rate(&mut self, frame_rate: u32) {
        self.period = period_for(frame_rate);
        self.next_deadline = self.last + self.period;
    }

    /// Resets the clock baseline.
    ///
    /// Used after long loads so the next frame does not try to make up lost time.
    pub fn reset(&mut self) {
        self.reset_at(Instant::now());
    }

    pub fn reset_at(&mut self, now: Instant) {
        self.last = now;
        self.next_deadline = now + self.period;
        log::debug!("frame clock reset at frame {}", self.frame_index);
    }

    /// Advances the clock and returns a new `FrameTime`.
    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    /// [`tick`](Self::tick) with an explicit timestamp.
    pub fn tick_at(&mut self, now: Instant) -> FrameTime {
        let dt = now
            .saturating_duration_since(self.last)
            .clamp(self.dt_min, self.dt_max);

        let wait = if self.fixed {
            if now >= self.next_deadline + self.period {
                // Too far behind: drop the missed frames.
                self.next_deadline = now + self.period;
                Duration::ZERO
            } else {
                let wait = self.next_deadline.saturating_duration_since(now);
                self.next_deadline += self.period;
                wait
            }
        } else {
            Duration::ZERO
        };

        self.last = now;

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            now,
            frame_index: self.frame_index,
            wait,
        };

        self.frame_index = self.frame_index.wrapping_add(1);

        ft
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(60, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn fixed_rate_waits_for_deadline() {
        let t0 = Instant::now();
        let mut clock = FrameClock::starting_at(t0, 40, true);
        assert_eq!(clock.period(), 25 * MS);

        let ft = clock.tick_at(t0 + 10 * MS);
        assert_eq!(ft.wait, 15 * MS);
        assert_eq!(ft.frame_index, 0);

        // Second deadline is t0 + 50ms regardless of when frame 0 finished.
        let ft = clock.tick_at(t0 + 30 * MS);
        assert_eq!(ft.wait, 20 * MS);
        assert_eq!(ft.frame_index, 1);
    }

    #[test]
    fn fixed_rate_drops_frames_after_a_stall() {
        let t0 = Instant::now();
        let mut clock = FrameClock::starting_at(t0, 40, true);
        let ft = clock.tick_at(t0 + 500 * MS);
        assert_eq!(ft.wait, Duration::ZERO);
        assert_eq!(ft.dt, 0.25);
        let ft = clock.tick_at(t0 + 510 * MS);
        assert_eq!(ft.wait, 15 * MS);
    }

    #[test]
    fn variable_rate_never_waits() {
        let t0 = Instant::now();
        let mut clock = FrameClock::starting_at(t0, 60, false);
        assert_eq!(clock.tick_at(t0 + MS).wait, Duration::ZERO);
    }

    #[test]
    fn reset_rebases_schedule() {
        let t0 = Instant::now();
        let mut clock = FrameClock::starting_at(t0, 40, true);
        clock.reset_at(t0 + 100 * MS);
        assert_eq!(clock.tick_at(t0 + 105 * MS).wait, 20 * MS);
    }

    #[test]
    fn frame_rate_round_trips() {
        let mut clock = FrameClock::new(60, true);
        assert_eq!(clock.frame_rate(), 60);
        clock.set_frame_rate(40);
        assert_eq!(clock.frame_rate(), 40);
        clock.set_frame_rate(0);
        assert_eq!(clock.frame_rate(), 1);
    }
}
