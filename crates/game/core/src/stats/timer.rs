use super::cooldown::UpdateTime;

/// What happened during one [`Timer::advance`] call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TimerProgress {
    /// 1-based indices of the periods that elapsed, in order.
    pub periods: Vec<u32>,
    pub completed: bool,
}

/// Span of time with optional periodic ticks.
///
/// Used for effect durations, periodic effects and action cast times.
#[derive(Clone, Debug, PartialEq)]
pub struct Timer {
    total: f64,
    period: Option<f64>,
    elapsed: f64,
    periods_fired: u32,
    paused: bool,
    finished: bool,
}

impl Timer {
    pub fn new(total_ms: f64) -> Self {
        Self {
            total: total_ms,
            period: None,
            elapsed: 0.0,
            periods_fired: 0,
            paused: false,
            finished: false,
        }
    }

    /// Timer that reports a tick every `period_ms`. Non-positive periods are ignored.
    pub fn periodic(total_ms: f64, period_ms: f64) -> Self {
        let mut timer = Self::new(total_ms);
        timer.period = (period_ms > 0.0).then_some(period_ms);
        timer
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn period(&self) -> Option<f64> {
        self.period
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn remaining(&self) -> f64 {
        (self.total - self.elapsed).max(0.0)
    }

    pub fn periods_fired(&self) -> u32 {
        self.periods_fired
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Restarts from zero with the same span.
    pub fn reset(&mut self) {
        self.elapsed = 0.0;
        self.periods_fired = 0;
        self.paused = false;
        self.finished = false;
    }

    pub fn advance(&mut self, time: UpdateTime) -> TimerProgress {
        let mut progress = TimerProgress::default();
        if self.paused || self.finished {
            return progress;
        }

        self.elapsed += time.elapsed;
        let reached = self.elapsed.min(self.total);
        if let Some(period) = self.period {
            while f64::from(self.periods_fired + 1) * period <= reached {
                self.periods_fired += 1;
                progress.periods.push(self.periods_fired);
            }
        }

        if self.elapsed >= self.total {
            self.finished = true;
            progress.completed = true;
        }
        progress
    }
}
