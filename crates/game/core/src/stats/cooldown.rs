use super::statistic::Statistic;
use super::value::ValueSource;

/// Time slice handed to everything that advances with the clock.
///
/// Both fields are milliseconds. `total` is the monotonic time since the
/// world started and is informational only.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct UpdateTime {
    pub elapsed: f64,
    pub total: f64,
}

impl UpdateTime {
    pub const fn new(elapsed: f64, total: f64) -> Self {
        Self { elapsed, total }
    }
}

/// Period of unavailability after use.
#[derive(Clone, Debug, PartialEq)]
pub struct Cooldown {
    period: Statistic,
    remaining: f64,
    remaining_ratio: f64,
    available: bool,
}

impl Cooldown {
    pub fn new(period_ms: f64) -> Self {
        Self {
            period: Statistic::new(period_ms),
            remaining: 0.0,
            remaining_ratio: 0.0,
            available: true,
        }
    }

    pub fn period(&self) -> &Statistic {
        &self.period
    }

    /// Mutable access for modifiers such as cooldown reduction.
    pub fn period_mut(&mut self) -> &mut Statistic {
        &mut self.period
    }

    pub fn set_period(&mut self, period_ms: f64) {
        self.period.set_base(period_ms);
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    pub fn remaining(&self) -> f64 {
        self.remaining
    }

    /// Fraction of the period still to wait, in `[0, 1]`.
    pub fn remaining_ratio(&self) -> f64 {
        self.remaining_ratio
    }

    /// Starts the cooldown. Returns false if it is already running.
    pub fn trigger(&mut self) -> bool {
        if !self.available {
            return false;
        }
        let period = self.period.value();
        if period > 0.0 {
            self.remaining = period;
            self.remaining_ratio = 1.0;
            self.available = false;
        }
        true
    }

    /// Advances the cooldown. Returns true when it became available during this tick.
    pub fn tick(&mut self, time: UpdateTime) -> bool {
        if self.available {
            return false;
        }
        self.remaining -= time.elapsed;
        if self.remaining <= 0.0 {
            self.reset();
            return true;
        }
        let period = self.period.value();
        self.remaining_ratio = if period > 0.0 {
            (self.remaining / period).min(1.0)
        } else {
            0.0
        };
        false
    }

    /// Makes the cooldown available immediately.
    pub fn reset(&mut self) {
        self.remaining = 0.0;
        self.remaining_ratio = 0.0;
        self.available = true;
    }
}

impl Default for Cooldown {
    fn default() -> Self {
        Self::new(0.0)
    }
}
