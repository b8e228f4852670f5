use crate::stats::Timer;

/// Emits a tick every `period` milliseconds for `total` milliseconds while
/// persisted. Periodic effects have no instant form.
#[derive(Clone, Debug, PartialEq)]
pub struct PeriodicEffect {
    total: f64,
    period: f64,
    call_initially: bool,
    pub(crate) timer: Option<Timer>,
}

impl PeriodicEffect {
    pub fn new(total_ms: f64, period_ms: f64, call_initially: bool) -> Self {
        Self {
            total: total_ms,
            period: period_ms,
            call_initially,
            timer: None,
        }
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn period(&self) -> f64 {
        self.period
    }

    /// Whether activation fires a tick (period 0) before any time passes.
    pub fn call_initially(&self) -> bool {
        self.call_initially
    }

    pub fn is_running(&self) -> bool {
        self.timer.as_ref().is_some_and(|timer| !timer.is_finished())
    }

    pub fn ticks_fired(&self) -> u32 {
        self.timer.as_ref().map_or(0, Timer::periods_fired)
    }

    pub(crate) fn start(&mut self) {
        self.timer = Some(Timer::periodic(self.total, self.period));
    }

    pub(crate) fn stop(&mut self) {
        self.timer = None;
    }
}
