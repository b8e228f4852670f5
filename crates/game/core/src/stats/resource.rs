//! Consumable pool (HP, mana, ammo) bounded by two statistics.
//!
//! Invariant: `min.value() <= current <= max.value()` after every mutation.
//! A change to the maximum shifts `current` by the same delta before
//! clamping, so a +50 max HP bonus also grants 50 current HP and removing it
//! takes them back.

use super::cooldown::{Cooldown, UpdateTime};
use super::statistic::{StatError, Statistic};
use super::value::ValueSource;

#[derive(Clone, Debug, PartialEq)]
pub struct Resource {
    current: f64,
    min: Statistic,
    max: Statistic,
    cooldown: Cooldown,
}

impl Resource {
    pub fn new(current: f64, max: f64) -> Self {
        let mut resource = Self {
            current,
            min: Statistic::new(0.0),
            max: Statistic::new(max),
            cooldown: Cooldown::default(),
        };
        resource.clamp();
        resource
    }

    /// Resource starting at its maximum.
    pub fn full(max: f64) -> Self {
        Self::new(max, max)
    }

    pub fn with_min(mut self, min: f64) -> Result<Self, StatError> {
        if !(min <= self.max.value()) {
            return Err(StatError::InvalidRange {
                min,
                max: self.max.value(),
            });
        }
        self.min.set_base(min);
        self.clamp();
        Ok(self)
    }

    pub fn with_cooldown(mut self, period_ms: f64) -> Self {
        self.cooldown.set_period(period_ms);
        self
    }

    pub fn current(&self) -> f64 {
        self.current
    }

    pub fn min(&self) -> &Statistic {
        &self.min
    }

    pub fn max(&self) -> &Statistic {
        &self.max
    }

    pub fn cooldown(&self) -> &Cooldown {
        &self.cooldown
    }

    pub fn set_cooldown_period(&mut self, period_ms: f64) {
        self.cooldown.set_period(period_ms);
    }

    /// Available when the resource's own cooldown is not running.
    pub fn is_available(&self) -> bool {
        self.cooldown.is_available()
    }

    pub fn is_max(&self) -> bool {
        self.current >= self.max.value()
    }

    pub fn is_min(&self) -> bool {
        self.current <= self.min.value()
    }

    pub fn set_current(&mut self, current: f64) {
        self.current = current;
        self.clamp();
    }

    pub fn adjust_current(&mut self, delta: f64) {
        self.set_current(self.current + delta);
    }

    pub fn fill_to_max(&mut self) {
        self.current = self.max.value();
        self.clamp();
    }

    /// Mutates the maximum statistic, moving `current` by the resulting delta.
    pub fn update_max<R>(&mut self, f: impl FnOnce(&mut Statistic) -> R) -> R {
        let before = self.max.value();
        let result = f(&mut self.max);
        let delta = self.max.value() - before;
        self.current += delta;
        self.clamp();
        result
    }

    /// Mutates the minimum statistic; `current` is only clamped.
    pub fn update_min<R>(&mut self, f: impl FnOnce(&mut Statistic) -> R) -> R {
        let result = f(&mut self.min);
        self.clamp();
        result
    }

    pub fn set_max_base(&mut self, max: f64) {
        self.update_max(|stat| stat.set_base(max));
    }

    pub fn set_min_base(&mut self, min: f64) {
        self.update_min(|stat| stat.set_base(min));
    }

    /// Spends `amount` if the resource is available and holds at least that
    /// much, starting its cooldown. Check and deduction happen under one
    /// exclusive borrow.
    pub fn consume(&mut self, amount: f64) -> bool {
        if !self.is_available() || self.current < amount {
            return false;
        }
        self.current -= amount;
        self.clamp();
        self.cooldown.trigger();
        true
    }

    /// Starts the resource's cooldown without spending anything.
    pub fn trigger_cooldown(&mut self) -> bool {
        self.cooldown.trigger()
    }

    pub fn tick(&mut self, time: UpdateTime) -> bool {
        self.cooldown.tick(time)
    }

    fn clamp(&mut self) {
        let max = self.max.value();
        let min = self.min.value();
        if self.current >= max {
            self.current = max;
        } else if self.current <= min {
            self.current = min;
        }
    }
}

impl ValueSource for Resource {
    fn value(&self) -> f64 {
        self.current
    }
}

impl Default for Resource {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_is_clamped_to_bounds() {
        let mut resource = Resource::full(100.0);
        resource.set_current(150.0);
        assert_eq!(resource.current(), 100.0);
        assert!(resource.is_max());

        resource.set_current(-150.0);
        assert_eq!(resource.current(), 0.0);
        assert!(resource.is_min());
    }

    #[test]
    fn increasing_max_grants_the_difference() {
        let mut resource = Resource::default();
        resource.set_max_base(100.0);
        assert_eq!(resource.current(), 100.0);

        resource.set_current(90.0);
        resource.set_max_base(150.0);
        assert_eq!(resource.current(), 140.0);
    }

    #[test]
    fn reducing_max_takes_the_difference() {
        let mut resource = Resource::full(100.0);
        resource.set_max_base(50.0);
        assert_eq!(resource.current(), 50.0);

        resource.set_current(10.0);
        resource.set_max_base(30.0);
        assert_eq!(resource.current(), 0.0);
    }

    #[test]
    fn raising_min_pulls_current_up() {
        let mut resource = Resource::new(5.0, 100.0);
        resource.set_min_base(20.0);
        assert_eq!(resource.current(), 20.0);
    }

    #[test]
    fn consume_checks_amount_and_cooldown() {
        let mut resource = Resource::full(100.0).with_cooldown(1000.0);
        assert!(!resource.consume(150.0));
        assert_eq!(resource.current(), 100.0);

        assert!(resource.consume(40.0));
        assert_eq!(resource.current(), 60.0);
        assert!(!resource.is_available());
        assert!(!resource.consume(10.0));

        assert!(resource.tick(UpdateTime::new(1000.0, 1000.0)));
        assert!(resource.consume(10.0));
        assert_eq!(resource.current(), 50.0);
    }

    #[test]
    fn consuming_nothing_from_empty_default_succeeds() {
        let mut resource = Resource::default();
        assert!(resource.consume(0.0));
        assert!(resource.is_available());
    }

    #[test]
    fn min_above_max_is_rejected() {
        assert!(Resource::full(10.0).with_min(20.0).is_err());
    }
}
