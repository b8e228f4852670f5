//! Numeric statistic with additive and multiplicative modifier totals.
//!
//! `value = clamp((base + add_total) × multiply_total, min, max)`
//!
//! The multiply total is kept rounded to [`EngineConfig::MULTIPLY_PRECISION`]
//! decimals so that repeated apply/remove of fractional multipliers returns to
//! exactly the original total.

use crate::config::EngineConfig;
use crate::error::{ErrorSeverity, GameError};

use super::value::{NetEffect, ValueSource, round_to};

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum StatError {
    #[error("invalid range: min {min} exceeds max {max}")]
    InvalidRange { min: f64, max: f64 },
}

impl GameError for StatError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidRange { .. } => "STAT_INVALID_RANGE",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Statistic {
    base: f64,
    min: f64,
    max: f64,
    add_total: f64,
    multiply_total: f64,
    value: f64,
    net_effect: NetEffect,
    higher_is_better: bool,
    is_percentage: bool,
}

impl Statistic {
    /// Unbounded statistic with the given base value.
    pub fn new(base: f64) -> Self {
        let mut stat = Self {
            base,
            min: f64::MIN,
            max: f64::MAX,
            add_total: 0.0,
            multiply_total: 1.0,
            value: base,
            net_effect: NetEffect::None,
            higher_is_better: true,
            is_percentage: false,
        };
        stat.refresh();
        stat
    }

    pub fn bounded(base: f64, min: f64, max: f64) -> Result<Self, StatError> {
        let mut stat = Self::new(base);
        stat.set_range(min, max)?;
        Ok(stat)
    }

    /// Percentage statistic where larger is better (e.g. crit chance).
    pub fn percentage(base: f64) -> Self {
        let mut stat = Self::new(base);
        stat.is_percentage = true;
        stat
    }

    /// Percentage statistic where smaller is better (e.g. cast time reduction taken).
    pub fn negative_percentage(base: f64) -> Self {
        let mut stat = Self::percentage(base);
        stat.higher_is_better = false;
        stat
    }

    pub fn with_higher_is_better(mut self, higher_is_better: bool) -> Self {
        self.higher_is_better = higher_is_better;
        self
    }

    pub fn base(&self) -> f64 {
        self.base
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn add_total(&self) -> f64 {
        self.add_total
    }

    pub fn multiply_total(&self) -> f64 {
        self.multiply_total
    }

    pub fn net_effect(&self) -> NetEffect {
        self.net_effect
    }

    pub fn higher_is_better(&self) -> bool {
        self.higher_is_better
    }

    pub fn is_percentage(&self) -> bool {
        self.is_percentage
    }

    pub fn has_modifiers(&self) -> bool {
        self.add_total != 0.0 || self.multiply_total != 1.0
    }

    pub fn set_base(&mut self, base: f64) {
        self.base = base;
        self.refresh();
    }

    /// Sets the lower bound. A bound above the current max is rejected and
    /// leaves the statistic unchanged.
    pub fn set_min(&mut self, min: f64) -> Result<(), StatError> {
        if !(min <= self.max) {
            return Err(StatError::InvalidRange { min, max: self.max });
        }
        self.min = min;
        self.refresh();
        Ok(())
    }

    pub fn set_max(&mut self, max: f64) -> Result<(), StatError> {
        if !(self.min <= max) {
            return Err(StatError::InvalidRange { min: self.min, max });
        }
        self.max = max;
        self.refresh();
        Ok(())
    }

    /// Sets both bounds at once, so a range can move past the old one.
    pub fn set_range(&mut self, min: f64, max: f64) -> Result<(), StatError> {
        if !(min <= max) {
            return Err(StatError::InvalidRange { min, max });
        }
        self.min = min;
        self.max = max;
        self.refresh();
        Ok(())
    }

    pub fn set_add_total(&mut self, total: f64) {
        self.add_total = total;
        self.refresh();
    }

    pub fn set_multiply_total(&mut self, total: f64) {
        self.multiply_total = round_to(total, EngineConfig::MULTIPLY_PRECISION);
        self.refresh();
    }

    pub fn add_to_total(&mut self, delta: f64) {
        self.set_add_total(self.add_total + delta);
    }

    pub fn add_to_multiplier(&mut self, delta: f64) {
        self.set_multiply_total(self.multiply_total + delta);
    }

    /// Drops every modifier contribution.
    pub fn clear_modifiers(&mut self) {
        self.add_total = 0.0;
        self.multiply_total = 1.0;
        self.refresh();
    }

    fn refresh(&mut self) {
        let raw = (self.base + self.add_total) * self.multiply_total;
        // max() then min() never panics, unlike f64::clamp on NaN bounds.
        self.value = raw.max(self.min).min(self.max);
        self.net_effect = if !self.has_modifiers() {
            NetEffect::None
        } else if raw > self.base {
            NetEffect::Positive
        } else if raw < self.base {
            NetEffect::Negative
        } else {
            NetEffect::Neutral
        };
    }
}

impl ValueSource for Statistic {
    fn value(&self) -> f64 {
        self.value
    }
}

impl Default for Statistic {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl From<f64> for Statistic {
    fn from(base: f64) -> Self {
        Self::new(base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_combines_add_then_multiply() {
        let mut stat = Statistic::new(10.0);
        stat.add_to_total(5.0);
        stat.add_to_multiplier(1.0);

        assert_eq!(stat.value(), 30.0);
        assert_eq!(stat.net_effect(), NetEffect::Positive);
    }

    #[test]
    fn value_is_clamped_to_range() {
        let mut stat = Statistic::bounded(50.0, 0.0, 100.0).unwrap();
        stat.add_to_total(80.0);
        assert_eq!(stat.value(), 100.0);

        stat.add_to_total(-200.0);
        assert_eq!(stat.value(), 0.0);
        assert_eq!(stat.net_effect(), NetEffect::Negative);
    }

    #[test]
    fn invalid_range_leaves_state_unchanged() {
        let mut stat = Statistic::bounded(5.0, 0.0, 10.0).unwrap();

        assert_eq!(
            stat.set_min(20.0),
            Err(StatError::InvalidRange {
                min: 20.0,
                max: 10.0
            })
        );
        assert!(stat.set_max(-1.0).is_err());
        assert!(stat.set_min(f64::NAN).is_err());
        assert_eq!(stat.min(), 0.0);
        assert_eq!(stat.max(), 10.0);
        assert_eq!(stat.value(), 5.0);
    }

    #[test]
    fn net_effect_none_only_without_modifiers() {
        let mut stat = Statistic::new(10.0);
        assert_eq!(stat.net_effect(), NetEffect::None);

        stat.add_to_total(5.0);
        stat.add_to_total(-5.0);
        assert_eq!(stat.net_effect(), NetEffect::None);

        stat.add_to_total(10.0);
        stat.add_to_multiplier(-0.5);
        assert_eq!(stat.value(), 10.0);
        assert_eq!(stat.net_effect(), NetEffect::Neutral);
    }

    #[test]
    fn fractional_multipliers_round_trip_exactly() {
        let mut stat = Statistic::new(100.0);
        for _ in 0..3 {
            stat.add_to_multiplier(0.1);
        }
        for _ in 0..3 {
            stat.add_to_multiplier(-0.1);
        }

        assert_eq!(stat.multiply_total(), 1.0);
        assert_eq!(stat.value(), 100.0);
        assert!(!stat.has_modifiers());
    }

    #[test]
    fn percentage_constructors_set_flags() {
        let crit = Statistic::percentage(0.05);
        assert!(crit.is_percentage());
        assert!(crit.higher_is_better());

        let taken = Statistic::negative_percentage(0.2);
        assert!(taken.is_percentage());
        assert!(!taken.higher_is_better());
    }
}
