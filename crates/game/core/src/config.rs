/// Engine constants and tunable parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// Modifier magnitudes above this threshold (and zero) are treated as
    /// additive when no operation is given; smaller magnitudes are
    /// multiplicative fractions.
    pub additive_threshold: f64,

    /// Upper bound on readiness recomputation passes after a mutation.
    pub max_settle_passes: u32,
}

impl EngineConfig {
    // ===== compile-time constants =====
    /// Decimal places kept on a statistic's multiply total.
    pub const MULTIPLY_PRECISION: u32 = 4;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_ADDITIVE_THRESHOLD: f64 = 1.0;
    pub const DEFAULT_MAX_SETTLE_PASSES: u32 = 8;

    pub fn new() -> Self {
        Self {
            additive_threshold: Self::DEFAULT_ADDITIVE_THRESHOLD,
            max_settle_passes: Self::DEFAULT_MAX_SETTLE_PASSES,
        }
    }

    pub fn with_additive_threshold(mut self, threshold: f64) -> Self {
        self.additive_threshold = threshold;
        self
    }

    pub fn with_max_settle_passes(mut self, passes: u32) -> Self {
        self.max_settle_passes = passes.max(1);
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}
