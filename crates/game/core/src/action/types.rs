//! Core action types.
//!
//! - `Action`: a named ability with requirements, effects and timing
//! - `ActionState`: the readiness state machine
//! - `ActionResult`: outcome of an execution attempt
//! - `ActionTarget`: who an execution is aimed at

use crate::state::EntityId;
use crate::stats::{Cooldown, Statistic, Timer, UpdateTime, ValueSource};

use super::effect::ActionEffect;
use super::error::ActionError;
use super::requirement::Requirement;

// ============================================================================
// Action State
// ============================================================================

/// ```text
/// OnCooldown ──(all requirements met)──▶ Ready ──begin_targeting──▶ Targeting
///     ▲                                    │                          │
///     │                               begin_cast                 begin_cast
///     │                                    ▼                          │
///     └──(finished / cancelled)──── Casting ◀─────────────────────────┘
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionState {
    #[default]
    OnCooldown,
    Ready,
    Targeting,
    Casting,
}

impl ActionState {
    /// Targeting and casting are driven by the host, not by readiness.
    pub fn is_busy(self) -> bool {
        matches!(self, Self::Targeting | Self::Casting)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CastOutcome {
    Completed,
    Cancelled,
    Interrupted,
}

// ============================================================================
// Action Result / Target
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionResult {
    success: bool,
    message: Option<String>,
}

impl ActionResult {
    pub fn success() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ActionTarget {
    /// The executing entity itself.
    #[default]
    Actor,
    Entity(EntityId),
    Entities(Vec<EntityId>),
}

impl ActionTarget {
    pub fn resolve(&self, actor: EntityId) -> Vec<EntityId> {
        match self {
            Self::Actor => vec![actor],
            Self::Entity(entity) => vec![*entity],
            Self::Entities(entities) => entities.clone(),
        }
    }
}

// ============================================================================
// Action
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
pub struct Action {
    name: String,
    display_name: Option<String>,
    description: Option<String>,
    pub(crate) owner: Option<EntityId>,
    pub(crate) requirements: Vec<Requirement>,
    begin_effects: Vec<ActionEffect>,
    periodic_effects: Vec<ActionEffect>,
    end_effects: Vec<ActionEffect>,
    pub(crate) cooldown: Cooldown,
    cast_time: Option<Statistic>,
    period_time: Option<Statistic>,
    cast_timer: Option<Timer>,
    state: ActionState,
}

impl Action {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_name: None,
            description: None,
            owner: None,
            requirements: vec![Requirement::internal_cooldown()],
            begin_effects: Vec::new(),
            periodic_effects: Vec::new(),
            end_effects: Vec::new(),
            cooldown: Cooldown::default(),
            cast_time: None,
            period_time: None,
            cast_timer: None,
            state: ActionState::Ready,
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_cooldown(mut self, period_ms: f64) -> Result<Self, ActionError> {
        self.set_cooldown(period_ms)?;
        Ok(self)
    }

    pub fn with_requirement(mut self, requirement: Requirement) -> Self {
        self.requirements.push(requirement);
        self.refresh_readiness();
        self
    }

    pub fn with_begin_effect(mut self, effect: ActionEffect) -> Self {
        self.begin_effects.push(effect);
        self
    }

    pub fn with_periodic_effect(mut self, effect: ActionEffect) -> Self {
        self.periodic_effects.push(effect);
        self
    }

    pub fn with_end_effect(mut self, effect: ActionEffect) -> Self {
        self.end_effects.push(effect);
        self
    }

    pub fn with_cast_time(mut self, cast_ms: f64) -> Self {
        self.cast_time = Some(Statistic::new(cast_ms));
        self
    }

    /// Interval of periodic effects while casting.
    pub fn with_period_time(mut self, period_ms: f64) -> Self {
        self.period_time = Some(Statistic::new(period_ms));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn owner(&self) -> Option<EntityId> {
        self.owner
    }

    /// Requirements in order; index 0 is always the internal cooldown.
    pub fn requirements(&self) -> &[Requirement] {
        &self.requirements
    }

    pub fn begin_effects(&self) -> &[ActionEffect] {
        &self.begin_effects
    }

    pub fn periodic_effects(&self) -> &[ActionEffect] {
        &self.periodic_effects
    }

    pub fn end_effects(&self) -> &[ActionEffect] {
        &self.end_effects
    }

    pub fn cooldown(&self) -> &Cooldown {
        &self.cooldown
    }

    pub fn cast_time(&self) -> Option<&Statistic> {
        self.cast_time.as_ref()
    }

    pub fn period_time(&self) -> Option<&Statistic> {
        self.period_time.as_ref()
    }

    pub fn cast_timer(&self) -> Option<&Timer> {
        self.cast_timer.as_ref()
    }

    pub fn state(&self) -> ActionState {
        self.state
    }

    pub fn can_execute(&self) -> bool {
        self.state == ActionState::Ready
    }

    pub fn requirements_met(&self) -> bool {
        self.requirements.iter().all(Requirement::is_met)
    }

    /// First unmet requirement's message.
    pub fn unmet_reason(&self) -> Option<String> {
        self.requirements
            .iter()
            .find(|requirement| !requirement.is_met())
            .map(Requirement::error_message)
    }

    pub fn set_cooldown(&mut self, period_ms: f64) -> Result<(), ActionError> {
        if period_ms < 0.0 || period_ms.is_nan() {
            return Err(ActionError::NegativeCooldown(period_ms));
        }
        self.cooldown.set_period(period_ms);
        Ok(())
    }

    pub fn cooldown_mut(&mut self) -> &mut Cooldown {
        &mut self.cooldown
    }

    pub fn cast_time_mut(&mut self) -> Option<&mut Statistic> {
        self.cast_time.as_mut()
    }

    pub fn requirements_mut(&mut self) -> &mut [Requirement] {
        &mut self.requirements
    }

    /// Enters `Casting` from any state and (re)starts the cast timer.
    /// Returns false only when the action has no cast time.
    pub fn begin_cast(&mut self) -> bool {
        let Some(cast_time) = &self.cast_time else {
            return false;
        };
        let total = cast_time.value().max(0.0);
        let timer = match &self.period_time {
            Some(period) => Timer::periodic(total, period.value()),
            None => Timer::new(total),
        };
        self.cast_timer = Some(timer);
        self.state = ActionState::Casting;
        true
    }

    /// Stops an in-progress cast. Returns `None` if the action is not casting.
    pub fn cancel_cast(&mut self, interrupt: bool) -> Option<CastOutcome> {
        if self.state != ActionState::Casting {
            return None;
        }
        if let Some(timer) = &mut self.cast_timer {
            timer.pause();
        }
        self.state = ActionState::OnCooldown;
        self.refresh_readiness();
        Some(if interrupt {
            CastOutcome::Interrupted
        } else {
            CastOutcome::Cancelled
        })
    }

    pub fn begin_targeting(&mut self) -> bool {
        if self.state != ActionState::Ready {
            return false;
        }
        self.state = ActionState::Targeting;
        true
    }

    pub fn end_targeting(&mut self) -> bool {
        if self.state != ActionState::Targeting {
            return false;
        }
        self.state = ActionState::OnCooldown;
        self.refresh_readiness();
        true
    }

    /// Advances the internal cooldown and any running cast. Returns the cast
    /// periods that elapsed and whether the cast completed.
    pub(crate) fn advance(&mut self, time: UpdateTime) -> (Vec<u32>, bool) {
        self.cooldown.tick(time);
        if self.state != ActionState::Casting {
            return (Vec::new(), false);
        }
        let Some(timer) = &mut self.cast_timer else {
            return (Vec::new(), false);
        };
        let progress = timer.advance(time);
        if progress.completed {
            self.state = ActionState::OnCooldown;
        }
        (progress.periods, progress.completed)
    }

    /// Re-derives readiness from the cached requirement results. Returns the
    /// transition if the state changed.
    pub(crate) fn refresh_readiness(&mut self) -> Option<(ActionState, ActionState)> {
        if self.state.is_busy() {
            return None;
        }
        let next = if self.requirements_met() {
            ActionState::Ready
        } else {
            ActionState::OnCooldown
        };
        let previous = std::mem::replace(&mut self.state, next);
        (previous != next).then_some((previous, next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_action_is_ready() {
        let action = Action::new("Slash");
        assert_eq!(action.state(), ActionState::Ready);
        assert!(action.can_execute());
        assert_eq!(action.requirements().len(), 1);
    }

    #[test]
    fn unbound_requirement_blocks_readiness() {
        let action = Action::new("Fireball").with_requirement(Requirement::resource("Mana", 10.0));
        assert_eq!(action.state(), ActionState::OnCooldown);
        assert_eq!(action.unmet_reason().as_deref(), Some("Needs at least 10 Mana"));
    }

    #[test]
    fn negative_cooldown_is_rejected() {
        let err = Action::new("Slash").with_cooldown(-1.0).unwrap_err();
        assert_eq!(err, ActionError::NegativeCooldown(-1.0));
    }

    #[test]
    fn cast_requires_cast_time() {
        let mut instant = Action::new("Slash");
        assert!(!instant.begin_cast());

        let mut channel = Action::new("Blizzard")
            .with_cast_time(3000.0)
            .with_period_time(1000.0);
        assert!(channel.begin_cast());
        assert_eq!(channel.state(), ActionState::Casting);

        let (periods, completed) = channel.advance(UpdateTime::new(2000.0, 2000.0));
        assert_eq!(periods, vec![1, 2]);
        assert!(!completed);

        let (periods, completed) = channel.advance(UpdateTime::new(1000.0, 3000.0));
        assert_eq!(periods, vec![3]);
        assert!(completed);
        assert_eq!(channel.state(), ActionState::OnCooldown);
    }

    #[test]
    fn cancel_reports_outcome() {
        let mut action = Action::new("Heal").with_cast_time(1500.0);
        assert_eq!(action.cancel_cast(false), None);

        action.begin_cast();
        assert_eq!(action.cancel_cast(true), Some(CastOutcome::Interrupted));
        assert_eq!(action.state(), ActionState::Ready);
    }

    #[test]
    fn targeting_round_trip() {
        let mut action = Action::new("Blink");
        assert!(action.begin_targeting());
        assert_eq!(action.state(), ActionState::Targeting);
        assert!(!action.can_execute());
        assert!(action.end_targeting());
        assert_eq!(action.state(), ActionState::Ready);
    }

    #[test]
    fn targeting_leads_into_a_cast() {
        let mut action = Action::new("Meteor").with_cast_time(1000.0);
        assert!(action.begin_targeting());
        assert!(action.begin_cast());
        assert_eq!(action.state(), ActionState::Casting);

        let (_, completed) = action.advance(UpdateTime::new(1000.0, 1000.0));
        assert!(completed);
        assert_eq!(action.state(), ActionState::OnCooldown);
    }

    #[test]
    fn recasting_restarts_the_timer() {
        let mut action = Action::new("Channel").with_cast_time(1000.0);
        assert!(action.begin_cast());
        let (_, completed) = action.advance(UpdateTime::new(600.0, 600.0));
        assert!(!completed);

        assert!(action.begin_cast());
        let (_, completed) = action.advance(UpdateTime::new(600.0, 1200.0));
        assert!(!completed);
        assert_eq!(action.state(), ActionState::Casting);
    }
}
