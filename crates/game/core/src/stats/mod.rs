//! Numeric building blocks of the engine.
//!
//! ```text
//! [ Statistic ]   base → (base + add) × multiply → clamp(min, max)
//!      ↓
//! [ Resource ]    current ∈ [min.value, max.value], optional Cooldown
//!      ↓
//! [ Cooldown ]    period Statistic + remaining time
//! [ Timer ]       total span with optional periodic ticks
//! ```
//!
//! Everything here is plain data mutated through `&mut self`; the world owns
//! the instances and decides when to tick them.

pub mod cooldown;
pub mod resource;
pub mod statistic;
pub mod timer;
pub mod value;

pub use cooldown::{Cooldown, UpdateTime};
pub use resource::Resource;
pub use statistic::{StatError, Statistic};
pub use timer::{Timer, TimerProgress};
pub use value::{NetEffect, ValueSource, ValueSourceDescriptor};
