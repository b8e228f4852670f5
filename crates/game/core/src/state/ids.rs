//! Generational handles into the [`World`](super::World) arenas.
//!
//! A handle stays valid until its slot is removed; a stale handle never
//! aliases a newer occupant of the same slot.

use generational_arena::Index;

macro_rules! arena_handle {
    ($($(#[$meta:meta])* $name:ident;)*) => {
        $(
            $(#[$meta])*
            #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
            pub struct $name(pub(crate) Index);

            impl $name {
                /// Raw slot and generation, for logging.
                pub fn into_raw_parts(self) -> (usize, u64) {
                    self.0.into_raw_parts()
                }
            }

            impl core::fmt::Display for $name {
                fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                    let (slot, generation) = self.0.into_raw_parts();
                    write!(f, "{}#{}v{}", stringify!($name), slot, generation)
                }
            }
        )*
    };
}

arena_handle! {
    /// Handle to a game entity (character, item, accessory).
    EntityId;
    /// Handle to a property, bound or unbound.
    PropertyId;
    /// Handle to an effect instance.
    EffectId;
    /// Handle to an action definition instance.
    ActionId;
    /// Handle to a registered event observer.
    SubscriptionId;
}
