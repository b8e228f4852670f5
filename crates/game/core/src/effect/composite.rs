use crate::state::EffectId;

/// Ordered group of child effects applied and removed together.
///
/// Children are independent effects in the world arena: persisting a
/// composite persists each child on the same entity (subject to the usual
/// unique-id arbitration), so the holder's persistent set gains one entry per
/// child in addition to the composite itself.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompositeEffect {
    pub(crate) children: Vec<EffectId>,
}

impl CompositeEffect {
    pub fn new(children: Vec<EffectId>) -> Self {
        Self { children }
    }

    pub fn children(&self) -> &[EffectId] {
        &self.children
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}
