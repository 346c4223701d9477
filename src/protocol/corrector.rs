//! Identifier delta correction.
//!
//! Some identifiers sent by the server (action ids, icon ids) carry an extra
//! offset that changes on relogs and zone transfers. Spell-type action effects
//! contain both the offset id and the true animation id, so every such message
//! recalibrates the offset; every other decoder subtracts the current value.

use tracing::info;

/// A change of the identifier delta
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeltaTransition {
    pub previous: i32,
    pub current: i32,
}

/// Owner of the identifier delta; starts at 0 and is never reset
#[derive(Debug, Default)]
pub struct IdentifierCorrector {
    delta: i32,
}

impl IdentifierCorrector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delta(&self) -> i32 {
        self.delta
    }

    /// Recalibrate from a spell-type action-effect header.
    ///
    /// Must run before the same message's identifiers are corrected so that
    /// the triggering event resolves to exactly `animation_id`.
    pub fn observe_spell_effect(
        &mut self,
        encoded_action_id: u32,
        animation_id: u16,
    ) -> Option<DeltaTransition> {
        let candidate = (encoded_action_id as i32).wrapping_sub(animation_id as i32);
        if candidate == self.delta {
            return None;
        }
        let transition = DeltaTransition {
            previous: self.delta,
            current: candidate,
        };
        info!(
            previous = transition.previous,
            current = transition.current,
            "Updating network identifier delta"
        );
        self.delta = candidate;
        Some(transition)
    }

    /// Remove the current delta from an encoded identifier
    #[inline]
    pub fn correct(&self, encoded: u32) -> u32 {
        encoded.wrapping_sub(self.delta as u32)
    }
}
