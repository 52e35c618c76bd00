//! Timed power-up effects
//!
//! A single slot holds the active effect. Picking up a new power-up replaces
//! whatever is active; expiry is a timestamp checked by the tick, so there is
//! no separate timer that could revoke a freshly granted ability.

use serde::{Deserialize, Serialize};

use super::state::{Player, PowerUpKind};

/// The currently applied effect
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActiveEffect {
    pub kind: PowerUpKind,
    /// Simulation clock (ms) at which the effect ends
    pub expires_at: f64,
}

/// At most one active effect
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EffectSlot {
    active: Option<ActiveEffect>,
}

impl EffectSlot {
    pub fn active(&self) -> Option<&ActiveEffect> {
        self.active.as_ref()
    }

    pub fn is_active(&self, kind: PowerUpKind) -> bool {
        self.active.is_some_and(|effect| effect.kind == kind)
    }

    /// Grant `kind` for `duration_ms` starting at `now`.
    ///
    /// Returns the kind that was replaced, if any. The replaced flag is
    /// cleared before the new one is set, so re-collecting the same kind
    /// simply refreshes it.
    pub fn activate(
        &mut self,
        kind: PowerUpKind,
        now: f64,
        duration_ms: f64,
        player: &mut Player,
    ) -> Option<PowerUpKind> {
        let replaced = self.active.take().map(|previous| {
            player.set_ability(previous.kind, false);
            previous.kind
        });

        player.set_ability(kind, true);
        self.active = Some(ActiveEffect {
            kind,
            expires_at: now + duration_ms,
        });
        replaced
    }

    /// Clear the effect if its time is up; returns the kind that expired
    pub fn expire(&mut self, now: f64, player: &mut Player) -> Option<PowerUpKind> {
        let effect = self.active?;
        if now < effect.expires_at {
            return None;
        }
        self.active = None;
        player.set_ability(effect.kind, false);
        Some(effect.kind)
    }

    /// Drop the effect immediately (run reset)
    pub fn clear(&mut self, player: &mut Player) {
        if let Some(effect) = self.active.take() {
            player.set_ability(effect.kind, false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;

    fn player() -> Player {
        Player::new(&GameConfig::default())
    }

    #[test]
    fn test_activate_sets_flag_and_expiry() {
        let mut slot = EffectSlot::default();
        let mut player = player();

        let replaced = slot.activate(PowerUpKind::Magnet, 1000.0, 4000.0, &mut player);
        assert_eq!(replaced, None);
        assert!(player.has_magnet);
        assert!(!player.has_shield);
        assert_eq!(
            slot.active(),
            Some(&ActiveEffect {
                kind: PowerUpKind::Magnet,
                expires_at: 5000.0
            })
        );
    }

    #[test]
    fn test_expires_exactly_at_deadline() {
        let mut slot = EffectSlot::default();
        let mut player = player();
        slot.activate(PowerUpKind::Shield, 0.0, 3500.0, &mut player);

        assert_eq!(slot.expire(3499.9, &mut player), None);
        assert!(player.has_shield);

        assert_eq!(slot.expire(3500.0, &mut player), Some(PowerUpKind::Shield));
        assert!(!player.has_shield);
        assert!(slot.active().is_none());

        // Nothing left to expire
        assert_eq!(slot.expire(9000.0, &mut player), None);
    }

    #[test]
    fn test_replacement_clears_previous_flag() {
        let mut slot = EffectSlot::default();
        let mut player = player();
        slot.activate(PowerUpKind::Shield, 0.0, 3500.0, &mut player);

        let replaced = slot.activate(PowerUpKind::Magnet, 100.0, 4000.0, &mut player);
        assert_eq!(replaced, Some(PowerUpKind::Shield));
        assert!(!player.has_shield);
        assert!(player.has_magnet);

        // The shield's old deadline must not revoke the magnet
        assert_eq!(slot.expire(3500.0, &mut player), None);
        assert!(player.has_magnet);
        assert_eq!(slot.expire(4100.0, &mut player), Some(PowerUpKind::Magnet));
    }

    #[test]
    fn test_same_kind_refreshes_duration() {
        let mut slot = EffectSlot::default();
        let mut player = player();
        slot.activate(PowerUpKind::Shield, 0.0, 3500.0, &mut player);
        slot.activate(PowerUpKind::Shield, 3000.0, 3500.0, &mut player);

        assert!(player.has_shield);
        assert_eq!(slot.expire(3500.0, &mut player), None);
        assert_eq!(slot.active().map(|e| e.expires_at), Some(6500.0));
    }

    #[test]
    fn test_clear_resets_flag() {
        let mut slot = EffectSlot::default();
        let mut player = player();
        slot.activate(PowerUpKind::Magnet, 0.0, 4000.0, &mut player);
        slot.clear(&mut player);
        assert!(!player.has_magnet);
        assert!(!slot.is_active(PowerUpKind::Magnet));
    }
}
