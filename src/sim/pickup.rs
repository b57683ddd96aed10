//! Drop items left behind by destroyed enemies

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::circles_overlap;
use crate::consts::PICKUP_FALL_SPEED;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickupKind {
    /// +1 hit point
    Heal,
    /// +1 weapon power
    LevelUp,
    /// Player bullets turn blue
    BlueBullets,
    /// Player bullets turn violet
    VioletBullets,
}

impl PickupKind {
    pub fn texture_key(self) -> &'static str {
        match self {
            PickupKind::Heal => "item_heal",
            PickupKind::LevelUp => "item_level_up",
            PickupKind::BlueBullets => "item_blue",
            PickupKind::VioletBullets => "item_violet",
        }
    }

    /// Map a uniform roll in [0, 1) to an item kind
    pub fn from_roll(roll: f32) -> Self {
        if roll < 0.3 {
            PickupKind::Heal
        } else if roll < 0.5 {
            PickupKind::LevelUp
        } else if roll < 0.75 {
            PickupKind::BlueBullets
        } else {
            PickupKind::VioletBullets
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pickup {
    pub id: u32,
    pub kind: PickupKind,
    pub pos: Vec2,
    collected: bool,
}

impl Pickup {
    pub fn new(id: u32, kind: PickupKind, pos: Vec2) -> Self {
        Self {
            id,
            kind,
            pos,
            collected: false,
        }
    }

    #[inline]
    pub fn is_collected(&self) -> bool {
        self.collected
    }

    /// Mark collected. Returns false if it already was.
    pub fn collect(&mut self) -> bool {
        if self.collected {
            return false;
        }
        self.collected = true;
        true
    }

    /// Player center inside the pickup's reach; never true once collected
    pub fn touches(&self, player_pos: Vec2, player_radius: f32) -> bool {
        !self.collected && circles_overlap(self.pos, 0.0, player_pos, player_radius)
    }
}

/// Owns the live pickups
#[derive(Debug, Clone, Default)]
pub struct PickupField {
    items: Vec<Pickup>,
    next_id: u32,
}

impl PickupField {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            next_id: 1,
        }
    }

    pub fn spawn(&mut self, kind: PickupKind, pos: Vec2) -> u32 {
        let id = self.next_id.max(1);
        self.next_id = id + 1;
        self.items.push(Pickup::new(id, kind, pos));
        id
    }

    /// Roll an enemy's drop. Returns the kind if something drops.
    pub fn roll_drop<R: Rng>(rng: &mut R, drop_rate: f32) -> Option<PickupKind> {
        let chance: f32 = rng.random();
        if chance >= drop_rate {
            return None;
        }
        Some(PickupKind::from_roll(rng.random()))
    }

    /// Items drift down the screen
    pub fn advance(&mut self) {
        for item in self.items.iter_mut().filter(|i| !i.collected) {
            item.pos.y += PICKUP_FALL_SPEED;
        }
    }

    /// Drop collected items and those that fell off the bottom
    pub fn cleanup(&mut self, screen_height: f32, margin: f32) {
        self.items
            .retain(|i| !i.collected && i.pos.y <= screen_height + margin);
    }

    pub fn items(&self) -> &[Pickup] {
        &self.items
    }

    pub(crate) fn items_mut(&mut self) -> &mut [Pickup] {
        &mut self.items
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_collect_idempotent() {
        let mut item = Pickup::new(1, PickupKind::Heal, Vec2::ZERO);
        assert!(item.collect());
        assert!(!item.collect());
        assert!(item.is_collected());
        assert!(!item.touches(Vec2::ZERO, 20.0));
    }

    #[test]
    fn test_touch_uses_player_radius() {
        let item = Pickup::new(1, PickupKind::LevelUp, Vec2::new(0.0, 19.0));
        assert!(item.touches(Vec2::ZERO, 20.0));
        assert!(!item.touches(Vec2::new(0.0, -2.0), 20.0));
    }

    #[test]
    fn test_kind_rolls() {
        assert_eq!(PickupKind::from_roll(0.1), PickupKind::Heal);
        assert_eq!(PickupKind::from_roll(0.4), PickupKind::LevelUp);
        assert_eq!(PickupKind::from_roll(0.6), PickupKind::BlueBullets);
        assert_eq!(PickupKind::from_roll(0.9), PickupKind::VioletBullets);
    }

    #[test]
    fn test_drop_rate_bounds() {
        let mut rng = Pcg32::seed_from_u64(42);
        for _ in 0..100 {
            assert!(PickupField::roll_drop(&mut rng, 0.0).is_none());
            assert!(PickupField::roll_drop(&mut rng, 1.0).is_some());
        }
    }

    #[test]
    fn test_cleanup() {
        let mut field = PickupField::new();
        let a = field.spawn(PickupKind::Heal, Vec2::new(10.0, 10.0));
        field.spawn(PickupKind::Heal, Vec2::new(10.0, 700.0));
        field.spawn(PickupKind::LevelUp, Vec2::new(50.0, 50.0));
        field.items_mut()[0].collect();
        field.cleanup(600.0, 50.0);
        assert_eq!(field.items().len(), 1);
        assert_ne!(field.items()[0].id, a);
        assert_eq!(field.items()[0].kind, PickupKind::LevelUp);
    }

    #[test]
    fn test_items_fall() {
        let mut field = PickupField::new();
        field.spawn(PickupKind::Heal, Vec2::new(10.0, 10.0));
        field.advance();
        assert_eq!(field.items()[0].pos.y, 11.0);
    }
}
