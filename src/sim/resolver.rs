//! Per-frame combat resolution
//!
//! Runs after every entity has advanced. Passes run in a fixed order and each
//! one only sees what earlier passes left alive:
//! 1. player projectiles vs enemies
//! 2. hostile projectiles vs player
//! 3. player body vs enemy bodies
//! 4. player vs pickups
//!
//! Area attacks are resolved separately by `resolve_area_effect` at the
//! moment they fire.
//!
//! Nothing is removed here. Hits only flag entities; cleanup happens later in
//! the frame.

use super::actor::{Actor, ActorTag, AreaEffect, DamageOutcome};
use super::collision::circles_overlap;
use super::event::GameEvent;
use super::pickup::{PickupField, PickupKind};
use super::projectile::{BulletStyle, Faction, ProjectileManager};

/// Damage any hostile shot deals to the player; `damage` is only reported
const SHOT_DAMAGE: u32 = 1;
/// Damage a body collision deals to the player
const CONTACT_DAMAGE: u32 = 1;
/// Damage a boss area attack deals to the player
const AREA_DAMAGE: u32 = 1;

/// Mutable view over everything the combat passes touch. Lives for one call.
pub struct CombatFrame<'a> {
    pub player: &'a mut Actor,
    pub enemies: &'a mut [Actor],
    pub projectiles: &'a mut ProjectileManager,
    pub pickups: &'a mut PickupField,
    pub events: &'a mut Vec<GameEvent>,
}

impl CombatFrame<'_> {
    /// Run passes 1-4 in order
    pub fn resolve(&mut self) {
        self.projectiles_vs_enemies();
        self.projectiles_vs_player();
        self.player_vs_enemies();
        self.player_vs_pickups();
    }

    /// Pass 1. First enemy in list order wins; one hit per projectile.
    pub fn projectiles_vs_enemies(&mut self) {
        for projectile in self.projectiles.active_mut() {
            if projectile.is_destroyed() || projectile.faction != Faction::Player {
                continue;
            }
            let Some(enemy) = self
                .enemies
                .iter_mut()
                .find(|e| !e.is_destroyed() && projectile.overlaps(e.pos, e.radius))
            else {
                continue;
            };

            let outcome = enemy.apply_damage(projectile.damage);
            projectile.destroy();
            log::debug!(
                "Projectile #{} hit {} #{} for {} ({:?})",
                projectile.id,
                enemy.tag().asset_key(),
                enemy.id,
                projectile.damage,
                outcome
            );
            self.events.push(GameEvent::BulletHit {
                projectile_id: projectile.id,
                target_id: enemy.id,
                damage: projectile.damage,
            });
            if enemy.tag() == ActorTag::Boss && outcome != DamageOutcome::Ignored {
                self.events.push(GameEvent::BossDamaged {
                    hp: enemy.hp(),
                    max_hp: enemy.max_hp(),
                });
            }
        }
    }

    /// Pass 2. Shots are spent even when the player is invulnerable.
    pub fn projectiles_vs_player(&mut self) {
        for projectile in self.projectiles.active_mut() {
            if self.player.is_destroyed() {
                return;
            }
            if projectile.is_destroyed() || !projectile.faction.targets_player() {
                continue;
            }
            if !projectile.overlaps(self.player.pos, self.player.radius) {
                continue;
            }
            let outcome = self.player.apply_damage(SHOT_DAMAGE);
            projectile.destroy();
            log::debug!("Player hit by projectile #{} ({:?})", projectile.id, outcome);
            self.events.push(GameEvent::PlayerHit {
                projectile_id: projectile.id,
                damage: projectile.damage,
            });
        }
    }

    /// Pass 3. At most one enemy body damages the player per frame.
    pub fn player_vs_enemies(&mut self) {
        if self.player.is_destroyed() || self.player.is_invulnerable() {
            return;
        }
        let player_pos = self.player.pos;
        let player_radius = self.player.radius;
        let Some(enemy) = self
            .enemies
            .iter()
            .find(|e| !e.is_destroyed() && circles_overlap(player_pos, player_radius, e.pos, e.radius))
        else {
            return;
        };
        self.player.apply_damage(CONTACT_DAMAGE);
        log::debug!("Player collided with {} #{}", enemy.tag().asset_key(), enemy.id);
        self.events.push(GameEvent::PlayerCollision { enemy_id: enemy.id });
    }

    /// Pass 4
    pub fn player_vs_pickups(&mut self) {
        if self.player.is_destroyed() {
            return;
        }
        for item in self.pickups.items_mut() {
            if !item.touches(self.player.pos, self.player.radius) || !item.collect() {
                continue;
            }
            match item.kind {
                PickupKind::Heal => self.player.heal(),
                PickupKind::LevelUp => {
                    if let Some(level) = self.player.level_up() {
                        self.events.push(GameEvent::PlayerLevelChanged { level });
                    }
                }
                PickupKind::BlueBullets => self.projectiles.set_player_style(BulletStyle::Blue),
                PickupKind::VioletBullets => self.projectiles.set_player_style(BulletStyle::Violet),
            }
            log::debug!("Collected {:?} #{}", item.kind, item.id);
            self.events.push(GameEvent::ItemCollected {
                item_id: item.id,
                kind: item.kind,
            });
        }
    }
}

/// Boss area attack against the player, checked once when it fires
pub fn resolve_area_effect(
    effect: &AreaEffect,
    player: &mut Actor,
    events: &mut Vec<GameEvent>,
) -> DamageOutcome {
    if player.is_destroyed() || !circles_overlap(effect.origin, effect.radius, player.pos, player.radius) {
        return DamageOutcome::Ignored;
    }
    let outcome = player.apply_damage(AREA_DAMAGE);
    if outcome != DamageOutcome::Ignored {
        events.push(GameEvent::AreaHit {
            source_id: effect.source_id,
            damage: AREA_DAMAGE,
        });
    }
    outcome
}
