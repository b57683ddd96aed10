//! Actors: the player, basic enemies and the boss
//!
//! A single `Actor` record carries the shared health/state machine. Behavior
//! that differs per kind is dispatched on `ActorKind`.
//!
//! State machine:
//! - `Idle <-> Moving`
//! - `Idle | Moving -> TakingDamage -> Invulnerable -> Idle` (player, non-lethal hit)
//! - `Idle | Moving -> LevelingUp -> Idle` (player)
//! - any -> `Destroyed` (terminal)
//!
//! All waiting is a countdown in milliseconds advanced by `update_timers`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::event::GameEvent;
use crate::assets::AnimationSet;
use crate::consts::*;

/// Eight-way movement direction (screen space, +y down)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

impl Direction {
    /// Unit step per axis (diagonals move on both axes)
    pub fn step(self) -> Vec2 {
        match self {
            Direction::Up => Vec2::new(0.0, -1.0),
            Direction::Down => Vec2::new(0.0, 1.0),
            Direction::Left => Vec2::new(-1.0, 0.0),
            Direction::Right => Vec2::new(1.0, 0.0),
            Direction::UpLeft => Vec2::new(-1.0, -1.0),
            Direction::UpRight => Vec2::new(1.0, -1.0),
            Direction::DownLeft => Vec2::new(-1.0, 1.0),
            Direction::DownRight => Vec2::new(1.0, 1.0),
        }
    }

    /// Build from per-axis intents (-1, 0, 1). None when both are zero.
    pub fn from_axes(dx: i8, dy: i8) -> Option<Self> {
        match (dx.signum(), dy.signum()) {
            (0, -1) => Some(Direction::Up),
            (0, 1) => Some(Direction::Down),
            (-1, 0) => Some(Direction::Left),
            (1, 0) => Some(Direction::Right),
            (-1, -1) => Some(Direction::UpLeft),
            (1, -1) => Some(Direction::UpRight),
            (-1, 1) => Some(Direction::DownLeft),
            (1, 1) => Some(Direction::DownRight),
            _ => None,
        }
    }

    /// Nearest of the eight directions for a movement vector
    pub fn from_vector(v: Vec2) -> Option<Self> {
        if v.length_squared() < f32::EPSILON {
            return None;
        }
        // Octant index, 0 = right, counting toward +y
        let octant = (v.y.atan2(v.x) / std::f32::consts::FRAC_PI_4).round() as i32;
        Some(match octant.rem_euclid(8) {
            0 => Direction::Right,
            1 => Direction::DownRight,
            2 => Direction::Down,
            3 => Direction::DownLeft,
            4 => Direction::Left,
            5 => Direction::UpLeft,
            6 => Direction::Up,
            _ => Direction::UpRight,
        })
    }
}

/// Visual/behavior state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActorState {
    Idle,
    Moving(Direction),
    TakingDamage,
    Invulnerable,
    LevelingUp,
    Destroyed,
}

impl ActorState {
    /// Spritesheet animation name for this state
    pub fn animation_key(self, tag: ActorTag) -> &'static str {
        match (self, tag) {
            (ActorState::Idle, _) => "idle",
            (ActorState::Moving(_), ActorTag::BasicEnemy | ActorTag::Boss) => "move",
            (ActorState::Moving(dir), ActorTag::Player) => match dir {
                Direction::Up => "up",
                Direction::Down => "down",
                Direction::Left => "left",
                Direction::Right => "right",
                Direction::UpLeft => "up_left",
                Direction::UpRight => "up_right",
                Direction::DownLeft => "down_left",
                Direction::DownRight => "down_right",
            },
            (ActorState::TakingDamage, _) => "hit",
            (ActorState::Invulnerable, _) => "immune",
            (ActorState::LevelingUp, _) => "level_up",
            (ActorState::Destroyed, _) => "destroy",
        }
    }

    #[inline]
    fn is_free(self) -> bool {
        matches!(self, ActorState::Idle | ActorState::Moving(_))
    }
}

/// Kind discriminant without payload (events, radius lookups)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActorTag {
    Player,
    BasicEnemy,
    Boss,
}

impl ActorTag {
    /// Collision radius for this kind
    pub fn radius(self) -> f32 {
        match self {
            ActorTag::Player => PLAYER_RADIUS,
            ActorTag::BasicEnemy => ENEMY_RADIUS,
            ActorTag::Boss => BOSS_RADIUS,
        }
    }

    /// Asset key prefix for textures/animations
    pub fn asset_key(self) -> &'static str {
        match self {
            ActorTag::Player => "player",
            ActorTag::BasicEnemy => "crep",
            ActorTag::Boss => "boss",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerData {
    /// Weapon power, 1-based; the fan pattern clamps at `PLAYER_MAX_POWER`
    pub power_level: u32,
    pub fire_cooldown_ms: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyData {
    pub target: Vec2,
    pub moving_to_target: bool,
    /// Chance (0-1) to leave an item on destruction
    pub drop_rate: f32,
    pub fire_cooldown_ms: f32,
}

/// Boss attack sub-state machine, runs alongside the actor state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BossSkill {
    /// Configured interval between attacks
    pub cooldown_ms: f32,
    /// Counts down to the next attack
    pub timer_ms: f32,
    pub attacking: bool,
    /// Remaining time in the current attack
    pub window_ms: f32,
    pub radius: f32,
    pub fire_cooldown_ms: f32,
}

impl BossSkill {
    pub fn new(cooldown_ms: f32) -> Self {
        Self {
            cooldown_ms,
            timer_ms: cooldown_ms,
            attacking: false,
            window_ms: 0.0,
            radius: BOSS_SKILL_RADIUS,
            fire_cooldown_ms: BOSS_FIRE_INTERVAL_MS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ActorKind {
    Player(PlayerData),
    BasicEnemy(EnemyData),
    Boss(BossSkill),
}

/// A point + radius attack resolved at the moment it fires
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AreaEffect {
    pub source_id: u32,
    pub origin: Vec2,
    pub radius: f32,
    pub target: Vec2,
}

/// Requests an enemy makes of its owners during `advance`
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActorIntent {
    FireAimed { origin: Vec2, target: Vec2 },
    FireBurst { origin: Vec2 },
    AreaAttack(AreaEffect),
}

/// Result of `apply_damage`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Invulnerable, already destroyed, or zero damage
    Ignored,
    Survived,
    Destroyed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    pub id: u32,
    pub pos: Vec2,
    hp: u32,
    max_hp: u32,
    pub speed: f32,
    pub radius: f32,
    pub kind: ActorKind,
    state: ActorState,
    /// Last state that had an animation to show
    visual_state: ActorState,
    #[serde(skip)]
    animations: AnimationSet,
    hurt_ms: f32,
    invulnerable_ms: f32,
    level_up_ms: f32,
    destroy_ms: Option<f32>,
    removable: bool,
    drop_pending: bool,
}

impl Actor {
    fn new(id: u32, pos: Vec2, hp: u32, speed: f32, kind: ActorKind, tag: ActorTag) -> Self {
        let hp = hp.max(1);
        Self {
            id,
            pos,
            hp,
            max_hp: hp,
            speed,
            radius: tag.radius(),
            kind,
            state: ActorState::Idle,
            visual_state: ActorState::Idle,
            animations: AnimationSet::default(),
            hurt_ms: 0.0,
            invulnerable_ms: 0.0,
            level_up_ms: 0.0,
            destroy_ms: None,
            removable: false,
            drop_pending: false,
        }
    }

    pub fn player(id: u32, pos: Vec2) -> Self {
        Self::new(
            id,
            pos,
            PLAYER_MAX_HP,
            PLAYER_STEP,
            ActorKind::Player(PlayerData {
                power_level: 1,
                fire_cooldown_ms: 0.0,
            }),
            ActorTag::Player,
        )
    }

    pub fn basic_enemy(
        id: u32,
        pos: Vec2,
        hp: u32,
        speed: f32,
        drop_rate: f32,
        target: Vec2,
    ) -> Self {
        Self::new(
            id,
            pos,
            hp,
            speed,
            ActorKind::BasicEnemy(EnemyData {
                target,
                moving_to_target: false,
                drop_rate: drop_rate.clamp(0.0, 1.0),
                fire_cooldown_ms: ENEMY_FIRE_INTERVAL_MS,
            }),
            ActorTag::BasicEnemy,
        )
    }

    pub fn boss(id: u32, pos: Vec2, hp: u32, speed: f32, skill_cooldown_ms: f32) -> Self {
        Self::new(
            id,
            pos,
            hp,
            speed,
            ActorKind::Boss(BossSkill::new(skill_cooldown_ms)),
            ActorTag::Boss,
        )
    }

    /// Attach the animations available for this actor
    pub fn with_animations(mut self, animations: AnimationSet) -> Self {
        self.animations = animations;
        self
    }

    pub fn tag(&self) -> ActorTag {
        match self.kind {
            ActorKind::Player(_) => ActorTag::Player,
            ActorKind::BasicEnemy(_) => ActorTag::BasicEnemy,
            ActorKind::Boss(_) => ActorTag::Boss,
        }
    }

    pub fn hp(&self) -> u32 {
        self.hp
    }

    pub fn max_hp(&self) -> u32 {
        self.max_hp
    }

    pub fn state(&self) -> ActorState {
        self.state
    }

    pub fn visual_state(&self) -> ActorState {
        self.visual_state
    }

    /// Dead for collision purposes from the moment hp reaches zero
    #[inline]
    pub fn is_destroyed(&self) -> bool {
        self.hp == 0
    }

    #[inline]
    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable_ms > 0.0
    }

    /// Destruction notification has fired; owners may drop it
    #[inline]
    pub fn is_removable(&self) -> bool {
        self.removable
    }

    pub fn power_level(&self) -> u32 {
        match &self.kind {
            ActorKind::Player(p) => p.power_level,
            _ => 1,
        }
    }

    pub fn boss_skill(&self) -> Option<&BossSkill> {
        match &self.kind {
            ActorKind::Boss(skill) => Some(skill),
            _ => None,
        }
    }

    /// Transition to `new_state`. Same-state transitions are no-ops.
    ///
    /// The logical state always advances; the visual state only follows when
    /// an animation exists for it.
    pub fn set_state(&mut self, new_state: ActorState) {
        if self.state == new_state {
            return;
        }
        let key = new_state.animation_key(self.tag());
        if self.animations.has(key) {
            self.visual_state = new_state;
        } else {
            log::warn!(
                "No '{}' animation for {} #{}, keeping previous visual",
                key,
                self.tag().asset_key(),
                self.id
            );
        }
        self.state = new_state;
    }

    /// Subtract hit points. Ignored while invulnerable or destroyed.
    pub fn apply_damage(&mut self, amount: u32) -> DamageOutcome {
        if amount == 0 || self.is_invulnerable() || self.is_destroyed() {
            return DamageOutcome::Ignored;
        }

        self.hp = self.hp.saturating_sub(amount);

        if self.hp == 0 {
            self.hurt_ms = 0.0;
            self.level_up_ms = 0.0;
            self.destroy_ms = Some(DESTRUCTION_DELAY_MS);
            self.drop_pending = matches!(self.kind, ActorKind::BasicEnemy(_));
            self.set_state(ActorState::Destroyed);
            return DamageOutcome::Destroyed;
        }

        if let ActorKind::Player(player) = &mut self.kind {
            player.power_level = player.power_level.saturating_sub(1).max(1);
            self.hurt_ms = DESTRUCTION_DELAY_MS;
            self.invulnerable_ms = DESTRUCTION_DELAY_MS + INVULNERABLE_MS;
            self.level_up_ms = 0.0;
            self.set_state(ActorState::TakingDamage);
        }

        DamageOutcome::Survived
    }

    /// Restore one hit point, capped at max
    pub fn heal(&mut self) {
        if self.is_destroyed() {
            return;
        }
        self.hp = (self.hp + 1).min(self.max_hp);
    }

    /// Raise the player's power level. Returns the new level.
    pub fn level_up(&mut self) -> Option<u32> {
        if self.is_destroyed() {
            return None;
        }
        let ActorKind::Player(player) = &mut self.kind else {
            return None;
        };
        player.power_level += 1;
        let level = player.power_level;
        if self.state.is_free() {
            self.level_up_ms = LEVEL_UP_MS;
            self.set_state(ActorState::LevelingUp);
        }
        Some(level)
    }

    /// Advance countdowns. Emits `Destroyed` once the destruction delay ends.
    pub fn update_timers(&mut self, dt_ms: f32, events: &mut Vec<GameEvent>) {
        if let Some(remaining) = self.destroy_ms.as_mut() {
            if self.removable {
                return;
            }
            *remaining -= dt_ms;
            if *remaining <= 0.0 {
                self.removable = true;
                events.push(GameEvent::Destroyed {
                    id: self.id,
                    tag: self.tag(),
                    pos: self.pos,
                });
            }
            return;
        }

        if self.hurt_ms > 0.0 {
            self.hurt_ms -= dt_ms;
            if self.hurt_ms <= 0.0 {
                self.hurt_ms = 0.0;
                self.set_state(ActorState::Invulnerable);
            }
        }

        if self.invulnerable_ms > 0.0 {
            self.invulnerable_ms -= dt_ms;
            if self.invulnerable_ms <= 0.0 {
                self.invulnerable_ms = 0.0;
                if self.state == ActorState::Invulnerable {
                    self.set_state(ActorState::Idle);
                }
            }
        }

        if self.level_up_ms > 0.0 {
            self.level_up_ms -= dt_ms;
            if self.level_up_ms <= 0.0 {
                self.level_up_ms = 0.0;
                if self.state == ActorState::LevelingUp {
                    self.set_state(ActorState::Idle);
                }
            }
        }
    }

    /// Move the player one step, clamped to the playfield
    pub fn step(&mut self, direction: Option<Direction>, bounds: Vec2) {
        if self.is_destroyed() {
            return;
        }
        match direction {
            Some(dir) => {
                self.pos = (self.pos + dir.step() * self.speed).clamp(Vec2::ZERO, bounds);
                if self.state.is_free() {
                    self.set_state(ActorState::Moving(dir));
                }
            }
            None => {
                if matches!(self.state, ActorState::Moving(_)) {
                    self.set_state(ActorState::Idle);
                }
            }
        }
    }

    /// Count down the player's auto-fire. True when a volley should spawn.
    pub fn ready_to_fire(&mut self, dt_ms: f32, trigger_held: bool) -> bool {
        if self.is_destroyed() {
            return false;
        }
        let ActorKind::Player(player) = &mut self.kind else {
            return false;
        };
        player.fire_cooldown_ms = (player.fire_cooldown_ms - dt_ms).max(0.0);
        if trigger_held && player.fire_cooldown_ms <= 0.0 {
            player.fire_cooldown_ms = PLAYER_FIRE_INTERVAL_MS;
            return true;
        }
        false
    }

    /// Begin walking toward the spawn target (basic enemies)
    pub fn start_moving(&mut self) {
        if let ActorKind::BasicEnemy(enemy) = &mut self.kind {
            enemy.moving_to_target = true;
            let dir = Direction::from_vector(enemy.target - self.pos).unwrap_or(Direction::Down);
            self.set_state(ActorState::Moving(dir));
        }
    }

    /// Per-frame AI for enemies and the boss. Requests go into `intents`.
    pub fn advance(&mut self, dt_ms: f32, player_pos: Vec2, intents: &mut Vec<ActorIntent>) {
        if self.is_destroyed() {
            return;
        }
        match self.kind {
            ActorKind::Player(_) => {}
            ActorKind::BasicEnemy(_) => self.advance_enemy(dt_ms, player_pos, intents),
            ActorKind::Boss(_) => self.advance_boss(dt_ms, player_pos, intents),
        }
    }

    fn advance_enemy(&mut self, dt_ms: f32, player_pos: Vec2, intents: &mut Vec<ActorIntent>) {
        let ActorKind::BasicEnemy(enemy) = &mut self.kind else {
            return;
        };

        enemy.fire_cooldown_ms -= dt_ms;
        if enemy.fire_cooldown_ms <= 0.0 {
            enemy.fire_cooldown_ms = ENEMY_FIRE_INTERVAL_MS;
            intents.push(ActorIntent::FireAimed {
                origin: self.pos,
                target: player_pos,
            });
        }

        if !enemy.moving_to_target {
            return;
        }

        let to_target = enemy.target - self.pos;
        let distance = to_target.length();
        if distance < ENEMY_ARRIVE_DISTANCE {
            self.pos = enemy.target;
            enemy.moving_to_target = false;
            self.set_state(ActorState::Idle);
            return;
        }

        // Never overshoot the target
        let step = (to_target / distance) * self.speed.min(distance);
        self.pos += step;
        if let Some(dir) = Direction::from_vector(step) {
            self.set_state(ActorState::Moving(dir));
        }
    }

    fn advance_boss(&mut self, dt_ms: f32, player_pos: Vec2, intents: &mut Vec<ActorIntent>) {
        let ActorKind::Boss(skill) = &mut self.kind else {
            return;
        };

        if skill.attacking {
            skill.window_ms -= dt_ms;
            if skill.window_ms <= 0.0 {
                skill.window_ms = 0.0;
                skill.attacking = false;
                skill.timer_ms = skill.cooldown_ms;
            }
        } else {
            skill.timer_ms -= dt_ms;
            if skill.timer_ms <= 0.0 {
                skill.timer_ms = 0.0;
                skill.attacking = true;
                skill.window_ms = BOSS_SKILL_WINDOW_MS;
                intents.push(ActorIntent::AreaAttack(AreaEffect {
                    source_id: self.id,
                    origin: self.pos,
                    radius: skill.radius,
                    target: player_pos,
                }));
            }
        }

        // Movement and gunfire pause while the attack plays out
        if skill.attacking {
            return;
        }

        skill.fire_cooldown_ms -= dt_ms;
        if skill.fire_cooldown_ms <= 0.0 {
            skill.fire_cooldown_ms = BOSS_FIRE_INTERVAL_MS;
            intents.push(ActorIntent::FireBurst { origin: self.pos });
        }

        let to_player = player_pos - self.pos;
        let distance = to_player.length();
        if distance < skill.radius {
            self.set_state(ActorState::Idle);
            return;
        }
        let step = (to_player / distance) * self.speed;
        self.pos += step;
        if let Some(dir) = Direction::from_vector(step) {
            self.set_state(ActorState::Moving(dir));
        }
    }

    /// Take the pending drop roll (basic enemies destroyed this frame)
    pub fn take_drop(&mut self) -> Option<f32> {
        if !self.drop_pending {
            return None;
        }
        self.drop_pending = false;
        match &self.kind {
            ActorKind::BasicEnemy(enemy) => Some(enemy.drop_rate),
            _ => None,
        }
    }
}
