//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects - no external files needed!
//! Each effect is a short list of oscillator tones; which effect plays is
//! decided from the simulation's event queue.

use crate::sim::{ActorTag, GameEvent};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Player shot lands on an enemy
    EnemyHit,
    /// Basic enemy explodes
    EnemyDestroyed,
    /// Boss explodes
    BossDestroyed,
    /// Player takes damage
    PlayerHurt,
    /// Item picked up
    PickupCollect,
    /// Weapon power increased
    PowerUp,
    /// Boss area attack
    BossBlast,
    /// Player special fired
    SkillBlast,
    /// Player special re-armed
    SkillReady,
    /// Level cleared
    LevelClear,
    /// Every level cleared
    Victory,
    /// Player destroyed
    GameOver,
}

/// Oscillator waveform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wave {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

/// One oscillator voice: exponential pitch glide and decay
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub wave: Wave,
    pub freq: f32,
    /// Pitch at the end of the tone (same as `freq` for no glide)
    pub end_freq: f32,
    /// Peak gain before volume scaling
    pub gain: f32,
    /// Offset from trigger, seconds
    pub delay: f64,
    pub duration: f64,
}

const fn tone(wave: Wave, freq: f32, end_freq: f32, gain: f32, delay: f64, duration: f64) -> Tone {
    Tone {
        wave,
        freq,
        end_freq,
        gain,
        delay,
        duration,
    }
}

/// Ascending or descending arpeggio with fixed step
fn arpeggio(wave: Wave, freqs: &[f32], gain: f32, step: f64, duration: f64) -> Vec<Tone> {
    freqs
        .iter()
        .enumerate()
        .map(|(i, &f)| tone(wave, f, f, gain, i as f64 * step, duration))
        .collect()
}

impl SoundEffect {
    /// Effect for a simulation event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::BulletHit { .. } => Some(SoundEffect::EnemyHit),
            GameEvent::Destroyed { tag, .. } => Some(match tag {
                ActorTag::BasicEnemy => SoundEffect::EnemyDestroyed,
                ActorTag::Boss => SoundEffect::BossDestroyed,
                ActorTag::Player => SoundEffect::GameOver,
            }),
            GameEvent::PlayerHit { .. }
            | GameEvent::PlayerCollision { .. }
            | GameEvent::AreaHit { .. } => Some(SoundEffect::PlayerHurt),
            GameEvent::ItemCollected { .. } => Some(SoundEffect::PickupCollect),
            GameEvent::PlayerLevelChanged { .. } => Some(SoundEffect::PowerUp),
            GameEvent::BossSkill { .. } => Some(SoundEffect::BossBlast),
            GameEvent::SkillUsed { .. } => Some(SoundEffect::SkillBlast),
            GameEvent::SkillReady => Some(SoundEffect::SkillReady),
            GameEvent::LevelComplete { .. } => Some(SoundEffect::LevelClear),
            GameEvent::GameComplete => Some(SoundEffect::Victory),
            GameEvent::ItemDropped { .. }
            | GameEvent::BossDamaged { .. }
            | GameEvent::LevelLoaded { .. }
            | GameEvent::SkillCooldownUpdate { .. } => None,
        }
    }

    /// Voices making up this effect
    pub fn tones(self) -> Vec<Tone> {
        use Wave::*;
        match self {
            // Soft tap
            SoundEffect::EnemyHit => vec![tone(Triangle, 300.0, 300.0, 0.25, 0.0, 0.06)],
            // Boom with a crack on top
            SoundEffect::EnemyDestroyed => vec![
                tone(Sawtooth, 100.0, 30.0, 0.5, 0.0, 0.4),
                tone(Square, 1500.0, 1500.0, 0.2, 0.0, 0.1),
            ],
            // Deep rumble plus metallic clang
            SoundEffect::BossDestroyed => vec![
                tone(Sine, 80.0, 30.0, 0.6, 0.0, 0.9),
                tone(Sawtooth, 120.0, 40.0, 0.4, 0.05, 0.7),
                tone(Square, 400.0, 200.0, 0.2, 0.0, 0.3),
            ],
            // Solid thump
            SoundEffect::PlayerHurt => vec![tone(Sine, 150.0, 60.0, 0.6, 0.0, 0.12)],
            SoundEffect::PickupCollect => arpeggio(Sine, &[600.0, 800.0, 1000.0], 0.25, 0.08, 0.15),
            SoundEffect::PowerUp => arpeggio(Triangle, &[400.0, 600.0, 900.0, 1200.0], 0.25, 0.06, 0.2),
            // Ominous descend
            SoundEffect::BossBlast => vec![
                tone(Sine, 300.0, 40.0, 0.4, 0.0, 0.8),
                tone(Square, 90.0, 60.0, 0.15, 0.0, 0.5),
            ],
            // Whoosh down
            SoundEffect::SkillBlast => vec![
                tone(Sine, 900.0, 200.0, 0.35, 0.0, 0.4),
                tone(Sine, 60.0, 40.0, 0.35, 0.0, 0.2),
            ],
            SoundEffect::SkillReady => arpeggio(Sine, &[1200.0, 1800.0], 0.15, 0.05, 0.2),
            SoundEffect::LevelClear => arpeggio(Triangle, &[400.0, 500.0, 600.0, 800.0], 0.3, 0.1, 0.4),
            SoundEffect::Victory => {
                arpeggio(Triangle, &[500.0, 600.0, 700.0, 800.0, 1000.0], 0.25, 0.08, 0.25)
            }
            SoundEffect::GameOver => arpeggio(Sine, &[400.0, 350.0, 300.0, 200.0], 0.3, 0.2, 0.3),
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{SoundEffect, Tone, Wave};
    use crate::sim::GameEvent;

    impl From<Wave> for OscillatorType {
        fn from(wave: Wave) -> Self {
            match wave {
                Wave::Sine => OscillatorType::Sine,
                Wave::Square => OscillatorType::Square,
                Wave::Sawtooth => OscillatorType::Sawtooth,
                Wave::Triangle => OscillatorType::Triangle,
            }
        }
    }

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        volume: f32,
        muted: bool,
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new()
        }
    }

    impl AudioManager {
        pub fn new() -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                volume: 0.8,
                muted: false,
            }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        /// Set effective volume (0.0 - 1.0)
        pub fn set_volume(&mut self, vol: f32) {
            self.volume = vol.clamp(0.0, 1.0);
        }

        pub fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
        }

        /// Play the effect for every event that has one
        pub fn play_events(&self, events: &[GameEvent]) {
            for effect in events.iter().filter_map(SoundEffect::for_event) {
                self.play(effect);
            }
        }

        /// Play a sound effect
        pub fn play(&self, effect: SoundEffect) {
            if self.muted || self.volume <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };

            // Browsers keep the context suspended until a user gesture
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            for tone in effect.tones() {
                self.play_tone(ctx, &tone);
            }
        }

        /// Create an oscillator with gain envelope
        fn create_osc(
            &self,
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        fn play_tone(&self, ctx: &AudioContext, tone: &Tone) {
            let Some((osc, gain)) = self.create_osc(ctx, tone.freq, tone.wave.into()) else {
                return;
            };
            let t = ctx.current_time() + tone.delay;
            let end = t + tone.duration;

            gain.gain().set_value_at_time(self.volume * tone.gain, t).ok();
            gain.gain().exponential_ramp_to_value_at_time(0.01, end).ok();
            if tone.end_freq != tone.freq {
                osc.frequency().set_value_at_time(tone.freq, t).ok();
                osc.frequency()
                    .exponential_ramp_to_value_at_time(tone.end_freq, end)
                    .ok();
            }

            osc.start_with_when(t).ok();
            osc.stop_with_when(end + 0.05).ok();
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;

    #[test]
    fn test_destroyed_sound_depends_on_kind() {
        let boss = GameEvent::Destroyed {
            id: 1,
            tag: ActorTag::Boss,
            pos: Vec2::ZERO,
        };
        let player = GameEvent::Destroyed {
            id: 0,
            tag: ActorTag::Player,
            pos: Vec2::ZERO,
        };
        assert_eq!(SoundEffect::for_event(&boss), Some(SoundEffect::BossDestroyed));
        assert_eq!(SoundEffect::for_event(&player), Some(SoundEffect::GameOver));
    }

    #[test]
    fn test_silent_events() {
        assert_eq!(SoundEffect::for_event(&GameEvent::LevelLoaded { level: 1 }), None);
        assert_eq!(
            SoundEffect::for_event(&GameEvent::SkillCooldownUpdate { remaining_ms: 10.0 }),
            None
        );
    }

    #[test]
    fn test_tones_are_audible() {
        let all = [
            SoundEffect::EnemyHit,
            SoundEffect::EnemyDestroyed,
            SoundEffect::BossDestroyed,
            SoundEffect::PlayerHurt,
            SoundEffect::PickupCollect,
            SoundEffect::PowerUp,
            SoundEffect::BossBlast,
            SoundEffect::SkillBlast,
            SoundEffect::SkillReady,
            SoundEffect::LevelClear,
            SoundEffect::Victory,
            SoundEffect::GameOver,
        ];
        for effect in all {
            let tones = effect.tones();
            assert!(!tones.is_empty(), "{:?} has no tones", effect);
            // exponential ramps need positive endpoints
            assert!(tones.iter().all(|t| t.freq > 0.0 && t.end_freq > 0.0 && t.gain > 0.01));
        }
    }
}
