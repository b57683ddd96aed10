//! Texture and animation lookup
//!
//! The host registers whatever textures and spritesheet animations it
//! managed to load. Lookups never fail: a missing texture resolves to a
//! tinted placeholder of fixed size.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

/// Visual size and tint of a sprite
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpriteInfo {
    pub width: f32,
    pub height: f32,
    /// 0xRRGGBB
    pub tint: u32,
    pub placeholder: bool,
}

/// Placeholder sizes and colors per texture key
fn placeholder_for(key: &str) -> SpriteInfo {
    let (width, height, tint) = match key {
        k if k.starts_with("bullet_player") => (10.0, 20.0, 0x00FFFF),
        "bullet_enemy" => (10.0, 20.0, 0xFF0000),
        "bullet_boss" => (10.0, 20.0, 0xFF00FF),
        "item_heal" => (20.0, 20.0, 0xFF0000),
        "item_level_up" => (20.0, 20.0, 0x00FF00),
        "item_blue" => (20.0, 20.0, 0x3399FF),
        "item_violet" => (20.0, 20.0, 0x9933FF),
        "player" => (40.0, 40.0, 0xFFFFFF),
        "crep" => (40.0, 40.0, 0xFF8800),
        "boss" => (80.0, 80.0, 0xCC0044),
        _ => (10.0, 10.0, 0xFFFFFF),
    };
    SpriteInfo {
        width,
        height,
        tint,
        placeholder: true,
    }
}

/// Animations an actor's spritesheet provides
///
/// `Default` accepts every key, used when no spritesheet restrictions are
/// known (tests, headless runs).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnimationSet {
    keys: Option<BTreeSet<String>>,
}

impl AnimationSet {
    pub fn from_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: Some(keys.into_iter().map(Into::into).collect()),
        }
    }

    /// Animation names from a spritesheet descriptor's `animations` table
    pub fn from_spritesheet(json: &str) -> Result<Self, serde_json::Error> {
        let sheet: Spritesheet = serde_json::from_str(json)?;
        Ok(Self::from_keys(sheet.animations.into_keys()))
    }

    pub fn has(&self, key: &str) -> bool {
        match &self.keys {
            None => true,
            Some(keys) => keys.contains(key),
        }
    }
}

/// The part of a spritesheet descriptor the catalog cares about
#[derive(Deserialize)]
struct Spritesheet {
    #[serde(default)]
    animations: HashMap<String, serde_json::Value>,
}

/// Registry of loaded textures and animations
#[derive(Debug, Clone, Default)]
pub struct AssetCatalog {
    sprites: HashMap<String, SpriteInfo>,
    animations: HashMap<String, AnimationSet>,
}

impl AssetCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_sprite(&mut self, key: impl Into<String>, width: f32, height: f32, tint: u32) {
        self.sprites.insert(
            key.into(),
            SpriteInfo {
                width,
                height,
                tint,
                placeholder: false,
            },
        );
    }

    pub fn register_animations(&mut self, actor_key: impl Into<String>, set: AnimationSet) {
        self.animations.insert(actor_key.into(), set);
    }

    /// Register an actor's animations from spritesheet JSON. Malformed data
    /// leaves the actor unrestricted.
    pub fn load_spritesheet(&mut self, actor_key: &str, json: &str) -> bool {
        match AnimationSet::from_spritesheet(json) {
            Ok(set) => {
                log::info!("Loaded '{}' spritesheet", actor_key);
                self.register_animations(actor_key, set);
                true
            }
            Err(e) => {
                log::warn!("Bad '{}' spritesheet: {}", actor_key, e);
                false
            }
        }
    }

    /// Sprite for `key`, or a placeholder if it was never loaded
    pub fn sprite(&self, key: &str) -> SpriteInfo {
        match self.sprites.get(key) {
            Some(info) => *info,
            None => {
                log::debug!("Texture '{}' unavailable, using placeholder", key);
                placeholder_for(key)
            }
        }
    }

    /// Animations for an actor kind (`player`, `crep`, `boss`)
    pub fn animations(&self, actor_key: &str) -> AnimationSet {
        self.animations.get(actor_key).cloned().unwrap_or_default()
    }

    /// Log every expected texture that fell back to a placeholder
    pub fn report_missing(&self, expected: &[&str]) {
        for key in expected {
            if !self.sprites.contains_key(*key) {
                log::warn!("Missing texture '{}', placeholder substituted", key);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_fallback() {
        let catalog = AssetCatalog::new();
        let info = catalog.sprite("bullet_enemy");
        assert!(info.placeholder);
        assert_eq!((info.width, info.height), (10.0, 20.0));
    }

    #[test]
    fn test_registered_sprite() {
        let mut catalog = AssetCatalog::new();
        catalog.register_sprite("bullet_player_1", 8.0, 16.0, 0x00FFFF);
        let info = catalog.sprite("bullet_player_1");
        assert!(!info.placeholder);
        assert_eq!(info.width, 8.0);
    }

    #[test]
    fn test_animation_set() {
        let all = AnimationSet::default();
        assert!(all.has("anything"));
        let some = AnimationSet::from_keys(["idle", "move"]);
        assert!(some.has("idle"));
        assert!(!some.has("destroy"));
    }

    #[test]
    fn test_spritesheet_animations() {
        let mut catalog = AssetCatalog::new();
        let json = r#"{
            "frames": {"idle_0.png": {}},
            "animations": {"idle": ["idle_0.png"], "hit": ["hit_0.png"]}
        }"#;
        assert!(catalog.load_spritesheet("crep", json));

        let set = catalog.animations("crep");
        assert!(set.has("idle"));
        assert!(set.has("hit"));
        assert!(!set.has("destroy"));
    }

    #[test]
    fn test_bad_spritesheet_keeps_default() {
        let mut catalog = AssetCatalog::new();
        assert!(!catalog.load_spritesheet("boss", "not json"));
        assert!(catalog.animations("boss").has("destroy"));
    }
}
