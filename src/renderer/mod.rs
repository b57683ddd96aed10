//! Rendering module
//!
//! `scene` turns a `GameState` snapshot into flat draw shapes. The canvas
//! backend (wasm only) just paints that list.

pub mod scene;

#[cfg(target_arch = "wasm32")]
pub mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;
pub use scene::{EffectLayer, Shape, build_scene};
