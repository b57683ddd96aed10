//! Nebula Strike entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, Response};

    use nebula_strike::assets::AssetCatalog;
    use nebula_strike::audio::AudioManager;
    use nebula_strike::renderer::{CanvasRenderer, EffectLayer, build_scene};
    use nebula_strike::sim::{GamePhase, GameState, TickInput, load_or_default, tick};
    use nebula_strike::{GameError, Settings};

    const LEVELS_URL: &str = "assets/levels/levels.json";

    /// Actors whose spritesheet descriptors restrict state animations
    const SPRITESHEETS: &[&str] = &["player", "crep", "boss"];

    /// Textures the host is expected to provide
    const EXPECTED_TEXTURES: &[&str] = &[
        "player",
        "crep",
        "boss",
        "bullet_player",
        "bullet_enemy",
        "bullet_boss",
        "item_heal",
        "item_level_up",
        "item_blue",
        "item_violet",
    ];

    /// Longest frame fed to the simulation (ms)
    const MAX_FRAME_MS: f32 = 100.0;

    /// Game instance holding all state
    struct Game {
        state: GameState,
        renderer: CanvasRenderer,
        effects: EffectLayer,
        audio: AudioManager,
        settings: Settings,
        /// Keys currently held
        held: HashSet<String>,
        /// One-shot inputs since the last frame
        pending: TickInput,
        last_time: f64,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
        last_phase: GamePhase,
    }

    impl Game {
        /// Input for this frame: held movement/fire plus queued one-shots
        fn frame_input(&mut self) -> TickInput {
            let held = |keys: &[&str]| keys.iter().any(|k| self.held.contains(*k));
            let axis = |neg: bool, pos: bool| -> i8 { pos as i8 - neg as i8 };
            let input = TickInput {
                move_x: axis(
                    held(&["ArrowLeft", "a", "A"]),
                    held(&["ArrowRight", "d", "D"]),
                ),
                move_y: axis(held(&["ArrowUp", "w", "W"]), held(&["ArrowDown", "s", "S"])),
                fire: held(&[" "]),
                use_skill: self.pending.use_skill,
                pause: self.pending.pause,
            };
            self.pending = TickInput::default();
            input
        }

        fn update(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                ((time - self.last_time) as f32).min(MAX_FRAME_MS)
            } else {
                16.0
            };
            self.last_time = time;

            let input = self.frame_input();
            tick(&mut self.state, &input, dt);

            let events = self.state.drain_events();
            self.audio.play_events(&events);
            self.effects.absorb(&events);
            self.effects.update(dt);

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;
            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 && time > oldest_time {
                self.fps = (60000.0 / (time - oldest_time)).round() as u32;
            }

            if self.state.phase != self.last_phase {
                log::info!("Phase {:?} -> {:?}", self.last_phase, self.state.phase);
                self.last_phase = self.state.phase;
            }
        }

        fn render(&self, time: f64) {
            let shapes = build_scene(&self.state, &self.effects, &self.settings, time as f32);
            let shake = if self.settings.effective_screen_shake() {
                self.effects.shake
            } else {
                0.0
            };
            self.renderer.render(&shapes, shake, time);
        }

        /// Update HUD elements in DOM
        fn update_hud(&self, document: &Document) {
            let set_text = |selector: &str, text: &str| {
                if let Some(el) = document.query_selector(selector).ok().flatten() {
                    el.set_text_content(Some(text));
                }
            };
            let set_visible = |id: &str, visible: bool| {
                if let Some(el) = document.get_element_by_id(id) {
                    let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
                }
            };

            set_text("#hud-score .hud-value", &self.state.score.to_string());
            set_text("#hud-hp .hud-value", &self.state.player.hp().to_string());
            set_text("#hud-level .hud-value", &self.state.waves.current_level().to_string());
            set_text("#hud-power .hud-value", &self.state.player.power_level().to_string());

            let skill = if self.state.skill.is_ready() {
                "READY".to_string()
            } else {
                format!("{:.1}s", self.state.skill.remaining() / 1000.0)
            };
            set_text("#hud-skill .hud-value", &skill);

            match self.state.waves.boss() {
                Some(boss) => {
                    set_visible("hud-boss", true);
                    set_text("#hud-boss .hud-value", &format!("{}/{}", boss.hp(), boss.max_hp()));
                }
                None => set_visible("hud-boss", false),
            }

            set_visible("hud-fps", self.settings.show_fps);
            set_text("#hud-fps .hud-value", &self.fps.to_string());

            set_visible("pause-menu", self.state.phase == GamePhase::Paused);
            set_visible("level-banner", self.state.phase == GamePhase::LevelCleared);
            set_visible("victory", self.state.phase == GamePhase::Victory);
            set_visible("game-over", self.state.phase == GamePhase::GameOver);
            if matches!(self.state.phase, GamePhase::GameOver | GamePhase::Victory) {
                set_text("#final-score", &self.state.score.to_string());
            }
        }

        fn restart(&mut self) {
            let seed = js_sys::Date::now() as u64;
            self.state.restart(seed);
            self.effects = EffectLayer::default();
            self.pending = TickInput::default();
            log::info!("Game restarted with seed: {}", seed);
        }
    }

    /// Fetch a text asset. Any failure yields None and the caller's fallback.
    async fn fetch_text(window: &web_sys::Window, url: &str) -> Option<String> {
        let response = JsFuture::from(window.fetch_with_str(url)).await.ok()?;
        let response: Response = response.dyn_into().ok()?;
        if !response.ok() {
            log::warn!("Request for {} failed: HTTP {}", url, response.status());
            return None;
        }
        let text = JsFuture::from(response.text().ok()?).await.ok()?;
        text.as_string()
    }

    fn browser<T>(value: Option<T>, what: &str) -> Result<T, GameError> {
        value.ok_or_else(|| GameError::Browser(format!("{} unavailable", what)))
    }

    pub async fn run() -> Result<(), GameError> {
        log::info!("Nebula Strike starting...");

        let window = browser(web_sys::window(), "window")?;
        let document = browser(window.document(), "document")?;

        let canvas: HtmlCanvasElement = browser(document.get_element_by_id("canvas"), "#canvas")?
            .dyn_into()
            .map_err(|_| GameError::Browser("#canvas is not a canvas".into()))?;

        // Simulation runs in CSS pixels, the backing store in device pixels
        let dpr = window.device_pixel_ratio();
        let client_w = canvas.client_width().max(1);
        let client_h = canvas.client_height().max(1);
        canvas.set_width((client_w as f64 * dpr) as u32);
        canvas.set_height((client_h as f64 * dpr) as u32);
        let renderer = CanvasRenderer::new(&canvas, dpr)?;

        let encounters = load_or_default(fetch_text(&window, LEVELS_URL).await.as_deref());

        // Sprites are drawn as tinted rectangles; every texture is a placeholder
        let mut catalog = AssetCatalog::new();
        catalog.report_missing(EXPECTED_TEXTURES);
        for actor in SPRITESHEETS {
            let url = format!("assets/{actor}/{actor}.json");
            if let Some(json) = fetch_text(&window, &url).await {
                catalog.load_spritesheet(actor, &json);
            }
        }

        let settings = Settings::load();
        let mut audio = AudioManager::new();
        audio.set_volume(settings.effective_volume());

        let seed = js_sys::Date::now() as u64;
        let mut state =
            GameState::with_screen(seed, encounters, catalog, client_w as f32, client_h as f32);
        state.start();
        log::info!("Game initialized with seed: {}", seed);

        let game = Rc::new(RefCell::new(Game {
            last_phase: state.phase,
            state,
            renderer,
            effects: EffectLayer::default(),
            audio,
            settings,
            held: HashSet::new(),
            pending: TickInput::default(),
            last_time: 0.0,
            frame_times: [0.0; 60],
            frame_index: 0,
            fps: 0,
        }));

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }
        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "");
        }

        setup_keyboard(&window, game.clone());
        setup_restart_button(&document, game.clone());
        setup_auto_pause(&window, &document, game.clone());
        setup_resize(&window, canvas, game.clone());

        request_animation_frame(game);
        log::info!("Nebula Strike running!");
        Ok(())
    }

    fn setup_keyboard(window: &web_sys::Window, game: Rc<RefCell<Game>>) {
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = event.key();
                let mut g = game.borrow_mut();
                g.audio.resume();
                match key.as_str() {
                    "Shift" | "e" | "E" => g.pending.use_skill = true,
                    "Escape" | "p" | "P" => g.pending.pause = true,
                    "Enter" | "r" | "R"
                        if matches!(g.state.phase, GamePhase::GameOver | GamePhase::Victory) =>
                    {
                        g.restart()
                    }
                    _ => {
                        if g.settings.toggle_hotkey(&key) {
                            g.settings.save();
                        }
                    }
                }
                if key.starts_with("Arrow") || key == " " {
                    event.prevent_default();
                }
                g.held.insert(key);
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            game.borrow_mut().held.remove(&event.key());
        });
        let _ = window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_restart_button(document: &Document, game: Rc<RefCell<Game>>) {
        for id in ["restart-btn", "play-again-btn"] {
            let Some(btn) = document.get_element_by_id(id) else {
                continue;
            };
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                game.borrow_mut().restart();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(window: &web_sys::Window, document: &Document, game: Rc<RefCell<Game>>) {
        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut g = game.borrow_mut();
                let hidden = document_clone.visibility_state() == web_sys::VisibilityState::Hidden;
                if g.settings.mute_on_blur {
                    g.audio.set_muted(hidden);
                }
                if hidden && g.state.phase == GamePhase::Playing {
                    g.pending.pause = true;
                    log::info!("Auto-paused (tab hidden)");
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
            let mut g = game.borrow_mut();
            g.held.clear();
            if g.state.phase == GamePhase::Playing {
                g.pending.pause = true;
                log::info!("Auto-paused (window blur)");
            }
        });
        let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_resize(window: &web_sys::Window, canvas: HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(window) = web_sys::window() else { return };
            let dpr = window.device_pixel_ratio();
            let w = canvas.client_width().max(1);
            let h = canvas.client_height().max(1);
            let (pw, ph) = ((w as f64 * dpr) as u32, (h as f64 * dpr) as u32);
            canvas.set_width(pw);
            canvas.set_height(ph);
            let mut g = game.borrow_mut();
            g.renderer.resize(pw, ph, dpr);
            g.state.resize(w as f32, h as f32);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            g.update(time);
            g.render(time);
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                g.update_hud(&document);
            }
        }

        request_animation_frame(game);
    }

    /// Show a startup failure in the page
    pub fn show_error(err: &GameError) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        if let Some(el) = document.get_element_by_id("error") {
            el.set_text_content(Some(&format!("Failed to start: {}", err)));
            let _ = el.set_attribute("class", "");
        }
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }

    if let Err(e) = wasm_game::run().await {
        log::error!("Startup failed: {}", e);
        wasm_game::show_error(&e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Nebula Strike (native) starting...");
    log::info!("Native mode runs a headless autopilot - use `trunk serve` for the web version");

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);
    let level_json = args.next().and_then(|path| match std::fs::read_to_string(&path) {
        Ok(json) => Some(json),
        Err(e) => {
            log::warn!("Could not read {}: {}", path, e);
            None
        }
    });

    autopilot::run(seed, level_json.as_deref());
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless run with a simple scripted pilot
#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use nebula_strike::assets::AssetCatalog;
    use nebula_strike::consts::*;
    use nebula_strike::sim::{GameEvent, GamePhase, GameState, TickInput, load_or_default, tick};

    const FRAME_MS: f32 = 1000.0 / 60.0;
    /// Ten minutes of game time
    const MAX_FRAMES: u64 = 36_000;

    /// Track the nearest enemy horizontally, keep distance, fire constantly
    fn pilot(state: &GameState) -> TickInput {
        let player = state.player.pos;
        let nearest = state
            .waves
            .enemies()
            .iter()
            .filter(|e| !e.is_destroyed())
            .min_by(|a, b| a.pos.distance(player).total_cmp(&b.pos.distance(player)));

        let Some(target) = nearest else {
            return TickInput {
                fire: true,
                ..Default::default()
            };
        };

        let dx = target.pos.x - player.x;
        let move_x = if dx.abs() < PLAYER_STEP { 0 } else { dx.signum() as i8 };
        // Stay well below the enemy line
        let wanted_y = (target.pos.y + 200.0).min(state.screen.y - PLAYER_RADIUS);
        let dy = wanted_y - player.y;
        let move_y = if dy.abs() < PLAYER_STEP { 0 } else { dy.signum() as i8 };

        TickInput {
            move_x,
            move_y,
            fire: true,
            use_skill: state.skill.is_ready() && target.pos.distance(player) < SKILL_RADIUS,
            pause: false,
        }
    }

    pub fn run(seed: u64, level_json: Option<&str>) {
        let encounters = load_or_default(level_json);
        let mut state = GameState::new(seed, encounters, AssetCatalog::new());
        state.start();

        while state.frame < MAX_FRAMES
            && !matches!(state.phase, GamePhase::GameOver | GamePhase::Victory)
        {
            let input = pilot(&state);
            tick(&mut state, &input, FRAME_MS);
            for event in state.drain_events() {
                match &event {
                    GameEvent::BulletHit { .. }
                    | GameEvent::SkillCooldownUpdate { .. }
                    | GameEvent::BossDamaged { .. } => log::debug!("{:?}", event),
                    _ => log::info!("[frame {}] {}: {:?}", state.frame, event.name(), event),
                }
            }
        }

        println!(
            "Finished after {} frames: {:?}, level {}, score {}, hp {}",
            state.frame,
            state.phase,
            state.waves.current_level(),
            state.score,
            state.player.hp()
        );
    }
}
