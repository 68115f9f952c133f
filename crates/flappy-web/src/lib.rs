//! Browser bridge: `#[wasm_bindgen]` exports over one thread-local game instance.
//!
//! JS calls `game_init` once, registers callbacks, then `game_run`. Every display refresh
//! ticks the runner, renders to the canvas and dispatches what the step emitted. Callbacks
//! run after the instance is released, so they may call back into any export.

pub mod canvas;
pub mod frame_loop;
pub mod runner;

use std::cell::RefCell;
use std::fmt::Display;

use flappy_engine::{Command, GameConfig, GameEvent, InputEvent, Outbox, SkinCatalog};
use wasm_bindgen::prelude::*;
use web_sys::HtmlImageElement;

pub use canvas::CanvasSurface;
pub use frame_loop::FrameLoop;
pub use runner::GameRunner;

struct App {
    runner: GameRunner,
    surface: CanvasSurface,
    /// Current player skin; swapped whole, read by the next render.
    skin: Option<HtmlImageElement>,
    frame_loop: Option<FrameLoop>,
    callbacks: Callbacks,
}

/// JS functions notified after each frame or command.
#[derive(Clone, Default)]
struct Callbacks {
    score_changed: Option<js_sys::Function>,
    game_over: Option<js_sys::Function>,
    sound: Option<js_sys::Function>,
}

impl Callbacks {
    fn dispatch(&self, outbox: &Outbox) {
        for cue in &outbox.sounds {
            call(&self.sound, JsValue::from_str(cue.name()));
        }
        for event in &outbox.events {
            match *event {
                GameEvent::ScoreChanged(score) => call(&self.score_changed, JsValue::from(score)),
                GameEvent::GameOver { final_score } => {
                    call(&self.game_over, JsValue::from(final_score))
                }
            }
        }
    }
}

/// Fire and forget: a throwing callback is logged, never propagated.
fn call(callback: &Option<js_sys::Function>, arg: JsValue) {
    if let Some(f) = callback {
        if let Err(err) = f.call1(&JsValue::NULL, &arg) {
            log::warn!("callback threw: {err:?}");
        }
    }
}

thread_local! {
    static APP: RefCell<Option<App>> = const { RefCell::new(None) };
}

fn with_app<R>(f: impl FnOnce(&mut App) -> R) -> Result<R, JsValue> {
    APP.with(|cell| {
        let mut borrow = cell
            .try_borrow_mut()
            .map_err(|_| JsValue::from_str("game is busy"))?;
        let app = borrow
            .as_mut()
            .ok_or_else(|| JsValue::from_str("game not initialized; call game_init() first"))?;
        Ok(f(app))
    })
}

/// Run `f`, then dispatch whatever it left in the outbox with the instance released.
fn with_app_dispatch<R>(f: impl FnOnce(&mut App) -> R) -> Result<R, JsValue> {
    let (result, outbox, callbacks) = with_app(|app| {
        let result = f(app);
        (result, app.runner.drain_outbox(), app.callbacks.clone())
    })?;
    callbacks.dispatch(&outbox);
    Ok(result)
}

fn js_error(err: impl Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn load_image(url: Option<&str>) -> Result<Option<HtmlImageElement>, JsValue> {
    url.map(|url| {
        let image = HtmlImageElement::new()?;
        image.set_src(url);
        Ok(image)
    })
    .transpose()
}

fn apply_selected_skin(app: &mut App) -> Result<(), JsValue> {
    app.skin = load_image(app.runner.skins().selected().image.as_deref())?;
    Ok(())
}

fn on_frame(timestamp: f64) {
    let frame = with_app(|app| {
        app.runner.tick(timestamp);
        app.runner.render(&mut app.surface, app.skin.as_ref());
        (app.runner.drain_outbox(), app.callbacks.clone())
    });
    match frame {
        Ok((outbox, callbacks)) => callbacks.dispatch(&outbox),
        Err(err) => log::warn!("frame skipped: {err:?}"),
    }
}

// ---- Lifecycle ----

/// Bind to `<canvas id=canvas_id>` and build a fresh game. `config_json` overrides defaults.
/// Re-initializing cancels any running loop.
#[wasm_bindgen]
pub fn game_init(canvas_id: &str, config_json: Option<String>) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let config = match config_json.as_deref() {
        Some(json) => GameConfig::from_json(json).map_err(js_error)?,
        None => GameConfig::default(),
    };
    let surface = CanvasSurface::from_canvas_id(canvas_id)?;

    let app = App {
        runner: GameRunner::new(config),
        surface,
        skin: None,
        frame_loop: None,
        callbacks: Callbacks::default(),
    };
    let previous = APP.with(|cell| {
        cell.try_borrow_mut()
            .map(|mut slot| slot.replace(app))
            .map_err(|_| JsValue::from_str("game is busy"))
    })?;
    drop(previous);

    log::info!("flappy: initialized on #{canvas_id}");
    Ok(())
}

/// Start the frame loop. No-op if it is already running.
#[wasm_bindgen]
pub fn game_run() -> Result<(), JsValue> {
    let already = with_app(|app| app.frame_loop.as_ref().is_some_and(FrameLoop::is_running))?;
    if already {
        return Ok(());
    }
    let frame_loop = FrameLoop::start(on_frame)?;
    with_app(|app| {
        app.runner.reset_clock();
        app.frame_loop = Some(frame_loop);
    })
}

/// Stop the frame loop. The game keeps its state; `game_run` resumes it.
#[wasm_bindgen]
pub fn game_cancel() -> Result<(), JsValue> {
    let frame_loop = with_app(|app| app.frame_loop.take())?;
    if let Some(frame_loop) = frame_loop {
        frame_loop.cancel();
        log::info!("flappy: frame loop cancelled");
    }
    Ok(())
}

// ---- Session commands ----

#[wasm_bindgen]
pub fn game_start() -> Result<(), JsValue> {
    with_app_dispatch(|app| app.runner.command(Command::Start))
}

#[wasm_bindgen]
pub fn game_restart() -> Result<(), JsValue> {
    with_app_dispatch(|app| app.runner.command(Command::Restart))
}

/// Abandon a running session and stop the frame loop.
#[wasm_bindgen]
pub fn game_stop() -> Result<(), JsValue> {
    with_app_dispatch(|app| app.runner.command(Command::Stop))?;
    game_cancel()
}

/// Flap now. Ignored unless a session is running.
#[wasm_bindgen]
pub fn game_activate() -> Result<(), JsValue> {
    with_app_dispatch(|app| app.runner.command(Command::Activate))
}

// ---- Raw input, applied on the next frame ----

#[wasm_bindgen]
pub fn game_pointer_down(x: f32, y: f32) -> Result<(), JsValue> {
    with_app(|app| app.runner.push_input(InputEvent::PointerDown { x, y }))
}

#[wasm_bindgen]
pub fn game_key_down(key_code: u32) -> Result<(), JsValue> {
    with_app(|app| app.runner.push_input(InputEvent::KeyDown { key_code }))
}

// ---- Queries ----

#[wasm_bindgen]
pub fn game_is_playing() -> bool {
    with_app(|app| app.runner.is_playing()).unwrap_or(false)
}

/// `"idle"`, `"running"` or `"terminal"`.
#[wasm_bindgen]
pub fn game_phase() -> Result<String, JsValue> {
    with_app(|app| app.runner.phase().name().to_string())
}

#[wasm_bindgen]
pub fn game_score() -> Result<u32, JsValue> {
    with_app(|app| app.runner.score())
}

#[wasm_bindgen]
pub fn game_high_score() -> Result<u32, JsValue> {
    with_app(|app| app.runner.high_score())
}

// ---- Callbacks ----

/// `f(score)` on every score change, including the reset to 0 at session start.
#[wasm_bindgen]
pub fn game_on_score_changed(f: Option<js_sys::Function>) -> Result<(), JsValue> {
    with_app(|app| app.callbacks.score_changed = f)
}

/// `f(final_score)` when a session ends.
#[wasm_bindgen]
pub fn game_on_game_over(f: Option<js_sys::Function>) -> Result<(), JsValue> {
    with_app(|app| app.callbacks.game_over = f)
}

/// `f(name)` for each sound cue: `"flap"`, `"score"` or `"collision"`.
#[wasm_bindgen]
pub fn game_on_sound(f: Option<js_sys::Function>) -> Result<(), JsValue> {
    with_app(|app| app.callbacks.sound = f)
}

// ---- Skins ----

/// Replace the player skin with the image at `url`, or restore the default glyph.
#[wasm_bindgen]
pub fn game_set_skin(url: Option<String>) -> Result<(), JsValue> {
    let skin = load_image(url.as_deref())?;
    with_app(|app| app.skin = skin)
}

#[wasm_bindgen]
pub fn skins_json() -> Result<String, JsValue> {
    with_app(|app| app.runner.skins().to_json())?.map_err(js_error)
}

/// Replace the catalog from JSON and apply its selected character.
#[wasm_bindgen]
pub fn skins_load(json: &str) -> Result<(), JsValue> {
    let catalog = SkinCatalog::from_json(json).map_err(js_error)?;
    with_app(|app| {
        app.runner.replace_skins(catalog);
        apply_selected_skin(app)
    })?
}

#[wasm_bindgen]
pub fn skin_select(id: &str) -> Result<(), JsValue> {
    with_app(|app| {
        app.runner.skins_mut().select(id).map_err(js_error)?;
        apply_selected_skin(app)
    })?
}

/// Select the next character and return its id.
#[wasm_bindgen]
pub fn skin_next() -> Result<String, JsValue> {
    with_app(|app| {
        let id = app.runner.skins_mut().next().id.clone();
        apply_selected_skin(app).map(|()| id)
    })?
}

/// Select the previous character and return its id.
#[wasm_bindgen]
pub fn skin_previous() -> Result<String, JsValue> {
    with_app(|app| {
        let id = app.runner.skins_mut().previous().id.clone();
        apply_selected_skin(app).map(|()| id)
    })?
}

/// Set or clear a character's image. Takes effect at once if it is the selected one.
#[wasm_bindgen]
pub fn skin_set_image(id: &str, url: Option<String>) -> Result<(), JsValue> {
    with_app(|app| {
        app.runner.skins_mut().set_image(id, url).map_err(js_error)?;
        if app.runner.skins().selected().id == id {
            apply_selected_skin(app)?;
        }
        Ok(())
    })?
}

#[wasm_bindgen]
pub fn skin_rename(id: &str, name: &str) -> Result<(), JsValue> {
    with_app(|app| app.runner.skins_mut().rename(id, name))?.map_err(js_error)
}

#[wasm_bindgen]
pub fn skin_set_power(id: &str, power: &str) -> Result<(), JsValue> {
    with_app(|app| app.runner.skins_mut().set_power(id, power))?.map_err(js_error)
}
