//! Browser host for the simulation: wires the page's controls to a `Game`,
//! drives it from `requestAnimationFrame`, and turns `GameEvent`s into DOM
//! updates and sounds.
//!
//! State lives in a thread-local `App`, touched only from the frame callback
//! and the input listeners. Each runs to completion on the single JS thread,
//! so a `RefCell` is all the coordination needed.

use std::cell::RefCell;

use log::{error, info};
use thiserror::Error;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Event, EventTarget, KeyboardEvent, Window, window};

use crate::game::{Difficulty, Game, GameEvent, Probe, SubmitOutcome};
use crate::storage;

mod audio;
mod console;
mod dom;
mod local_store;

use audio::{Audio, Sound};
use dom::{Dom, Flash};
use local_store::LocalStore;

pub use console::init as init_logging;

#[derive(Debug, Error)]
pub enum WebError {
    #[error("no global `window`")]
    NoWindow,
    #[error("no `document` on window")]
    NoDocument,
    #[error("missing element #{0}")]
    MissingElement(&'static str),
    #[error("element #{0} has an unexpected type")]
    WrongElementType(&'static str),
    #[error("javascript error: {0}")]
    Js(String),
}

impl From<JsValue> for WebError {
    fn from(value: JsValue) -> Self {
        WebError::Js(format!("{value:?}"))
    }
}

impl From<WebError> for JsValue {
    fn from(err: WebError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

struct App {
    window: Window,
    game: Game,
    dom: Dom,
    audio: Audio,
    raf_handle: Option<i32>,
}

thread_local! {
    static APP: RefCell<Option<App>> = const { RefCell::new(None) };
    static FRAME: RefCell<Option<Closure<dyn FnMut(f64)>>> = const { RefCell::new(None) };
}

/// Binds to the page and leaves the game idle until Start is pressed.
pub fn boot() -> Result<(), WebError> {
    if APP.with(|cell| cell.borrow().is_some()) {
        return Ok(());
    }
    let win = window().ok_or(WebError::NoWindow)?;
    let doc = win.document().ok_or(WebError::NoDocument)?;
    let dom = Dom::bind(&doc)?;

    let store = LocalStore::open();
    let sound_enabled = storage::load_sound_enabled(&store);
    let difficulty: Difficulty = dom.difficulty.value().parse().unwrap_or_default();
    dom.difficulty.set_value(difficulty.key());
    let game = Game::new(difficulty, Box::new(store));

    dom.clear_input();
    dom.sync_hud(&game);
    dom.set_sound_label(sound_enabled);
    info!("zombie typer ready (high score {})", game.high_score());

    FRAME.with(|f| {
        *f.borrow_mut() = Some(Closure::wrap(Box::new(|ts: f64| {
            with_app(|app| app.on_frame(ts));
        }) as Box<dyn FnMut(f64)>));
    });

    APP.with(|cell| {
        cell.replace(Some(App {
            window: win.clone(),
            game,
            dom,
            audio: Audio::new(sound_enabled),
            raf_handle: None,
        }))
    });

    register_listeners(&win)?;
    Ok(())
}

fn with_app(f: impl FnOnce(&mut App)) {
    APP.with(|cell| {
        if let Some(app) = cell.borrow_mut().as_mut() {
            f(app);
        }
    });
}

fn listen(
    target: &EventTarget,
    event: &str,
    handler: impl FnMut(Event) + 'static,
) -> Result<(), WebError> {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn register_listeners(win: &Window) -> Result<(), WebError> {
    let (input, game_area, start_btn, pause_btn, restart_btn, difficulty, sound_btn) =
        APP.with(|cell| {
            let app = cell.borrow();
            let dom = &app.as_ref().ok_or(WebError::NoDocument)?.dom;
            Ok::<_, WebError>((
                dom.input.clone(),
                dom.game_area.clone(),
                dom.start_btn.clone(),
                dom.pause_btn.clone(),
                dom.restart_btn.clone(),
                dom.difficulty.clone(),
                dom.sound_btn.clone(),
            ))
        })?;

    listen(&input, "input", |_: Event| with_app(App::on_typing))?;
    listen(&input, "keydown", |evt: Event| {
        let Some(key) = evt.dyn_ref::<KeyboardEvent>() else {
            return;
        };
        if key.key() == "Enter" {
            evt.prevent_default();
            with_app(App::on_submit);
        }
    })?;
    listen(&game_area, "click", |_: Event| {
        with_app(|app| {
            if app.game.is_running() {
                let _ = app.dom.input.focus();
            }
        })
    })?;
    listen(&start_btn, "click", |_: Event| with_app(App::start))?;
    listen(&restart_btn, "click", |_: Event| with_app(App::start))?;
    listen(&difficulty, "change", |_: Event| with_app(App::start))?;
    listen(&pause_btn, "click", |_: Event| {
        with_app(App::toggle_pause)
    })?;
    listen(&sound_btn, "click", |_: Event| {
        with_app(App::toggle_sound)
    })?;
    listen(win, "blur", |_: Event| {
        with_app(|app| {
            if app.game.is_running() {
                app.toggle_pause();
            }
        })
    })?;
    listen(win, "resize", |_: Event| {
        with_app(|app| {
            if let Some(w) = app.dom.field_width() {
                app.game.set_field_width(w);
            }
            app.dom.show_target_hint(app.game.target_hint());
        })
    })?;
    Ok(())
}

impl App {
    fn now(&self) -> f64 {
        self.window.performance().map(|p| p.now()).unwrap_or(0.0)
    }

    fn schedule_frame(&mut self) {
        FRAME.with(|f| {
            if let Some(cb) = f.borrow().as_ref() {
                match self
                    .window
                    .request_animation_frame(cb.as_ref().unchecked_ref())
                {
                    Ok(handle) => self.raf_handle = Some(handle),
                    Err(err) => error!("requestAnimationFrame failed: {err:?}"),
                }
            }
        });
    }

    fn cancel_frame(&mut self) {
        if let Some(handle) = self.raf_handle.take() {
            let _ = self.window.cancel_animation_frame(handle);
        }
    }

    fn start(&mut self) {
        self.cancel_frame();
        self.dom.clear_zombies();
        let difficulty: Difficulty = self.dom.difficulty.value().parse().unwrap_or_default();
        self.dom.difficulty.set_value(difficulty.key());
        if let Some(w) = self.dom.field_width() {
            self.game.set_field_width(w);
        }
        self.game.start(difficulty);
        self.dom.sync_hud(&self.game);
        self.dom.show_intro_hint();
        self.dom.show_running();
        self.schedule_frame();
    }

    fn toggle_pause(&mut self) {
        if !(self.game.is_running() || self.game.is_paused()) {
            return;
        }
        let now = self.now();
        self.game.toggle_pause(now);
        if self.game.is_paused() {
            self.cancel_frame();
            self.dom.show_paused(true);
        } else {
            self.dom.show_paused(false);
            self.schedule_frame();
        }
    }

    fn toggle_sound(&mut self) {
        let enabled = !self.audio.enabled();
        self.audio.set_enabled(enabled);
        storage::save_sound_enabled(self.game.store_mut(), enabled);
        self.dom.set_sound_label(enabled);
    }

    fn on_frame(&mut self, ts: f64) {
        self.raf_handle = None;
        if !self.game.is_running() {
            return;
        }
        self.game.tick(ts);
        self.present();
        self.dom.sync_positions(self.game.horde());
        if self.game.is_running() {
            self.schedule_frame();
        }
    }

    fn on_typing(&mut self) {
        if !self.game.is_running() {
            return;
        }
        match self.game.probe(&self.dom.input_value()) {
            Probe::Empty => self.dom.reset_input_marks(),
            Probe::Candidate(_) => self.dom.mark_input(false),
            Probe::NoCandidate => self.dom.mark_input(true),
        }
    }

    fn on_submit(&mut self) {
        match self.game.submit(&self.dom.input_value()) {
            SubmitOutcome::Ignored => return,
            SubmitOutcome::Kill { .. } => {
                self.dom.clear_input();
                self.dom.reset_input_marks();
            }
            SubmitOutcome::Mismatch { .. } => self.dom.reject_input(),
        }
        self.present();
    }

    /// Applies queued game events to the page.
    fn present(&mut self) {
        let events = self.game.drain_events();
        if events.is_empty() {
            return;
        }
        for event in events {
            match event {
                GameEvent::Spawned { id, word } => {
                    let x = self.game.horde().get(id).map(|z| z.x).unwrap_or_default();
                    if let Err(err) = self.dom.spawn_zombie(id, word, x) {
                        error!("could not draw {id}: {err}");
                    }
                    self.audio.play(Sound::Spawn);
                }
                GameEvent::Killed { id, .. } => {
                    self.dom.kill_zombie(id);
                    self.dom.flash(Flash::Kill);
                    self.audio.play(Sound::Kill);
                }
                GameEvent::Missed { id } => {
                    self.dom.remove_zombie(id);
                    self.dom.shake_field();
                    self.dom.flash(Flash::Damage);
                    self.audio.play(Sound::Hit);
                }
                GameEvent::LifeRestored { .. } => {
                    self.dom.flash(Flash::Heal);
                    self.audio.play(Sound::Life);
                }
                GameEvent::NewRecord { .. } => {
                    self.dom.celebrate_record();
                    self.audio.play(Sound::Record);
                }
                GameEvent::Mismatch { penalty } => {
                    self.audio.play(Sound::Wrong);
                    if penalty {
                        self.dom.shake_field();
                        self.dom.flash(Flash::Damage);
                    }
                }
                GameEvent::Ended(summary) => {
                    self.cancel_frame();
                    self.dom.show_summary(&summary);
                }
            }
        }
        self.dom.sync_hud(&self.game);
        self.dom.show_target_hint(self.game.target_hint());
    }
}

/// JSON of the last end-of-session summary, if a run has ended.
#[cfg(feature = "serde_json")]
pub fn last_summary_json() -> Option<String> {
    APP.with(|cell| {
        let app = cell.borrow();
        let summary = app.as_ref()?.game.summary()?;
        match summary.to_json() {
            Ok(json) => Some(json),
            Err(err) => {
                error!("summary serialization failed: {err}");
                None
            }
        }
    })
}
