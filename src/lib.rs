//! Zombie Typer core crate.
//!
//! Zombies carrying words walk in from the right; typing a zombie's word and
//! pressing Enter destroys it before it reaches the left edge. The simulation
//! (`game`) is plain Rust driven by explicit `tick` / `step` calls, so it runs
//! under `cargo test` on the host. The `web` layer binds it to the page, the
//! animation frame loop, localStorage and Web Audio.

use wasm_bindgen::prelude::*;

pub mod game;
pub mod storage;
mod web;

pub use game::{
    Difficulty, Game, GameConfig, GameEvent, Horde, Outcome, Phase, Probe, SubmitOutcome, Summary,
    Zombie, ZombieId,
};
pub use storage::{KeyValueStore, MemoryStore, StorageError};
pub use web::WebError;

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    web::init_logging();
}

/// Binds the page controls. The first run begins when Start is pressed.
#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    web::boot().map_err(JsValue::from)
}

/// End-of-session summary of the last finished run, as JSON.
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn last_summary_json() -> Option<String> {
    web::last_summary_json()
}
