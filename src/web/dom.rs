//! DOM side of the game: element lookup, one element per zombie, HUD text and
//! the short-lived visual effects.

use std::collections::HashMap;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Element, HtmlButtonElement, HtmlElement, HtmlInputElement, HtmlSelectElement, window,
};

use super::WebError;
use crate::game::{Game, Horde, Summary, ZombieId};

const ZOMBIE_EMOJI: &str = "\u{1F9DF}\u{200D}\u{2642}\u{FE0F}";
const HEART: &str = "\u{2764}";

/// Runs `f` after `ms` milliseconds. Returns the timer handle when scheduled.
pub fn after(ms: i32, f: impl FnOnce() + 'static) -> Option<i32> {
    let cb = Closure::once_into_js(f);
    window()?
        .set_timeout_with_callback_and_timeout_and_arguments_0(cb.unchecked_ref(), ms)
        .ok()
}

fn cancel_timer(handle: Option<i32>) {
    if let (Some(h), Some(w)) = (handle, window()) {
        w.clear_timeout_with_handle(h);
    }
}

fn lookup<T: JsCast>(doc: &Document, id: &'static str) -> Result<T, WebError> {
    doc.get_element_by_id(id)
        .ok_or(WebError::MissingElement(id))?
        .dyn_into::<T>()
        .map_err(|_| WebError::WrongElementType(id))
}

/// Briefly adds `class` to `el`.
fn pulse_class(el: &Element, class: &'static str, ms: i32) {
    let _ = el.class_list().add_1(class);
    let el = el.clone();
    after(ms, move || {
        let _ = el.class_list().remove_1(class);
    });
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flash {
    Kill,
    Damage,
    Heal,
}

impl Flash {
    fn class(self) -> &'static str {
        match self {
            Flash::Kill => "flash-layer flash-kill",
            Flash::Damage => "flash-layer flash-damage",
            Flash::Heal => "flash-layer flash-heal",
        }
    }
}

pub struct Dom {
    doc: Document,
    pub game_area: HtmlElement,
    pub input: HtmlInputElement,
    score: Element,
    high_score: Element,
    streak: Element,
    lives: Element,
    target_info: Option<Element>,
    pub start_btn: HtmlButtonElement,
    pub pause_btn: HtmlButtonElement,
    pub difficulty: HtmlSelectElement,
    pub sound_btn: HtmlButtonElement,
    overlay: Element,
    overlay_title: Element,
    overlay_message: Element,
    pub restart_btn: Element,
    toast: Option<Element>,
    zombies: HashMap<ZombieId, HtmlElement>,
    toast_timer: Option<i32>,
    input_timer: Option<i32>,
}

impl Dom {
    pub fn bind(doc: &Document) -> Result<Self, WebError> {
        Ok(Self {
            doc: doc.clone(),
            game_area: lookup(doc, "gameArea")?,
            input: lookup(doc, "typeInput")?,
            score: lookup(doc, "score")?,
            high_score: lookup(doc, "highScore")?,
            streak: lookup(doc, "streak")?,
            lives: lookup(doc, "lives")?,
            target_info: doc.get_element_by_id("targetInfo"),
            start_btn: lookup(doc, "startBtn")?,
            pause_btn: lookup(doc, "pauseBtn")?,
            difficulty: lookup(doc, "difficultySelect")?,
            sound_btn: lookup(doc, "soundToggle")?,
            overlay: lookup(doc, "overlay")?,
            overlay_title: lookup(doc, "overlayTitle")?,
            overlay_message: lookup(doc, "overlayMessage")?,
            restart_btn: lookup(doc, "restartBtn")?,
            toast: doc.get_element_by_id("toast"),
            zombies: HashMap::new(),
            toast_timer: None,
            input_timer: None,
        })
    }

    /// Play-area width, or `None` before layout.
    pub fn field_width(&self) -> Option<f64> {
        let w = self.game_area.client_width();
        (w > 0).then_some(w as f64)
    }

    // --- Zombies -------------------------------------------------------------

    pub fn spawn_zombie(&mut self, id: ZombieId, word: &str, x: f64) -> Result<(), WebError> {
        let el: HtmlElement = self
            .doc
            .create_element("div")?
            .dyn_into()
            .map_err(|_| WebError::WrongElementType("zombie"))?;
        el.set_class_name("zombie");

        let emoji = self.doc.create_element("div")?;
        emoji.set_class_name("zombie-emoji");
        emoji.set_text_content(Some(ZOMBIE_EMOJI));
        let label = self.doc.create_element("div")?;
        label.set_class_name("zombie-word");
        label.set_text_content(Some(word));

        el.append_child(&emoji)?;
        el.append_child(&label)?;
        el.style().set_property("left", &format!("{x}px"))?;
        self.game_area.append_child(&el)?;
        self.zombies.insert(id, el);
        Ok(())
    }

    /// Plays the death animation, then detaches.
    pub fn kill_zombie(&mut self, id: ZombieId) {
        if let Some(el) = self.zombies.remove(&id) {
            let _ = el.class_list().add_1("dead");
            after(280, move || el.remove());
        }
    }

    pub fn remove_zombie(&mut self, id: ZombieId) {
        if let Some(el) = self.zombies.remove(&id) {
            el.remove();
        }
    }

    pub fn clear_zombies(&mut self) {
        for (_, el) in self.zombies.drain() {
            el.remove();
        }
    }

    pub fn sync_positions(&self, horde: &Horde) {
        for z in horde.iter() {
            if let Some(el) = self.zombies.get(&z.id) {
                let _ = el.style().set_property("left", &format!("{}px", z.x));
            }
        }
    }

    // --- HUD -------------------------------------------------------------------

    pub fn sync_hud(&self, game: &Game) {
        self.score.set_text_content(Some(&game.score().to_string()));
        self.high_score
            .set_text_content(Some(&game.high_score().to_string()));
        self.streak.set_text_content(Some(&game.streak().to_string()));
        self.lives
            .set_text_content(Some(&HEART.repeat(game.lives() as usize)));
    }

    pub fn show_target_hint(&self, word: Option<&str>) {
        let Some(info) = &self.target_info else {
            return;
        };
        let text = match word {
            Some(w) => format!("Nearest zombie: \"{w}\""),
            None => "Waiting for the next zombie...".to_string(),
        };
        info.set_text_content(Some(&text));
    }

    pub fn show_intro_hint(&self) {
        if let Some(info) = &self.target_info {
            info.set_text_content(Some("Type the word of the nearest zombie exactly."));
        }
    }

    pub fn set_sound_label(&self, enabled: bool) {
        let (label, muted) = if enabled {
            ("\u{1F50A} Sound ON", false)
        } else {
            ("\u{1F507} Sound OFF", true)
        };
        self.sound_btn.set_text_content(Some(label));
        let classes = self.sound_btn.class_list();
        let _ = if muted {
            classes.add_1("muted")
        } else {
            classes.remove_1("muted")
        };
    }

    pub fn celebrate_record(&mut self) {
        pulse_class(&self.score, "highlight", 800);
        pulse_class(&self.high_score, "highlight", 800);
        self.toast("NEW RECORD!");
    }

    pub fn toast(&mut self, message: &str) {
        let Some(toast) = self.toast.clone() else {
            return;
        };
        toast.set_text_content(Some(message));
        let _ = toast.class_list().add_1("show");
        cancel_timer(self.toast_timer.take());
        self.toast_timer = after(1400, move || {
            let _ = toast.class_list().remove_1("show");
        });
    }

    pub fn flash(&self, kind: Flash) {
        let Ok(layer) = self.doc.create_element("div") else {
            return;
        };
        layer.set_class_name(kind.class());
        if self.game_area.append_child(&layer).is_err() {
            return;
        }
        let shown = layer.clone();
        after(0, move || {
            let _ = shown.class_list().add_1("show");
        });
        after(200, move || {
            let _ = layer.class_list().remove_1("show");
            layer.remove();
        });
    }

    pub fn shake_field(&self) {
        pulse_class(&self.game_area, "shake", 400);
    }

    // --- Input -----------------------------------------------------------------

    pub fn input_value(&self) -> String {
        self.input.value()
    }

    pub fn clear_input(&self) {
        self.input.set_value("");
    }

    /// Error tint while typing, without the shake.
    pub fn mark_input(&self, error: bool) {
        let classes = self.input.class_list();
        let _ = if error {
            classes.add_1("error")
        } else {
            classes.remove_1("error")
        };
    }

    pub fn reset_input_marks(&self) {
        let _ = self.input.class_list().remove_2("error", "shake");
    }

    pub fn reject_input(&mut self) {
        let _ = self.input.class_list().add_2("error", "shake");
        self.clear_input();
        cancel_timer(self.input_timer.take());
        let input = self.input.clone();
        self.input_timer = after(400, move || {
            let _ = input.class_list().remove_2("error", "shake");
        });
    }

    pub fn enable_input(&self, enabled: bool) {
        self.input.set_disabled(!enabled);
        if enabled {
            let _ = self.input.focus();
        } else {
            let _ = self.input.blur();
        }
    }

    // --- Run lifecycle -----------------------------------------------------------

    pub fn show_running(&self) {
        let _ = self.overlay.class_list().add_1("hidden");
        self.start_btn.set_text_content(Some("\u{23F9} Restart"));
        self.pause_btn.set_disabled(false);
        self.pause_btn.set_text_content(Some("Pause"));
        self.clear_input();
        self.reset_input_marks();
        self.enable_input(true);
    }

    pub fn show_paused(&self, paused: bool) {
        self.pause_btn
            .set_text_content(Some(if paused { "Resume" } else { "Pause" }));
        self.enable_input(!paused);
    }

    pub fn show_summary(&self, summary: &Summary) {
        self.overlay_title
            .set_text_content(Some(summary.outcome.title()));
        self.overlay_message
            .set_text_content(Some(&summary.message()));
        let _ = self.overlay.class_list().remove_1("hidden");
        self.pause_btn.set_disabled(true);
    }
}
