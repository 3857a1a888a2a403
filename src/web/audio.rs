//! Short synthesized cues for game events.

use log::warn;
use web_sys::AudioContext;

/// Sound categories; each maps to one oscillator pitch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sound {
    Spawn,
    Kill,
    Hit,
    Wrong,
    Life,
    Record,
}

impl Sound {
    pub fn frequency(self) -> f32 {
        match self {
            Sound::Spawn => 260.0,
            Sound::Kill => 520.0,
            Sound::Hit => 180.0,
            Sound::Wrong => 150.0,
            Sound::Life => 600.0,
            Sound::Record => 700.0,
        }
    }
}

enum Backend {
    /// Not created yet; browsers want a user gesture before an AudioContext starts.
    Pending,
    Ready(AudioContext),
    Unsupported,
}

pub struct Audio {
    enabled: bool,
    backend: Backend,
}

impl Audio {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            backend: Backend::Pending,
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Fire-and-forget; failures are ignored.
    pub fn play(&mut self, sound: Sound) {
        if !self.enabled {
            return;
        }
        let Some(ctx) = self.context() else {
            return;
        };
        let _ = tone(ctx, sound.frequency());
    }

    fn context(&mut self) -> Option<&AudioContext> {
        if matches!(self.backend, Backend::Pending) {
            self.backend = match AudioContext::new() {
                Ok(ctx) => Backend::Ready(ctx),
                Err(err) => {
                    warn!("audio disabled, AudioContext unavailable: {err:?}");
                    Backend::Unsupported
                }
            };
        }
        match &self.backend {
            Backend::Ready(ctx) => Some(ctx),
            _ => None,
        }
    }
}

// 0.2s blip: quick attack to 0.3 then exponential decay.
fn tone(ctx: &AudioContext, freq: f32) -> Result<(), wasm_bindgen::JsValue> {
    let osc = ctx.create_oscillator()?;
    let gain = ctx.create_gain()?;
    osc.connect_with_audio_node(&gain)?;
    gain.connect_with_audio_node(&ctx.destination())?;

    let now = ctx.current_time();
    osc.frequency().set_value_at_time(freq, now)?;
    let level = gain.gain();
    level.set_value_at_time(0.001, now)?;
    level.exponential_ramp_to_value_at_time(0.3, now + 0.01)?;
    level.exponential_ramp_to_value_at_time(0.001, now + 0.18)?;

    osc.start_with_when(now)?;
    osc.stop_with_when(now + 0.2)?;
    Ok(())
}
