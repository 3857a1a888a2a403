//! Difficulty levels, their fixed profiles, and the per-frame speed / spawn scaler.

use std::fmt;
use std::str::FromStr;

use super::GameConfig;

/// Selectable difficulty. Fixed for the duration of a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard];

    /// Label shown in the end-of-session summary.
    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }

    /// Value used by the difficulty `<select>`.
    pub fn key(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
        }
    }

    pub fn profile(self) -> &'static DifficultyProfile {
        match self {
            Difficulty::Easy => &EASY,
            Difficulty::Normal => &NORMAL,
            Difficulty::Hard => &HARD,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Difficulty {
    type Err = std::convert::Infallible;

    /// Anything other than "easy" / "hard" is treated as normal, same as the selector default.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Difficulty::Easy,
            "hard" => Difficulty::Hard,
            _ => Difficulty::Normal,
        })
    }
}

/// Base values and scaling knobs for one difficulty level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DifficultyProfile {
    pub base_spawn_ms: f64,
    pub base_speed: f64,
    /// Applied to the time/score factor for both scaling and word selection.
    pub multiplier: f64,
    /// Seconds of active play that add 1.0 to the scaling factor (before the multiplier).
    pub time_divisor: f64,
    pub min_spawn_ms: f64,
}

pub static EASY: DifficultyProfile = DifficultyProfile {
    base_spawn_ms: 3400.0,
    base_speed: 110.0,
    multiplier: 0.4,
    time_divisor: 32.0,
    min_spawn_ms: 1500.0,
};

pub static NORMAL: DifficultyProfile = DifficultyProfile {
    base_spawn_ms: 2600.0,
    base_speed: 150.0,
    multiplier: 1.0,
    time_divisor: 24.0,
    min_spawn_ms: 900.0,
};

pub static HARD: DifficultyProfile = DifficultyProfile {
    base_spawn_ms: 1900.0,
    base_speed: 210.0,
    multiplier: 2.8,
    time_divisor: 18.0,
    min_spawn_ms: 600.0,
};

/// Derived per-frame values. Recomputed from scratch every tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Scaling {
    /// Field units per second.
    pub speed: f64,
    pub spawn_interval_ms: f64,
}

impl DifficultyProfile {
    /// Values in effect before the first frame of a run.
    pub fn base_scaling(&self) -> Scaling {
        Scaling {
            speed: self.base_speed,
            spawn_interval_ms: self.base_spawn_ms,
        }
    }

    /// Combined time/score factor driving speed and spawn interval.
    pub fn factor(&self, elapsed_ms: f64, score: u32, config: &GameConfig) -> f64 {
        let elapsed_secs = elapsed_ms.max(0.0) / 1000.0;
        (elapsed_secs / self.time_divisor + score as f64 / config.score_divisor) * self.multiplier
    }

    /// Speed is capped at `max_speed`, spawn interval floored at `min_spawn_ms`.
    pub fn scale(&self, elapsed_ms: f64, score: u32, config: &GameConfig) -> Scaling {
        let factor = self.factor(elapsed_ms, score, config);
        Scaling {
            speed: (self.base_speed + factor * config.speed_gain).min(config.max_speed),
            spawn_interval_ms: (self.base_spawn_ms - factor * config.spawn_gain)
                .max(self.min_spawn_ms),
        }
    }
}
