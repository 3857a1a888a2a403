//! Score, streak, lives and the end-of-session summary.

use super::GameConfig;
use super::difficulty::Difficulty;

/// How a run finished.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Outcome {
    Defeat,
    /// Not reachable from the simulation itself; see `Game::end`.
    StageClear,
}

impl Outcome {
    pub fn title(self) -> &'static str {
        match self {
            Outcome::Defeat => "Game Over",
            Outcome::StageClear => "Stage Clear!",
        }
    }
}

/// Effects of a kill, for the presentation side.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KillReport {
    pub new_record: bool,
    pub life_restored: bool,
}

/// Per-run counters plus the carried-over high score.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub score: u32,
    pub streak: u32,
    pub max_streak: u32,
    pub lives: u32,
    pub high_score: u32,
    /// Consecutive mismatched submissions since the last kill or miss.
    pub wrong_inputs: u32,
}

impl Session {
    pub fn new(high_score: u32, config: &GameConfig) -> Self {
        Self {
            score: 0,
            streak: 0,
            max_streak: 0,
            lives: config.max_lives,
            high_score,
            wrong_inputs: 0,
        }
    }

    /// Fresh counters for a new run, keeping the high score.
    pub fn reset(&mut self, config: &GameConfig) {
        *self = Session::new(self.high_score, config);
    }

    pub fn record_kill(&mut self, config: &GameConfig) -> KillReport {
        self.score += config.kill_points;
        self.streak += 1;
        self.max_streak = self.max_streak.max(self.streak);
        self.wrong_inputs = 0;

        let new_record = self.score > self.high_score;
        if new_record {
            self.high_score = self.score;
        }

        let life_restored = config.heal_every > 0
            && self.streak % config.heal_every == 0
            && self.lives < config.max_lives;
        if life_restored {
            self.lives += 1;
        }
        KillReport { new_record, life_restored }
    }

    /// A zombie got through. Returns true when that was the last life.
    pub fn record_miss(&mut self) -> bool {
        self.lives = self.lives.saturating_sub(1);
        self.streak = 0;
        self.wrong_inputs = 0;
        self.lives == 0
    }

    /// A submitted word matched nothing. Returns true when the streak penalty fired.
    pub fn record_mismatch(&mut self, config: &GameConfig) -> bool {
        self.wrong_inputs += 1;
        if self.wrong_inputs >= config.mismatch_limit {
            self.streak = 0;
            self.wrong_inputs = 0;
            true
        } else {
            false
        }
    }

    pub fn is_defeated(&self) -> bool {
        self.lives == 0
    }
}

/// End-of-session figures shown in the overlay.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Summary {
    pub elapsed_secs: u64,
    pub score: u32,
    pub max_streak: u32,
    pub high_score: u32,
    pub difficulty: Difficulty,
    pub outcome: Outcome,
}

impl Summary {
    pub fn from_session(
        session: &Session,
        difficulty: Difficulty,
        outcome: Outcome,
        active_ms: f64,
    ) -> Self {
        Self {
            elapsed_secs: (active_ms / 1000.0).round().max(0.0) as u64,
            score: session.score,
            max_streak: session.max_streak,
            high_score: session.high_score,
            difficulty,
            outcome,
        }
    }

    /// Overlay body, one figure per line.
    pub fn message(&self) -> String {
        format!(
            "Play time: {}s\nFinal score: {}\nBest combo: {}\nHigh Score: {}\nDifficulty: {}",
            self.elapsed_secs,
            self.score,
            self.max_streak,
            self.high_score,
            self.difficulty.label()
        )
    }

    #[cfg(feature = "serde_json")]
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
