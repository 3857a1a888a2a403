// Keystroke probing and word submission against the live horde.
use log::debug;

use super::horde::ZombieId;
use super::{Game, GameEvent, Phase};

/// Result of checking the in-progress input on each keystroke.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Probe {
    /// Nothing typed (or only whitespace).
    Empty,
    /// Nearest zombie whose word starts with the input.
    Candidate(ZombieId),
    NoCandidate,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Blank input, or the game is not running.
    Ignored,
    Kill { id: ZombieId, word: &'static str },
    /// `penalty` is set when this mismatch reset the streak.
    Mismatch { penalty: bool },
}

impl Game {
    /// Read-only prefix check for live "no such zombie" feedback.
    pub fn probe(&self, text: &str) -> Probe {
        if text.trim().is_empty() {
            return Probe::Empty;
        }
        match self.horde.matching_prefix(text) {
            Some(z) => Probe::Candidate(z.id),
            None => Probe::NoCandidate,
        }
    }

    /// Enter pressed with `text` in the field. The caller clears the field
    /// afterwards for both kills and mismatches.
    pub fn submit(&mut self, text: &str) -> SubmitOutcome {
        if self.phase != Phase::Running || text.trim().is_empty() {
            return SubmitOutcome::Ignored;
        }

        let Some(id) = self.horde.matching_exact(text).map(|z| z.id) else {
            let penalty = self.session.record_mismatch(&self.config);
            debug!(
                "mismatch `{}` ({} in a row, penalty: {penalty})",
                text.trim(),
                self.session.wrong_inputs
            );
            self.events.push(GameEvent::Mismatch { penalty });
            return SubmitOutcome::Mismatch { penalty };
        };

        let Some(zombie) = self.horde.remove(id) else {
            return SubmitOutcome::Ignored;
        };
        let report = self.session.record_kill(&self.config);
        debug!(
            "killed {} `{}` (score {}, streak {})",
            zombie.id, zombie.word, self.session.score, self.session.streak
        );
        self.events.push(GameEvent::Killed {
            id: zombie.id,
            word: zombie.word,
        });
        if report.new_record {
            self.persist_high_score();
        }
        if report.life_restored {
            self.events.push(GameEvent::LifeRestored {
                lives: self.session.lives,
            });
        }
        SubmitOutcome::Kill {
            id: zombie.id,
            word: zombie.word,
        }
    }
}
