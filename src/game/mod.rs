//! Zombie Typer simulation core.
//!
//! `Game` owns everything a run needs: the horde, the session counters, the
//! difficulty profile and the RNG. A host drives it by calling `tick` with frame
//! timestamps (or `step` with a delta) and feeds it keyboard submissions; the
//! game answers with `GameEvent`s that a presentation layer turns into DOM
//! updates and sounds. Nothing in here touches web APIs, so the whole loop runs
//! under plain `cargo test`.
//!
//! Time is host time in milliseconds. Pausing records when it started; resuming
//! shifts every anchor forward by the paused span, so elapsed-time driven
//! scaling only ever sees active play.

use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::storage::{self, KeyValueStore};

pub mod difficulty;
pub mod horde;
pub mod input;
pub mod session;
pub mod words;

pub use difficulty::{Difficulty, DifficultyProfile, Scaling};
pub use horde::{Horde, Zombie, ZombieId};
pub use input::{Probe, SubmitOutcome};
pub use session::{KillReport, Outcome, Session, Summary};

/// Tunables shared by every difficulty.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameConfig {
    /// Width of the play field in field units (pixels in the browser).
    pub field_width: f64,
    /// Zombies appear this far past the right edge.
    pub spawn_margin: f64,
    /// A zombie whose x drops below this has got through.
    pub escape_limit: f64,
    pub max_speed: f64,
    /// Speed added per unit of difficulty factor.
    pub speed_gain: f64,
    /// Milliseconds removed from the spawn interval per unit of difficulty factor.
    pub spawn_gain: f64,
    /// Points per unit of scaling factor.
    pub score_divisor: f64,
    /// Seconds per unit of word-difficulty factor.
    pub word_time_divisor: f64,
    /// Points per unit of word-difficulty factor.
    pub word_score_divisor: f64,
    pub kill_points: u32,
    pub max_lives: u32,
    /// Every this-many streak a missing life comes back.
    pub heal_every: u32,
    /// Consecutive mismatches that break the streak.
    pub mismatch_limit: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            field_width: 600.0,
            spawn_margin: 60.0,
            escape_limit: -60.0,
            max_speed: 360.0,
            speed_gain: 45.0,
            spawn_gain: 260.0,
            score_divisor: 120.0,
            word_time_divisor: 28.0,
            word_score_divisor: 80.0,
            kill_points: 10,
            max_lives: 3,
            heal_every: 20,
            mismatch_limit: 3,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Phase {
    Idle,
    Running,
    Paused { since_ms: f64 },
    Ended(Outcome),
}

/// Things that happened during a tick or a submission, in order.
#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    Spawned { id: ZombieId, word: &'static str },
    Killed { id: ZombieId, word: &'static str },
    Missed { id: ZombieId },
    LifeRestored { lives: u32 },
    NewRecord { high_score: u32 },
    Mismatch { penalty: bool },
    Ended(Summary),
}

/// Anchors set on the first frame of a run.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Clock {
    start_ms: f64,
    last_frame_ms: f64,
    last_spawn_ms: f64,
}

impl Clock {
    fn shift(&mut self, by_ms: f64) {
        self.start_ms += by_ms;
        self.last_frame_ms += by_ms;
        self.last_spawn_ms += by_ms;
    }
}

pub struct Game {
    config: GameConfig,
    difficulty: Difficulty,
    phase: Phase,
    clock: Option<Clock>,
    scaling: Scaling,
    horde: Horde,
    session: Session,
    next_id: u64,
    rng: SmallRng,
    store: Box<dyn KeyValueStore>,
    events: Vec<GameEvent>,
    summary: Option<Summary>,
}

impl Game {
    /// New idle game, high score loaded from `store`.
    pub fn new(difficulty: Difficulty, store: Box<dyn KeyValueStore>) -> Self {
        Self::with_rng(difficulty, store, SmallRng::from_entropy())
    }

    /// Deterministic word choice, for tests and replays.
    pub fn with_seed(difficulty: Difficulty, store: Box<dyn KeyValueStore>, seed: u64) -> Self {
        Self::with_rng(difficulty, store, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(difficulty: Difficulty, store: Box<dyn KeyValueStore>, rng: SmallRng) -> Self {
        let config = GameConfig::default();
        let high_score = storage::load_high_score(&*store);
        Self {
            session: Session::new(high_score, &config),
            scaling: difficulty.profile().base_scaling(),
            config,
            difficulty,
            phase: Phase::Idle,
            clock: None,
            horde: Horde::new(),
            next_id: 0,
            rng,
            store,
            events: Vec::new(),
            summary: None,
        }
    }

    pub fn with_config(mut self, config: GameConfig) -> Self {
        self.session = Session::new(self.session.high_score, &config);
        self.config = config;
        self
    }

    // --- Lifecycle -----------------------------------------------------------

    /// Begins a fresh run (also used for restarts and difficulty changes).
    /// The clock anchors on the next `tick`.
    pub fn start(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
        self.horde.clear();
        self.session.reset(&self.config);
        self.clock = None;
        self.scaling = difficulty.profile().base_scaling();
        self.summary = None;
        self.events.clear();
        self.phase = Phase::Running;
        info!(
            "run started on {} (high score {})",
            difficulty.label(),
            self.session.high_score
        );
    }

    pub fn pause(&mut self, now_ms: f64) {
        if self.phase == Phase::Running {
            self.phase = Phase::Paused { since_ms: now_ms };
            debug!("paused at {now_ms:.0}ms");
        }
    }

    pub fn resume(&mut self, now_ms: f64) {
        if let Phase::Paused { since_ms } = self.phase {
            let paused_for = (now_ms - since_ms).max(0.0);
            if let Some(clock) = self.clock.as_mut() {
                clock.shift(paused_for);
            }
            self.phase = Phase::Running;
            debug!("resumed after {paused_for:.0}ms");
        }
    }

    /// Pauses a running game or resumes a paused one; no-op otherwise.
    pub fn toggle_pause(&mut self, now_ms: f64) {
        match self.phase {
            Phase::Running => self.pause(now_ms),
            Phase::Paused { .. } => self.resume(now_ms),
            Phase::Idle | Phase::Ended(_) => {}
        }
    }

    /// Terminates the run. Defeat is triggered internally when lives run out;
    /// `StageClear` is only reachable through this call and is left for a
    /// host-defined win condition.
    pub fn end(&mut self, now_ms: f64, outcome: Outcome) {
        if !matches!(self.phase, Phase::Running | Phase::Paused { .. }) {
            return;
        }
        let active_ms = self.active_ms(now_ms);
        let summary = Summary::from_session(&self.session, self.difficulty, outcome, active_ms);
        info!(
            "{}: score {}, best combo {}, {}s",
            outcome.title(),
            summary.score,
            summary.max_streak,
            summary.elapsed_secs
        );
        self.phase = Phase::Ended(outcome);
        self.events.push(GameEvent::Ended(summary.clone()));
        self.summary = Some(summary);
    }

    // --- Frame stepping --------------------------------------------------------

    /// Advances the simulation to host time `now_ms`. Does nothing unless running.
    pub fn tick(&mut self, now_ms: f64) {
        if self.phase != Phase::Running {
            return;
        }

        let clock = match self.clock {
            Some(clock) => clock,
            None => {
                let clock = Clock {
                    start_ms: now_ms,
                    last_frame_ms: now_ms,
                    last_spawn_ms: now_ms,
                };
                self.clock = Some(clock);
                self.spawn(now_ms);
                clock
            }
        };

        self.scaling = self.difficulty.profile().scale(
            now_ms - clock.start_ms,
            self.session.score,
            &self.config,
        );

        let delta_ms = (now_ms - clock.last_frame_ms).max(0.0);
        self.horde.advance(self.scaling.speed * delta_ms / 1000.0);
        if let Some(c) = self.clock.as_mut() {
            c.last_frame_ms = now_ms;
        }

        for zombie in self.horde.drain_escaped(self.config.escape_limit) {
            self.session.record_miss();
            debug!(
                "{} `{}` got through, {} lives left",
                zombie.id, zombie.word, self.session.lives
            );
            self.events.push(GameEvent::Missed { id: zombie.id });
        }
        if self.session.is_defeated() {
            self.end(now_ms, Outcome::Defeat);
            return;
        }

        let since_spawn = self.clock.map(|c| now_ms - c.last_spawn_ms).unwrap_or(0.0);
        if since_spawn >= self.scaling.spawn_interval_ms {
            self.spawn(now_ms);
        }
    }

    /// Host-scheduler form of `tick`: advance by `delta_ms` of active time.
    /// The first call of a run anchors the clock at 0.
    pub fn step(&mut self, delta_ms: f64) {
        let now_ms = match self.clock {
            Some(c) => c.last_frame_ms + delta_ms.max(0.0),
            None => 0.0,
        };
        self.tick(now_ms);
    }

    fn spawn(&mut self, now_ms: f64) {
        let factor = self.word_factor(now_ms);
        let word = words::pool_for(self.difficulty, factor).pick(&mut self.rng);
        self.next_id += 1;
        let id = ZombieId(self.next_id);
        self.horde.add(Zombie {
            id,
            word,
            x: self.config.field_width + self.config.spawn_margin,
        });
        if let Some(c) = self.clock.as_mut() {
            c.last_spawn_ms = now_ms;
        }
        debug!("spawned {id} `{word}` (word factor {factor:.2})");
        self.events.push(GameEvent::Spawned { id, word });
    }

    fn persist_high_score(&mut self) {
        let high_score = self.session.high_score;
        storage::save_high_score(&mut *self.store, high_score);
        info!("new high score {high_score}");
        self.events.push(GameEvent::NewRecord { high_score });
    }

    // --- Queries ---------------------------------------------------------------

    /// Factor used to choose the vocabulary mix; 0 until the run is anchored.
    pub fn word_factor(&self, now_ms: f64) -> f64 {
        let Some(clock) = self.clock else {
            return 0.0;
        };
        let elapsed_secs = (now_ms - clock.start_ms).max(0.0) / 1000.0;
        (elapsed_secs / self.config.word_time_divisor
            + self.session.score as f64 / self.config.word_score_divisor)
            * self.difficulty.profile().multiplier
    }

    /// Scaling factor at host time `now_ms` (0 until anchored). While paused the
    /// paused span is excluded.
    pub fn difficulty_factor(&self, now_ms: f64) -> f64 {
        let Some(clock) = self.clock else {
            return 0.0;
        };
        let now_ms = match self.phase {
            Phase::Paused { since_ms } => since_ms,
            _ => now_ms,
        };
        self.difficulty
            .profile()
            .factor(now_ms - clock.start_ms, self.session.score, &self.config)
    }

    /// Milliseconds of active play as of host time `now_ms`; a pause in
    /// progress counts as stopped at the moment it began.
    pub fn active_ms(&self, now_ms: f64) -> f64 {
        let Some(clock) = self.clock else {
            return 0.0;
        };
        let now_ms = match self.phase {
            Phase::Paused { since_ms } => since_ms,
            _ => now_ms,
        };
        (now_ms - clock.start_ms).max(0.0)
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn set_field_width(&mut self, width: f64) {
        if width > 0.0 {
            self.config.field_width = width;
        }
    }

    /// Word of the nearest zombie, for the hint line.
    pub fn target_hint(&self) -> Option<&'static str> {
        self.horde.nearest().map(|z| z.word)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn is_paused(&self) -> bool {
        matches!(self.phase, Phase::Paused { .. })
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn horde(&self) -> &Horde {
        &self.horde
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn score(&self) -> u32 {
        self.session.score
    }

    pub fn streak(&self) -> u32 {
        self.session.streak
    }

    pub fn max_streak(&self) -> u32 {
        self.session.max_streak
    }

    pub fn lives(&self) -> u32 {
        self.session.lives
    }

    pub fn high_score(&self) -> u32 {
        self.session.high_score
    }

    pub fn speed(&self) -> f64 {
        self.scaling.speed
    }

    pub fn spawn_interval_ms(&self) -> f64 {
        self.scaling.spawn_interval_ms
    }

    /// Set once the run has ended.
    pub fn summary(&self) -> Option<&Summary> {
        self.summary.as_ref()
    }

    pub fn store_mut(&mut self) -> &mut dyn KeyValueStore {
        &mut *self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn game(d: Difficulty) -> Game {
        let mut g = Game::with_seed(d, Box::new(MemoryStore::new()), 42);
        g.start(d);
        g
    }

    #[test]
    fn first_tick_anchors_and_spawns() {
        let mut g = game(Difficulty::Easy);
        assert!(g.horde.is_empty());
        g.tick(5_000.0);
        assert_eq!(g.horde.len(), 1);
        let z = g.horde.nearest().unwrap();
        assert_eq!(z.x, 660.0);
        assert!(words::EASY_WORDS.contains(&z.word));
        assert_eq!(g.clock.unwrap().start_ms, 5_000.0);
        assert!(matches!(g.drain_events().as_slice(), [GameEvent::Spawned { .. }]));
    }

    #[test]
    fn word_factor_follows_time_and_score() {
        let mut g = game(Difficulty::Normal);
        assert_eq!(g.word_factor(50_000.0), 0.0);
        g.tick(1_000.0);
        assert_eq!(g.word_factor(1_000.0), 0.0);
        // 28s of play and 40 points: 1.0 + 0.5
        g.session.score = 40;
        assert!((g.word_factor(29_000.0) - 1.5).abs() < 1e-9);

        let mut h = game(Difficulty::Hard);
        h.tick(0.0);
        h.session.score = 40;
        assert!((h.word_factor(28_000.0) - 1.5 * 2.8).abs() < 1e-9);
    }

    #[test]
    fn word_factor_uses_configured_divisors() {
        let config = GameConfig {
            word_time_divisor: 10.0,
            word_score_divisor: 20.0,
            ..GameConfig::default()
        };
        let mut g = Game::with_seed(Difficulty::Normal, Box::new(MemoryStore::new()), 7)
            .with_config(config.clone());
        assert_eq!(g.config(), &config);
        g.start(Difficulty::Normal);
        g.tick(0.0);
        g.session.score = 20;
        assert!((g.word_factor(10_000.0) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn idle_and_ended_games_do_not_tick() {
        let mut g = Game::with_seed(Difficulty::Normal, Box::new(MemoryStore::new()), 1);
        g.tick(100.0);
        assert!(g.horde.is_empty());
        assert_eq!(g.phase(), Phase::Idle);
    }

    #[test]
    fn zombies_move_by_speed_times_delta() {
        let mut g = game(Difficulty::Normal);
        g.tick(0.0);
        g.tick(1_000.0);
        let speed = g.speed();
        assert!(speed > 150.0 && speed < 152.0);
        let x = g.horde.nearest().unwrap().x;
        assert!((x - (660.0 - speed)).abs() < 1e-9);
    }

    #[test]
    fn spawns_follow_interval() {
        let mut g = game(Difficulty::Hard);
        g.tick(0.0);
        let mut t = 0.0;
        while g.horde.len() < 2 {
            t += 16.0;
            g.tick(t);
        }
        let interval = g.spawn_interval_ms();
        assert!(t >= interval && t - 16.0 < interval + 16.0, "t={t} interval={interval}");
        assert_eq!(g.clock.unwrap().last_spawn_ms, t);
    }

    #[test]
    fn escaped_zombie_costs_one_life() {
        let mut g = game(Difficulty::Normal);
        g.tick(0.0);
        g.horde.add(Zombie { id: ZombieId(99), word: "late", x: -59.0 });
        g.session.streak = 4;
        g.session.wrong_inputs = 2;
        g.drain_events();
        g.tick(10.0);
        assert!(g.horde.get(ZombieId(99)).is_none());
        assert_eq!((g.lives(), g.streak(), g.session.wrong_inputs), (2, 0, 0));
        assert_eq!(g.drain_events(), vec![GameEvent::Missed { id: ZombieId(99) }]);
        g.tick(20.0);
        assert_eq!(g.lives(), 2);
    }

    #[test]
    fn last_life_ends_run_without_spawning() {
        let mut g = game(Difficulty::Normal);
        g.tick(0.0);
        g.session.lives = 1;
        g.horde.clear();
        g.horde.add(Zombie { id: ZombieId(50), word: "a", x: -61.0 });
        g.horde.add(Zombie { id: ZombieId(51), word: "b", x: -70.0 });
        g.drain_events();
        g.tick(10_000.0);
        assert_eq!(g.phase(), Phase::Ended(Outcome::Defeat));
        assert_eq!(g.lives(), 0);
        assert!(g.horde.is_empty());
        let events = g.drain_events();
        assert!(!events.iter().any(|e| matches!(e, GameEvent::Spawned { .. })));
        assert!(matches!(events.last(), Some(GameEvent::Ended(s)) if s.elapsed_secs == 10));
        g.tick(20_000.0);
        assert!(g.horde.is_empty());
    }

    #[test]
    fn pause_freezes_and_resume_reanchors() {
        let mut g = game(Difficulty::Normal);
        g.tick(1_000.0);
        g.tick(4_000.0);
        let before = g.difficulty_factor(4_000.0);
        let x = g.horde.nearest().unwrap().x;
        g.pause(4_000.0);
        g.tick(9_000.0);
        assert_eq!(g.horde.nearest().unwrap().x, x);
        assert_eq!(g.difficulty_factor(60_000.0), before);
        g.resume(64_000.0);
        assert_eq!(g.difficulty_factor(64_000.0), before);
        assert_eq!(g.clock.unwrap().start_ms, 61_000.0);
        g.tick(64_000.0);
        assert_eq!(g.horde.nearest().unwrap().x, x);
    }

    #[test]
    fn step_drives_active_time() {
        let mut g = game(Difficulty::Easy);
        g.step(0.0);
        g.step(500.0);
        g.step(500.0);
        assert_eq!(g.active_ms(g.clock.unwrap().last_frame_ms), 1_000.0);
        assert_eq!(g.horde.len(), 1);
    }

    #[test]
    fn stage_clear_is_explicit() {
        let mut g = game(Difficulty::Hard);
        g.tick(0.0);
        g.end(3_000.0, Outcome::StageClear);
        assert_eq!(g.phase(), Phase::Ended(Outcome::StageClear));
        let s = g.summary().unwrap();
        assert_eq!((s.outcome.title(), s.elapsed_secs, s.difficulty), ("Stage Clear!", 3, Difficulty::Hard));
        g.end(5_000.0, Outcome::Defeat);
        assert_eq!(g.phase(), Phase::Ended(Outcome::StageClear));
    }

    #[test]
    fn restart_keeps_high_score() {
        let mut g = game(Difficulty::Normal);
        g.tick(0.0);
        let word = g.horde.nearest().unwrap().word;
        g.submit(word);
        assert_eq!(g.high_score(), 10);
        g.start(Difficulty::Easy);
        assert_eq!((g.score(), g.streak(), g.lives(), g.high_score()), (0, 0, 3, 10));
        assert!(g.horde.is_empty());
        assert_eq!(g.speed(), 110.0);
    }
}
