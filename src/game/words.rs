// Vocabularies and the weighted word pool used when a zombie spawns.
use rand::Rng;

use super::difficulty::Difficulty;

pub static EASY_WORDS: [&str; 25] = [
    "cat", "dog", "sun", "moon", "star", "red", "blue", "green", "bird", "fish", "tree", "book",
    "code", "game", "play", "up", "down", "left", "right", "door", "house", "room", "fire", "rain",
    "snow",
];

pub static NORMAL_WORDS: [&str; 19] = [
    "running", "walking", "jumping", "faster", "slower", "better", "danger", "keyring", "treasure",
    "breeze", "ocean", "apple", "grape", "banana", "tomato", "portal", "magic", "zombie", "coder",
];

pub static HARD_WORDS: [&str; 10] = [
    "typingdrill",
    "focusfire",
    "levelrising",
    "combostreak",
    "highscore",
    "deadline",
    "timepressure",
    "accuracycheck",
    "holdtheline",
    "emergency",
];

/// A composed pool: each vocabulary appears as many times as it is listed, so
/// repeating a vocabulary doubles its odds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WordPool {
    parts: &'static [&'static [&'static str]],
}

impl WordPool {
    pub fn len(&self) -> usize {
        self.parts.iter().map(|p| p.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, mut idx: usize) -> Option<&'static str> {
        for part in self.parts {
            if idx < part.len() {
                return Some(part[idx]);
            }
            idx -= part.len();
        }
        None
    }

    pub fn contains(&self, word: &str) -> bool {
        self.parts.iter().any(|p| p.contains(&word))
    }

    /// How many times `word` occurs in the composed pool.
    #[cfg(test)]
    pub fn weight_of(&self, word: &str) -> usize {
        self.parts
            .iter()
            .map(|p| p.iter().filter(|w| **w == word).count())
            .sum()
    }

    /// Uniform draw over the composed pool.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> &'static str {
        let len = self.len();
        self.get(rng.gen_range(0..len)).unwrap_or(EASY_WORDS[0])
    }
}

const E: &[&str] = &EASY_WORDS;
const N: &[&str] = &NORMAL_WORDS;
const H: &[&str] = &HARD_WORDS;

/// Pool for a difficulty at the given word-difficulty factor.
pub fn pool_for(difficulty: Difficulty, factor: f64) -> WordPool {
    let parts: &'static [&'static [&'static str]] = match difficulty {
        Difficulty::Easy => {
            if factor < 1.5 {
                &[E]
            } else if factor < 3.0 {
                &[E, E, N]
            } else {
                &[E, N]
            }
        }
        Difficulty::Normal => {
            if factor < 1.0 {
                &[E, N]
            } else if factor < 2.5 {
                &[E, N, N]
            } else if factor < 4.0 {
                &[N, N, H]
            } else {
                &[N, H, H]
            }
        }
        Difficulty::Hard => {
            if factor < 0.8 {
                &[E, N, H]
            } else if factor < 2.0 {
                &[N, N, H]
            } else {
                &[H, H, N]
            }
        }
    };
    WordPool { parts }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn easy_start_is_easy_only() {
        let pool = pool_for(Difficulty::Easy, 0.0);
        assert_eq!(pool.len(), EASY_WORDS.len());
        assert!(!pool.contains("zombie"));
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..200 {
            assert!(EASY_WORDS.contains(&pool.pick(&mut rng)));
        }
    }

    #[test]
    fn band_edges_are_exclusive_upper() {
        assert_eq!(pool_for(Difficulty::Easy, 1.4999), pool_for(Difficulty::Easy, 0.0));
        assert_eq!(pool_for(Difficulty::Easy, 1.5).weight_of("cat"), 2);
        assert_eq!(pool_for(Difficulty::Easy, 3.0).weight_of("cat"), 1);
        assert!(pool_for(Difficulty::Easy, 100.0).contains("banana"));
        assert!(!pool_for(Difficulty::Easy, 100.0).contains("deadline"));

        assert!(!pool_for(Difficulty::Normal, 0.99).contains("deadline"));
        assert_eq!(pool_for(Difficulty::Normal, 1.0).weight_of("banana"), 2);
        assert!(pool_for(Difficulty::Normal, 2.5).contains("deadline"));
        assert!(!pool_for(Difficulty::Normal, 2.5).contains("cat"));
        assert_eq!(pool_for(Difficulty::Normal, 4.0).weight_of("deadline"), 2);

        assert!(pool_for(Difficulty::Hard, 0.0).contains("cat"));
        assert!(!pool_for(Difficulty::Hard, 0.8).contains("cat"));
        assert_eq!(pool_for(Difficulty::Hard, 2.0).weight_of("deadline"), 2);
        assert_eq!(pool_for(Difficulty::Hard, 2.0).weight_of("banana"), 1);
    }

    #[test]
    fn get_walks_across_parts() {
        let pool = pool_for(Difficulty::Normal, 0.0);
        assert_eq!(pool.get(0), Some("cat"));
        assert_eq!(pool.get(EASY_WORDS.len()), Some("running"));
        assert_eq!(pool.get(pool.len() - 1), Some("coder"));
        assert_eq!(pool.get(pool.len()), None);
    }

    #[test]
    fn every_pool_is_non_empty() {
        for d in Difficulty::ALL {
            for f in [0.0, 0.9, 1.2, 2.2, 3.5, 10.0] {
                assert!(!pool_for(d, f).is_empty());
            }
        }
    }
}
