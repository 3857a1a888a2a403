//! Active zombies and the nearest / matching queries the input side needs.

use std::fmt;

/// Identity of a spawned zombie. Allocated in increasing order, so a lower id
/// always means an earlier spawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ZombieId(pub u64);

impl fmt::Display for ZombieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "z{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Zombie {
    pub id: ZombieId,
    pub word: &'static str,
    /// Horizontal offset from the left edge of the field; decreases as it walks.
    pub x: f64,
}

/// Registry of live zombies, kept in spawn order.
///
/// "Nearest" means smallest `x`. When two zombies share the same `x` the one
/// spawned first wins.
#[derive(Debug, Default)]
pub struct Horde {
    zombies: Vec<Zombie>,
}

impl Horde {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, zombie: Zombie) {
        self.zombies.push(zombie);
    }

    pub fn remove(&mut self, id: ZombieId) -> Option<Zombie> {
        let idx = self.zombies.iter().position(|z| z.id == id)?;
        Some(self.zombies.remove(idx))
    }

    pub fn get(&self, id: ZombieId) -> Option<&Zombie> {
        self.zombies.iter().find(|z| z.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Zombie> {
        self.zombies.iter()
    }

    pub fn len(&self) -> usize {
        self.zombies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zombies.is_empty()
    }

    pub fn clear(&mut self) {
        self.zombies.clear();
    }

    pub fn nearest(&self) -> Option<&Zombie> {
        front_of(self.zombies.iter())
    }

    /// Nearest zombie whose word equals the trimmed input.
    pub fn matching_exact(&self, text: &str) -> Option<&Zombie> {
        let needle = text.trim();
        if needle.is_empty() {
            return None;
        }
        front_of(self.zombies.iter().filter(|z| z.word == needle))
    }

    /// Nearest zombie whose word starts with the trimmed input.
    pub fn matching_prefix(&self, text: &str) -> Option<&Zombie> {
        let needle = text.trim();
        if needle.is_empty() {
            return None;
        }
        front_of(self.zombies.iter().filter(|z| z.word.starts_with(needle)))
    }

    /// Moves every zombie left by `distance` field units.
    pub fn advance(&mut self, distance: f64) {
        for z in &mut self.zombies {
            z.x -= distance;
        }
    }

    /// Removes and returns every zombie past `limit` (strictly below it), in spawn order.
    pub fn drain_escaped(&mut self, limit: f64) -> Vec<Zombie> {
        let mut escaped = Vec::new();
        self.zombies.retain(|z| {
            if z.x < limit {
                escaped.push(z.clone());
                false
            } else {
                true
            }
        });
        escaped
    }
}

// Strict `<` keeps the earliest-spawned zombie on ties.
fn front_of<'a>(mut it: impl Iterator<Item = &'a Zombie>) -> Option<&'a Zombie> {
    let first = it.next()?;
    Some(it.fold(first, |front, z| if z.x < front.x { z } else { front }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn z(id: u64, word: &'static str, x: f64) -> Zombie {
        Zombie { id: ZombieId(id), word, x }
    }

    fn sample() -> Horde {
        let mut h = Horde::new();
        h.add(z(1, "banana", 300.0));
        h.add(z(2, "band", 120.0));
        h.add(z(3, "cat", 50.0));
        h.add(z(4, "banana", 80.0));
        h
    }

    #[test]
    fn nearest_is_smallest_x() {
        let h = sample();
        assert_eq!(h.nearest().map(|z| z.id), Some(ZombieId(3)));
        assert!(Horde::new().nearest().is_none());
    }

    #[test]
    fn nearest_tie_prefers_first_spawned() {
        let mut h = Horde::new();
        h.add(z(5, "sun", 40.0));
        h.add(z(6, "moon", 40.0));
        assert_eq!(h.nearest().map(|z| z.id), Some(ZombieId(5)));
        assert_eq!(h.matching_prefix("").map(|z| z.id), None);
    }

    #[test]
    fn exact_picks_nearest_duplicate() {
        let h = sample();
        assert_eq!(h.matching_exact("banana").map(|z| z.id), Some(ZombieId(4)));
        assert_eq!(h.matching_exact("  banana \t").map(|z| z.id), Some(ZombieId(4)));
        assert!(h.matching_exact("bana").is_none());
        assert!(h.matching_exact("   ").is_none());
    }

    #[test]
    fn prefix_picks_nearest_candidate() {
        let h = sample();
        assert_eq!(h.matching_prefix("ban").map(|z| z.id), Some(ZombieId(4)));
        assert_eq!(h.matching_prefix("band").map(|z| z.id), Some(ZombieId(2)));
        assert!(h.matching_prefix("dog").is_none());
        assert!(h.matching_prefix("").is_none());
    }

    #[test]
    fn drain_escaped_removes_once() {
        let mut h = sample();
        h.advance(115.0);
        let gone = h.drain_escaped(-60.0);
        assert_eq!(gone.iter().map(|z| z.id).collect::<Vec<_>>(), vec![ZombieId(3)]);
        assert_eq!(h.len(), 3);
        assert!(h.drain_escaped(-60.0).is_empty());
        // banana #4 now sits at -35; exactly on the limit is still in the field
        h.advance(25.0);
        assert!(h.drain_escaped(-60.0).is_empty());
        h.advance(0.5);
        let gone = h.drain_escaped(-60.0);
        assert_eq!(gone.len(), 1);
        assert_eq!(gone[0].id, ZombieId(4));
    }

    #[test]
    fn remove_by_id() {
        let mut h = sample();
        assert_eq!(h.remove(ZombieId(2)).map(|z| z.word), Some("band"));
        assert!(h.remove(ZombieId(2)).is_none());
        assert!(h.get(ZombieId(2)).is_none());
        assert_eq!(h.len(), 3);
    }
}
