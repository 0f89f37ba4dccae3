/// Persistent progression: which level and how many plant cards the
/// player has unlocked.
///
/// The record is a tiny TOML file with two fields, both monotonically
/// non-decreasing for the life of the save. A missing or malformed file
/// reads as the fresh-start default and is never an error; a failed
/// write is warned about and otherwise absorbed so the frame loop can't
/// be taken down by a full disk.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub const FIRST_LEVEL: u32 = 1;
pub const LAST_LEVEL: u32 = 8;
/// Fresh clears at or below this level present an unlock reveal.
pub const LAST_REWARDED_LEVEL: u32 = 6;
pub const MAX_PLANTS: u32 = 6;

#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Debug)]
pub struct ProgressionRecord {
    #[serde(default = "default_unlocked_level")]
    pub unlocked_level: u32,
    #[serde(default = "default_plants_count")]
    pub plants_count: u32,
}

fn default_unlocked_level() -> u32 { 1 }
fn default_plants_count() -> u32 { 1 }

impl Default for ProgressionRecord {
    fn default() -> Self {
        ProgressionRecord { unlocked_level: 1, plants_count: 1 }
    }
}

impl ProgressionRecord {
    /// Clamp out-of-range values from a hand-edited file back into the
    /// domain the rest of the controller assumes.
    fn sanitized(self) -> Self {
        ProgressionRecord {
            unlocked_level: self.unlocked_level.max(FIRST_LEVEL),
            plants_count: self.plants_count.clamp(1, MAX_PLANTS),
        }
    }
}

/// The roster size earned by completing a level: one new card per level
/// early on, flattening after the shovel level, capped at the full roster.
fn roster_for_completion(level: u32) -> u32 {
    let candidate = if level < 4 {
        level + 1
    } else if level == 4 {
        4
    } else {
        level
    };
    candidate.min(MAX_PLANTS)
}

pub struct ProgressStore {
    path: PathBuf,
}

impl ProgressStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        ProgressStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted record; any failure yields the default.
    pub fn load(&self) -> ProgressionRecord {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => match toml::from_str::<ProgressionRecord>(&text) {
                Ok(rec) => rec.sanitized(),
                Err(_) => ProgressionRecord::default(),
            },
            Err(_) => ProgressionRecord::default(),
        }
    }

    /// Record a completed level. Fields only ever move up, and calling
    /// again with the same level changes nothing, so replays and
    /// double-fires are harmless. Returns whether the unlocked level
    /// actually advanced (a "fresh" unlock).
    pub fn record_completion(&self, level_completed: u32) -> bool {
        let current = self.load();
        let mut next = current;

        let candidate_level = level_completed.saturating_add(1);
        let advanced = candidate_level > current.unlocked_level;
        if advanced {
            next.unlocked_level = candidate_level;
        }

        let candidate_roster = roster_for_completion(level_completed);
        if candidate_roster > current.plants_count {
            next.plants_count = candidate_roster;
        }

        if next != current {
            self.write(&next);
        }
        advanced
    }

    fn write(&self, record: &ProgressionRecord) {
        let text = match toml::to_string(record) {
            Ok(t) => t,
            Err(e) => {
                eprintln!("Warning: could not serialize progression: {e}");
                return;
            }
        };
        if let Err(e) = std::fs::write(&self.path, text) {
            eprintln!("Warning: could not write {}: {e}", self.path.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A store backed by a unique file in the OS temp dir, removed on drop.
    struct TempStore {
        store: ProgressStore,
    }

    impl TempStore {
        fn new(tag: &str) -> Self {
            let path = std::env::temp_dir().join(format!(
                "garden-siege-progress-{tag}-{}.toml",
                std::process::id()
            ));
            let _ = std::fs::remove_file(&path);
            TempStore { store: ProgressStore::new(path) }
        }
    }

    impl Drop for TempStore {
        fn drop(&mut self) {
            let _ = std::fs::remove_file(self.store.path());
        }
    }

    #[test]
    fn missing_file_loads_defaults() {
        let t = TempStore::new("missing");
        assert_eq!(t.store.load(), ProgressionRecord::default());
    }

    #[test]
    fn malformed_file_loads_defaults() {
        let t = TempStore::new("malformed");
        std::fs::write(t.store.path(), "unlocked_level = \"lots\"").unwrap();
        assert_eq!(t.store.load(), ProgressionRecord::default());
    }

    #[test]
    fn unknown_fields_are_tolerated_and_missing_fields_default() {
        let t = TempStore::new("partial");
        std::fs::write(t.store.path(), "unlocked_level = 3\nfuture_field = true").unwrap();
        let rec = t.store.load();
        assert_eq!(rec.unlocked_level, 3);
        assert_eq!(rec.plants_count, 1);
    }

    #[test]
    fn fresh_clear_of_level_one() {
        let t = TempStore::new("fresh");
        let advanced = t.store.record_completion(1);
        assert!(advanced);
        assert_eq!(
            t.store.load(),
            ProgressionRecord { unlocked_level: 2, plants_count: 2 }
        );
    }

    #[test]
    fn replaying_an_old_level_changes_nothing() {
        let t = TempStore::new("replay");
        std::fs::write(
            t.store.path(),
            toml::to_string(&ProgressionRecord { unlocked_level: 5, plants_count: 4 }).unwrap(),
        )
        .unwrap();
        let advanced = t.store.record_completion(2);
        assert!(!advanced);
        assert_eq!(
            t.store.load(),
            ProgressionRecord { unlocked_level: 5, plants_count: 4 }
        );
    }

    #[test]
    fn record_completion_is_idempotent() {
        let t = TempStore::new("idem");
        assert!(t.store.record_completion(3));
        let after_first = t.store.load();
        assert!(!t.store.record_completion(3));
        assert_eq!(t.store.load(), after_first);
    }

    #[test]
    fn fields_never_decrease_under_arbitrary_sequences() {
        let t = TempStore::new("monotone");
        let sequence = [5u32, 1, 7, 2, 2, 8, 3, 1, 6];
        let mut prev = t.store.load();
        for level in sequence {
            t.store.record_completion(level);
            let now = t.store.load();
            assert!(now.unlocked_level >= prev.unlocked_level);
            assert!(now.plants_count >= prev.plants_count);
            prev = now;
        }
    }

    #[test]
    fn roster_curve_over_the_campaign() {
        let t = TempStore::new("curve");
        let mut rosters = Vec::new();
        let mut unlocked = Vec::new();
        for level in 1..=8 {
            t.store.record_completion(level);
            let rec = t.store.load();
            rosters.push(rec.plants_count);
            unlocked.push(rec.unlocked_level);
        }
        assert_eq!(rosters, vec![2, 3, 4, 4, 5, 6, 6, 6]);
        assert_eq!(unlocked, vec![2, 3, 4, 5, 6, 7, 8, 9]);
    }

    #[test]
    fn hand_edited_garbage_values_are_clamped() {
        let t = TempStore::new("clamp");
        std::fs::write(t.store.path(), "unlocked_level = 0\nplants_count = 99").unwrap();
        let rec = t.store.load();
        assert_eq!(rec.unlocked_level, 1);
        assert_eq!(rec.plants_count, MAX_PLANTS);
    }
}
