/// Optional per-level descriptor: `levels/level_<n>.toml`.
///
/// Currently carries only the set of rows the player may plant in.
/// A missing or unreadable file means every row is playable — the level
/// still loads, it just has no restrictions.

use std::collections::BTreeSet;
use std::path::Path;

use serde::Deserialize;

#[derive(Deserialize, Debug, Default)]
struct LevelToml {
    #[serde(default)]
    settings: LevelSettings,
}

#[derive(Deserialize, Debug, Default)]
struct LevelSettings {
    /// Rows eligible for placement; absent = all rows.
    active_rows: Option<Vec<i32>>,
}

/// Rows eligible for placement on one level.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActiveRows {
    rows: BTreeSet<i32>,
}

impl ActiveRows {
    pub fn all(map_height: i32) -> Self {
        ActiveRows { rows: (0..map_height.max(0)).collect() }
    }

    pub fn contains(&self, row: i32) -> bool {
        self.rows.contains(&row)
    }

    /// Load the descriptor for `level`, constrained to the map height.
    /// Any failure falls back to all rows.
    pub fn load(levels_dir: &Path, level: u32, map_height: i32) -> Self {
        let path = levels_dir.join(format!("level_{level}.toml"));
        let text = match std::fs::read_to_string(&path) {
            Ok(t) => t,
            Err(_) => return Self::all(map_height),
        };
        let parsed: LevelToml = match toml::from_str(&text) {
            Ok(p) => p,
            Err(e) => {
                eprintln!("Warning: {} parse error: {e}", path.display());
                return Self::all(map_height);
            }
        };
        match parsed.settings.active_rows {
            Some(rows) => ActiveRows {
                rows: rows.into_iter().filter(|r| (0..map_height).contains(r)).collect(),
            },
            None => Self::all(map_height),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_levels_dir(tag: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "garden-siege-levels-{tag}-{}",
            std::process::id()
        ));
        let _ = std::fs::create_dir_all(&dir);
        dir
    }

    #[test]
    fn missing_descriptor_means_all_rows() {
        let dir = temp_levels_dir("missing");
        let rows = ActiveRows::load(&dir, 42, 5);
        assert_eq!(rows, ActiveRows::all(5));
        assert!(rows.contains(0));
        assert!(rows.contains(4));
        assert!(!rows.contains(5));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn explicit_rows_are_respected_and_clamped() {
        let dir = temp_levels_dir("explicit");
        std::fs::write(
            dir.join("level_3.toml"),
            "[settings]\nactive_rows = [1, 3, 9, -2]\n",
        )
        .unwrap();
        let rows = ActiveRows::load(&dir, 3, 5);
        assert!(rows.contains(1));
        assert!(rows.contains(3));
        assert!(!rows.contains(0));
        // Out-of-map rows from the file are dropped.
        assert!(!rows.contains(9));
        assert!(!rows.contains(-2));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn malformed_descriptor_falls_back_to_all_rows() {
        let dir = temp_levels_dir("malformed");
        std::fs::write(dir.join("level_1.toml"), "settings = \"nope\"").unwrap();
        assert_eq!(ActiveRows::load(&dir, 1, 5), ActiveRows::all(5));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
