/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.

use serde::Deserialize;
use std::path::PathBuf;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub grid: GridConfig,
    pub engine_lib: String,
    pub save_file: PathBuf,
    pub levels_dir: PathBuf,
    pub target_fps: u32,
}

/// Geometry of the lawn grid: where it sits on screen, how big a tile is
/// in terminal cells, and how big the simulation considers the same tile.
#[derive(Clone, Debug)]
pub struct GridConfig {
    pub origin_x: u16,
    pub origin_y: u16,
    pub tile_w: u16,
    pub tile_h: u16,
    pub sim_tile_w: f32,
    pub sim_tile_h: f32,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    grid: TomlGrid,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug)]
struct TomlGrid {
    #[serde(default = "default_origin_x")]
    origin_x: u16,
    #[serde(default = "default_origin_y")]
    origin_y: u16,
    #[serde(default = "default_tile_w")]
    tile_w: u16,
    #[serde(default = "default_tile_h")]
    tile_h: u16,
    #[serde(default = "default_sim_tile_w")]
    sim_tile_w: f32,
    #[serde(default = "default_sim_tile_h")]
    sim_tile_h: f32,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default = "default_engine_lib")]
    engine_lib: String,
    #[serde(default = "default_save_file")]
    save_file: String,
    #[serde(default = "default_levels_dir")]
    levels_dir: String,
    #[serde(default = "default_target_fps")]
    target_fps: u32,
}

// ── Defaults ──

fn default_origin_x() -> u16 { 24 }
fn default_origin_y() -> u16 { 6 }
fn default_tile_w() -> u16 { 8 }
fn default_tile_h() -> u16 { 3 }
// Must match what the native engine uses for one tile.
fn default_sim_tile_w() -> f32 { 110.0 }
fn default_sim_tile_h() -> f32 { 141.0 }

fn default_engine_lib() -> String { "TowerEngine".into() }
fn default_save_file() -> String { "save.toml".into() }
fn default_levels_dir() -> String { "levels".into() }
fn default_target_fps() -> u32 { 60 }

impl Default for TomlGrid {
    fn default() -> Self {
        TomlGrid {
            origin_x: default_origin_x(),
            origin_y: default_origin_y(),
            tile_w: default_tile_w(),
            tile_h: default_tile_h(),
            sim_tile_w: default_sim_tile_w(),
            sim_tile_h: default_sim_tile_h(),
        }
    }
}

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral {
            engine_lib: default_engine_lib(),
            save_file: default_save_file(),
            levels_dir: default_levels_dir(),
            target_fps: default_target_fps(),
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let search_dirs = candidate_dirs();
        let toml_cfg = load_toml(&search_dirs);

        let save_file = resolve_path(&search_dirs, &toml_cfg.general.save_file, false);
        let levels_dir = resolve_path(&search_dirs, &toml_cfg.general.levels_dir, true);

        GameConfig {
            grid: GridConfig {
                origin_x: toml_cfg.grid.origin_x,
                origin_y: toml_cfg.grid.origin_y,
                tile_w: toml_cfg.grid.tile_w.max(1),
                tile_h: toml_cfg.grid.tile_h.max(1),
                sim_tile_w: toml_cfg.grid.sim_tile_w,
                sim_tile_h: toml_cfg.grid.sim_tile_h,
            },
            engine_lib: toml_cfg.general.engine_lib,
            save_file,
            levels_dir,
            target_fps: toml_cfg.general.target_fps.clamp(10, 240),
        }
    }
}

/// Resolve a possibly-relative path against the candidate directories.
/// When `must_be_dir` is set, only an existing directory wins the search.
fn resolve_path(search_dirs: &[PathBuf], raw: &str, must_be_dir: bool) -> PathBuf {
    let p = PathBuf::from(raw);
    if p.is_absolute() {
        return p;
    }
    search_dirs
        .iter()
        .map(|d| d.join(raw))
        .find(|c| if must_be_dir { c.is_dir() } else { c.exists() })
        .unwrap_or_else(|| search_dirs.first().map(|d| d.join(raw)).unwrap_or(p))
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                    Ok(cfg) => return cfg,
                    Err(e) => {
                        eprintln!("Warning: config.toml parse error: {e}");
                        eprintln!("Using default settings.");
                        return TomlConfig::default();
                    }
                },
                Err(e) => {
                    eprintln!("Warning: could not read {}: {e}", path.display());
                }
            }
        }
    }
    TomlConfig::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_full_defaults() {
        let cfg: TomlConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.grid.tile_w, 8);
        assert_eq!(cfg.general.engine_lib, "TowerEngine");
        assert_eq!(cfg.general.target_fps, 60);
    }

    #[test]
    fn partial_section_keeps_other_keys() {
        let cfg: TomlConfig = toml::from_str("[grid]\ntile_w = 6\n").unwrap();
        assert_eq!(cfg.grid.tile_w, 6);
        assert_eq!(cfg.grid.tile_h, 3);
        assert_eq!(cfg.general.save_file, "save.toml");
    }
}
