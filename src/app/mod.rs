/// Application state machine.
///
/// Owns everything the simulation does not: the active screen, the
/// per-session selection state, cached progression, and the audio
/// director. Each frame the main loop feeds it interpreted UI actions
/// and one `tick`; it answers with a `FrameOutput` of cues and music
/// requests for the output stage. The simulation handle, the screen and
/// the session all live on this one context object — nothing reads
/// ambient globals.

pub mod levelcfg;
pub mod progress;

use levelcfg::ActiveRows;
use progress::{ProgressStore, ProgressionRecord, FIRST_LEVEL, LAST_LEVEL, LAST_REWARDED_LEVEL};

use crate::config::GameConfig;
use crate::engine::Simulation;
use crate::grid::{Cell, GridGeometry};
use crate::ui::audio::{cue_for_effect, AudioDirector, Cue, MusicTrack};
use crate::ui::resolver::effect_just_started;

/// Engine sound events consumed per frame, at most.
const SOUND_DRAIN_BOUND: usize = 64;
/// The shovel becomes available once this level is behind the player.
const SHOVEL_UNLOCK_LEVEL: u32 = 4;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Screen {
    MainMenu,
    LevelSelect,
    InGame,
    Paused,
    UnlockReveal,
    Win,
    GameOver,
}

/// The state machine's input alphabet. The ui layer turns raw pointer
/// and key events into these; tests feed them directly.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum UiAction {
    Continue,
    OpenLevels,
    QuitGame,
    PickLevel(u32),
    Back,
    ToggleMute,
    ToggleMusicMute,
    Pause,
    Resume,
    Restart,
    ToMenu,
    NextLevel,
    RetryOrNext,
    SelectCard(usize),
    ToggleDig,
    CancelDig,
    FieldClick(Cell),
}

/// Per-session mutable state, reset pieces on every level load.
#[derive(Clone, Debug)]
pub struct SessionContext {
    pub current_level: u32,
    pub selected_plant: usize,
    pub digging: bool,
    pub active_rows: ActiveRows,
    pub map_w: i32,
    pub map_h: i32,
}

impl SessionContext {
    fn new() -> Self {
        SessionContext {
            current_level: FIRST_LEVEL,
            selected_plant: 0,
            digging: false,
            active_rows: ActiveRows::all(0),
            map_w: 0,
            map_h: 0,
        }
    }
}

/// Side effects requested during a frame, drained by the main loop.
#[derive(Default, Debug)]
pub struct FrameOutput {
    pub cues: Vec<Cue>,
    pub music: Option<MusicTrack>,
    pub pause_music: bool,
    pub resume_music: bool,
}

pub struct App<S: Simulation> {
    pub sim: S,
    pub screen: Screen,
    pub session: SessionContext,
    pub record: ProgressionRecord,
    pub director: AudioDirector,
    pub geom: GridGeometry,
    pub shovel_unlocked: bool,
    /// Unlock id shown on the reveal screen after a fresh clear.
    pub just_unlocked: Option<u32>,
    pub quit_requested: bool,
    store: ProgressStore,
    levels_dir: std::path::PathBuf,
    out: FrameOutput,
}

impl<S: Simulation> App<S> {
    pub fn new(sim: S, cfg: &GameConfig, director: AudioDirector) -> Self {
        let store = ProgressStore::new(&cfg.save_file);
        let record = store.load();
        let mut app = App {
            sim,
            screen: Screen::MainMenu,
            session: SessionContext::new(),
            shovel_unlocked: record.unlocked_level > SHOVEL_UNLOCK_LEVEL,
            record,
            director,
            geom: GridGeometry::new(&cfg.grid),
            just_unlocked: None,
            quit_requested: false,
            store,
            levels_dir: cfg.levels_dir.clone(),
            out: FrameOutput::default(),
        };
        app.out.music = Some(MusicTrack::Menu);
        app
    }

    /// The level the Continue button targets: the unlock frontier,
    /// wrapped back to the start once the campaign is finished.
    pub fn continue_level(&self) -> u32 {
        if self.record.unlocked_level > LAST_LEVEL {
            FIRST_LEVEL
        } else {
            self.record.unlocked_level
        }
    }

    // ── Level loading ──

    /// Load `level` into the simulation and reset per-level transient
    /// state. Out-of-range levels wrap back to the first.
    fn load_level(&mut self, level: u32, now_ms: u64) {
        let level = if (FIRST_LEVEL..=LAST_LEVEL).contains(&level) { level } else { FIRST_LEVEL };
        self.sim.load_level(level);
        self.session.current_level = level;
        self.session.digging = false;
        self.session.map_w = self.sim.map_width();
        self.session.map_h = self.sim.map_height();
        self.session.active_rows = ActiveRows::load(&self.levels_dir, level, self.session.map_h);
        self.session.selected_plant = self
            .session
            .selected_plant
            .min(self.record.plants_count.saturating_sub(1) as usize);
        self.just_unlocked = None;
        self.screen = Screen::InGame;
        self.director.begin_session(now_ms);
        self.out.music = Some(MusicTrack::Game(level));
    }

    fn to_menu(&mut self) {
        self.screen = Screen::MainMenu;
        self.director.end_session();
        self.out.music = Some(MusicTrack::Menu);
    }

    // ── Input ──

    pub fn apply(&mut self, action: UiAction, now_ms: u64) {
        // Audio toggles are reachable from the menu and the pause screen.
        if matches!(self.screen, Screen::MainMenu | Screen::Paused) {
            match action {
                UiAction::ToggleMute => {
                    self.director.toggle_mute();
                    self.out.cues.push(Cue::Click);
                    return;
                }
                UiAction::ToggleMusicMute => {
                    self.director.toggle_music_mute();
                    if self.director.music_muted {
                        self.out.pause_music = true;
                    } else {
                        self.out.resume_music = true;
                    }
                    self.out.cues.push(Cue::Click);
                    return;
                }
                _ => {}
            }
        }

        match (self.screen, action) {
            // ── Main menu ──
            (Screen::MainMenu, UiAction::Continue) => {
                self.out.cues.push(Cue::Click);
                let target = self.continue_level();
                self.load_level(target, now_ms);
            }
            (Screen::MainMenu, UiAction::OpenLevels) => {
                self.out.cues.push(Cue::Click);
                self.screen = Screen::LevelSelect;
            }
            (Screen::MainMenu, UiAction::QuitGame) => {
                self.quit_requested = true;
            }

            // ── Level select ──
            (Screen::LevelSelect, UiAction::PickLevel(n)) => {
                if n <= self.record.unlocked_level && (FIRST_LEVEL..=LAST_LEVEL).contains(&n) {
                    self.out.cues.push(Cue::Click);
                    self.load_level(n, now_ms);
                }
                // Locked levels: no transition, no feedback.
            }
            (Screen::LevelSelect, UiAction::Back) => {
                self.out.cues.push(Cue::Click);
                self.screen = Screen::MainMenu;
            }

            // ── In game ──
            (Screen::InGame, UiAction::Pause) => {
                self.out.cues.push(Cue::Pause);
                if self.session.digging {
                    // First escape only puts the shovel away.
                    self.session.digging = false;
                } else {
                    self.screen = Screen::Paused;
                    self.out.pause_music = true;
                }
            }
            (Screen::InGame, UiAction::ToggleDig) => {
                if self.shovel_unlocked {
                    self.session.digging = !self.session.digging;
                    self.out.cues.push(if self.session.digging { Cue::Shovel } else { Cue::Click });
                }
            }
            (Screen::InGame, UiAction::CancelDig) => {
                self.session.digging = false;
            }
            (Screen::InGame, UiAction::SelectCard(i)) => {
                if i < self.record.plants_count as usize {
                    self.session.selected_plant = i;
                    self.session.digging = false;
                    self.out.cues.push(Cue::Click);
                }
            }
            (Screen::InGame, UiAction::FieldClick(cell)) => {
                self.field_click(cell);
            }

            // ── Paused ──
            (Screen::Paused, UiAction::Resume) | (Screen::Paused, UiAction::Pause) => {
                self.out.cues.push(Cue::Click);
                self.screen = Screen::InGame;
                if !self.director.music_muted {
                    self.out.resume_music = true;
                }
            }
            (Screen::Paused, UiAction::Restart) => {
                self.out.cues.push(Cue::Click);
                let level = self.session.current_level;
                self.load_level(level, now_ms);
                // Reloading re-requests the track that is still sitting
                // paused in the sink; unpause it explicitly.
                if !self.director.music_muted {
                    self.out.resume_music = true;
                }
            }
            (Screen::Paused, UiAction::ToMenu) => {
                self.out.cues.push(Cue::Click);
                self.to_menu();
            }

            // ── Unlock reveal ──
            (Screen::UnlockReveal, UiAction::NextLevel) => {
                self.out.cues.push(Cue::Click);
                let next = wrap_level(self.session.current_level + 1);
                self.load_level(next, now_ms);
            }
            (Screen::UnlockReveal, UiAction::ToMenu) => {
                self.out.cues.push(Cue::Click);
                self.to_menu();
            }

            // ── Win / game over ──
            (Screen::Win, UiAction::RetryOrNext) => {
                self.out.cues.push(Cue::Click);
                let next = wrap_level(self.session.current_level + 1);
                self.load_level(next, now_ms);
            }
            (Screen::GameOver, UiAction::RetryOrNext) => {
                self.out.cues.push(Cue::Click);
                let level = self.session.current_level;
                self.load_level(level, now_ms);
            }
            (Screen::Win, UiAction::ToMenu) | (Screen::GameOver, UiAction::ToMenu) => {
                self.out.cues.push(Cue::Click);
                self.to_menu();
            }

            // Anything else is not legal on the current screen.
            _ => {}
        }
    }

    /// A click on the lawn: build or dig at the cell, bounds-checked.
    /// Success is only knowable through the count-diff contract; a
    /// rejected request stays silent.
    fn field_click(&mut self, cell: Cell) {
        let in_bounds = (0..self.session.map_w).contains(&cell.col)
            && (0..self.session.map_h).contains(&cell.row);
        if !in_bounds {
            return;
        }
        let (x, y) = self.geom.cell_to_sim(cell);
        if self.session.digging {
            if self.sim.attempt_removal(x, y).accepted() {
                self.out.cues.push(Cue::Dig);
            }
            self.session.digging = false;
        } else if self.sim.attempt_placement(x, y, self.session.selected_plant).accepted() {
            self.out.cues.push(Cue::Plant);
        }
    }

    // ── Frame tick ──

    /// Advance one frame. Only the in-game screen advances the
    /// simulation, the ambient timer and the event queue; every other
    /// screen is inert here.
    pub fn tick(&mut self, dt_seconds: f32, now_ms: u64) {
        if self.screen != Screen::InGame {
            return;
        }

        self.sim.advance(dt_seconds);

        if let Some(groan) = self.director.tick_ambient(now_ms) {
            self.out.cues.push(groan);
        }

        let codes = self.sim.drain_sound_events(SOUND_DRAIN_BOUND);
        let cues = self.director.dispatch_codes(&codes, now_ms);
        self.out.cues.extend(cues);

        // Effects report their own start; pair the one-shot cue with the
        // first visible frame.
        for i in 0..self.sim.effect_count() {
            if let Some(e) = self.sim.effect_at(i) {
                if effect_just_started(&e) {
                    if let Some(cue) = cue_for_effect(e.kind) {
                        self.out.cues.push(cue);
                    }
                }
            }
        }

        if self.sim.level_complete() {
            self.complete_level();
        } else if self.sim.game_over() {
            self.out.cues.push(Cue::Lose);
            self.screen = Screen::GameOver;
            self.director.end_session();
        }
    }

    /// Completion policy: the store is updated unconditionally; a fresh
    /// clear of a rewarded level shows the unlock reveal, everything
    /// else the plain win screen. The cached record is re-read so the
    /// roster and frontier reflect the write.
    fn complete_level(&mut self) {
        let level = self.session.current_level;
        let fresh_clear = level == self.record.unlocked_level;

        self.store.record_completion(level);

        self.out.cues.push(Cue::Win);
        if fresh_clear && level <= LAST_REWARDED_LEVEL {
            self.just_unlocked = Some(level);
            self.screen = Screen::UnlockReveal;
        } else {
            self.screen = Screen::Win;
        }

        self.record = self.store.load();
        self.record.unlocked_level = self.record.unlocked_level.max(level + 1);
        self.shovel_unlocked = self.record.unlocked_level > SHOVEL_UNLOCK_LEVEL;
        self.director.end_session();
    }

    /// Drain this frame's requested side effects.
    pub fn take_output(&mut self) -> FrameOutput {
        std::mem::take(&mut self.out)
    }
}

fn wrap_level(level: u32) -> u32 {
    if level > LAST_LEVEL { FIRST_LEVEL } else { level }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GameConfig, GridConfig};
    use crate::engine::fake::ScriptedSimulation;

    fn test_config(tag: &str) -> GameConfig {
        let base = std::env::temp_dir().join(format!(
            "garden-siege-app-{tag}-{}",
            std::process::id()
        ));
        let _ = std::fs::create_dir_all(&base);
        GameConfig {
            grid: GridConfig {
                origin_x: 24,
                origin_y: 6,
                tile_w: 8,
                tile_h: 3,
                sim_tile_w: 110.0,
                sim_tile_h: 141.0,
            },
            engine_lib: "TowerEngine".into(),
            save_file: base.join("save.toml"),
            levels_dir: base.join("levels"),
            target_fps: 60,
        }
    }

    fn app(tag: &str) -> App<ScriptedSimulation> {
        let cfg = test_config(tag);
        let _ = std::fs::remove_file(&cfg.save_file);
        App::new(ScriptedSimulation::new(), &cfg, AudioDirector::with_seed(0))
    }

    fn drain(app: &mut App<ScriptedSimulation>) -> FrameOutput {
        app.take_output()
    }

    #[test]
    fn starts_on_main_menu_with_menu_music() {
        let mut a = app("start");
        assert_eq!(a.screen, Screen::MainMenu);
        assert_eq!(drain(&mut a).music, Some(MusicTrack::Menu));
    }

    #[test]
    fn continue_loads_the_unlock_frontier() {
        let mut a = app("continue");
        a.apply(UiAction::Continue, 0);
        assert_eq!(a.screen, Screen::InGame);
        assert_eq!(a.sim.loaded_level, Some(1));
        assert_eq!(drain(&mut a).music, Some(MusicTrack::Game(1)));
    }

    #[test]
    fn locked_level_pick_is_rejected_without_transition() {
        let mut a = app("locked");
        a.record.unlocked_level = 3;
        a.apply(UiAction::OpenLevels, 0);
        drain(&mut a);

        a.apply(UiAction::PickLevel(9), 0);
        assert_eq!(a.screen, Screen::LevelSelect);
        assert_eq!(a.sim.loaded_level, None);
        assert!(drain(&mut a).cues.is_empty());

        a.apply(UiAction::PickLevel(3), 0);
        assert_eq!(a.screen, Screen::InGame);
        assert_eq!(a.sim.loaded_level, Some(3));
    }

    #[test]
    fn fresh_clear_of_level_one_reveals_unlock_and_advances_record() {
        let mut a = app("fresh-clear");
        a.apply(UiAction::Continue, 0);
        a.sim.level_complete = true;
        a.tick(0.016, 100);

        assert_eq!(a.screen, Screen::UnlockReveal);
        assert_eq!(a.just_unlocked, Some(1));
        assert_eq!(a.record.unlocked_level, 2);
        assert_eq!(a.record.plants_count, 2);
        assert!(drain(&mut a).cues.contains(&Cue::Win));
    }

    #[test]
    fn replay_of_cleared_level_wins_without_reveal() {
        let cfg = test_config("replay");
        // Persist so the store's own read agrees with the cache.
        std::fs::write(
            &cfg.save_file,
            toml::to_string(&progress::ProgressionRecord { unlocked_level: 5, plants_count: 4 })
                .unwrap(),
        )
        .unwrap();
        let mut a = App::new(ScriptedSimulation::new(), &cfg, AudioDirector::with_seed(0));
        a.apply(UiAction::OpenLevels, 0);
        a.apply(UiAction::PickLevel(2), 0);
        a.sim.level_complete = true;
        a.tick(0.016, 100);

        assert_eq!(a.screen, Screen::Win);
        assert_eq!(a.just_unlocked, None);
        // Unlock frontier unchanged by replaying level 2.
        assert_eq!(a.record.unlocked_level, 5);
    }

    #[test]
    fn final_level_fresh_clear_skips_the_reveal() {
        let mut a = app("final");
        a.record.unlocked_level = 7;
        a.apply(UiAction::OpenLevels, 0);
        a.apply(UiAction::PickLevel(7), 0);
        a.sim.level_complete = true;
        a.tick(0.016, 100);
        // Level 7 is past the last rewarded level.
        assert_eq!(a.screen, Screen::Win);
    }

    #[test]
    fn win_advances_with_wraparound_and_gameover_retries() {
        let mut a = app("wrap");
        a.record.unlocked_level = 9;
        a.apply(UiAction::OpenLevels, 0);
        a.apply(UiAction::PickLevel(8), 0);
        a.sim.level_complete = true;
        a.tick(0.016, 100);
        assert_eq!(a.screen, Screen::Win);
        a.apply(UiAction::RetryOrNext, 200);
        assert_eq!(a.sim.loaded_level, Some(1));

        a.sim.game_over = true;
        a.tick(0.016, 300);
        assert_eq!(a.screen, Screen::GameOver);
        a.apply(UiAction::RetryOrNext, 400);
        assert_eq!(a.sim.loaded_level, Some(1));
        assert_eq!(a.screen, Screen::InGame);
    }

    #[test]
    fn pause_stops_simulation_and_resume_continues() {
        let mut a = app("pause");
        a.apply(UiAction::Continue, 0);
        a.tick(0.016, 100);
        assert_eq!(a.sim.advanced_by.len(), 1);

        a.apply(UiAction::Pause, 200);
        assert_eq!(a.screen, Screen::Paused);
        assert!(drain(&mut a).pause_music);

        a.tick(0.016, 300);
        assert_eq!(a.sim.advanced_by.len(), 1);

        a.apply(UiAction::Resume, 400);
        assert_eq!(a.screen, Screen::InGame);
        a.tick(0.016, 500);
        assert_eq!(a.sim.advanced_by.len(), 2);
    }

    #[test]
    fn pause_with_shovel_out_only_cancels_digging() {
        let mut a = app("pause-dig");
        a.shovel_unlocked = true;
        a.apply(UiAction::Continue, 0);
        a.apply(UiAction::ToggleDig, 10);
        assert!(a.session.digging);

        a.apply(UiAction::Pause, 20);
        assert_eq!(a.screen, Screen::InGame);
        assert!(!a.session.digging);
    }

    #[test]
    fn restart_reloads_the_same_level() {
        let mut a = app("restart");
        a.record.unlocked_level = 3;
        a.apply(UiAction::OpenLevels, 0);
        a.apply(UiAction::PickLevel(3), 0);
        a.apply(UiAction::Pause, 10);
        a.apply(UiAction::Restart, 20);
        assert_eq!(a.screen, Screen::InGame);
        assert_eq!(a.sim.loaded_level, Some(3));
    }

    #[test]
    fn restart_from_pause_unfreezes_the_music() {
        let mut a = app("restart-music");
        a.apply(UiAction::Continue, 0);
        a.apply(UiAction::Pause, 10);
        assert!(drain(&mut a).pause_music);

        // The reload asks for the track already sitting paused in the
        // sink, so the output must carry an explicit resume as well.
        a.apply(UiAction::Restart, 20);
        let out = drain(&mut a);
        assert_eq!(out.music, Some(MusicTrack::Game(1)));
        assert!(out.resume_music);
    }

    #[test]
    fn restart_from_pause_stays_silent_when_music_is_muted() {
        let mut a = app("restart-muted");
        a.director.toggle_music_mute();
        a.apply(UiAction::Continue, 0);
        a.apply(UiAction::Pause, 10);
        drain(&mut a);

        a.apply(UiAction::Restart, 20);
        assert!(!drain(&mut a).resume_music);
    }

    #[test]
    fn unlock_reveal_next_level_wraps_past_the_campaign() {
        let mut a = app("reveal-next");
        a.apply(UiAction::Continue, 0);
        a.sim.level_complete = true;
        a.tick(0.016, 100);
        assert_eq!(a.screen, Screen::UnlockReveal);
        a.apply(UiAction::NextLevel, 200);
        assert_eq!(a.sim.loaded_level, Some(2));
        assert_eq!(a.screen, Screen::InGame);
    }

    #[test]
    fn build_feedback_follows_the_count_diff() {
        let mut a = app("build");
        a.apply(UiAction::Continue, 0);
        drain(&mut a);

        a.apply(UiAction::FieldClick(Cell { col: 2, row: 1 }), 10);
        assert!(drain(&mut a).cues.contains(&Cue::Plant));

        // Silent rejection: no cue at all.
        a.sim.accept_builds = false;
        a.apply(UiAction::FieldClick(Cell { col: 3, row: 1 }), 20);
        assert!(drain(&mut a).cues.is_empty());
    }

    #[test]
    fn dig_feedback_follows_the_count_diff_and_puts_shovel_away() {
        let mut a = app("dig");
        a.shovel_unlocked = true;
        a.apply(UiAction::Continue, 0);
        a.apply(UiAction::FieldClick(Cell { col: 2, row: 1 }), 10);
        drain(&mut a);

        a.apply(UiAction::ToggleDig, 20);
        a.apply(UiAction::FieldClick(Cell { col: 2, row: 1 }), 30);
        let out = drain(&mut a);
        assert!(out.cues.contains(&Cue::Dig));
        assert!(!a.session.digging);

        // Nothing left to dig: silent, shovel still put away.
        a.apply(UiAction::ToggleDig, 40);
        a.apply(UiAction::FieldClick(Cell { col: 2, row: 1 }), 50);
        let out = drain(&mut a);
        assert!(!out.cues.contains(&Cue::Dig));
        assert!(!a.session.digging);
    }

    #[test]
    fn out_of_bounds_clicks_never_reach_the_simulation() {
        let mut a = app("oob");
        a.apply(UiAction::Continue, 0);
        let plants_before = a.sim.plant_count();
        a.apply(UiAction::FieldClick(Cell { col: -1, row: 0 }), 10);
        a.apply(UiAction::FieldClick(Cell { col: 9, row: 0 }), 20);
        a.apply(UiAction::FieldClick(Cell { col: 0, row: 5 }), 30);
        assert_eq!(a.sim.plant_count(), plants_before);
    }

    #[test]
    fn card_selection_clears_digging_and_respects_roster() {
        let mut a = app("cards");
        a.record.plants_count = 3;
        a.shovel_unlocked = true;
        a.apply(UiAction::Continue, 0);
        a.apply(UiAction::ToggleDig, 10);

        a.apply(UiAction::SelectCard(2), 20);
        assert_eq!(a.session.selected_plant, 2);
        assert!(!a.session.digging);

        // Outside the unlocked roster: ignored.
        a.apply(UiAction::SelectCard(5), 30);
        assert_eq!(a.session.selected_plant, 2);
    }

    #[test]
    fn dig_toggle_requires_the_shovel_unlock() {
        let mut a = app("no-shovel");
        a.apply(UiAction::Continue, 0);
        assert!(!a.shovel_unlocked);
        a.apply(UiAction::ToggleDig, 10);
        assert!(!a.session.digging);
    }

    #[test]
    fn eat_events_from_the_queue_are_debounced_across_frames() {
        let mut a = app("eat");
        a.apply(UiAction::Continue, 0);
        drain(&mut a);

        a.sim.sound_queue = vec![2, 2];
        a.tick(0.016, 1000);
        let first: Vec<_> =
            drain(&mut a).cues.into_iter().filter(|c| *c == Cue::Eat).collect();
        assert_eq!(first.len(), 1);

        a.sim.sound_queue = vec![2];
        a.tick(0.016, 1100);
        assert!(!drain(&mut a).cues.contains(&Cue::Eat));
    }

    #[test]
    fn loading_a_level_resets_transient_state() {
        let mut a = app("reset");
        a.shovel_unlocked = true;
        a.apply(UiAction::Continue, 0);
        a.apply(UiAction::ToggleDig, 10);
        a.apply(UiAction::Pause, 20); // cancels digging
        a.apply(UiAction::ToggleDig, 30);
        assert!(a.session.digging);

        // First escape only puts the shovel away; the second pauses.
        a.apply(UiAction::Pause, 40);
        a.apply(UiAction::Pause, 45);
        assert_eq!(a.screen, Screen::Paused);
        a.apply(UiAction::Restart, 50);
        assert!(!a.session.digging);
        assert_eq!(a.session.map_w, 9);
        assert_eq!(a.session.map_h, 5);
    }

    #[test]
    fn quit_is_only_reachable_from_the_menu() {
        let mut a = app("quit");
        a.apply(UiAction::Continue, 0);
        a.apply(UiAction::QuitGame, 10);
        assert!(!a.quit_requested);
        a.apply(UiAction::Pause, 20);
        a.apply(UiAction::ToMenu, 30);
        a.apply(UiAction::QuitGame, 40);
        assert!(a.quit_requested);
    }
}
