/// Terminal UI: layout, input capture, rendering, and the asset/audio
/// pipelines behind them.
///
/// `Layout` is the single source of truth for where things are on
/// screen. The renderer draws buttons from it and `hit_test` interprets
/// pointer clicks against it, so the two can never disagree about where
/// a button lives.

pub mod assets;
pub mod audio;
pub mod input;
pub mod renderer;
pub mod resolver;

use crossterm::event::KeyCode;

use crate::app::{Screen, UiAction};
use crate::grid::GridGeometry;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub w: u16,
    pub h: u16,
}

impl Rect {
    pub const fn new(x: u16, y: u16, w: u16, h: u16) -> Self {
        Rect { x, y, w, h }
    }

    pub fn contains(&self, px: u16, py: u16) -> bool {
        px >= self.x && px < self.x + self.w && py >= self.y && py < self.y + self.h
    }
}

pub const CARD_W: u16 = 8;
pub const CARD_H: u16 = 4;
const CARD_GAP: u16 = 1;
const BUTTON_W: u16 = 24;
const BUTTON_H: u16 = 3;

/// What the pointer can hit besides fixed buttons.
pub struct HitContext {
    pub plants_count: u32,
    pub shovel_unlocked: bool,
    pub map_w: i32,
    pub map_h: i32,
}

/// Screen-space placement of every interactive element, derived from
/// the terminal size each frame.
pub struct Layout {
    pub term_w: u16,
    pub term_h: u16,
}

impl Layout {
    pub fn new(term_w: u16, term_h: u16) -> Self {
        Layout { term_w, term_h }
    }

    fn centered_column(&self, count: u16, first_y: u16, step: u16) -> Vec<Rect> {
        let x = (self.term_w / 2).saturating_sub(BUTTON_W / 2);
        (0..count).map(|i| Rect::new(x, first_y + i * step, BUTTON_W, BUTTON_H)).collect()
    }

    // ── Main menu ──

    /// Continue / level select / quit, top to bottom.
    pub fn menu_buttons(&self) -> Vec<Rect> {
        let first_y = (self.term_h / 2).saturating_sub(5);
        self.centered_column(3, first_y, BUTTON_H + 1)
    }

    /// Sound and music toggles, shown on the menu and the pause screen.
    pub fn sound_toggle(&self) -> Rect {
        Rect::new(self.term_w.saturating_sub(28), 1, 13, 3)
    }

    pub fn music_toggle(&self) -> Rect {
        Rect::new(self.term_w.saturating_sub(14), 1, 13, 3)
    }

    // ── Level select ──

    /// Two rows of four level buttons.
    pub fn level_buttons(&self) -> Vec<Rect> {
        let bw = 10u16;
        let step = bw + 2;
        let x0 = (self.term_w / 2).saturating_sub(step * 2 - 1);
        let y0 = (self.term_h / 2).saturating_sub(4);
        (0..8u16)
            .map(|i| Rect::new(x0 + (i % 4) * step, y0 + (i / 4) * 4, bw, BUTTON_H))
            .collect()
    }

    pub fn back_button(&self) -> Rect {
        let x = (self.term_w / 2).saturating_sub(BUTTON_W / 2);
        Rect::new(x, (self.term_h / 2) + 6, BUTTON_W, BUTTON_H)
    }

    // ── In game ──

    /// Seed card slots along the top HUD, left of the field's x origin.
    pub fn card_rect(&self, index: usize, geom: &GridGeometry) -> Rect {
        let x = geom.origin_x + index as u16 * (CARD_W + CARD_GAP);
        Rect::new(x, 0, CARD_W, CARD_H)
    }

    pub fn pause_button(&self) -> Rect {
        Rect::new(self.term_w.saturating_sub(11), 1, 9, 3)
    }

    pub fn shovel_button(&self) -> Rect {
        Rect::new(self.term_w.saturating_sub(11), 5, 9, 3)
    }

    // ── Overlays ──

    /// Resume / restart / back to menu on the pause screen.
    pub fn pause_buttons(&self) -> Vec<Rect> {
        let first_y = (self.term_h / 2).saturating_sub(5);
        self.centered_column(3, first_y, BUTTON_H + 1)
    }

    /// Primary action / back to menu, shared by the unlock reveal, win
    /// and game-over screens.
    pub fn end_buttons(&self) -> Vec<Rect> {
        let first_y = (self.term_h / 2) + 2;
        self.centered_column(2, first_y, BUTTON_H + 1)
    }
}

/// Translate a pointer click into a state-machine action.
pub fn hit_test(
    layout: &Layout,
    screen: Screen,
    ctx: &HitContext,
    geom: &GridGeometry,
    x: u16,
    y: u16,
) -> Option<UiAction> {
    match screen {
        Screen::MainMenu => {
            if layout.sound_toggle().contains(x, y) {
                return Some(UiAction::ToggleMute);
            }
            if layout.music_toggle().contains(x, y) {
                return Some(UiAction::ToggleMusicMute);
            }
            let buttons = layout.menu_buttons();
            if buttons[0].contains(x, y) {
                Some(UiAction::Continue)
            } else if buttons[1].contains(x, y) {
                Some(UiAction::OpenLevels)
            } else if buttons[2].contains(x, y) {
                Some(UiAction::QuitGame)
            } else {
                None
            }
        }
        Screen::LevelSelect => {
            for (i, r) in layout.level_buttons().iter().enumerate() {
                if r.contains(x, y) {
                    return Some(UiAction::PickLevel(i as u32 + 1));
                }
            }
            layout.back_button().contains(x, y).then_some(UiAction::Back)
        }
        Screen::InGame => {
            for i in 0..ctx.plants_count as usize {
                if layout.card_rect(i, geom).contains(x, y) {
                    return Some(UiAction::SelectCard(i));
                }
            }
            if layout.pause_button().contains(x, y) {
                return Some(UiAction::Pause);
            }
            if ctx.shovel_unlocked && layout.shovel_button().contains(x, y) {
                return Some(UiAction::ToggleDig);
            }
            let cell = geom.screen_to_cell(x, y);
            let in_field = (0..ctx.map_w).contains(&cell.col) && (0..ctx.map_h).contains(&cell.row);
            in_field.then_some(UiAction::FieldClick(cell))
        }
        Screen::Paused => {
            if layout.sound_toggle().contains(x, y) {
                return Some(UiAction::ToggleMute);
            }
            if layout.music_toggle().contains(x, y) {
                return Some(UiAction::ToggleMusicMute);
            }
            let buttons = layout.pause_buttons();
            if buttons[0].contains(x, y) {
                Some(UiAction::Resume)
            } else if buttons[1].contains(x, y) {
                Some(UiAction::Restart)
            } else if buttons[2].contains(x, y) {
                Some(UiAction::ToMenu)
            } else {
                None
            }
        }
        Screen::UnlockReveal => {
            let buttons = layout.end_buttons();
            if buttons[0].contains(x, y) {
                Some(UiAction::NextLevel)
            } else if buttons[1].contains(x, y) {
                Some(UiAction::ToMenu)
            } else {
                None
            }
        }
        Screen::Win | Screen::GameOver => {
            let buttons = layout.end_buttons();
            if buttons[0].contains(x, y) {
                Some(UiAction::RetryOrNext)
            } else if buttons[1].contains(x, y) {
                Some(UiAction::ToMenu)
            } else {
                None
            }
        }
    }
}

/// Keyboard shortcuts mirroring the pointer surface.
pub fn key_action(screen: Screen, code: KeyCode) -> Option<UiAction> {
    match (screen, code) {
        (Screen::MainMenu, KeyCode::Enter) => Some(UiAction::Continue),
        (Screen::MainMenu, KeyCode::Char('l')) => Some(UiAction::OpenLevels),
        (Screen::MainMenu, KeyCode::Char('q')) | (Screen::MainMenu, KeyCode::Esc) => {
            Some(UiAction::QuitGame)
        }
        (Screen::LevelSelect, KeyCode::Esc) => Some(UiAction::Back),
        (Screen::LevelSelect, KeyCode::Char(c @ '1'..='8')) => {
            Some(UiAction::PickLevel(c as u32 - '0' as u32))
        }
        (Screen::InGame, KeyCode::Esc) => Some(UiAction::Pause),
        (Screen::InGame, KeyCode::Char('s')) => Some(UiAction::ToggleDig),
        (Screen::InGame, KeyCode::Char(c @ '1'..='6')) => {
            Some(UiAction::SelectCard(c as usize - '1' as usize))
        }
        (Screen::Paused, KeyCode::Esc) => Some(UiAction::Resume),
        (Screen::UnlockReveal, KeyCode::Enter) => Some(UiAction::NextLevel),
        (Screen::Win, KeyCode::Enter) | (Screen::GameOver, KeyCode::Enter) => {
            Some(UiAction::RetryOrNext)
        }
        (Screen::UnlockReveal, KeyCode::Esc)
        | (Screen::Win, KeyCode::Esc)
        | (Screen::GameOver, KeyCode::Esc) => Some(UiAction::ToMenu),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GridConfig;

    fn geom() -> GridGeometry {
        GridGeometry::new(&GridConfig {
            origin_x: 24,
            origin_y: 6,
            tile_w: 8,
            tile_h: 3,
            sim_tile_w: 110.0,
            sim_tile_h: 141.0,
        })
    }

    fn ctx() -> HitContext {
        HitContext { plants_count: 3, shovel_unlocked: true, map_w: 9, map_h: 5 }
    }

    #[test]
    fn rect_contains_is_half_open() {
        let r = Rect::new(10, 5, 4, 2);
        assert!(r.contains(10, 5));
        assert!(r.contains(13, 6));
        assert!(!r.contains(14, 5));
        assert!(!r.contains(10, 7));
    }

    #[test]
    fn field_clicks_map_through_the_grid() {
        let layout = Layout::new(120, 40);
        let got = hit_test(&layout, Screen::InGame, &ctx(), &geom(), 24 + 8 * 2 + 3, 6 + 3 + 1);
        match got {
            Some(UiAction::FieldClick(cell)) => {
                assert_eq!((cell.col, cell.row), (2, 1));
            }
            other => panic!("expected field click, got {other:?}"),
        }
    }

    #[test]
    fn clicks_outside_the_field_and_buttons_hit_nothing() {
        let layout = Layout::new(120, 40);
        // Below the field, left of any button.
        assert_eq!(hit_test(&layout, Screen::InGame, &ctx(), &geom(), 2, 38), None);
    }

    #[test]
    fn card_slots_take_precedence_over_the_field() {
        let layout = Layout::new(120, 40);
        let r = layout.card_rect(1, &geom());
        let got = hit_test(&layout, Screen::InGame, &ctx(), &geom(), r.x + 1, r.y + 1);
        assert_eq!(got, Some(UiAction::SelectCard(1)));
        // Slot 3 exists in the layout but not in a 3-card roster.
        let r3 = layout.card_rect(3, &geom());
        let got = hit_test(&layout, Screen::InGame, &ctx(), &geom(), r3.x + 1, r3.y + 1);
        assert_ne!(got, Some(UiAction::SelectCard(3)));
    }

    #[test]
    fn shovel_button_is_inert_before_its_unlock() {
        let layout = Layout::new(120, 40);
        let locked = HitContext { shovel_unlocked: false, ..ctx() };
        let r = layout.shovel_button();
        assert_eq!(hit_test(&layout, Screen::InGame, &locked, &geom(), r.x + 1, r.y + 1), None);
        assert_eq!(
            hit_test(&layout, Screen::InGame, &ctx(), &geom(), r.x + 1, r.y + 1),
            Some(UiAction::ToggleDig)
        );
    }

    #[test]
    fn level_buttons_count_from_one() {
        let layout = Layout::new(120, 40);
        let buttons = layout.level_buttons();
        assert_eq!(buttons.len(), 8);
        let r = buttons[5];
        let got = hit_test(&layout, Screen::LevelSelect, &ctx(), &geom(), r.x, r.y);
        assert_eq!(got, Some(UiAction::PickLevel(6)));
    }

    #[test]
    fn escape_pauses_in_game_and_resumes_when_paused() {
        assert_eq!(key_action(Screen::InGame, KeyCode::Esc), Some(UiAction::Pause));
        assert_eq!(key_action(Screen::Paused, KeyCode::Esc), Some(UiAction::Resume));
    }

    #[test]
    fn digit_keys_select_cards_zero_based() {
        assert_eq!(key_action(Screen::InGame, KeyCode::Char('1')), Some(UiAction::SelectCard(0)));
        assert_eq!(key_action(Screen::InGame, KeyCode::Char('6')), Some(UiAction::SelectCard(5)));
        assert_eq!(key_action(Screen::InGame, KeyCode::Char('7')), None);
    }
}
