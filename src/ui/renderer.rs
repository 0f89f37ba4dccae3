/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// Each frame is composed into a front buffer of styled cells, diffed
/// against the previous frame, and only the changed cells are written
/// out, batched with `queue!` and flushed once. Full repaints happen
/// only on init, resize and screen changes, which keeps the lawn free
/// of flicker at 60 fps.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    event::{DisableMouseCapture, EnableMouseCapture},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::app::{App, Screen};
use crate::engine::snapshot::FrameSnapshot;
use crate::engine::Simulation;
use crate::ui::assets::{unlock_icon, unlock_info, AssetStore, Sprite, PLANT_COSTS, PLANT_NAMES};
use crate::ui::resolver::{self, Visual};
use crate::ui::{Layout, Rect, CARD_H, CARD_W};

// ── Cell: the unit of the back buffer ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    glyph: [u8; 8],
    len: u8,
    fg: Color,
    bg: Color,
    /// This glyph occupies two terminal columns.
    wide: bool,
    /// Continuation of the previous wide glyph; never rendered itself.
    cont: bool,
}

impl Cell {
    /// One explicit background everywhere so inter-row gap pixels on
    /// VTE terminals match the cell color.
    const BASE_BG: Color = Color::Rgb { r: 18, g: 28, b: 18 };

    const BLANK: Cell = Cell {
        glyph: [b' ', 0, 0, 0, 0, 0, 0, 0],
        len: 1,
        fg: Color::White,
        bg: Cell::BASE_BG,
        wide: false,
        cont: false,
    };

    const WIDE_CONT: Cell = Cell {
        glyph: [0; 8],
        len: 0,
        fg: Color::White,
        bg: Cell::BASE_BG,
        wide: false,
        cont: true,
    };

    /// Sentinel unequal to any real cell; filling the back buffer with
    /// it forces a full repaint.
    const INVALID: Cell = Cell {
        glyph: [0xff, 0, 0, 0, 0, 0, 0, 0],
        len: 1,
        fg: Color::Magenta,
        bg: Color::Magenta,
        wide: false,
        cont: false,
    };

    fn make(c: char, fg: Color, bg: Color) -> Self {
        let mut cell = Cell::BLANK;
        cell.len = c.encode_utf8(&mut cell.glyph).len() as u8;
        cell.fg = fg;
        cell.bg = if bg == Color::Reset { Cell::BASE_BG } else { bg };
        cell.wide = char_is_wide(c);
        cell
    }

    fn as_str(&self) -> &str {
        // len always records a valid UTF-8 prefix written by encode_utf8.
        std::str::from_utf8(&self.glyph[..self.len as usize]).unwrap_or(" ")
    }
}

/// Emoji draw double-width in every terminal this targets; everything
/// in the basic planes stays single-width.
fn char_is_wide(c: char) -> bool {
    c as u32 >= 0x1F000
}

const WIDE_CONT: Cell = Cell::WIDE_CONT;

// ── FrameBuffer ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer { width: w, height: h, cells: vec![Cell::BLANK; w * h] }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: i32, y: i32, cell: Cell) {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            self.cells[y as usize * self.width + x as usize] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    fn put_str(&mut self, x: i32, y: i32, s: &str, fg: Color, bg: Color) {
        let mut cx = x;
        for c in s.chars() {
            let cell = Cell::make(c, fg, bg);
            let step = if cell.wide { 2 } else { 1 };
            self.set(cx, y, cell);
            if cell.wide {
                self.set(cx + 1, y, Cell { bg: cell.bg, ..WIDE_CONT });
            }
            cx += step;
        }
    }

    fn fill_rect(&mut self, r: Rect, bg: Color) {
        for y in r.y..r.y + r.h {
            for x in r.x..r.x + r.w {
                self.set(x as i32, y as i32, Cell::make(' ', Color::White, bg));
            }
        }
    }

    /// Draw a sprite at a screen anchor, preserving the background
    /// already composed underneath it.
    fn put_sprite(&mut self, x: i32, y: i32, sprite: Sprite) {
        let mut cx = x;
        for c in sprite.glyphs.chars() {
            if y >= 0 && cx >= 0 && (cx as usize) < self.width && (y as usize) < self.height {
                let under = self.get(cx as usize, y as usize).bg;
                let cell = Cell::make(c, sprite.fg, under);
                let wide = cell.wide;
                self.set(cx, y, cell);
                if wide {
                    self.set(cx + 1, y, Cell { bg: under, ..WIDE_CONT });
                }
                cx += if wide { 2 } else { 1 };
            } else {
                cx += if char_is_wide(c) { 2 } else { 1 };
            }
        }
    }
}

// ── Palette ──

const LAWN_LIGHT: Color = Color::Rgb { r: 52, g: 110, b: 40 };
const LAWN_DARK: Color = Color::Rgb { r: 42, g: 92, b: 34 };
const LAWN_INACTIVE: Color = Color::Rgb { r: 30, g: 42, b: 28 };
const HOVER_BG: Color = Color::Rgb { r: 150, g: 170, b: 110 };
const HOVER_DIG_BG: Color = Color::Rgb { r: 160, g: 70, b: 50 };
const HUD_BG: Color = Color::Rgb { r: 28, g: 22, b: 12 };
const CARD_BG: Color = Color::Rgb { r: 60, g: 50, b: 24 };
const CARD_SELECTED_BG: Color = Color::Rgb { r: 110, g: 95, b: 40 };
const CARD_COOLING_BG: Color = Color::Rgb { r: 34, g: 30, b: 18 };
const BUTTON_BG: Color = Color::Rgb { r: 40, g: 60, b: 36 };
const BUTTON_HOT_BG: Color = Color::Rgb { r: 66, g: 100, b: 56 };
const PANEL_BG: Color = Color::Rgb { r: 30, g: 30, b: 30 };
const GOLD: Color = Color::Rgb { r: 255, g: 214, b: 80 };

// ── Renderer ──

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    last_screen: Option<Screen>,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            last_screen: None,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            EnableMouseCapture,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        self.back.cells.fill(Cell::INVALID);
        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            DisableMouseCapture,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    pub fn render<S: Simulation>(
        &mut self,
        app: &App<S>,
        assets: &mut AssetStore,
        layout: &Layout,
        pointer: Option<(u16, u16)>,
        now_seconds: f64,
    ) -> io::Result<()> {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        if self.last_screen != Some(app.screen) {
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
            self.last_screen = Some(app.screen);
        }

        self.front.clear();
        match app.screen {
            Screen::MainMenu => self.compose_menu(app, layout),
            Screen::LevelSelect => self.compose_level_select(app, layout),
            Screen::InGame => self.compose_game(app, assets, layout, pointer, now_seconds),
            Screen::Paused => {
                self.compose_game(app, assets, layout, None, now_seconds);
                self.compose_pause(app, layout);
            }
            Screen::UnlockReveal => self.compose_unlock(app, layout),
            Screen::Win => self.compose_endscreen(layout, "LEVEL CLEAR", "Next level"),
            Screen::GameOver => self.compose_endscreen(layout, "THE LAWN IS LOST", "Try again"),
        }

        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    // ── Diff flush ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut cursor_at: Option<(usize, usize)> = None;

        queue!(
            self.writer,
            SetForegroundColor(last_fg),
            SetBackgroundColor(last_bg)
        )?;

        for y in 0..self.front.height {
            let mut x = 0;
            while x < self.front.width {
                let cell = self.front.get(x, y);
                if cell.cont {
                    x += 1;
                    continue;
                }
                let changed = cell != self.back.get(x, y)
                    || (cell.wide
                        && x + 1 < self.front.width
                        && self.front.get(x + 1, y) != self.back.get(x + 1, y));
                if !changed {
                    x += 1;
                    continue;
                }

                if cursor_at != Some((x, y)) {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                }
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }
                queue!(self.writer, Print(cell.as_str()))?;

                let step = if cell.wide { 2 } else { 1 };
                cursor_at = Some((x + step, y));
                x += step;
            }
        }
        self.writer.flush()
    }

    // ── Shared widgets ──

    fn draw_button(&mut self, r: Rect, label: &str, hot: bool) {
        let bg = if hot { BUTTON_HOT_BG } else { BUTTON_BG };
        self.front.fill_rect(r, bg);
        let tx = r.x as i32 + (r.w as i32 - label.chars().count() as i32).max(0) / 2;
        let ty = r.y as i32 + r.h as i32 / 2;
        self.front.put_str(tx, ty, label, Color::White, bg);
    }

    fn draw_toggles<S: Simulation>(&mut self, app: &App<S>, layout: &Layout) {
        let sound = if app.director.muted { "♪ Sound OFF" } else { "♪ Sound ON" };
        let music = if app.director.music_muted { "♫ Music OFF" } else { "♫ Music ON" };
        self.draw_button(layout.sound_toggle(), sound, !app.director.muted);
        self.draw_button(layout.music_toggle(), music, !app.director.music_muted);
    }

    fn centered(&mut self, y: i32, text: &str, fg: Color) {
        let x = (self.front.width as i32 - text.chars().count() as i32).max(0) / 2;
        self.front.put_str(x, y, text, fg, Color::Reset);
    }

    // ── Screens ──

    fn compose_menu<S: Simulation>(&mut self, app: &App<S>, layout: &Layout) {
        let title = [
            r"  ___   _   ___  ___  ___  _  _   ___  ___  ___  ___  ___ ",
            r" / __| /_\ | _ \|   \| __|| \| | / __||_ _|| __|/ __|| __|",
            r"| (_ |/ _ \|   /| |) | _| | .` | \__ \ | | | _|| (_ || _| ",
            r" \___/_/ \_\_|_\|___/|___||_|\_| |___/|___||___|\___||___|",
        ];
        for (i, line) in title.iter().enumerate() {
            self.centered(2 + i as i32, line, GOLD);
        }
        self.centered(7, "the lawn holds, or it doesn't", Color::DarkGreen);

        let buttons = layout.menu_buttons();
        let continue_label = format!("Continue  (Level {})", app.continue_level());
        self.draw_button(buttons[0], &continue_label, true);
        self.draw_button(buttons[1], "Level Select", false);
        self.draw_button(buttons[2], "Quit", false);
        self.draw_toggles(app, layout);

        let hint_y = self.front.height as i32 - 2;
        self.front.put_str(
            2,
            hint_y,
            "Click or: ENTER continue  L levels  Q quit",
            Color::DarkGrey,
            Color::Reset,
        );
    }

    fn compose_level_select<S: Simulation>(&mut self, app: &App<S>, layout: &Layout) {
        self.centered(3, "─── SELECT LEVEL ───", GOLD);
        for (i, r) in layout.level_buttons().into_iter().enumerate() {
            let level = i as u32 + 1;
            let unlocked = level <= app.record.unlocked_level;
            if unlocked {
                self.draw_button(r, &format!("{level}"), level == app.continue_level());
            } else {
                self.front.fill_rect(r, PANEL_BG);
                let tx = r.x as i32 + r.w as i32 / 2 - 1;
                self.front.put_str(tx, r.y as i32 + 1, "🔒", Color::DarkGrey, PANEL_BG);
            }
        }
        self.draw_button(layout.back_button(), "Back", false);
    }

    fn compose_game<S: Simulation>(
        &mut self,
        app: &App<S>,
        assets: &mut AssetStore,
        layout: &Layout,
        pointer: Option<(u16, u16)>,
        now_seconds: f64,
    ) {
        let geom = &app.geom;
        let s = &app.session;

        // Lawn: checkerboard tiles, restricted rows dimmed. The hover
        // highlight tracks the pointer, red while the shovel is out.
        let hover = pointer.map(|(px, py)| geom.screen_to_cell(px, py));
        for row in 0..s.map_h {
            let active = s.active_rows.contains(row);
            for col in 0..s.map_w {
                let cell = crate::grid::Cell { col, row };
                let bg = if !active {
                    LAWN_INACTIVE
                } else if hover == Some(cell) {
                    if s.digging { HOVER_DIG_BG } else { HOVER_BG }
                } else if (col + row) % 2 == 0 {
                    LAWN_LIGHT
                } else {
                    LAWN_DARK
                };
                let (sx, sy) = geom.cell_to_screen(cell);
                for dy in 0..geom.tile_h as i32 {
                    for dx in 0..geom.tile_w as i32 {
                        self.front.set(sx + dx, sy + dy, Cell::make(' ', Color::White, bg));
                    }
                }
            }
        }

        // Entities, back to front: plants under zombies, projectiles and
        // effects on top.
        let snap = FrameSnapshot::pull(&app.sim);
        for p in &snap.plants {
            let v = resolver::resolve_plant(p, now_seconds, geom);
            self.draw_visual(assets, &v);
        }
        for z in &snap.zombies {
            let v = resolver::resolve_zombie(z, geom);
            self.draw_visual(assets, &v);
        }
        for b in &snap.projectiles {
            let v = resolver::resolve_projectile(b, geom);
            self.draw_visual(assets, &v);
        }
        for e in &snap.effects {
            let v = resolver::resolve_effect(e, geom);
            self.draw_visual(assets, &v);
        }

        self.compose_hud(app, layout, snap.money, snap.lives, pointer);

        // Shovel cursor rides the pointer while digging.
        if s.digging {
            if let Some((px, py)) = pointer {
                self.front.put_sprite(px as i32, py as i32, Sprite { glyphs: "⛏", fg: Color::White });
            }
        }
    }

    fn draw_visual(&mut self, assets: &mut AssetStore, v: &Visual) {
        let sprite = assets.resolve(&v.chain);
        self.front.put_sprite(v.pos.0, v.pos.1, sprite);
    }

    fn compose_hud<S: Simulation>(
        &mut self,
        app: &App<S>,
        layout: &Layout,
        money: i32,
        lives: i32,
        pointer: Option<(u16, u16)>,
    ) {
        for y in 0..CARD_H as i32 + 1 {
            for x in 0..self.front.width as i32 {
                self.front.set(x, y, Cell::make(' ', Color::White, HUD_BG));
            }
        }
        self.front.put_str(2, 1, &format!("☀ {money:<5}"), GOLD, HUD_BG);
        self.front.put_str(2, 2, &format!("♥ {lives:<3}"), Color::Red, HUD_BG);
        self.front.put_str(
            2,
            3,
            &format!("Lv {}", app.session.current_level),
            Color::DarkGrey,
            HUD_BG,
        );

        // Seed cards: name and cost, shaded from the top while the
        // card's cooldown runs, dimmed when unaffordable.
        let hovered = |r: Rect| pointer.map(|(px, py)| r.contains(px, py)).unwrap_or(false);
        for i in 0..app.record.plants_count as usize {
            let r = layout.card_rect(i, &app.geom);
            let selected = i == app.session.selected_plant && !app.session.digging;
            let bg = if selected { CARD_SELECTED_BG } else { CARD_BG };
            self.front.fill_rect(r, bg);

            let cooldown = app.sim.card_cooldown_fraction(i).clamp(0.0, 1.0);
            let shaded_rows = (cooldown * CARD_H as f32).ceil() as u16;
            if shaded_rows > 0 {
                self.front.fill_rect(
                    Rect::new(r.x, r.y, CARD_W, shaded_rows.min(CARD_H)),
                    CARD_COOLING_BG,
                );
            }

            let affordable = money >= PLANT_COSTS[i];
            let fg = if !affordable || cooldown > 0.0 {
                Color::DarkGrey
            } else if hovered(r) {
                GOLD
            } else {
                Color::White
            };
            self.front.put_str(r.x as i32 + 1, r.y as i32 + 1, PLANT_NAMES[i], fg, Color::Reset);
            self.front.put_str(
                r.x as i32 + 1,
                r.y as i32 + 2,
                &format!("{}", PLANT_COSTS[i]),
                fg,
                Color::Reset,
            );
        }

        self.draw_button(layout.pause_button(), "⏸ ESC", false);
        if app.shovel_unlocked {
            self.draw_button(layout.shovel_button(), "⛏ Dig", app.session.digging);
        }
    }

    fn compose_pause<S: Simulation>(&mut self, app: &App<S>, layout: &Layout) {
        let buttons = layout.pause_buttons();
        let panel = Rect::new(
            buttons[0].x.saturating_sub(3),
            buttons[0].y.saturating_sub(3),
            buttons[0].w + 6,
            (buttons[2].y + buttons[2].h + 2).saturating_sub(buttons[0].y) + 3,
        );
        self.front.fill_rect(panel, PANEL_BG);
        let tx = panel.x as i32 + (panel.w as i32 - 8) / 2;
        self.front.put_str(tx, panel.y as i32 + 1, "─ PAUSED ─", GOLD, PANEL_BG);

        self.draw_button(buttons[0], "Resume", true);
        self.draw_button(buttons[1], "Restart Level", false);
        self.draw_button(buttons[2], "Back to Menu", false);
        self.draw_toggles(app, layout);
    }

    fn compose_unlock<S: Simulation>(&mut self, app: &App<S>, layout: &Layout) {
        let mid = self.front.height as i32 / 2;
        self.centered(mid - 7, "★ NEW UNLOCK ★", GOLD);

        if let Some(id) = app.just_unlocked {
            if let Some((name, blurb)) = unlock_info(id) {
                if let Some(icon) = unlock_icon(id) {
                    let x = (self.front.width as i32 - 2) / 2;
                    self.front.put_sprite(x, mid - 5, icon);
                }
                self.centered(mid - 3, name, Color::White);
                self.centered(mid - 2, blurb, Color::DarkGrey);
            }
        }

        let buttons = layout.end_buttons();
        self.draw_button(buttons[0], "Next Level", true);
        self.draw_button(buttons[1], "Back to Menu", false);
    }

    fn compose_endscreen(&mut self, layout: &Layout, headline: &str, primary: &str) {
        let mid = self.front.height as i32 / 2;
        self.centered(mid - 4, headline, GOLD);
        let buttons = layout.end_buttons();
        self.draw_button(buttons[0], primary, true);
        self.draw_button(buttons[1], "Back to Menu", false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_glyph_detection_splits_emoji_from_text() {
        assert!(char_is_wide('🧟'));
        assert!(char_is_wide('🥜'));
        assert!(!char_is_wide('▒'));
        assert!(!char_is_wide('❄'));
        assert!(!char_is_wide('A'));
    }

    #[test]
    fn put_str_advances_two_columns_for_wide_glyphs() {
        let mut fb = FrameBuffer::new(10, 2);
        fb.put_str(0, 0, "🧟x", Color::White, Color::Reset);
        assert!(fb.get(0, 0).wide);
        assert!(fb.get(1, 0).cont);
        assert_eq!(fb.get(2, 0).as_str(), "x");
    }

    #[test]
    fn sprite_keeps_the_background_it_lands_on() {
        let mut fb = FrameBuffer::new(10, 2);
        let lawn = Color::Rgb { r: 1, g: 2, b: 3 };
        fb.fill_rect(Rect::new(0, 0, 10, 2), lawn);
        fb.put_sprite(2, 0, Sprite { glyphs: "▒▒", fg: Color::Green });
        assert_eq!(fb.get(2, 0).bg, lawn);
        assert_eq!(fb.get(3, 0).bg, lawn);
    }

    #[test]
    fn out_of_bounds_writes_are_dropped() {
        let mut fb = FrameBuffer::new(4, 2);
        fb.put_str(-2, 0, "abc", Color::White, Color::Reset);
        fb.set(10, 10, Cell::make('z', Color::White, Color::Reset));
        // Chars before column 0 are clipped, the rest land.
        assert_eq!(fb.get(0, 0).as_str(), "c");
    }
}
