/// Input state tracker.
///
/// Drains the terminal event queue once per frame and exposes:
///   - Edge-triggered key presses (pause, card hotkeys, dig toggle)
///   - The current pointer position, for the hover highlight
///   - Left clicks this frame, with their screen position
///   - Whether the right button went down (cancels dig mode)
///
/// Everything here is raw crossterm events; turning a press or a click
/// into a `UiAction` is the ui module's job.

use std::time::Duration;

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind, poll,
};

pub struct InputState {
    /// Keys that went down during the most recent drain_events() call.
    fresh_presses: Vec<KeyCode>,

    /// Raw key events collected during drain, for meta-key handling.
    pub raw_events: Vec<KeyEvent>,

    /// Last reported pointer position, if the terminal has sent one.
    pub pointer: Option<(u16, u16)>,

    /// Left-button clicks this frame, as screen positions.
    pub clicks: Vec<(u16, u16)>,

    /// Right button went down this frame (cancels dig mode).
    pub right_clicked: bool,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            fresh_presses: Vec::with_capacity(8),
            raw_events: Vec::with_capacity(8),
            pointer: None,
            clicks: Vec::with_capacity(4),
            right_clicked: false,
        }
    }

    /// Drain all pending terminal events. Call once per frame, before
    /// the state machine runs.
    pub fn drain_events(&mut self) {
        self.fresh_presses.clear();
        self.raw_events.clear();
        self.clicks.clear();
        self.right_clicked = false;

        while poll(Duration::ZERO).unwrap_or(false) {
            match event::read() {
                Ok(Event::Key(key)) => {
                    self.raw_events.push(key);
                    if key.kind != KeyEventKind::Release {
                        self.fresh_presses.push(key.code);
                    }
                }
                Ok(Event::Mouse(mouse)) => self.track_mouse(mouse),
                _ => {}
            }
        }
    }

    fn track_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                self.pointer = Some((mouse.column, mouse.row));
            }
            MouseEventKind::Down(MouseButton::Left) => {
                self.pointer = Some((mouse.column, mouse.row));
                self.clicks.push((mouse.column, mouse.row));
            }
            MouseEventKind::Down(MouseButton::Right) => {
                self.right_clicked = true;
            }
            _ => {}
        }
    }

    /// Fresh presses in arrival order, for per-key action mapping.
    pub fn pressed_keys(&self) -> &[KeyCode] {
        &self.fresh_presses
    }

    /// Check if any raw event this frame has Ctrl+C.
    pub fn ctrl_c_pressed(&self) -> bool {
        use crossterm::event::KeyModifiers;
        self.raw_events.iter().any(|k| {
            k.modifiers.contains(KeyModifiers::CONTROL)
                && (k.code == KeyCode::Char('c') || k.code == KeyCode::Char('C'))
        })
    }
}
