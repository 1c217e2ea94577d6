/// Keyboard input collector.
///
/// Drains all pending crossterm events once per frame and keeps the
/// key presses in arrival order, so the last direction pressed in a
/// frame is the one the snake receives.
///
/// Release events are ignored. Auto-repeat arrives as Press or Repeat
/// and is treated as another press; repeating the current heading is a
/// no-op for the resolver anyway.

use std::time::Duration;

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

pub struct InputState {
    /// Key codes pressed during the most recent `drain_events()`, in order.
    pressed: Vec<KeyCode>,

    /// Raw key events collected during drain, for modifier checks.
    raw_events: Vec<KeyEvent>,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            pressed: Vec::with_capacity(8),
            raw_events: Vec::with_capacity(8),
        }
    }

    /// Drain all pending terminal events without blocking.
    /// Call this once per frame, before polling the scheduler.
    pub fn drain_events(&mut self) {
        self.pressed.clear();
        self.raw_events.clear();

        while poll(Duration::ZERO).unwrap_or(false) {
            if let Ok(Event::Key(key)) = event::read() {
                if key.kind == KeyEventKind::Release {
                    continue;
                }
                self.raw_events.push(key);
                self.pressed.push(key.code);
            }
        }
    }

    /// Presses from the last drain, oldest first.
    pub fn pressed(&self) -> &[KeyCode] {
        &self.pressed
    }

    /// Was any of these keys pressed this frame?
    pub fn any_pressed(&self, codes: &[KeyCode]) -> bool {
        self.pressed.iter().any(|c| codes.contains(c))
    }

    /// Check if any raw event this frame has Ctrl+C
    pub fn ctrl_c_pressed(&self) -> bool {
        self.raw_events.iter().any(|k| {
            k.modifiers.contains(KeyModifiers::CONTROL)
                && (k.code == KeyCode::Char('c') || k.code == KeyCode::Char('C'))
        })
    }
}
