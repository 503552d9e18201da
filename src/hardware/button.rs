use std::time::{Duration, Instant};

/// Collapses bursts of presses into one edge per `min_interval`.
#[derive(Debug, Clone)]
pub struct Debouncer {
    min_interval: Duration,
    last_accepted: Option<Instant>,
}

impl Debouncer {
    pub fn new(debounce_seconds: f32) -> Self {
        Self {
            min_interval: Duration::from_secs_f32(debounce_seconds.max(0.0)),
            last_accepted: None,
        }
    }

    /// Returns true if a press at `now` counts as a new press.
    pub fn accept(&mut self, now: Instant) -> bool {
        if let Some(last) = self.last_accepted {
            if now.saturating_duration_since(last) < self.min_interval {
                return false;
            }
        }
        self.last_accepted = Some(now);
        true
    }
}

/// Source of raw press signals other than the keyboard.
pub trait ButtonDevice {
    fn is_available(&self) -> bool;
    /// Poll once per tick. Returns true exactly once per physical press (the
    /// down edge); a held button reports false until it is released and pressed
    /// again. Devices that only expose a level wrap it in [`PressEdge`].
    fn poll_pressed(&mut self) -> bool;
}

/// Turns a held/released level into one press per down edge.
#[derive(Debug, Default, Clone, Copy)]
pub struct PressEdge {
    down: bool,
}

impl PressEdge {
    /// Feed the current level; true only on the transition from up to down.
    pub fn update(&mut self, down: bool) -> bool {
        let pressed = down && !self.down;
        self.down = down;
        pressed
    }
}

/// Stand-in used when no physical button is wired up.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableButton;

impl ButtonDevice for UnavailableButton {
    fn is_available(&self) -> bool {
        false
    }

    fn poll_pressed(&mut self) -> bool {
        false
    }
}
