//! Button lamp patterns: slow breathe while idle, nervous pulse while thinking,
//! steady while an answer is up, and a short full-brightness flash per press.

use std::time::{Duration, Instant};

/// How long a press flash overrides the mode pattern.
pub const FLASH_DURATION: Duration = Duration::from_millis(180);
/// Level changes smaller than this are not forwarded to the device.
const LEVEL_EPSILON: f32 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LampMode {
    #[default]
    Idle,
    Thinking,
    Result,
}

impl LampMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Thinking => "thinking",
            Self::Result => "result",
        }
    }
}

/// Output side of the lamp (PWM pin, terminal indicator, ...).
pub trait LampDevice {
    fn is_available(&self) -> bool {
        true
    }
    /// Brightness in `0.0..=1.0`.
    fn set_level(&mut self, level: f32);
}

/// Brightness for `mode` at `t` seconds.
pub fn pattern_level(mode: LampMode, t: f64, idle_speed: f32) -> f32 {
    let level = match mode {
        LampMode::Result => 1.0,
        LampMode::Idle => {
            let speed = f64::from(idle_speed.max(0.1));
            0.315 + 0.235 * (t * 1.2 * speed).sin()
        }
        LampMode::Thinking => {
            let base = 0.5 + 0.5 * (t * 6.0).sin();
            let shiver = 0.12 * (0.5 + 0.5 * (t * 17.0).sin());
            (base + shiver).clamp(0.05, 1.0)
        }
    };
    level.clamp(0.0, 1.0) as f32
}

pub struct ButtonLamp<D: LampDevice> {
    device: D,
    mode: LampMode,
    idle_speed: f32,
    flash_until: Option<Instant>,
    last_level: Option<f32>,
}

impl<D: LampDevice> ButtonLamp<D> {
    pub fn new(device: D, idle_speed: f32) -> Self {
        Self {
            device,
            mode: LampMode::Idle,
            idle_speed,
            flash_until: None,
            last_level: None,
        }
    }

    pub fn is_available(&self) -> bool {
        self.device.is_available()
    }

    pub fn mode(&self) -> LampMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: LampMode) {
        self.mode = mode;
    }

    pub fn flash(&mut self, now: Instant) {
        self.flash_until = Some(now + FLASH_DURATION);
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    /// Compute this tick's level and forward it if it moved noticeably.
    pub fn update(&mut self, now: Instant, t: f64) -> f32 {
        let level = match self.flash_until {
            Some(until) if now < until => 1.0,
            _ => pattern_level(self.mode, t, self.idle_speed),
        };
        let changed = self
            .last_level
            .map_or(true, |last| (level - last).abs() >= LEVEL_EPSILON);
        if changed {
            self.last_level = Some(level);
            self.device.set_level(level);
        }
        level
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingLamp {
        levels: Vec<f32>,
    }

    impl LampDevice for RecordingLamp {
        fn set_level(&mut self, level: f32) {
            self.levels.push(level);
        }
    }

    #[test]
    fn idle_breathe_stays_in_band() {
        for step in 0..200 {
            let level = pattern_level(LampMode::Idle, step as f64 * 0.1, 1.0);
            assert!((0.079..=0.551).contains(&level), "level {level}");
        }
    }

    #[test]
    fn thinking_pulse_is_clamped() {
        for step in 0..200 {
            let level = pattern_level(LampMode::Thinking, step as f64 * 0.037, 1.0);
            assert!((0.05..=1.0).contains(&level));
        }
    }

    #[test]
    fn result_is_steady_on() {
        assert_eq!(pattern_level(LampMode::Result, 12.3, 1.0), 1.0);
    }

    #[test]
    fn flash_overrides_mode_briefly() {
        let start = Instant::now();
        let mut lamp = ButtonLamp::new(RecordingLamp::default(), 1.0);
        lamp.set_mode(LampMode::Idle);
        lamp.flash(start);
        assert_eq!(lamp.update(start + Duration::from_millis(50), 0.0), 1.0);
        let after = lamp.update(start + Duration::from_millis(400), 0.0);
        assert!(after < 1.0);
    }

    #[test]
    fn small_changes_are_not_forwarded() {
        let start = Instant::now();
        let mut lamp = ButtonLamp::new(RecordingLamp::default(), 1.0);
        lamp.set_mode(LampMode::Result);
        lamp.update(start, 0.0);
        lamp.update(start, 1.0);
        lamp.update(start, 2.0);
        assert_eq!(lamp.device().levels, vec![1.0]);
    }
}
