//! Eased alpha interpolation shared by every cross-fade on screen.

/// Durations shorter than this collapse to an instantaneous step.
pub const MIN_FADE_SECONDS: f32 = 0.01;

/// Fully opaque alpha.
pub const OPAQUE: u8 = 255;

/// Fully transparent alpha.
pub const TRANSPARENT: u8 = 0;

#[inline]
pub fn ease_out_cubic(u: f32) -> f32 {
    let inv = 1.0 - u.clamp(0.0, 1.0);
    1.0 - inv * inv * inv
}

#[inline]
pub fn ease_in_cubic(u: f32) -> f32 {
    let u = u.clamp(0.0, 1.0);
    u * u * u
}

/// Elapsed fraction of a fade, clamped to `[0, 1]`.
#[inline]
pub fn fraction(elapsed: f32, duration: f32) -> f32 {
    if duration < MIN_FADE_SECONDS {
        return 1.0;
    }
    (elapsed / duration).clamp(0.0, 1.0)
}

#[inline]
fn to_alpha(level: f32) -> u8 {
    (level.clamp(0.0, 1.0) * f32::from(OPAQUE)).round() as u8
}

/// Turns fade timing into alpha values, honoring the global fades switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FadeController {
    enabled: bool,
}

impl FadeController {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Alpha of a layer that is appearing.
    pub fn fade_in_alpha(&self, elapsed: f32, duration: f32) -> u8 {
        if !self.enabled || duration < MIN_FADE_SECONDS {
            return OPAQUE;
        }
        to_alpha(ease_out_cubic(fraction(elapsed, duration)))
    }

    /// Alpha of a layer that is disappearing (starts opaque, ends transparent).
    pub fn fade_out_alpha(&self, elapsed: f32, duration: f32) -> u8 {
        if !self.enabled || duration < MIN_FADE_SECONDS {
            return TRANSPARENT;
        }
        to_alpha(1.0 - ease_in_cubic(fraction(elapsed, duration)))
    }

    /// True once a fade of `duration` has run its course.
    pub fn is_complete(&self, elapsed: f32, duration: f32) -> bool {
        !self.enabled || duration < MIN_FADE_SECONDS || elapsed >= duration
    }
}

impl Default for FadeController {
    fn default() -> Self {
        Self::new(true)
    }
}
