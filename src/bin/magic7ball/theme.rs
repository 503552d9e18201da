//! Show colours and alpha blending over the background.
//!
//! Terminal cells have no transparency, so every fade is rendered by mixing the
//! foreground colour towards the background.

use magic7ball::config::ThemeConfig;
use ratatui::style::Color;

/// Resolved colours for one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Palette {
    pub background: [u8; 3],
    pub text: [u8; 3],
    pub accent: [u8; 3],
    /// Secondary text (answer number, footer, HUD).
    pub dim: [u8; 3],
}

impl Palette {
    pub(crate) fn from_config(theme: &ThemeConfig) -> Self {
        Self {
            background: theme.background,
            text: theme.text,
            accent: theme.accent,
            dim: mix(theme.text, theme.background, 160),
        }
    }

    pub(crate) fn background(&self) -> Color {
        rgb(self.background)
    }

    /// `colour` faded towards the background; `alpha` 255 is the colour itself.
    pub(crate) fn fade(&self, colour: [u8; 3], alpha: u8) -> Color {
        rgb(mix(colour, self.background, alpha))
    }
}

pub(crate) fn rgb(colour: [u8; 3]) -> Color {
    Color::Rgb(colour[0], colour[1], colour[2])
}

/// Linear mix of `fg` over `bg`.
pub(crate) fn mix(fg: [u8; 3], bg: [u8; 3], alpha: u8) -> [u8; 3] {
    let a = u16::from(alpha);
    let channel = |f: u8, b: u8| -> u8 {
        ((u16::from(f) * a + u16::from(b) * (255 - a) + 127) / 255) as u8
    };
    [
        channel(fg[0], bg[0]),
        channel(fg[1], bg[1]),
        channel(fg[2], bg[2]),
    ]
}

/// Scale an alpha by a `0.0..=1.0` factor.
pub(crate) fn scale_alpha(alpha: u8, factor: f64) -> u8 {
    (f64::from(alpha) * factor.clamp(0.0, 1.0)).round() as u8
}
