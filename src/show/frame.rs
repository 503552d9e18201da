//! Render-side snapshot of the presentation. The renderer reads these and knows
//! nothing about timers or transitions.

use crate::hardware::LampMode;
use crate::interactions::Interaction;

use super::motion::MotionSample;

/// Which state the machine is in, without the per-state bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateKind {
    FadeInPrompt,
    Prompt,
    FadeInThinking,
    Thinking,
    Result,
    FadeOut,
}

impl StateKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::FadeInPrompt => "fade_in_prompt",
            Self::Prompt => "prompt",
            Self::FadeInThinking => "fade_in_thinking",
            Self::Thinking => "thinking",
            Self::Result => "result",
            Self::FadeOut => "fade_out",
        }
    }

    /// Idle screen states (identity/logo cycle, prompt text, rotating subtitle).
    pub fn is_prompt_family(self) -> bool {
        matches!(self, Self::FadeInPrompt | Self::Prompt)
    }

    pub fn is_thinking_family(self) -> bool {
        matches!(self, Self::FadeInThinking | Self::Thinking)
    }

    /// Lamp behaviour follows the state and nothing else.
    pub fn lamp_mode(self) -> LampMode {
        match self {
            Self::FadeInPrompt | Self::Prompt | Self::FadeOut => LampMode::Idle,
            Self::FadeInThinking | Self::Thinking => LampMode::Thinking,
            Self::Result => LampMode::Result,
        }
    }
}

/// A line of text and how visible it is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextLayer {
    pub text: String,
    pub alpha: u8,
}

impl TextLayer {
    pub fn new(text: impl Into<String>, alpha: u8) -> Self {
        Self {
            text: text.into(),
            alpha,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.alpha > 0 && !self.text.is_empty()
    }
}

/// Everything needed to paint one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub state: StateKind,
    pub motion: MotionSample,
    /// Whole-screen visibility for screen-level fades.
    pub screen_alpha: u8,
    pub identity_alpha: u8,
    pub logo_alpha: u8,
    /// Idle ring position, only while the idle screen is up.
    pub idle_phase: Option<u8>,
    pub title: Option<TextLayer>,
    pub prompt: Option<TextLayer>,
    pub subtitle: Option<TextLayer>,
    /// Replacement subtitle while a cross-fade is running.
    pub incoming_subtitle: Option<TextLayer>,
    pub outcome: Option<TextLayer>,
    pub footer: Option<TextLayer>,
    pub answer_number: Option<u64>,
    pub lamp: LampMode,
}

/// What happened during one tick, for the collaborators around the machine.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    pub lamp: LampMode,
    /// An accepted press asks the lamp for a short flash.
    pub flash: bool,
    pub revealed: Option<Interaction>,
}

/// Multiply two alphas (`255 * 255 = 255`).
pub fn combine_alpha(a: u8, b: u8) -> u8 {
    ((u16::from(a) * u16::from(b) + 127) / 255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combine_alpha_keeps_the_extremes() {
        assert_eq!(combine_alpha(255, 255), 255);
        assert_eq!(combine_alpha(255, 0), 0);
        assert_eq!(combine_alpha(0, 200), 0);
        assert_eq!(combine_alpha(255, 128), 128);
    }

    #[test]
    fn lamp_follows_state() {
        assert_eq!(StateKind::Prompt.lamp_mode(), LampMode::Idle);
        assert_eq!(StateKind::FadeInPrompt.lamp_mode(), LampMode::Idle);
        assert_eq!(StateKind::FadeInThinking.lamp_mode(), LampMode::Thinking);
        assert_eq!(StateKind::Thinking.lamp_mode(), LampMode::Thinking);
        assert_eq!(StateKind::Result.lamp_mode(), LampMode::Result);
        assert_eq!(StateKind::FadeOut.lamp_mode(), LampMode::Idle);
    }

    #[test]
    fn empty_text_is_invisible() {
        assert!(!TextLayer::new("", 255).is_visible());
        assert!(!TextLayer::new("Yes", 0).is_visible());
        assert!(TextLayer::new("Yes", 1).is_visible());
    }
}
