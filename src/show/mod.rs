//! Presentation core: the state machine and the animation pieces it drives.
//!
//! Nothing in here touches the terminal or the filesystem directly; the binary
//! feeds it debounced presses and paints the [`RenderFrame`] it hands back.

mod fade;
mod frame;
mod idle;
mod machine;
mod motion;
mod outcome;
mod subtitle;

pub use fade::{
    ease_in_cubic, ease_out_cubic, FadeController, MIN_FADE_SECONDS, OPAQUE, TRANSPARENT,
};
pub use frame::{combine_alpha, RenderFrame, StateKind, TextLayer, TickReport};
pub use idle::{IdleScene, IdleSequencer, IdleStep, IdleView};
pub use machine::{PresentationStateMachine, ShowState, MAX_SELECTION_ATTEMPTS};
pub use motion::{MotionModel, MotionRegime, MotionSample, SpinDirection};
pub use outcome::{choose_outcome, default_outcomes, Outcome, OutcomeKind, EMPTY_POOL_TEXT};
pub use subtitle::{pick_subtitle, SubtitleRotator, SubtitleView, MIN_SUBTITLE_CYCLE_SECONDS};
