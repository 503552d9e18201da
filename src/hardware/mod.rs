//! Button and lamp collaborators. Physical devices plug in through the traits;
//! when none are present the show runs keyboard-only with a silent lamp.

mod button;
mod lamp;

pub use button::{ButtonDevice, Debouncer, PressEdge, UnavailableButton};
pub use lamp::{pattern_level, ButtonLamp, LampDevice, LampMode, FLASH_DURATION};
