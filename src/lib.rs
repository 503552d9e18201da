//! Magic 7-Ball: a button-driven answer display.
//!
//! The library holds the presentation core ([`show`]) and the pieces around it
//! (configuration, interaction log, button/lamp collaborators, logging). The
//! `magic7ball` binary renders it in a full-screen terminal.

mod app;
pub mod assets;
pub mod config;
pub mod hardware;
pub mod interactions;
pub mod screen;
pub mod show;
pub mod telemetry;
pub mod text_layout;

pub use app::*;
