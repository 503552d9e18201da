//! Command-line parsing, the YAML show configuration, and validation helpers.

mod defaults;
mod show;
mod validation;

use clap::Parser;
use std::path::PathBuf;

pub use defaults::*;
pub use show::{
    load_outcomes_csv, BehaviorConfig, GpioConfig, PathConfig, ScreenText, ShowConfig,
    TextConfig, ThemeConfig, UiConfig,
};

/// CLI options for the Magic 7-Ball display. Values here override the YAML file.
#[derive(Debug, Parser, Clone)]
#[command(about = "Magic 7-Ball terminal display", author, version)]
pub struct AppConfig {
    /// Path to the YAML show configuration
    #[arg(
        long = "config",
        env = "MAGIC7BALL_CONFIG",
        default_value = DEFAULT_CONFIG_FILE
    )]
    pub config_path: PathBuf,

    /// Ignore the button/lamp section and run keyboard-only
    #[arg(long = "no-gpio", default_value_t = false)]
    pub no_gpio: bool,

    /// Frames per second for the tick loop (overrides ui.fps)
    #[arg(long)]
    pub fps: Option<u32>,

    /// Disable all cross-fades (overrides behavior.fades_enabled)
    #[arg(long = "no-fades", default_value_t = false)]
    pub no_fades: bool,

    /// Show the debug overlay (state, angle, counters)
    #[arg(long, default_value_t = false)]
    pub debug: bool,

    /// Seed the outcome/animation RNG for reproducible sessions
    #[arg(long)]
    pub seed: Option<u64>,

    /// Override the interaction log location
    #[arg(long = "interactions-csv", value_name = "PATH")]
    pub interactions_csv: Option<PathBuf>,

    /// Print the effective show configuration as JSON and exit
    #[arg(long = "print-config", default_value_t = false)]
    pub print_config: bool,

    /// Enable file logging (debug)
    #[arg(long = "logs", env = "MAGIC7BALL_LOGS", default_value_t = false)]
    pub logs: bool,

    /// Disable all file logging (overrides --logs and log env vars)
    #[arg(long = "no-logs", env = "MAGIC7BALL_NO_LOGS", default_value_t = false)]
    pub no_logs: bool,

    /// Allow logging prompt/outcome text (debug log only)
    #[arg(
        long = "log-content",
        env = "MAGIC7BALL_LOG_CONTENT",
        default_value_t = false
    )]
    pub log_content: bool,
}

impl AppConfig {
    /// Fold CLI overrides into a loaded show configuration.
    pub fn apply_overrides(&self, show: &mut ShowConfig) {
        if let Some(fps) = self.fps {
            show.ui.fps = fps;
        }
        if self.debug {
            show.ui.debug = true;
        }
        if self.no_fades {
            show.behavior.fades_enabled = false;
        }
        if self.no_gpio {
            show.gpio.enabled = false;
            show.gpio.lamp_enabled = false;
        }
        if let Some(path) = &self.interactions_csv {
            show.paths.interactions_csv = path.clone();
        }
    }
}
