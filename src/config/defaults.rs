//! Built-in values used whenever the config file is missing a field.

pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

pub const DEFAULT_NAME: &str = "MAGIC 7-BALL";

pub const DEFAULT_FPS: u32 = 60;
pub const MIN_FPS: u32 = 1;
pub const MAX_FPS: u32 = 240;

pub const DEFAULT_BACKGROUND: [u8; 3] = [5, 5, 8];
pub const DEFAULT_TEXT_COLOR: [u8; 3] = [240, 240, 240];
pub const DEFAULT_ACCENT: [u8; 3] = [90, 95, 140];

pub const DEFAULT_BUTTON_PIN: u8 = 17;
pub const DEFAULT_LAMP_PIN: u8 = 18;
pub const DEFAULT_DEBOUNCE_SECONDS: f32 = 0.15;
pub const DEFAULT_LAMP_IDLE_SPEED: f32 = 1.0;

pub const DEFAULT_THINKING_MIN_SECONDS: f32 = 1.8;
pub const DEFAULT_THINKING_MAX_SECONDS: f32 = 2.6;
pub const DEFAULT_IDLE_RETURN_SECONDS: f32 = 20.0;
pub const DEFAULT_RESULT_FADE_SECONDS: f32 = 0.5;
pub const DEFAULT_RESULT_FADEOUT_SECONDS: f32 = 0.6;
pub const DEFAULT_PROMPT_FADE_SECONDS: f32 = 0.6;
pub const DEFAULT_THINKING_FADE_SECONDS: f32 = 0.4;
pub const DEFAULT_SQUARE_SETTLE_SECONDS: f32 = 2.5;
pub const DEFAULT_SPIN_SPEED: f32 = 0.4;
pub const DEFAULT_SUBTITLE_CYCLE_SECONDS: f32 = 6.0;
pub const DEFAULT_SUBTITLE_FADE_SECONDS: f32 = 0.5;
pub const DEFAULT_TITLE_CYCLE_SECONDS: f32 = 20.0;

/// Upper bound for any configured duration; keeps typos like `2000` from freezing the show.
pub const MAX_DURATION_SECONDS: f32 = 3600.0;

pub const DEFAULT_WAITING_SUBTITLE: &str = "Press button";
pub const DEFAULT_THINKING_TITLE: &str = "SHAKING THE 7-BALL...";
pub const DEFAULT_THINKING_SUBTITLE: &str = "...";
pub const DEFAULT_RESULT_FOOTER: &str = "Press button";

pub const DEFAULT_OUTCOMES_CSV: &str = "outcomes.csv";
pub const DEFAULT_INTERACTIONS_CSV: &str = "logs/interactions.csv";
pub const DEFAULT_ICON_PATH: &str = "assets/icon.txt";
pub const DEFAULT_LOGO_PATH: &str = "assets/logo.txt";
