//! Show configuration read from `config.yaml`.
//!
//! Every field is looked up on its own: a missing or mistyped field falls back to
//! its built-in default and the rest of the file still applies. The resulting
//! [`ShowConfig`] is an immutable snapshot for the whole session.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_yaml::Value;

use super::defaults::*;
use crate::log_debug;
use crate::show::{default_outcomes, Outcome, OutcomeKind};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UiConfig {
    pub fps: u32,
    pub debug: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThemeConfig {
    pub background: [u8; 3],
    pub text: [u8; 3],
    pub accent: [u8; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GpioConfig {
    pub enabled: bool,
    pub button_pin: u8,
    pub debounce_seconds: f32,
    pub lamp_enabled: bool,
    pub lamp_pin: u8,
    pub lamp_idle_speed: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BehaviorConfig {
    pub thinking_min_seconds: f32,
    pub thinking_max_seconds: f32,
    pub idle_return_seconds: f32,
    pub result_fade_seconds: f32,
    pub result_fadeout_seconds: f32,
    pub prompt_fade_seconds: f32,
    pub thinking_fade_seconds: f32,
    pub fades_enabled: bool,
    pub square_settle_seconds: f32,
    pub spin_speed: f32,
    pub subtitle_cycle_seconds: f32,
    pub subtitle_fade_seconds: f32,
    pub title_cycle_seconds: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScreenText {
    pub title: String,
    pub subtitles: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextConfig {
    pub prompts: Vec<String>,
    pub waiting_screen: ScreenText,
    pub thinking_screen: ScreenText,
    pub result_footer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathConfig {
    pub outcomes_csv: PathBuf,
    pub interactions_csv: PathBuf,
    pub icon: Option<PathBuf>,
    pub logo: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShowConfig {
    pub name: String,
    pub ui: UiConfig,
    pub theme: ThemeConfig,
    pub gpio: GpioConfig,
    pub behavior: BehaviorConfig,
    pub text: TextConfig,
    pub outcomes: Vec<Outcome>,
    pub paths: PathConfig,
}

/// Lookup helper over the raw YAML tree that records fields it had to reject.
struct Fields<'a> {
    root: &'a Value,
    warnings: Vec<String>,
}

impl<'a> Fields<'a> {
    fn new(root: &'a Value) -> Self {
        Self {
            root,
            warnings: Vec::new(),
        }
    }

    fn raw(&self, path: &str) -> Option<&'a Value> {
        let mut current = self.root;
        for part in path.split('.') {
            current = current.as_mapping()?.get(part)?;
        }
        if current.is_null() {
            return None;
        }
        Some(current)
    }

    fn get<T: DeserializeOwned>(&mut self, path: &str) -> Option<T> {
        let value = self.raw(path)?;
        match serde_yaml::from_value::<T>(value.clone()) {
            Ok(parsed) => Some(parsed),
            Err(err) => {
                self.warnings
                    .push(format!("ignoring `{path}`: {err}; using default"));
                None
            }
        }
    }

    fn seconds(&mut self, path: &str, default: f32) -> f32 {
        match self.get::<f32>(path) {
            Some(value) if value.is_finite() && (0.0..=MAX_DURATION_SECONDS).contains(&value) => {
                value
            }
            Some(value) => {
                self.warnings
                    .push(format!("ignoring `{path}`: {value} is out of range; using default"));
                default
            }
            None => default,
        }
    }

    fn path(&mut self, key: &str, base_dir: &Path, default: &str) -> PathBuf {
        let raw = self
            .get::<String>(key)
            .unwrap_or_else(|| default.to_string());
        resolve(base_dir, &raw)
    }

    /// Like [`Fields::path`], but `false` switches the asset off.
    fn optional_path(&mut self, key: &str, base_dir: &Path, default: &str) -> Option<PathBuf> {
        if let Some(Value::Bool(false)) = self.raw(key) {
            return None;
        }
        Some(self.path(key, base_dir, default))
    }

    fn text_list(&mut self, list_path: &str, single_path: &str) -> Option<Vec<String>> {
        let from_list = self.get::<Vec<Value>>(list_path).map(|items| {
            items
                .iter()
                .filter_map(scalar_to_string)
                .filter(|item| !item.trim().is_empty())
                .collect::<Vec<_>>()
        });
        match from_list {
            Some(list) if !list.is_empty() => Some(list),
            _ => self
                .raw(single_path)
                .and_then(scalar_to_string)
                .filter(|item| !item.trim().is_empty())
                .map(|item| vec![item]),
        }
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

fn weight_from(value: Option<&Value>) -> u32 {
    let parsed = match value {
        Some(Value::Number(number)) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|f| f as i64)),
        Some(Value::String(text)) => text.trim().parse::<i64>().ok(),
        _ => None,
    };
    parsed.unwrap_or(1).clamp(1, i64::from(u32::MAX)) as u32
}

fn kind_from(raw: Option<&str>) -> OutcomeKind {
    raw.and_then(OutcomeKind::parse)
        .unwrap_or(OutcomeKind::Inconclusive)
}

fn outcomes_from_yaml(items: &[Value]) -> Vec<Outcome> {
    items
        .iter()
        .filter_map(|item| {
            let map = item.as_mapping()?;
            let text = map.get("text").and_then(scalar_to_string)?;
            let text = text.trim();
            if text.is_empty() {
                return None;
            }
            let kind = kind_from(map.get("type").and_then(Value::as_str));
            Some(Outcome::new(text, weight_from(map.get("weight")), kind))
        })
        .collect()
}

/// Read outcomes from a `text,weight,type` CSV. Rows without text are skipped.
pub fn load_outcomes_csv(path: &Path) -> Result<Vec<Outcome>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("failed to open outcomes CSV {}", path.display()))?;
    let headers = reader.headers()?.clone();
    let column = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));
    let (text_col, weight_col, type_col) = (column("text"), column("weight"), column("type"));
    let Some(text_col) = text_col else {
        return Ok(Vec::new());
    };

    let mut outcomes = Vec::new();
    for row in reader.records() {
        let row = row?;
        let text = row.get(text_col).unwrap_or("").trim();
        if text.is_empty() {
            continue;
        }
        let weight = weight_col
            .and_then(|col| row.get(col))
            .and_then(|raw| raw.parse::<i64>().ok())
            .unwrap_or(1)
            .clamp(1, i64::from(u32::MAX)) as u32;
        let kind = kind_from(type_col.and_then(|col| row.get(col)));
        outcomes.push(Outcome::new(text, weight, kind));
    }
    Ok(outcomes)
}

fn resolve(base_dir: &Path, raw: &str) -> PathBuf {
    let path = PathBuf::from(raw);
    if path.is_absolute() {
        path
    } else {
        base_dir.join(path)
    }
}

impl ShowConfig {
    /// Load the config file at `path`. A missing file yields the defaults; an
    /// unreadable YAML document is reported and also yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let base_dir = path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                log_debug(&format!(
                    "config file {} not found; using defaults",
                    path.display()
                ));
                String::new()
            }
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("failed to read config file {}", path.display()))
            }
        };
        let (config, warnings) = Self::parse_with_warnings(&text, base_dir);
        for warning in &warnings {
            log_debug(&format!("config: {warning}"));
            tracing::warn!(config = %path.display(), "{warning}");
        }
        Ok(config)
    }

    /// Parse YAML text, resolving relative paths against `base_dir`.
    pub fn parse_with_warnings(text: &str, base_dir: &Path) -> (Self, Vec<String>) {
        let mut early_warnings = Vec::new();
        let root = if text.trim().is_empty() {
            Value::Null
        } else {
            match serde_yaml::from_str::<Value>(text) {
                Ok(value) => value,
                Err(err) => {
                    early_warnings.push(format!("config is not valid YAML ({err}); using defaults"));
                    Value::Null
                }
            }
        };
        Self::from_value(&root, base_dir, early_warnings, true)
    }

    fn from_value(
        root: &Value,
        base_dir: &Path,
        early_warnings: Vec<String>,
        read_outcomes_csv: bool,
    ) -> (Self, Vec<String>) {
        let mut fields = Fields::new(root);
        fields.warnings = early_warnings;

        let name = fields
            .get::<String>("name")
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_NAME.to_string());

        let ui = UiConfig {
            fps: fields
                .get::<u32>("ui.fps")
                .filter(|fps| (MIN_FPS..=MAX_FPS).contains(fps))
                .unwrap_or(DEFAULT_FPS),
            debug: fields.get("ui.debug").unwrap_or(false),
        };

        let theme = ThemeConfig {
            background: fields.get("theme.background").unwrap_or(DEFAULT_BACKGROUND),
            text: fields.get("theme.text").unwrap_or(DEFAULT_TEXT_COLOR),
            accent: fields.get("theme.accent").unwrap_or(DEFAULT_ACCENT),
        };

        let gpio = GpioConfig {
            enabled: fields.get("gpio.enabled").unwrap_or(true),
            button_pin: fields.get("gpio.button_pin").unwrap_or(DEFAULT_BUTTON_PIN),
            debounce_seconds: fields.seconds("gpio.debounce_seconds", DEFAULT_DEBOUNCE_SECONDS),
            lamp_enabled: fields.get("gpio.lamp_enabled").unwrap_or(true),
            lamp_pin: fields.get("gpio.lamp_pin").unwrap_or(DEFAULT_LAMP_PIN),
            lamp_idle_speed: fields
                .get::<f32>("gpio.lamp_idle_speed")
                .filter(|speed| speed.is_finite() && *speed > 0.0)
                .unwrap_or(DEFAULT_LAMP_IDLE_SPEED),
        };

        let legacy_animation = fields
            .get::<f32>("behavior.animation_seconds")
            .filter(|value| value.is_finite() && *value > 0.0);
        let mut thinking_min = fields.seconds(
            "behavior.thinking_min_seconds",
            legacy_animation.unwrap_or(DEFAULT_THINKING_MIN_SECONDS),
        );
        let mut thinking_max = fields.seconds(
            "behavior.thinking_max_seconds",
            legacy_animation.unwrap_or(DEFAULT_THINKING_MAX_SECONDS),
        );
        if thinking_min > thinking_max {
            std::mem::swap(&mut thinking_min, &mut thinking_max);
        }

        let behavior = BehaviorConfig {
            thinking_min_seconds: thinking_min,
            thinking_max_seconds: thinking_max,
            idle_return_seconds: fields
                .seconds("behavior.idle_return_seconds", DEFAULT_IDLE_RETURN_SECONDS),
            result_fade_seconds: fields
                .seconds("behavior.result_fade_seconds", DEFAULT_RESULT_FADE_SECONDS),
            result_fadeout_seconds: fields
                .seconds("behavior.result_fadeout_seconds", DEFAULT_RESULT_FADEOUT_SECONDS),
            prompt_fade_seconds: fields
                .seconds("behavior.prompt_fade_seconds", DEFAULT_PROMPT_FADE_SECONDS),
            thinking_fade_seconds: fields
                .seconds("behavior.thinking_fade_seconds", DEFAULT_THINKING_FADE_SECONDS),
            fades_enabled: fields.get("behavior.fades_enabled").unwrap_or(true),
            square_settle_seconds: fields
                .seconds("behavior.square_settle_seconds", DEFAULT_SQUARE_SETTLE_SECONDS),
            spin_speed: fields
                .get::<f32>("behavior.spin_speed")
                .filter(|speed| speed.is_finite())
                .unwrap_or(DEFAULT_SPIN_SPEED),
            subtitle_cycle_seconds: fields
                .seconds("behavior.subtitle_cycle_seconds", DEFAULT_SUBTITLE_CYCLE_SECONDS),
            subtitle_fade_seconds: fields
                .seconds("behavior.subtitle_fade_seconds", DEFAULT_SUBTITLE_FADE_SECONDS),
            title_cycle_seconds: fields
                .seconds("behavior.title_cycle_seconds", DEFAULT_TITLE_CYCLE_SECONDS),
        };

        let prompts = fields
            .text_list("text.prompts", "text.prompt")
            .unwrap_or_else(|| vec![name.clone()]);
        let text = TextConfig {
            prompts,
            waiting_screen: ScreenText {
                title: fields
                    .get::<String>("text.waiting_screen.title")
                    .unwrap_or_else(|| name.clone()),
                subtitles: fields
                    .text_list("text.waiting_screen.subtitles", "text.waiting_screen.subtitle")
                    .unwrap_or_else(|| vec![DEFAULT_WAITING_SUBTITLE.to_string()]),
            },
            thinking_screen: ScreenText {
                title: fields
                    .get::<String>("text.thinking_screen.title")
                    .unwrap_or_else(|| DEFAULT_THINKING_TITLE.to_string()),
                subtitles: fields
                    .text_list(
                        "text.thinking_screen.subtitles",
                        "text.thinking_screen.subtitle",
                    )
                    .unwrap_or_else(|| vec![DEFAULT_THINKING_SUBTITLE.to_string()]),
            },
            result_footer: fields
                .get::<String>("text.result_screen.footer")
                .unwrap_or_else(|| DEFAULT_RESULT_FOOTER.to_string()),
        };

        let paths = PathConfig {
            outcomes_csv: fields.path("paths.outcomes_csv", base_dir, DEFAULT_OUTCOMES_CSV),
            interactions_csv: fields.path(
                "paths.interactions_csv",
                base_dir,
                DEFAULT_INTERACTIONS_CSV,
            ),
            icon: fields.optional_path("paths.icon", base_dir, DEFAULT_ICON_PATH),
            logo: fields.optional_path("paths.logo", base_dir, DEFAULT_LOGO_PATH),
        };

        let mut outcomes = fields
            .get::<Vec<Value>>("outcomes")
            .map(|items| outcomes_from_yaml(&items))
            .unwrap_or_default();
        if outcomes.is_empty() && read_outcomes_csv && paths.outcomes_csv.exists() {
            match load_outcomes_csv(&paths.outcomes_csv) {
                Ok(from_csv) => outcomes = from_csv,
                Err(err) => fields.warnings.push(format!("{err:#}")),
            }
        }
        if outcomes.is_empty() {
            outcomes = default_outcomes();
        }

        let warnings = fields.warnings;
        (
            Self {
                name,
                ui,
                theme,
                gpio,
                behavior,
                text,
                outcomes,
                paths,
            },
            warnings,
        )
    }
}

impl Default for ShowConfig {
    fn default() -> Self {
        Self::from_value(&Value::Null, Path::new("."), Vec::new(), false).0
    }
}
