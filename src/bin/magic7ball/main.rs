//! Magic 7-Ball terminal display.
//!
//! # Architecture
//!
//! - Input thread: reads crossterm key events into a bounded channel
//! - Tick loop: drains input, debounces presses, advances the state machine,
//!   drives the lamp and draws one frame, paced to `ui.fps`

mod input;
mod render;
mod theme;

use anyhow::{Context, Result};
use crossbeam_channel::{bounded, Receiver, TryRecvError};
use magic7ball::assets::ShowAssets;
use magic7ball::config::{AppConfig, ShowConfig};
use magic7ball::hardware::{ButtonDevice, ButtonLamp, Debouncer, UnavailableButton};
use magic7ball::interactions::{BackgroundInteractionLog, CsvInteractionLog, InteractionSink};
use magic7ball::screen::ScreenGuard;
use magic7ball::show::PresentationStateMachine;
use magic7ball::telemetry::init_tracing;
use magic7ball::{init_logging, log_debug, log_debug_content, log_fatal_error, log_file_path};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::input::{spawn_input_thread, InputEvent};
use crate::render::{LampIndicator, ScreenView};
use crate::theme::Palette;

/// Max pending input events before backpressure.
const INPUT_CHANNEL_CAPACITY: usize = 64;

fn main() -> Result<()> {
    let config = AppConfig::parse_args()?;
    init_logging(&config);
    init_tracing(&config);
    log_debug("=== Magic 7-Ball started ===");
    log_debug(&format!("Log file: {:?}", log_file_path()));

    let result = run(&config);
    if let Err(err) = &result {
        log_debug(&format!("fatal: {err:#}"));
        log_fatal_error(err);
    }
    result
}

fn run(config: &AppConfig) -> Result<()> {
    let mut show = ShowConfig::load(&config.config_path)?;
    config.apply_overrides(&mut show);

    if config.print_config {
        let json = serde_json::to_string_pretty(&show).context("failed to encode config")?;
        println!("{json}");
        return Ok(());
    }

    let rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let csv_log = CsvInteractionLog::new(show.paths.interactions_csv.clone());
    log_debug(&format!("interaction log: {}", csv_log.path().display()));
    let sink = BackgroundInteractionLog::spawn(csv_log);
    let assets = ShowAssets::load(show.paths.icon.as_deref(), show.paths.logo.as_deref());

    let mut button = UnavailableButton;
    if show.gpio.enabled && !button.is_available() {
        log_debug(&format!(
            "button on pin {} unavailable; keyboard only",
            show.gpio.button_pin
        ));
        tracing::warn!(pin = show.gpio.button_pin, "button unavailable, keyboard only");
    }
    let mut lamp = ButtonLamp::new(
        LampIndicator::new(show.gpio.lamp_enabled),
        show.gpio.lamp_idle_speed,
    );

    let mut stdout = io::stdout();
    let screen = ScreenGuard::enter(&mut stdout).context("failed to enter full-screen mode")?;
    let mut terminal =
        Terminal::new(CrosstermBackend::new(stdout)).context("failed to open terminal")?;

    let running = Arc::new(AtomicBool::new(true));
    let (input_tx, input_rx) = bounded(INPUT_CHANNEL_CAPACITY);
    let input_handle = spawn_input_thread(input_tx, Arc::clone(&running));

    let mut session = Session {
        palette: Palette::from_config(&show.theme),
        debounce: Debouncer::new(show.gpio.debounce_seconds),
        frame_interval: Duration::from_secs_f64(1.0 / f64::from(show.ui.fps.max(1))),
        debug: show.ui.debug,
        mode_hint: if button.is_available() {
            "GPIO+Keyboard"
        } else {
            "Keyboard"
        },
        last_event: "none".to_string(),
        assets,
    };
    let machine = PresentationStateMachine::new(show, sink, rng, Instant::now());
    let result = session.run_loop(
        &mut terminal,
        machine,
        &mut button,
        &mut lamp,
        &input_rx,
        &running,
    );

    running.store(false, Ordering::Relaxed);
    drop(terminal);
    screen.restore();
    if input_handle.join().is_err() {
        log_debug("input thread panicked");
    }
    result
}

struct Session {
    palette: Palette,
    debounce: Debouncer,
    frame_interval: Duration,
    debug: bool,
    mode_hint: &'static str,
    last_event: String,
    assets: ShowAssets,
}

impl Session {
    fn run_loop<S: InteractionSink, R: Rng>(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
        mut machine: PresentationStateMachine<S, R>,
        button: &mut impl ButtonDevice,
        lamp: &mut ButtonLamp<LampIndicator>,
        input_rx: &Receiver<InputEvent>,
        running: &AtomicBool,
    ) -> Result<()> {
        while running.load(Ordering::Relaxed) {
            let now = Instant::now();
            let mut raw_press = false;
            loop {
                match input_rx.try_recv() {
                    Ok(InputEvent::Press) => {
                        raw_press = true;
                        self.last_event = "press".to_string();
                    }
                    Ok(InputEvent::Exit) => {
                        log_debug("quit requested");
                        running.store(false, Ordering::Relaxed);
                    }
                    Ok(InputEvent::Other(key)) => self.last_event = key,
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        running.store(false, Ordering::Relaxed);
                        break;
                    }
                }
            }
            if !running.load(Ordering::Relaxed) {
                break;
            }
            if button.poll_pressed() {
                raw_press = true;
                self.last_event = "button".to_string();
            }
            let pressed = raw_press && self.debounce.accept(now);

            let report = machine.tick(now, pressed);
            lamp.set_mode(report.lamp);
            if report.flash {
                lamp.flash(now);
            }
            let t = machine.session_seconds(now);
            let level = lamp.update(now, t);
            if let Some(interaction) = &report.revealed {
                log_debug_content(&format!(
                    "revealed #{} {:?}",
                    interaction.sequence, interaction.outcome
                ));
            }

            let frame = machine.frame(now);
            let hud = self.debug.then(|| {
                vec![
                    format!("mode={}", self.mode_hint),
                    format!("state={}", frame.state.label()),
                    format!("pressed={pressed}"),
                    format!("last_event={}", self.last_event),
                    format!("shown_count={}", machine.shown_count()),
                    format!(
                        "angle={:.2} intensity={:.2}",
                        frame.motion.angle, frame.motion.intensity
                    ),
                    format!("lamp={} {level:.2}", report.lamp.label()),
                ]
            });
            let view = ScreenView {
                frame: &frame,
                palette: &self.palette,
                assets: &self.assets,
                t,
                lamp_level: lamp.is_available().then(|| lamp.device().level()),
                hud: hud.as_deref(),
            };
            terminal.draw(|f| render::draw(f, &view))?;

            let spent = now.elapsed();
            if spent < self.frame_interval {
                thread::sleep(self.frame_interval - spent);
            }
        }
        log_debug(&format!(
            "session ended after {} answers",
            machine.shown_count()
        ));
        Ok(())
    }
}
