//! The presentation state machine: owns time for the show and decides what is on
//! screen each tick.
//!
//! One tick applies the transition rules in priority order:
//! idle timeout, interrupt, press-to-think, thinking completion, result expiry,
//! fade-out completion, fade-in completion. Several rules may fire in the same
//! tick (with fades disabled a press goes straight through to `Thinking`).

use std::time::{Duration, Instant};

use chrono::Utc;
use rand::Rng;

use crate::config::ShowConfig;
use crate::hardware::LampMode;
use crate::interactions::{Interaction, InteractionSink};
use crate::{log_debug, log_debug_content};

use super::fade::{FadeController, MIN_FADE_SECONDS, OPAQUE, TRANSPARENT};
use super::frame::{combine_alpha, RenderFrame, StateKind, TextLayer, TickReport};
use super::idle::IdleSequencer;
use super::motion::{MotionModel, SpinDirection};
use super::outcome::{choose_outcome, EMPTY_POOL_TEXT};
use super::subtitle::{pick_subtitle, SubtitleRotator};

/// Draws allowed while the selector keeps returning the previous answer.
pub const MAX_SELECTION_ATTEMPTS: usize = 8;

/// Current state plus the timestamps only that state needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowState {
    FadeInPrompt { started_at: Instant },
    Prompt,
    /// `duration` is rolled on entry and carried into `Thinking`.
    FadeInThinking { started_at: Instant, duration: Duration },
    Thinking { started_at: Instant, duration: Duration },
    Result { revealed_at: Instant },
    FadeOut { started_at: Instant },
}

impl ShowState {
    pub fn kind(&self) -> StateKind {
        match self {
            Self::FadeInPrompt { .. } => StateKind::FadeInPrompt,
            Self::Prompt => StateKind::Prompt,
            Self::FadeInThinking { .. } => StateKind::FadeInThinking,
            Self::Thinking { .. } => StateKind::Thinking,
            Self::Result { .. } => StateKind::Result,
            Self::FadeOut { .. } => StateKind::FadeOut,
        }
    }
}

fn seconds_since(now: Instant, then: Instant) -> f32 {
    now.saturating_duration_since(then).as_secs_f32()
}

pub struct PresentationStateMachine<S: InteractionSink, R: Rng> {
    config: ShowConfig,
    sink: S,
    rng: R,
    epoch: Instant,
    state: ShowState,
    fades: FadeController,
    motion: MotionModel,
    idle: IdleSequencer,
    waiting_subtitle: SubtitleRotator,
    thinking_subtitle: String,
    outcome_text: Option<String>,
    last_outcome_text: Option<String>,
    prompt_index: usize,
    logged_prompt: String,
    last_activity_at: Instant,
    shown_count: u64,
}

impl<S: InteractionSink, R: Rng> PresentationStateMachine<S, R> {
    /// Start a session at `now`, fading in the idle screen.
    pub fn new(config: ShowConfig, sink: S, rng: R, now: Instant) -> Self {
        let fades = FadeController::new(config.behavior.fades_enabled);
        let behavior = &config.behavior;
        let motion = MotionModel::new(
            f64::from(behavior.spin_speed),
            f64::from(behavior.square_settle_seconds),
        );
        let idle = IdleSequencer::new(behavior.title_cycle_seconds, fades, now);
        let waiting_subtitle = SubtitleRotator::new(
            config.text.waiting_screen.subtitles.clone(),
            behavior.subtitle_cycle_seconds,
            behavior.subtitle_fade_seconds,
            fades,
            now,
        );
        let mut machine = Self {
            config,
            sink,
            rng,
            epoch: now,
            state: ShowState::FadeInPrompt { started_at: now },
            fades,
            motion,
            idle,
            waiting_subtitle,
            thinking_subtitle: String::new(),
            outcome_text: None,
            last_outcome_text: None,
            prompt_index: 0,
            logged_prompt: String::new(),
            last_activity_at: now,
            shown_count: 0,
        };
        machine.enter_fade_in_prompt(now);
        machine
    }

    pub fn state(&self) -> ShowState {
        self.state
    }

    pub fn outcome_text(&self) -> Option<&str> {
        self.outcome_text.as_deref()
    }

    pub fn last_outcome_text(&self) -> Option<&str> {
        self.last_outcome_text.as_deref()
    }

    pub fn shown_count(&self) -> u64 {
        self.shown_count
    }

    pub fn prompt_index(&self) -> usize {
        self.prompt_index
    }

    pub fn config(&self) -> &ShowConfig {
        &self.config
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Seconds since the session started; the time base of the motion model.
    pub fn session_seconds(&self, now: Instant) -> f64 {
        now.saturating_duration_since(self.epoch).as_secs_f64()
    }

    /// Advance one tick. `pressed` is an already debounced primary-action edge.
    pub fn tick(&mut self, now: Instant, pressed: bool) -> TickReport {
        let mut press = pressed;
        if pressed {
            self.last_activity_at = now;
        }

        if let ShowState::Result { .. } = self.state {
            let idle_for = seconds_since(now, self.last_activity_at);
            if idle_for >= self.config.behavior.idle_return_seconds {
                log_debug("idle timeout: returning to prompt");
                self.enter_fade_in_prompt(now);
            }
        }

        if press && matches!(self.state, ShowState::Result { .. } | ShowState::FadeOut { .. }) {
            press = false;
            log_debug("interrupt: re-rolling from result");
            self.enter_fade_in_thinking(now);
        }

        if press && self.state.kind().is_prompt_family() {
            self.logged_prompt = self.active_prompt().to_string();
            if !self.config.text.prompts.is_empty() {
                self.prompt_index = (self.prompt_index + 1) % self.config.text.prompts.len();
            }
            self.enter_fade_in_thinking(now);
        }

        let mut revealed = None;
        if let ShowState::Thinking {
            started_at,
            duration,
        } = self.state
        {
            if now.saturating_duration_since(started_at) >= duration {
                revealed = Some(self.reveal(now));
            }
        }

        if let ShowState::Result { .. } = self.state {
            let fadeout = self.config.behavior.result_fadeout_seconds;
            let lead = (self.config.behavior.idle_return_seconds - fadeout).max(0.0);
            if self.fades.enabled()
                && fadeout >= MIN_FADE_SECONDS
                && seconds_since(now, self.last_activity_at) >= lead
            {
                self.transition(ShowState::FadeOut { started_at: now });
            }
        }

        if let ShowState::FadeOut { started_at } = self.state {
            let fadeout = self.config.behavior.result_fadeout_seconds;
            if self
                .fades
                .is_complete(seconds_since(now, started_at), fadeout)
            {
                self.enter_fade_in_prompt(now);
            }
        }

        if let ShowState::FadeInPrompt { started_at } = self.state {
            let fade = self.config.behavior.prompt_fade_seconds;
            if self.fades.is_complete(seconds_since(now, started_at), fade) {
                self.transition(ShowState::Prompt);
            }
        }
        if let ShowState::FadeInThinking {
            started_at,
            duration,
        } = self.state
        {
            let fade = self.config.behavior.thinking_fade_seconds;
            if self.fades.is_complete(seconds_since(now, started_at), fade) {
                self.transition(ShowState::Thinking {
                    started_at: now,
                    duration,
                });
            }
        }

        if self.state.kind().is_prompt_family() {
            self.idle.advance(now);
            let may_start = self.idle.identity_holding();
            self.waiting_subtitle.update(now, may_start, &mut self.rng);
        }

        TickReport {
            lamp: self.lamp_mode(),
            flash: pressed,
            revealed,
        }
    }

    pub fn lamp_mode(&self) -> LampMode {
        self.state.kind().lamp_mode()
    }

    /// Snapshot of everything on screen at `now`.
    pub fn frame(&self, now: Instant) -> RenderFrame {
        let kind = self.state.kind();
        let motion = self.motion.sample(self.session_seconds(now));
        let behavior = &self.config.behavior;
        let mut frame = RenderFrame {
            state: kind,
            motion,
            screen_alpha: OPAQUE,
            identity_alpha: TRANSPARENT,
            logo_alpha: TRANSPARENT,
            idle_phase: None,
            title: None,
            prompt: None,
            subtitle: None,
            incoming_subtitle: None,
            outcome: None,
            footer: None,
            answer_number: None,
            lamp: kind.lamp_mode(),
        };

        match self.state {
            ShowState::FadeInPrompt { .. } | ShowState::Prompt => {
                if let ShowState::FadeInPrompt { started_at } = self.state {
                    frame.screen_alpha = self
                        .fades
                        .fade_in_alpha(seconds_since(now, started_at), behavior.prompt_fade_seconds);
                }
                let screen = frame.screen_alpha;
                let idle = self.idle.view(now);
                let text_alpha = combine_alpha(idle.text_alpha, screen);
                frame.identity_alpha = combine_alpha(idle.identity_alpha, screen);
                frame.logo_alpha = combine_alpha(idle.logo_alpha, screen);
                frame.idle_phase = Some(self.idle.phase());
                frame.title = Some(TextLayer::new(
                    self.config.text.waiting_screen.title.clone(),
                    text_alpha,
                ));
                frame.prompt = Some(TextLayer::new(self.active_prompt(), text_alpha));
                let subtitle = self.waiting_subtitle.view(now);
                frame.subtitle = Some(TextLayer::new(
                    subtitle.current,
                    combine_alpha(subtitle.current_alpha, text_alpha),
                ));
                frame.incoming_subtitle = subtitle
                    .incoming
                    .map(|(text, alpha)| TextLayer::new(text, combine_alpha(alpha, text_alpha)));
            }
            ShowState::FadeInThinking { .. } | ShowState::Thinking { .. } => {
                if let ShowState::FadeInThinking { started_at, .. } = self.state {
                    frame.screen_alpha = self.fades.fade_in_alpha(
                        seconds_since(now, started_at),
                        behavior.thinking_fade_seconds,
                    );
                }
                frame.title = Some(TextLayer::new(
                    self.config.text.thinking_screen.title.clone(),
                    frame.screen_alpha,
                ));
                frame.subtitle = Some(TextLayer::new(
                    self.thinking_subtitle.clone(),
                    frame.screen_alpha,
                ));
            }
            ShowState::Result { revealed_at } => {
                let alpha = self
                    .fades
                    .fade_in_alpha(seconds_since(now, revealed_at), behavior.result_fade_seconds);
                self.fill_result(&mut frame, alpha);
            }
            ShowState::FadeOut { started_at } => {
                frame.screen_alpha = self.fades.fade_out_alpha(
                    seconds_since(now, started_at),
                    behavior.result_fadeout_seconds,
                );
                let alpha = frame.screen_alpha;
                self.fill_result(&mut frame, alpha);
            }
        }
        frame
    }

    fn fill_result(&self, frame: &mut RenderFrame, alpha: u8) {
        let text = self.outcome_text.as_deref().unwrap_or(EMPTY_POOL_TEXT);
        frame.outcome = Some(TextLayer::new(text, alpha));
        frame.footer = Some(TextLayer::new(
            self.config.text.result_footer.clone(),
            alpha,
        ));
        frame.answer_number = Some(self.shown_count);
    }

    fn active_prompt(&self) -> &str {
        self.config
            .text
            .prompts
            .get(self.prompt_index)
            .map(String::as_str)
            .unwrap_or(self.config.name.as_str())
    }

    fn transition(&mut self, next: ShowState) {
        let from = self.state.kind();
        self.state = next;
        log_debug(&format!(
            "state {} -> {}",
            from.label(),
            next.kind().label()
        ));
    }

    fn enter_fade_in_prompt(&mut self, now: Instant) {
        let t = self.session_seconds(now);
        self.outcome_text = None;
        self.motion.enter_idle(t);
        self.waiting_subtitle.reset(now, &mut self.rng);
        self.idle.reset(now);
        self.transition(ShowState::FadeInPrompt { started_at: now });
    }

    /// Interrupt re-rolls reuse the prompt snapshot taken by the original press.
    fn enter_fade_in_thinking(&mut self, now: Instant) {
        let t = self.session_seconds(now);
        self.outcome_text = None;
        let direction = if self.rng.gen_bool(0.5) {
            SpinDirection::Clockwise
        } else {
            SpinDirection::CounterClockwise
        };
        self.motion.enter_spin(t, direction);
        self.thinking_subtitle = pick_subtitle(
            &self.config.text.thinking_screen.subtitles,
            None,
            &mut self.rng,
        );
        let duration = self.roll_thinking_duration();
        log_debug_content(&format!("thinking for prompt {:?}", self.logged_prompt));
        self.transition(ShowState::FadeInThinking {
            started_at: now,
            duration,
        });
    }

    fn roll_thinking_duration(&mut self) -> Duration {
        let min = self.config.behavior.thinking_min_seconds.max(0.0);
        let max = self.config.behavior.thinking_max_seconds.max(min);
        let seconds = if max > min {
            self.rng.gen_range(min..=max)
        } else {
            min
        };
        Duration::from_secs_f32(seconds)
    }

    fn select_outcome_text(&mut self) -> Option<String> {
        let pool = &self.config.outcomes;
        let last = self.last_outcome_text.as_deref();
        let mut chosen = None;
        for _ in 0..MAX_SELECTION_ATTEMPTS {
            chosen = choose_outcome(pool, last, &mut self.rng);
            match chosen {
                Some(outcome) if Some(outcome.text.as_str()) == last => continue,
                _ => break,
            }
        }
        chosen.map(|outcome| outcome.text.clone())
    }

    fn reveal(&mut self, now: Instant) -> Interaction {
        self.motion.enter_settle(self.session_seconds(now));

        let text = match self.select_outcome_text() {
            Some(text) => {
                self.last_outcome_text = Some(text.clone());
                text
            }
            None => {
                log_debug("outcome pool is empty; showing placeholder");
                tracing::warn!("outcome pool is empty");
                EMPTY_POOL_TEXT.to_string()
            }
        };
        self.outcome_text = Some(text.clone());
        self.shown_count += 1;
        self.last_activity_at = now;

        let interaction = Interaction {
            sequence: self.shown_count,
            outcome: text,
            prompt: self.logged_prompt.clone(),
            timestamp: Utc::now(),
        };
        if let Err(err) = self.sink.append(&interaction) {
            log_debug(&format!("interaction log append failed: {err:#}"));
            tracing::warn!(error = %format!("{err:#}"), "interaction log append failed");
        }
        tracing::info!(
            count = interaction.sequence,
            outcome = %interaction.outcome,
            prompt = %interaction.prompt,
            "answer revealed"
        );
        log_debug_content(&format!(
            "answer #{}: {}",
            interaction.sequence, interaction.outcome
        ));
        self.transition(ShowState::Result { revealed_at: now });
        interaction
    }
}
