//! Rotating subtitle on the prompt screen with a cross-fade between lines.

use std::time::{Duration, Instant};

use rand::Rng;

use super::fade::{FadeController, OPAQUE};

/// Subtitles never cycle faster than this.
pub const MIN_SUBTITLE_CYCLE_SECONDS: f32 = 2.0;
const MAX_PICK_ATTEMPTS: usize = 5;

/// Subtitle text and alphas for one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleView {
    pub current: String,
    pub current_alpha: u8,
    pub incoming: Option<(String, u8)>,
}

#[derive(Debug, Clone)]
struct PendingSubtitle {
    text: String,
    started_at: Instant,
}

#[derive(Debug, Clone)]
pub struct SubtitleRotator {
    options: Vec<String>,
    current: String,
    pending: Option<PendingSubtitle>,
    last_cycle_at: Instant,
    cycle: Duration,
    fade_seconds: f32,
    fades: FadeController,
}

/// Random option that differs from `avoid` when possible (bounded retries).
pub fn pick_subtitle<R: Rng + ?Sized>(options: &[String], avoid: Option<&str>, rng: &mut R) -> String {
    if options.is_empty() {
        return String::new();
    }
    let mut choice = &options[rng.gen_range(0..options.len())];
    if options.len() > 1 {
        for _ in 0..MAX_PICK_ATTEMPTS {
            if Some(choice.as_str()) != avoid {
                break;
            }
            choice = &options[rng.gen_range(0..options.len())];
        }
    }
    choice.clone()
}

impl SubtitleRotator {
    pub fn new(
        options: Vec<String>,
        cycle_seconds: f32,
        fade_seconds: f32,
        fades: FadeController,
        now: Instant,
    ) -> Self {
        let current = options.first().cloned().unwrap_or_default();
        Self {
            options,
            current,
            pending: None,
            last_cycle_at: now,
            cycle: Duration::from_secs_f32(cycle_seconds.max(MIN_SUBTITLE_CYCLE_SECONDS)),
            fade_seconds: fade_seconds.max(0.0),
            fades,
        }
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    pub fn is_fading(&self) -> bool {
        self.pending.is_some()
    }

    /// Fresh random line, no fade in flight, cycle timer restarted.
    pub fn reset<R: Rng + ?Sized>(&mut self, now: Instant, rng: &mut R) {
        self.current = pick_subtitle(&self.options, None, rng);
        self.pending = None;
        self.last_cycle_at = now;
    }

    /// Finish a cross-fade that has run its course, and start a new one when the
    /// cycle is due and `may_start` allows it.
    pub fn update<R: Rng + ?Sized>(&mut self, now: Instant, may_start: bool, rng: &mut R) {
        if let Some(pending) = &self.pending {
            let elapsed = now.saturating_duration_since(pending.started_at).as_secs_f32();
            if self.fades.is_complete(elapsed, self.fade_seconds) {
                if let Some(done) = self.pending.take() {
                    self.current = done.text;
                }
                self.last_cycle_at = now;
            }
            return;
        }
        if !may_start || self.options.len() < 2 {
            return;
        }
        if now.saturating_duration_since(self.last_cycle_at) < self.cycle {
            return;
        }
        let next = pick_subtitle(&self.options, Some(&self.current), rng);
        if next == self.current {
            self.last_cycle_at = now;
            return;
        }
        self.pending = Some(PendingSubtitle {
            text: next,
            started_at: now,
        });
        if !self.fades.enabled() {
            self.update(now, false, rng);
        }
    }

    pub fn view(&self, now: Instant) -> SubtitleView {
        match &self.pending {
            None => SubtitleView {
                current: self.current.clone(),
                current_alpha: OPAQUE,
                incoming: None,
            },
            Some(pending) => {
                let elapsed = now.saturating_duration_since(pending.started_at).as_secs_f32();
                SubtitleView {
                    current: self.current.clone(),
                    current_alpha: self.fades.fade_out_alpha(elapsed, self.fade_seconds),
                    incoming: Some((
                        pending.text.clone(),
                        self.fades.fade_in_alpha(elapsed, self.fade_seconds),
                    )),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn options() -> Vec<String> {
        vec!["Press button".into(), "Ask a question".into(), "Go on...".into()]
    }

    fn secs(value: f32) -> Duration {
        Duration::from_secs_f32(value)
    }

    #[test]
    fn cycles_to_a_different_line_after_the_period() {
        let start = Instant::now();
        let mut rng = StdRng::seed_from_u64(9);
        let mut rotator = SubtitleRotator::new(options(), 6.0, 0.5, FadeController::new(true), start);
        let first = rotator.current().to_string();
        rotator.update(start + secs(5.9), true, &mut rng);
        assert!(!rotator.is_fading());
        rotator.update(start + secs(6.0), true, &mut rng);
        assert!(rotator.is_fading());
        let mid = rotator.view(start + secs(6.25));
        let (incoming, incoming_alpha) = mid.incoming.expect("incoming line");
        assert_ne!(incoming, first);
        assert!(incoming_alpha > 0 && mid.current_alpha < OPAQUE);
        rotator.update(start + secs(6.5), true, &mut rng);
        assert!(!rotator.is_fading());
        assert_eq!(rotator.current(), incoming);
    }

    #[test]
    fn cycle_period_is_clamped() {
        let start = Instant::now();
        let mut rng = StdRng::seed_from_u64(1);
        let mut rotator = SubtitleRotator::new(options(), 0.1, 0.5, FadeController::new(true), start);
        rotator.update(start + secs(1.0), true, &mut rng);
        assert!(!rotator.is_fading());
        rotator.update(start + secs(2.0), true, &mut rng);
        assert!(rotator.is_fading());
    }

    #[test]
    fn single_option_never_cycles() {
        let start = Instant::now();
        let mut rng = StdRng::seed_from_u64(2);
        let mut rotator = SubtitleRotator::new(
            vec!["Only".into()],
            2.0,
            0.5,
            FadeController::new(true),
            start,
        );
        rotator.update(start + secs(60.0), true, &mut rng);
        assert!(!rotator.is_fading());
        assert_eq!(rotator.current(), "Only");
    }

    #[test]
    fn gated_cycles_wait_but_running_fades_finish() {
        let start = Instant::now();
        let mut rng = StdRng::seed_from_u64(3);
        let mut rotator = SubtitleRotator::new(options(), 2.0, 0.5, FadeController::new(true), start);
        rotator.update(start + secs(3.0), false, &mut rng);
        assert!(!rotator.is_fading());
        rotator.update(start + secs(3.0), true, &mut rng);
        assert!(rotator.is_fading());
        rotator.update(start + secs(3.6), false, &mut rng);
        assert!(!rotator.is_fading());
    }

    #[test]
    fn disabled_fades_swap_immediately() {
        let start = Instant::now();
        let mut rng = StdRng::seed_from_u64(4);
        let mut rotator = SubtitleRotator::new(options(), 2.0, 0.5, FadeController::new(false), start);
        let first = rotator.current().to_string();
        rotator.update(start + secs(2.0), true, &mut rng);
        assert!(!rotator.is_fading());
        assert_ne!(rotator.current(), first);
    }

    #[test]
    fn pick_avoids_the_current_line() {
        let mut rng = StdRng::seed_from_u64(5);
        let options = options();
        let repeats = (0..500)
            .filter(|_| pick_subtitle(&options, Some("Press button"), &mut rng) == "Press button")
            .count();
        // Retries are bounded, so a rare repeat is allowed.
        assert!(repeats < 5, "repeats {repeats}");
    }
}
