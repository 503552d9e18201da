//! Idle screen cycle: identity, black, logo, black, and back to identity.
//!
//! Each scene holds for a while and then runs a one-second fade into the next
//! scene. Prompt and subtitle text ride on the identity alpha so the whole screen
//! dims together.

use std::time::{Duration, Instant};

use super::fade::{FadeController, OPAQUE, TRANSPARENT};

/// Shortest allowed identity hold.
pub const MIN_TITLE_CYCLE_SECONDS: f32 = 10.0;
pub const IDLE_FADE_SECONDS: f32 = 1.0;
pub const BLACK_HOLD_SECONDS: f32 = 0.2;
pub const LOGO_HOLD_SECONDS: f32 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdleScene {
    Identity,
    BlackBeforeLogo,
    Logo,
    BlackBeforeIdentity,
}

impl IdleScene {
    fn next(self) -> Self {
        match self {
            Self::Identity => Self::BlackBeforeLogo,
            Self::BlackBeforeLogo => Self::Logo,
            Self::Logo => Self::BlackBeforeIdentity,
            Self::BlackBeforeIdentity => Self::Identity,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdleStep {
    Hold,
    Fading,
}

/// Alphas the renderer needs for the idle screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdleView {
    pub identity_alpha: u8,
    pub logo_alpha: u8,
    pub text_alpha: u8,
}

#[derive(Debug, Clone)]
pub struct IdleSequencer {
    scene: IdleScene,
    step: IdleStep,
    step_started_at: Instant,
    title_hold: f32,
    fades: FadeController,
}

impl IdleSequencer {
    pub fn new(title_cycle_seconds: f32, fades: FadeController, now: Instant) -> Self {
        Self {
            scene: IdleScene::Identity,
            step: IdleStep::Hold,
            step_started_at: now,
            title_hold: title_cycle_seconds.max(MIN_TITLE_CYCLE_SECONDS),
            fades,
        }
    }

    pub fn scene(&self) -> IdleScene {
        self.scene
    }

    pub fn step(&self) -> IdleStep {
        self.step
    }

    /// Position on the classic eight-phase ring (0 = identity hold).
    pub fn phase(&self) -> u8 {
        match (self.scene, self.step) {
            (IdleScene::Identity, IdleStep::Hold) => 0,
            (IdleScene::Identity, IdleStep::Fading) => 1,
            (IdleScene::BlackBeforeLogo, IdleStep::Hold) => 2,
            (IdleScene::BlackBeforeLogo, IdleStep::Fading) => 3,
            (IdleScene::Logo, IdleStep::Hold) => 4,
            (IdleScene::Logo, IdleStep::Fading) => 5,
            (IdleScene::BlackBeforeIdentity, IdleStep::Hold) => 6,
            (IdleScene::BlackBeforeIdentity, IdleStep::Fading) => 7,
        }
    }

    /// True while the identity (and its text) is on screen without fading.
    pub fn identity_holding(&self) -> bool {
        self.scene == IdleScene::Identity && self.step == IdleStep::Hold
    }

    pub fn reset(&mut self, now: Instant) {
        self.scene = IdleScene::Identity;
        self.step = IdleStep::Hold;
        self.step_started_at = now;
    }

    /// Advance through as many steps as have elapsed by `now`.
    pub fn advance(&mut self, now: Instant) {
        loop {
            let limit = match self.step {
                IdleStep::Hold => self.hold_seconds(),
                IdleStep::Fading => self.fade_seconds(),
            };
            let elapsed = now.saturating_duration_since(self.step_started_at);
            let limit = Duration::from_secs_f32(limit);
            if elapsed < limit {
                return;
            }
            self.step_started_at += limit;
            match self.step {
                IdleStep::Hold => self.step = IdleStep::Fading,
                IdleStep::Fading => {
                    self.scene = self.scene.next();
                    self.step = IdleStep::Hold;
                }
            }
        }
    }

    pub fn view(&self, now: Instant) -> IdleView {
        let elapsed = now
            .saturating_duration_since(self.step_started_at)
            .as_secs_f32();
        let fade_in = self.fades.fade_in_alpha(elapsed, self.fade_seconds());
        let fade_out = self.fades.fade_out_alpha(elapsed, self.fade_seconds());
        let (identity_alpha, logo_alpha) = match (self.scene, self.step) {
            (IdleScene::Identity, IdleStep::Hold) => (OPAQUE, TRANSPARENT),
            (IdleScene::Identity, IdleStep::Fading) => (fade_out, TRANSPARENT),
            (IdleScene::BlackBeforeLogo, IdleStep::Hold) => (TRANSPARENT, TRANSPARENT),
            (IdleScene::BlackBeforeLogo, IdleStep::Fading) => (TRANSPARENT, fade_in),
            (IdleScene::Logo, IdleStep::Hold) => (TRANSPARENT, OPAQUE),
            (IdleScene::Logo, IdleStep::Fading) => (TRANSPARENT, fade_out),
            (IdleScene::BlackBeforeIdentity, IdleStep::Hold) => (TRANSPARENT, TRANSPARENT),
            (IdleScene::BlackBeforeIdentity, IdleStep::Fading) => (fade_in, TRANSPARENT),
        };
        IdleView {
            identity_alpha,
            logo_alpha,
            text_alpha: identity_alpha,
        }
    }

    fn hold_seconds(&self) -> f32 {
        match self.scene {
            IdleScene::Identity => self.title_hold,
            IdleScene::BlackBeforeLogo | IdleScene::BlackBeforeIdentity => BLACK_HOLD_SECONDS,
            IdleScene::Logo => LOGO_HOLD_SECONDS,
        }
    }

    fn fade_seconds(&self) -> f32 {
        if self.fades.enabled() {
            IDLE_FADE_SECONDS
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(value: f32) -> Duration {
        Duration::from_secs_f32(value)
    }

    #[test]
    fn title_hold_is_clamped() {
        let start = Instant::now();
        let mut seq = IdleSequencer::new(2.0, FadeController::new(true), start);
        seq.advance(start + secs(9.9));
        assert_eq!(seq.phase(), 0);
        seq.advance(start + secs(10.0));
        assert_eq!(seq.phase(), 1);
    }

    #[test]
    fn walks_the_full_ring() {
        let start = Instant::now();
        let mut seq = IdleSequencer::new(10.0, FadeController::new(true), start);
        let mut t = 0.0f32;
        let steps = [
            (10.0, 1),
            (1.0, 2),
            (0.2, 3),
            (1.0, 4),
            (5.0, 5),
            (1.0, 6),
            (0.2, 7),
            (1.0, 0),
        ];
        for (delta, expected) in steps {
            t += delta;
            seq.advance(start + secs(t + 0.001));
            assert_eq!(seq.phase(), expected, "at t={t}");
        }
    }

    #[test]
    fn large_gap_catches_up_in_one_call() {
        let start = Instant::now();
        let mut seq = IdleSequencer::new(10.0, FadeController::new(true), start);
        seq.advance(start + secs(15.0));
        assert_eq!(seq.scene(), IdleScene::Logo);
        assert_eq!(seq.step(), IdleStep::Hold);
    }

    #[test]
    fn text_follows_identity_alpha() {
        let start = Instant::now();
        let mut seq = IdleSequencer::new(10.0, FadeController::new(true), start);
        assert_eq!(seq.view(start).text_alpha, OPAQUE);
        let mid_fade = start + secs(10.5);
        seq.advance(mid_fade);
        let view = seq.view(mid_fade);
        assert!(view.identity_alpha > TRANSPARENT && view.identity_alpha < OPAQUE);
        assert_eq!(view.text_alpha, view.identity_alpha);
        assert_eq!(view.logo_alpha, TRANSPARENT);
    }

    #[test]
    fn logo_is_visible_only_in_logo_scenes() {
        let start = Instant::now();
        let mut seq = IdleSequencer::new(10.0, FadeController::new(true), start);
        let logo_hold = start + secs(13.0);
        seq.advance(logo_hold);
        let view = seq.view(logo_hold);
        assert_eq!(view.logo_alpha, OPAQUE);
        assert_eq!(view.identity_alpha, TRANSPARENT);
        assert_eq!(view.text_alpha, TRANSPARENT);
    }

    #[test]
    fn reset_returns_to_identity_hold() {
        let start = Instant::now();
        let mut seq = IdleSequencer::new(10.0, FadeController::new(true), start);
        seq.advance(start + secs(14.0));
        seq.reset(start + secs(14.0));
        assert!(seq.identity_holding());
        assert_eq!(seq.view(start + secs(14.0)).identity_alpha, OPAQUE);
    }

    #[test]
    fn disabled_fades_skip_fade_steps() {
        let start = Instant::now();
        let mut seq = IdleSequencer::new(10.0, FadeController::new(false), start);
        seq.advance(start + secs(10.1));
        assert_eq!(seq.scene(), IdleScene::BlackBeforeLogo);
        seq.advance(start + secs(10.3));
        assert_eq!(seq.scene(), IdleScene::Logo);
    }
}
