//! Rotation of the emblem: idle drift, thinking spin, and friction settle.
//!
//! Every regime change captures the current angle and folds it into an additive
//! offset, so the angle never jumps at a state boundary.

/// Thinking spin runs this many times faster than the idle drift.
pub const THINKING_SPEED_MULTIPLIER: f64 = 8.0;

/// Friction constant for the settle regime (per second).
pub const SETTLE_DECAY_RATE: f64 = 2.0;

/// Settle intensity below this is reported as fully at rest.
pub const SETTLE_EPSILON: f64 = 0.01;

/// Spin direction for a thinking cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinDirection {
    Clockwise,
    CounterClockwise,
}

impl SpinDirection {
    pub fn sign(self) -> f64 {
        match self {
            Self::Clockwise => 1.0,
            Self::CounterClockwise => -1.0,
        }
    }
}

/// Angle (radians) and motion intensity (0..=1) for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionSample {
    pub angle: f64,
    pub intensity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MotionRegime {
    Idle {
        offset: f64,
    },
    Spin {
        offset: f64,
        direction: SpinDirection,
    },
    Settle {
        started_at: f64,
        angle_start: f64,
        initial_velocity: f64,
    },
}

#[derive(Debug, Clone)]
pub struct MotionModel {
    base_speed: f64,
    decay_rate: f64,
    settle_seconds: f64,
    regime: MotionRegime,
}

impl MotionModel {
    pub fn new(base_speed: f64, settle_seconds: f64) -> Self {
        Self {
            base_speed,
            decay_rate: SETTLE_DECAY_RATE,
            settle_seconds: settle_seconds.max(0.0),
            regime: MotionRegime::Idle { offset: 0.0 },
        }
    }

    pub fn regime(&self) -> MotionRegime {
        self.regime
    }

    /// Sample the emblem at `t` seconds since the session epoch.
    pub fn sample(&self, t: f64) -> MotionSample {
        match self.regime {
            MotionRegime::Idle { offset } => MotionSample {
                angle: t * self.base_speed + offset,
                intensity: 1.0,
            },
            MotionRegime::Spin { offset, direction } => MotionSample {
                angle: t * self.spin_velocity(direction) + offset,
                intensity: 1.0,
            },
            MotionRegime::Settle {
                started_at,
                angle_start,
                initial_velocity,
            } => {
                let dt = (t - started_at).max(0.0);
                let decay = (-self.decay_rate * dt).exp();
                let angle = angle_start + (initial_velocity / self.decay_rate) * (1.0 - decay);
                let mut intensity = if initial_velocity == 0.0 {
                    0.0
                } else {
                    (initial_velocity * decay).abs() / initial_velocity.abs()
                };
                if intensity < SETTLE_EPSILON || dt >= self.settle_seconds {
                    intensity = 0.0;
                }
                MotionSample { angle, intensity }
            }
        }
    }

    /// Angular velocity (radians per second) at `t`.
    pub fn velocity(&self, t: f64) -> f64 {
        match self.regime {
            MotionRegime::Idle { .. } => self.base_speed,
            MotionRegime::Spin { direction, .. } => self.spin_velocity(direction),
            MotionRegime::Settle {
                started_at,
                initial_velocity,
                ..
            } => {
                let dt = (t - started_at).max(0.0);
                initial_velocity * (-self.decay_rate * dt).exp()
            }
        }
    }

    pub fn enter_idle(&mut self, t: f64) {
        let angle = self.sample(t).angle;
        self.regime = MotionRegime::Idle {
            offset: angle - t * self.base_speed,
        };
    }

    pub fn enter_spin(&mut self, t: f64, direction: SpinDirection) {
        let angle = self.sample(t).angle;
        self.regime = MotionRegime::Spin {
            offset: angle - t * self.spin_velocity(direction),
            direction,
        };
    }

    /// Snapshot angle and velocity at `t` and start decaying from there.
    pub fn enter_settle(&mut self, t: f64) {
        let angle_start = self.sample(t).angle;
        let initial_velocity = self.velocity(t);
        self.regime = MotionRegime::Settle {
            started_at: t,
            angle_start,
            initial_velocity,
        };
    }

    fn spin_velocity(&self, direction: SpinDirection) -> f64 {
        self.base_speed * THINKING_SPEED_MULTIPLIER * direction.sign()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    fn model() -> MotionModel {
        MotionModel::new(0.4, 2.5)
    }

    #[test]
    fn idle_angle_tracks_base_speed() {
        let motion = model();
        let sample = motion.sample(10.0);
        assert!((sample.angle - 4.0).abs() < TOLERANCE);
        assert_eq!(sample.intensity, 1.0);
    }

    #[test]
    fn spin_runs_eight_times_faster_in_either_direction() {
        let mut motion = model();
        motion.enter_spin(0.0, SpinDirection::CounterClockwise);
        assert!((motion.sample(1.0).angle + 3.2).abs() < TOLERANCE);
        motion.enter_spin(1.0, SpinDirection::Clockwise);
        let before = motion.sample(1.0).angle;
        assert!((motion.sample(2.0).angle - before - 3.2).abs() < TOLERANCE);
    }

    fn assert_continuous(motion: &mut MotionModel, t: f64, change: impl FnOnce(&mut MotionModel)) {
        let before = motion.sample(t).angle;
        change(motion);
        let after = motion.sample(t).angle;
        assert!(
            (before - after).abs() < TOLERANCE,
            "jump at t={t}: {before} -> {after}"
        );
    }

    #[test]
    fn angle_is_continuous_across_every_regime_change() {
        let mut motion = model();
        assert_continuous(&mut motion, 3.7, |m| m.enter_spin(3.7, SpinDirection::Clockwise));
        assert_continuous(&mut motion, 6.1, |m| m.enter_settle(6.1));
        assert_continuous(&mut motion, 6.9, |m| {
            m.enter_spin(6.9, SpinDirection::CounterClockwise)
        });
        assert_continuous(&mut motion, 13.25, |m| m.enter_settle(13.25));
        assert_continuous(&mut motion, 14.0, |m| m.enter_idle(14.0));
    }

    #[test]
    fn settle_captures_spin_velocity() {
        let mut motion = model();
        motion.enter_spin(1.0, SpinDirection::CounterClockwise);
        motion.enter_settle(2.0);
        match motion.regime() {
            MotionRegime::Settle {
                initial_velocity, ..
            } => assert!((initial_velocity + 3.2).abs() < TOLERANCE),
            other => panic!("unexpected regime {other:?}"),
        }
    }

    #[test]
    fn settle_intensity_never_increases_and_reaches_zero() {
        let mut motion = model();
        motion.enter_spin(0.0, SpinDirection::Clockwise);
        motion.enter_settle(1.0);
        let mut previous = f64::INFINITY;
        for step in 0..=300 {
            let t = 1.0 + step as f64 * 0.01;
            let intensity = motion.sample(t).intensity;
            assert!(intensity <= previous, "intensity rose at t={t}");
            assert!((0.0..=1.0).contains(&intensity));
            previous = intensity;
        }
        assert_eq!(motion.sample(1.0 + 2.5).intensity, 0.0);
    }

    #[test]
    fn settle_angle_approaches_rest_position() {
        let mut motion = model();
        motion.enter_spin(0.0, SpinDirection::Clockwise);
        motion.enter_settle(0.0);
        let rest = 3.2 / SETTLE_DECAY_RATE;
        assert!((motion.sample(30.0).angle - rest).abs() < 1e-6);
        assert!(motion.sample(1.0).angle < rest);
    }

    #[test]
    fn settle_from_rest_reports_zero_intensity() {
        let mut motion = MotionModel::new(0.0, 2.0);
        motion.enter_settle(0.0);
        assert_eq!(motion.sample(0.0).intensity, 0.0);
    }
}
