//! Wheel and ball angular simulation.
//!
//! The wheel decelerates to rest on its own. The ball keeps a constant angular
//! velocity in the opposite direction and is only stopped once the wheel is at
//! rest and the ball lines up with the lucky number's slot.

use std::f64::consts::{PI, TAU};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::TableError;
use crate::layout::MAX_NUMBER;

/// Pocket order around a single-zero wheel, clockwise from zero.
pub const WHEEL_ORDER: [u8; 37] = [
    0, 32, 15, 19, 4, 21, 2, 25, 17, 34, 6, 27, 13, 36, 11, 30, 8, 23, 10, 5, 24, 16, 33, 1, 20,
    14, 31, 9, 22, 18, 29, 7, 28, 12, 35, 3, 26,
];

/// Angle subtended by one pocket.
pub const SLOT_ANGLE: f64 = TAU / WHEEL_ORDER.len() as f64;

/// Position of `number` on the wheel.
pub fn slot_index(number: u8) -> Option<usize> {
    WHEEL_ORDER.iter().position(|n| *n == number)
}

/// Angle of `number`'s pocket relative to the wheel's zero pocket.
pub fn slot_angle(number: u8) -> Option<f64> {
    slot_index(number).map(|idx| idx as f64 * SLOT_ANGLE)
}

/// Shortest distance between two angles, in `[0, PI]`.
fn circular_distance(a: f64, b: f64) -> f64 {
    let d = (a - b).rem_euclid(TAU);
    d.min(TAU - d)
}

/// Signed shortest rotation taking `from` onto `to`, in `(-PI, PI]`.
fn signed_delta(from: f64, to: f64) -> f64 {
    let d = (to - from).rem_euclid(TAU);
    if d > PI {
        d - TAU
    } else {
        d
    }
}

/// Velocities armed at the start of every spin.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpinProfile {
    /// Initial wheel angular velocity (rad/s, positive).
    pub wheel_velocity: f64,
    /// Wheel angular acceleration (rad/s², negative).
    pub wheel_deceleration: f64,
    /// Constant ball angular velocity (rad/s, non-zero).
    pub ball_velocity: f64,
    /// Ball stops once within this many radians of its target.
    pub settle_threshold: f64,
}

impl Default for SpinProfile {
    fn default() -> Self {
        Self {
            wheel_velocity: 1.0,
            wheel_deceleration: -0.03,
            ball_velocity: -0.3,
            settle_threshold: 0.1,
        }
    }
}

impl SpinProfile {
    pub fn validate(&self) -> Result<(), TableError> {
        let invalid = |field, reason: &str| TableError::InvalidConfig {
            field,
            reason: reason.to_string(),
        };
        if !(self.wheel_velocity.is_finite() && self.wheel_velocity > 0.0) {
            return Err(invalid("wheel.wheel_velocity", "must be finite and > 0"));
        }
        if !(self.wheel_deceleration.is_finite() && self.wheel_deceleration < 0.0) {
            return Err(invalid("wheel.wheel_deceleration", "must be finite and < 0"));
        }
        if !(self.ball_velocity.is_finite() && self.ball_velocity != 0.0) {
            return Err(invalid("wheel.ball_velocity", "must be finite and non-zero"));
        }
        if !(self.settle_threshold.is_finite() && self.settle_threshold > 0.0) {
            return Err(invalid("wheel.settle_threshold", "must be finite and > 0"));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WheelPhase {
    Hidden,
    Spinning,
    Settled,
}

#[derive(Clone, Debug)]
pub struct WheelState {
    profile: SpinProfile,
    wheel_angle: f64,
    wheel_velocity: f64,
    wheel_deceleration: f64,
    ball_angle: f64,
    ball_velocity: f64,
    lucky_number: u8,
    visible: bool,
}

impl WheelState {
    pub fn new(profile: SpinProfile) -> Self {
        Self {
            profile,
            wheel_angle: 0.0,
            wheel_velocity: 0.0,
            wheel_deceleration: profile.wheel_deceleration,
            ball_angle: 0.0,
            ball_velocity: 0.0,
            lucky_number: 0,
            visible: false,
        }
    }

    pub fn phase(&self) -> WheelPhase {
        if !self.visible {
            WheelPhase::Hidden
        } else if self.ball_velocity == 0.0 {
            WheelPhase::Settled
        } else {
            WheelPhase::Spinning
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn wheel_angle(&self) -> f64 {
        self.wheel_angle
    }

    pub fn wheel_velocity(&self) -> f64 {
        self.wheel_velocity
    }

    pub fn wheel_deceleration(&self) -> f64 {
        self.wheel_deceleration
    }

    pub fn ball_angle(&self) -> f64 {
        self.ball_angle
    }

    pub fn ball_velocity(&self) -> f64 {
        self.ball_velocity
    }

    pub fn lucky_number(&self) -> u8 {
        self.lucky_number
    }

    /// Re-arm velocities, reset both angles and show the wheel.
    pub fn start_spin(&mut self, lucky_number: u8) -> Result<(), TableError> {
        if lucky_number > MAX_NUMBER {
            warn!(lucky_number, "rejected lucky number");
            return Err(TableError::InvalidLuckyNumber {
                got: lucky_number,
                max: MAX_NUMBER,
            });
        }
        self.wheel_angle = 0.0;
        self.wheel_velocity = self.profile.wheel_velocity;
        self.wheel_deceleration = self.profile.wheel_deceleration;
        self.ball_angle = 0.0;
        self.ball_velocity = self.profile.ball_velocity;
        self.lucky_number = lucky_number;
        self.visible = true;
        info!(lucky_number, "spin started");
        Ok(())
    }

    /// Where the ball has to stop: the lucky pocket carried round by the
    /// wheel, normalised to `[0, TAU)`.
    pub fn target_angle(&self) -> f64 {
        let slot = slot_angle(self.lucky_number).unwrap_or(0.0);
        (self.wheel_angle + slot).rem_euclid(TAU)
    }

    /// Advance the simulation by `dt` seconds. Returns true on the frame the
    /// ball settles.
    pub fn advance(&mut self, dt: f64) -> bool {
        if !self.visible || !(dt.is_finite() && dt > 0.0) {
            return false;
        }

        if self.wheel_velocity > 0.0 {
            let next = self.wheel_velocity + self.wheel_deceleration * dt;
            if next > 0.0 {
                self.wheel_angle += self.wheel_velocity * dt + 0.5 * self.wheel_deceleration * dt * dt;
                self.wheel_velocity = next;
            } else {
                // Integrate only up to the instant the wheel stops.
                let stop = self.wheel_velocity / -self.wheel_deceleration;
                self.wheel_angle +=
                    self.wheel_velocity * stop + 0.5 * self.wheel_deceleration * stop * stop;
                self.wheel_velocity = 0.0;
                debug!(wheel_angle = self.wheel_angle, "wheel stopped");
            }
        }

        if self.ball_velocity == 0.0 {
            return false;
        }

        let step = self.ball_velocity * dt;
        if self.wheel_velocity == 0.0 && self.lands_within(step) {
            let target = self.target_angle();
            self.ball_angle += signed_delta(self.ball_angle.rem_euclid(TAU), target);
            self.ball_velocity = 0.0;
            info!(
                lucky_number = self.lucky_number,
                ball_angle = self.ball_angle,
                "ball settled"
            );
            return true;
        }
        self.ball_angle += step;
        false
    }

    /// Whether the ball is already inside the settle window, or passes through
    /// the target during the coming `step`.
    fn lands_within(&self, step: f64) -> bool {
        let ball = self.ball_angle.rem_euclid(TAU);
        let target = self.target_angle();
        if circular_distance(ball, target) < self.profile.settle_threshold {
            return true;
        }
        let ahead = if step >= 0.0 {
            (target - ball).rem_euclid(TAU)
        } else {
            (ball - target).rem_euclid(TAU)
        };
        ahead <= step.abs()
    }

    /// Hide the wheel on a pointer press once the ball has settled.
    pub fn dismiss(&mut self, pressed: bool) -> bool {
        if self.phase() == WheelPhase::Settled && pressed {
            self.visible = false;
            info!(lucky_number = self.lucky_number, "wheel dismissed");
            return true;
        }
        false
    }
}
