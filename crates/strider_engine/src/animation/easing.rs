//! Easing functions for tweens
//!
//! Every curve satisfies `f(0) = 0` and `f(1) = 1`; inputs are expected to
//! be pre-clamped to [0, 1].

use std::f32::consts::PI;

/// Easing curve selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    /// Constant-rate interpolation
    #[default]
    Linear,
    /// Accelerating from zero velocity
    QuadIn,
    /// Decelerating to zero velocity
    QuadOut,
    /// Acceleration until halfway, then deceleration
    QuadInOut,
    /// Bouncing settle at the end
    BounceOut,
    /// Bouncing wind-up at the start
    BounceIn,
    /// Overshooting oscillation at the end
    ElasticOut,
    /// Overshooting oscillation at the start
    ElasticIn,
}

impl Easing {
    /// Map a progress value through this curve
    ///
    /// Endpoints are exact for every curve: `apply(0) == 0` and
    /// `apply(1) == 1` with no floating-point residue.
    pub fn apply(self, t: f32) -> f32 {
        if t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }
        match self {
            Easing::Linear => t,
            Easing::QuadIn => t * t,
            Easing::QuadOut => t * (2.0 - t),
            Easing::QuadInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
            Easing::BounceOut => bounce_out(t),
            Easing::BounceIn => 1.0 - bounce_out(1.0 - t),
            Easing::ElasticOut => elastic_out(t),
            Easing::ElasticIn => 1.0 - elastic_out(1.0 - t),
        }
    }
}

/// Piecewise parabolic bounce (the classic four-segment curve)
fn bounce_out(t: f32) -> f32 {
    const N: f32 = 7.5625;
    const D: f32 = 2.75;

    if t < 1.0 / D {
        N * t * t
    } else if t < 2.0 / D {
        let t = t - 1.5 / D;
        N * t * t + 0.75
    } else if t < 2.5 / D {
        let t = t - 2.25 / D;
        N * t * t + 0.9375
    } else {
        let t = t - 2.625 / D;
        N * t * t + 0.984375
    }
}

/// Exponentially damped sine settling on 1.0; callers pre-guard t in (0, 1)
fn elastic_out(t: f32) -> f32 {
    const PERIOD: f32 = 2.0 * PI / 3.0;
    (2.0f32).powf(-10.0 * t) * ((t * 10.0 - 0.75) * PERIOD).sin() + 1.0
}
