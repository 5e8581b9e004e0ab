//! Trajectory helpers for projectile motion.

use std::f32::consts::{PI, TAU};

use glam::Vec2;

/// Height of a parabolic arc at flight fraction `t`.
///
/// `height(t) = 4 * max_height * t * (1 - t)`: zero at launch (`t = 0`) and at
/// impact (`t = 1`), `max_height` at the midpoint. `t` is clamped to `[0, 1]`.
#[must_use]
pub fn parabolic_height(t: f32, max_height: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    4.0 * max_height * t * (1.0 - t)
}

/// Wrap an angle into `(-PI, PI]`.
#[must_use]
pub fn wrap_angle(angle: f32) -> f32 {
    let mut a = angle.rem_euclid(TAU);
    if a > PI {
        a -= TAU;
    }
    a
}

/// Heading of a vector in radians, measured from +x.
#[must_use]
pub fn heading(v: Vec2) -> f32 {
    v.y.atan2(v.x)
}

/// Rotate `velocity` toward `desired` by at most `max_turn` radians,
/// preserving its magnitude.
///
/// A zero `desired` direction leaves the velocity unchanged.
#[must_use]
pub fn steer_towards(velocity: Vec2, desired: Vec2, max_turn: f32) -> Vec2 {
    if desired == Vec2::ZERO {
        return velocity;
    }
    let speed = velocity.length();
    let current = heading(velocity);
    let delta = wrap_angle(heading(desired) - current);
    let turn = delta.clamp(-max_turn, max_turn);
    Vec2::from_angle(current + turn) * speed
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    #[test]
    fn test_parabolic_height_endpoints_and_peak() {
        // Fractions of a 2 second flight sampled at 0s, 1s and 2s.
        let total = 2.0;
        for (elapsed, expected) in [(0.0, 0.0), (1.0, 100.0), (2.0, 0.0)] {
            let h = parabolic_height(elapsed / total, 100.0);
            assert!((h - expected).abs() < EPS, "t={elapsed}: {h}");
        }
    }

    #[test]
    fn test_parabolic_height_clamps_outside_flight() {
        assert!(parabolic_height(1.5, 100.0).abs() < EPS);
        assert!(parabolic_height(-0.5, 100.0).abs() < EPS);
    }

    #[test]
    fn test_wrap_angle() {
        assert!((wrap_angle(3.0 * PI / 2.0) + PI / 2.0).abs() < EPS);
        assert!((wrap_angle(-3.0 * PI / 2.0) - PI / 2.0).abs() < EPS);
        assert!((wrap_angle(0.25) - 0.25).abs() < EPS);
    }

    #[test]
    fn test_steer_is_clamped_and_preserves_speed() {
        let v = Vec2::new(10.0, 0.0);
        let steered = steer_towards(v, Vec2::new(0.0, 1.0), 0.1);
        assert!((steered.length() - 10.0).abs() < EPS);
        assert!((heading(steered) - 0.1).abs() < EPS);
    }

    #[test]
    fn test_steer_takes_short_way_round() {
        // From just below -x to just above -x is a tiny turn through PI.
        let v = Vec2::from_angle(PI - 0.05) * 5.0;
        let steered = steer_towards(v, Vec2::from_angle(-PI + 0.05), 1.0);
        assert!((wrap_angle(heading(steered)) - wrap_angle(-PI + 0.05)).abs() < EPS);
    }

    #[test]
    fn test_steer_zero_desired_is_noop() {
        let v = Vec2::new(1.0, 2.0);
        assert_eq!(steer_towards(v, Vec2::ZERO, 1.0), v);
    }
}
