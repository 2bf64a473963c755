//! Phase wrapping shared by analysis and resynthesis.
//!
//! Both wraps truncate toward zero and then subtract the next even integer
//! (`q + q % 2`), with `%` keeping the sign of the dividend. That leaves
//! exactly one out-of-range representative, the lower bound, which is folded
//! onto the upper bound so results stay in a half-open interval.

use std::f64::consts::{FRAC_1_PI, PI};

const TWO_PI: f64 = 2.0 * PI;

/// Wraps a phase expressed in half-turns (units of pi) into `(-1, 1]`.
#[inline]
pub fn wrap_half_turns(value: f64) -> f64 {
    let qpd = value as i64;
    let wrapped = value - (qpd + qpd % 2) as f64;
    if wrapped <= -1.0 {
        wrapped + 2.0
    } else {
        wrapped
    }
}

/// Wraps a phase in radians into `(-pi, pi]`.
#[inline]
pub fn wrap_phase(phase: f64) -> f64 {
    let qpd = (phase * FRAC_1_PI) as i64;
    let wrapped = phase - PI * (qpd + qpd % 2) as f64;
    if wrapped <= -PI {
        wrapped + TWO_PI
    } else {
        wrapped
    }
}
