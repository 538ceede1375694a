//! Conversion between parameter conventions.
//!
//! PennyLane and Qiskit express rotation angles in radians, while pytket
//! uses half-turns (multiples of π).

use std::f64::consts::PI;

/// Converts an angle in radians to half-turns.
#[inline]
pub fn radians_to_half_turns(p: f64) -> f64 {
    p / PI
}

/// Converts an angle in half-turns to radians.
#[inline]
pub fn half_turns_to_radians(p: f64) -> f64 {
    p * PI
}
