//! Magnitude/phase view of complex phasors.

use num_complex::Complex64;
use serde::Serialize;
use std::f64::consts::PI;

/// Split `z` into `(magnitude, phase in degrees)`.
///
/// A phase of exactly ±180° is folded to 0° with a negated magnitude, so a
/// negative real number reads as `-5∠0°` rather than `5∠180°`. Non-finite
/// input is not guarded and yields non-finite output.
pub fn decompose(z: Complex64) -> (f64, f64) {
    let magnitude = z.norm();
    let phase = z.im.atan2(z.re);
    if phase == PI || phase == -PI {
        return (-magnitude, 0.0);
    }
    (magnitude, phase.to_degrees())
}

/// Serializable polar form of a phasor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Phasor {
    pub magnitude: f64,
    pub phase_deg: f64,
}

impl From<Complex64> for Phasor {
    fn from(z: Complex64) -> Self {
        let (magnitude, phase_deg) = decompose(z);
        Self {
            magnitude,
            phase_deg,
        }
    }
}
