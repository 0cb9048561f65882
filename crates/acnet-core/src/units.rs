//! Engineering units for circuit quantities.
//!
//! Two concerns live here:
//!
//! - Newtype wrappers (`Ohms`, `Farads`, `Henries`, `Hertz`, ...) so element
//!   parameters cannot be swapped by accident. They are `#[repr(transparent)]`
//!   and cost nothing at runtime.
//! - [`UnitTable`], which picks a human-friendly engineering unit for a value
//!   given in its base unit (`0.001 V` becomes `1.00 mV`).
//!
//! # Usage
//!
//! ```
//! use acnet_core::units::{UnitTable, Ohms, VOLTAGE};
//!
//! let (scaled, unit) = VOLTAGE.scale(1500.0);
//! assert!((scaled - 1.5).abs() < 1e-12);
//! assert_eq!(unit, "kV");
//!
//! let r = Ohms(100.0) + Ohms(20.0);
//! assert_eq!(r.value(), 120.0);
//! ```

use crate::error::{CircuitError, CircuitResult};
use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Neg, Sub};

/// Macro to implement common arithmetic operations for unit types
macro_rules! impl_unit_ops {
    ($type:ty, $unit_name:literal) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Neg for $type {
            type Output = Self;
            fn neg(self) -> Self::Output {
                Self(-self.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl std::fmt::Display for $type {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{} {}", self.0, $unit_name)
            }
        }

        impl $type {
            /// Create a new value
            #[inline]
            pub const fn new(value: f64) -> Self {
                Self(value)
            }

            /// Get the raw numeric value
            #[inline]
            pub const fn value(self) -> f64 {
                self.0
            }

            /// Check if value is finite
            #[inline]
            pub fn is_finite(self) -> bool {
                self.0.is_finite()
            }
        }
    };
}

// =============================================================================
// Element parameters
// =============================================================================

/// Resistance in ohms
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Ohms(pub f64);

impl_unit_ops!(Ohms, "Ω");

/// Capacitance in farads
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Farads(pub f64);

impl_unit_ops!(Farads, "F");

/// Inductance in henries
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Henries(pub f64);

impl_unit_ops!(Henries, "H");

// =============================================================================
// Frequency
// =============================================================================

/// Frequency in hertz
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Hertz(pub f64);

impl_unit_ops!(Hertz, "Hz");

/// Angular frequency in radians per second
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct RadiansPerSecond(pub f64);

impl_unit_ops!(RadiansPerSecond, "rad/s");

impl Hertz {
    /// ω = 2πf
    #[inline]
    pub fn to_angular(self) -> RadiansPerSecond {
        RadiansPerSecond(2.0 * std::f64::consts::PI * self.0)
    }
}

// =============================================================================
// Unit tables
// =============================================================================

/// Ordered engineering-unit table, smallest unit first.
///
/// `factors[i]` converts a value in the base unit into unit `labels[i]`.
/// Exactly one factor is 1: that entry is the base unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitTable<'a> {
    labels: &'a [&'a str],
    factors: &'a [f64],
    /// Index of the factor equal to 1
    base: usize,
}

pub const VOLTAGE: UnitTable<'static> = UnitTable {
    labels: &["mV", "V", "kV", "MV"],
    factors: &[1e3, 1.0, 1e-3, 1e-6],
    base: 1,
};

pub const CURRENT: UnitTable<'static> = UnitTable {
    labels: &["μA", "mA", "A", "kA"],
    factors: &[1e6, 1e3, 1.0, 1e-3],
    base: 2,
};

/// Resistance and impedance
pub const IMPEDANCE: UnitTable<'static> = UnitTable {
    labels: &["mΩ", "Ω", "kΩ", "MΩ"],
    factors: &[1e3, 1.0, 1e-3, 1e-6],
    base: 1,
};

pub const CAPACITANCE: UnitTable<'static> = UnitTable {
    labels: &["pF", "nF", "μF", "mF", "F"],
    factors: &[1e12, 1e9, 1e6, 1e3, 1.0],
    base: 4,
};

pub const INDUCTANCE: UnitTable<'static> = UnitTable {
    labels: &["μH", "mH", "H"],
    factors: &[1e6, 1e3, 1.0],
    base: 2,
};

pub const FREQUENCY: UnitTable<'static> = UnitTable {
    labels: &["Hz", "kHz", "MHz", "GHz"],
    factors: &[1.0, 1e-3, 1e-6, 1e-9],
    base: 0,
};

impl<'a> UnitTable<'a> {
    /// Build a custom table, checking the base-unit precondition.
    pub fn new(labels: &'a [&'a str], factors: &'a [f64]) -> CircuitResult<Self> {
        if labels.is_empty() || labels.len() != factors.len() {
            return Err(CircuitError::Validation(format!(
                "unit table needs matching labels and factors (got {} and {})",
                labels.len(),
                factors.len()
            )));
        }
        let base_units: Vec<usize> = factors
            .iter()
            .enumerate()
            .filter(|(_, k)| **k == 1.0)
            .map(|(i, _)| i)
            .collect();
        match base_units.as_slice() {
            [base] => Ok(Self {
                labels,
                factors,
                base: *base,
            }),
            other => Err(CircuitError::Validation(format!(
                "unit table needs exactly one factor equal to 1 (got {})",
                other.len()
            ))),
        }
    }

    pub fn labels(&self) -> &'a [&'a str] {
        self.labels
    }

    pub fn factors(&self) -> &'a [f64] {
        self.factors
    }

    /// Express `value` (in the base unit) in the best-fitting unit.
    ///
    /// Values below 1 walk toward smaller units until the scaled value reaches
    /// 1 or the smallest unit is hit, so 0 always lands on the smallest unit.
    /// Values of at least 1 walk toward larger units and step back once if the
    /// scaled value drops below 1.
    pub fn scale(&self, value: f64) -> (f64, &'a str) {
        let last = self.labels.len() - 1;
        let mut i = self.base;
        let mut scaled = value;
        if value.abs() < 1.0 {
            while i > 0 {
                i -= 1;
                scaled = value * self.factors[i];
                if scaled.abs() >= 1.0 {
                    break;
                }
            }
        } else {
            while i < last {
                i += 1;
                scaled = value * self.factors[i];
                if scaled.abs() < 1.0 {
                    i -= 1;
                    scaled = value * self.factors[i];
                    break;
                }
            }
        }
        (scaled, self.labels[i])
    }
}

// =============================================================================
// Tests
// =============================================================================
