//! Shared analysis frequency for reactive elements.

use crate::error::{CircuitError, CircuitResult};
use crate::units::{Hertz, RadiansPerSecond, FREQUENCY};
use tracing::debug;

/// Frequency used when a circuit is created.
pub const DEFAULT_FREQUENCY: Hertz = Hertz(1000.0);

/// The single frequency every phasor in a circuit is evaluated at.
///
/// Capacitor and inductor impedances read [`FrequencyContext::angular`] each
/// time they are asked, so changing the frequency here changes every reactive
/// element at once.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyContext {
    frequency: Hertz,
    angular: RadiansPerSecond,
}

impl Default for FrequencyContext {
    fn default() -> Self {
        Self::new(DEFAULT_FREQUENCY)
    }
}

impl FrequencyContext {
    fn new(frequency: Hertz) -> Self {
        Self {
            frequency,
            angular: frequency.to_angular(),
        }
    }

    /// Build a context at `hz`, rejecting negative or non-finite values.
    pub fn with_frequency(hz: f64) -> CircuitResult<Self> {
        let mut ctx = Self::default();
        ctx.set_frequency(hz)?;
        Ok(ctx)
    }

    pub fn frequency(&self) -> Hertz {
        self.frequency
    }

    pub fn angular(&self) -> RadiansPerSecond {
        self.angular
    }

    /// Replace the frequency and its angular counterpart together.
    pub fn set_frequency(&mut self, hz: f64) -> CircuitResult<()> {
        if !hz.is_finite() || hz < 0.0 {
            return Err(CircuitError::Validation(format!(
                "frequency must be a finite, non-negative number of hertz (got {hz})"
            )));
        }
        *self = Self::new(Hertz(hz));
        debug!(hz, omega = self.angular.value(), "analysis frequency changed");
        Ok(())
    }
}

impl std::fmt::Display for FrequencyContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (value, unit) = FREQUENCY.scale(self.frequency.value());
        write!(f, "f={value:.2} {unit}")
    }
}
