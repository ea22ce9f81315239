use serde::{Deserialize, Serialize};

/// Blend factor between the original (0.0) and the fully corrected image (1.0).
///
/// Always within `[0, 1]`: out of range values are clamped on construction and
/// NaN is treated as "no correction". Held as `f64` so a caller's value is
/// not rounded onto 0 or 1 before the shortcuts are checked.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, PartialOrd)]
#[serde(from = "f64", into = "f64")]
pub struct Strength(f64);

impl Strength {
    pub const NONE: Strength = Strength(0.0);
    pub const FULL: Strength = Strength(1.0);
    pub const DEFAULT: Strength = Strength(0.9);

    pub fn new(value: f64) -> Strength {
        if value.is_nan() {
            tracing::warn!("strength is NaN, treating it as 0");
            return Strength::NONE;
        }
        let clamped = value.clamp(0.0, 1.0);
        if clamped != value {
            tracing::warn!(requested = value, used = clamped, "strength clamped");
        }
        Strength(clamped)
    }

    /// Whole percent, as a 0..=100 slider reports it.
    pub fn from_percent(percent: u8) -> Strength {
        Strength::new(f64::from(percent) / 100.0)
    }

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn is_none(self) -> bool {
        self.0 == 0.0
    }

    pub fn is_full(self) -> bool {
        self.0 == 1.0
    }
}

impl Default for Strength {
    fn default() -> Self {
        Strength::DEFAULT
    }
}

impl From<f64> for Strength {
    fn from(value: f64) -> Self {
        Strength::new(value)
    }
}

impl From<Strength> for f64 {
    fn from(strength: Strength) -> Self {
        strength.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamps_out_of_range() {
        assert_eq!(Strength::new(-0.5), Strength::NONE);
        assert_eq!(Strength::new(7.0), Strength::FULL);
        assert_eq!(Strength::new(f64::INFINITY), Strength::FULL);
        assert_eq!(Strength::new(0.25).value(), 0.25);
    }

    #[test]
    fn test_nan_is_no_correction() {
        assert!(Strength::new(f64::NAN).is_none());
    }

    #[test]
    fn test_from_percent() {
        assert_eq!(Strength::from_percent(90).value(), 0.9);
        assert!(Strength::from_percent(0).is_none());
        assert!(Strength::from_percent(100).is_full());
        assert!(Strength::from_percent(250).is_full());
    }

    #[test]
    fn test_default_is_ninety_percent() {
        assert_eq!(Strength::default().value(), 0.9);
    }
}
