// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The distance-decay exponent K that identifies a run.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::InputValidationError;

/// Validated distance-decay exponent (K > 1).
///
/// Every artifact a run produces is keyed by this value. Two spellings are
/// used when K is encoded into file names: [`DecayExponent::literal`]
/// (`"2.0"`) and [`DecayExponent::sanitized`] (`"2_0"`).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct DecayExponent(f64);

impl DecayExponent {
    pub fn new(value: f64) -> Result<Self, InputValidationError> {
        if !value.is_finite() {
            return Err(InputValidationError::NotFinite { value });
        }
        if value <= 1.0 {
            return Err(InputValidationError::NotGreaterThanOne { value });
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// K as a float literal: integral values keep a trailing `.0`, large
    /// magnitudes use a signed two-digit exponent (`1e+16`).
    pub fn literal(&self) -> String {
        float_literal(self.0)
    }

    /// [`Self::literal`] with every `.` replaced by `_`.
    pub fn sanitized(&self) -> String {
        self.literal().replace('.', "_")
    }
}

fn float_literal(value: f64) -> String {
    let debug = format!("{:?}", value);
    match debug.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => debug,
    }
}

impl fmt::Display for DecayExponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.literal())
    }
}

impl FromStr for DecayExponent {
    type Err = InputValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: f64 = s
            .trim()
            .parse()
            .map_err(|_| InputValidationError::NotNumeric {
                input: s.to_string(),
            })?;
        Self::new(value)
    }
}

impl TryFrom<f64> for DecayExponent {
    type Error = InputValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DecayExponent> for f64 {
    fn from(k: DecayExponent) -> f64 {
        k.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_values_at_or_below_one() {
        assert!(matches!(
            DecayExponent::new(1.0),
            Err(InputValidationError::NotGreaterThanOne { .. })
        ));
        assert!(DecayExponent::new(0.5).is_err());
        assert!(DecayExponent::new(-3.0).is_err());
        assert!(DecayExponent::new(1.000001).is_ok());
    }

    #[test]
    fn rejects_non_numeric_and_non_finite_input() {
        assert!(matches!(
            "two".parse::<DecayExponent>(),
            Err(InputValidationError::NotNumeric { .. })
        ));
        assert!(matches!(
            "".parse::<DecayExponent>(),
            Err(InputValidationError::NotNumeric { .. })
        ));
        assert!(matches!(
            DecayExponent::new(f64::NAN),
            Err(InputValidationError::NotFinite { .. })
        ));
        assert!(matches!(
            "inf".parse::<DecayExponent>(),
            Err(InputValidationError::NotFinite { .. })
        ));
    }

    #[test]
    fn literal_keeps_trailing_zero_for_integral_values() {
        let k: DecayExponent = "2".parse().unwrap();
        assert_eq!(k.literal(), "2.0");
        assert_eq!(k.sanitized(), "2_0");
    }

    #[test]
    fn literal_for_fractional_values() {
        let k = DecayExponent::new(2.5).unwrap();
        assert_eq!(k.literal(), "2.5");
        assert_eq!(k.sanitized(), "2_5");

        let k = DecayExponent::new(1.25).unwrap();
        assert_eq!(k.to_string(), "1.25");
    }

    #[test]
    fn literal_uses_signed_exponent_for_large_values() {
        let k = DecayExponent::new(1e16).unwrap();
        assert_eq!(k.literal(), "1e+16");

        let k = DecayExponent::new(1e15).unwrap();
        assert_eq!(k.literal(), "1000000000000000.0");
    }

    #[test]
    fn serde_rejects_invalid_values() {
        let k: DecayExponent = serde_json::from_str("3.0").unwrap();
        assert_eq!(k.value(), 3.0);
        assert!(serde_json::from_str::<DecayExponent>("1.0").is_err());
    }
}
