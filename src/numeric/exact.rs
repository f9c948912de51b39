//! Arbitrary-precision backend
//!
//! Wraps `astro-float` big floats at a configurable mantissa precision. The
//! constants cache is owned here so trigonometry and parsing never allocate
//! pi/e tables twice.

use astro_float::{BigFloat, Consts, Radix, RoundingMode};
use thiserror::Error;

use super::{Backend, ParseScalarError};

/// The exact backend failed to build its constants cache
#[derive(Debug, Clone, Error)]
#[error("can't initialize the exact backend: {0}")]
pub struct ExactInitError(String);

/// Arbitrary-precision backend at a fixed mantissa precision (bits)
#[derive(Debug)]
pub struct BigBackend {
    precision: usize,
    rounding: RoundingMode,
    consts: Consts,
}

impl BigBackend {
    /// Create a backend with the given mantissa precision in bits
    pub fn new(precision_bits: u32) -> Result<Self, ExactInitError> {
        let consts = Consts::new().map_err(|e| ExactInitError(format!("{e:?}")))?;
        Ok(Self {
            precision: precision_bits as usize,
            rounding: RoundingMode::ToEven,
            consts,
        })
    }

    /// Mantissa precision in bits
    pub fn precision_bits(&self) -> usize {
        self.precision
    }
}

impl Backend for BigBackend {
    type Scalar = BigFloat;

    fn from_u64(&mut self, value: u64) -> BigFloat {
        BigFloat::from_u64(value, self.precision)
    }

    fn from_f64(&mut self, value: f64) -> BigFloat {
        BigFloat::from_f64(value, self.precision)
    }

    fn add(&mut self, lhs: &BigFloat, rhs: &BigFloat) -> BigFloat {
        lhs.add(rhs, self.precision, self.rounding)
    }

    fn sub(&mut self, lhs: &BigFloat, rhs: &BigFloat) -> BigFloat {
        lhs.sub(rhs, self.precision, self.rounding)
    }

    fn mul(&mut self, lhs: &BigFloat, rhs: &BigFloat) -> BigFloat {
        lhs.mul(rhs, self.precision, self.rounding)
    }

    fn div(&mut self, lhs: &BigFloat, rhs: &BigFloat) -> BigFloat {
        lhs.div(rhs, self.precision, self.rounding)
    }

    fn neg(&mut self, value: &BigFloat) -> BigFloat {
        -value.clone()
    }

    fn sqrt(&mut self, value: &BigFloat) -> BigFloat {
        value.sqrt(self.precision, self.rounding)
    }

    fn sin(&mut self, angle: &BigFloat) -> BigFloat {
        angle.sin(self.precision, self.rounding, &mut self.consts)
    }

    fn cos(&mut self, angle: &BigFloat) -> BigFloat {
        angle.cos(self.precision, self.rounding, &mut self.consts)
    }

    fn atan(&mut self, value: &BigFloat) -> BigFloat {
        value.atan(self.precision, self.rounding, &mut self.consts)
    }

    fn le(&self, lhs: &BigFloat, rhs: &BigFloat) -> bool {
        lhs <= rhs
    }

    fn format(&self, value: &BigFloat) -> String {
        format!("{value}")
    }

    fn parse(&mut self, text: &str) -> Result<BigFloat, ParseScalarError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ParseScalarError {
                text: text.to_string(),
            });
        }
        let parsed = BigFloat::parse(
            trimmed,
            Radix::Dec,
            self.precision,
            self.rounding,
            &mut self.consts,
        );
        // astro-float signals a bad literal with NaN instead of an error
        if parsed.is_nan() {
            return Err(ParseScalarError {
                text: text.to_string(),
            });
        }
        Ok(parsed)
    }

    fn to_f64(&self, value: &BigFloat) -> f64 {
        // No direct conversion in astro-float; the decimal Display form is
        // well within what f64 parsing accepts.
        format!("{value}").parse().unwrap_or(f64::NAN)
    }
}
