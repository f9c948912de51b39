//! Machine floating-point backend

use super::{Backend, ParseScalarError};

/// `f64` backend: std trigonometry, shortest round-trip `Display` strings
#[derive(Debug, Clone, Copy, Default)]
pub struct F64Backend;

impl Backend for F64Backend {
    type Scalar = f64;

    fn from_u64(&mut self, value: u64) -> f64 {
        value as f64
    }

    fn from_f64(&mut self, value: f64) -> f64 {
        value
    }

    fn add(&mut self, lhs: &f64, rhs: &f64) -> f64 {
        lhs + rhs
    }

    fn sub(&mut self, lhs: &f64, rhs: &f64) -> f64 {
        lhs - rhs
    }

    fn mul(&mut self, lhs: &f64, rhs: &f64) -> f64 {
        lhs * rhs
    }

    fn div(&mut self, lhs: &f64, rhs: &f64) -> f64 {
        lhs / rhs
    }

    fn neg(&mut self, value: &f64) -> f64 {
        -value
    }

    fn sqrt(&mut self, value: &f64) -> f64 {
        value.sqrt()
    }

    fn sin(&mut self, angle: &f64) -> f64 {
        angle.sin()
    }

    fn cos(&mut self, angle: &f64) -> f64 {
        angle.cos()
    }

    fn atan(&mut self, value: &f64) -> f64 {
        value.atan()
    }

    fn le(&self, lhs: &f64, rhs: &f64) -> bool {
        lhs <= rhs
    }

    fn format(&self, value: &f64) -> String {
        // Rust's f64 Display is the shortest representation that parses back
        // to the same bits.
        format!("{value}")
    }

    fn parse(&mut self, text: &str) -> Result<f64, ParseScalarError> {
        text.trim().parse().map_err(|_| ParseScalarError {
            text: text.to_string(),
        })
    }

    fn to_f64(&self, value: &f64) -> f64 {
        *value
    }
}
