//! Numeric backend abstraction
//!
//! The recurrence is written once against the `Backend` trait and
//! monomorphized over one of two implementations, selected at configuration
//! time:
//! - `F64Backend`: machine floating point (`f64`, std trigonometry)
//! - `BigBackend`: arbitrary-precision floats (`astro-float`)
//!
//! A whole generation run uses a single backend; the engine, store and run
//! loop never branch on the precision mode per call.

pub mod exact;
pub mod float;

pub use exact::{BigBackend, ExactInitError};
pub use float::F64Backend;

use thiserror::Error;

/// A scalar string failed to parse under the active backend
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("can't parse {text:?} as a number")]
pub struct ParseScalarError {
    /// The offending field text
    pub text: String,
}

/// Scalar arithmetic required by the triangle recurrence and the series store.
///
/// Methods take `&mut self` because the arbitrary-precision implementation
/// carries a constants cache that trigonometry and parsing update.
pub trait Backend {
    /// The scalar type all points and rotations of a run are made of
    type Scalar: Clone + PartialEq + std::fmt::Debug;

    fn from_u64(&mut self, value: u64) -> Self::Scalar;
    fn from_f64(&mut self, value: f64) -> Self::Scalar;

    /// Additive identity
    fn zero(&mut self) -> Self::Scalar {
        self.from_u64(0)
    }

    fn add(&mut self, lhs: &Self::Scalar, rhs: &Self::Scalar) -> Self::Scalar;
    fn sub(&mut self, lhs: &Self::Scalar, rhs: &Self::Scalar) -> Self::Scalar;
    fn mul(&mut self, lhs: &Self::Scalar, rhs: &Self::Scalar) -> Self::Scalar;
    fn div(&mut self, lhs: &Self::Scalar, rhs: &Self::Scalar) -> Self::Scalar;
    fn neg(&mut self, value: &Self::Scalar) -> Self::Scalar;

    fn sqrt(&mut self, value: &Self::Scalar) -> Self::Scalar;
    fn sin(&mut self, angle: &Self::Scalar) -> Self::Scalar;
    fn cos(&mut self, angle: &Self::Scalar) -> Self::Scalar;
    fn atan(&mut self, value: &Self::Scalar) -> Self::Scalar;

    /// `lhs <= rhs` (used for the right-triangle guard)
    fn le(&self, lhs: &Self::Scalar, rhs: &Self::Scalar) -> bool;

    /// Canonical string form for persisted rows.
    ///
    /// Must round-trip through [`Backend::parse`] on the same backend.
    fn format(&self, value: &Self::Scalar) -> String;

    /// Parse a persisted field back into a scalar
    fn parse(&mut self, text: &str) -> Result<Self::Scalar, ParseScalarError>;

    /// Lossy projection for the renderer
    fn to_f64(&self, value: &Self::Scalar) -> f64;
}
