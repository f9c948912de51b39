//! Stateful series generator
//!
//! Wraps the per-triangle recurrence with the cursor state needed to advance
//! it: the next number, the accumulated rotation, and the previous outside
//! right point. Seeding comes from a [`ResumeState`], so a restarted run
//! continues exactly where the persisted series stopped.

use crate::numeric::Backend;

use super::triangle::{HypotenuseFn, Point, Triangle, TriangleError, calculate_triangle};

/// Where generation picks up, recovered from the last persisted record
#[derive(Debug, Clone, PartialEq)]
pub enum ResumeState<T> {
    /// No usable prior data: start at triangle #1 with rotation 0
    Fresh,
    /// Continue after the last persisted triangle
    Resumed {
        next_number: u64,
        outside_right: Point<T>,
        rotation: T,
    },
}

/// Generator for the triangle series
pub struct SpiralEngine<B: Backend> {
    outside_leg: B::Scalar,
    hypotenuse: Option<HypotenuseFn<B>>,
    next_number: u64,
    rotation: B::Scalar,
    previous_outside_right: Option<Point<B::Scalar>>,
}

impl<B: Backend> SpiralEngine<B> {
    /// Build an engine seeded from a resume state.
    ///
    /// `hypotenuse` replaces the default `sqrt(number)` inside leg with
    /// `sqrt(f(number)^2 - L^2)` when present.
    pub fn new(
        backend: &mut B,
        outside_leg_length: f64,
        hypotenuse: Option<HypotenuseFn<B>>,
        resume: ResumeState<B::Scalar>,
    ) -> Self {
        let outside_leg = backend.from_f64(outside_leg_length);
        match resume {
            ResumeState::Fresh => Self {
                outside_leg,
                hypotenuse,
                next_number: 1,
                rotation: backend.zero(),
                previous_outside_right: None,
            },
            ResumeState::Resumed {
                next_number,
                outside_right,
                rotation,
            } => Self {
                outside_leg,
                hypotenuse,
                next_number,
                rotation,
                previous_outside_right: Some(outside_right),
            },
        }
    }

    /// Number of the triangle the next call will produce
    pub fn next_number(&self) -> u64 {
        self.next_number
    }

    /// Compute the next triangle and advance the cursor
    pub fn next_triangle(&mut self, backend: &mut B) -> Result<Triangle<B::Scalar>, TriangleError> {
        let triangle = calculate_triangle(
            backend,
            &self.outside_leg,
            self.hypotenuse.as_ref(),
            self.next_number,
            self.rotation.clone(),
            self.previous_outside_right.as_ref(),
        )?;

        self.rotation = triangle.rotation.clone();
        self.previous_outside_right = Some(triangle.outside_right.clone());
        self.next_number += 1;

        Ok(triangle)
    }
}
