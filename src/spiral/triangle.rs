//! Triangle types and the per-triangle recurrence
//!
//! All arithmetic goes through the configured numeric backend; this module
//! contains the entire mathematical contract of the system.

use thiserror::Error;

use crate::numeric::Backend;

/// An (x, y) pair in the active backend's scalar type
#[derive(Debug, Clone, PartialEq)]
pub struct Point<T> {
    pub x: T,
    pub y: T,
}

impl<T> Point<T> {
    pub fn new(x: T, y: T) -> Self {
        Self { x, y }
    }
}

/// One right triangle of the series
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle<T> {
    /// Position in the series, starting at 1, strictly increasing
    pub number: u64,
    /// Shared with the previous triangle's outside right point (for n > 1)
    pub outside_left: Point<T>,
    /// Shared with the next triangle's outside left point
    pub outside_right: Point<T>,
    /// The vertex at the right angle
    pub inside: Point<T>,
    /// Cumulative signed rotation (radians) relative to triangle #1
    pub rotation: T,
}

/// The three vertices plus the series number, the shape both the full read
/// and the renderer consume
#[derive(Debug, Clone, PartialEq)]
pub struct TriangleVertices<T> {
    pub outside_left: Point<T>,
    pub outside_right: Point<T>,
    pub inside: Point<T>,
    pub number: u64,
}

impl<T: Clone> From<&Triangle<T>> for TriangleVertices<T> {
    fn from(triangle: &Triangle<T>) -> Self {
        Self {
            outside_left: triangle.outside_left.clone(),
            outside_right: triangle.outside_right.clone(),
            inside: triangle.inside.clone(),
            number: triangle.number,
        }
    }
}

/// The recurrence can't produce a triangle
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TriangleError {
    /// A configured hypotenuse function returned a length not exceeding the
    /// outside leg, so no right triangle exists at this index
    #[error("can't create a right triangle for triangle #{number}")]
    NotRightTriangle { number: u64 },
    /// A triangle past #1 was requested without the previous outside right
    /// point; only reachable by calling the recurrence directly with
    /// inconsistent arguments
    #[error("triangle #{number} needs the previous triangle's outside right point")]
    MissingSeed { number: u64 },
}

/// A user-substitutable hypotenuse function `f(triangle_number) -> length`
pub type HypotenuseFn<B> = Box<dyn Fn(&mut B, u64) -> <B as Backend>::Scalar>;

/// The stock custom hypotenuse: `sqrt(number + 1)`
pub fn default_custom_hypotenuse<B: Backend>(backend: &mut B, number: u64) -> B::Scalar {
    let value = backend.from_u64(number + 1);
    backend.sqrt(&value)
}

/// Rotate `point` counterclockwise around `origin` by `angle` radians
pub fn rotate_point<B: Backend>(
    backend: &mut B,
    origin: &Point<B::Scalar>,
    point: &Point<B::Scalar>,
    angle: &B::Scalar,
) -> Point<B::Scalar> {
    let angle_cos = backend.cos(angle);
    let angle_sin = backend.sin(angle);

    let delta_x = backend.sub(&point.x, &origin.x);
    let delta_y = backend.sub(&point.y, &origin.y);

    let cos_dx = backend.mul(&angle_cos, &delta_x);
    let sin_dy = backend.mul(&angle_sin, &delta_y);
    let sin_dx = backend.mul(&angle_sin, &delta_x);
    let cos_dy = backend.mul(&angle_cos, &delta_y);

    let x_offset = backend.sub(&cos_dx, &sin_dy);
    let y_offset = backend.add(&sin_dx, &cos_dy);

    let x = backend.add(&origin.x, &x_offset);
    let y = backend.add(&origin.y, &y_offset);

    Point::new(x, y)
}

/// Length of the variable inside leg for triangle `number`.
///
/// `sqrt(number)` by default; with a custom hypotenuse function,
/// `sqrt(hypotenuse^2 - outside_leg^2)` guarded by the right-triangle check.
fn inside_leg<B: Backend>(
    backend: &mut B,
    outside_leg: &B::Scalar,
    hypotenuse: Option<&HypotenuseFn<B>>,
    number: u64,
) -> Result<B::Scalar, TriangleError> {
    match hypotenuse {
        Some(hypotenuse) => {
            let length = hypotenuse(backend, number);
            if backend.le(&length, outside_leg) {
                return Err(TriangleError::NotRightTriangle { number });
            }
            let hyp_sq = backend.mul(&length, &length);
            let leg_sq = backend.mul(outside_leg, outside_leg);
            let diff = backend.sub(&hyp_sq, &leg_sq);
            Ok(backend.sqrt(&diff))
        }
        None => {
            let n = backend.from_u64(number);
            Ok(backend.sqrt(&n))
        }
    }
}

/// Compute triangle `number` of the series.
///
/// Triangle #1 is the fixed base triangle `((-L, il), (0, il), (0, 0))`;
/// `previous_outside_right` is ignored and `accumulated_rotation` passes
/// through unchanged. For later triangles the unrotated candidates sit at
/// `prev + (L, 0)` and `prev + (L, -il)`, the rotation grows by
/// `atan(L / il)`, and both candidates rotate about `prev` by the negated
/// accumulated rotation. The new outside left point is `prev` itself, which
/// is what keeps the spiral gap-free.
pub fn calculate_triangle<B: Backend>(
    backend: &mut B,
    outside_leg: &B::Scalar,
    hypotenuse: Option<&HypotenuseFn<B>>,
    number: u64,
    accumulated_rotation: B::Scalar,
    previous_outside_right: Option<&Point<B::Scalar>>,
) -> Result<Triangle<B::Scalar>, TriangleError> {
    let inside_leg = inside_leg(backend, outside_leg, hypotenuse, number)?;

    if number == 1 {
        let zero = backend.zero();
        let neg_leg = backend.neg(outside_leg);
        return Ok(Triangle {
            number,
            outside_left: Point::new(neg_leg, inside_leg.clone()),
            outside_right: Point::new(zero.clone(), inside_leg),
            inside: Point::new(zero.clone(), zero),
            rotation: accumulated_rotation,
        });
    }

    let previous = previous_outside_right.ok_or(TriangleError::MissingSeed { number })?;

    // Candidate points before rotation.
    let candidate_right = Point::new(backend.add(&previous.x, outside_leg), previous.y.clone());
    let candidate_inside = Point::new(
        candidate_right.x.clone(),
        backend.sub(&previous.y, &inside_leg),
    );

    let step = backend.div(outside_leg, &inside_leg);
    let step = backend.atan(&step);
    let rotation = backend.add(&accumulated_rotation, &step);

    let back_rotation = backend.neg(&rotation);
    let outside_right = rotate_point(backend, previous, &candidate_right, &back_rotation);
    let inside = rotate_point(backend, previous, &candidate_inside, &back_rotation);

    Ok(Triangle {
        number,
        outside_left: previous.clone(),
        outside_right,
        inside,
        rotation,
    })
}
