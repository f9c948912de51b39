//! The reverse Wurzelschnecke recurrence
//!
//! Each right triangle shares its fixed-length outside leg with the next
//! triangle, so the hypotenuses trace a spiral that can be overlaid against
//! the classical Spiral of Theodorus. `triangle` holds the per-triangle
//! recurrence, `engine` the stateful generator seeded from persisted data.

pub mod engine;
pub mod triangle;

pub use engine::{ResumeState, SpiralEngine};
pub use triangle::{
    HypotenuseFn, Point, Triangle, TriangleError, TriangleVertices, calculate_triangle,
    default_custom_hypotenuse, rotate_point,
};
