//! Static rendering of the accumulated series
//!
//! A thin visualization layer over the store's full read: triangle outlines
//! or single vertices, optional connecting lines, the circle the spiral
//! winds around, and a static overlay of the classical Spiral of Theodorus
//! in its final overlapped position. The original animates the overlay into
//! place; here the flip/rotate/translate composition is applied up front and
//! the result drawn once.

use std::f64::consts::{FRAC_PI_4, SQRT_2};
use std::path::PathBuf;

use glam::DVec2;
use log::info;
use plotters::prelude::*;
use thiserror::Error;

use crate::numeric::Backend;
use crate::settings::{Config, PlotPoint};
use crate::spiral::TriangleVertices;

/// A triangle projected to `f64` for drawing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotTriangle {
    pub outside_left: DVec2,
    pub outside_right: DVec2,
    pub inside: DVec2,
    pub number: u64,
}

impl PlotTriangle {
    /// The vertex selected by the point-plotting option
    pub fn vertex(&self, which: PlotPoint) -> DVec2 {
        match which {
            PlotPoint::OutsideLeft => self.outside_left,
            PlotPoint::OutsideRight => self.outside_right,
            PlotPoint::Inside => self.inside,
        }
    }
}

/// Drawing failed
#[derive(Debug, Clone, Error)]
#[error("render error: {0}")]
pub struct RenderError(String);

/// Everything the renderer needs, split out of [`Config`]
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub output: PathBuf,
    pub size: (u32, u32),
    pub show_triangles: bool,
    pub plot_point: PlotPoint,
    pub connect_points: bool,
    pub show_circle: bool,
    pub show_spiral: bool,
    pub theodorus_amount: u64,
    pub title: String,
}

impl RenderOptions {
    pub fn from_config(config: &Config, output: PathBuf) -> Self {
        Self {
            output,
            size: (900, 900),
            show_triangles: config.show_triangles,
            plot_point: config.plot_point,
            connect_points: config.connect_points,
            show_circle: config.show_circle,
            show_spiral: config.show_spiral,
            theodorus_amount: config.theodorus_amount,
            title: config.plot_title.clone(),
        }
    }
}

/// Project stored vertices into drawable `f64` triangles
pub fn project<B: Backend>(
    backend: &B,
    triangles: &[TriangleVertices<B::Scalar>],
) -> Vec<PlotTriangle> {
    triangles
        .iter()
        .map(|t| PlotTriangle {
            outside_left: DVec2::new(backend.to_f64(&t.outside_left.x), backend.to_f64(&t.outside_left.y)),
            outside_right: DVec2::new(
                backend.to_f64(&t.outside_right.x),
                backend.to_f64(&t.outside_right.y),
            ),
            inside: DVec2::new(backend.to_f64(&t.inside.x), backend.to_f64(&t.inside.y)),
            number: t.number,
        })
        .collect()
}

/// Plain `f64` counterclockwise rotation for the overlay path
fn rotate(origin: DVec2, point: DVec2, angle: f64) -> DVec2 {
    let delta = point - origin;
    origin
        + DVec2::new(
            angle.cos() * delta.x - angle.sin() * delta.y,
            angle.sin() * delta.x + angle.cos() * delta.y,
        )
}

/// Outer vertices of the classical Spiral of Theodorus with unit legs.
///
/// Returns `amount + 1` points starting at `(1, 0)`; the k-th point sits at
/// distance `sqrt(k + 1)` from the origin.
pub fn theodorus_points(amount: u64) -> Vec<DVec2> {
    let mut points = vec![DVec2::new(1.0, 0.0), DVec2::new(1.0, 1.0)];
    let mut rotation = 0.0;
    for n in 2..=amount {
        let last = *points.last().unwrap();
        let candidate = last + DVec2::Y;
        rotation += (1.0 / ((n - 1) as f64).sqrt()).atan();
        points.push(rotate(last, candidate, rotation));
    }
    points
}

/// Map the classical spiral onto the reverse Wurzelschnecke: flip about the
/// line x = 1, rotate a quarter-turn's half (pi/4) clockwise about (1, 1),
/// then shift two units left. This is the end state of the original's
/// overlap animation.
pub fn overlap_transform(points: &[DVec2]) -> Vec<DVec2> {
    let pivot = DVec2::new(1.0, 1.0);
    points
        .iter()
        .map(|p| {
            let flipped = DVec2::new(2.0 - p.x, p.y);
            rotate(pivot, flipped, -FRAC_PI_4) - DVec2::new(2.0, 0.0)
        })
        .collect()
}

/// Center of the circle the spiral winds around (empirical, from the
/// original's plot)
pub const CIRCLE_CENTER: DVec2 = DVec2::new(-1.0, 1.0 - SQRT_2);

fn draw_error(e: impl std::fmt::Display) -> RenderError {
    RenderError(e.to_string())
}

/// Draw the series to a PNG file
pub fn render(triangles: &[PlotTriangle], options: &RenderOptions) -> Result<(), RenderError> {
    info!(
        "rendering {:?} ({} triangles) to {}",
        options.title,
        triangles.len(),
        options.output.display()
    );

    let root = BitMapBackend::new(&options.output, options.size).into_drawing_area();
    root.fill(&WHITE).map_err(draw_error)?;

    // Square windows on a square bitmap keep the aspect ratio equal.
    let (x_range, y_range) = if options.show_spiral {
        (-5.5..5.5, -5.5..5.5)
    } else {
        (
            CIRCLE_CENTER.x - 2.0..CIRCLE_CENTER.x + 2.0,
            CIRCLE_CENTER.y - 2.0..CIRCLE_CENTER.y + 2.0,
        )
    };

    let mut chart = ChartBuilder::on(&root)
        .margin(10)
        .build_cartesian_2d(x_range, y_range)
        .map_err(draw_error)?;

    if options.show_circle {
        let disc: Vec<(f64, f64)> = (0..=128)
            .map(|i| {
                let theta = i as f64 / 128.0 * std::f64::consts::TAU;
                (
                    CIRCLE_CENTER.x + theta.cos(),
                    CIRCLE_CENTER.y + theta.sin(),
                )
            })
            .collect();
        let pink = RGBColor(255, 191, 204).mix(0.5);
        chart
            .draw_series(std::iter::once(Polygon::new(disc, pink)))
            .map_err(draw_error)?;
        chart
            .draw_series(std::iter::once(Circle::new(
                (CIRCLE_CENTER.x, CIRCLE_CENTER.y),
                4,
                MAGENTA.filled(),
            )))
            .map_err(draw_error)?;
    }

    if options.connect_points {
        chart
            .draw_series(LineSeries::new(
                triangles.iter().map(|t| {
                    let v = t.vertex(options.plot_point);
                    (v.x, v.y)
                }),
                &BLACK,
            ))
            .map_err(draw_error)?;
    }

    if options.show_triangles {
        chart
            .draw_series(triangles.iter().map(|t| {
                PathElement::new(
                    vec![
                        (t.outside_left.x, t.outside_left.y),
                        (t.outside_right.x, t.outside_right.y),
                        (t.inside.x, t.inside.y),
                        (t.outside_left.x, t.outside_left.y),
                    ],
                    BLACK.stroke_width(2),
                )
            }))
            .map_err(draw_error)?;
    } else {
        chart
            .draw_series(triangles.iter().map(|t| {
                let v = t.vertex(options.plot_point);
                Circle::new((v.x, v.y), 3, BLACK.filled())
            }))
            .map_err(draw_error)?;
    }

    if options.show_spiral {
        let overlay = overlap_transform(&theodorus_points(options.theodorus_amount));
        chart
            .draw_series(std::iter::once(PathElement::new(
                overlay.iter().map(|p| (p.x, p.y)).collect::<Vec<_>>(),
                RED.stroke_width(2),
            )))
            .map_err(draw_error)?;
    }

    root.present().map_err(draw_error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_theodorus_points_trace_integer_roots() {
        let points = theodorus_points(16);
        assert_eq!(points.len(), 17);
        for (k, point) in points.iter().enumerate() {
            // The k-th hypotenuse has length sqrt(k + 1).
            assert!(
                (point.length() - ((k + 1) as f64).sqrt()).abs() < EPS,
                "point {k} is off the spiral"
            );
        }
        // Unit legs between consecutive points.
        for pair in points.windows(2) {
            assert!((pair[0].distance(pair[1]) - 1.0).abs() < EPS);
        }
    }

    #[test]
    fn test_overlap_transform_is_an_isometry() {
        let points = theodorus_points(10);
        let moved = overlap_transform(&points);
        assert_eq!(points.len(), moved.len());
        for (a, b) in points.windows(2).zip(moved.windows(2)) {
            assert!((a[0].distance(a[1]) - b[0].distance(b[1])).abs() < EPS);
        }
    }

    #[test]
    fn test_overlap_transform_anchors_the_start() {
        // (1, 0) flips onto itself, rotates about (1, 1) to
        // (1 - sqrt(2)/2, 1 - sqrt(2)/2), then shifts two units left.
        let moved = overlap_transform(&[DVec2::new(1.0, 0.0)]);
        let expected = DVec2::new(-1.0 - SQRT_2 / 2.0, 1.0 - SQRT_2 / 2.0);
        assert!(moved[0].distance(expected) < EPS);
    }

    #[test]
    fn test_project_uses_the_backend() {
        use crate::numeric::{Backend, BigBackend};
        use crate::spiral::{ResumeState, SpiralEngine};

        let mut backend = BigBackend::new(192).unwrap();
        let mut engine = SpiralEngine::new(&mut backend, 1.0, None, ResumeState::Fresh);
        let triangle = engine.next_triangle(&mut backend).unwrap();
        let vertices = vec![crate::spiral::TriangleVertices::from(&triangle)];

        let projected = project(&backend, &vertices);
        assert_eq!(projected.len(), 1);
        assert!(projected[0].outside_left.distance(DVec2::new(-1.0, 1.0)) < 1e-9);
        assert!(projected[0].inside.length() < 1e-9);
    }

    #[test]
    fn test_render_smoke() {
        use crate::numeric::F64Backend;
        use crate::spiral::{ResumeState, SpiralEngine};

        let mut backend = F64Backend;
        let mut engine = SpiralEngine::new(&mut backend, 1.0, None, ResumeState::Fresh);
        let vertices: Vec<_> = (0..6)
            .map(|_| {
                let t = engine.next_triangle(&mut backend).unwrap();
                crate::spiral::TriangleVertices::from(&t)
            })
            .collect();
        let triangles = project(&backend, &vertices);

        let dir = tempfile::TempDir::new().unwrap();
        let options = RenderOptions {
            output: dir.path().join("spiral.png"),
            size: (300, 300),
            show_triangles: true,
            plot_point: PlotPoint::Inside,
            connect_points: true,
            show_circle: true,
            show_spiral: true,
            theodorus_amount: 8,
            title: "smoke".to_string(),
        };
        render(&triangles, &options).unwrap();
        assert!(options.output.exists());
    }
}
