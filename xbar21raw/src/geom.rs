//!
//! # Geometry Module
//!
//! Points, the four [Shape]s drawn on a mask, and the rotate-and-shift [Transform]s
//! applied when instances are flattened.
//! Coordinates are `f64` user units (microns).
//!

// Std-Lib
use std::ops::{Add, Mul, Neg, Sub};

// Crates.io
use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};

// Local imports
use crate::bbox::BoundBoxTrait;

/// Tolerance for coordinate comparisons
pub const EPS: f64 = 1e-9;
/// Number of vertices used to approximate a [Circle]
pub const CIRCLE_POINTS: usize = 144;

/// # Point in two-dimensional layout-space
#[derive(Debug, Copy, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}
impl Point {
    /// Create a new [Point] from (x,y) coordinates
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
    /// Create a new [Point] which serves as an offset in direction `dir`
    pub fn offset(val: f64, dir: Dir) -> Self {
        match dir {
            Dir::Horiz => Self { x: val, y: 0. },
            Dir::Vert => Self { x: 0., y: val },
        }
    }
    /// Create a new point shifted by `p.x` in the x-dimension and by `p.y` in the y-dimension
    pub fn shift(&self, p: &Point) -> Point {
        Point {
            x: p.x + self.x,
            y: p.y + self.y,
        }
    }
    /// Get the coordinate associated with direction `dir`
    pub fn coord(&self, dir: Dir) -> f64 {
        match dir {
            Dir::Horiz => self.x,
            Dir::Vert => self.y,
        }
    }
    /// Euclidean length, treating the point as a vector
    pub fn norm(&self) -> f64 {
        self.x.hypot(self.y)
    }
    /// Equality within [EPS]
    pub fn approx_eq(&self, other: &Point) -> bool {
        (self.x - other.x).abs() <= EPS && (self.y - other.y).abs() <= EPS
    }
    /// Create a new [Point], transformed from our original location by `transform`
    pub fn transform(&self, trans: &Transform) -> Point {
        let x = trans.a[0][0] * self.x + trans.a[0][1] * self.y + trans.b[0];
        let y = trans.a[1][0] * self.x + trans.a[1][1] * self.y + trans.b[1];
        Self { x, y }
    }
}
impl Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}
impl Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}
impl Mul<f64> for Point {
    type Output = Point;
    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}
impl Neg for Point {
    type Output = Point;
    fn neg(self) -> Point {
        Point::new(-self.x, -self.y)
    }
}
impl From<(f64, f64)> for Point {
    fn from(t: (f64, f64)) -> Self {
        Self::new(t.0, t.1)
    }
}

/// Axis of a bar, a pad row, or a Manhattan route leg
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Dir {
    Horiz,
    Vert,
}

/// # Path
///
/// Open-ended geometric path with non-zero width.
/// Ends are flush with the first and last points; interior corners are filled square.
///
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
pub struct Path {
    pub points: Vec<Point>,
    pub width: f64,
}
impl Path {
    /// Iterate over the non-degenerate segments, as (start, end) pairs
    pub fn segments(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.points
            .windows(2)
            .map(|w| (w[0], w[1]))
            .filter(|(a, b)| !a.approx_eq(b))
    }
}
/// # Polygon
///
/// Closed n-sided polygon with arbitrary number of vertices.
/// Closure from the last point back to the first is implied;
/// the initial point need not be repeated at the end.
///
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
pub struct Polygon {
    pub points: Vec<Point>,
}
impl Polygon {
    /// Signed (shoelace) area. Positive for counter-clockwise vertex order.
    pub fn signed_area(&self) -> f64 {
        let n = self.points.len();
        let mut acc = 0.;
        for k in 0..n {
            let (p, q) = (&self.points[k], &self.points[(k + 1) % n]);
            acc += p.x * q.y - q.x * p.y;
        }
        acc / 2.
    }
}
/// # Rectangle
///
/// Axis-aligned rectangle, specified by two opposite corners.
///
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
pub struct Rect {
    pub p0: Point,
    pub p1: Point,
}
impl Rect {
    /// Calculate our center-point
    pub fn center(&self) -> Point {
        Point::new((self.p0.x + self.p1.x) / 2., (self.p0.y + self.p1.y) / 2.)
    }
}
/// # Circle
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
pub struct Circle {
    pub center: Point,
    pub radius: f64,
}

/// # Shape
///
/// The primary geometric primitive comprising raw layout.
/// Variants include [Rect], [Polygon], [Path], and [Circle].
///
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[enum_dispatch(ShapeTrait)]
pub enum Shape {
    Rect(Rect),
    Polygon(Polygon),
    Path(Path),
    Circle(Circle),
}
impl Default for Shape {
    fn default() -> Self {
        Self::Rect(Rect::default())
    }
}

/// # ShapeTrait
///
/// Common shape operations, dispatched from the [Shape] enum to its variants by [enum_dispatch].
///
#[enum_dispatch]
pub trait ShapeTrait {
    /// Shift coordinates by the (x,y) values specified in `pt`
    fn shift(&mut self, pt: &Point);
    /// Boolean indication of whether the [Shape] contains [Point] `pt`.
    /// Containment is *inclusive*: boundary points are inside.
    fn contains(&self, pt: &Point) -> bool;
    /// Convert to one or more [Polygon]s covering the same area
    fn to_polys(&self) -> Vec<Polygon>;
}

impl ShapeTrait for Rect {
    fn shift(&mut self, pt: &Point) {
        self.p0 = self.p0.shift(pt);
        self.p1 = self.p1.shift(pt);
    }
    fn contains(&self, pt: &Point) -> bool {
        let (p0, p1) = (&self.p0, &self.p1);
        p0.x.min(p1.x) <= pt.x
            && p0.x.max(p1.x) >= pt.x
            && p0.y.min(p1.y) <= pt.y
            && p0.y.max(p1.y) >= pt.y
    }
    fn to_polys(&self) -> Vec<Polygon> {
        let (x0, x1) = (self.p0.x.min(self.p1.x), self.p0.x.max(self.p1.x));
        let (y0, y1) = (self.p0.y.min(self.p1.y), self.p0.y.max(self.p1.y));
        vec![Polygon {
            points: vec![
                Point::new(x0, y0),
                Point::new(x1, y0),
                Point::new(x1, y1),
                Point::new(x0, y1),
            ],
        }]
    }
}
impl ShapeTrait for Polygon {
    fn shift(&mut self, pt: &Point) {
        for p in self.points.iter_mut() {
            *p = p.shift(pt);
        }
    }
    /// Winding-number containment.
    fn contains(&self, pt: &Point) -> bool {
        let b = self.points.bbox();
        if b.is_empty() || pt.x < b.p0.x || pt.x > b.p1.x || pt.y < b.p0.y || pt.y > b.p1.y {
            return false;
        }
        let mut winding_num: isize = 0;
        for idx in 0..self.points.len() {
            // Wraps around to close the polygon at its first point
            let (past, next) = (
                &self.points[idx],
                &self.points[(idx + 1) % self.points.len()],
            );
            if past.y.min(next.y) <= pt.y && past.y.max(next.y) >= pt.y {
                if (next.y - past.y).abs() <= EPS {
                    // Horizontal edge at the point's height
                    if past.x.min(next.x) <= pt.x && past.x.max(next.x) >= pt.x {
                        return true;
                    }
                } else {
                    let xsolve = (next.x - past.x) * (pt.y - past.y) / (next.y - past.y) + past.x;
                    if (xsolve - pt.x).abs() <= EPS {
                        return true;
                    } else if xsolve > pt.x {
                        if next.y > past.y {
                            winding_num += 1;
                        } else {
                            winding_num -= 1;
                        }
                    }
                }
            }
        }
        winding_num != 0
    }
    fn to_polys(&self) -> Vec<Polygon> {
        vec![self.clone()]
    }
}
impl ShapeTrait for Path {
    fn shift(&mut self, pt: &Point) {
        for p in self.points.iter_mut() {
            *p = p.shift(pt);
        }
    }
    fn contains(&self, pt: &Point) -> bool {
        self.to_polys().iter().any(|p| p.contains(pt))
    }
    /// One quadrilateral per segment.
    /// Segments meeting at an interior corner are each extended by half the width,
    /// so the corner is filled.
    fn to_polys(&self) -> Vec<Polygon> {
        let segs: Vec<(Point, Point)> = self.segments().collect();
        let half = self.width / 2.;
        let last = segs.len().saturating_sub(1);
        segs.iter()
            .enumerate()
            .map(|(k, (a, b))| {
                let d = *b - *a;
                let u = d * (1. / d.norm());
                let n = Point::new(-u.y, u.x) * half;
                let a = if k > 0 { *a - u * half } else { *a };
                let b = if k < last { *b + u * half } else { *b };
                Polygon {
                    points: vec![a + n, b + n, b - n, a - n],
                }
            })
            .collect()
    }
}
impl ShapeTrait for Circle {
    fn shift(&mut self, pt: &Point) {
        self.center = self.center.shift(pt);
    }
    fn contains(&self, pt: &Point) -> bool {
        (*pt - self.center).norm() <= self.radius + EPS
    }
    /// [CIRCLE_POINTS]-sided regular polygon, vertices on the circle
    fn to_polys(&self) -> Vec<Polygon> {
        let step = 2. * std::f64::consts::PI / CIRCLE_POINTS as f64;
        let points = (0..CIRCLE_POINTS)
            .map(|k| {
                let t = step * k as f64;
                Point::new(
                    self.center.x + self.radius * t.cos(),
                    self.center.y + self.radius * t.sin(),
                )
            })
            .collect();
        vec![Polygon { points }]
    }
}

/// # Primitive Geometric Element
///
/// A [Shape] on a numbered layer.
/// Layer numbers are process channels only, and carry no other meaning.
///
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Element {
    /// Layer Number
    pub layer: i16,
    /// Shape
    pub inner: Shape,
}
impl Element {
    pub fn new(layer: i16, inner: impl Into<Shape>) -> Self {
        Self {
            layer,
            inner: inner.into(),
        }
    }
}

/// # Matrix-Vector Transformation
///
/// 2x2 rotation-matrix and two-entry translation vector,
/// used for relative movement of [Point]s and [Shape]s.
///
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Rotation / Transformation Matrix
    /// Represented in row-major order
    pub a: [[f64; 2]; 2],
    /// X-Y Translation
    pub b: [f64; 2],
}
impl Transform {
    /// The identity transform, leaving any transformed object unmodified
    pub fn identity() -> Self {
        Self {
            a: [[1., 0.], [0., 1.]],
            b: [0., 0.],
        }
    }
    /// Translation by (x,y)
    pub fn translate(x: f64, y: f64) -> Self {
        Self {
            a: [[1., 0.], [0., 1.]],
            b: [x, y],
        }
    }
    /// A transform to rotate counter-clockwise by `angle` degrees
    pub fn rotate(angle: f64) -> Self {
        let (sin, cos) = sin_cos(angle);
        Self {
            a: [[cos, -sin], [sin, cos]],
            b: [0., 0.],
        }
    }
    /// Create a transform from instance fields: location and rotation.
    /// Rotation applies about the origin, before translation to `loc`.
    pub fn from_instance(loc: &Point, angle: Option<f64>) -> Self {
        let (sin, cos) = match angle {
            Some(angle) => sin_cos(angle),
            None => (0., 1.),
        };
        Self {
            a: [[cos, -sin], [sin, cos]],
            b: [loc.x, loc.y],
        }
    }
    /// Create a new [Transform] that is the cascade of `parent` and `child`.
    /// Note this operation *is not* commutative.
    pub fn cascade(parent: &Transform, child: &Transform) -> Transform {
        let mut b = matvec(&parent.a, &child.b);
        b[0] += parent.b[0];
        b[1] += parent.b[1];
        let a = matmul(&parent.a, &child.a);
        Self { a, b }
    }
    /// Boolean indication of whether we map axis-aligned rectangles onto axis-aligned rectangles
    pub fn is_manhattan(&self) -> bool {
        let zero = |v: f64| v.abs() <= EPS;
        (zero(self.a[0][1]) && zero(self.a[1][0])) || (zero(self.a[0][0]) && zero(self.a[1][1]))
    }
}
/// Sine and cosine of `angle` degrees, exact at multiples of 90
fn sin_cos(angle: f64) -> (f64, f64) {
    let quarter = angle / 90.;
    if (quarter - quarter.round()).abs() <= EPS {
        match (quarter.round() as i64).rem_euclid(4) {
            0 => (0., 1.),
            1 => (1., 0.),
            2 => (0., -1.),
            _ => (-1., 0.),
        }
    } else {
        angle.to_radians().sin_cos()
    }
}
/// Multiply 2x2 matrices, returning a new 2x2 matrix
fn matmul(a: &[[f64; 2]; 2], b: &[[f64; 2]; 2]) -> [[f64; 2]; 2] {
    [
        [
            a[0][0] * b[0][0] + a[0][1] * b[1][0],
            a[0][0] * b[0][1] + a[0][1] * b[1][1],
        ],
        [
            a[1][0] * b[0][0] + a[1][1] * b[1][0],
            a[1][0] * b[0][1] + a[1][1] * b[1][1],
        ],
    ]
}
/// Multiply a 2x2 matrix by a 2-entry vector, returning a new 2-entry vector
fn matvec(a: &[[f64; 2]; 2], b: &[f64; 2]) -> [f64; 2] {
    [
        a[0][0] * b[0] + a[0][1] * b[1],
        a[1][0] * b[0] + a[1][1] * b[1],
    ]
}
pub trait TransformTrait {
    /// Apply matrix-vector [Transform] `trans`.
    /// Creates a new shape at a location equal to the transformation of our own.
    fn transform(&self, trans: &Transform) -> Self;
}
impl TransformTrait for Shape {
    /// Rectangles become [Polygon]s under non-Manhattan transforms.
    fn transform(&self, trans: &Transform) -> Self {
        match self {
            Shape::Rect(r) if trans.is_manhattan() => Shape::Rect(Rect {
                p0: r.p0.transform(trans),
                p1: r.p1.transform(trans),
            }),
            Shape::Rect(r) => {
                let mut polys = r.to_polys();
                Shape::Polygon(polys.remove(0).transform(trans))
            }
            Shape::Polygon(p) => Shape::Polygon(p.transform(trans)),
            Shape::Path(p) => Shape::Path(p.transform(trans)),
            Shape::Circle(c) => Shape::Circle(c.transform(trans)),
        }
    }
}
impl TransformTrait for Polygon {
    fn transform(&self, trans: &Transform) -> Self {
        Polygon {
            points: self.points.iter().map(|p| p.transform(trans)).collect(),
        }
    }
}
impl TransformTrait for Path {
    fn transform(&self, trans: &Transform) -> Self {
        Path {
            points: self.points.iter().map(|p| p.transform(trans)).collect(),
            width: self.width,
        }
    }
}
impl TransformTrait for Circle {
    /// Rotation and translation only; radius is unchanged.
    fn transform(&self, trans: &Transform) -> Self {
        Circle {
            center: self.center.transform(trans),
            radius: self.radius,
        }
    }
}
impl TransformTrait for Element {
    fn transform(&self, trans: &Transform) -> Self {
        Element {
            layer: self.layer,
            inner: self.inner.transform(trans),
        }
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    fn unit_square() -> Shape {
        Shape::Rect(Rect {
            p0: Point::new(0., 0.),
            p1: Point::new(1., 1.),
        })
    }
    #[test]
    fn transform_identity() {
        let shape1 = unit_square();
        let shape2 = shape1.transform(&Transform::identity());
        assert_eq!(shape2, shape1);
    }
    #[test]
    fn transform_rotate() {
        let trans = Transform::rotate(90.);
        let shape2 = unit_square().transform(&trans);
        assert_eq!(
            shape2,
            Shape::Rect(Rect {
                p0: Point::new(0., 0.),
                p1: Point::new(-1., 1.),
            })
        );
        let shape0 = shape2
            .transform(&trans)
            .transform(&trans)
            .transform(&trans);
        assert_eq!(shape0, unit_square());
    }
    #[test]
    fn rotate_off_axis_makes_polygon() {
        let shape = unit_square().transform(&Transform::rotate(45.));
        match shape {
            Shape::Polygon(p) => {
                assert_eq!(p.points.len(), 4);
                assert!((p.signed_area() - 1.).abs() < 1e-9);
            }
            _ => panic!("expected a polygon"),
        }
    }
    #[test]
    fn test_cascade() {
        let rot = Transform::rotate(90.);
        let shift = Transform::translate(1., 1.);
        let p = Point::new(1., 0.);
        // Translate-then-rotate, as seen from the parent
        assert_eq!(
            p.transform(&Transform::cascade(&rot, &shift)),
            Point::new(-1., 2.)
        );
        assert_eq!(
            p.transform(&Transform::cascade(&shift, &rot)),
            Point::new(1., 2.)
        );
    }
    #[test]
    fn test_polygon_contains() {
        let triangle = Polygon {
            points: vec![Point::new(0., 0.), Point::new(2., 0.), Point::new(0., 2.)],
        };
        assert!(triangle.contains(&Point::new(0., 0.)));
        assert!(triangle.contains(&Point::new(1., 0.)));
        assert!(triangle.contains(&Point::new(1., 1.)));
        assert!(triangle.contains(&Point::new(0.5, 0.5)));
        assert!(!triangle.contains(&Point::new(2., 2.)));

        // U-shape inside a 10x10 square
        let u = Polygon {
            points: vec![
                Point::new(0., 0.),
                Point::new(0., 10.),
                Point::new(2., 10.),
                Point::new(2., 2.),
                Point::new(8., 2.),
                Point::new(8., 10.),
                Point::new(10., 10.),
                Point::new(10., 0.),
            ],
        };
        assert!(u.contains(&Point::new(1., 9.)));
        assert!(u.contains(&Point::new(9., 1.)));
        assert!(!u.contains(&Point::new(5., 5.)));
    }
    #[test]
    fn path_polys_fill_corners() {
        let path = Path {
            points: vec![Point::new(0., 0.), Point::new(10., 0.), Point::new(10., 10.)],
            width: 2.,
        };
        let polys = path.to_polys();
        assert_eq!(polys.len(), 2);
        // Outer corner of the bend is covered
        assert!(path.contains(&Point::new(10.9, -0.9)));
        // Flush ends
        assert!(!path.contains(&Point::new(-0.5, 0.)));
        assert!(!path.contains(&Point::new(10., 10.5)));
    }
    #[test]
    fn circle_polygon() {
        let c = Circle {
            center: Point::new(5., 5.),
            radius: 2.,
        };
        let polys = c.to_polys();
        assert_eq!(polys[0].points.len(), CIRCLE_POINTS);
        let area = polys[0].signed_area();
        assert!((area - std::f64::consts::PI * 4.).abs() < 0.01);
    }
}
