//!
//! # Rectangular Bounding Boxes and Associated Trait
//!

// Crates.io
use serde::{Deserialize, Serialize};

// Local imports
use crate::geom::{Element, Point, Shape, ShapeTrait};

/// # Rectangular Bounding Box
///
/// `p0` is the lower-left corner and `p1` the upper-right, whenever the box is non-empty.
///
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
pub struct BoundBox {
    pub p0: Point,
    pub p1: Point,
}
impl BoundBox {
    /// Box holding the single point `pt`
    pub fn from_point(pt: Point) -> Self {
        Self { p0: pt, p1: pt }
    }
    /// Box with corners `a` and `b`, in either order
    pub fn from_points(a: Point, b: Point) -> Self {
        Self {
            p0: Point::new(a.x.min(b.x), a.y.min(b.y)),
            p1: Point::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }
    /// Box of size `(w, h)` centered at `center`
    pub fn centered(center: Point, w: f64, h: f64) -> Self {
        let half = Point::new(w / 2., h / 2.);
        Self {
            p0: center - half,
            p1: center + half,
        }
    }
    /// The identity for [BoundBoxTrait::union]. Inverted, so that any union replaces it.
    pub fn empty() -> Self {
        Self {
            p0: Point::new(f64::INFINITY, f64::INFINITY),
            p1: Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }
    pub fn is_empty(&self) -> bool {
        self.p0.x > self.p1.x || self.p0.y > self.p1.y
    }
    /// Grow outward by `delta` on every side
    pub fn expand(&mut self, delta: f64) {
        let d = Point::new(delta, delta);
        self.p0 = self.p0 - d;
        self.p1 = self.p1 + d;
    }
    /// `(width, height)`
    pub fn size(&self) -> (f64, f64) {
        (self.width(), self.height())
    }
    pub fn width(&self) -> f64 {
        self.p1.x - self.p0.x
    }
    pub fn height(&self) -> f64 {
        self.p1.y - self.p0.y
    }
    pub fn center(&self) -> Point {
        Point::new((self.p0.x + self.p1.x) / 2., (self.p0.y + self.p1.y) / 2.)
    }
}

///
/// # Bounding Box Trait
///
/// Anything with a rectangular extent. Canvases, pad rows and labels are sized,
/// aligned and windowed through it.
///
pub trait BoundBoxTrait {
    /// Compute a rectangular bounding box around the implementing type.
    fn bbox(&self) -> BoundBox;
    /// Overlap with `other`, or [BoundBox::empty] if there is none
    fn intersection(&self, other: &BoundBox) -> BoundBox {
        let s = self.bbox();
        let overlap = BoundBox {
            p0: Point::new(s.p0.x.max(other.p0.x), s.p0.y.max(other.p0.y)),
            p1: Point::new(s.p1.x.min(other.p1.x), s.p1.y.min(other.p1.y)),
        };
        match overlap.is_empty() {
            true => BoundBox::empty(),
            false => overlap,
        }
    }
    /// Smallest box covering both `self` and `other`
    fn union(&self, other: &BoundBox) -> BoundBox {
        let s = self.bbox();
        BoundBox {
            p0: Point::new(s.p0.x.min(other.p0.x), s.p0.y.min(other.p0.y)),
            p1: Point::new(s.p1.x.max(other.p1.x), s.p1.y.max(other.p1.y)),
        }
    }
}

impl BoundBoxTrait for BoundBox {
    fn bbox(&self) -> BoundBox {
        *self
    }
}
impl BoundBoxTrait for Point {
    fn bbox(&self) -> BoundBox {
        BoundBox::from_point(*self)
    }
}
impl BoundBoxTrait for Vec<Point> {
    fn bbox(&self) -> BoundBox {
        self.iter()
            .fold(BoundBox::empty(), |bbox, pt| pt.union(&bbox))
    }
}
impl BoundBoxTrait for Shape {
    fn bbox(&self) -> BoundBox {
        match self {
            Shape::Rect(r) => BoundBox::from_points(r.p0, r.p1),
            Shape::Polygon(p) => p.points.bbox(),
            Shape::Circle(c) => {
                BoundBox::centered(c.center, 2. * c.radius, 2. * c.radius)
            }
            Shape::Path(p) => p
                .to_polys()
                .iter()
                .fold(BoundBox::empty(), |bbox, poly| poly.points.bbox().union(&bbox)),
        }
    }
}
impl BoundBoxTrait for Element {
    fn bbox(&self) -> BoundBox {
        self.inner.bbox()
    }
}
impl BoundBoxTrait for [Element] {
    fn bbox(&self) -> BoundBox {
        self.iter()
            .fold(BoundBox::empty(), |bbox, e| e.bbox().union(&bbox))
    }
}
