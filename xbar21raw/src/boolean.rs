//!
//! # Boolean Operations
//!
//! Region arithmetic over [Element]s, via [geo]'s boolean ops.
//! Circles enter as [crate::CIRCLE_POINTS]-gons, paths as per-segment quads.
//!
//! Results convert back to hole-free [Polygon]s: each hole is bridged to its
//! exterior ring by a zero-width cut, as GDSII boundaries cannot carry holes.
//!

// Crates.io
use geo::algorithm::{
    area::Area,
    bool_ops::BooleanOps,
    orient::{Direction, Orient},
};
use geo::{Coord, LineString, MultiPolygon};

// Local imports
use crate::{BoundBox, Element, Point, Polygon, ShapeTrait, EPS};

/// Convert a [Polygon] to its [geo] equivalent
pub fn to_geo(poly: &Polygon) -> geo::Polygon<f64> {
    let coords: Vec<Coord<f64>> = poly
        .points
        .iter()
        .map(|p| Coord { x: p.x, y: p.y })
        .collect();
    geo::Polygon::new(LineString::from(coords), vec![])
}

/// Union of every element's area, regardless of layer
pub fn union_all(elems: &[Element]) -> MultiPolygon<f64> {
    let mut acc = MultiPolygon::new(vec![]);
    for elem in elems {
        for poly in elem.inner.to_polys() {
            if poly.points.len() < 3 || poly.signed_area().abs() <= EPS {
                continue;
            }
            acc = acc.union(&MultiPolygon::new(vec![to_geo(&poly)]));
        }
    }
    acc
}

/// Region covered by rectangle `bbox`
pub fn rect_region(bbox: &BoundBox) -> MultiPolygon<f64> {
    let (p0, p1) = (bbox.p0, bbox.p1);
    let rect = Polygon {
        points: vec![
            p0,
            Point::new(p1.x, p0.y),
            p1,
            Point::new(p0.x, p1.y),
        ],
    };
    MultiPolygon::new(vec![to_geo(&rect)])
}

/// `a − b`
pub fn subtract(a: &MultiPolygon<f64>, b: &MultiPolygon<f64>) -> MultiPolygon<f64> {
    a.difference(b)
}

/// `a ∩ b`
pub fn intersect(a: &MultiPolygon<f64>, b: &MultiPolygon<f64>) -> MultiPolygon<f64> {
    a.intersection(b)
}

pub fn area(region: &MultiPolygon<f64>) -> f64 {
    region.unsigned_area()
}

/// Convert a region to hole-free [Polygon]s
pub fn to_polygons(region: &MultiPolygon<f64>) -> Vec<Polygon> {
    region
        .0
        .iter()
        .map(|p| keyhole(&p.orient(Direction::Default)))
        .collect()
}

/// Convert a region to [Element]s on `layer`
pub fn to_elements(region: &MultiPolygon<f64>, layer: i16) -> Vec<Element> {
    to_polygons(region)
        .into_iter()
        .map(|p| Element::new(layer, p))
        .collect()
}

/// Ring vertices, without the repeated closing point
fn ring(ls: &LineString<f64>) -> Vec<Point> {
    let mut pts: Vec<Point> = ls.0.iter().map(|c| Point::new(c.x, c.y)).collect();
    if pts.len() > 1 && pts.first() == pts.last() {
        pts.pop();
    }
    pts
}

/// Splice each hole into the exterior ring at its nearest vertex pair.
/// Expects a counter-clockwise exterior and clockwise holes.
fn keyhole(poly: &geo::Polygon<f64>) -> Polygon {
    let mut outer = ring(poly.exterior());
    for hole in poly.interiors() {
        let hole = ring(hole);
        if hole.is_empty() {
            continue;
        }
        let mut best = (0, 0, f64::INFINITY);
        for (i, o) in outer.iter().enumerate() {
            for (j, h) in hole.iter().enumerate() {
                let d = (*o - *h).norm();
                if d < best.2 {
                    best = (i, j, d);
                }
            }
        }
        let (i, j, _) = best;
        let mut spliced = Vec::with_capacity(outer.len() + hole.len() + 2);
        spliced.extend_from_slice(&outer[..=i]);
        spliced.extend(hole[j..].iter().chain(hole[..=j].iter()).copied());
        spliced.extend_from_slice(&outer[i..]);
        outer = spliced;
    }
    Polygon { points: outer }
}
