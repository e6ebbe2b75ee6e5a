//!
//! # Routing Engine
//!
//! Synthesizes the trace between a pad [Port] and a bar [Port].
//! Routes are pure functions of their endpoints and settings; nothing here touches a canvas.
//!
//! Two shapes are produced:
//! * Z-paths: a straight stub out of the source, one diagonal at the configured exit angle,
//!   and a straight run into the destination.
//! * Manhattan paths: a straight segment, or two segments joined by a single right-angle bend.
//!

// Crates.io
use serde::{Deserialize, Serialize};

// Workspace
use xbar21raw::{Dir, Element, Path, Point, Port, EPS};

/// # Route Kind
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RouteKind {
    /// Stub of `length1` out of the source, stub of `length2` out of the destination,
    /// joined by one straight diagonal
    Z { length1: f64, length2: f64 },
    /// Axis-aligned, with at most one bend
    Manhattan,
}

/// # Route Path
/// A fixed-width polyline on a single layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutePath {
    pub kind: RouteKind,
    pub layer: i16,
    pub path: Path,
}
impl RoutePath {
    pub fn points(&self) -> &[Point] {
        &self.path.points
    }
    pub fn width(&self) -> f64 {
        self.path.width
    }
    pub fn is_manhattan(&self) -> bool {
        self.kind == RouteKind::Manhattan
    }
    /// Convert to a drawable [Element]
    pub fn element(&self) -> Element {
        Element::new(self.layer, self.path.clone())
    }
}

/// Route from `source` to `dest`, with shape `kind`
pub fn route(source: &Port, dest: &Port, width: f64, layer: i16, kind: RouteKind) -> RoutePath {
    let (p1, p2) = (source.loc, dest.loc);
    let points = match kind {
        RouteKind::Z { length1, length2 } => vec![
            p1,
            p1 + source.orientation.unit() * length1,
            p2 + dest.orientation.unit() * length2,
            p2,
        ],
        RouteKind::Manhattan => {
            let corner = match source.orientation.dir() {
                Dir::Horiz => Point::new(p2.x, p1.y),
                Dir::Vert => Point::new(p1.x, p2.y),
            };
            vec![p1, corner, p2]
        }
    };
    RoutePath {
        kind,
        layer,
        path: Path {
            points: dedup(points),
            width,
        },
    }
}

/// Distances from `source` to `dest`, along and across the source's facing axis
pub fn deltas(source: &Port, dest: &Port) -> (f64, f64) {
    let dx = (source.loc.x - dest.loc.x).abs();
    let dy = (source.loc.y - dest.loc.y).abs();
    match source.orientation.dir() {
        Dir::Vert => (dy, dx),
        Dir::Horiz => (dx, dy),
    }
}

/// Destination-side stub length which makes the diagonal of a Z-path
/// leave a `stub`-length source stub at `theta` degrees from the source axis.
/// Returns `None` for degenerate geometry, where no diagonal exists.
pub fn z_offset(source: &Port, dest: &Port, stub: f64, theta: f64) -> Option<f64> {
    let (perp, par) = deltas(source, dest);
    if par <= EPS || perp <= EPS {
        return None;
    }
    Some(perp - stub - par / theta.to_radians().tan())
}

/// Route with a Z-path at exit angle `theta` degrees,
/// falling back to Manhattan when the endpoints leave no room for a diagonal.
pub fn route_at_angle(
    source: &Port,
    dest: &Port,
    stub: f64,
    theta: f64,
    width: f64,
    layer: i16,
) -> RoutePath {
    let kind = match z_offset(source, dest, stub, theta) {
        None => RouteKind::Manhattan,
        Some(offset) => {
            if offset < 0. {
                log::warn!(
                    "Route `{}` -> `{}` overshoots its destination by {:.3}; increase the pad spacing or exit angle",
                    source.name,
                    dest.name,
                    -offset
                );
            }
            RouteKind::Z {
                length1: stub,
                length2: offset,
            }
        }
    };
    route(source, dest, width, layer, kind)
}

/// Drop consecutive duplicate points
fn dedup(points: Vec<Point>) -> Vec<Point> {
    let mut out: Vec<Point> = Vec::with_capacity(points.len());
    for p in points {
        match out.last() {
            Some(last) if last.approx_eq(&p) => (),
            _ => out.push(p),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use xbar21raw::Orientation;

    fn pad(x: f64, y: f64) -> Port {
        Port::new("pb0", Point::new(x, y), 10., Orientation::North)
    }
    fn bar(x: f64, y: f64) -> Port {
        Port::new("b0", Point::new(x, y), 10., Orientation::South)
    }

    #[test]
    fn z_path_exit_angle() {
        let (src, dst) = (pad(-300., -500.), bar(-100., -55.));
        let r = route_at_angle(&src, &dst, 50., 30., 10., 1);
        let offset = match r.kind {
            RouteKind::Z { length1, length2 } => {
                assert_eq!(length1, 50.);
                length2
            }
            RouteKind::Manhattan => panic!("expected a Z-path"),
        };
        assert!((offset - (445. - 50. - 200. / 30f64.to_radians().tan())).abs() < 1e-9);
        let pts = r.points();
        assert_eq!(pts.len(), 4);
        assert_eq!(pts[0], src.loc);
        assert_eq!(pts[1], Point::new(-300., -450.));
        assert!(pts[2].approx_eq(&Point::new(-100., -55. - offset)));
        assert_eq!(pts[3], dst.loc);
        // The diagonal leans `theta` off the port axis
        let diag = pts[2] - pts[1];
        let ratio = diag.x.abs() / diag.y.abs();
        assert!((ratio - 30f64.to_radians().tan()).abs() < 1e-9);
        assert_eq!(r.width(), 10.);
        assert_eq!(r.element().layer, 1);
    }
    #[test]
    fn horizontal_sources() {
        let src = Port::new("pl0", Point::new(-500., -200.), 10., Orientation::East);
        let dst = Port::new("l0", Point::new(-105., -50.), 10., Orientation::West);
        assert_eq!(deltas(&src, &dst), (395., 150.));
        let r = route_at_angle(&src, &dst, 50., 45., 10., 3);
        let pts = r.points();
        assert_eq!(pts[1], Point::new(-450., -200.));
        let diag = pts[2] - pts[1];
        assert!((diag.x.abs() - diag.y.abs()).abs() < 1e-9);
        assert!((pts[2].y - -50.).abs() < 1e-9);
    }
    #[test]
    fn degenerate_falls_back_to_manhattan() {
        // Colinear
        let r = route_at_angle(&pad(0., -500.), &bar(0., -55.), 50., 45., 10., 1);
        assert!(r.is_manhattan());
        assert_eq!(r.points(), &[Point::new(0., -500.), Point::new(0., -55.)]);
        // Level
        let src = Port::new("pr0", Point::new(500., 0.), 10., Orientation::West);
        let dst = Port::new("b0", Point::new(0., 0.), 10., Orientation::South);
        assert!(z_offset(&src, &dst, 50., 45.).is_none());
        assert!(route_at_angle(&src, &dst, 50., 45., 10., 1).is_manhattan());
    }
    #[test]
    fn manhattan_bend() {
        let src = Port::new("pr0", Point::new(500., 100.), 10., Orientation::West);
        let dst = bar(-100., -55.);
        let r = route(&src, &dst, 10., 1, RouteKind::Manhattan);
        assert_eq!(
            r.points(),
            &[src.loc, Point::new(-100., 100.), dst.loc]
        );
        let r = route(&pad(-300., -500.), &dst, 10., 1, RouteKind::Manhattan);
        assert_eq!(r.points()[1], Point::new(-300., -55.));
    }
    #[test]
    fn idempotent() {
        let (src, dst) = (pad(-300., -500.), bar(-100., -55.));
        let a = route_at_angle(&src, &dst, 50., 45., 10., 1);
        let b = route_at_angle(&src, &dst, 50., 45., 10., 1);
        assert_eq!(a, b);
    }
}
