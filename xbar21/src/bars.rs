//!
//! # Bars and Diode Contacts
//!
//! Both banks of bars are centered on the origin.
//! Vertical bars go on the back stack, horizontal bars on the front,
//! and every bar end gets a [Port] facing away from the field.
//!

// Crates.io
use serde::{Deserialize, Serialize};

// Workspace
use xbar21raw::{ArrayKey, BoundBoxTrait, LayoutResult, Orientation, Point, Port};

// Local imports
use crate::{Axis, LayoutContext};

/// Layer of the vertical bars and everything connecting to them
pub const LAYER_VBAR: i16 = 1;
/// Diode contact layer
pub const LAYER_CONTACT: i16 = 2;
/// Layer of the horizontal bars and everything connecting to them
pub const LAYER_HBAR: i16 = 3;
/// Inner bond pads of the vertical bars
pub const LAYER_VPAD: i16 = 4;
/// Inner bond pads of the horizontal bars
pub const LAYER_HPAD: i16 = 5;

/// # Side of the Bar Field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Bottom,
    Top,
    Left,
    Right,
}
impl Side {
    pub const ALL: [Side; 4] = [Side::Bottom, Side::Top, Side::Left, Side::Right];

    /// Axis of the bars ending on this side
    pub fn axis(&self) -> Axis {
        match self {
            Self::Bottom | Self::Top => Axis::Vertical,
            Self::Left | Self::Right => Axis::Horizontal,
        }
    }
    /// Facing of bar ends on this side, away from the field
    pub fn outward(&self) -> Orientation {
        match self {
            Self::Bottom => Orientation::South,
            Self::Top => Orientation::North,
            Self::Left => Orientation::West,
            Self::Right => Orientation::East,
        }
    }
    /// Facing of pad ports on this side, toward the field
    pub fn inward(&self) -> Orientation {
        self.outward().opposite()
    }
    /// Port-name prefix
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Bottom => "b",
            Self::Top => "t",
            Self::Left => "l",
            Self::Right => "r",
        }
    }
    /// Coordinate of `pt` running along this side
    pub fn along(&self, pt: &Point) -> f64 {
        match self.axis() {
            Axis::Vertical => pt.x,
            Axis::Horizontal => pt.y,
        }
    }
    /// The point `lateral` along this side and `depth` out from the origin
    pub fn point(&self, lateral: f64, depth: f64) -> Point {
        match self {
            Self::Bottom => Point::new(lateral, -depth),
            Self::Top => Point::new(lateral, depth),
            Self::Left => Point::new(-depth, lateral),
            Self::Right => Point::new(depth, lateral),
        }
    }
}

/// # Ports, per Side
/// Each list is ordered by index along its side.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SidePorts {
    pub bottom: Vec<Port>,
    pub top: Vec<Port>,
    pub left: Vec<Port>,
    pub right: Vec<Port>,
}
impl SidePorts {
    pub fn side(&self, side: Side) -> &[Port] {
        match side {
            Side::Bottom => &self.bottom,
            Side::Top => &self.top,
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }
    pub fn side_mut(&mut self, side: Side) -> &mut Vec<Port> {
        match side {
            Side::Bottom => &mut self.bottom,
            Side::Top => &mut self.top,
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }
    /// Total count, across all sides
    pub fn len(&self) -> usize {
        Side::ALL.iter().map(|s| self.side(*s).len()).sum()
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// # Bar Placement
#[derive(Debug, Clone)]
pub struct BarPlacement {
    /// Vertical bars, on the back stack
    pub vertical: ArrayKey,
    /// Horizontal bars, on the front stack
    pub horizontal: ArrayKey,
    /// Diode contacts, on the front stack
    pub circles: Option<ArrayKey>,
    pub ports: SidePorts,
}

/// Draw both banks of bars, and add a [Port] at each bar end
pub fn draw_bars(ctx: &mut LayoutContext) -> LayoutResult<BarPlacement> {
    let params = ctx.params.clone();
    let [nx, ny] = params.num_bars;
    let [l0, l1] = params.bar_lengths();
    let (bw, bp) = (params.bar_width, params.bar_pitch);

    let vbar = ctx.prims.rectangle(bw, l1, LAYER_VBAR);
    let vertical = ctx.back.add_array(vbar, 1, nx, Point::new(bp, 0.));
    ctx.back.center_array(vertical, Point::default())?;

    let hbar = ctx.prims.rectangle(l0, bw, LAYER_HBAR);
    let horizontal = ctx.front.add_array(hbar, ny, 1, Point::new(0., bp));
    ctx.front.center_array(horizontal, Point::default())?;

    let mut ports = SidePorts::default();
    let vb = ctx.back.array(vertical)?.bbox();
    for i in 0..nx {
        let x = vb.p0.x + bw / 2. + i as f64 * bp;
        for (side, y) in [(Side::Bottom, vb.p0.y), (Side::Top, vb.p1.y)] {
            let port = Port::new(
                format!("{}{}", side.prefix(), i),
                Point::new(x, y),
                bw,
                side.outward(),
            )
            .bound_to(vertical);
            ctx.back.add_port(port.clone())?;
            ports.side_mut(side).push(port);
        }
    }
    let hb = ctx.front.array(horizontal)?.bbox();
    for i in 0..ny {
        let y = hb.p0.y + bw / 2. + i as f64 * bp;
        for (side, x) in [(Side::Left, hb.p0.x), (Side::Right, hb.p1.x)] {
            let port = Port::new(
                format!("{}{}", side.prefix(), i),
                Point::new(x, y),
                bw,
                side.outward(),
            )
            .bound_to(horizontal);
            ctx.front.add_port(port.clone())?;
            ports.side_mut(side).push(port);
        }
    }
    Ok(BarPlacement {
        vertical,
        horizontal,
        circles: None,
        ports,
    })
}

/// Draw a diode contact at every bar crossing
pub fn draw_circles(ctx: &mut LayoutContext) -> LayoutResult<ArrayKey> {
    let [nx, ny] = ctx.params.num_bars;
    let bp = ctx.params.bar_pitch;
    let circle = ctx.prims.circle(ctx.params.circle_radius, LAYER_CONTACT);
    let key = ctx.front.add_array(circle, ny, nx, Point::new(bp, bp));
    ctx.front.center_array(key, Point::default())?;
    Ok(key)
}
