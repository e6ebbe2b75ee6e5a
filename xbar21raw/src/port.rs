//!
//! # Port Model
//!
//! Named, oriented attachment points, used as routing endpoints.
//!

// Crates.io
use serde::{Deserialize, Serialize};

// Local imports
use crate::{Dir, LayoutError, LayoutResult, Placeable, Point, EPS};

/// # Port Orientation
///
/// The outward-facing direction of a contact, in degrees counter-clockwise from +x.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    /// 0 degrees, facing +x
    East,
    /// 90 degrees, facing +y
    North,
    /// 180 degrees, facing -x
    West,
    /// 270 degrees, facing -y
    South,
}
impl Orientation {
    /// Create from an angle in degrees. Any multiple of 90 is accepted, e.g. -90 is South.
    pub fn from_degrees(angle: f64) -> LayoutResult<Self> {
        let quarter = angle / 90.;
        if (quarter - quarter.round()).abs() > EPS {
            return Err(LayoutError::geometry(format!(
                "Port orientation must be a multiple of 90 degrees, got {}",
                angle
            )));
        }
        Ok(match (quarter.round() as i64).rem_euclid(4) {
            0 => Self::East,
            1 => Self::North,
            2 => Self::West,
            _ => Self::South,
        })
    }
    pub fn degrees(&self) -> f64 {
        match self {
            Self::East => 0.,
            Self::North => 90.,
            Self::West => 180.,
            Self::South => 270.,
        }
    }
    /// Unit vector in the facing direction
    pub fn unit(&self) -> Point {
        match self {
            Self::East => Point::new(1., 0.),
            Self::North => Point::new(0., 1.),
            Self::West => Point::new(-1., 0.),
            Self::South => Point::new(0., -1.),
        }
    }
    /// The axis along which we face
    pub fn dir(&self) -> Dir {
        match self {
            Self::East | Self::West => Dir::Horiz,
            Self::North | Self::South => Dir::Vert,
        }
    }
    pub fn opposite(&self) -> Self {
        match self {
            Self::East => Self::West,
            Self::North => Self::South,
            Self::West => Self::East,
            Self::South => Self::North,
        }
    }
}

/// # Port
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Port {
    pub name: String,
    pub loc: Point,
    pub width: f64,
    pub orientation: Orientation,
    /// The array or instance this port is bound to, if any
    #[serde(skip)]
    pub parent: Option<Placeable>,
}
impl Port {
    pub fn new(name: impl Into<String>, loc: Point, width: f64, orientation: Orientation) -> Self {
        Self {
            name: name.into(),
            loc,
            width,
            orientation,
            parent: None,
        }
    }
    /// Bind to `parent`, consuming and returning `self`
    pub fn bound_to(mut self, parent: impl Into<Placeable>) -> Self {
        self.parent = Some(parent.into());
        self
    }
}
