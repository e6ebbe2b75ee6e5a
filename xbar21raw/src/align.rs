//!
//! # Alignment
//!
//! Placement of one [Movable] against a reference [BoundBox]:
//! flush with one of its edges, centered on it, or beside it across a gap.
//! [crate::Group] snaps its members to their common box with the same [AlignMode]s.
//!

use serde::{Deserialize, Serialize};

use crate::{BoundBox, BoundBoxTrait, Movable, Point, Translate};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlignMode {
    Left,
    Right,
    Bottom,
    Top,
    /// Match x-centers
    CenterHorizontal,
    /// Match y-centers
    CenterVertical,
    ToTheRight,
    ToTheLeft,
    Beneath,
    Above,
}
impl AlignMode {
    /// Whether this mode places beside the reference, rather than flush with or centered on it
    pub fn is_beside(&self) -> bool {
        matches!(
            self,
            Self::ToTheRight | Self::ToTheLeft | Self::Beneath | Self::Above
        )
    }
    /// Translation moving `sbox` into place against `obox`.
    /// `gap` separates the two boxes in the beside-modes, and is ignored otherwise.
    pub fn delta(&self, sbox: &BoundBox, obox: &BoundBox, gap: f64) -> Point {
        let (s, o) = (sbox, obox);
        match self {
            Self::Left => Point::new(o.p0.x - s.p0.x, 0.),
            Self::Right => Point::new(o.p1.x - s.p1.x, 0.),
            Self::Bottom => Point::new(0., o.p0.y - s.p0.y),
            Self::Top => Point::new(0., o.p1.y - s.p1.y),
            Self::CenterHorizontal => Point::new(o.center().x - s.center().x, 0.),
            Self::CenterVertical => Point::new(0., o.center().y - s.center().y),
            Self::ToTheRight => Point::new(o.p1.x + gap - s.p0.x, 0.),
            Self::ToTheLeft => Point::new(o.p0.x - gap - s.p1.x, 0.),
            Self::Beneath => Point::new(0., o.p0.y - gap - s.p1.y),
            Self::Above => Point::new(0., o.p1.y + gap - s.p0.y),
        }
    }
}

/// # Align-Against-Reference
///
/// Labels use this to sit beneath, above, or beside their pad rows.
/// Each method moves along one axis only, so a horizontal and a vertical call compose.
///
pub trait AlignRect: Movable {
    fn align(&mut self, mode: AlignMode, obox: BoundBox, gap: f64) -> &mut Self {
        let delta = mode.delta(&self.bbox(), &obox, gap);
        self.translate(delta);
        self
    }
    fn align_beneath(&mut self, other: BoundBox, gap: f64) {
        self.align(AlignMode::Beneath, other, gap);
    }
    fn align_above(&mut self, other: BoundBox, gap: f64) {
        self.align(AlignMode::Above, other, gap);
    }
    fn align_to_the_left_of(&mut self, other: BoundBox, gap: f64) {
        self.align(AlignMode::ToTheLeft, other, gap);
    }
    fn align_to_the_right_of(&mut self, other: BoundBox, gap: f64) {
        self.align(AlignMode::ToTheRight, other, gap);
    }
    fn align_centers_horizontally(&mut self, other: BoundBox) {
        self.align(AlignMode::CenterHorizontal, other, 0.);
    }
    fn align_centers_vertically(&mut self, other: BoundBox) {
        self.align(AlignMode::CenterVertical, other, 0.);
    }
}
impl<T: Movable> AlignRect for T {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn beside_with_gap() {
        let o = BoundBox::from_points(Point::new(0., 0.), Point::new(10., 10.));
        let s = BoundBox::from_points(Point::new(100., 100.), Point::new(104., 102.));
        assert_eq!(AlignMode::ToTheLeft.delta(&s, &o, 3.), Point::new(-107., 0.));
        assert_eq!(AlignMode::Above.delta(&s, &o, 3.), Point::new(0., -87.));
        assert_eq!(AlignMode::CenterVertical.delta(&s, &o, 3.), Point::new(0., -96.));
        assert!(AlignMode::Beneath.is_beside());
        assert!(!AlignMode::Top.is_beside());
    }
}
