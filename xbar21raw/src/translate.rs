//!
//! # Rigid Moves
//!
//! Placed geometry only ever translates once created.
//! Rotation is fixed at instantiation, see [crate::Instance::rotated].
//!

use crate::{BoundBoxTrait, Element, Point, ShapeTrait};

/// Translation by a vector
pub trait Translate {
    fn translate(&mut self, v: Point);
}
impl Translate for Point {
    fn translate(&mut self, v: Point) {
        *self = *self + v;
    }
}
impl Translate for Element {
    fn translate(&mut self, v: Point) {
        self.inner.shift(&v);
    }
}

///
/// # Movable
///
/// Anything placed and bounded: instances, arrays, and the members of a [crate::Group].
/// Moves are stated as an `origin` point landing on a `dest` point,
/// where `origin` is typically a corner or edge-center of the bounding box.
///
pub trait Movable: Translate + BoundBoxTrait {
    /// Translate so that `origin` lands on `dest`
    fn move_to(&mut self, origin: Point, dest: Point) {
        self.translate(dest - origin);
    }
    /// Translate so that the bounding-box center lands on `dest`
    fn center_at(&mut self, dest: Point) {
        let center = self.bbox().center();
        self.move_to(center, dest);
    }
}
impl<T: Translate + BoundBoxTrait> Movable for T {}
