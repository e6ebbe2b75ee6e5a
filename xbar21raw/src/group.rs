//!
//! # Groups
//!
//! Transient handles over two or more placeables, aligned and distributed as a unit.
//! Members may come from different canvases.
//!

// Local imports
use crate::{
    AlignMode, BoundBox, BoundBoxTrait, Dir, LayoutError, LayoutResult, Movable, Point, Translate,
};

/// # Group
///
/// None of its operations resize or reshape members; each is a pure translation.
///
pub struct Group<'a> {
    members: Vec<&'a mut dyn Movable>,
}
impl<'a> Group<'a> {
    /// Create a [Group]. At least two members are required.
    pub fn new(members: Vec<&'a mut dyn Movable>) -> LayoutResult<Self> {
        if members.len() < 2 {
            return Err(LayoutError::geometry(format!(
                "Groups require at least two members, got {}",
                members.len()
            )));
        }
        Ok(Self { members })
    }
    pub fn len(&self) -> usize {
        self.members.len()
    }
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
    /// Union bounding box of all members
    pub fn bbox(&self) -> BoundBox {
        self.members
            .iter()
            .fold(BoundBox::empty(), |bbox, m| m.bbox().union(&bbox))
    }
    /// Snap every member's min, max, or center on one axis to the group's common value
    pub fn align(&mut self, mode: AlignMode) -> LayoutResult<&mut Self> {
        if mode.is_beside() {
            return Err(LayoutError::geometry(format!(
                "Unsupported group alignment {:?}",
                mode
            )));
        }
        let gbox = self.bbox();
        for m in self.members.iter_mut() {
            let delta = mode.delta(&m.bbox(), &gbox, 0.);
            m.translate(delta);
        }
        Ok(self)
    }
    /// Space members along `dir`, in order.
    /// The first stays put; each following member's min edge lands `spacing` past its predecessor's max edge.
    pub fn distribute(&mut self, dir: Dir, spacing: f64) -> &mut Self {
        let mut prev_max: Option<f64> = None;
        for m in self.members.iter_mut() {
            let b = m.bbox();
            if let Some(pmax) = prev_max {
                let target = pmax + spacing;
                m.translate(Point::offset(target - b.p0.coord(dir), dir));
                prev_max = Some(target + (b.p1.coord(dir) - b.p0.coord(dir)));
            } else {
                prev_max = Some(b.p1.coord(dir));
            }
        }
        self
    }
    /// Translate every member by `delta`
    pub fn move_by(&mut self, delta: Point) -> &mut Self {
        for m in self.members.iter_mut() {
            m.translate(delta);
        }
        self
    }
    /// Translate every member so that `origin` lands on `dest`
    pub fn move_to(&mut self, origin: Point, dest: Point) -> &mut Self {
        self.move_by(dest - origin)
    }
    /// Translate every member so that the group center lands on `dest`
    pub fn center_at(&mut self, dest: Point) -> &mut Self {
        let center = self.bbox().center();
        self.move_to(center, dest)
    }
}
