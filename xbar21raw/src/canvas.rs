//!
//! # Canvas
//!
//! A mutable design container: placed [Instance]s, tiled [Array]s,
//! free [Element]s such as routes, and named [Port]s.
//! Finished canvases are shared into other canvases through `Arc`.
//!

// Std-Lib
use std::sync::Arc;

// Crates.io
use indexmap::IndexMap;
use slotmap::{new_key_type, SlotMap};

// Local imports
use crate::utils::{ErrorContext, ErrorHelper, Unwrapper};
use crate::{
    BoundBox, BoundBoxTrait, Element, Group, LayoutError, LayoutResult, Movable, Point, Port,
    Prim, Transform, TransformTrait, Translate,
};

new_key_type! {
    /// Keys for [Instance] entries
    pub struct InstKey;
    /// Keys for [Array] entries
    pub struct ArrayKey;
}

/// # Placeable Reference
/// Either of the movable things a [Canvas] owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placeable {
    Instance(InstKey),
    Array(ArrayKey),
}
impl From<InstKey> for Placeable {
    fn from(k: InstKey) -> Self {
        Self::Instance(k)
    }
}
impl From<ArrayKey> for Placeable {
    fn from(k: ArrayKey) -> Self {
        Self::Array(k)
    }
}

/// # Instance Definition
/// What an [Instance] places: a [Prim], or a finished sub-[Canvas].
#[derive(Debug, Clone)]
pub enum Def {
    Prim(Prim),
    Canvas(Arc<Canvas>),
}
impl Def {
    /// Name of the prim or canvas placed
    pub fn name(&self) -> &str {
        match self {
            Self::Prim(p) => &p.name,
            Self::Canvas(c) => &c.name,
        }
    }
}
impl From<Prim> for Def {
    fn from(p: Prim) -> Self {
        Self::Prim(p)
    }
}
impl From<Arc<Canvas>> for Def {
    fn from(c: Arc<Canvas>) -> Self {
        Self::Canvas(c)
    }
}

/// # Placed Instance
#[derive(Debug, Clone)]
pub struct Instance {
    pub def: Def,
    /// Location of the definition's origin
    pub loc: Point,
    /// Counter-clockwise rotation in degrees, applied about the origin before translation
    pub angle: Option<f64>,
}
impl Instance {
    pub fn new(def: impl Into<Def>, loc: Point) -> Self {
        Self {
            def: def.into(),
            loc,
            angle: None,
        }
    }
    /// Set our rotation, consuming and returning `self`
    pub fn rotated(mut self, angle: f64) -> Self {
        self.angle = Some(angle);
        self
    }
    pub fn transform(&self) -> Transform {
        Transform::from_instance(&self.loc, self.angle)
    }
    /// Flatten to [Element]s in parent coordinates
    pub fn flatten(&self) -> Vec<Element> {
        let mut out = Vec::new();
        self.flatten_helper(&Transform::identity(), &mut out);
        out
    }
    fn flatten_helper(&self, trans: &Transform, out: &mut Vec<Element>) {
        let trans = Transform::cascade(trans, &self.transform());
        match &self.def {
            Def::Prim(prim) => out.extend(prim.elems.iter().map(|e| e.transform(&trans))),
            Def::Canvas(canvas) => canvas.flatten_helper(&trans, out),
        }
    }
}
impl BoundBoxTrait for Instance {
    fn bbox(&self) -> BoundBox {
        self.flatten().bbox()
    }
}
impl Translate for Instance {
    fn translate(&mut self, v: Point) {
        self.loc.translate(v);
    }
}

/// # Array
///
/// `rows × cols` repetitions of one [Prim] at fixed `pitch`.
/// Cell `(r, c)` sits at `loc + (c·pitch.x, r·pitch.y)`.
/// Moving the array translates every cell rigidly.
///
#[derive(Debug, Clone)]
pub struct Array {
    pub prim: Prim,
    pub rows: usize,
    pub cols: usize,
    pub pitch: Point,
    pub loc: Point,
}
impl Array {
    /// Origins of each cell, row by row
    pub fn cells(&self) -> impl Iterator<Item = Point> + '_ {
        (0..self.rows).flat_map(move |r| {
            (0..self.cols).map(move |c| {
                Point::new(
                    self.loc.x + c as f64 * self.pitch.x,
                    self.loc.y + r as f64 * self.pitch.y,
                )
            })
        })
    }
    pub fn len(&self) -> usize {
        self.rows * self.cols
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// Flatten to [Element]s in parent coordinates
    pub fn flatten(&self) -> Vec<Element> {
        let mut out = Vec::new();
        self.flatten_helper(&Transform::identity(), &mut out);
        out
    }
    fn flatten_helper(&self, trans: &Transform, out: &mut Vec<Element>) {
        for cell in self.cells() {
            let t = Transform::cascade(trans, &Transform::translate(cell.x, cell.y));
            out.extend(self.prim.elems.iter().map(|e| e.transform(&t)));
        }
    }
    pub fn xmin(&self) -> f64 {
        self.bbox().p0.x
    }
    pub fn xmax(&self) -> f64 {
        self.bbox().p1.x
    }
    pub fn ymin(&self) -> f64 {
        self.bbox().p0.y
    }
    pub fn ymax(&self) -> f64 {
        self.bbox().p1.y
    }
    pub fn center(&self) -> Point {
        self.bbox().center()
    }
    pub fn size(&self) -> (f64, f64) {
        self.bbox().size()
    }
}
impl BoundBoxTrait for Array {
    /// Union of the first and last cells
    fn bbox(&self) -> BoundBox {
        if self.is_empty() {
            return BoundBox::empty();
        }
        let pb = self.prim.bbox();
        let last = Point::new(
            (self.cols - 1) as f64 * self.pitch.x,
            (self.rows - 1) as f64 * self.pitch.y,
        );
        let first = BoundBox::from_points(pb.p0.shift(&self.loc), pb.p1.shift(&self.loc));
        let far = self.loc.shift(&last);
        first.union(&BoundBox::from_points(pb.p0.shift(&far), pb.p1.shift(&far)))
    }
}
impl Translate for Array {
    fn translate(&mut self, v: Point) {
        self.loc.translate(v);
    }
}

/// # Canvas
#[derive(Debug, Clone, Default)]
pub struct Canvas {
    pub name: String,
    pub instances: SlotMap<InstKey, Instance>,
    pub arrays: SlotMap<ArrayKey, Array>,
    /// Free-standing elements, e.g. routes and boolean results
    pub elems: Vec<Element>,
    /// Ports, keyed by name, in insertion order
    pub ports: IndexMap<String, Port>,
}
impl Canvas {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
    /// Create a [Canvas] holding solely `elems`
    pub fn from_elements(name: impl Into<String>, elems: Vec<Element>) -> Self {
        Self {
            name: name.into(),
            elems,
            ..Default::default()
        }
    }
    pub fn add_instance(&mut self, inst: Instance) -> InstKey {
        self.instances.insert(inst)
    }
    /// Place `prim` with its origin at `loc`
    pub fn add_prim(&mut self, prim: Prim, loc: Point) -> InstKey {
        self.add_instance(Instance::new(prim, loc))
    }
    /// Embed finished canvas `canvas` with its origin at `loc`
    pub fn add_canvas(&mut self, canvas: Arc<Canvas>, loc: Point) -> InstKey {
        self.add_instance(Instance::new(canvas, loc))
    }
    /// Tile `prim` into `rows × cols` cells at `pitch`, first cell at the origin
    pub fn add_array(&mut self, prim: Prim, rows: usize, cols: usize, pitch: Point) -> ArrayKey {
        self.arrays.insert(Array {
            prim,
            rows,
            cols,
            pitch,
            loc: Point::default(),
        })
    }
    pub fn add_element(&mut self, elem: Element) {
        self.elems.push(elem);
    }
    pub fn instance(&self, key: InstKey) -> LayoutResult<&Instance> {
        self.instances.get(key).unwrapper(self, "Instance not found")
    }
    pub fn instance_mut(&mut self, key: InstKey) -> LayoutResult<&mut Instance> {
        let err = self.err("Instance not found");
        self.instances.get_mut(key).ok_or(err)
    }
    pub fn array(&self, key: ArrayKey) -> LayoutResult<&Array> {
        self.arrays.get(key).unwrapper(self, "Array not found")
    }
    pub fn array_mut(&mut self, key: ArrayKey) -> LayoutResult<&mut Array> {
        let err = self.err("Array not found");
        self.arrays.get_mut(key).ok_or(err)
    }
    /// Mutable access to a [Placeable], as a [Movable]
    pub fn movable(&mut self, p: Placeable) -> LayoutResult<&mut dyn Movable> {
        let m: &mut dyn Movable = match p {
            Placeable::Instance(k) => self.instance_mut(k)?,
            Placeable::Array(k) => self.array_mut(k)?,
        };
        Ok(m)
    }
    /// Bounding box of a [Placeable]
    pub fn bbox_of(&self, p: Placeable) -> LayoutResult<BoundBox> {
        Ok(match p {
            Placeable::Instance(k) => self.instance(k)?.bbox(),
            Placeable::Array(k) => self.array(k)?.bbox(),
        })
    }
    /// Translate a [Placeable] so that `origin` lands on `dest`
    pub fn move_placeable(&mut self, p: Placeable, origin: Point, dest: Point) -> LayoutResult<()> {
        self.movable(p)?.move_to(origin, dest);
        Ok(())
    }
    /// Translate array `key` so that `origin` lands on `dest`
    pub fn move_array(&mut self, key: ArrayKey, origin: Point, dest: Point) -> LayoutResult<()> {
        self.move_placeable(key.into(), origin, dest)
    }
    /// Translate array `key` so that its center lands on `dest`
    pub fn center_array(&mut self, key: ArrayKey, dest: Point) -> LayoutResult<()> {
        let center = self.array(key)?.center();
        self.move_array(key, center, dest)
    }
    /// Create a [Group] over several of our placeables
    pub fn group(&mut self, members: &[Placeable]) -> LayoutResult<Group<'_>> {
        for (k, m) in members.iter().enumerate() {
            if members[..k].contains(m) {
                return self.fail("Duplicate group member");
            }
            self.bbox_of(*m)?;
        }
        let Canvas {
            instances, arrays, ..
        } = self;
        let mut insts: Vec<(InstKey, &mut Instance)> = instances.iter_mut().collect();
        let mut arrs: Vec<(ArrayKey, &mut Array)> = arrays.iter_mut().collect();
        let mut refs: Vec<&mut dyn Movable> = Vec::with_capacity(members.len());
        for m in members.iter() {
            let found: Option<&mut dyn Movable> = match m {
                Placeable::Instance(key) => insts
                    .iter()
                    .position(|(k, _)| k == key)
                    .map(|idx| insts.swap_remove(idx).1 as &mut dyn Movable),
                Placeable::Array(key) => arrs
                    .iter()
                    .position(|(k, _)| k == key)
                    .map(|idx| arrs.swap_remove(idx).1 as &mut dyn Movable),
            };
            match found {
                Some(r) => refs.push(r),
                None => return LayoutError::fail("Group member not found"),
            }
        }
        Group::new(refs)
    }
    /// Add a [Port]. Names are unique within a canvas.
    pub fn add_port(&mut self, port: Port) -> LayoutResult<()> {
        if self.ports.contains_key(&port.name) {
            return self.fail(format!("Duplicate port `{}`", port.name));
        }
        self.ports.insert(port.name.clone(), port);
        Ok(())
    }
    pub fn port(&self, name: &str) -> LayoutResult<&Port> {
        self.ports
            .get(name)
            .unwrapper(self, format!("Port `{}` not found", name))
    }
    /// Directly-embedded sub-canvases, in placement order
    pub fn subcanvases(&self) -> Vec<Arc<Canvas>> {
        self.instances
            .values()
            .filter_map(|inst| match &inst.def {
                Def::Canvas(c) => Some(c.clone()),
                Def::Prim(_) => None,
            })
            .collect()
    }
    /// Flatten to [Element]s, recursively through sub-canvases
    pub fn flatten(&self) -> Vec<Element> {
        let mut out = Vec::new();
        self.flatten_helper(&Transform::identity(), &mut out);
        out
    }
    fn flatten_helper(&self, trans: &Transform, out: &mut Vec<Element>) {
        for inst in self.instances.values() {
            inst.flatten_helper(trans, out);
        }
        for arr in self.arrays.values() {
            arr.flatten_helper(trans, out);
        }
        out.extend(self.elems.iter().map(|e| e.transform(trans)));
    }
}
impl BoundBoxTrait for Canvas {
    fn bbox(&self) -> BoundBox {
        let mut bbox = self.elems.bbox();
        for inst in self.instances.values() {
            bbox = inst.bbox().union(&bbox);
        }
        for arr in self.arrays.values() {
            bbox = arr.bbox().union(&bbox);
        }
        bbox
    }
}
impl ErrorHelper for Canvas {
    type Error = LayoutError;
    fn err(&self, msg: impl Into<String>) -> LayoutError {
        LayoutError::Geometry {
            message: msg.into(),
            stack: vec![ErrorContext::Canvas(self.name.clone())],
        }
    }
}
