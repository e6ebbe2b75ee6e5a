//!
//! # Primitive Shape Factories
//!
//! A [Prim] is an immutable, shared set of [Element]s,
//! created once per distinct size and layer, and placed any number of times
//! through [crate::Instance]s and [crate::Array]s.
//!

// Std-Lib
use std::collections::HashMap;
use std::ops::Deref;
use std::sync::Arc;

// Crates.io
use serde::Serialize;

// Local imports
use crate::{BoundBox, BoundBoxTrait, Circle, Element, Point, Polygon, Rect, Shape, ShapeTrait};

/// # Primitive Contents
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct PrimData {
    /// Descriptive name, unique per size and layer
    pub name: String,
    pub elems: Vec<Element>,
}

/// # Shared Primitive
#[derive(Debug, Clone, PartialEq)]
pub struct Prim(Arc<PrimData>);

impl Deref for Prim {
    type Target = PrimData;
    fn deref(&self) -> &PrimData {
        &self.0
    }
}
impl BoundBoxTrait for Prim {
    fn bbox(&self) -> BoundBox {
        self.elems.bbox()
    }
}

impl Prim {
    pub fn new(name: impl Into<String>, elems: Vec<Element>) -> Self {
        Self(Arc::new(PrimData {
            name: name.into(),
            elems,
        }))
    }
    /// Boolean indication of whether `self` and `other` share the same definition
    pub fn ptr_eq(&self, other: &Prim) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
    /// Axis-aligned rectangle of size `(w, h)`, lower-left corner at the origin
    pub fn rectangle(w: f64, h: f64, layer: i16) -> Self {
        let r = Rect {
            p0: Point::new(0., 0.),
            p1: Point::new(w, h),
        };
        Self::new(
            format!("rect_{}x{}_l{}", w, h, layer),
            vec![Element::new(layer, r)],
        )
    }
    /// Circle of `radius`, centered at the origin
    pub fn circle(radius: f64, layer: i16) -> Self {
        let c = Circle {
            center: Point::new(0., 0.),
            radius,
        };
        Self::new(
            format!("circle_{}_l{}", radius, layer),
            vec![Element::new(layer, c)],
        )
    }
    /// Text `s` of height `size`, baseline-left at the origin.
    ///
    /// Glyphs are composed of segment rectangles:
    /// seven-segment digits, lowercase `v` and `h`, and an outlined box for anything else.
    pub fn text(s: &str, size: f64, layer: i16) -> Self {
        let mut elems = Vec::new();
        let advance = size * 0.8;
        for (k, ch) in s.chars().enumerate() {
            let x0 = advance * k as f64;
            for mut shape in glyph(ch, size) {
                shape.shift(&Point::new(x0, 0.));
                elems.push(Element {
                    layer,
                    inner: shape,
                });
            }
        }
        Self::new(format!("text_{}_{}_l{}", s, size, layer), elems)
    }
}

/// Segment geometry for a single character of height `h`
fn glyph(ch: char, h: f64) -> Vec<Shape> {
    let w = h * 0.6;
    let t = h / 7.;
    let xh = h * 0.6;
    let rect = |x0: f64, y0: f64, x1: f64, y1: f64| -> Shape {
        Rect {
            p0: Point::new(x0, y0),
            p1: Point::new(x1, y1),
        }
        .into()
    };
    let seg = |s: char| -> Shape {
        match s {
            'a' => rect(0., h - t, w, h),
            'b' => rect(w - t, h / 2., w, h),
            'c' => rect(w - t, 0., w, h / 2.),
            'd' => rect(0., 0., w, t),
            'e' => rect(0., 0., t, h / 2.),
            'f' => rect(0., h / 2., t, h),
            _ => rect(0., (h - t) / 2., w, (h + t) / 2.),
        }
    };
    let segs = match ch {
        '0' => "abcdef",
        '1' => "bc",
        '2' => "abdeg",
        '3' => "abcdg",
        '4' => "bcfg",
        '5' => "acdfg",
        '6' => "acdefg",
        '7' => "abc",
        '8' => "abcdefg",
        '9' => "abcdfg",
        'v' => {
            let pts = [
                (0., xh),
                (w / 2. - t / 2., 0.),
                (w / 2. + t / 2., 0.),
                (w, xh),
                (w - t, xh),
                (w / 2., 1.5 * t),
                (t, xh),
            ];
            let points = pts.iter().map(|&(x, y)| Point::new(x, y)).collect();
            return vec![Polygon { points }.into()];
        }
        'h' => {
            return vec![
                rect(0., 0., t, h),
                rect(0., xh - t, w, xh),
                rect(w - t, 0., w, xh),
            ]
        }
        _ => {
            return vec![
                rect(0., 0., w, t),
                rect(0., h - t, w, h),
                rect(0., 0., t, h),
                rect(w - t, 0., w, h),
            ]
        }
    };
    segs.chars().map(seg).collect()
}

/// # Primitive Cache
///
/// Returns the same [Prim] for repeated requests of the same size and layer.
///
#[derive(Debug, Clone, Default)]
pub struct PrimCache {
    prims: HashMap<String, Prim>,
}
impl PrimCache {
    pub fn new() -> Self {
        Self::default()
    }
    fn get_or_insert(&mut self, prim: Prim) -> Prim {
        self.prims
            .entry(prim.name.clone())
            .or_insert(prim)
            .clone()
    }
    pub fn rectangle(&mut self, w: f64, h: f64, layer: i16) -> Prim {
        self.get_or_insert(Prim::rectangle(w, h, layer))
    }
    pub fn circle(&mut self, radius: f64, layer: i16) -> Prim {
        self.get_or_insert(Prim::circle(radius, layer))
    }
    pub fn text(&mut self, s: &str, size: f64, layer: i16) -> Prim {
        self.get_or_insert(Prim::text(s, size, layer))
    }
    pub fn len(&self) -> usize {
        self.prims.len()
    }
    pub fn is_empty(&self) -> bool {
        self.prims.is_empty()
    }
}
