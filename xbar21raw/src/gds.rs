//!
//! # GDSII Export Module
//!
//! Converts a finished [Canvas] to a [gds21::GdsLibrary], and writes it to disk.
//!
//! Nested canvases become their own structs, referenced by `SREF`.
//! Prims and arrays are flattened into boundaries and paths of their parent struct.
//! Coordinates are converted from microns to 1nm database units.
//!

// Std-Lib
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

// Crates.io
use by_address::ByAddress;

// Local imports
use crate::utils::{DepOrder, DepOrderer, ErrorContext, ErrorHelper, Unwrapper};
use crate::{Canvas, Def, Element, Instance, LayoutError, LayoutResult, Point, Shape, ShapeTrait};

/// Database units per user unit (micron)
const DB_PER_UM: f64 = 1000.;

/// # Exporter
///
/// Persists a finished [Canvas].
/// Implementations choose the on-disk format; callers choose the directory and base name.
///
pub trait Exporter {
    /// Write `canvas` into directory `dir`, returning the path of the written file
    fn export(&self, canvas: &Canvas, dir: &Path, base: &str) -> LayoutResult<PathBuf>;
}

/// # GDSII Exporter
///
/// Writes `<dir>/<base>.gds`, with a top-level struct named `<base>`.
///
#[derive(Debug, Clone, Copy, Default)]
pub struct GdsExporter;

impl Exporter for GdsExporter {
    fn export(&self, canvas: &Canvas, dir: &Path, base: &str) -> LayoutResult<PathBuf> {
        let lib = GdsConverter::convert(canvas, base)?;
        std::fs::create_dir_all(dir)?;
        let path = dir.join(format!("{}.gds", base));
        lib.save(&path).map_err(|e| LayoutError::Export {
            message: format!("{:?}", e),
            stack: vec![ErrorContext::Library(base.to_string())],
        })?;
        log::info!("Wrote {}", path.display());
        Ok(path)
    }
}

/// # Gds21 Converter
/// Converts a top-level [Canvas] and everything it embeds to a [gds21::GdsLibrary].
#[derive(Debug)]
pub struct GdsConverter {
    /// Top-level struct and library name
    top: String,
    /// Struct names, per distinct sub-canvas
    names: HashMap<ByAddress<Arc<Canvas>>, String>,
    /// Context stack, for error reporting
    ctx: Vec<ErrorContext>,
}
impl GdsConverter {
    pub fn convert(canvas: &Canvas, top: impl Into<String>) -> LayoutResult<gds21::GdsLibrary> {
        let mut me = Self {
            top: top.into(),
            names: HashMap::new(),
            ctx: Vec::new(),
        };
        me.convert_all(canvas)
    }
    fn convert_all(&mut self, canvas: &Canvas) -> LayoutResult<gds21::GdsLibrary> {
        self.ctx.push(ErrorContext::Library(self.top.clone()));
        let mut lib = gds21::GdsLibrary::new(&self.top);
        lib.units = gds21::GdsUnits::new(1e-3, 1e-9);

        // Sub-canvases first, each after everything it references
        let roots: Vec<_> = canvas.subcanvases().into_iter().map(ByAddress).collect();
        let order = CanvasOrder::order(&roots)?;

        // Assign unique struct names. The top-level name is always reserved.
        let mut taken: HashSet<String> = HashSet::new();
        taken.insert(self.top.clone());
        for c in order.iter() {
            let base = match c.name.as_str() {
                "" => "canvas",
                s => s,
            };
            let mut name = base.to_string();
            let mut k = 1;
            while taken.contains(&name) {
                name = format!("{}_{}", base, k);
                k += 1;
            }
            taken.insert(name.clone());
            self.names.insert(c.clone(), name);
        }
        for c in order.iter() {
            let name = self.names.get(c).cloned().unwrapper(self, "Unnamed canvas")?;
            let s = self.convert_canvas(c, &name)?;
            lib.structs.push(s);
        }
        let top = self.top.clone();
        let s = self.convert_canvas(canvas, &top)?;
        lib.structs.push(s);
        self.ctx.pop();
        Ok(lib)
    }
    /// Convert a [Canvas] to a [gds21::GdsStruct] named `name`
    fn convert_canvas(&mut self, canvas: &Canvas, name: &str) -> LayoutResult<gds21::GdsStruct> {
        self.ctx.push(ErrorContext::Canvas(canvas.name.clone()));
        let mut elems = Vec::new();
        for inst in canvas.instances.values() {
            self.ctx.push(ErrorContext::Instance(inst.def.name().to_string()));
            match &inst.def {
                Def::Canvas(c) => elems.push(gds21::GdsElement::GdsStructRef(
                    self.convert_sref(c, inst)?,
                )),
                Def::Prim(_) => {
                    for e in inst.flatten().iter() {
                        elems.extend(self.convert_element(e)?);
                    }
                }
            }
            self.ctx.pop();
        }
        for arr in canvas.arrays.values() {
            self.ctx.push(ErrorContext::Array(arr.prim.name.clone()));
            for e in arr.flatten().iter() {
                elems.extend(self.convert_element(e)?);
            }
            self.ctx.pop();
        }
        for e in canvas.elems.iter() {
            elems.extend(self.convert_element(e)?);
        }
        self.ctx.pop();
        let mut s = gds21::GdsStruct::new(name);
        s.elems = elems;
        Ok(s)
    }
    /// Convert a sub-canvas [Instance] to a [gds21::GdsStructRef]
    fn convert_sref(&self, c: &Arc<Canvas>, inst: &Instance) -> LayoutResult<gds21::GdsStructRef> {
        let name = self
            .names
            .get(&ByAddress(c.clone()))
            .cloned()
            .unwrapper(self, format!("Canvas `{}` not ordered for export", c.name))?;
        let strans = inst.angle.map(|angle| gds21::GdsStrans {
            angle: Some(angle),
            ..Default::default()
        });
        Ok(gds21::GdsStructRef {
            name,
            xy: self.convert_point(&inst.loc)?,
            strans,
            ..Default::default()
        })
    }
    /// Convert an [Element] into one or more [gds21::GdsElement]s.
    ///
    /// Paths stay paths, with flush ends. Everything else becomes boundaries,
    /// circles included, via [ShapeTrait::to_polys].
    /// GDSII boundaries repeat their origin for closure,
    /// so an N-sided polygon is described by N+1 points.
    ///
    pub fn convert_element(&self, elem: &Element) -> LayoutResult<Vec<gds21::GdsElement>> {
        if let Shape::Path(path) = &elem.inner {
            let xy = path
                .points
                .iter()
                .map(|p| self.convert_point(p))
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(vec![gds21::GdsElement::GdsPath(gds21::GdsPath {
                layer: elem.layer,
                datatype: 0,
                xy,
                width: Some(self.convert_dist(path.width)?),
                path_type: Some(0),
                ..Default::default()
            })]);
        }
        let mut gds_elems = Vec::new();
        for poly in elem.inner.to_polys() {
            self.ensure(poly.points.len() >= 3, "Polygon with fewer than three points")?;
            let mut xy = poly
                .points
                .iter()
                .map(|p| self.convert_point(p))
                .collect::<Result<Vec<_>, _>>()?;
            xy.push(xy[0].clone());
            gds_elems.push(gds21::GdsElement::GdsBoundary(gds21::GdsBoundary {
                layer: elem.layer,
                datatype: 0,
                xy,
                ..Default::default()
            }));
        }
        Ok(gds_elems)
    }
    /// Convert a [Point] to database units, rounding to the nearest unit
    fn convert_point(&self, p: &Point) -> LayoutResult<gds21::GdsPoint> {
        Ok(gds21::GdsPoint::new(
            self.convert_dist(p.x)?,
            self.convert_dist(p.y)?,
        ))
    }
    fn convert_dist(&self, d: f64) -> LayoutResult<i32> {
        let db = (d * DB_PER_UM).round();
        if !db.is_finite() || db < i32::MIN as f64 || db > i32::MAX as f64 {
            return self.fail(format!("Coordinate {} out of GDSII range", d));
        }
        Ok(db as i32)
    }
}
impl ErrorHelper for GdsConverter {
    type Error = LayoutError;
    fn err(&self, msg: impl Into<String>) -> LayoutError {
        LayoutError::Export {
            message: msg.into(),
            stack: self.ctx.clone(),
        }
    }
}

/// Dependency ordering of nested canvases, deduplicated by address
struct CanvasOrder;
impl DepOrder for CanvasOrder {
    type Item = ByAddress<Arc<Canvas>>;
    type Error = LayoutError;

    fn process(item: &Self::Item, orderer: &mut DepOrderer<Self>) -> LayoutResult<()> {
        for c in item.subcanvases() {
            orderer.push(&ByAddress(c))?;
        }
        Ok(())
    }
    fn fail(item: &Self::Item) -> LayoutResult<()> {
        Err(LayoutError::Export {
            message: format!("Cyclic canvas reference at `{}`", item.name),
            stack: Vec::new(),
        })
    }
}
