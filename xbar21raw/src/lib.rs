//!
//! # Raw Layout
//!
//! Geometry, placement, and mask-export layer of xbar21.
//! Consists of geometric primitives, shared primitive shapes,
//! and mutable [Canvas]es which place, tile, group, and align them.
//!
//! Conversion to GDSII is supported via [gds::GdsExporter],
//! and SVG preview via [svg::SvgRenderer].
//!

// Internal modules & re-exports
pub use xbar21utils as utils;

pub mod error;
pub use error::*;

pub mod geom;
pub use geom::*;

pub mod bbox;
pub use bbox::*;

pub mod translate;
pub use translate::*;

pub mod align;
pub use align::*;

pub mod prims;
pub use prims::*;

pub mod port;
pub use port::*;

pub mod canvas;
pub use canvas::*;

pub mod group;
pub use group::*;

pub mod boolean;
pub mod gds;
pub mod svg;

#[cfg(test)]
mod tests;
