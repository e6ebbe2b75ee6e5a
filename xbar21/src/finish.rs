//!
//! # Mask Finishing
//!
//! Combines the two stacks into one top-level [Canvas].
//! The back stack is embedded either as drawn, or inverted: the clear-field complement
//! of its geometry within a window slightly larger than the device.
//!

// Std-Lib
use std::sync::Arc;

// Workspace
use xbar21raw::boolean::{rect_region, subtract, to_elements, union_all};
use xbar21raw::{BoundBox, BoundBoxTrait, Canvas, LayoutResult, Point};

// Local imports
use crate::{PadStyle, LAYER_VBAR};

/// Growth of the inversion window over the device, in each dimension
pub const INVERT_MARGIN: f64 = 20.;

/// Embed `back` into `front`, inverted if `invert` is set
pub fn finish(
    mut front: Canvas,
    back: Canvas,
    invert: bool,
    style: PadStyle,
) -> LayoutResult<Canvas> {
    let back = match invert {
        false => back,
        true => invert_back(&front, &back, style)?,
    };
    front.add_canvas(Arc::new(back), Point::default());
    Ok(front)
}

/// Inversion window for `style`
pub fn invert_window(front: &Canvas, back: &Canvas, style: PadStyle) -> BoundBox {
    match style {
        // Pads hang off one side, so the device is not centered on the origin
        PadStyle::SingleEdge => {
            let total = front.bbox().union(&back.bbox());
            BoundBox::centered(
                total.center(),
                total.width() + INVERT_MARGIN,
                total.height() + INVERT_MARGIN,
            )
        }
        _ => BoundBox::centered(
            Point::default(),
            front.bbox().width() + INVERT_MARGIN,
            back.bbox().height() + INVERT_MARGIN,
        ),
    }
}

/// Create the inverted back stack: the window minus everything drawn on `back`
pub fn invert_back(front: &Canvas, back: &Canvas, style: PadStyle) -> LayoutResult<Canvas> {
    let window = invert_window(front, back, style);
    let drawn = union_all(&back.flatten());
    let region = subtract(&rect_region(&window), &drawn);
    let elems = to_elements(&region, LAYER_VBAR);
    log::info!(
        "Inverted back stack: {:.1} x {:.1} window, {} polygons",
        window.width(),
        window.height(),
        elems.len()
    );
    let mut inverted = Canvas::from_elements(format!("{}_inverted", front.name), elems);
    // Ports survive inversion, detached from the arrays they were bound to
    for port in back.ports.values() {
        let mut port = port.clone();
        port.parent = None;
        inverted.add_port(port)?;
    }
    Ok(inverted)
}
