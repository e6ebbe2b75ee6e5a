//!
//! # xbar21
//!
//! Cross-bar diode array layout generator.
//!
//! A single sequential pass draws two perpendicular banks of bars on separate layer-stacks,
//! a diode contact at every crossing, bond pads around (or beside) the bar field,
//! and the traces connecting each pad to its bar end.
//! The back stack is then either embedded as-is, or inverted into a clear-field mask.
//!
//! ```no_run
//! use xbar21::{DiodeArray, DiodeArrayParams};
//! use xbar21::raw::gds::{Exporter, GdsExporter};
//!
//! let params = DiodeArrayParams::open("params.yaml")?;
//! let layout = DiodeArray::new(params)?.generate()?;
//! GdsExporter.export(&layout.canvas, std::path::Path::new("out"), &layout.canvas.name)?;
//! # Ok::<(), xbar21::raw::LayoutError>(())
//! ```
//!

// Crates.io
use serde::{Deserialize, Serialize};

// Workspace
pub use xbar21raw as raw;
pub use xbar21utils as utils;
use xbar21raw::{Canvas, LayoutError, LayoutResult, Port, PrimCache};

// Internal modules & re-exports
pub mod config;
pub use config::*;

pub mod bars;
pub use bars::*;

pub mod route;
pub use route::*;

pub mod pads;
pub use pads::*;

pub mod finish;
pub use finish::*;

pub mod cli;

/// # Layer-Stack
///
/// Each device is patterned on two stacks, each drawn into its own [Canvas].
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stack {
    /// Horizontal bars, diode contacts, bond pads, and labels
    Front,
    /// Vertical bars, their contact pads and traces
    Back,
}

/// # Layout Context
///
/// Everything a single layout pass mutates, passed by `&mut` through each stage.
///
#[derive(Debug)]
pub struct LayoutContext {
    pub params: DiodeArrayParams,
    pub front: Canvas,
    pub back: Canvas,
    pub prims: PrimCache,
}
impl LayoutContext {
    pub fn new(params: DiodeArrayParams) -> Self {
        let front = Canvas::new(params.name.clone());
        let back = Canvas::new(format!("{}_back", params.name));
        Self {
            params,
            front,
            back,
            prims: PrimCache::new(),
        }
    }
    pub fn canvas(&self, stack: Stack) -> &Canvas {
        match stack {
            Stack::Front => &self.front,
            Stack::Back => &self.back,
        }
    }
    pub fn canvas_mut(&mut self, stack: Stack) -> &mut Canvas {
        match stack {
            Stack::Front => &mut self.front,
            Stack::Back => &mut self.back,
        }
    }
    /// Find the stack whose canvas holds `port`
    pub fn owner(&self, port: &Port) -> LayoutResult<Stack> {
        for stack in [Stack::Front, Stack::Back] {
            if self.canvas(stack).ports.get(&port.name) == Some(port) {
                return Ok(stack);
            }
        }
        Err(LayoutError::geometry(format!(
            "Port `{}` is not on either stack",
            port.name
        )))
    }
}

/// # Generated Diode-Array Layout
#[derive(Debug)]
pub struct DiodeArrayLayout {
    /// Finished top-level canvas, with the back stack embedded
    pub canvas: Canvas,
    pub bars: BarPlacement,
    pub pads: PadPlacement,
    pub routes: Vec<RoutePath>,
}

/// # Diode-Array Generator
#[derive(Debug, Clone)]
pub struct DiodeArray {
    params: DiodeArrayParams,
    strategy: Strategy,
}
impl DiodeArray {
    /// Create a generator. Fails on invalid `params`, before any geometry is built.
    pub fn new(params: DiodeArrayParams) -> LayoutResult<Self> {
        params.validate()?;
        let strategy = Strategy::from(params.pad_style);
        Ok(Self { params, strategy })
    }
    pub fn params(&self) -> &DiodeArrayParams {
        &self.params
    }
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }
    /// Run the layout pass
    pub fn generate(&self) -> LayoutResult<DiodeArrayLayout> {
        let params = &self.params;
        log::info!(
            "Generating `{}`: {}x{} bars, {} pads",
            params.name,
            params.num_bars[0],
            params.num_bars[1],
            params.pad_style
        );
        let mut ctx = LayoutContext::new(params.clone());

        let mut bars = draw_bars(&mut ctx)?;
        bars.circles = Some(draw_circles(&mut ctx)?);
        log::debug!("Bars and contacts placed");

        let pads = self.strategy.place_pads(&mut ctx, &bars.ports)?;
        log::debug!(
            "Placed {} pad rows, {} pad ports",
            pads.rows.len(),
            pads.ports.len()
        );

        let routes = self.strategy.route_pads(&mut ctx, &bars.ports, &pads.ports)?;
        log::info!("Routed {} traces", routes.len());

        let LayoutContext { front, back, .. } = ctx;
        let canvas = finish(front, back, params.invert_back, params.pad_style)?;
        Ok(DiodeArrayLayout {
            canvas,
            bars,
            pads,
            routes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xbar21raw::{Orientation, Point};

    #[test]
    fn owner_lookup() -> LayoutResult<()> {
        let mut ctx = LayoutContext::new(DiodeArrayParams::default());
        assert_eq!(ctx.back.name, "diode_array_back");
        let port = Port::new("b0", Point::new(0., -55.), 10., Orientation::South);
        ctx.back.add_port(port.clone())?;
        assert_eq!(ctx.owner(&port)?, Stack::Back);

        // Same name, different port
        let other = Port::new("b0", Point::new(1., -55.), 10., Orientation::South);
        assert!(ctx.owner(&other).is_err());
        Ok(())
    }
    #[test]
    fn rejects_invalid_params() {
        let mut params = DiodeArrayParams::default();
        params.route_thetas = [45., 120.];
        assert!(DiodeArray::new(params).is_err());
    }
}
