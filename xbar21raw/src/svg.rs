//!
//! # SVG Preview Rendering
//!
//! A [Renderer] visualizes a finished [Canvas].
//! [SvgRenderer] writes a flat SVG: one group per layer, plus optional port arrows.
//!

// Std-Lib
use std::collections::BTreeMap;
use std::fmt::Write;
use std::path::PathBuf;

// Local imports
use crate::{
    BoundBoxTrait, Canvas, Def, LayoutError, LayoutResult, Point, Polygon, Port, ShapeTrait,
    Transform,
};

/// Margin around the rendered design, in user units
const MARGIN: f64 = 50.;

/// # Render Options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Draw the top-level canvas's ports
    pub show_ports: bool,
    /// Draw the ports of embedded sub-canvases
    pub show_subports: bool,
}

/// # Renderer
/// Produces a visual preview of a [Canvas]. Nothing is returned to the layout pass.
pub trait Renderer {
    fn render(&self, canvas: &Canvas, opts: &RenderOptions) -> LayoutResult<()>;
}

/// # SVG File Renderer
#[derive(Debug, Clone)]
pub struct SvgRenderer {
    pub path: PathBuf,
}
impl SvgRenderer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}
impl Renderer for SvgRenderer {
    fn render(&self, canvas: &Canvas, opts: &RenderOptions) -> LayoutResult<()> {
        let svg = to_svg(canvas, opts)?;
        std::fs::write(&self.path, svg)?;
        log::info!("Wrote preview {}", self.path.display());
        Ok(())
    }
}

fn layer_color(layer: i16) -> &'static str {
    match layer {
        0 => "#BBBBBB",
        1 => "#4ECDC4",
        2 => "#FF6B6B",
        3 => "#45B7D1",
        4 => "#FFEAA7",
        5 => "#DDA0DD",
        _ => "#96CEB4",
    }
}

/// Render `canvas` to an SVG document string
pub fn to_svg(canvas: &Canvas, opts: &RenderOptions) -> LayoutResult<String> {
    let mut bbox = canvas.bbox();
    if bbox.is_empty() {
        bbox = crate::BoundBox::from_point(Point::default());
    }
    bbox.expand(MARGIN);
    let (w, h) = bbox.size();

    let mut layers: BTreeMap<i16, Vec<Polygon>> = BTreeMap::new();
    for elem in canvas.flatten() {
        layers
            .entry(elem.layer)
            .or_default()
            .extend(elem.inner.to_polys());
    }

    let mut s = String::new();
    let fmt_err = |e: std::fmt::Error| LayoutError::msg(format!("SVG formatting failed: {}", e));
    writeln!(s, r#"<?xml version="1.0" encoding="UTF-8"?>"#).map_err(fmt_err)?;
    writeln!(
        s,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{} {} {} {}">"#,
        bbox.p0.x, -bbox.p1.y, w, h
    )
    .map_err(fmt_err)?;
    writeln!(s, r#"<title>{}</title>"#, canvas.name).map_err(fmt_err)?;
    // Layout-space y points up
    writeln!(s, r#"<g transform="scale(1,-1)">"#).map_err(fmt_err)?;
    for (layer, polys) in layers.iter() {
        writeln!(
            s,
            r#"<g id="layer{}" fill="{}" fill-opacity="0.6" stroke="none">"#,
            layer,
            layer_color(*layer)
        )
        .map_err(fmt_err)?;
        for poly in polys.iter() {
            let pts: Vec<String> = poly
                .points
                .iter()
                .map(|p| format!("{},{}", p.x, p.y))
                .collect();
            writeln!(s, r#"<polygon points="{}"/>"#, pts.join(" ")).map_err(fmt_err)?;
        }
        writeln!(s, "</g>").map_err(fmt_err)?;
    }

    let mut ports: Vec<Port> = Vec::new();
    if opts.show_ports {
        ports.extend(canvas.ports.values().cloned());
    }
    if opts.show_subports {
        collect_subports(canvas, &Transform::identity(), &mut ports);
    }
    if !ports.is_empty() {
        writeln!(s, r##"<g id="ports" fill="#FF0000" stroke="none">"##).map_err(fmt_err)?;
        for port in ports.iter() {
            let arrow = port_arrow(port);
            let pts: Vec<String> = arrow.iter().map(|p| format!("{},{}", p.x, p.y)).collect();
            writeln!(
                s,
                r#"<polygon points="{}"><title>{}</title></polygon>"#,
                pts.join(" "),
                port.name
            )
            .map_err(fmt_err)?;
        }
        writeln!(s, "</g>").map_err(fmt_err)?;
    }
    writeln!(s, "</g>").map_err(fmt_err)?;
    writeln!(s, "</svg>").map_err(fmt_err)?;
    Ok(s)
}

/// Collect the ports of every nested canvas, in top-level coordinates
fn collect_subports(canvas: &Canvas, trans: &Transform, out: &mut Vec<Port>) {
    for inst in canvas.instances.values() {
        if let Def::Canvas(sub) = &inst.def {
            let t = Transform::cascade(trans, &inst.transform());
            for port in sub.ports.values() {
                let mut p = port.clone();
                p.loc = port.loc.transform(&t);
                let facing = port.orientation.unit();
                let tip = Point::new(
                    t.a[0][0] * facing.x + t.a[0][1] * facing.y,
                    t.a[1][0] * facing.x + t.a[1][1] * facing.y,
                );
                let angle = tip.y.atan2(tip.x).to_degrees();
                if let Ok(o) = crate::Orientation::from_degrees(angle.round()) {
                    p.orientation = o;
                }
                out.push(p);
            }
            collect_subports(sub, &t, out);
        }
    }
}

/// Triangle pointing along the port's orientation, based on its edge
fn port_arrow(port: &Port) -> [Point; 3] {
    let u = port.orientation.unit();
    let n = Point::new(-u.y, u.x) * (port.width / 2.);
    [
        port.loc + n,
        port.loc + u * (port.width / 2.),
        port.loc - n,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Orientation, Prim};
    use std::sync::Arc;

    fn canvas() -> LayoutResult<Canvas> {
        let mut back = Canvas::new("back");
        back.add_prim(Prim::rectangle(10., 100., 1), Point::new(-5., -50.));
        back.add_port(Port::new("b0", Point::new(0., -50.), 10., Orientation::South))?;
        let mut front = Canvas::new("front");
        front.add_prim(Prim::rectangle(100., 10., 3), Point::new(-50., -5.));
        front.add_port(Port::new("l0", Point::new(-50., 0.), 10., Orientation::West))?;
        front.add_canvas(Arc::new(back), Point::default());
        Ok(front)
    }

    #[test]
    fn renders_layers() -> LayoutResult<()> {
        let svg = to_svg(&canvas()?, &RenderOptions::default())?;
        assert!(svg.starts_with("<?xml"));
        assert!(svg.contains(r#"id="layer1""#));
        assert!(svg.contains(r#"id="layer3""#));
        assert!(!svg.contains(r#"id="ports""#));
        assert!(svg.trim_end().ends_with("</svg>"));
        Ok(())
    }
    #[test]
    fn renders_ports() -> LayoutResult<()> {
        let c = canvas()?;
        let opts = RenderOptions {
            show_ports: true,
            show_subports: false,
        };
        let svg = to_svg(&c, &opts)?;
        assert!(svg.contains("<title>l0</title>"));
        assert!(!svg.contains("<title>b0</title>"));

        let opts = RenderOptions {
            show_ports: false,
            show_subports: true,
        };
        let svg = to_svg(&c, &opts)?;
        assert!(svg.contains("<title>b0</title>"));
        assert!(!svg.contains("<title>l0</title>"));
        Ok(())
    }
    #[test]
    fn writes_file() -> LayoutResult<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("preview.svg");
        SvgRenderer::new(&path).render(&canvas()?, &RenderOptions::default())?;
        assert!(path.exists());
        Ok(())
    }
}
