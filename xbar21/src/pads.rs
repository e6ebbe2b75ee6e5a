//!
//! # Pad-Layout Strategies
//!
//! Each strategy places the bond pads, adds a [Port] to each,
//! labels them, and routes every pad port to its bar port.
//!
//! Every pad is a pair of concentric rectangles: an outer contact on its bar's layer,
//! and an inner bond pad on layer 4 (vertical bars) or 5 (horizontal bars).
//! Outer contacts of vertical-bar pads sit on the back stack; all else is on the front.
//!

// Crates.io
use enum_dispatch::enum_dispatch;

// Workspace
use xbar21raw::{
    AlignMode, AlignRect, ArrayKey, BoundBox, BoundBoxTrait, Dir, InstKey, Instance, LayoutError,
    LayoutResult, Movable, Point, Port, Prim,
};

// Local imports
use crate::{
    route, route_at_angle, Axis, LayoutContext, PadStyle, RouteKind, RoutePath, Side, SidePorts,
    Stack, LAYER_HBAR, LAYER_HPAD, LAYER_VBAR, LAYER_VPAD,
};

/// Distance from the outermost pad edge to its label
pub const LABEL_SPACE: f64 = 20.;

/// # Pad-Layout Capability
#[enum_dispatch]
pub trait PadLayout {
    /// Place pads and their ports.
    /// Returned ports are ordered along each side.
    fn place_pads(
        &self,
        ctx: &mut LayoutContext,
        bar_ports: &SidePorts,
    ) -> LayoutResult<PadPlacement>;
    /// Connect each pad port to its bar port.
    /// Each route is added to the canvas holding its bar port.
    fn route_pads(
        &self,
        ctx: &mut LayoutContext,
        bar_ports: &SidePorts,
        pad_ports: &SidePorts,
    ) -> LayoutResult<Vec<RoutePath>>;
}

/// # Pad-Layout Strategy
#[enum_dispatch(PadLayout)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Grid(Grid),
    HalfDensity(HalfDensity),
    Staggered(Staggered),
    SingleEdge(SingleEdge),
}
impl From<PadStyle> for Strategy {
    fn from(style: PadStyle) -> Self {
        match style {
            PadStyle::Grid => Grid.into(),
            PadStyle::HalfDensity => HalfDensity.into(),
            PadStyle::Staggered => Staggered.into(),
            PadStyle::SingleEdge => SingleEdge.into(),
        }
    }
}

/// # Pad Placement
#[derive(Debug, Clone, Default)]
pub struct PadPlacement {
    pub ports: SidePorts,
    pub rows: Vec<PadRow>,
    /// Label instances, on the front stack
    pub labels: Vec<InstKey>,
}

/// # Row of Pads
///
/// An array of outer contacts, and its concentric array of inner bond pads.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PadRow {
    /// Side of the bar field the row lies on
    pub side: Side,
    /// Axis of the bars the row connects to
    pub axis: Axis,
    pub outer: ArrayKey,
    /// Always on the front stack
    pub inner: ArrayKey,
    pub len: usize,
}
impl PadRow {
    /// Stack holding the outer contacts
    pub fn stack(&self) -> Stack {
        stack_of(self.axis)
    }
    /// Bounding box of the outer contacts
    pub fn bbox(&self, ctx: &LayoutContext) -> LayoutResult<BoundBox> {
        Ok(ctx.canvas(self.stack()).array(self.outer)?.bbox())
    }
}

/// Create a row of `count` pads, first cell at the origin.
/// Pads along the left and right sides are rotated a quarter turn.
fn add_row(ctx: &mut LayoutContext, side: Side, axis: Axis, count: usize) -> LayoutResult<PadRow> {
    if count == 0 {
        return Err(LayoutError::geometry(format!("Empty {:?} pad row", side)));
    }
    let [w, h, m] = ctx.params.pad_dimensions;
    let p = ctx.params.pad_pitch;
    let (w, h) = match side.axis() {
        Axis::Vertical => (w, h),
        Axis::Horizontal => (h, w),
    };
    let (outer_layer, inner_layer) = match axis {
        Axis::Vertical => (LAYER_VBAR, LAYER_VPAD),
        Axis::Horizontal => (LAYER_HBAR, LAYER_HPAD),
    };
    let outer: Prim = ctx.prims.rectangle(w + 2. * m, h + 2. * m, outer_layer);
    let inner: Prim = ctx.prims.rectangle(w, h, inner_layer);
    let (rows, cols, pitch) = match side.axis() {
        Axis::Vertical => (1, count, Point::new(p, 0.)),
        Axis::Horizontal => (count, 1, Point::new(0., p)),
    };
    let row = PadRow {
        side,
        axis,
        outer: ctx
            .canvas_mut(stack_of(axis))
            .add_array(outer, rows, cols, pitch),
        inner: ctx.front.add_array(inner, rows, cols, pitch),
        len: count,
    };
    Ok(row)
}

fn stack_of(axis: Axis) -> Stack {
    match axis {
        Axis::Vertical => Stack::Back,
        Axis::Horizontal => Stack::Front,
    }
}

/// Center both arrays of `row` at `center`
fn place_row(ctx: &mut LayoutContext, row: &PadRow, center: Point) -> LayoutResult<()> {
    ctx.canvas_mut(row.stack()).center_array(row.outer, center)?;
    ctx.front.center_array(row.inner, center)
}

/// Add a port to pad `slot` of `row`, on the contact edge facing the bars.
/// Its name carries the bar `index`, e.g. `pb3`.
fn add_pad_port(
    ctx: &mut LayoutContext,
    row: &PadRow,
    slot: usize,
    index: usize,
) -> LayoutResult<Port> {
    let b = row.bbox(ctx)?;
    let [w, _, m] = ctx.params.pad_dimensions;
    let along = w / 2. + m + slot as f64 * ctx.params.pad_pitch;
    let loc = match row.side {
        Side::Bottom => Point::new(b.p0.x + along, b.p1.y),
        Side::Top => Point::new(b.p0.x + along, b.p0.y),
        Side::Left => Point::new(b.p1.x, b.p0.y + along),
        Side::Right => Point::new(b.p0.x, b.p0.y + along),
    };
    let port = Port::new(
        format!("p{}{}", row.side.prefix(), index),
        loc,
        ctx.params.bar_width,
        row.side.inward(),
    )
    .bound_to(row.outer);
    ctx.canvas_mut(row.stack()).add_port(port.clone())?;
    Ok(port)
}

/// Add text labels beyond the outermost pad edge on `side`.
/// Each entry is a label and the coordinate of its pad center along the side.
fn add_labels(
    ctx: &mut LayoutContext,
    side: Side,
    rows: &[PadRow],
    entries: &[(String, f64)],
) -> LayoutResult<Vec<InstKey>> {
    let mut edge = BoundBox::empty();
    for row in rows.iter().filter(|r| r.side == side) {
        edge = row.bbox(ctx)?.union(&edge);
    }
    if edge.is_empty() {
        return Err(LayoutError::geometry(format!("No pads to label on {:?}", side)));
    }
    let size = ctx.params.text_size;
    let mut keys = Vec::with_capacity(entries.len());
    for (text, c) in entries.iter() {
        let c = *c;
        let layer = match side.axis() {
            Axis::Vertical => LAYER_VPAD,
            Axis::Horizontal => LAYER_HBAR,
        };
        let prim = ctx.prims.text(text, size, layer);
        let mut label = Instance::new(prim, Point::default());
        match side {
            Side::Bottom => {
                label = label.rotated(90.);
                label.align_beneath(BoundBox::from_point(Point::new(c, edge.p0.y)), LABEL_SPACE);
                label.align_centers_horizontally(BoundBox::from_point(Point::new(c, 0.)));
            }
            Side::Top => {
                label = label.rotated(90.);
                label.align_above(BoundBox::from_point(Point::new(c, edge.p1.y)), LABEL_SPACE);
                label.align_centers_horizontally(BoundBox::from_point(Point::new(c, 0.)));
            }
            Side::Left => {
                label.align_to_the_left_of(
                    BoundBox::from_point(Point::new(edge.p0.x, c)),
                    LABEL_SPACE,
                );
                label.align_centers_vertically(BoundBox::from_point(Point::new(0., c)));
            }
            Side::Right => {
                label.align_to_the_right_of(
                    BoundBox::from_point(Point::new(edge.p1.x, c)),
                    LABEL_SPACE,
                );
                label.align_centers_vertically(BoundBox::from_point(Point::new(0., c)));
            }
        }
        keys.push(ctx.front.add_instance(label));
    }
    Ok(keys)
}

/// Index labels for `ports`, whose names end in their bar index
fn index_labels(side: Side, ports: &[Port]) -> Vec<(String, f64)> {
    ports
        .iter()
        .map(|p| {
            let idx = p.name.trim_start_matches(|c: char| c.is_ascii_alphabetic());
            (idx.to_string(), side.along(&p.loc))
        })
        .collect()
}

/// Add a row of `bar_width` squares capping the bar ends on `side`,
/// the first landing on `dest`, the bar port of the first capped bar.
fn add_extenders(
    ctx: &mut LayoutContext,
    side: Side,
    count: usize,
    pitch: f64,
    dest: Point,
) -> LayoutResult<Option<ArrayKey>> {
    if count == 0 {
        return Ok(None);
    }
    let bw = ctx.params.bar_width;
    let (stack, layer) = match side.axis() {
        Axis::Vertical => (Stack::Back, LAYER_VBAR),
        Axis::Horizontal => (Stack::Front, LAYER_HBAR),
    };
    let square = ctx.prims.rectangle(bw, bw, layer);
    let (rows, cols, pitch) = match side.axis() {
        Axis::Vertical => (1, count, Point::new(pitch, 0.)),
        Axis::Horizontal => (count, 1, Point::new(0., pitch)),
    };
    let canvas = ctx.canvas_mut(stack);
    let key = canvas.add_array(square, rows, cols, pitch);
    let b = canvas.array(key)?.bbox();
    let origin = match side {
        Side::Top => Point::new(b.p0.x + bw / 2., b.p0.y),
        Side::Bottom => Point::new(b.p0.x + bw / 2., b.p1.y),
        Side::Right => Point::new(b.p0.x, b.p0.y + bw / 2.),
        Side::Left => Point::new(b.p1.x, b.p0.y + bw / 2.),
    };
    canvas.move_array(key, origin, dest)?;
    Ok(Some(key))
}

/// Add `route` to the canvas holding `dest`
fn connect(ctx: &mut LayoutContext, route: RoutePath, dest: &Port) -> LayoutResult<RoutePath> {
    let stack = ctx.owner(dest)?;
    ctx.canvas_mut(stack).add_element(route.element());
    Ok(route)
}

/// Route `pad` to `bar` at its axis's exit angle, and add the result
fn connect_at_angle(
    ctx: &mut LayoutContext,
    axis: Axis,
    pad: &Port,
    bar: &Port,
) -> LayoutResult<RoutePath> {
    let p = &ctx.params;
    let r = route_at_angle(
        pad,
        bar,
        p.pad_route_dist,
        p.theta(axis),
        p.bar_width,
        layer_of(axis),
    );
    connect(ctx, r, bar)
}

fn layer_of(axis: Axis) -> i16 {
    match axis {
        Axis::Vertical => LAYER_VBAR,
        Axis::Horizontal => LAYER_HBAR,
    }
}

fn get<'p>(ports: &'p [Port], idx: usize, what: &str) -> LayoutResult<&'p Port> {
    ports
        .get(idx)
        .ok_or_else(|| LayoutError::geometry(format!("Missing {} port {}", what, idx)))
}

/// Split `n` items into even and odd indices: `ceil(n/2)` and `floor(n/2)`
fn halves(n: usize) -> (usize, usize) {
    ((n + 1) / 2, n / 2)
}

/// # Grid
///
/// A full row of pads on each of the four sides, centered on its bars.
///
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Grid;

impl PadLayout for Grid {
    fn place_pads(
        &self,
        ctx: &mut LayoutContext,
        bar_ports: &SidePorts,
    ) -> LayoutResult<PadPlacement> {
        let mut placement = PadPlacement::default();
        for side in Side::ALL {
            let n = bar_ports.side(side).len();
            let row = add_row(ctx, side, side.axis(), n)?;
            let depth = ctx.params.pad_row_offset(side.axis());
            place_row(ctx, &row, side.point(0., depth))?;
            placement.rows.push(row);
            for i in 0..n {
                let port = add_pad_port(ctx, &row, i, i)?;
                placement.ports.side_mut(side).push(port);
            }
            let labels = index_labels(side, placement.ports.side(side));
            placement
                .labels
                .extend(add_labels(ctx, side, &placement.rows, &labels)?);
        }
        Ok(placement)
    }
    fn route_pads(
        &self,
        ctx: &mut LayoutContext,
        bar_ports: &SidePorts,
        pad_ports: &SidePorts,
    ) -> LayoutResult<Vec<RoutePath>> {
        let mut routes = Vec::new();
        for side in Side::ALL {
            let bars = bar_ports.side(side);
            for (i, bar) in bars.iter().enumerate() {
                let pad = get(pad_ports.side(side), i, "pad")?;
                routes.push(connect_at_angle(ctx, side.axis(), pad, bar)?);
            }
        }
        Ok(routes)
    }
}

/// # Half Density
///
/// Each bar is padded at one end only, alternating ends between neighbors:
/// even bars on the bottom and left, odd bars on the top and right.
/// The free ends are capped with extenders.
///
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HalfDensity;

impl HalfDensity {
    /// Which side, and which slot on it, carries bar `i` of `axis`
    pub fn slot(axis: Axis, i: usize) -> (Side, usize) {
        let (even, odd) = match axis {
            Axis::Vertical => (Side::Bottom, Side::Top),
            Axis::Horizontal => (Side::Left, Side::Right),
        };
        match i % 2 {
            0 => (even, i / 2),
            _ => (odd, (i - 1) / 2),
        }
    }
}

impl PadLayout for HalfDensity {
    fn place_pads(
        &self,
        ctx: &mut LayoutContext,
        bar_ports: &SidePorts,
    ) -> LayoutResult<PadPlacement> {
        let mut placement = PadPlacement::default();
        let offsets = ctx.params.pad_offsets;
        for (k, side) in Side::ALL.iter().enumerate() {
            let side = *side;
            let n = ctx.params.num(side.axis());
            let (even, odd) = halves(n);
            let count = match side {
                Side::Bottom | Side::Left => even,
                Side::Top | Side::Right => odd,
            };
            if count == 0 {
                continue;
            }
            let row = add_row(ctx, side, side.axis(), count)?;
            let depth = ctx.params.pad_row_offset(side.axis());
            place_row(ctx, &row, side.point(offsets[k], depth))?;
            placement.rows.push(row);
            for i in (0..n).filter(|i| Self::slot(side.axis(), *i).0 == side) {
                let port = add_pad_port(ctx, &row, Self::slot(side.axis(), i).1, i)?;
                placement.ports.side_mut(side).push(port);
            }
            let labels = index_labels(side, placement.ports.side(side));
            placement
                .labels
                .extend(add_labels(ctx, side, &placement.rows, &labels)?);
        }
        if placement.ports.len() != bar_ports.len() / 2 {
            return Err(LayoutError::geometry("Half-density pad count mismatch"));
        }
        Ok(placement)
    }
    fn route_pads(
        &self,
        ctx: &mut LayoutContext,
        bar_ports: &SidePorts,
        pad_ports: &SidePorts,
    ) -> LayoutResult<Vec<RoutePath>> {
        let bp = ctx.params.bar_pitch;
        let [nx, ny] = ctx.params.num_bars;
        let (nx_even, nx_odd) = halves(nx);
        let (ny_even, ny_odd) = halves(ny);
        // Cap the unpadded ends: top of even vertical bars, bottom of odd ones,
        // right of even horizontal bars, left of odd ones
        if let Some(t0) = bar_ports.top.first() {
            add_extenders(ctx, Side::Top, nx_even, 2. * bp, t0.loc)?;
        }
        if let Some(b1) = bar_ports.bottom.get(1) {
            add_extenders(ctx, Side::Bottom, nx_odd, 2. * bp, b1.loc)?;
        }
        if let Some(r0) = bar_ports.right.first() {
            add_extenders(ctx, Side::Right, ny_even, 2. * bp, r0.loc)?;
        }
        if let Some(l1) = bar_ports.left.get(1) {
            add_extenders(ctx, Side::Left, ny_odd, 2. * bp, l1.loc)?;
        }

        let mut routes = Vec::new();
        for axis in [Axis::Vertical, Axis::Horizontal] {
            for i in 0..ctx.params.num(axis) {
                let (side, slot) = Self::slot(axis, i);
                let bar = get(bar_ports.side(side), i, "bar")?;
                let pad = get(pad_ports.side(side), slot, "pad")?;
                routes.push(connect_at_angle(ctx, axis, pad, bar)?);
            }
        }
        Ok(routes)
    }
}

/// # Staggered
///
/// Two sub-rows per side, offset by half a pitch, so pads may be wider than the bar pitch allows.
/// Each bar has a pad at both ends: one in a near sub-row, the other in the far sub-row
/// across the field.
///
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Staggered;

impl Staggered {
    /// Centers of the (near, far) sub-rows on the first side of `axis`, bottom or left.
    /// The far row starts half a pitch along, and `stagger_gap` further out.
    fn centers(ctx: &LayoutContext, axis: Axis) -> (Point, Point) {
        let p = &ctx.params;
        let (w, h, m) = (p.pad_w(), p.pad_h(), p.pad_margin());
        let pitch = p.pad_pitch;
        let (near_n, far_n) = halves(p.num(axis));
        let span = |n: usize| (n.max(1) as f64 - 1.) * pitch + w + 2. * m;
        let near_lateral = -p.stagger_shift();
        let near_depth = p.pad_row_offset(axis);
        let far_lateral = near_lateral - span(near_n) / 2. + pitch / 2. + span(far_n) / 2.;
        let far_depth = near_depth + h + 2. * m + p.stagger_gap;
        let first = match axis {
            Axis::Vertical => Side::Bottom,
            Axis::Horizontal => Side::Left,
        };
        (
            first.point(near_lateral, near_depth),
            first.point(far_lateral, far_depth),
        )
    }
    /// Sides of `axis`, ordered (near, far) for bar `i`
    pub fn sides(axis: Axis, i: usize) -> (Side, Side) {
        let (first, second) = match axis {
            Axis::Vertical => (Side::Bottom, Side::Top),
            Axis::Horizontal => (Side::Left, Side::Right),
        };
        match i % 2 {
            0 => (first, second),
            _ => (second, first),
        }
    }
}

impl PadLayout for Staggered {
    fn place_pads(
        &self,
        ctx: &mut LayoutContext,
        _bar_ports: &SidePorts,
    ) -> LayoutResult<PadPlacement> {
        let mut placement = PadPlacement::default();
        for axis in [Axis::Vertical, Axis::Horizontal] {
            let n = ctx.params.num(axis);
            let (even, odd) = halves(n);
            let (near, far) = Self::centers(ctx, axis);
            let (first, second) = match axis {
                Axis::Vertical => (Side::Bottom, Side::Top),
                Axis::Horizontal => (Side::Left, Side::Right),
            };
            // Sub-row 1 holds the even bars, sub-row 2 the odd ones.
            // The second side mirrors the first, swapping depths, so sub-row 1 is far there.
            let mirror = |pt: Point, depth_from: Point| match axis {
                Axis::Vertical => Point::new(pt.x, -depth_from.y),
                Axis::Horizontal => Point::new(-depth_from.x, pt.y),
            };
            let layout = [
                (first, near, far),
                (second, mirror(near, far), mirror(far, near)),
            ];
            for (side, c1, c2) in layout {
                let row1 = add_row(ctx, side, axis, even)?;
                place_row(ctx, &row1, c1)?;
                placement.rows.push(row1);
                let row2 = match odd {
                    0 => None,
                    _ => {
                        let row = add_row(ctx, side, axis, odd)?;
                        place_row(ctx, &row, c2)?;
                        placement.rows.push(row);
                        Some(row)
                    }
                };
                for i in 0..n {
                    let port = match (i % 2, &row2) {
                        (0, _) => add_pad_port(ctx, &row1, i / 2, i)?,
                        (_, Some(row2)) => add_pad_port(ctx, row2, (i - 1) / 2, i)?,
                        (_, None) => return Err(LayoutError::geometry("Missing staggered sub-row")),
                    };
                    placement.ports.side_mut(side).push(port);
                }
                let labels = index_labels(side, placement.ports.side(side));
                placement
                    .labels
                    .extend(add_labels(ctx, side, &placement.rows, &labels)?);
            }
        }
        Ok(placement)
    }
    fn route_pads(
        &self,
        ctx: &mut LayoutContext,
        bar_ports: &SidePorts,
        pad_ports: &SidePorts,
    ) -> LayoutResult<Vec<RoutePath>> {
        let p = ctx.params.clone();
        let far_stub = p.pad_route_dist + p.stagger_gap + p.pad_h() + 2. * p.pad_margin();
        let mut routes = Vec::new();
        for axis in [Axis::Vertical, Axis::Horizontal] {
            for i in 0..p.num(axis) {
                let (near_side, far_side) = Self::sides(axis, i);
                let near_bar = get(bar_ports.side(near_side), i, "bar")?;
                let near_pad = get(pad_ports.side(near_side), i, "pad")?;
                let near = connect_at_angle(ctx, axis, near_pad, near_bar)?;

                // The far trace leaves at the same angle, from a longer stub
                let kind = match near.kind {
                    RouteKind::Z { length2, .. } => RouteKind::Z {
                        length1: far_stub,
                        length2,
                    },
                    RouteKind::Manhattan => RouteKind::Manhattan,
                };
                let far_bar = get(bar_ports.side(far_side), i, "bar")?;
                let far_pad = get(pad_ports.side(far_side), i, "pad")?;
                let far = route(far_pad, far_bar, p.bar_width, layer_of(axis), kind);
                routes.push(near);
                routes.push(connect(ctx, far, far_bar)?);
            }
        }
        Ok(routes)
    }
}

/// # Single Edge
///
/// Every pad in one column on the right edge:
/// vertical-bar pads first, then horizontal-bar pads, ascending.
///
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SingleEdge;

impl PadLayout for SingleEdge {
    fn place_pads(
        &self,
        ctx: &mut LayoutContext,
        _bar_ports: &SidePorts,
    ) -> LayoutResult<PadPlacement> {
        let p = ctx.params.clone();
        let [nx, ny] = p.num_bars;
        let (w, m, pitch) = (p.pad_w(), p.pad_margin(), p.pad_pitch);
        let side = Side::Right;
        let vrow = add_row(ctx, side, Axis::Vertical, nx)?;
        let hrow = add_row(ctx, side, Axis::Horizontal, ny)?;
        let center = side.point(0., p.pad_row_offset(Axis::Horizontal));
        {
            // Outer contacts span both stacks
            let members: Vec<&mut dyn Movable> = vec![
                ctx.back.array_mut(vrow.outer)?,
                ctx.front.array_mut(hrow.outer)?,
            ];
            xbar21raw::Group::new(members)?
                .align(AlignMode::CenterHorizontal)?
                .distribute(Dir::Vert, pitch - w - 2. * m)
                .center_at(center);
        }
        ctx.front
            .group(&[vrow.inner.into(), hrow.inner.into()])?
            .align(AlignMode::CenterHorizontal)?
            .distribute(Dir::Vert, pitch - w)
            .center_at(center);

        let mut placement = PadPlacement::default();
        placement.rows = vec![vrow, hrow];
        let mut labels = Vec::with_capacity(nx + ny);
        for i in 0..nx {
            let port = add_pad_port(ctx, &vrow, i, i)?;
            labels.push((format!("v{}", i), port.loc.y));
            placement.ports.right.push(port);
        }
        for j in 0..ny {
            let port = add_pad_port(ctx, &hrow, j, nx + j)?;
            labels.push((format!("h{}", j), port.loc.y));
            placement.ports.right.push(port);
        }
        placement.labels = add_labels(ctx, side, &placement.rows, &labels)?;
        Ok(placement)
    }
    fn route_pads(
        &self,
        ctx: &mut LayoutContext,
        bar_ports: &SidePorts,
        pad_ports: &SidePorts,
    ) -> LayoutResult<Vec<RoutePath>> {
        let [nx, ny] = ctx.params.num_bars;
        let (bw, bp) = (ctx.params.bar_width, ctx.params.bar_pitch);
        // Cap the left end of every horizontal bar, and the top of every vertical one
        let l0 = get(&bar_ports.left, 0, "bar")?.loc;
        add_extenders(ctx, Side::Left, ny, bp, l0)?;
        let t0 = get(&bar_ports.top, 0, "bar")?.loc;
        add_extenders(ctx, Side::Top, nx, bp, t0)?;

        let mut routes = Vec::with_capacity(nx + ny);
        for i in 0..nx {
            let pad = get(&pad_ports.right, i, "pad")?;
            let bar = get(&bar_ports.bottom, i, "bar")?;
            let r = route(pad, bar, bw, LAYER_VBAR, RouteKind::Manhattan);
            routes.push(connect(ctx, r, bar)?);
        }
        for j in 0..ny {
            let pad = get(&pad_ports.right, nx + j, "pad")?;
            let bar = get(&bar_ports.right, j, "bar")?;
            routes.push(connect_at_angle(ctx, Axis::Horizontal, pad, bar)?);
        }
        let crossing = SingleEdge::crossing_runs(bar_ports, pad_ports, nx);
        if crossing > 0 {
            log::warn!(
                "{} single-edge trace(s) run across later vertical bars and their traces on the back stack",
                crossing
            );
        }
        Ok(routes)
    }
}

impl SingleEdge {
    /// Number of vertical-bar traces whose horizontal run crosses the bars (and traces) to its right.
    /// That happens whenever the pad sits above its bar's bottom end.
    pub fn crossing_runs(bar_ports: &SidePorts, pad_ports: &SidePorts, nx: usize) -> usize {
        (0..nx.saturating_sub(1))
            .filter(|&i| match (pad_ports.right.get(i), bar_ports.bottom.get(i)) {
                (Some(pad), Some(bar)) => pad.loc.y > bar.loc.y,
                _ => false,
            })
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{draw_bars, DiodeArrayParams};

    fn ctx(style: PadStyle, num_bars: [usize; 2]) -> LayoutContext {
        let params = DiodeArrayParams {
            pad_style: style,
            num_bars,
            ..Default::default()
        };
        LayoutContext::new(params)
    }

    #[test]
    fn parity_policy() {
        assert_eq!(halves(3), (2, 1));
        assert_eq!(halves(4), (2, 2));
        assert_eq!(halves(1), (1, 0));
        assert_eq!(HalfDensity::slot(Axis::Vertical, 0), (Side::Bottom, 0));
        assert_eq!(HalfDensity::slot(Axis::Vertical, 3), (Side::Top, 1));
        assert_eq!(HalfDensity::slot(Axis::Horizontal, 4), (Side::Left, 2));
        assert_eq!(Staggered::sides(Axis::Horizontal, 1), (Side::Right, Side::Left));
    }
    #[test]
    fn strategy_from_style() {
        assert_eq!(Strategy::from(PadStyle::Grid), Strategy::Grid(Grid));
        assert_eq!(
            Strategy::from(PadStyle::SingleEdge),
            Strategy::SingleEdge(SingleEdge)
        );
    }
    #[test]
    fn grid_rows() -> LayoutResult<()> {
        let mut ctx = ctx(PadStyle::Grid, [3, 2]);
        let bars = draw_bars(&mut ctx)?;
        let pads = Grid.place_pads(&mut ctx, &bars.ports)?;
        assert_eq!(pads.rows.len(), 4);
        assert_eq!(pads.ports.bottom.len(), 3);
        assert_eq!(pads.ports.left.len(), 2);
        assert_eq!(pads.labels.len(), 10);

        // Bottom row: outer contacts 120 x 170, centered 530 below the origin
        let bottom = pads.rows[0];
        assert_eq!(bottom.stack(), Stack::Back);
        let b = bottom.bbox(&ctx)?;
        assert_eq!(b.center(), Point::new(0., -530.));
        assert_eq!(b.size(), (520., 170.));
        let inner = ctx.front.array(bottom.inner)?;
        assert_eq!(inner.center(), Point::new(0., -530.));
        assert_eq!(inner.size(), (500., 150.));

        // Ports on the contact edge facing the bars
        let pb0 = &pads.ports.bottom[0];
        assert_eq!(pb0.name, "pb0");
        assert_eq!(pb0.loc, Point::new(-200., -445.));
        assert_eq!(pb0.orientation, xbar21raw::Orientation::North);
        assert_eq!(ctx.owner(pb0)?, Stack::Back);
        let pr1 = &pads.ports.right[1];
        // Outer contact margin sits inside the spacing
        assert_eq!(pr1.loc.x, 105. + 400. - 10.);
        assert_eq!(pr1.loc.y, 100.);
        assert_eq!(ctx.owner(pr1)?, Stack::Front);
        Ok(())
    }
    #[test]
    fn labels_beyond_pads() -> LayoutResult<()> {
        let mut ctx = ctx(PadStyle::Grid, [3, 2]);
        let bars = draw_bars(&mut ctx)?;
        let pads = Grid.place_pads(&mut ctx, &bars.ports)?;
        let bottom = pads.rows[0].bbox(&ctx)?;
        let first = ctx.front.instance(pads.labels[0])?.bbox();
        assert!((first.p1.y - (bottom.p0.y - LABEL_SPACE)).abs() < 1e-9);
        assert!((first.center().x - -200.).abs() < 1e-9);

        let left = pads.rows[2].bbox(&ctx)?;
        let label = ctx.front.instance(pads.labels[6])?.bbox();
        assert!((label.p1.x - (left.p0.x - LABEL_SPACE)).abs() < 1e-9);
        Ok(())
    }
    #[test]
    fn half_density_rows() -> LayoutResult<()> {
        let mut ctx = ctx(PadStyle::HalfDensity, [3, 2]);
        let bars = draw_bars(&mut ctx)?;
        let pads = HalfDensity.place_pads(&mut ctx, &bars.ports)?;
        let names = |ports: &[Port]| -> Vec<String> { ports.iter().map(|p| p.name.clone()).collect() };
        assert_eq!(names(&pads.ports.bottom), ["pb0", "pb2"]);
        assert_eq!(names(&pads.ports.top), ["pt1"]);
        assert_eq!(names(&pads.ports.left), ["pl0"]);
        assert_eq!(names(&pads.ports.right), ["pr1"]);

        let routes = HalfDensity.route_pads(&mut ctx, &bars.ports, &pads.ports)?;
        assert_eq!(routes.len(), 5);
        // Extenders on both stacks: top of bars 0 and 2, bottom of 1, right of 0, left of 1
        assert_eq!(ctx.back.arrays.len(), 1 + 2 + 2);
        Ok(())
    }
    #[test]
    fn half_density_offsets() -> LayoutResult<()> {
        let mut ctx = LayoutContext::new(DiodeArrayParams {
            pad_style: PadStyle::HalfDensity,
            pad_offsets: [30., -40., 50., -60.],
            ..Default::default()
        });
        let bars = draw_bars(&mut ctx)?;
        let pads = HalfDensity.place_pads(&mut ctx, &bars.ports)?;
        // One row per side, in bottom, top, left, right order
        let expected = [
            Point::new(30., -530.),
            Point::new(-40., 530.),
            Point::new(-580., 50.),
            Point::new(580., -60.),
        ];
        assert_eq!(pads.rows.len(), 4);
        for (row, want) in pads.rows.iter().zip(expected.iter()) {
            let center = row.bbox(&ctx)?.center();
            assert!(center.approx_eq(want), "{:?} != {:?}", center, want);
        }
        let xs: Vec<f64> = pads.ports.bottom.iter().map(|p| p.loc.x).collect();
        assert!((xs[0] - -70.).abs() < 1e-9 && (xs[1] - 130.).abs() < 1e-9);
        assert!((pads.ports.top[0].loc.x - -40.).abs() < 1e-9);
        assert!((pads.ports.left[0].loc.y - 50.).abs() < 1e-9);
        assert!((pads.ports.right[0].loc.y - -60.).abs() < 1e-9);

        let routes = HalfDensity.route_pads(&mut ctx, &bars.ports, &pads.ports)?;
        assert_eq!(routes.len(), 5);
        Ok(())
    }
    #[test]
    fn staggered_gap() -> LayoutResult<()> {
        let mut ctx = LayoutContext::new(DiodeArrayParams {
            pad_style: PadStyle::Staggered,
            num_bars: [4, 3],
            stagger_gap: 30.,
            route_thetas: [30., 60.],
            ..Default::default()
        });
        let bars = draw_bars(&mut ctx)?;
        let pads = Staggered.place_pads(&mut ctx, &bars.ports)?;
        let (b1, b2) = (pads.rows[0].bbox(&ctx)?, pads.rows[1].bbox(&ctx)?);
        assert!((b2.p1.y - (b1.p0.y - 30.)).abs() < 1e-9);
        let (l1, l2) = (pads.rows[4].bbox(&ctx)?, pads.rows[5].bbox(&ctx)?);
        assert!((l2.p1.x - (l1.p0.x - 30.)).abs() < 1e-9);

        let routes = Staggered.route_pads(&mut ctx, &bars.ports, &pads.ports)?;
        assert_eq!(routes.len(), 14);
        let mut far_z = 0;
        for pair in routes.chunks(2) {
            if let RouteKind::Z { length1, .. } = pair[1].kind {
                assert_eq!(length1, 50. + 30. + 170.);
                far_z += 1;
            }
        }
        assert!(far_z > 0);
        // Vertical-bar traces come first; every diagonal holds its bank's angle
        for (k, r) in routes.iter().enumerate() {
            if r.is_manhattan() {
                continue;
            }
            let (vertical, theta) = match k < 8 {
                true => (true, 30_f64),
                false => (false, 60_f64),
            };
            let d = r.points()[2] - r.points()[1];
            let (along, across) = match vertical {
                true => (d.y.abs(), d.x.abs()),
                false => (d.x.abs(), d.y.abs()),
            };
            assert!((across / along - theta.to_radians().tan()).abs() < 1e-9);
        }
        Ok(())
    }
    #[test]
    fn staggered_rows() -> LayoutResult<()> {
        let mut ctx = ctx(PadStyle::Staggered, [4, 3]);
        let bars = draw_bars(&mut ctx)?;
        let pads = Staggered.place_pads(&mut ctx, &bars.ports)?;
        assert_eq!(pads.ports.bottom.len(), 4);
        assert_eq!(pads.ports.top.len(), 4);
        assert_eq!(pads.ports.left.len(), 3);
        assert_eq!(pads.ports.right.len(), 3);
        assert_eq!(pads.rows.len(), 8);

        let [b1, b2, t1, t2] = [pads.rows[0], pads.rows[1], pads.rows[2], pads.rows[3]];
        let (b1, b2) = (b1.bbox(&ctx)?, b2.bbox(&ctx)?);
        let (t1, t2) = (t1.bbox(&ctx)?, t2.bbox(&ctx)?);
        // Far bottom row: half a pitch along, just beyond the near one
        assert!((b2.p0.x - (b1.p0.x + 100.)).abs() < 1e-9);
        assert!((b2.p1.y - b1.p0.y).abs() < 1e-9);
        assert!((b1.center().x - -50.).abs() < 1e-9);
        // The top mirrors the bottom, with sub-rows swapped
        assert!((t1.center().y + b2.center().y).abs() < 1e-9);
        assert!((t2.center().y + b1.center().y).abs() < 1e-9);
        assert!((t1.center().x - b1.center().x).abs() < 1e-9);
        assert!((t2.center().x - b2.center().x).abs() < 1e-9);

        let routes = Staggered.route_pads(&mut ctx, &bars.ports, &pads.ports)?;
        assert_eq!(routes.len(), 14);
        // Near and far partners leave at the same angle
        for pair in routes.chunks(2) {
            match (pair[0].kind, pair[1].kind) {
                (RouteKind::Z { length2: a, .. }, RouteKind::Z { length2: b, length1 }) => {
                    assert_eq!(a, b);
                    assert_eq!(length1, 50. + 170.);
                }
                (RouteKind::Manhattan, RouteKind::Manhattan) => (),
                other => panic!("mismatched partners {:?}", other),
            }
        }
        Ok(())
    }
    #[test]
    fn single_edge_column() -> LayoutResult<()> {
        let mut ctx = ctx(PadStyle::SingleEdge, [3, 2]);
        let bars = draw_bars(&mut ctx)?;
        let pads = SingleEdge.place_pads(&mut ctx, &bars.ports)?;
        assert!(pads.ports.bottom.is_empty());
        assert_eq!(pads.ports.right.len(), 5);
        // Ascending, one pitch apart, across both stacks
        for pair in pads.ports.right.windows(2) {
            assert!((pair[1].loc.y - pair[0].loc.y - 200.).abs() < 1e-9);
            assert!((pair[1].loc.x - pair[0].loc.x).abs() < 1e-9);
        }
        assert_eq!(ctx.owner(&pads.ports.right[2])?, Stack::Back);
        assert_eq!(ctx.owner(&pads.ports.right[3])?, Stack::Front);
        // Outer and inner columns share a center
        let outer = pads.rows[0].bbox(&ctx)?.union(&pads.rows[1].bbox(&ctx)?);
        let inner = ctx
            .front
            .array(pads.rows[0].inner)?
            .bbox()
            .union(&ctx.front.array(pads.rows[1].inner)?.bbox());
        assert!(outer.center().approx_eq(&inner.center()));
        assert!(outer.center().approx_eq(&Point::new(105. + 400. + 75., 0.)));

        let routes = SingleEdge.route_pads(&mut ctx, &bars.ports, &pads.ports)?;
        assert_eq!(routes.len(), 5);
        assert!(routes[..3].iter().all(|r| r.is_manhattan()));
        // Every vertical-bar pad but the last sits below the bar ends
        assert_eq!(SingleEdge::crossing_runs(&bars.ports, &pads.ports, 3), 0);
        Ok(())
    }
    #[test]
    fn single_edge_crossings() -> LayoutResult<()> {
        let mut ctx = ctx(PadStyle::SingleEdge, [8, 8]);
        let bars = draw_bars(&mut ctx)?;
        let pads = SingleEdge.place_pads(&mut ctx, &bars.ports)?;
        // Bar ends at y = -355; vertical-bar pads at -1500, -1300, ... -100
        assert!((bars.ports.bottom[0].loc.y - -355.).abs() < 1e-9);
        assert!((pads.ports.right[6].loc.y - -300.).abs() < 1e-9);
        assert_eq!(SingleEdge::crossing_runs(&bars.ports, &pads.ports, 8), 1);

        // The pad at y = -300 runs across bar 7 and its trace
        let routes = SingleEdge.route_pads(&mut ctx, &bars.ports, &pads.ports)?;
        let run = routes[6].points();
        assert!((run[1].y - -300.).abs() < 1e-9);
        assert!(run[1].x < bars.ports.bottom[7].loc.x);
        assert!(routes[7].points()[1].y > run[1].y);
        Ok(())
    }
}
