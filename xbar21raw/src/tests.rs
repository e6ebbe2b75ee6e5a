//!
//! # xbar21raw unit tests
//!

use std::sync::Arc;

use super::*;

/// Create a [Canvas] with a 3-column array of 10x20 rectangles, used by a number of tests
fn pad_row() -> (Canvas, ArrayKey) {
    let mut canvas = Canvas::new("pads");
    let pad = Prim::rectangle(10., 20., 1);
    let key = canvas.add_array(pad, 1, 3, Point::new(50., 0.));
    (canvas, key)
}

#[test]
fn point() {
    let p = Point::new(1., 2.);
    assert_eq!(p.x, 1.);
    assert_eq!(p.y, 2.);
    assert_eq!(p + Point::new(1., 1.), Point::new(2., 3.));
    assert_eq!(-p, Point::new(-1., -2.));
}
#[test]
fn array_extents() -> LayoutResult<()> {
    let (mut canvas, key) = pad_row();
    let arr = canvas.array(key)?;
    assert_eq!(arr.len(), 3);
    assert_eq!(arr.xmin(), 0.);
    assert_eq!(arr.xmax(), 110.);
    assert_eq!(arr.ymax(), 20.);
    assert_eq!(arr.center(), Point::new(55., 10.));

    canvas.center_array(key, Point::new(0., -100.))?;
    let arr = canvas.array(key)?;
    assert_eq!(arr.center(), Point::new(0., -100.));
    assert_eq!(arr.size(), (110., 20.));
    // Every cell moved rigidly
    let cells: Vec<Point> = arr.cells().collect();
    assert_eq!(cells[0], Point::new(-55., -110.));
    assert_eq!(cells[2], Point::new(45., -110.));
    assert_eq!(arr.flatten().len(), 3);
    Ok(())
}
#[test]
fn move_by_corner() -> LayoutResult<()> {
    let (mut canvas, key) = pad_row();
    let origin = {
        let arr = canvas.array(key)?;
        Point::new(arr.xmin(), arr.ymax())
    };
    canvas.move_array(key, origin, Point::new(100., 0.))?;
    let arr = canvas.array(key)?;
    assert_eq!(arr.xmin(), 100.);
    assert_eq!(arr.ymax(), 0.);
    Ok(())
}
#[test]
fn duplicate_ports() -> LayoutResult<()> {
    let (mut canvas, key) = pad_row();
    let port = Port::new("pb0", Point::new(5., 20.), 4., Orientation::North).bound_to(key);
    canvas.add_port(port.clone())?;
    assert!(canvas.add_port(port).is_err());
    assert_eq!(canvas.port("pb0")?.parent, Some(Placeable::Array(key)));
    assert!(canvas.port("pb1").is_err());
    Ok(())
}
#[test]
fn group_align_distribute() -> LayoutResult<()> {
    let mut canvas = Canvas::new("pads");
    let big = Prim::rectangle(30., 10., 1);
    let small = Prim::rectangle(20., 10., 3);
    let a = canvas.add_array(big, 2, 1, Point::new(0., 50.));
    let b = canvas.add_array(small, 3, 1, Point::new(0., 50.));
    {
        let mut group = canvas.group(&[a.into(), b.into()])?;
        assert_eq!(group.len(), 2);
        group
            .align(AlignMode::CenterHorizontal)?
            .distribute(Dir::Vert, 40.)
            .center_at(Point::new(100., 0.));
    }
    let (a, b) = (canvas.array(a)?, canvas.array(b)?);
    // Aligned on x-centers
    assert_eq!(a.center().x, 100.);
    assert_eq!(b.center().x, 100.);
    // Spaced along y, order preserved
    assert_eq!(b.ymin() - a.ymax(), 40.);
    // Sizes untouched
    assert_eq!(a.size(), (30., 60.));
    assert_eq!(b.size(), (20., 110.));
    // Centered as a whole
    let total = a.bbox().union(&b.bbox());
    assert_eq!(total.center(), Point::new(100., 0.));
    Ok(())
}
#[test]
fn group_errors() -> LayoutResult<()> {
    let (mut canvas, key) = pad_row();
    assert!(canvas.group(&[key.into()]).is_err());
    assert!(canvas.group(&[key.into(), key.into()]).is_err());
    let other = canvas.add_array(Prim::rectangle(1., 1., 1), 1, 1, Point::default());
    let mut group = canvas.group(&[key.into(), other.into()])?;
    assert!(group.align(AlignMode::Beneath).is_err());
    Ok(())
}
#[test]
fn group_across_canvases() -> LayoutResult<()> {
    let (mut front, f) = pad_row();
    let (mut back, b) = pad_row();
    {
        let members: Vec<&mut dyn Movable> = vec![back.array_mut(b)?, front.array_mut(f)?];
        let mut group = Group::new(members)?;
        group.distribute(Dir::Vert, 5.);
    }
    assert_eq!(front.array(f)?.ymin(), 25.);
    assert_eq!(back.array(b)?.ymin(), 0.);
    Ok(())
}
#[test]
fn align_rotated_label() -> LayoutResult<()> {
    let pad = BoundBox::from_points(Point::new(-10., -40.), Point::new(10., -20.));
    let text = Prim::text("1234", 10., 4);
    let mut label = Instance::new(text, Point::default()).rotated(90.);
    label.align_beneath(pad, 20.);
    label.align_centers_horizontally(pad);
    let b = label.bbox();
    assert!((b.p1.y - -60.).abs() < 1e-9);
    assert!((b.center().x - 0.).abs() < 1e-9);
    // Rotated text is taller than it is wide
    assert!(b.height() > b.width());
    Ok(())
}
#[test]
fn nested_flatten() -> LayoutResult<()> {
    let (inner, _) = pad_row();
    let inner = Arc::new(inner);
    let mut outer = Canvas::new("outer");
    outer.add_instance(Instance::new(inner.clone(), Point::new(0., 100.)).rotated(90.));
    outer.add_canvas(inner, Point::new(0., 0.));
    let flat = outer.flatten();
    assert_eq!(flat.len(), 6);
    let b = outer.bbox();
    // The rotated copy spans x in [-20, 0] and y in [100, 210]
    assert_eq!(b.p0, Point::new(-20., 0.));
    assert_eq!(b.p1, Point::new(110., 210.));
    assert_eq!(outer.subcanvases().len(), 2);
    Ok(())
}
