use page_packer_core::model::{Item, Rect};

#[test]
fn intersects_ignores_touching_edges() {
    let a = Rect::new(0, 0, 10, 10);
    assert!(!a.intersects(&Rect::new(10, 0, 5, 5)));
    assert!(!a.intersects(&Rect::new(0, 10, 5, 5)));
    assert!(a.intersects(&Rect::new(9, 9, 5, 5)));
}

#[test]
fn footprint_grows_right_and_down() {
    let r = Rect::new(10, 20, 30, 40);
    assert_eq!(r.footprint(5), Rect::new(10, 20, 35, 45));
    assert_eq!(r.x2(), 40);
    assert_eq!(r.y2(), 60);
    assert_eq!(r.area(), 1200);
}

#[test]
fn fits_requires_trailing_margin_inside_the_page() {
    let interior = Rect::new(10, 10, 180, 280);
    let free = Rect::new(10, 120, 100, 50);
    assert!(free.fits(90, 40, 10, &interior));
    assert!(!free.fits(91, 40, 10, &interior));
    assert!(!free.fits(90, 41, 10, &interior));
}

#[test]
fn fits_waives_margin_at_interior_edge() {
    let interior = Rect::new(10, 10, 180, 280);
    assert!(interior.fits(180, 280, 10, &interior));
    assert!(!interior.fits(181, 10, 10, &interior));
    // flush right only: width waived, height still needs the margin
    let right_column = Rect::new(120, 10, 70, 110);
    assert!(right_column.fits(70, 100, 10, &interior));
    assert!(!right_column.fits(70, 101, 10, &interior));
}

#[test]
fn merge_vertical_and_horizontal_in_both_orders() {
    let top = Rect::new(5, 0, 10, 4);
    let bottom = Rect::new(5, 4, 10, 6);
    assert_eq!(top.merge(&bottom), Some(Rect::new(5, 0, 10, 10)));
    assert_eq!(bottom.merge(&top), Some(Rect::new(5, 0, 10, 10)));

    let left = Rect::new(0, 3, 4, 7);
    let right = Rect::new(4, 3, 6, 7);
    assert_eq!(left.merge(&right), Some(Rect::new(0, 3, 10, 7)));
    assert_eq!(right.merge(&left), Some(Rect::new(0, 3, 10, 7)));
}

#[test]
fn merge_rejects_partial_edges_and_gaps() {
    let a = Rect::new(0, 0, 10, 10);
    assert_eq!(a.merge(&Rect::new(0, 10, 9, 5)), None);
    assert_eq!(a.merge(&Rect::new(0, 11, 10, 5)), None);
    assert_eq!(a.merge(&Rect::new(10, 1, 5, 10)), None);
}

#[test]
fn packing_size_truncates_and_rejects_degenerate() {
    assert_eq!(Item::new("a", 100.9, 50.2).packing_size(), Some((100, 50)));
    assert_eq!(Item::new("b", 0.5, 50.0).packing_size(), None);
    assert_eq!(Item::new("c", -3.0, 50.0).packing_size(), None);
    assert_eq!(Item::new("d", f64::NAN, 50.0).packing_size(), None);
    assert_eq!(Item::new("e", 10.0, f64::INFINITY).packing_size(), None);
    assert_eq!(Item::new("f", 1.0, 5e9).packing_size(), None);
    assert_eq!(
        Item::new("g", u32::MAX as f64, 1.0).packing_size(),
        Some((u32::MAX, 1))
    );
}

#[test]
fn fits_saturates_instead_of_overflowing() {
    let interior = Rect::new(10, 10, 1000, 1000);
    let free = Rect::new(10, 10, 500, 500);
    assert!(!free.fits(u32::MAX, 1, 10, &interior));
    assert!(!free.fits(1, u32::MAX, 10, &interior));
    assert_eq!(Rect::new(0, 0, u32::MAX, 5).footprint(10).w, u32::MAX);
}
