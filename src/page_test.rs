#![allow(clippy::float_cmp)]

use rand::Rng;

use super::*;

fn letter() -> Size {
    Size::new(612.0, 792.0)
}

fn rect(x: f64, y: f64, w: f64, h: f64) -> RectShape {
    RectShape::new(Uuid::new_v4(), Bounds { x, y, width: w, height: h })
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-6 * a.abs().max(b.abs()).max(1.0)
}

fn assert_shapes_close(actual: &[RectShape], expected: &[RectShape]) {
    assert_eq!(actual.len(), expected.len());
    for (a, e) in actual.iter().zip(expected) {
        assert_eq!(a.id, e.id);
        assert!(close(a.x, e.x), "x {} != {}", a.x, e.x);
        assert!(close(a.y, e.y), "y {} != {}", a.y, e.y);
        assert!(close(a.width, e.width));
        assert!(close(a.height, e.height));
        assert!(close(a.rotation, e.rotation), "rotation {} != {}", a.rotation, e.rotation);
    }
}

fn random_page(count: usize) -> Page {
    let mut rng = rand::rng();
    let mut page = Page::new(letter());
    for _ in 0..count {
        page.add_shape(rect(
            rng.random_range(0.0..612.0),
            rng.random_range(0.0..792.0),
            rng.random_range(0.0..200.0),
            rng.random_range(0.0..200.0),
        ));
    }
    page
}

// =============================================================
// RectShape
// =============================================================

#[test]
fn rect_contains_interior_and_edges() {
    let r = rect(10.0, 20.0, 100.0, 50.0);
    assert!(r.contains(Point::new(50.0, 40.0)));
    assert!(r.contains(Point::new(10.0, 20.0)));
    assert!(r.contains(Point::new(110.0, 70.0)));
    assert!(!r.contains(Point::new(9.0, 40.0)));
    assert!(!r.contains(Point::new(50.0, 71.0)));
}

#[test]
fn rotated_rect_contains_follows_rotation() {
    // Turned a quarter clockwise about (100, 100): body now spans x in [50, 100], y in [100, 200].
    let mut r = rect(100.0, 100.0, 100.0, 50.0);
    r.rotation = 90.0;
    assert!(r.contains(Point::new(75.0, 150.0)));
    assert!(!r.contains(Point::new(150.0, 125.0)));
}

#[test]
fn rect_set_bounds_keeps_rotation() {
    let mut r = rect(0.0, 0.0, 1.0, 1.0);
    r.rotation = 180.0;
    r.set_bounds(Bounds { x: 5.0, y: 6.0, width: 7.0, height: 8.0 });
    assert_eq!((r.x, r.y, r.width, r.height, r.rotation), (5.0, 6.0, 7.0, 8.0, 180.0));
}

// =============================================================
// Orientation changes
// =============================================================

#[test]
fn new_page_is_upright() {
    let page = Page::new(letter());
    assert_eq!(page.orientation, Orientation::Deg0);
    assert_eq!(page.content_size(), letter());
}

#[test]
fn set_orientation_swaps_content_size() {
    let mut page = Page::new(letter());
    page.set_orientation(Orientation::Deg90);
    assert_eq!(page.content_size(), Size::new(792.0, 612.0));
    assert_eq!(page.base, letter());
}

#[test]
fn set_orientation_moves_shape_origin_and_rotation() {
    let mut page = Page::new(letter());
    page.add_shape(rect(0.0, 0.0, 100.0, 50.0));
    let delta = page.set_orientation(Orientation::Deg90);
    assert_eq!(delta, 90.0);
    let s = &page.shapes[0];
    assert_eq!((s.x, s.y), (792.0, 0.0));
    assert_eq!(s.rotation, 90.0);
    assert_eq!((s.width, s.height), (100.0, 50.0));
}

#[test]
fn set_orientation_same_value_is_noop() {
    let mut page = random_page(3);
    let before = page.shapes.clone();
    assert_eq!(page.set_orientation(Orientation::Deg0), 0.0);
    assert_eq!(page.shapes, before);
}

#[test]
fn rotate_right_then_left_restores_shapes() {
    for _ in 0..20 {
        let mut page = random_page(8);
        let before = page.shapes.clone();
        page.set_orientation(Orientation::Deg90);
        page.set_orientation(Orientation::Deg0);
        assert_shapes_close(&page.shapes, &before);
        assert_eq!(page.orientation, Orientation::Deg0);
    }
}

#[test]
fn round_trip_from_every_orientation() {
    let mut page = random_page(5);
    for start in [Orientation::Deg90, Orientation::Deg180, Orientation::Deg270] {
        page.set_orientation(start);
        let before = page.shapes.clone();
        page.set_orientation(start.rotated_ccw());
        page.set_orientation(start);
        assert_shapes_close(&page.shapes, &before);
    }
}

#[test]
fn four_clockwise_turns_restore_shapes() {
    let mut page = random_page(10);
    let before = page.shapes.clone();
    for _ in 0..4 {
        let next = page.orientation.rotated_cw();
        page.set_orientation(next);
    }
    assert_eq!(page.orientation, Orientation::Deg0);
    assert_shapes_close(&page.shapes, &before);
}

#[test]
fn four_turns_on_integer_coordinates_are_exact() {
    let mut page = Page::new(letter());
    page.add_shape(rect(12.0, 34.0, 56.0, 78.0));
    let before = page.shapes.clone();
    for _ in 0..4 {
        let next = page.orientation.rotated_cw();
        page.set_orientation(next);
    }
    assert_eq!(page.shapes, before);
}

#[test]
fn images_follow_orientation() {
    let mut page = Page::new(letter());
    page.place_image(ImageSource::from("a.png"), Size::new(1200.0, 800.0)).unwrap();
    let before = page.images[0].clone();
    page.set_orientation(Orientation::Deg270);
    assert_eq!(page.images[0].rotation, 270.0);
    assert_ne!((page.images[0].x, page.images[0].y), (before.x, before.y));
    page.set_orientation(Orientation::Deg0);
    assert!(close(page.images[0].x, before.x));
    assert!(close(page.images[0].y, before.y));
    assert_eq!(page.images[0].rotation, 0.0);
}

// =============================================================
// Image placement
// =============================================================

#[test]
fn place_image_fits_and_centers_landscape_image() {
    let mut page = Page::new(letter());
    page.place_image(ImageSource::from("scan.png"), Size::new(1200.0, 800.0)).unwrap();
    let img = &page.images[0];
    assert!(close(img.scale, 0.51));
    assert!(close(img.x, (612.0 - 1200.0 * 0.51) / 2.0));
    assert!(close(img.y, (792.0 - 800.0 * 0.51) / 2.0));
    assert_eq!(img.rotation, 0.0);
}

#[test]
fn place_image_uses_sideways_frame() {
    let mut page = Page::new(letter());
    page.set_orientation(Orientation::Deg90);
    page.place_image(ImageSource::from("wide.png"), Size::new(1584.0, 1224.0)).unwrap();
    let img = &page.images[0];
    assert!(close(img.scale, 0.5));
    assert!(close(img.x, 0.0));
    assert!(close(img.y, 0.0));
}

#[test]
fn place_image_rejects_zero_dimensions() {
    let mut page = Page::new(letter());
    let err = page.place_image(ImageSource::from("bad.png"), Size::new(0.0, 10.0)).unwrap_err();
    assert_eq!(err, PageError::InvalidImage { width: 0.0, height: 10.0 });
    assert!(page.images.is_empty());
}

#[test]
fn place_same_source_twice_appends_twice() {
    let mut page = Page::new(letter());
    let a = page.place_image(ImageSource::from("x.png"), Size::new(10.0, 10.0)).unwrap();
    let b = page.place_image(ImageSource::from("x.png"), Size::new(10.0, 10.0)).unwrap();
    assert_ne!(a, b);
    assert_eq!(page.images.len(), 2);
}

#[test]
fn image_source_serializes_as_string() {
    let json = serde_json::to_string(&ImageSource::from("blob:abc")).unwrap();
    assert_eq!(json, "\"blob:abc\"");
}

// =============================================================
// Shape list
// =============================================================

#[test]
fn remove_shape_returns_it() {
    let mut page = Page::new(letter());
    let r = rect(0.0, 0.0, 1.0, 1.0);
    let id = r.id;
    page.add_shape(r);
    assert!(page.shape(&id).is_some());
    assert_eq!(page.remove_shape(&id).map(|s| s.id), Some(id));
    assert!(page.shape(&id).is_none());
    assert!(page.remove_shape(&id).is_none());
}

#[test]
fn shape_mut_edits_in_place() {
    let mut page = Page::new(letter());
    let r = rect(0.0, 0.0, 1.0, 1.0);
    let id = r.id;
    page.add_shape(r);
    if let Some(s) = page.shape_mut(&id) {
        s.width = 42.0;
    }
    assert_eq!(page.shape(&id).unwrap().width, 42.0);
}

// =============================================================
// PageStore
// =============================================================

#[test]
fn empty_store_has_no_current_page() {
    let store = PageStore::new(letter());
    assert!(store.is_empty());
    assert_eq!(store.current_index(), None);
    assert_eq!(store.current_page().unwrap_err(), PageError::NoCurrentPage);
}

#[test]
fn add_page_appends_and_becomes_current() {
    let mut store = PageStore::new(letter());
    assert_eq!(store.add_page(), 0);
    assert_eq!(store.add_page(), 1);
    assert_eq!(store.len(), 2);
    assert_eq!(store.current_index(), Some(1));
    assert_eq!(store.current_page().unwrap().base, letter());
}

#[test]
fn add_page_with_size_validates() {
    let mut store = PageStore::new(letter());
    assert_eq!(store.add_page_with_size(Size::new(100.0, 200.0)), Ok(0));
    assert!(matches!(
        store.add_page_with_size(Size::new(0.0, 200.0)),
        Err(PageError::InvalidPageSize { .. })
    ));
    assert_eq!(store.len(), 1);
}

#[test]
fn set_current_rejects_out_of_range() {
    let mut store = PageStore::new(letter());
    store.add_page();
    store.add_page();
    assert_eq!(store.set_current(2), Err(PageError::OutOfRange { index: 2, count: 2 }));
    assert_eq!(store.current_index(), Some(1));
    store.set_current(0).unwrap();
    assert_eq!(store.current_index(), Some(0));
}

#[test]
fn get_out_of_range_errors() {
    let store = PageStore::new(letter());
    assert_eq!(store.get(0).unwrap_err(), PageError::OutOfRange { index: 0, count: 0 });
}

#[test]
fn iter_is_document_order() {
    let mut store = PageStore::new(letter());
    store.add_page();
    store.add_page_with_size(Size::new(1.0, 2.0)).unwrap();
    let sizes: Vec<Size> = store.iter().map(|p| p.base).collect();
    assert_eq!(sizes, vec![letter(), Size::new(1.0, 2.0)]);
}

#[test]
fn page_error_messages() {
    assert_eq!(PageError::NoCurrentPage.to_string(), "no current page");
    assert_eq!(
        PageError::OutOfRange { index: 3, count: 2 }.to_string(),
        "page index 3 out of range (page count 2)"
    );
}
