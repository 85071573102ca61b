#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn point_approx_eq(a: Point, b: Point) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

fn letter() -> Size {
    Size::new(612.0, 792.0)
}

const ALL: [Orientation; 4] = [Orientation::Deg0, Orientation::Deg90, Orientation::Deg180, Orientation::Deg270];

// =============================================================
// Size / bounding box
// =============================================================

#[test]
fn size_swapped() {
    assert_eq!(Size::new(3.0, 4.0).swapped(), Size::new(4.0, 3.0));
}

#[test]
fn size_long_edge() {
    assert_eq!(Size::new(612.0, 792.0).long_edge(), 792.0);
    assert_eq!(Size::new(792.0, 612.0).long_edge(), 792.0);
}

#[test]
fn size_is_positive_rejects_zero_and_nan() {
    assert!(Size::new(1.0, 1.0).is_positive());
    assert!(!Size::new(0.0, 1.0).is_positive());
    assert!(!Size::new(1.0, -2.0).is_positive());
    assert!(!Size::new(f64::NAN, 1.0).is_positive());
}

#[test]
fn bounding_box_any_drag_direction() {
    let anchor = Point::new(50.0, 60.0);
    for (p, expected) in [
        (Point::new(80.0, 100.0), Bounds { x: 50.0, y: 60.0, width: 30.0, height: 40.0 }),
        (Point::new(20.0, 100.0), Bounds { x: 20.0, y: 60.0, width: 30.0, height: 40.0 }),
        (Point::new(80.0, 10.0), Bounds { x: 50.0, y: 10.0, width: 30.0, height: 50.0 }),
        (Point::new(0.0, 0.0), Bounds { x: 0.0, y: 0.0, width: 50.0, height: 60.0 }),
        (anchor, Bounds { x: 50.0, y: 60.0, width: 0.0, height: 0.0 }),
    ] {
        assert_eq!(bounding_box(anchor, p), expected);
    }
}

// =============================================================
// Orientation
// =============================================================

#[test]
fn orientation_default_is_upright() {
    assert_eq!(Orientation::default(), Orientation::Deg0);
}

#[test]
fn orientation_from_degrees_normalizes() {
    assert_eq!(Orientation::from_degrees(-90), Some(Orientation::Deg270));
    assert_eq!(Orientation::from_degrees(450), Some(Orientation::Deg90));
    assert_eq!(Orientation::from_degrees(360), Some(Orientation::Deg0));
    assert_eq!(Orientation::from_degrees(45), None);
}

#[test]
fn orientation_cw_and_ccw_are_inverse() {
    for o in ALL {
        assert_eq!(o.rotated_cw().rotated_ccw(), o);
        assert_eq!(o.rotated_cw().rotated_cw().rotated_cw().rotated_cw(), o);
    }
}

#[test]
fn orientation_delta_is_in_half_open_range() {
    for old in ALL {
        for new in ALL {
            let delta = old.delta_to(new);
            assert!(delta > -180.0 && delta <= 180.0, "{old:?} -> {new:?} = {delta}");
        }
    }
}

#[test]
fn orientation_delta_values() {
    assert_eq!(Orientation::Deg0.delta_to(Orientation::Deg90), 90.0);
    assert_eq!(Orientation::Deg0.delta_to(Orientation::Deg270), -90.0);
    assert_eq!(Orientation::Deg270.delta_to(Orientation::Deg0), 90.0);
    assert_eq!(Orientation::Deg90.delta_to(Orientation::Deg270), 180.0);
    assert_eq!(Orientation::Deg180.delta_to(Orientation::Deg180), 0.0);
}

#[test]
fn orientation_serializes_as_degrees() {
    assert_eq!(serde_json::to_string(&Orientation::Deg270).unwrap(), "270");
    let back: Orientation = serde_json::from_str("90").unwrap();
    assert_eq!(back, Orientation::Deg90);
}

#[test]
fn orientation_rejects_non_quarter_turns() {
    assert!(serde_json::from_str::<Orientation>("45").is_err());
    assert!(serde_json::from_str::<Orientation>("450").is_err());
    assert_eq!(Orientation::try_from(45_u16).unwrap_err(), InvalidOrientation(45));
}

#[test]
fn oriented_size_swaps_when_sideways() {
    assert_eq!(oriented_size(letter(), Orientation::Deg0), letter());
    assert_eq!(oriented_size(letter(), Orientation::Deg180), letter());
    assert_eq!(oriented_size(letter(), Orientation::Deg90), Size::new(792.0, 612.0));
    assert_eq!(oriented_size(letter(), Orientation::Deg270), Size::new(792.0, 612.0));
}

#[test]
fn normalize_degrees_folds_into_range() {
    assert_eq!(normalize_degrees(360.0), 0.0);
    assert_eq!(normalize_degrees(-90.0), 270.0);
    assert_eq!(normalize_degrees(450.0), 90.0);
    assert_eq!(normalize_degrees(0.0), 0.0);
}

// =============================================================
// Affine
// =============================================================

#[test]
fn affine_identity_is_noop() {
    let p = Point::new(12.5, -3.0);
    assert_eq!(Affine::IDENTITY.apply(p), p);
}

#[test]
fn affine_quarter_turn_is_exact() {
    let r = Affine::rotate_deg(90.0);
    assert_eq!(r.apply(Point::new(1.0, 0.0)), Point::new(0.0, 1.0));
    assert_eq!(r.apply(Point::new(0.0, 1.0)), Point::new(-1.0, 0.0));
}

#[test]
fn affine_then_applies_in_order() {
    let t = Affine::translate(10.0, 0.0).then(Affine::scale(2.0, 2.0));
    assert!(point_approx_eq(t.apply(Point::new(1.0, 1.0)), Point::new(22.0, 2.0)));
}

#[test]
fn affine_invert_round_trip() {
    let t = Affine::translate(5.0, -7.0).then(Affine::rotate_deg(33.0)).then(Affine::scale(1.7, 1.7));
    let inv = t.invert().unwrap();
    let p = Point::new(123.0, 456.0);
    assert!(point_approx_eq(inv.apply(t.apply(p)), p));
}

#[test]
fn affine_singular_has_no_inverse() {
    assert!(Affine::scale(0.0, 1.0).invert().is_none());
}

// =============================================================
// Remap
// =============================================================

#[test]
fn remap_top_left_goes_top_right_on_cw_turn() {
    let p = remap(Point::new(0.0, 0.0), letter(), Orientation::Deg0, Orientation::Deg90);
    assert!(point_approx_eq(p, Point::new(792.0, 0.0)));
}

#[test]
fn remap_center_maps_to_center() {
    let p = remap(Point::new(306.0, 396.0), letter(), Orientation::Deg0, Orientation::Deg270);
    assert!(point_approx_eq(p, Point::new(396.0, 306.0)));
}

#[test]
fn remap_half_turn_mirrors_through_center() {
    let p = remap(Point::new(10.0, 20.0), letter(), Orientation::Deg0, Orientation::Deg180);
    assert!(point_approx_eq(p, Point::new(602.0, 772.0)));
}

#[test]
fn remap_is_invertible_for_every_pair() {
    let p = Point::new(101.25, 333.5);
    for old in ALL {
        for new in ALL {
            let there = remap(p, letter(), old, new);
            let back = remap(there, letter(), new, old);
            assert!(point_approx_eq(back, p), "{old:?} <-> {new:?}");
        }
    }
}

#[test]
fn remap_transform_inverse_matches_reverse_remap() {
    let forward = remap_transform(letter(), Orientation::Deg90, Orientation::Deg180);
    let reverse = remap_transform(letter(), Orientation::Deg180, Orientation::Deg90);
    let inv = forward.invert().unwrap();
    let p = Point::new(44.0, 55.0);
    assert!(point_approx_eq(inv.apply(p), reverse.apply(p)));
}

#[test]
fn remap_four_quarter_turns_is_identity() {
    let start = Point::new(71.0, 650.0);
    let mut p = start;
    let mut o = Orientation::Deg0;
    for _ in 0..4 {
        let next = o.rotated_cw();
        p = remap(p, letter(), o, next);
        o = next;
    }
    assert_eq!(p, start);
}
