#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::geometry::Point;
use crate::page::{Page, ShapeId};

/// The topmost rectangle on `page` under the page-space point, if any.
///
/// Later rectangles are drawn above earlier ones, so the search runs from the
/// end of the list.
#[must_use]
pub fn hit_test(page: &Page, point: Point) -> Option<ShapeId> {
    page.shapes.iter().rev().find(|s| s.contains(point)).map(|s| s.id)
}
