//! Tests for BoundingBox operations.

use raster_common::bbox::BoundingBox;

// ============================================================================
// Constructor tests
// ============================================================================

#[test]
fn test_bbox_new() {
    let bbox = BoundingBox::new(-180.0, -90.0, 180.0, 90.0);
    assert_eq!(bbox.min_x, -180.0);
    assert_eq!(bbox.min_y, -90.0);
    assert_eq!(bbox.max_x, 180.0);
    assert_eq!(bbox.max_y, 90.0);
}

#[test]
fn test_bbox_copy() {
    let bbox1 = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
    let bbox2 = bbox1;
    assert_eq!(bbox1, bbox2);
}

#[test]
fn test_bbox_from_single_point() {
    let bbox = BoundingBox::from_points([(3.0, 4.0)]).unwrap();
    assert_eq!(bbox.width(), 0.0);
    assert_eq!(bbox.height(), 0.0);
    assert_eq!(bbox.area(), 0.0);
}

// ============================================================================
// Dimension tests (width/height/area)
// ============================================================================

#[test]
fn test_bbox_width() {
    let bbox = BoundingBox::new(10.0, 0.0, 30.0, 10.0);
    assert_eq!(bbox.width(), 20.0);
}

#[test]
fn test_bbox_height() {
    let bbox = BoundingBox::new(0.0, 5.0, 10.0, 25.0);
    assert_eq!(bbox.height(), 20.0);
}

#[test]
fn test_bbox_width_crossing_zero() {
    let bbox = BoundingBox::new(-10.0, 0.0, 10.0, 10.0);
    assert_eq!(bbox.width(), 20.0);
}

#[test]
fn test_bbox_area_web_mercator() {
    // 100 km x 100 km in meters
    let bbox = BoundingBox::new(0.0, 0.0, 100_000.0, 100_000.0);
    assert_eq!(bbox.area(), 1e10);
}

// ============================================================================
// Containment tests
// ============================================================================

#[test]
fn test_bbox_contains_point_inclusive_edges() {
    let bbox = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
    assert!(bbox.contains_point(0.0, 0.0));
    assert!(bbox.contains_point(10.0, 10.0));
    assert!(bbox.contains_point(5.0, 5.0));
    assert!(!bbox.contains_point(10.1, 5.0));
    assert!(!bbox.contains_point(5.0, -0.1));
}

#[test]
fn test_bbox_center() {
    let bbox = BoundingBox::new(-10.0, 20.0, 10.0, 40.0);
    assert_eq!(bbox.center(), (0.0, 30.0));
}
