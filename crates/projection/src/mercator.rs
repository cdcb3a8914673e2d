//! Spherical Web Mercator projection (EPSG:3857).
//!
//! Uses a sphere of radius [`EARTH_RADIUS`]:
//!
//! ```text
//! x = R * lon_rad
//! y = R * ln(tan(pi/4 + lat_rad/2))
//! ```
//!
//! Latitudes at or beyond the poles project to infinity; callers clean such
//! points out before building grids.

use raster_common::BoundingBox;
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

/// Sphere radius in meters (WGS84 semi-major axis).
pub const EARTH_RADIUS: f64 = 6_378_137.0;

/// Latitude at which the projected square ends (y == x at 180 degrees).
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// Coordinate axis selector for single-axis conversions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Longitude / easting
    X,
    /// Latitude / northing
    Y,
}

/// Longitude in degrees to easting in meters.
#[inline]
pub fn lng_to_x(lng: f64) -> f64 {
    EARTH_RADIUS * lng.to_radians()
}

/// Latitude in degrees to northing in meters.
#[inline]
pub fn lat_to_y(lat: f64) -> f64 {
    EARTH_RADIUS * (FRAC_PI_4 + lat.to_radians() / 2.0).tan().ln()
}

/// Easting in meters to longitude in degrees.
#[inline]
pub fn x_to_lng(x: f64) -> f64 {
    (x / EARTH_RADIUS).to_degrees()
}

/// Northing in meters to latitude in degrees.
#[inline]
pub fn y_to_lat(y: f64) -> f64 {
    (2.0 * (y / EARTH_RADIUS).exp().atan() - FRAC_PI_2).to_degrees()
}

/// Project a `(lon, lat)` pair in degrees to `(x, y)` in meters.
#[inline]
pub fn forward(lng: f64, lat: f64) -> (f64, f64) {
    (lng_to_x(lng), lat_to_y(lat))
}

/// Unproject `(x, y)` in meters to `(lon, lat)` in degrees.
#[inline]
pub fn inverse(x: f64, y: f64) -> (f64, f64) {
    (x_to_lng(x), y_to_lat(y))
}

/// Project one coordinate along `axis`.
///
/// The two axes are independent on the sphere, so a single column of
/// longitudes or latitudes can be converted without its partner.
#[inline]
pub fn project_axis(value: f64, axis: Axis) -> f64 {
    match axis {
        Axis::X => lng_to_x(value),
        Axis::Y => lat_to_y(value),
    }
}

/// Inverse of [`project_axis`].
#[inline]
pub fn unproject_axis(value: f64, axis: Axis) -> f64 {
    match axis {
        Axis::X => x_to_lng(value),
        Axis::Y => y_to_lat(value),
    }
}

/// Project a geographic bounding box to meters.
pub fn project_bbox(bbox: &BoundingBox) -> BoundingBox {
    let (min_x, min_y) = forward(bbox.min_x, bbox.min_y);
    let (max_x, max_y) = forward(bbox.max_x, bbox.max_y);
    BoundingBox::new(min_x, min_y, max_x, max_y)
}

/// Unproject a Mercator bounding box to degrees.
///
/// Both mappings are monotonic per axis, so corners map to corners.
pub fn unproject_bbox(bbox: &BoundingBox) -> BoundingBox {
    let (min_x, min_y) = inverse(bbox.min_x, bbox.min_y);
    let (max_x, max_y) = inverse(bbox.max_x, bbox.max_y);
    BoundingBox::new(min_x, min_y, max_x, max_y)
}
