//! Coordinate reference system transformations.
//!
//! Only the spherical Web Mercator projection is needed by the pipeline; it is
//! implemented from scratch without external dependencies.

pub mod mercator;

pub use mercator::{
    forward, inverse, lat_to_y, lng_to_x, project_axis, project_bbox, unproject_axis,
    unproject_bbox, x_to_lng, y_to_lat, Axis, EARTH_RADIUS, MAX_LATITUDE,
};
