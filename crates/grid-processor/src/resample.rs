//! Sampling a row-major f32 band at fractional cell indices.
//!
//! `col` runs west to east and `row` north to south, both in cell units with
//! integers on cell centers. Positions are clamped onto the band, so every
//! sample lands on real cells; a NaN cell propagates to the result.

use crate::config::ResamplingMethod;

/// Borrowed view of a `width` x `height` band.
#[derive(Debug, Clone, Copy)]
pub struct BandView<'a> {
    data: &'a [f32],
    width: usize,
    height: usize,
}

impl<'a> BandView<'a> {
    /// `None` when `data` does not hold exactly `width * height` cells or
    /// the band is empty.
    pub fn new(data: &'a [f32], width: usize, height: usize) -> Option<Self> {
        let cells = width.checked_mul(height)?;
        (cells > 0 && data.len() == cells).then_some(Self { data, width, height })
    }

    fn cell(&self, col: usize, row: usize) -> f32 {
        self.data[row * self.width + col]
    }

    /// Clamp a fractional position onto the band.
    fn clamp(&self, col: f64, row: f64) -> (f64, f64) {
        let col = if col.is_nan() { 0.0 } else { col };
        let row = if row.is_nan() { 0.0 } else { row };
        (
            col.clamp(0.0, (self.width - 1) as f64),
            row.clamp(0.0, (self.height - 1) as f64),
        )
    }

    /// Value of the cell whose center is closest.
    pub fn nearest(&self, col: f64, row: f64) -> f32 {
        let (col, row) = self.clamp(col, row);
        self.cell(col.round() as usize, row.round() as usize)
    }

    /// Distance-weighted blend of the four surrounding cell centers.
    pub fn bilinear(&self, col: f64, row: f64) -> f32 {
        let (col, row) = self.clamp(col, row);
        let (c0, r0) = (col.floor() as usize, row.floor() as usize);
        let c1 = (c0 + 1).min(self.width - 1);
        let r1 = (r0 + 1).min(self.height - 1);
        let (dc, dr) = (col - c0 as f64, row - r0 as f64);

        let lerp = |a: f32, b: f32, t: f64| (a as f64 + (b as f64 - a as f64) * t) as f32;
        let north = lerp(self.cell(c0, r0), self.cell(c1, r0), dc);
        let south = lerp(self.cell(c0, r1), self.cell(c1, r1), dc);
        lerp(north, south, dr)
    }

    pub fn sample(&self, method: ResamplingMethod, col: f64, row: f64) -> f32 {
        match method {
            ResamplingMethod::Nearest => self.nearest(col, row),
            ResamplingMethod::Bilinear => self.bilinear(col, row),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================================================
    // Construction
    // ========================================================================

    #[test]
    fn test_rejects_mismatched_band() {
        assert!(BandView::new(&[1.0, 2.0, 3.0], 2, 2).is_none());
        assert!(BandView::new(&[], 0, 0).is_none());
        assert!(BandView::new(&[1.0], 1, 1).is_some());
    }

    // ========================================================================
    // Sampling
    // ========================================================================

    #[test]
    fn test_nearest_picks_closest_center() {
        let data = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let band = BandView::new(&data, 3, 2).unwrap();

        assert_eq!(band.nearest(0.0, 0.0), 1.0);
        assert_eq!(band.nearest(1.4, 0.2), 2.0);
        assert_eq!(band.nearest(1.6, 0.6), 6.0);
    }

    #[test]
    fn test_positions_clamped_to_edges() {
        let data = [1.0, 2.0, 3.0, 4.0];
        let band = BandView::new(&data, 2, 2).unwrap();

        assert_eq!(band.nearest(-3.0, 0.0), 1.0);
        assert_eq!(band.nearest(7.0, 9.0), 4.0);
        assert_eq!(band.bilinear(5.0, -1.0), 2.0);
        assert_eq!(band.nearest(f64::NAN, 1.0), 3.0);
    }

    #[test]
    fn test_bilinear_blends_neighbors() {
        let data = [0.0, 10.0, 20.0, 30.0];
        let band = BandView::new(&data, 2, 2).unwrap();

        assert_eq!(band.bilinear(1.0, 1.0), 30.0);
        assert!((band.bilinear(0.5, 0.5) - 15.0).abs() < 1e-5);
        assert!((band.bilinear(0.25, 0.0) - 2.5).abs() < 1e-5);
    }

    #[test]
    fn test_nan_cell_propagates() {
        let data = [1.0, f32::NAN, 3.0, 4.0];
        let band = BandView::new(&data, 2, 2).unwrap();

        assert!(band.bilinear(0.5, 0.5).is_nan());
        assert_eq!(band.nearest(0.0, 1.0), 3.0);
    }

    #[test]
    fn test_sample_dispatch() {
        let data = [0.0, 10.0];
        let band = BandView::new(&data, 2, 1).unwrap();
        assert_eq!(band.sample(ResamplingMethod::Nearest, 0.7, 0.0), 10.0);
        assert!((band.sample(ResamplingMethod::Bilinear, 0.7, 0.0) - 7.0).abs() < 1e-5);
    }
}
