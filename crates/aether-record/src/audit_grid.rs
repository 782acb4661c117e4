//! The PIZ-style audit grid: a fixed 32×32 intensity field plus the
//! regions segmented from it, ordered deterministically for export.

use aether_kernel::scalar::total_order;
use thiserror::Error;

/// Grid side length, fixed by the format.
pub const GRID_SIDE: usize = 32;

/// Errors raised while constructing an [`AuditGrid`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum AuditGridError {
    /// The input slice was not exactly `GRID_SIDE * GRID_SIDE` cells.
    #[error("audit grid must carry exactly {expected} cells, got {actual}")]
    WrongLength {
        /// The required cell count, `GRID_SIDE * GRID_SIDE`.
        expected: usize,
        /// The slice's actual length.
        actual: usize,
    },
    /// A cell held a non-finite value (`NaN` or `Inf`).
    #[error("cell ({row}, {col}) is not finite: {value}")]
    NonFiniteCell {
        /// Row index.
        row: usize,
        /// Column index.
        col: usize,
        /// The offending value.
        value: f64,
    },
    /// A cell held a subnormal value.
    #[error("cell ({row}, {col}) is subnormal: {value}")]
    SubnormalCell {
        /// Row index.
        row: usize,
        /// Column index.
        col: usize,
        /// The offending value.
        value: f64,
    },
    /// A cell fell outside the `[0, 1]` intensity range.
    #[error("cell ({row}, {col}) is out of range [0, 1]: {value}")]
    OutOfRangeCell {
        /// Row index.
        row: usize,
        /// Column index.
        col: usize,
        /// The offending value.
        value: f64,
    },
}

/// A fixed `32x32` grid of intensity samples in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditGrid {
    cells: Vec<f64>,
}

impl AuditGrid {
    /// Builds a grid from a row-major `32*32`-element slice, rejecting any
    /// cell that is non-finite, subnormal, or outside `[0, 1]`.
    pub fn from_row_major(cells: &[f64]) -> Result<Self, AuditGridError> {
        if cells.len() != GRID_SIDE * GRID_SIDE {
            return Err(AuditGridError::WrongLength {
                expected: GRID_SIDE * GRID_SIDE,
                actual: cells.len(),
            });
        }
        for (index, &value) in cells.iter().enumerate() {
            let row = index / GRID_SIDE;
            let col = index % GRID_SIDE;
            if !value.is_finite() {
                return Err(AuditGridError::NonFiniteCell { row, col, value });
            }
            if value != 0.0 && value.is_subnormal() {
                return Err(AuditGridError::SubnormalCell { row, col, value });
            }
            if !(0.0..=1.0).contains(&value) {
                return Err(AuditGridError::OutOfRangeCell { row, col, value });
            }
        }
        Ok(Self { cells: cells.to_vec() })
    }

    /// The intensity at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.cells[row * GRID_SIDE + col]
    }

    /// The underlying row-major cells.
    pub fn as_slice(&self) -> &[f64] {
        &self.cells
    }
}

/// A segmented region of elevated intensity within an [`AuditGrid`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    /// Opaque, producer-assigned region identifier. The final ordering
    /// tiebreaker.
    pub region_id: u32,
    /// Severity score assigned to this region; higher is worse.
    pub severity_score: f64,
    /// Fraction of the grid's cells this region covers, in `[0, 1]`.
    pub area_ratio: f64,
    /// Row component of the region's centroid.
    pub centroid_row: f64,
    /// Column component of the region's centroid.
    pub centroid_col: f64,
}

fn order(raw: i32) -> std::cmp::Ordering {
    raw.cmp(&0)
}

/// Orders two regions by `(severityScore desc, areaRatio desc,
/// centroidRow asc, centroidCol asc, regionId asc)`, using
/// [`total_order`] so `NaN`/signed-zero never break the comparator's
/// totality.
pub fn compare_regions(a: &Region, b: &Region) -> std::cmp::Ordering {
    order(total_order(b.severity_score, a.severity_score))
        .then_with(|| order(total_order(b.area_ratio, a.area_ratio)))
        .then_with(|| order(total_order(a.centroid_row, b.centroid_row)))
        .then_with(|| order(total_order(a.centroid_col, b.centroid_col)))
        .then_with(|| a.region_id.cmp(&b.region_id))
}

/// Sorts `regions` in place per [`compare_regions`], the canonical export
/// order for an audit grid's region list.
pub fn sort_regions(regions: &mut [Region]) {
    regions.sort_by(compare_regions);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_a_valid_grid() {
        let cells = vec![0.5; GRID_SIDE * GRID_SIDE];
        assert!(AuditGrid::from_row_major(&cells).is_ok());
    }

    #[test]
    fn rejects_nan_cell() {
        let mut cells = vec![0.0; GRID_SIDE * GRID_SIDE];
        cells[10] = f64::NAN;
        let err = AuditGrid::from_row_major(&cells).unwrap_err();
        assert!(matches!(err, AuditGridError::NonFiniteCell { .. }));
    }

    #[test]
    fn rejects_out_of_range_cell() {
        let mut cells = vec![0.0; GRID_SIDE * GRID_SIDE];
        cells[0] = 1.5;
        let err = AuditGrid::from_row_major(&cells).unwrap_err();
        assert!(matches!(err, AuditGridError::OutOfRangeCell { .. }));
    }

    #[test]
    fn rejects_subnormal_cell() {
        let mut cells = vec![0.0; GRID_SIDE * GRID_SIDE];
        cells[0] = f64::MIN_POSITIVE / 2.0;
        let err = AuditGrid::from_row_major(&cells).unwrap_err();
        assert!(matches!(err, AuditGridError::SubnormalCell { .. }));
    }

    #[test]
    fn rejects_wrong_length() {
        let err = AuditGrid::from_row_major(&[0.0; 10]).unwrap_err();
        assert_eq!(err, AuditGridError::WrongLength { expected: GRID_SIDE * GRID_SIDE, actual: 10 });
    }

    #[test]
    fn orders_by_severity_descending_first() {
        let mut regions = vec![
            Region { region_id: 1, severity_score: 0.2, area_ratio: 0.5, centroid_row: 0.0, centroid_col: 0.0 },
            Region { region_id: 2, severity_score: 0.8, area_ratio: 0.1, centroid_row: 0.0, centroid_col: 0.0 },
        ];
        sort_regions(&mut regions);
        assert_eq!(regions[0].region_id, 2);
    }

    #[test]
    fn ties_on_severity_and_area_break_by_centroid_then_id() {
        let mut regions = vec![
            Region { region_id: 5, severity_score: 0.5, area_ratio: 0.5, centroid_row: 2.0, centroid_col: 0.0 },
            Region { region_id: 3, severity_score: 0.5, area_ratio: 0.5, centroid_row: 1.0, centroid_col: 0.0 },
        ];
        sort_regions(&mut regions);
        assert_eq!(regions[0].region_id, 3);
    }

    #[test]
    fn exact_ties_break_by_region_id_ascending() {
        let mut regions = vec![
            Region { region_id: 9, severity_score: 0.5, area_ratio: 0.5, centroid_row: 0.0, centroid_col: 0.0 },
            Region { region_id: 1, severity_score: 0.5, area_ratio: 0.5, centroid_row: 0.0, centroid_col: 0.0 },
        ];
        sort_regions(&mut regions);
        assert_eq!(regions[0].region_id, 1);
    }
}
