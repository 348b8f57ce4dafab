//! Dense real-valued surfaces with the grid's dimensions.

use scentwalk_core::{Cell, FieldError};
use scentwalk_space::Grid;

/// A 2-D array of potentials, stored row-major like [`Grid`].
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    cols: u32,
    rows: u32,
    values: Vec<f64>,
}

impl Field {
    /// A `cols x rows` field with every cell set to `value`.
    pub fn filled(cols: u32, rows: u32, value: f64) -> Self {
        Self {
            cols,
            rows,
            values: vec![value; cols as usize * rows as usize],
        }
    }

    /// A field matching `grid`'s dimensions, filled with `value`.
    pub fn for_grid(grid: &Grid, value: f64) -> Self {
        Self::filled(grid.cols(), grid.rows(), value)
    }

    /// A field from explicit row-major values.
    pub fn from_values(cols: u32, rows: u32, values: Vec<f64>) -> Result<Self, FieldError> {
        let expected = cols as usize * rows as usize;
        if values.len() != expected {
            return Err(FieldError::SizeMismatch {
                expected,
                actual: values.len(),
            });
        }
        Ok(Self { cols, rows, values })
    }

    /// Number of columns.
    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// Number of rows.
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// `(cols, rows)`.
    pub fn dims(&self) -> (u32, u32) {
        (self.cols, self.rows)
    }

    /// Row-major values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub(crate) fn values_mut(&mut self) -> &mut [f64] {
        &mut self.values
    }

    /// Consume the field, returning its values.
    pub fn into_values(self) -> Vec<f64> {
        self.values
    }

    /// Flat index of `cell`, or `None` if out of bounds.
    pub fn index(&self, cell: Cell) -> Option<usize> {
        let inside =
            cell.x >= 0 && cell.y >= 0 && cell.x < self.cols as i32 && cell.y < self.rows as i32;
        inside.then(|| cell.y as usize * self.cols as usize + cell.x as usize)
    }

    /// Value at `cell`, or `None` if out of bounds.
    pub fn get(&self, cell: Cell) -> Option<f64> {
        self.index(cell).map(|i| self.values[i])
    }

    /// Value at `cell`, or `sentinel` if out of bounds.
    pub fn get_or(&self, cell: Cell, sentinel: f64) -> f64 {
        self.get(cell).unwrap_or(sentinel)
    }

    /// Largest value, or `None` for an empty field.
    pub fn max(&self) -> Option<f64> {
        self.values.iter().copied().reduce(f64::max)
    }

    /// Smallest value, or `None` for an empty field.
    pub fn min(&self) -> Option<f64> {
        self.values.iter().copied().reduce(f64::min)
    }

    /// The first cell (row-major) holding the largest value.
    pub fn argmax(&self) -> Option<Cell> {
        let mut best: Option<(usize, f64)> = None;
        for (i, &v) in self.values.iter().enumerate() {
            if best.map_or(true, |(_, b)| v > b) {
                best = Some((i, v));
            }
        }
        let cols = self.cols as usize;
        best.map(|(i, _)| Cell::new((i % cols) as i32, (i / cols) as i32))
    }

    /// Number of cells whose value exceeds `threshold`.
    pub fn footprint(&self, threshold: f64) -> usize {
        self.values.iter().filter(|&&v| v > threshold).count()
    }

    /// `Err(DimensionMismatch)` unless the field matches `grid`.
    pub fn check_dims(&self, grid: &Grid) -> Result<(), FieldError> {
        if self.dims() == grid.dims() {
            Ok(())
        } else {
            Err(FieldError::DimensionMismatch {
                expected: grid.dims(),
                actual: self.dims(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_values_checks_length() {
        assert!(Field::from_values(2, 2, vec![0.0; 4]).is_ok());
        assert_eq!(
            Field::from_values(2, 2, vec![0.0; 3]),
            Err(FieldError::SizeMismatch {
                expected: 4,
                actual: 3
            })
        );
    }

    #[test]
    fn lookup_is_row_major() {
        let f = Field::from_values(3, 2, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert_eq!(f.get(Cell::new(2, 0)), Some(2.0));
        assert_eq!(f.get(Cell::new(0, 1)), Some(3.0));
        assert_eq!(f.get(Cell::new(3, 0)), None);
        assert_eq!(f.get_or(Cell::new(-1, 0), -10.0), -10.0);
    }

    #[test]
    fn extrema_and_argmax() {
        let f = Field::from_values(2, 2, vec![1.0, 7.0, -3.0, 7.0]).unwrap();
        assert_eq!(f.max(), Some(7.0));
        assert_eq!(f.min(), Some(-3.0));
        assert_eq!(f.argmax(), Some(Cell::new(1, 0)));
        assert_eq!(f.footprint(0.0), 3);
    }

    #[test]
    fn dims_checked_against_grid() {
        let g = Grid::open(4, 3).unwrap();
        assert!(Field::for_grid(&g, 0.0).check_dims(&g).is_ok());
        assert!(Field::filled(3, 4, 0.0).check_dims(&g).is_err());
    }
}
