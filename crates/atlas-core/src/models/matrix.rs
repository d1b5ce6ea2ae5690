use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// Dense row-major `f32` matrix.
///
/// Used for embeddings (`dim × channels`), importance masks (`elements × channels`)
/// and leave-one-out deviations (`outputs × channels`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f32>,
}

impl Matrix {
    pub fn new(rows: usize, cols: usize, data: Vec<f32>) -> Result<Self, ModelError> {
        if data.len() != rows * cols {
            return Err(ModelError::InvalidShape {
                rows,
                cols,
                len: data.len(),
            });
        }
        Ok(Self { rows, cols, data })
    }

    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Build from a list of equally long rows.
    pub fn from_rows(rows: &[Vec<f32>]) -> Result<Self, ModelError> {
        let cols = rows.first().map(|r| r.len()).unwrap_or(0);
        let mut data = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            if row.len() != cols {
                return Err(ModelError::InvalidShape {
                    rows: rows.len(),
                    cols,
                    len: row.len(),
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            data,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        if row < self.rows && col < self.cols {
            Some(self.data[row * self.cols + col])
        } else {
            None
        }
    }

    /// Like [`Matrix::get`], but reports the offending index.
    pub fn at(&self, row: usize, col: usize) -> Result<f32, ModelError> {
        self.get(row, col).ok_or(ModelError::ShapeMismatch {
            row,
            col,
            rows: self.rows,
            cols: self.cols,
        })
    }

    pub fn column(&self, col: usize) -> Option<Vec<f32>> {
        if col >= self.cols {
            return None;
        }
        Some((0..self.rows).map(|r| self.data[r * self.cols + col]).collect())
    }

    /// Main diagonal, `min(rows, cols)` long.
    pub fn diagonal(&self) -> Vec<f32> {
        (0..self.rows.min(self.cols))
            .map(|i| self.data[i * self.cols + i])
            .collect()
    }

    /// Min-max normalization over all entries into `[0, 1]`.
    /// A constant matrix normalizes to all zeros.
    pub fn normalized(&self) -> Self {
        let min = self.data.iter().copied().fold(f32::INFINITY, f32::min);
        let max = self.data.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let range = max - min;
        let data = if self.data.is_empty() || range <= f32::EPSILON {
            vec![0.0; self.data.len()]
        } else {
            self.data.iter().map(|v| (v - min) / range).collect()
        };
        Self {
            rows: self.rows,
            cols: self.cols,
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_wrong_length() {
        assert!(Matrix::new(2, 2, vec![1.0; 3]).is_err());
    }

    #[test]
    fn column_and_diagonal() {
        let m = Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]).unwrap();
        assert_eq!(m.shape(), (3, 2));
        assert_eq!(m.column(1).unwrap(), vec![2.0, 4.0, 6.0]);
        assert_eq!(m.diagonal(), vec![1.0, 4.0]);
        assert!(m.column(2).is_none());
    }

    #[test]
    fn at_reports_out_of_bounds() {
        let m = Matrix::zeros(1, 2);
        assert!(m.at(0, 1).is_ok());
        assert!(matches!(
            m.at(1, 0),
            Err(ModelError::ShapeMismatch { row: 1, col: 0, .. })
        ));
    }

    #[test]
    fn normalize_maps_to_unit_interval() {
        let m = Matrix::new(1, 3, vec![2.0, 4.0, 6.0]).unwrap().normalized();
        assert_eq!(m.data(), &[0.0, 0.5, 1.0]);
    }

    #[test]
    fn normalize_constant_is_zero() {
        let m = Matrix::new(2, 1, vec![3.0, 3.0]).unwrap().normalized();
        assert_eq!(m.data(), &[0.0, 0.0]);
    }
}
