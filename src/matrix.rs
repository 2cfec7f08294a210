//! Fixed-size row-major numeric matrix, used for convolution weights.

use serde::{Deserialize, Deserializer};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum MatrixError {
    #[error("matrix must have at least one row and one column")]
    Empty,
    #[error("{rows}x{columns} matrix is too large")]
    TooLarge { rows: usize, columns: usize },
    #[error("row {row} has {found} columns, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// Numeric element types the engine accepts, converted to its float format.
pub trait Numeric: Copy + PartialEq + std::fmt::Debug {
    fn to_engine_float(self) -> f32;
}

macro_rules! impl_numeric {
    ($($t:ty),*) => {
        $(impl Numeric for $t {
            fn to_engine_float(self) -> f32 {
                self as f32
            }
        })*
    };
}

impl_numeric!(i8, i16, i32, i64, u8, u16, u32, u64, f32, f64);

/// A `rows × columns` grid of numbers stored row-major.
///
/// Dimensions are fixed at construction; only element replacement is allowed.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix<T: Numeric> {
    rows: usize,
    columns: usize,
    elements: Vec<T>,
}

impl<T: Numeric> Matrix<T> {
    /// A matrix with every element set to `value`.
    ///
    /// Zero rows or columns are [`MatrixError::Empty`], as in [`Matrix::from_rows`].
    pub fn filled(rows: usize, columns: usize, value: T) -> Result<Self, MatrixError> {
        if rows == 0 || columns == 0 {
            return Err(MatrixError::Empty);
        }
        let len = rows
            .checked_mul(columns)
            .ok_or(MatrixError::TooLarge { rows, columns })?;
        Ok(Self {
            rows,
            columns,
            elements: vec![value; len],
        })
    }

    /// Build from nested rows. All rows must have the same length.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self, MatrixError> {
        let columns = rows.first().map(Vec::len).unwrap_or(0);
        if columns == 0 {
            return Err(MatrixError::Empty);
        }
        for (row, values) in rows.iter().enumerate() {
            if values.len() != columns {
                return Err(MatrixError::Ragged {
                    row,
                    expected: columns,
                    found: values.len(),
                });
            }
        }
        Ok(Self {
            rows: rows.len(),
            columns,
            elements: rows.into_iter().flatten().collect(),
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn get(&self, row: usize, column: usize) -> Option<T> {
        if row < self.rows && column < self.columns {
            Some(self.elements[row * self.columns + column])
        } else {
            None
        }
    }

    /// Replace one element. Returns false when the index is out of range.
    pub fn set(&mut self, row: usize, column: usize, value: T) -> bool {
        if row < self.rows && column < self.columns {
            self.elements[row * self.columns + column] = value;
            true
        } else {
            false
        }
    }

    /// Elements in row-major order.
    pub fn as_slice(&self) -> &[T] {
        &self.elements
    }
}

impl<'de, T> Deserialize<'de> for Matrix<T>
where
    T: Numeric + Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let rows = Vec::<Vec<T>>::deserialize(deserializer)?;
        Matrix::from_rows(rows).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filled_has_rows_times_columns_elements() {
        let m = Matrix::filled(2, 5, 7u8).unwrap();
        assert_eq!(m.as_slice().len(), 10);
        assert!(m.as_slice().iter().all(|&v| v == 7));
    }

    #[test]
    fn from_rows_is_row_major() {
        let m = Matrix::from_rows(vec![vec![1, 2, 3], vec![4, 5, 6]]).unwrap();
        assert_eq!(m.rows(), 2);
        assert_eq!(m.columns(), 3);
        assert_eq!(m.as_slice(), &[1, 2, 3, 4, 5, 6]);
        assert_eq!(m.get(1, 0), Some(4));
        assert_eq!(m.get(2, 0), None);
    }

    #[test]
    fn from_rows_rejects_ragged_and_empty() {
        assert_eq!(
            Matrix::from_rows(vec![vec![1, 2], vec![3]]),
            Err(MatrixError::Ragged {
                row: 1,
                expected: 2,
                found: 1
            })
        );
        assert_eq!(Matrix::<i32>::from_rows(vec![]), Err(MatrixError::Empty));
    }

    #[test]
    fn filled_rejects_what_from_rows_rejects() {
        assert_eq!(Matrix::filled(0, 3, 1i32), Err(MatrixError::Empty));
        assert_eq!(Matrix::filled(3, 0, 1i32), Err(MatrixError::Empty));
        assert_eq!(
            Matrix::filled(usize::MAX, 2, 1u8),
            Err(MatrixError::TooLarge {
                rows: usize::MAX,
                columns: 2
            })
        );
    }

    #[test]
    fn set_replaces_in_place_without_resizing() {
        let mut m = Matrix::filled(2, 2, 0.0f32).unwrap();
        assert!(m.set(1, 1, 3.5));
        assert!(!m.set(2, 0, 1.0));
        assert_eq!(m.as_slice(), &[0.0, 0.0, 0.0, 3.5]);
    }

    #[test]
    fn deserializes_from_nested_arrays() {
        #[derive(serde::Deserialize)]
        struct Wrapper {
            weights: Matrix<f32>,
        }
        let w: Wrapper = toml::from_str("weights = [[0, 1, 0], [1, -4, 1], [0, 1, 0]]").unwrap();
        assert_eq!(w.weights.rows(), 3);
        assert_eq!(w.weights.get(1, 1), Some(-4.0));
    }
}
