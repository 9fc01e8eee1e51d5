//! Construction helpers for [`Matrix`].

use rand::Rng;

use crate::Matrix;

/// Creates an empty matrix of the given shape.
pub fn mat(rows: usize, cols: usize) -> Matrix {
    Matrix::new(rows, cols)
}

/// Creates a matrix with every cell set to `value`.
pub fn filled(rows: usize, cols: usize, value: f64) -> Matrix {
    let mut m = Matrix::new(rows, cols);
    m.fill(value);
    m
}

/// Creates a matrix filled with zeros.
pub fn zeros(rows: usize, cols: usize) -> Matrix {
    filled(rows, cols, 0.0)
}

/// Creates a matrix from nested row data. The data are not shared; the
/// column count is the widest row.
pub fn from_rows(rows: &[Vec<f64>]) -> Matrix {
    let cols = rows.iter().map(Vec::len).max().unwrap_or(0);
    let m = Matrix::new(rows.len(), cols);
    {
        let mut cells = m.storage.borrow_mut();
        for (row, data) in rows.iter().enumerate() {
            for (col, v) in data.iter().enumerate() {
                cells.insert((row as isize, col as isize), *v);
            }
        }
    }
    m
}

/// Creates a matrix filled with uniformly distributed values in `[0, 1)`.
pub fn randu(rows: usize, cols: usize) -> Matrix {
    let mut rng = rand::thread_rng();
    let m = Matrix::new(rows, cols);
    {
        let mut cells = m.storage.borrow_mut();
        for row in 0..rows as isize {
            for col in 0..cols as isize {
                cells.insert((row, col), rng.gen::<f64>());
            }
        }
    }
    m
}
