//! Matrix view engine for the matcalc expression language.
//!
//! Slicing and filtering operate on the original data. A slice restricts the
//! coordinates with which elements of the shared storage are addressed; a
//! filter restricts which storage coordinates are visible at all. All
//! operations take subview coordinates when a window is active, while the
//! underlying cells remain the original ones. Filter coordinates always refer
//! to storage space, so further windowing of a filtered view never rewrites
//! the filter. The iterator walks subview coordinates but yields only those
//! in range of the filter.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::convert::TryFrom;
use std::fmt;
use std::rc::Rc;

mod constructors;
mod error;

pub use constructors::{filled, from_rows, mat, randu, zeros};
pub use error::MatrixError;

/// A scalar or matrix operand carried through expression evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Num(f64),
    Matrix(Matrix),
}

impl Value {
    pub fn as_num(&self) -> Option<f64> {
        match self {
            Value::Num(n) => Some(*n),
            Value::Matrix(_) => None,
        }
    }

    pub fn as_matrix(&self) -> Option<&Matrix> {
        match self {
            Value::Num(_) => None,
            Value::Matrix(m) => Some(m),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Num(n)
    }
}

impl From<Matrix> for Value {
    fn from(m: Matrix) -> Self {
        Value::Matrix(m)
    }
}

impl TryFrom<&Value> for f64 {
    type Error = String;
    fn try_from(v: &Value) -> Result<Self, Self::Error> {
        match v {
            Value::Num(n) => Ok(*n),
            Value::Matrix(_) => Err("cannot convert a matrix to f64".to_string()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Num(n) => write!(f, "{n}"),
            Value::Matrix(m) => write!(f, "{m}"),
        }
    }
}

/// Sparse cell grid shared between a matrix and all views derived from it.
///
/// Keys are signed because shifted views may address coordinates outside the
/// original allocation (halo patterns); reads there yield the unset state and
/// writes simply land in the grid.
type Storage = HashMap<(isize, isize), f64>;

/// Visibility table produced by [`Matrix::filter`], keyed by storage
/// coordinates. Coordinates not contained are invisible.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Mask {
    allowed: HashSet<(isize, isize)>,
}

impl Mask {
    pub fn allows(&self, row: isize, col: isize) -> bool {
        self.allowed.contains(&(row, col))
    }
}

/// One visible cell of a matrix view; `value` is `None` for an unset cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
    pub value: Option<f64>,
}

/// A 2D numeric grid with aliased, mutable, partial views.
///
/// `Clone` produces another handle onto the same storage (a view alias);
/// use [`Matrix::copy`] for an independent deep copy of the visible cells.
#[derive(Debug, Clone)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    storage: Rc<RefCell<Storage>>,
    window: Option<(isize, isize)>,
    mask: Option<Rc<Mask>>,
}

impl Matrix {
    /// Creates a matrix of the given shape with every cell unset.
    pub fn new(rows: usize, cols: usize) -> Matrix {
        Matrix {
            rows,
            cols,
            storage: Rc::new(RefCell::new(HashMap::new())),
            window: None,
            mask: None,
        }
    }

    /// Shape of this view, not necessarily of the underlying storage.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    fn to_storage(&self, row: usize, col: usize) -> (isize, isize) {
        let (row0, col0) = self.window.unwrap_or((0, 0));
        (row0 + row as isize, col0 + col as isize)
    }

    fn check_bounds(&self, row: usize, col: usize) -> Result<(), MatrixError> {
        if row >= self.rows || col >= self.cols {
            return Err(MatrixError::IndexOutOfBounds {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(())
    }

    fn mask_allows(&self, row: isize, col: isize) -> bool {
        self.mask.as_ref().map_or(true, |m| m.allows(row, col))
    }

    fn check_mask(&self, row: isize, col: isize) -> Result<(), MatrixError> {
        if self.mask_allows(row, col) {
            Ok(())
        } else {
            Err(MatrixError::FilterViolation { row, col })
        }
    }

    /// Mask-aware read without bounds or filter errors; `None` when the cell
    /// is unset or invisible.
    fn visible(&self, row: usize, col: usize) -> Option<f64> {
        let (srow, scol) = self.to_storage(row, col);
        if !self.mask_allows(srow, scol) {
            return None;
        }
        self.storage.borrow().get(&(srow, scol)).copied()
    }

    /// Reads the cell at a view-local coordinate; `Ok(None)` for an unset
    /// cell.
    pub fn get(&self, row: usize, col: usize) -> Result<Option<f64>, MatrixError> {
        self.check_bounds(row, col)?;
        let (srow, scol) = self.to_storage(row, col);
        self.check_mask(srow, scol)?;
        Ok(self.storage.borrow().get(&(srow, scol)).copied())
    }

    /// Writes the cell at a view-local coordinate. Visible through every
    /// alias of the same storage.
    pub fn set(&mut self, row: usize, col: usize, value: f64) -> Result<(), MatrixError> {
        self.check_bounds(row, col)?;
        let (srow, scol) = self.to_storage(row, col);
        self.check_mask(srow, scol)?;
        self.storage.borrow_mut().insert((srow, scol), value);
        Ok(())
    }

    /// Returns the cell at a view-local coordinate to the unset state.
    pub fn unset(&mut self, row: usize, col: usize) -> Result<(), MatrixError> {
        self.check_bounds(row, col)?;
        let (srow, scol) = self.to_storage(row, col);
        self.check_mask(srow, scol)?;
        self.storage.borrow_mut().remove(&(srow, scol));
        Ok(())
    }

    /// Sets every visible cell to `value`.
    pub fn fill(&mut self, value: f64) -> &mut Matrix {
        for row in 0..self.rows {
            for col in 0..self.cols {
                let (srow, scol) = self.to_storage(row, col);
                if self.mask_allows(srow, scol) {
                    self.storage.borrow_mut().insert((srow, scol), value);
                }
            }
        }
        self
    }

    /// Independent deep copy of every currently visible set cell; the result
    /// owns fresh storage and carries no window or mask.
    pub fn copy(&self) -> Matrix {
        let out = Matrix::new(self.rows, self.cols);
        {
            let mut cells = out.storage.borrow_mut();
            for cell in self.iter() {
                if let Some(v) = cell.value {
                    cells.insert((cell.row as isize, cell.col as isize), v);
                }
            }
        }
        out
    }

    /// A read/write view on a window of this matrix, sharing storage and
    /// mask. Corners are inclusive and relative to this view, so nested
    /// slicing composes by offset addition. Coordinates may exceed the
    /// storage allocation; the consumer is responsible for what it addresses.
    pub fn slice(&self, row1: isize, col1: isize, row2: isize, col2: isize) -> Matrix {
        let (row0, col0) = self.window.unwrap_or((0, 0));
        Matrix {
            rows: (row2 - row1 + 1).max(0) as usize,
            cols: (col2 - col1 + 1).max(0) as usize,
            storage: Rc::clone(&self.storage),
            window: Some((row0 + row1, col0 + col1)),
            mask: self.mask.clone(),
        }
    }

    /// View of a single row.
    pub fn row(&self, idx: usize) -> Matrix {
        self.slice(idx as isize, 0, idx as isize, self.cols as isize - 1)
    }

    /// View of a single column.
    pub fn col(&self, idx: usize) -> Matrix {
        self.slice(0, idx as isize, self.rows as isize - 1, idx as isize)
    }

    /// View of this matrix shrunk by `v` from all sides.
    pub fn shrink(&self, v: usize) -> Matrix {
        let v = v as isize;
        self.slice(v, v, self.rows as isize - 1 - v, self.cols as isize - 1 - v)
    }

    /// View shifted along the row direction by `v` (may be negative).
    pub fn shift_r(&self, v: isize) -> Matrix {
        self.slice(v, 0, self.rows as isize - 1 + v, self.cols as isize - 1)
    }

    /// View shifted along the column direction by `v` (may be negative).
    pub fn shift_c(&self, v: isize) -> Matrix {
        self.slice(0, v, self.rows as isize - 1, self.cols as isize - 1 + v)
    }

    /// A view sharing this storage whose visible cells are restricted to
    /// those for which `pred` holds. The new mask is recorded at storage
    /// coordinates and evaluated over the cells currently visible through
    /// this view, so filtering a filtered view intersects the masks.
    ///
    /// The source's window is kept, so a filtered slice stays a slice and
    /// `slice` and `filter` compose to the same view in either order.
    pub fn filter(&self, pred: impl Fn(&Cell) -> bool) -> Matrix {
        let mut allowed = HashSet::new();
        for cell in self.iter() {
            if pred(&cell) {
                allowed.insert(self.to_storage(cell.row, cell.col));
            }
        }
        Matrix {
            rows: self.rows,
            cols: self.cols,
            storage: Rc::clone(&self.storage),
            window: self.window,
            mask: Some(Rc::new(Mask { allowed })),
        }
    }

    /// Lazy traversal over every visible view-local coordinate in row-major
    /// order. Each call starts a fresh, independent traversal; cells are read
    /// from storage at the moment the iterator reaches them, so mutating the
    /// view mid-traversal is unspecified (but never panics).
    pub fn iter(&self) -> CellIter {
        CellIter {
            rows: self.rows,
            cols: self.cols,
            window: self.window,
            mask: self.mask.clone(),
            storage: Rc::clone(&self.storage),
            row: 0,
            col: 0,
        }
    }

    fn ensure_unrestricted(&self, op: &str) -> Result<(), MatrixError> {
        if self.window.is_some() || self.mask.is_some() {
            return Err(MatrixError::Unsupported(format!(
                "{op} is not supported for sliced or filtered matrices"
            )));
        }
        Ok(())
    }

    /// In place inserts a row at `at`, filled from `data` (remaining cells
    /// unset); an `at` past the end appends. Fails on a sliced or filtered
    /// matrix, since aliases would hold stale offsets into the resized
    /// storage.
    pub fn add_row(&mut self, at: usize, data: &[f64]) -> Result<(), MatrixError> {
        self.ensure_unrestricted("add_row")?;
        self.grow_row(at, data);
        Ok(())
    }

    /// In place inserts a column at `at`, filled from `data` top-down.
    pub fn add_column(&mut self, at: usize, data: &[f64]) -> Result<(), MatrixError> {
        self.ensure_unrestricted("add_column")?;
        self.grow_col(at, data);
        Ok(())
    }

    fn grow_row(&mut self, at: usize, data: &[f64]) {
        // past-the-end indexes append
        let at = at.min(self.rows) as isize;
        {
            let mut cells = self.storage.borrow_mut();
            let shifted: Storage = cells
                .drain()
                .map(|((r, c), v)| if r >= at { ((r + 1, c), v) } else { ((r, c), v) })
                .collect();
            *cells = shifted;
            for (col, v) in data.iter().enumerate() {
                cells.insert((at, col as isize), *v);
            }
        }
        self.rows += 1;
    }

    fn grow_col(&mut self, at: usize, data: &[f64]) {
        let at = at.min(self.cols) as isize;
        {
            let mut cells = self.storage.borrow_mut();
            let shifted: Storage = cells
                .drain()
                .map(|((r, c), v)| if c >= at { ((r, c + 1), v) } else { ((r, c), v) })
                .collect();
            *cells = shifted;
            for (row, v) in data.iter().enumerate() {
                cells.insert((row as isize, at), *v);
            }
        }
        self.cols += 1;
    }

    /// Independent copy wrapped into `v` rings of unset rows and columns on
    /// every side, for neighbor-offset access via `shift_r`/`shift_c` plus
    /// `shrink`.
    pub fn wrap(&self, v: usize) -> Matrix {
        let mut out = self.copy();
        for _ in 0..v {
            out.grow_row(0, &[]);
            out.grow_row(out.rows, &[]);
            out.grow_col(0, &[]);
            out.grow_col(out.cols, &[]);
        }
        out
    }

    /// Element-wise applies `f` onto the visible cells, producing a new
    /// matrix via [`Matrix::copy`]. An unset input cell is passed as `None`.
    ///
    /// When this view carries a filter, the filter object is reattached to
    /// the result unchanged. Its coordinates are storage coordinates of the
    /// *source*, while the copy is freshly zero-based, so applying to a view
    /// that is both windowed and masked rejects writes outside the mask (see
    /// the crate tests pinning this interaction).
    pub fn apply(&self, f: impl Fn(Option<f64>, usize, usize) -> f64) -> Result<Matrix, MatrixError> {
        self.try_apply(|v, r, c| Ok(f(v, r, c)))
    }

    fn try_apply(
        &self,
        f: impl Fn(Option<f64>, usize, usize) -> Result<f64, MatrixError>,
    ) -> Result<Matrix, MatrixError> {
        let mut out = self.copy();
        out.mask = self.mask.clone();
        for cell in self.iter() {
            out.set(cell.row, cell.col, f(cell.value, cell.row, cell.col)?)?;
        }
        Ok(out)
    }

    fn zip(&self, m: &Matrix, f: impl Fn(f64, f64) -> f64) -> Result<Matrix, MatrixError> {
        self.try_apply(|v, row, col| {
            Ok(f(
                v.unwrap_or(f64::NAN),
                m.get(row, col)?.unwrap_or(f64::NAN),
            ))
        })
    }

    /// Element-wise addition.
    pub fn plus(&self, m: &Matrix) -> Result<Matrix, MatrixError> {
        self.zip(m, |a, b| a + b)
    }

    /// Element-wise subtraction.
    pub fn minus(&self, m: &Matrix) -> Result<Matrix, MatrixError> {
        self.zip(m, |a, b| a - b)
    }

    /// Element-wise division.
    pub fn divide(&self, m: &Matrix) -> Result<Matrix, MatrixError> {
        self.zip(m, |a, b| a / b)
    }

    /// Element-wise power.
    pub fn power(&self, m: &Matrix) -> Result<Matrix, MatrixError> {
        self.zip(m, |a, b| a.powf(b))
    }

    /// Element-wise multiplication.
    pub fn elem_w_times(&self, m: &Matrix) -> Result<Matrix, MatrixError> {
        self.zip(m, |a, b| a * b)
    }

    /// Element-wise remainder.
    pub fn modulo(&self, m: &Matrix) -> Result<Matrix, MatrixError> {
        self.zip(m, |a, b| a % b)
    }

    /// Linear-algebra matrix product. The inner dimensions must agree, which
    /// surfaces as an out-of-bounds read of the right operand otherwise.
    pub fn times(&self, m: &Matrix) -> Result<Matrix, MatrixError> {
        if self.mask.is_some() {
            return Err(MatrixError::Unsupported(
                "matrix multiplication is not supported for filtered matrices".to_string(),
            ));
        }
        let mut out = Matrix::new(self.rows, m.cols);
        for row in 0..self.rows {
            for col in 0..m.cols {
                let mut sum = 0.0;
                for j in 0..self.cols {
                    sum += self.get(row, j)?.unwrap_or(f64::NAN)
                        * m.get(j, col)?.unwrap_or(f64::NAN);
                }
                out.set(row, col, sum)?;
            }
        }
        Ok(out)
    }

    /// Largest visible cell value; NaN if any visible cell is unset or NaN,
    /// negative infinity when nothing is visible.
    pub fn max(&self) -> f64 {
        let mut best = f64::NEG_INFINITY;
        for cell in self.iter() {
            match cell.value {
                Some(v) if !v.is_nan() => best = best.max(v),
                _ => return f64::NAN,
            }
        }
        best
    }

    /// Smallest visible cell value; NaN and empty-view behavior mirror
    /// [`Matrix::max`].
    pub fn min(&self) -> f64 {
        let mut best = f64::INFINITY;
        for cell in self.iter() {
            match cell.value {
                Some(v) if !v.is_nan() => best = best.min(v),
                _ => return f64::NAN,
            }
        }
        best
    }
}

/// Two matrices are equal when their view shapes match and every view-local
/// coordinate exposes the same visible value (masked-out and unset cells both
/// count as no value).
impl PartialEq for Matrix {
    fn eq(&self, other: &Matrix) -> bool {
        if self.shape() != other.shape() {
            return false;
        }
        for row in 0..self.rows {
            for col in 0..self.cols {
                if self.visible(row, col) != other.visible(row, col) {
                    return false;
                }
            }
        }
        true
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for row in 0..self.rows {
            for col in 0..self.cols {
                if col > 0 {
                    write!(f, " ")?;
                }
                match self.visible(row, col) {
                    Some(v) => write!(f, "{v}")?,
                    None => write!(f, "_")?,
                }
            }
            if row + 1 < self.rows {
                write!(f, "; ")?;
            }
        }
        write!(f, "]")
    }
}

/// Row-major traversal over the visible cells of one view. Holds its own
/// handles onto storage and mask, so the view it came from may be mutated
/// while the traversal is in flight (with unspecified results).
pub struct CellIter {
    rows: usize,
    cols: usize,
    window: Option<(isize, isize)>,
    mask: Option<Rc<Mask>>,
    storage: Rc<RefCell<Storage>>,
    row: usize,
    col: usize,
}

impl Iterator for CellIter {
    type Item = Cell;

    fn next(&mut self) -> Option<Cell> {
        if self.cols == 0 {
            return None;
        }
        while self.row < self.rows {
            let (row, col) = (self.row, self.col);
            self.col += 1;
            if self.col >= self.cols {
                self.col = 0;
                self.row += 1;
            }
            let (row0, col0) = self.window.unwrap_or((0, 0));
            let coord = (row0 + row as isize, col0 + col as isize);
            if self.mask.as_ref().map_or(true, |m| m.allows(coord.0, coord.1)) {
                let value = self.storage.borrow().get(&coord).copied();
                return Some(Cell { row, col, value });
            }
        }
        None
    }
}
