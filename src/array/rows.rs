use crate::prelude::*;

use ndarray::{Array2, ArrayView2, ArrayViewMut2};

/// A row-major table of fixed width backed by a single contiguous buffer
///
/// Element connectivity, node coordinates and data section values all have a width
/// that is constant for the whole block they belong to, so every row lives in one
/// flat `Vec` and rows are recovered from the stride. A row width of zero is
/// allowed, in which case the table has no rows.
///
/// ## Example
///
/// ```
/// let mut coordinates = msh::array::Rows::new(3);
/// coordinates.push_row(&[0.0, 0.0, 0.0]).unwrap();
/// coordinates.push_row(&[1.0, 0.0, 0.0]).unwrap();
///
/// assert_eq!(coordinates.rows(), 2);
/// assert_eq!(coordinates.view()[[1, 0]], 1.0);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Rows<T> {
    width: usize,
    data: Vec<T>,
}

impl<T> Rows<T> {
    /// empty table whose rows will have `width` entries
    pub fn new(width: usize) -> Self {
        Self {
            width,
            data: Vec::new(),
        }
    }

    pub fn with_capacity(width: usize, rows: usize) -> Self {
        Self {
            width,
            data: Vec::with_capacity(width * rows),
        }
    }

    /// wrap an existing flat buffer. The buffer length must be a multiple of `width`
    pub fn from_vec(width: usize, data: Vec<T>) -> Result<Self, RowLength> {
        let rows = Self { width, data };
        if !rows.is_consistent() {
            return Err(RowLength::new(width, rows.data.len()));
        }

        Ok(rows)
    }

    /// number of entries in every row
    pub fn width(&self) -> usize {
        self.width
    }

    /// number of rows currently stored
    pub fn rows(&self) -> usize {
        if self.width == 0 {
            0
        } else {
            self.data.len() / self.width
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// `(rows, width)`
    pub fn shape(&self) -> (usize, usize) {
        (self.rows(), self.width)
    }

    /// the `i`th row, if present
    pub fn row(&self, i: usize) -> Option<&[T]> {
        let start = i.checked_mul(self.width)?;
        let end = start.checked_add(self.width)?;
        self.data.get(start..end).filter(|_| self.width > 0)
    }

    pub fn iter_rows(&self) -> RowIter<'_, T> {
        RowIter {
            rows: self,
            index: 0,
        }
    }

    /// the whole table as one flat slice in row-major order
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn into_inner(self) -> Vec<T> {
        self.data
    }

    /// ensure the buffer length is a whole number of rows
    pub fn is_consistent(&self) -> bool {
        match self.width {
            0 => self.data.is_empty(),
            width => self.data.len() % width == 0,
        }
    }

    /// consume the table into an owned `Array2` without copying
    pub fn into_array2(self) -> Array2<T> {
        let rows = self.rows();
        let mut data = self.data;
        data.truncate(rows * self.width);
        match Array2::from_shape_vec((rows, self.width), data) {
            Ok(array) => array,
            Err(_) => unreachable!("buffer length always equals rows * width"),
        }
    }

    /// borrow the table as a two dimensional `ndarray` view.
    ///
    /// The view borrows from the block holding this table, so it can never outlive the
    /// document it came from.
    pub fn view(&self) -> ArrayView2<'_, T> {
        // a partial trailing row is never part of the view
        let rows = self.rows();
        match ArrayView2::from_shape((rows, self.width), &self.data[..rows * self.width]) {
            Ok(view) => view,
            Err(_) => unreachable!("row slice length always equals rows * width"),
        }
    }

    pub fn view_mut(&mut self) -> ArrayViewMut2<'_, T> {
        let rows = self.rows();
        let width = self.width;
        match ArrayViewMut2::from_shape((rows, width), &mut self.data[..rows * width]) {
            Ok(view) => view,
            Err(_) => unreachable!("row slice length always equals rows * width"),
        }
    }
}

impl<T: Clone> Rows<T> {
    /// append one row. Fails if the row does not have exactly `width` entries
    pub fn push_row(&mut self, row: &[T]) -> Result<(), RowLength> {
        if row.len() != self.width {
            return Err(RowLength::new(self.width, row.len()));
        }

        self.data.extend_from_slice(row);
        Ok(())
    }

    /// append raw values without checking that they complete a row.
    ///
    /// Used by the parsers, which always push whole rows.
    pub(crate) fn extend_from_slice(&mut self, values: &[T]) {
        self.data.extend_from_slice(values);
    }

    /// owned copy of the table as an `Array2`
    pub fn to_array2(&self) -> Array2<T> {
        self.view().to_owned()
    }

    /// build a table from an owned two dimensional array
    pub fn from_array2(array: Array2<T>) -> Self {
        let width = array.ncols();
        // logical (row-major) order regardless of the memory layout of `array`
        let data = array.iter().cloned().collect();

        Self { width, data }
    }
}

pub struct RowIter<'a, T> {
    rows: &'a Rows<T>,
    index: usize,
}

impl<'a, T> Iterator for RowIter<'a, T> {
    type Item = &'a [T];

    fn next(&mut self) -> Option<Self::Item> {
        let row = self.rows.row(self.index)?;
        self.index += 1;
        Some(row)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.rows.rows().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl<'a, T> ExactSizeIterator for RowIter<'a, T> {}

#[derive(Debug, Clone, PartialEq, Eq, Display, Constructor)]
#[display(fmt = "row of length {actual} does not fit a table of width {width}")]
pub struct RowLength {
    pub width: usize,
    pub actual: usize,
}

impl std::error::Error for RowLength {}
