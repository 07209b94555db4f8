//! Strided matrix views over caller-owned buffers.
//!
//! The factorization and solver routines are generic over [`MatrixRef`] / [`MatrixMut`], so they
//! work the same on a fixed-size [`Matrix`], on a flat `[T]` buffer in either memory layout, and
//! on an array of [`Vector`]s viewed as the rows or columns of a matrix.

use std::ops::{Index, IndexMut};

use crate::{Matrix, Vector};

/// Memory layout of a matrix stored in a flat buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Elements of a row are adjacent.
    RowMajor,
    /// Elements of a column are adjacent.
    ColumnMajor,
}

impl Layout {
    /// Returns the `(row stride, column stride)` of a packed `rows`x`cols` matrix.
    fn strides(self, rows: usize, cols: usize) -> (usize, usize) {
        match self {
            Layout::RowMajor => (cols, 1),
            Layout::ColumnMajor => (1, rows),
        }
    }
}

/// Read access to a dense matrix, indexed by `(row, col)`.
pub trait MatrixRef<T: Copy>: Index<(usize, usize), Output = T> {
    fn rows(&self) -> usize;
    fn cols(&self) -> usize;
}

/// Read-write access to a dense matrix, indexed by `(row, col)`.
pub trait MatrixMut<T: Copy>: MatrixRef<T> + IndexMut<(usize, usize)> {
    fn swap_rows(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        for col in 0..self.cols() {
            let tmp = self[(a, col)];
            self[(a, col)] = self[(b, col)];
            self[(b, col)] = tmp;
        }
    }

    fn swap_cols(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        for row in 0..self.rows() {
            let tmp = self[(row, a)];
            self[(row, a)] = self[(row, b)];
            self[(row, b)] = tmp;
        }
    }
}

impl<T: Copy, const R: usize, const C: usize> MatrixRef<T> for Matrix<T, R, C> {
    fn rows(&self) -> usize {
        R
    }

    fn cols(&self) -> usize {
        C
    }
}

impl<T: Copy, const R: usize, const C: usize> MatrixMut<T> for Matrix<T, R, C> {}

#[derive(Debug, Clone, Copy)]
struct Shape {
    rows: usize,
    cols: usize,
    row_stride: usize,
    col_stride: usize,
}

impl Shape {
    fn new(len: usize, rows: usize, cols: usize, row_stride: usize, col_stride: usize) -> Self {
        if rows > 0 && cols > 0 {
            let last = (rows - 1) * row_stride + (cols - 1) * col_stride;
            assert!(
                last < len,
                "buffer of {len} elements is too small for a {rows}x{cols} view \
                 (strides {row_stride}, {col_stride})"
            );
        }
        Self {
            rows,
            cols,
            row_stride,
            col_stride,
        }
    }

    #[inline]
    fn offset(&self, (row, col): (usize, usize)) -> usize {
        assert!(
            row < self.rows && col < self.cols,
            "index ({row}, {col}) out of bounds for a {}x{} matrix view",
            self.rows,
            self.cols,
        );
        row * self.row_stride + col * self.col_stride
    }

    fn transpose(self) -> Self {
        Self {
            rows: self.cols,
            cols: self.rows,
            row_stride: self.col_stride,
            col_stride: self.row_stride,
        }
    }
}

/// A read-only matrix view of a flat buffer.
///
/// # Examples
///
/// ```
/// # use simplicial_linalg::*;
/// let data = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
/// let rows = MatrixView::new(&data, 2, 3, Layout::RowMajor);
/// let cols = MatrixView::new(&data, 3, 2, Layout::ColumnMajor);
/// assert_eq!(rows[(1, 0)], 4.0);
/// assert_eq!(cols[(0, 1)], 4.0);
/// assert_eq!(rows.transpose()[(0, 1)], 4.0);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct MatrixView<'a, T> {
    data: &'a [T],
    shape: Shape,
}

impl<'a, T> MatrixView<'a, T> {
    /// Views the first `rows * cols` elements of `data` as a packed matrix.
    pub fn new(data: &'a [T], rows: usize, cols: usize, layout: Layout) -> Self {
        let (row_stride, col_stride) = layout.strides(rows, cols);
        Self::with_strides(data, rows, cols, row_stride, col_stride)
    }

    /// Views `data` as a matrix with explicit strides.
    ///
    /// Element `(row, col)` lives at `data[row * row_stride + col * col_stride]`. A view of a
    /// sub-matrix is a view of a sub-slice of the parent's buffer with the parent's strides.
    ///
    /// # Panics
    ///
    /// Panics if the last element of the view lies outside of `data`.
    pub fn with_strides(
        data: &'a [T],
        rows: usize,
        cols: usize,
        row_stride: usize,
        col_stride: usize,
    ) -> Self {
        let shape = Shape::new(data.len(), rows, cols, row_stride, col_stride);
        Self { data, shape }
    }

    pub fn row_major(data: &'a [T], rows: usize, cols: usize) -> Self {
        Self::new(data, rows, cols, Layout::RowMajor)
    }

    pub fn col_major(data: &'a [T], rows: usize, cols: usize) -> Self {
        Self::new(data, rows, cols, Layout::ColumnMajor)
    }

    /// Returns a view of the transposed matrix, sharing the same buffer.
    pub fn transpose(self) -> Self {
        Self {
            data: self.data,
            shape: self.shape.transpose(),
        }
    }
}

impl<'a, T: bytemuck::Pod> MatrixView<'a, T> {
    /// Views `vectors` as the rows of a `vectors.len()`x`N` matrix.
    pub fn from_rows<const N: usize>(vectors: &'a [Vector<T, N>]) -> Self {
        Self::row_major(bytemuck::cast_slice(vectors), vectors.len(), N)
    }

    /// Views `vectors` as the columns of an `N`x`vectors.len()` matrix.
    pub fn from_columns<const N: usize>(vectors: &'a [Vector<T, N>]) -> Self {
        Self::col_major(bytemuck::cast_slice(vectors), N, vectors.len())
    }
}

impl<T> Index<(usize, usize)> for MatrixView<'_, T> {
    type Output = T;

    #[inline]
    fn index(&self, pos: (usize, usize)) -> &T {
        &self.data[self.shape.offset(pos)]
    }
}

impl<T: Copy> MatrixRef<T> for MatrixView<'_, T> {
    fn rows(&self) -> usize {
        self.shape.rows
    }

    fn cols(&self) -> usize {
        self.shape.cols
    }
}

/// A mutable matrix view of a flat buffer.
///
/// # Examples
///
/// ```
/// # use simplicial_linalg::*;
/// let mut bases = [vec3(1.0, 2.0, 3.0), vec3(4.0, 5.0, 6.0)];
/// let mut m = MatrixViewMut::from_rows(&mut bases);
/// m.swap_rows(0, 1);
/// m[(0, 2)] = 0.0;
/// assert_eq!(bases, [vec3(4.0, 5.0, 0.0), vec3(1.0, 2.0, 3.0)]);
/// ```
#[derive(Debug)]
pub struct MatrixViewMut<'a, T> {
    data: &'a mut [T],
    shape: Shape,
}

impl<'a, T> MatrixViewMut<'a, T> {
    /// Views the first `rows * cols` elements of `data` as a packed matrix.
    pub fn new(data: &'a mut [T], rows: usize, cols: usize, layout: Layout) -> Self {
        let (row_stride, col_stride) = layout.strides(rows, cols);
        Self::with_strides(data, rows, cols, row_stride, col_stride)
    }

    /// Views `data` as a matrix with explicit strides.
    ///
    /// # Panics
    ///
    /// Panics if the last element of the view lies outside of `data`.
    pub fn with_strides(
        data: &'a mut [T],
        rows: usize,
        cols: usize,
        row_stride: usize,
        col_stride: usize,
    ) -> Self {
        let shape = Shape::new(data.len(), rows, cols, row_stride, col_stride);
        Self { data, shape }
    }

    pub fn row_major(data: &'a mut [T], rows: usize, cols: usize) -> Self {
        Self::new(data, rows, cols, Layout::RowMajor)
    }

    pub fn col_major(data: &'a mut [T], rows: usize, cols: usize) -> Self {
        Self::new(data, rows, cols, Layout::ColumnMajor)
    }

    /// Returns a view of the transposed matrix, sharing the same buffer.
    pub fn transpose(self) -> Self {
        Self {
            data: self.data,
            shape: self.shape.transpose(),
        }
    }

    /// Reborrows this view as a read-only [`MatrixView`].
    pub fn as_view(&self) -> MatrixView<'_, T> {
        MatrixView {
            data: &*self.data,
            shape: self.shape,
        }
    }
}

impl<'a, T: bytemuck::Pod> MatrixViewMut<'a, T> {
    /// Views `vectors` as the rows of a `vectors.len()`x`N` matrix.
    pub fn from_rows<const N: usize>(vectors: &'a mut [Vector<T, N>]) -> Self {
        let rows = vectors.len();
        Self::row_major(bytemuck::cast_slice_mut(vectors), rows, N)
    }

    /// Views `vectors` as the columns of an `N`x`vectors.len()` matrix.
    pub fn from_columns<const N: usize>(vectors: &'a mut [Vector<T, N>]) -> Self {
        let cols = vectors.len();
        Self::col_major(bytemuck::cast_slice_mut(vectors), N, cols)
    }
}

impl<T> Index<(usize, usize)> for MatrixViewMut<'_, T> {
    type Output = T;

    #[inline]
    fn index(&self, pos: (usize, usize)) -> &T {
        &self.data[self.shape.offset(pos)]
    }
}

impl<T> IndexMut<(usize, usize)> for MatrixViewMut<'_, T> {
    #[inline]
    fn index_mut(&mut self, pos: (usize, usize)) -> &mut T {
        &mut self.data[self.shape.offset(pos)]
    }
}

impl<T: Copy> MatrixRef<T> for MatrixViewMut<'_, T> {
    fn rows(&self) -> usize {
        self.shape.rows
    }

    fn cols(&self) -> usize {
        self.shape.cols
    }
}

impl<T: Copy> MatrixMut<T> for MatrixViewMut<'_, T> {}
