//! Homogeneous transform kernel
//!
//! Points are row vectors `[x, y, 1]`, so a point is transformed by
//! right-multiplying it with a 3x3 matrix and transforms compose left to
//! right: `rotate(a) · translate(p)` rotates first, then translates.
//! Vertex lists are stored as `n×3` matrices and transformed in one multiply.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Dense row-major matrix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Zero-filled `rows×cols` matrix
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m[(i, i)] = 1.0;
        }
        m
    }

    /// Build from equally sized rows
    pub fn from_rows<const C: usize>(rows: &[[f64; C]]) -> Self {
        let data = rows.iter().flat_map(|r| r.iter().copied()).collect();
        Self {
            rows: rows.len(),
            cols: C,
            data,
        }
    }

    /// `n×3` homogeneous vertex list
    pub fn from_points(points: &[DVec2]) -> Self {
        let data = points.iter().flat_map(|p| [p.x, p.y, 1.0]).collect();
        Self {
            rows: points.len(),
            cols: 3,
            data,
        }
    }

    pub fn translate(x: f64, y: f64) -> Self {
        Self::from_rows(&[[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [x, y, 1.0]])
    }

    /// Rotation by `delta` radians (counter-clockwise on a y-down screen)
    pub fn rotate(delta: f64) -> Self {
        let (sin, cos) = delta.sin_cos();
        Self::from_rows(&[[cos, -sin, 0.0], [sin, cos, 0.0], [0.0, 0.0, 1.0]])
    }

    pub fn scale(sx: f64, sy: f64) -> Self {
        Self::from_rows(&[[sx, 0.0, 0.0], [0.0, sy, 0.0], [0.0, 0.0, 1.0]])
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Row `i` as a slice
    #[inline]
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// `(n×m)·(m×p) → (n×p)`
    pub fn multiply(&self, other: &Matrix) -> Matrix {
        let mut out = Matrix::zeros(self.rows, other.cols);
        self.multiply_into(other, &mut out);
        out
    }

    /// Multiply into a preallocated `n×p` result without allocating
    pub fn multiply_into(&self, other: &Matrix, out: &mut Matrix) {
        assert_eq!(
            self.cols, other.rows,
            "matrix dimension mismatch: {}x{} · {}x{}",
            self.rows, self.cols, other.rows, other.cols
        );
        assert!(
            out.rows == self.rows && out.cols == other.cols,
            "result must be {}x{}, got {}x{}",
            self.rows,
            other.cols,
            out.rows,
            out.cols
        );

        for i in 0..self.rows {
            for j in 0..other.cols {
                let mut sum = 0.0;
                for k in 0..self.cols {
                    sum += self[(i, k)] * other[(k, j)];
                }
                out[(i, j)] = sum;
            }
        }
    }

    /// Transform a single point by a 3x3 homogeneous matrix
    #[inline]
    pub fn transform_point(&self, p: DVec2) -> DVec2 {
        debug_assert!(self.rows == 3 && self.cols == 3);
        DVec2::new(
            p.x * self[(0, 0)] + p.y * self[(1, 0)] + self[(2, 0)],
            p.x * self[(0, 1)] + p.y * self[(1, 1)] + self[(2, 1)],
        )
    }

    /// Uniform scale factor of a similarity transform
    pub fn scale_factor(&self) -> f64 {
        DVec2::new(self[(0, 0)], self[(0, 1)]).length()
    }
}

impl std::ops::Index<(usize, usize)> for Matrix {
    type Output = f64;

    #[inline]
    fn index(&self, (i, j): (usize, usize)) -> &f64 {
        &self.data[i * self.cols + j]
    }
}

impl std::ops::IndexMut<(usize, usize)> for Matrix {
    #[inline]
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut f64 {
        &mut self.data[i * self.cols + j]
    }
}
