use rand::Rng;
use rand_distr::StandardNormal;

use crate::error::{check_len, NnError, Result};

/// Dense row-major matrix.
///
/// Layers store weights as `rows = outputs`, `cols = inputs`. Datasets use the
/// opposite convention: one sample per column (`features × samples`).
///
/// The fields are public; `data` must hold `rows` rows of `cols` values each.
/// `from_data` and `from_columns` guarantee this, and `check_shape` verifies
/// a hand-built matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<Vec<f64>>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix {
            rows,
            cols,
            data: vec![vec![0.0; cols]; rows],
        }
    }

    /// Uniform samples in [-1, 1).
    pub fn random_uniform<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Matrix {
        let mut res = Matrix::zeros(rows, cols);
        for row in res.data.iter_mut() {
            for value in row.iter_mut() {
                *value = rng.gen::<f64>() * 2.0 - 1.0;
            }
        }
        res
    }

    /// He initialization: samples from N(0, sqrt(2 / cols)).
    ///
    /// Recommended before ReLU layers. The variance 2/fan_in accounts for
    /// the fact that ReLU zeroes half of its inputs on average.
    ///
    /// Shape: (rows, cols). `cols` is the fan-in (number of input connections).
    pub fn he<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Matrix {
        Matrix::normal(rows, cols, (2.0 / cols as f64).sqrt(), rng)
    }

    /// Xavier (Glorot) initialization: samples from N(0, sqrt(1 / cols)).
    ///
    /// Recommended before Sigmoid/Tanh/Identity layers.
    pub fn xavier<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Matrix {
        Matrix::normal(rows, cols, (1.0 / cols as f64).sqrt(), rng)
    }

    fn normal<R: Rng + ?Sized>(rows: usize, cols: usize, std_dev: f64, rng: &mut R) -> Matrix {
        let mut res = Matrix::zeros(rows, cols);
        for row in res.data.iter_mut() {
            for value in row.iter_mut() {
                let sample: f64 = rng.sample(StandardNormal);
                *value = sample * std_dev;
            }
        }
        res
    }

    /// Builds a matrix from rows. Every row must have the same length.
    pub fn from_data(data: Vec<Vec<f64>>) -> Result<Matrix> {
        let cols = data.first().map_or(0, Vec::len);
        for row in &data {
            check_len("Matrix::from_data row", cols, row.len())?;
        }
        Ok(Matrix {
            rows: data.len(),
            cols,
            data,
        })
    }

    /// Builds a `len × columns.len()` matrix whose j-th column is `columns[j]`.
    /// This is how per-sample vectors become a `features × samples` dataset.
    pub fn from_columns(columns: &[Vec<f64>]) -> Result<Matrix> {
        let Some(first) = columns.first() else {
            return Err(NnError::Config("cannot build a matrix from zero columns".into()));
        };
        let rows = first.len();
        let mut res = Matrix::zeros(rows, columns.len());
        for (j, column) in columns.iter().enumerate() {
            check_len("Matrix::from_columns column", rows, column.len())?;
            for (i, &value) in column.iter().enumerate() {
                res.data[i][j] = value;
            }
        }
        Ok(res)
    }

    /// Fails with `ShapeMismatch` when `data` disagrees with `rows`/`cols`.
    pub fn check_shape(&self) -> Result<()> {
        check_len("Matrix row count", self.rows, self.data.len())?;
        for row in &self.data {
            check_len("Matrix row", self.cols, row.len())?;
        }
        Ok(())
    }

    /// Copies column `j` out as a vector. `j` must be below `cols`.
    pub fn column(&self, j: usize) -> Vec<f64> {
        self.data.iter().map(|row| row[j]).collect()
    }

    pub fn transpose(&self) -> Matrix {
        let mut res = Matrix::zeros(self.cols, self.rows);

        for i in 0..res.rows {
            for j in 0..res.cols {
                res.data[i][j] = self.data[j][i];
            }
        }

        res
    }

    /// `self · x`. The caller guarantees `x.len() == cols`.
    pub fn mul_vec(&self, x: &[f64]) -> Vec<f64> {
        self.data
            .iter()
            .map(|row| row.iter().zip(x).map(|(w, v)| w * v).sum())
            .collect()
    }

    /// `selfᵗ · v` without materializing the transpose. The caller guarantees
    /// `v.len() == rows`.
    pub fn transpose_mul_vec(&self, v: &[f64]) -> Vec<f64> {
        let mut res = vec![0.0; self.cols];
        for (row, &scale) in self.data.iter().zip(v) {
            for (out, w) in res.iter_mut().zip(row) {
                *out += w * scale;
            }
        }
        res
    }

    /// `self += u ⊗ vᵗ`, with `u.len() == rows` and `v.len() == cols`.
    pub fn add_outer(&mut self, u: &[f64], v: &[f64]) {
        for (row, &a) in self.data.iter_mut().zip(u) {
            for (value, &b) in row.iter_mut().zip(v) {
                *value += a * b;
            }
        }
    }

    /// `self -= scale · other`, element-wise. Shapes must agree.
    pub fn scaled_sub_assign(&mut self, scale: f64, other: &Matrix) {
        debug_assert_eq!((self.rows, self.cols), (other.rows, other.cols));
        for (row, other_row) in self.data.iter_mut().zip(&other.data) {
            for (value, o) in row.iter_mut().zip(other_row) {
                *value -= scale * o;
            }
        }
    }

    pub fn fill(&mut self, value: f64) {
        for row in self.data.iter_mut() {
            row.iter_mut().for_each(|v| *v = value);
        }
    }

    pub fn map<F>(&self, functor: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self
                .data
                .iter()
                .map(|row| row.iter().map(|&x| functor(x)).collect())
                .collect(),
        }
    }
}
