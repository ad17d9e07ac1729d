use std::path::Path;

use comms::{ByteReader, DenseBlock, PayloadErr};

use crate::{DriverErr, Result};

const F64_SIZE: usize = size_of::<f64>();

/// A dense row-major `f64` matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    height: usize,
    width: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Creates a new `Matrix`.
    ///
    /// # Arguments
    /// * `height` - Amount of rows.
    /// * `width` - Amount of columns.
    /// * `data` - Row-major values.
    ///
    /// # Returns
    /// The matrix or `MalformedPayload` if `data` doesn't hold exactly `height * width` values.
    pub fn new(height: usize, width: usize, data: Vec<f64>) -> Result<Self> {
        if height.checked_mul(width) != Some(data.len()) {
            return Err(PayloadErr::ShapeMismatch {
                height,
                width,
                len: data.len(),
            }
            .into());
        }

        Ok(Self {
            height,
            width,
            data,
        })
    }

    pub fn zeros(height: usize, width: usize) -> Self {
        Self {
            height,
            width,
            data: vec![0.0; height * width],
        }
    }

    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m.data[i * n + i] = 1.0;
        }
        m
    }

    /// Builds a matrix out of its rows.
    ///
    /// # Returns
    /// The matrix or `MalformedPayload` if the rows are ragged.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map(Vec::len).unwrap_or_default();
        let data: Vec<f64> = rows.iter().flatten().copied().collect();
        Self::new(height, width, data)
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.width + j]
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.width..(i + 1) * self.width]
    }

    pub(crate) fn row_mut(&mut self, i: usize) -> &mut [f64] {
        &mut self.data[i * self.width..(i + 1) * self.width]
    }

    /// Computes `self * rhs` locally.
    ///
    /// # Returns
    /// The product or `DimensionMismatch` if `self.width != rhs.height`.
    pub fn multiply(&self, rhs: &Matrix) -> Result<Matrix> {
        if self.width != rhs.height {
            return Err(DriverErr::DimensionMismatch {
                left_width: self.width,
                right_height: rhs.height,
            });
        }

        let mut out = Matrix::zeros(self.height, rhs.width);
        for i in 0..self.height {
            let lhs_row = self.row(i);
            let out_row = out.row_mut(i);
            for (k, &a) in lhs_row.iter().enumerate() {
                for (o, &b) in out_row.iter_mut().zip(rhs.row(k)) {
                    *o += a * b;
                }
            }
        }

        Ok(out)
    }

    /// Returns the top left `n x n` corner, clipped to the matrix size.
    pub fn corner(&self, n: usize) -> Vec<Vec<f64>> {
        (0..n.min(self.height))
            .map(|i| self.row(i)[..n.min(self.width)].to_vec())
            .collect()
    }

    /// Decodes a matrix from its binary layout.
    ///
    /// The layout is a big-endian `u64` height, a big-endian `u64` width and
    /// `height * width` big-endian `f64` values in row-major order.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut reader = ByteReader::new(bytes);
        let height = reader.read_u64("matrix height")? as usize;
        let width = reader.read_u64("matrix width")? as usize;

        let len = height
            .checked_mul(width)
            .and_then(|n| n.checked_mul(F64_SIZE))
            .ok_or(PayloadErr::ShapeMismatch {
                height,
                width,
                len: reader.remaining() / F64_SIZE,
            })?;

        let data = reader
            .read_exact(len, "matrix values")?
            .chunks_exact(F64_SIZE)
            .map(|chunk| {
                let mut be = [0; F64_SIZE];
                be.copy_from_slice(chunk);
                f64::from_be_bytes(be)
            })
            .collect();

        reader.finish()?;
        Self::new(height, width, data)
    }

    /// Encodes the matrix with the layout read by `from_bytes`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(2 * size_of::<u64>() + self.data.len() * F64_SIZE);
        buf.extend_from_slice(&(self.height as u64).to_be_bytes());
        buf.extend_from_slice(&(self.width as u64).to_be_bytes());
        for v in &self.data {
            buf.extend_from_slice(&v.to_be_bytes());
        }
        buf
    }

    /// Loads a matrix from a binary file.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        Self::from_bytes(&bytes)
    }

    /// Writes the matrix to a binary file, replacing it if present.
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        tokio::fs::write(path, self.to_bytes()).await?;
        Ok(())
    }
}

impl From<DenseBlock> for Matrix {
    fn from(block: DenseBlock) -> Self {
        Self {
            height: block.height(),
            width: block.width(),
            data: block.into_data(),
        }
    }
}
