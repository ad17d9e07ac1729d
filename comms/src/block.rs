use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

use crate::{ByteReader, Deserialize, PayloadErr, Result, Serialize};

const ROW_TAG: u32 = 0;
const COLUMN_TAG: u32 = 1;

/// Position of a block inside the matrix it was cut from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, SerdeSerialize, SerdeDeserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockCoord {
    /// The block is the `n`-th row block.
    Row(usize),
    /// The block is the `n`-th column block.
    Column(usize),
}

impl BlockCoord {
    /// Returns the zero based position regardless of the split direction.
    pub fn index(self) -> usize {
        match self {
            BlockCoord::Row(i) | BlockCoord::Column(i) => i,
        }
    }
}

/// A rectangular fragment of a dense `f64` matrix stored in row-major order.
///
/// A block always owns its storage, and `height * width == data.len()`.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseBlock {
    height: usize,
    width: usize,
    coord: BlockCoord,
    data: Vec<f64>,
}

impl DenseBlock {
    /// Creates a new `DenseBlock`.
    ///
    /// # Arguments
    /// * `height` - Amount of rows.
    /// * `width` - Amount of columns.
    /// * `coord` - Where this block sits in its source matrix.
    /// * `data` - Row-major values.
    ///
    /// # Returns
    /// The block or `PayloadErr::ShapeMismatch` if `data` doesn't hold exactly
    /// `height * width` values.
    pub fn new(height: usize, width: usize, coord: BlockCoord, data: Vec<f64>) -> Result<Self> {
        if height.checked_mul(width) != Some(data.len()) {
            return Err(PayloadErr::ShapeMismatch {
                height,
                width,
                len: data.len(),
            });
        }

        Ok(Self {
            height,
            width,
            coord,
            data,
        })
    }

    /// Creates a block filled with zeros.
    pub fn zeros(height: usize, width: usize, coord: BlockCoord) -> Self {
        Self {
            height,
            width,
            coord,
            data: vec![0.0; height * width],
        }
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn coord(&self) -> BlockCoord {
        self.coord
    }

    /// Returns the row-major values.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Returns the `i`-th row.
    ///
    /// # Panics
    /// If `i >= height`.
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.width..(i + 1) * self.width]
    }

    /// Iterates the rows of the block.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        // `chunks_exact(0)` panics, a zero width block has no values anyway.
        self.data.chunks_exact(self.width.max(1)).take(self.height)
    }

    pub fn into_data(self) -> Vec<f64> {
        self.data
    }
}

impl<'a> Serialize<'a> for DenseBlock {
    fn serialize(&'a self, buf: &mut Vec<u8>) -> Option<&'a [u8]> {
        let (tag, index) = match self.coord {
            BlockCoord::Row(i) => (ROW_TAG, i),
            BlockCoord::Column(i) => (COLUMN_TAG, i),
        };

        buf.extend_from_slice(&tag.to_be_bytes());
        buf.extend_from_slice(&(index as u64).to_be_bytes());
        buf.extend_from_slice(&(self.height as u64).to_be_bytes());
        buf.extend_from_slice(&(self.width as u64).to_be_bytes());
        Some(bytemuck::cast_slice(&self.data))
    }
}

impl Deserialize for DenseBlock {
    fn deserialize(buf: &[u8]) -> Result<Self> {
        let mut reader = ByteReader::new(buf);

        let tag = reader.read_u32("block coord")?;
        let index = reader.read_u64("block index")? as usize;
        let coord = match tag {
            ROW_TAG => BlockCoord::Row(index),
            COLUMN_TAG => BlockCoord::Column(index),
            tag => return Err(PayloadErr::UnknownTag { field: "block coord", tag }),
        };

        let height = reader.read_u64("block height")? as usize;
        let width = reader.read_u64("block width")? as usize;

        let raw = reader.read_rest();
        if raw.len() % size_of::<f64>() != 0 {
            return Err(PayloadErr::TrailingBytes {
                consumed: buf.len() - raw.len(),
                remaining: raw.len() % size_of::<f64>(),
            });
        }

        let data = raw
            .chunks_exact(size_of::<f64>())
            .map(bytemuck::pod_read_unaligned::<f64>)
            .collect();

        Self::new(height, width, coord, data)
    }
}
