use std::ops::Range;

use comms::{BlockCoord, DenseBlock};

use crate::{DriverErr, Matrix, Result};

/// Splits `size` units into `parts` contiguous ranges.
///
/// The first `size % parts` ranges get one extra unit, so sizes differ by at
/// most one and cover `[0..size)` exactly.
///
/// # Returns
/// The ranges or `InvalidPartition` if `parts` is zero or greater than `size`.
pub fn split_ranges(size: usize, parts: usize) -> Result<Vec<Range<usize>>> {
    if parts == 0 || parts > size {
        return Err(DriverErr::InvalidPartition { parts, size });
    }

    let base = size / parts;
    let rem = size % parts;

    let ranges = (0..parts)
        .map(|i| {
            let start = i * base + i.min(rem);
            let extra = if i < rem { 1 } else { 0 };
            start..start + base + extra
        })
        .collect();

    Ok(ranges)
}

/// Splits `matrix` into `parts` row blocks.
///
/// Every block owns a copy of its rows and carries `BlockCoord::Row(i)`.
///
/// # Arguments
/// * `matrix` - The source matrix, it can be dropped right after.
/// * `parts` - The amount of blocks to produce.
///
/// # Returns
/// The blocks in row order or `InvalidPartition`.
pub fn split_rows(matrix: &Matrix, parts: usize) -> Result<Vec<DenseBlock>> {
    let width = matrix.width();

    split_ranges(matrix.height(), parts)?
        .into_iter()
        .enumerate()
        .map(|(i, rows)| {
            let height = rows.len();
            let data = matrix.data()[rows.start * width..rows.end * width].to_vec();
            Ok(DenseBlock::new(height, width, BlockCoord::Row(i), data)?)
        })
        .collect()
}

/// Splits `matrix` into `parts` column blocks.
///
/// Every block owns a copy of its columns and carries `BlockCoord::Column(i)`.
///
/// # Arguments
/// * `matrix` - The source matrix, it can be dropped right after.
/// * `parts` - The amount of blocks to produce.
///
/// # Returns
/// The blocks in column order or `InvalidPartition`.
pub fn split_columns(matrix: &Matrix, parts: usize) -> Result<Vec<DenseBlock>> {
    let height = matrix.height();

    split_ranges(matrix.width(), parts)?
        .into_iter()
        .enumerate()
        .map(|(j, cols)| {
            let width = cols.len();
            let mut data = Vec::with_capacity(height * width);
            for i in 0..height {
                data.extend_from_slice(&matrix.row(i)[cols.clone()]);
            }
            Ok(DenseBlock::new(height, width, BlockCoord::Column(j), data)?)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counting(height: usize, width: usize) -> Matrix {
        let data = (0..height * width).map(|v| v as f64).collect();
        Matrix::new(height, width, data).unwrap()
    }

    #[test]
    fn ranges_are_balanced_and_front_loaded() {
        for size in 1..=40 {
            for parts in 1..=size {
                let ranges = split_ranges(size, parts).unwrap();
                let base = size / parts;
                let rem = size % parts;

                assert_eq!(ranges.len(), parts);
                assert_eq!(ranges.first().unwrap().start, 0);
                assert_eq!(ranges.last().unwrap().end, size);
                assert_eq!(ranges.iter().map(Range::len).sum::<usize>(), size);

                for (i, range) in ranges.iter().enumerate() {
                    let expected = if i < rem { base + 1 } else { base };
                    assert_eq!(range.len(), expected, "size {size} parts {parts} block {i}");
                }

                for pair in ranges.windows(2) {
                    assert_eq!(pair[0].end, pair[1].start);
                }
            }
        }
    }

    #[test]
    fn too_many_or_zero_parts_is_invalid() {
        for size in 0..10 {
            for parts in [0, size + 1, size + 7] {
                assert!(matches!(
                    split_ranges(size, parts),
                    Err(DriverErr::InvalidPartition { .. })
                ));
            }
        }
    }

    #[test]
    fn rows_copy_contiguous_ranges() {
        // 5 rows into 3 blocks => 2, 2, 1
        let m = counting(5, 2);
        let blocks = split_rows(&m, 3).unwrap();

        let heights: Vec<_> = blocks.iter().map(DenseBlock::height).collect();
        assert_eq!(heights, [2, 2, 1]);
        assert_eq!(blocks[1].coord(), BlockCoord::Row(1));
        assert_eq!(blocks[1].data(), &[4.0, 5.0, 6.0, 7.0]);
        assert_eq!(blocks[2].data(), &[8.0, 9.0]);
    }

    #[test]
    fn columns_copy_contiguous_ranges() {
        // 3 columns into 2 blocks => 2, 1
        let m = counting(2, 3);
        let blocks = split_columns(&m, 2).unwrap();

        assert_eq!(blocks[0].width(), 2);
        assert_eq!(blocks[0].height(), 2);
        assert_eq!(blocks[0].data(), &[0.0, 1.0, 3.0, 4.0]);
        assert_eq!(blocks[1].coord(), BlockCoord::Column(1));
        assert_eq!(blocks[1].data(), &[2.0, 5.0]);
    }

    #[test]
    fn blocks_outlive_their_source() {
        let m = counting(4, 4);
        let expected = m.row(3).to_vec();
        let rows = split_rows(&m, 4).unwrap();
        drop(m);

        assert_eq!(rows[3].data(), expected.as_slice());
    }

    #[test]
    fn splitting_more_parts_than_rows_fails() {
        let m = counting(2, 8);
        assert!(matches!(
            split_rows(&m, 3),
            Err(DriverErr::InvalidPartition { parts: 3, size: 2 })
        ));
        assert!(split_columns(&m, 8).is_ok());
    }
}
