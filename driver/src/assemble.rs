use comms::DenseBlock;

use crate::{DriverErr, Matrix, Result};

/// Copies the rows of `block` into `output`, starting at `start_row`.
///
/// # Returns
/// The row right past the appended block, or `OutOfBounds` if the block is
/// wider than the output or runs past its last row. The output is left
/// untouched on failure.
pub fn append(output: &mut Matrix, block: &DenseBlock, start_row: usize) -> Result<usize> {
    let end_row = match start_row.checked_add(block.height()) {
        Some(end) if end <= output.height() && block.width() == output.width() => end,
        _ => {
            return Err(DriverErr::OutOfBounds {
                start_row,
                block_height: block.height(),
                block_width: block.width(),
                output_height: output.height(),
                output_width: output.width(),
            });
        }
    };

    for (i, row) in block.rows().enumerate() {
        output.row_mut(start_row + i).copy_from_slice(row);
    }

    Ok(end_row)
}

#[cfg(test)]
mod tests {
    use comms::BlockCoord;

    use super::*;

    fn block(height: usize, width: usize, fill: f64) -> DenseBlock {
        DenseBlock::new(height, width, BlockCoord::Row(0), vec![fill; height * width]).unwrap()
    }

    #[test]
    fn appends_at_increasing_offsets() {
        let mut out = Matrix::zeros(3, 2);

        let next = append(&mut out, &block(2, 2, 1.0), 0).unwrap();
        assert_eq!(next, 2);
        let next = append(&mut out, &block(1, 2, 2.0), next).unwrap();
        assert_eq!(next, 3);

        assert_eq!(out.data(), &[1.0, 1.0, 1.0, 1.0, 2.0, 2.0]);
    }

    #[test]
    fn running_past_the_last_row_is_out_of_bounds() {
        let mut out = Matrix::zeros(3, 2);
        assert!(matches!(
            append(&mut out, &block(2, 2, 1.0), 2),
            Err(DriverErr::OutOfBounds { start_row: 2, .. })
        ));
        assert!(out.data().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn width_mismatch_is_out_of_bounds() {
        let mut out = Matrix::zeros(3, 2);
        assert!(matches!(
            append(&mut out, &block(1, 3, 1.0), 0),
            Err(DriverErr::OutOfBounds { block_width: 3, .. })
        ));
    }
}
