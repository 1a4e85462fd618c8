//! Grid placement for board images.
//!
//! Images are laid out row-major in uniform cells. The cell size is the
//! average image size grown by a padding fraction, so images much larger
//! than the average can overlap their neighbours.

use log::{debug, info};

use crate::board::Board;

/// Padding added to the average image size when no settings override it.
pub const DEFAULT_PADDING: f64 = 0.1;

/// Grid geometry derived from a board.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    pub count: usize,
    pub rows: usize,
    pub cols: usize,
    pub cell_width: f64,
    pub cell_height: f64,
}

/// What a reorganization did, for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSummary {
    pub images: usize,
    pub rows: usize,
    pub cols: usize,
}

impl GridLayout {
    /// Compute the layout for `board`, or `None` if it has no images.
    ///
    /// `cols` is the integer square root of the image count and `rows` is
    /// whatever is needed to fit the rest, so two images give one column
    /// and two rows.
    pub fn for_board(board: &Board, padding: f64) -> Option<Self> {
        let count = board.len();
        if count == 0 {
            return None;
        }

        let cols = count.isqrt();
        let rows = count.div_ceil(cols);

        let n = count as f64;
        let avg_width = board.images().iter().map(|img| img.width).sum::<f64>() / n;
        let avg_height = board.images().iter().map(|img| img.height).sum::<f64>() / n;
        let factor = 1.0 + padding;

        Some(Self {
            count,
            rows,
            cols,
            cell_width: avg_width * factor,
            cell_height: avg_height * factor,
        })
    }

    /// Top-left corner of the cell for the image at `index`.
    pub fn position(&self, index: usize) -> (f64, f64) {
        let row = index / self.cols;
        let col = index % self.cols;
        (col as f64 * self.cell_width, row as f64 * self.cell_height)
    }

    pub fn summary(&self) -> GridSummary {
        GridSummary {
            images: self.count,
            rows: self.rows,
            cols: self.cols,
        }
    }
}

/// Move every image on `board` into its grid cell and reset rotation and scale.
///
/// Returns `None` and leaves the board untouched if there are no images.
pub fn reorganize(board: &mut Board, padding: f64) -> Option<GridSummary> {
    let layout = GridLayout::for_board(board, padding)?;
    debug!(
        "cell size {:.2}x{:.2} for {} images",
        layout.cell_width, layout.cell_height, layout.count
    );

    for (index, image) in board.images_mut().iter_mut().enumerate() {
        let (x, y) = layout.position(index);
        image.place_at(x, y);
    }

    info!(
        "placed {} images on a {}x{} grid",
        layout.count, layout.rows, layout.cols
    );
    Some(layout.summary())
}
