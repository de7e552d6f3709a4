use crate::error::ConvertError;
use crate::frame::BlockRect;

/// Géométrie d'une conversion : taille des blocs et dimensions de la grille.
///
/// Invariants: all fields > 0, `block_width * columns <= image width`,
/// `block_height * rows <= image height`. Trailing pixels that do not fill a
/// whole block are never sampled.
///
/// # Example
/// ```
/// use ia_core::layout::Layout;
/// let layout = Layout::plan(100, 100, 10, 1.0).unwrap();
/// assert_eq!((layout.block_width, layout.block_height), (10, 10));
/// assert_eq!((layout.columns, layout.rows), (10, 10));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Layout {
    /// Source pixels per output column.
    pub block_width: u32,
    /// Source pixels per output row.
    pub block_height: u32,
    /// Output columns.
    pub columns: u32,
    /// Output rows.
    pub rows: u32,
}

impl Layout {
    /// Plan the block geometry for an image.
    ///
    /// `col_row_ratio` is how many times taller than wide a block is, to
    /// compensate for terminal cells being taller than wide.
    ///
    /// # Errors
    /// - [`ConvertError::Config`] for zero columns or a ratio that is not a
    ///   positive finite number.
    /// - [`ConvertError::ImageTooNarrow`] when `columns > image_width`.
    /// - [`ConvertError::ImageTooShort`] when the block height rounds down to
    ///   zero or no full row fits.
    pub fn plan(
        image_width: u32,
        image_height: u32,
        columns: u32,
        col_row_ratio: f64,
    ) -> Result<Self, ConvertError> {
        if columns == 0 {
            return Err(ConvertError::Config(
                "le nombre de colonnes doit être > 0".to_string(),
            ));
        }
        if !col_row_ratio.is_finite() || col_row_ratio <= 0.0 {
            return Err(ConvertError::Config(format!(
                "ratio colonne/ligne invalide : {col_row_ratio}"
            )));
        }
        if columns > image_width {
            return Err(ConvertError::ImageTooNarrow {
                columns,
                width: image_width,
            });
        }

        let block_width = image_width / columns;
        // `as` saturates, so huge ratios end up with zero rows below.
        let block_height = (f64::from(block_width) * col_row_ratio).floor() as u32;
        let rows = image_height.checked_div(block_height).unwrap_or(0);

        if block_height == 0 || rows == 0 || rows > image_height {
            return Err(ConvertError::ImageTooShort {
                rows,
                block_height,
                height: image_height,
            });
        }

        log::debug!(
            "layout {image_width}×{image_height} → {columns}×{rows} (blocs {block_width}×{block_height})"
        );

        Ok(Self {
            block_width,
            block_height,
            columns,
            rows,
        })
    }

    /// Pixel rectangle covered by the block at (column, row).
    ///
    /// # Example
    /// ```
    /// use ia_core::layout::Layout;
    /// use ia_core::frame::BlockRect;
    /// let layout = Layout::plan(40, 40, 4, 2.0).unwrap();
    /// assert_eq!(layout.block_rect(1, 1), BlockRect::new(10, 20, 20, 40));
    /// ```
    #[inline(always)]
    #[must_use]
    pub fn block_rect(&self, column: u32, row: u32) -> BlockRect {
        let min_x = column * self.block_width;
        let min_y = row * self.block_height;
        BlockRect::new(
            min_x,
            min_y,
            min_x + self.block_width,
            min_y + self.block_height,
        )
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: a successful plan always fits inside the image.
        #[test]
        fn prop_plan_fits_image(
            width in 1u32..=2000,
            height in 1u32..=2000,
            columns in 1u32..=400,
            ratio in 0.1f64..=4.0,
        ) {
            prop_assume!(columns <= width);
            if let Ok(layout) = Layout::plan(width, height, columns, ratio) {
                prop_assert!(layout.block_width >= 1);
                prop_assert!(layout.block_height >= 1);
                prop_assert!(layout.rows >= 1);
                prop_assert!(layout.block_width * layout.columns <= width);
                prop_assert!(layout.block_height * layout.rows <= height);
            } else {
                let block_width = width / columns;
                let block_height = (f64::from(block_width) * ratio).floor() as u32;
                prop_assert!(block_height == 0 || block_height > height);
            }
        }

        /// Property: asking for more columns than pixels always fails the same way.
        #[test]
        fn prop_too_narrow(
            width in 1u32..=500,
            extra in 1u32..=500,
            height in 1u32..=500,
        ) {
            let result = Layout::plan(width, height, width + extra, 1.0);
            prop_assert!(
                matches!(result, Err(ConvertError::ImageTooNarrow { .. })),
                "expected ImageTooNarrow"
            );
        }
    }
}
