use ia_core::error::ConvertError;
use ia_core::frame::BlockRect;
use ia_core::traits::PixelGrid;

/// Mean perceptual gray of a block, in `[0, 255]`.
///
/// Each pixel is converted to 8-bit gray first (see [`PixelGrid::gray`]),
/// then the block is averaged. `rect` must lie inside the image.
///
/// # Errors
/// Returns [`ConvertError::DivideByZero`] for a zero-area block.
///
/// # Example
/// ```
/// use ia_core::frame::{BlockRect, Raster};
/// use ia_ascii::reduce::reduce_block;
///
/// let raster = Raster::from_fn(4, 1, |x, _| if x < 2 { [0, 0, 0, 255] } else { [255, 255, 255, 255] });
/// let lum = reduce_block(&raster, BlockRect::new(0, 0, 4, 1)).unwrap();
/// assert!((lum - 127.5).abs() < 1e-9);
/// ```
#[inline]
pub fn reduce_block<I: PixelGrid + ?Sized>(image: &I, rect: BlockRect) -> Result<f64, ConvertError> {
    let area = rect.area();
    if area == 0 {
        return Err(ConvertError::DivideByZero { rect });
    }
    debug_assert!(rect.max_x <= image.width() && rect.max_y <= image.height());

    let mut total: u64 = 0;
    for y in rect.min_y..rect.max_y {
        for x in rect.min_x..rect.max_x {
            total += u64::from(image.gray(x, y));
        }
    }

    Ok(total as f64 / area as f64)
}

#[cfg(test)]
mod tests {
    use ia_core::frame::Raster;

    use super::*;

    #[test]
    fn solid_blocks() {
        let black = Raster::new(8, 8);
        let white = Raster::filled(8, 8, [255, 255, 255, 255]);
        let rect = BlockRect::new(2, 2, 6, 8);
        assert!(reduce_block(&black, rect).unwrap().abs() < f64::EPSILON);
        assert!((reduce_block(&white, rect).unwrap() - 255.0).abs() < f64::EPSILON);
    }

    #[test]
    fn only_the_block_is_sampled() {
        // Left half white, right half black.
        let raster = Raster::from_fn(10, 2, |x, _| {
            if x < 5 {
                [255, 255, 255, 255]
            } else {
                [0, 0, 0, 255]
            }
        });
        let left = reduce_block(&raster, BlockRect::new(0, 0, 5, 2)).unwrap();
        let right = reduce_block(&raster, BlockRect::new(5, 0, 10, 2)).unwrap();
        let straddle = reduce_block(&raster, BlockRect::new(3, 0, 7, 2)).unwrap();
        assert!((left - 255.0).abs() < f64::EPSILON);
        assert!(right.abs() < f64::EPSILON);
        assert!((straddle - 127.5).abs() < f64::EPSILON);
    }

    #[test]
    fn gray_is_taken_per_pixel_before_averaging() {
        // Pure red then pure blue: 76 and 29 after conversion.
        let raster = Raster::from_fn(2, 1, |x, _| {
            if x == 0 {
                [255, 0, 0, 255]
            } else {
                [0, 0, 255, 255]
            }
        });
        let lum = reduce_block(&raster, BlockRect::new(0, 0, 2, 1)).unwrap();
        assert!((lum - 52.5).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_block_is_an_error() {
        let raster = Raster::new(4, 4);
        for rect in [BlockRect::new(1, 1, 1, 3), BlockRect::new(0, 2, 4, 2)] {
            let err = reduce_block(&raster, rect).unwrap_err();
            assert!(matches!(err, ConvertError::DivideByZero { rect: r } if r == rect));
        }
    }
}
