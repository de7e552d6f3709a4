/// ASCII conversion engine for imgascii.
///
/// Splits an image into blocks, reduces each block to a luminance and maps
/// it to a glyph, with rows spread over parallel workers.
pub mod converter;
pub mod reduce;

use ia_core::charset::Ramp;
use ia_core::config::ConvertConfig;
use ia_core::error::ConvertError;
use ia_core::frame::AsciiGrid;
use ia_core::layout::Layout;
use ia_core::traits::PixelGrid;

use crate::converter::GridConverter;

/// Convert an image with the given configuration.
///
/// Plans the layout, selects the ramp and runs the parallel converter. Fails
/// before any worker starts if the configuration or layout is invalid.
///
/// # Errors
/// Returns [`ConvertError`] from configuration validation, layout planning,
/// or the converter.
///
/// # Example
/// ```
/// use ia_ascii::convert_image;
/// use ia_core::config::ConvertConfig;
/// use ia_core::frame::Raster;
///
/// let config = ConvertConfig { columns: 4, col_row_ratio: 1.0, ..ConvertConfig::default() };
/// let grid = convert_image(&Raster::new(8, 8), &config).unwrap();
/// assert_eq!(grid.lines(), ["    ", "    ", "    ", "    "]);
/// ```
pub fn convert_image<I>(image: &I, config: &ConvertConfig) -> Result<AsciiGrid, ConvertError>
where
    I: PixelGrid + Sync + ?Sized,
{
    config.validate()?;
    let layout = Layout::plan(
        image.width(),
        image.height(),
        config.columns,
        config.col_row_ratio,
    )?;
    GridConverter::new(layout, Ramp::select(config.ramp))
        .with_invert(config.invert)
        .convert(image, config.workers)
}
