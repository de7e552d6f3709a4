use std::path::Path;

use ia_core::error::ConvertError;
use ia_core::frame::Raster;

/// Decode an image file into a [`Raster`].
///
/// The container format is guessed from the file contents. For animated
/// GIFs only the first frame is kept.
///
/// # Errors
/// Returns [`ConvertError::Decode`] (with the decoder error as its source) if
/// the file cannot be opened or decoded.
///
/// # Example
/// ```no_run
/// use ia_source::image::load_image;
/// use std::path::Path;
/// let raster = load_image(Path::new("photo.png")).unwrap();
/// ```
pub fn load_image(path: &Path) -> Result<Raster, ConvertError> {
    let img = image::ImageReader::open(path)
        .map_err(|e| decode_error(path, e))?
        .with_guessed_format()
        .map_err(|e| decode_error(path, e))?
        .decode()
        .map_err(|e| decode_error(path, e))?;
    let raster = to_raster(&img)?;
    log::info!(
        "Image chargée : {} ({}×{})",
        path.display(),
        img.width(),
        img.height()
    );
    Ok(raster)
}

/// Decode an in-memory encoded image.
///
/// # Errors
/// Returns [`ConvertError::Decode`] if the bytes are not a supported image.
pub fn decode_bytes(bytes: &[u8]) -> Result<Raster, ConvertError> {
    let img = image::load_from_memory(bytes).map_err(|e| ConvertError::Decode {
        path: "<mémoire>".to_string(),
        source: Box::new(e),
    })?;
    to_raster(&img)
}

/// Convert a decoded image to RGBA8.
///
/// # Errors
/// Propagates [`Raster::from_rgba`] errors; cannot fail for images produced
/// by the decoder.
pub fn to_raster(img: &image::DynamicImage) -> Result<Raster, ConvertError> {
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Raster::from_rgba(width, height, rgba.into_raw())
}

fn decode_error(
    path: &Path,
    source: impl std::error::Error + Send + Sync + 'static,
) -> ConvertError {
    ConvertError::Decode {
        path: path.display().to_string(),
        source: Box::new(source),
    }
}
