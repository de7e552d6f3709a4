/// Configuration, types, and shared structures for imgascii.
///
/// This crate contains the glyph ramps, the layout planner, the pixel
/// model and the error type used across the imgascii workspace.

pub mod charset;
pub mod config;
pub mod error;
pub mod frame;
pub mod layout;
pub mod traits;

pub use charset::{Ramp, RampKind};
pub use config::ConvertConfig;
pub use error::ConvertError;
pub use frame::{AsciiGrid, BlockRect, Raster};
pub use layout::Layout;
pub use traits::PixelGrid;
