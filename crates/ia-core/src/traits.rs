/// Read-only pixel access used by the block reducer.
///
/// Implémenté par : `Raster`.
///
/// # Example
/// ```
/// use ia_core::traits::PixelGrid;
///
/// struct Checker;
/// impl PixelGrid for Checker {
///     fn width(&self) -> u32 { 2 }
///     fn height(&self) -> u32 { 2 }
///     fn rgb(&self, x: u32, y: u32) -> (u8, u8, u8) {
///         if (x + y) % 2 == 0 { (255, 255, 255) } else { (0, 0, 0) }
///     }
/// }
/// assert_eq!(Checker.gray(0, 0), 255);
/// assert_eq!(Checker.gray(1, 0), 0);
/// ```
pub trait PixelGrid {
    /// Width in pixels.
    fn width(&self) -> u32;

    /// Height in pixels.
    fn height(&self) -> u32;

    /// Color of pixel (x, y), alpha already applied.
    ///
    /// CONTRAT : `x < width()` et `y < height()`.
    fn rgb(&self, x: u32, y: u32) -> (u8, u8, u8);

    /// Perceptual 8-bit gray of pixel (x, y).
    ///
    /// BT.601 weights (0.299, 0.587, 0.114) in 16-bit fixed point, rounded.
    #[inline(always)]
    fn gray(&self, x: u32, y: u32) -> u8 {
        let (r, g, b) = self.rgb(x, y);
        gray_bt601(r, g, b)
    }
}

/// BT.601 luma of an 8-bit RGB triple.
///
/// # Example
/// ```
/// use ia_core::traits::gray_bt601;
/// assert_eq!(gray_bt601(255, 255, 255), 255);
/// assert_eq!(gray_bt601(0, 0, 0), 0);
/// ```
#[inline(always)]
#[must_use]
pub fn gray_bt601(r: u8, g: u8, b: u8) -> u8 {
    // 19595 + 38470 + 7471 == 1 << 16
    ((19595 * u32::from(r) + 38470 * u32::from(g) + 7471 * u32::from(b) + (1 << 15)) >> 16) as u8
}
