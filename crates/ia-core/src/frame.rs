use std::fmt;

use crate::error::ConvertError;
use crate::traits::PixelGrid;

/// Image décodée en mémoire. Immuable une fois construite.
///
/// Stocke les pixels en RGBA row-major, 4 bytes par pixel.
///
/// # Example
/// ```
/// use ia_core::frame::Raster;
/// let raster = Raster::new(10, 10);
/// assert_eq!(raster.data().len(), 400);
/// ```
#[derive(Clone, Debug)]
pub struct Raster {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl Raster {
    /// Crée une image noire opaque aux dimensions données.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, [0, 0, 0, 255])
    }

    /// Image where every pixel is `rgba`.
    ///
    /// # Example
    /// ```
    /// use ia_core::frame::Raster;
    /// use ia_core::traits::PixelGrid;
    /// let white = Raster::filled(4, 2, [255, 255, 255, 255]);
    /// assert_eq!(white.gray(3, 1), 255);
    /// ```
    #[must_use]
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let pixels = width as usize * height as usize;
        Self {
            data: rgba.repeat(pixels),
            width,
            height,
        }
    }

    /// Wrap an RGBA8 buffer.
    ///
    /// # Errors
    /// Returns [`ConvertError::Config`] if `data` is not exactly
    /// `width * height * 4` bytes long.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Self, ConvertError> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(ConvertError::Config(format!(
                "buffer RGBA de {} octets pour {width}×{height} (attendu {expected})",
                data.len()
            )));
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Build an image pixel by pixel.
    ///
    /// # Example
    /// ```
    /// use ia_core::frame::Raster;
    /// use ia_core::traits::PixelGrid;
    /// let ramp = Raster::from_fn(256, 1, |x, _| [x as u8, x as u8, x as u8, 255]);
    /// assert_eq!(ramp.gray(128, 0), 128);
    /// ```
    #[must_use]
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> [u8; 4]) -> Self {
        let mut data = Vec::with_capacity(width as usize * height as usize * 4);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&f(x, y));
            }
        }
        Self {
            data,
            width,
            height,
        }
    }

    /// Raw RGBA bytes.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Accès au pixel (x, y) → (r, g, b, a).
    #[inline(always)]
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> (u8, u8, u8, u8) {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        (
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        )
    }
}

impl PixelGrid for Raster {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    /// Transparent pixels read as black (alpha premultiplied).
    #[inline(always)]
    fn rgb(&self, x: u32, y: u32) -> (u8, u8, u8) {
        let (r, g, b, a) = self.pixel(x, y);
        if a == u8::MAX {
            return (r, g, b);
        }
        let premul = |c: u8| ((u16::from(c) * u16::from(a) + 127) / 255) as u8;
        (premul(r), premul(g), premul(b))
    }
}

/// Half-open pixel rectangle `[min_x, max_x) × [min_y, max_y)`.
///
/// # Example
/// ```
/// use ia_core::frame::BlockRect;
/// let rect = BlockRect::new(10, 0, 20, 5);
/// assert_eq!(rect.area(), 50);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockRect {
    /// Inclusive left edge.
    pub min_x: u32,
    /// Inclusive top edge.
    pub min_y: u32,
    /// Exclusive right edge.
    pub max_x: u32,
    /// Exclusive bottom edge.
    pub max_y: u32,
}

impl BlockRect {
    /// Crée un rectangle à partir de ses bords.
    #[must_use]
    pub fn new(min_x: u32, min_y: u32, max_x: u32, max_y: u32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Width in pixels (0 for inverted edges).
    #[must_use]
    pub fn width(&self) -> u32 {
        self.max_x.saturating_sub(self.min_x)
    }

    /// Height in pixels (0 for inverted edges).
    #[must_use]
    pub fn height(&self) -> u32 {
        self.max_y.saturating_sub(self.min_y)
    }

    /// Number of pixels covered.
    #[must_use]
    pub fn area(&self) -> u64 {
        u64::from(self.width()) * u64::from(self.height())
    }
}

impl fmt::Display for BlockRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}) × [{}, {})",
            self.min_x, self.max_x, self.min_y, self.max_y
        )
    }
}

/// Grille de sortie ASCII : une `String` par ligne, de haut en bas.
///
/// Only built from a complete set of lines; never exposed half-filled.
///
/// # Example
/// ```
/// use ia_core::frame::AsciiGrid;
/// let grid = AsciiGrid::from_lines(3, vec!["@@@".into(), "   ".into()]);
/// assert_eq!(grid.rows(), 2);
/// assert_eq!(grid.to_string(), "@@@\n   ");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AsciiGrid {
    lines: Vec<String>,
    columns: u32,
}

impl AsciiGrid {
    /// Assemble a grid from finished lines, each `columns` glyphs wide.
    #[must_use]
    pub fn from_lines(columns: u32, lines: Vec<String>) -> Self {
        debug_assert!(
            lines.iter().all(|l| l.chars().count() == columns as usize),
            "ragged line in grid"
        );
        Self { lines, columns }
    }

    /// Width in glyphs.
    #[must_use]
    pub fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of lines.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.lines.len()
    }

    /// Lines, top to bottom.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Glyph at (column, row), if inside the grid.
    #[must_use]
    pub fn glyph(&self, column: u32, row: usize) -> Option<char> {
        self.lines.get(row)?.chars().nth(column as usize)
    }

    /// Consume the grid, keeping its lines.
    #[must_use]
    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

impl fmt::Display for AsciiGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            f.write_str(line)?;
        }
        Ok(())
    }
}
