use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::error::ConvertError;

/// 10 caractères — compact, bon contraste.
pub const RAMP_SHORT: &str = " .:-=+*#%@";

/// 70 caractères — Paul Bourke, du plus clair au plus dense.
pub const RAMP_LONG: &str =
    " .'`^\",:;Il!i><~+_-?][}{1)(|\\/tfjrxnuvczXYUJCLQ0OZmwqpdbkhao*#MW&8%B@$";

/// Plus grande valeur d'un canal 8 bits.
pub const MAX_LUMINANCE: f64 = 255.0;

static SHORT_GLYPHS: LazyLock<Box<[char]>> = LazyLock::new(|| RAMP_SHORT.chars().collect());
static LONG_GLYPHS: LazyLock<Box<[char]>> = LazyLock::new(|| RAMP_LONG.chars().collect());

/// Which built-in ramp to use.
///
/// Parsed once at the configuration boundary (`"10"`, `"short"`, `"70"`,
/// `"long"`); everything past that works on the enum.
///
/// # Example
/// ```
/// use ia_core::charset::RampKind;
/// let kind: RampKind = "70".parse().unwrap();
/// assert_eq!(kind, RampKind::Long);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RampKind {
    /// 10 glyphes.
    #[default]
    Short,
    /// 70 glyphes.
    Long,
}

impl FromStr for RampKind {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "10" | "short" => Ok(Self::Short),
            "70" | "long" => Ok(Self::Long),
            other => Err(ConvertError::Config(format!(
                "rampe inconnue '{other}' (attendu : 10, 70, short, long)"
            ))),
        }
    }
}

impl fmt::Display for RampKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Short => f.write_str("ramp 10"),
            Self::Long => f.write_str("ramp 70"),
        }
    }
}

/// Immutable glyph ramp, darkest luminance first.
///
/// # Example
/// ```
/// use ia_core::charset::{Ramp, RampKind};
/// let ramp = Ramp::select(RampKind::Short);
/// assert_eq!(ramp.glyph_for(0.0), ' ');
/// assert_eq!(ramp.glyph_for(255.0), '@');
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ramp {
    glyphs: &'static [char],
}

impl Ramp {
    /// Select one of the built-in ramps.
    #[must_use]
    pub fn select(kind: RampKind) -> Self {
        let glyphs: &'static [char] = match kind {
            RampKind::Short => &**SHORT_GLYPHS,
            RampKind::Long => &**LONG_GLYPHS,
        };
        Self { glyphs }
    }

    /// Number of glyphs in the ramp. Always ≥ 2.
    #[must_use]
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    /// Never true for the built-in ramps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Glyphs in ramp order.
    #[must_use]
    pub fn glyphs(&self) -> &'static [char] {
        self.glyphs
    }

    /// Index into the ramp for a luminance in `[0, 255]`.
    ///
    /// `floor(lum / 255 * (len - 1))`, clamped. Out-of-range inputs and NaN
    /// land on the first or last glyph instead of overflowing.
    ///
    /// # Example
    /// ```
    /// use ia_core::charset::{Ramp, RampKind};
    /// let ramp = Ramp::select(RampKind::Short);
    /// assert_eq!(ramp.index_for(127.5), 4);
    /// assert_eq!(ramp.index_for(300.0), 9);
    /// ```
    #[inline(always)]
    #[must_use]
    pub fn index_for(&self, luminance: f64) -> usize {
        let last = self.glyphs.len() - 1;
        let normalized = luminance / MAX_LUMINANCE;
        let scaled = (normalized * last as f64).floor();
        if scaled.is_nan() || scaled <= 0.0 {
            0
        } else {
            (scaled as usize).min(last)
        }
    }

    /// Map a block luminance to its glyph.
    #[inline(always)]
    #[must_use]
    pub fn glyph_for(&self, luminance: f64) -> char {
        self.glyphs[self.index_for(luminance)]
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn kind_strategy() -> impl Strategy<Value = RampKind> {
        prop_oneof![Just(RampKind::Short), Just(RampKind::Long)]
    }

    proptest! {
        /// Property: a brighter block never maps to a darker glyph.
        #[test]
        fn prop_mapping_is_monotonic(
            kind in kind_strategy(),
            a in 0.0f64..=255.0,
            b in 0.0f64..=255.0,
        ) {
            let ramp = Ramp::select(kind);
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(ramp.index_for(lo) <= ramp.index_for(hi));
        }

        /// Property: the index always stays inside the ramp.
        #[test]
        fn prop_index_in_range(kind in kind_strategy(), lum in proptest::num::f64::ANY) {
            let ramp = Ramp::select(kind);
            prop_assert!(ramp.index_for(lum) < ramp.len());
        }
    }
}
