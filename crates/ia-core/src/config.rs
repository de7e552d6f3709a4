use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::charset::RampKind;
use crate::error::ConvertError;

/// Configuration d'une conversion.
///
/// Sérialisable en TOML. Chaque champ a une valeur par défaut saine.
///
/// # Example
/// ```
/// use ia_core::config::ConvertConfig;
/// let config = ConvertConfig::default();
/// assert_eq!(config.columns, 80);
/// assert!(config.workers >= 1);
/// ```
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ConvertConfig {
    /// Nombre de colonnes de sortie.
    pub columns: u32,
    /// Column-to-row ratio (typiquement ~2.33 pour les polices terminal).
    pub col_row_ratio: f64,
    /// Rampe de glyphes.
    pub ramp: RampKind,
    /// Nombre de workers. Clamped to the available compute units at run time.
    pub workers: usize,
    /// Inverser la luminance (pour fond clair).
    pub invert: bool,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            columns: 80,
            col_row_ratio: 2.33,
            ramp: RampKind::Short,
            workers: available_workers(),
            invert: false,
        }
    }
}

impl ConvertConfig {
    /// Check the value ranges that serde cannot express.
    ///
    /// # Errors
    /// Returns [`ConvertError::Config`] for zero columns, zero workers, or a
    /// ratio that is not a positive finite number.
    pub fn validate(&self) -> Result<(), ConvertError> {
        if self.columns == 0 {
            return Err(ConvertError::Config(
                "columns doit être > 0".to_string(),
            ));
        }
        if !self.col_row_ratio.is_finite() || self.col_row_ratio <= 0.0 {
            return Err(ConvertError::Config(format!(
                "col_row_ratio doit être > 0 (reçu {})",
                self.col_row_ratio
            )));
        }
        if self.workers == 0 {
            return Err(ConvertError::Config(
                "workers doit être ≥ 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Number of compute units this process may use (at least 1).
#[must_use]
pub fn available_workers() -> usize {
    std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get)
}

/// Structure TOML intermédiaire pour désérialisation avec valeurs optionnelles.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    convert: Option<ConvertSection>,
}

/// `[convert]` section, all fields optional for partial override.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ConvertSection {
    columns: Option<u32>,
    col_row_ratio: Option<f64>,
    ramp: Option<RampKind>,
    workers: Option<usize>,
    invert: Option<bool>,
}

/// Parse TOML text and merge it over the defaults.
///
/// # Errors
/// Returns an error if the text is not valid TOML for this schema or if the
/// merged values fail [`ConvertConfig::validate`].
///
/// # Example
/// ```
/// use ia_core::config::parse_config;
/// use ia_core::charset::RampKind;
/// let config = parse_config("[convert]\ncolumns = 120\nramp = \"long\"\n").unwrap();
/// assert_eq!(config.columns, 120);
/// assert_eq!(config.ramp, RampKind::Long);
/// ```
pub fn parse_config(content: &str) -> Result<ConvertConfig> {
    let file: ConfigFile = toml::from_str(content).context("Erreur de parsing TOML")?;

    let mut config = ConvertConfig::default();
    if let Some(c) = file.convert {
        if let Some(v) = c.columns {
            config.columns = v;
        }
        if let Some(v) = c.col_row_ratio {
            config.col_row_ratio = v;
        }
        if let Some(v) = c.ramp {
            config.ramp = v;
        }
        if let Some(v) = c.workers {
            config.workers = v;
        }
        if let Some(v) = c.invert {
            config.invert = v;
        }
    }

    config.validate()?;
    Ok(config)
}

/// Charge un fichier TOML et fusionne avec les valeurs par défaut.
///
/// # Errors
/// Returns an error if the file cannot be read, parsed or validated.
///
/// # Example
/// ```no_run
/// use ia_core::config::load_config;
/// use std::path::Path;
/// let config = load_config(Path::new("config/default.toml")).unwrap();
/// ```
pub fn load_config(path: &Path) -> Result<ConvertConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;
    parse_config(&content).with_context(|| format!("Configuration invalide dans {}", path.display()))
}
