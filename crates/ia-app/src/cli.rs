use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;
use ia_core::charset::RampKind;
use ia_core::config::{ConvertConfig, available_workers, load_config};

/// Config file picked up when `--config` is not given.
pub const DEFAULT_CONFIG: &str = "config/default.toml";

/// imgascii — convertit une image en art ASCII.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Image à convertir (GIF, JPEG, PNG, BMP).
    pub image: PathBuf,

    /// Nombre de colonnes de sortie.
    #[arg(short = 'c', long, value_parser = clap::value_parser!(u32).range(1..))]
    pub columns: Option<u32>,

    /// Ratio colonne/ligne (hauteur d'un bloc = largeur × ratio).
    #[arg(short = 'r', long)]
    pub ratio: Option<f64>,

    /// Rampe de glyphes : 10 (short) ou 70 (long).
    #[arg(short = 'g', long)]
    pub ramp: Option<RampKind>,

    /// Nombre de cœurs à utiliser. Défaut : tous.
    #[arg(short = 'n', long)]
    pub workers: Option<usize>,

    /// Inverser la luminance (pour fond clair).
    #[arg(long, default_value_t = false)]
    pub invert: bool,

    /// Fichier de sortie. Défaut : sortie standard.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Fichier de configuration TOML. Défaut : config/default.toml s'il existe.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Niveau de log : error, warn, info, debug, trace.
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

impl Cli {
    /// Resolve the effective configuration: file, then CLI overrides.
    ///
    /// An explicit `--config` must exist; the default path is optional.
    ///
    /// # Errors
    /// Returns an error if the config file cannot be loaded or the merged
    /// values are invalid.
    pub fn resolve_config(&self) -> Result<ConvertConfig> {
        let mut config = if let Some(ref path) = self.config {
            load_config(path)?
        } else if Path::new(DEFAULT_CONFIG).exists() {
            load_config(Path::new(DEFAULT_CONFIG))?
        } else {
            log::debug!("Pas de {DEFAULT_CONFIG}, utilisation des défauts.");
            ConvertConfig::default()
        };

        self.apply_overrides(&mut config);
        clamp_workers(&mut config);
        config.validate()?;
        Ok(config)
    }

    /// Apply command-line values over `config`.
    pub fn apply_overrides(&self, config: &mut ConvertConfig) {
        if let Some(v) = self.columns {
            config.columns = v;
        }
        if let Some(v) = self.ratio {
            config.col_row_ratio = v;
        }
        if let Some(v) = self.ramp {
            config.ramp = v;
        }
        if let Some(v) = self.workers {
            config.workers = v;
        }
        if self.invert {
            config.invert = true;
        }
    }
}

/// Cap the worker count at the available compute units.
fn clamp_workers(config: &mut ConvertConfig) {
    let max = available_workers();
    if config.workers > max {
        log::warn!(
            "{} workers demandés, seulement {max} cœurs disponibles.",
            config.workers
        );
        config.workers = max;
    }
}
