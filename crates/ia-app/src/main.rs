use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

pub mod cli;
pub mod output;

/// Exit code for any conversion failure.
const EXIT_FAILURE: u8 = 3;

fn main() -> ExitCode {
    // 1. Parser CLI
    let cli = cli::Cli::parse();

    // 2. Initialiser le logging
    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    // 3. Convertir
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Erreur : {e}");
            for cause in e.chain().skip(1) {
                eprintln!("Cause : {cause}");
            }
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

/// Config → image → grid → output.
fn run(cli: &cli::Cli) -> Result<()> {
    let config = cli.resolve_config()?;
    log::info!(
        "{} colonnes, ratio {}, {}, {} worker(s)",
        config.columns,
        config.col_row_ratio,
        config.ramp,
        config.workers
    );

    let raster = ia_source::image::load_image(&cli.image)?;
    let grid = ia_ascii::convert_image(&raster, &config)?;
    output::write_grid(cli.output.as_deref(), &grid)
}
