use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use ia_core::frame::AsciiGrid;

/// Write every line of `grid`, newline-terminated.
///
/// # Errors
/// Returns any I/O error from `out`.
pub fn write_lines<W: Write>(out: W, grid: &AsciiGrid) -> io::Result<()> {
    let mut out = BufWriter::new(out);
    for line in grid.lines() {
        out.write_all(line.as_bytes())?;
        out.write_all(b"\n")?;
    }
    out.flush()
}

/// Write `grid` to `path`, or to stdout when `path` is `None`.
///
/// # Errors
/// Returns an error if the file cannot be created or written.
pub fn write_grid(path: Option<&Path>, grid: &AsciiGrid) -> Result<()> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Impossible de créer {}", path.display()))?;
            write_lines(file, grid)
                .with_context(|| format!("Impossible d'écrire {}", path.display()))?;
            log::info!("{} lignes écrites dans {}", grid.rows(), path.display());
        }
        None => {
            write_lines(io::stdout().lock(), grid).context("Impossible d'écrire sur stdout")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_are_newline_terminated() {
        let grid = AsciiGrid::from_lines(2, vec!["@.".into(), " #".into()]);
        let mut buf = Vec::new();
        write_lines(&mut buf, &grid).unwrap();
        assert_eq!(buf, b"@.\n #\n");
    }

    #[test]
    fn writes_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let grid = AsciiGrid::from_lines(3, vec!["%%%".into()]);
        write_grid(Some(&path), &grid).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "%%%\n");
    }

    #[test]
    fn unwritable_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.txt");
        let grid = AsciiGrid::from_lines(1, vec!["@".into()]);
        let err = write_grid(Some(&path), &grid).unwrap_err();
        assert!(err.to_string().contains("Impossible de créer"));
    }
}
