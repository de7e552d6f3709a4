use std::any::Any;
use std::ops::Range;
use std::thread;

use ia_core::charset::{MAX_LUMINANCE, Ramp};
use ia_core::config::available_workers;
use ia_core::error::ConvertError;
use ia_core::frame::AsciiGrid;
use ia_core::layout::Layout;
use ia_core::traits::PixelGrid;

use crate::reduce::reduce_block;

/// One finished line, tagged with its offset inside the worker's partition.
struct RowLine {
    offset: usize,
    line: String,
}

/// Split `total` rows into contiguous partitions.
///
/// Every partition gets `total / workers` rows and the last one also takes
/// the remainder. `workers` is clamped to `[1, total]` so no partition is
/// empty (a single empty range is returned for `total == 0`).
///
/// # Example
/// ```
/// use ia_ascii::converter::partition;
/// assert_eq!(partition(10, 3), vec![0..3, 3..6, 6..10]);
/// ```
#[must_use]
pub fn partition(total: usize, workers: usize) -> Vec<Range<usize>> {
    let workers = workers.clamp(1, total.max(1));
    let base = total / workers;
    (0..workers)
        .map(|i| {
            let start = i * base;
            let end = if i + 1 == workers { total } else { start + base };
            start..end
        })
        .collect()
}

/// Worker count actually used for `rows` output rows.
///
/// At least 1, at most the available compute units and at most `rows`.
#[must_use]
pub fn effective_workers(requested: usize, rows: usize) -> usize {
    let effective = requested.min(available_workers()).min(rows).max(1);
    if effective != requested {
        log::debug!("workers : {requested} demandés, {effective} utilisés");
    }
    effective
}

/// Parallel block → glyph converter for one layout and ramp.
///
/// # Example
/// ```
/// use ia_ascii::converter::GridConverter;
/// use ia_core::charset::{Ramp, RampKind};
/// use ia_core::frame::Raster;
/// use ia_core::layout::Layout;
///
/// let raster = Raster::filled(40, 40, [255, 255, 255, 255]);
/// let layout = Layout::plan(40, 40, 4, 1.0).unwrap();
/// let converter = GridConverter::new(layout, Ramp::select(RampKind::Short));
/// let grid = converter.convert(&raster, 2).unwrap();
/// assert_eq!(grid.lines(), ["@@@@", "@@@@", "@@@@", "@@@@"]);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct GridConverter {
    layout: Layout,
    ramp: Ramp,
    invert: bool,
}

impl GridConverter {
    /// Create a converter.
    #[must_use]
    pub fn new(layout: Layout, ramp: Ramp) -> Self {
        Self {
            layout,
            ramp,
            invert: false,
        }
    }

    /// Map `255 - luminance` instead of `luminance`.
    #[must_use]
    pub fn with_invert(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }

    /// Layout this converter renders.
    #[must_use]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Convert `image` using up to `workers` threads.
    ///
    /// Rows are split with [`partition`]; each worker renders its rows in
    /// order and sends them on its own channel, sized to its row count. The
    /// calling thread drains the channels and places each line by partition
    /// start + offset, so the result does not depend on scheduling.
    ///
    /// # Errors
    /// - The first reducer error raised by a worker (e.g.
    ///   [`ConvertError::DivideByZero`]).
    /// - [`ConvertError::WorkerFailed`] if a worker panics, cannot be
    ///   spawned, or delivers an incomplete or inconsistent partition.
    pub fn convert<I>(&self, image: &I, workers: usize) -> Result<AsciiGrid, ConvertError>
    where
        I: PixelGrid + Sync + ?Sized,
    {
        let rows = self.layout.rows as usize;
        let workers = effective_workers(workers, rows);
        let partitions = partition(rows, workers);
        log::debug!(
            "conversion {}×{} sur {} worker(s) : {partitions:?}",
            self.layout.columns,
            rows,
            partitions.len()
        );

        let mut slots: Vec<Option<String>> = vec![None; rows];

        thread::scope(|scope| {
            let mut first_error: Option<ConvertError> = None;
            let mut pending = Vec::with_capacity(partitions.len());

            for (index, range) in partitions.iter().cloned().enumerate() {
                let (tx, rx) = flume::bounded::<RowLine>(range.len());
                let rows = range.clone();
                let spawned = thread::Builder::new()
                    .name(format!("ia-worker-{index}"))
                    .spawn_scoped(scope, move || self.run_partition(image, rows, &tx));
                match spawned {
                    Ok(handle) => pending.push((index, range, rx, handle)),
                    Err(e) => {
                        first_error = Some(ConvertError::WorkerFailed {
                            partition: index,
                            reason: format!("impossible de spawner le thread : {e}"),
                        });
                        break;
                    }
                }
            }

            for (index, range, rx, handle) in pending {
                if first_error.is_some() {
                    // Closing the channel makes the worker stop at its next send.
                    drop(rx);
                    let _ = handle.join();
                    continue;
                }

                let drained = drain_partition(index, &range, &rx, &mut slots);
                drop(rx);
                let joined = match handle.join() {
                    Ok(result) => result,
                    Err(payload) => Err(ConvertError::WorkerFailed {
                        partition: index,
                        reason: panic_message(payload.as_ref()),
                    }),
                };

                // Worker error wins over the line-count mismatch it causes.
                if let Err(e) = joined.and(drained) {
                    first_error = Some(e);
                }
            }

            first_error.map_or(Ok(()), Err)
        })?;

        let lines = slots
            .into_iter()
            .enumerate()
            .map(|(row, slot)| {
                slot.ok_or_else(|| ConvertError::WorkerFailed {
                    partition: partitions.iter().position(|p| p.contains(&row)).unwrap_or(0),
                    reason: format!("ligne {row} jamais reçue"),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(AsciiGrid::from_lines(self.layout.columns, lines))
    }

    /// Worker body: render `rows` in order and send each line.
    fn run_partition<I>(
        &self,
        image: &I,
        rows: Range<usize>,
        tx: &flume::Sender<RowLine>,
    ) -> Result<(), ConvertError>
    where
        I: PixelGrid + ?Sized,
    {
        let first = rows.start;
        for (offset, row) in rows.enumerate() {
            let line = self.render_row(image, row as u32)?;
            if tx.send(RowLine { offset, line }).is_err() {
                log::trace!("worker {first}.. : coordinateur parti, arrêt");
                return Ok(());
            }
        }
        log::trace!("worker {first}.. : partition terminée");
        Ok(())
    }

    /// Render one output row, left to right.
    fn render_row<I>(&self, image: &I, row: u32) -> Result<String, ConvertError>
    where
        I: PixelGrid + ?Sized,
    {
        let mut line = String::with_capacity(self.layout.columns as usize);
        for column in 0..self.layout.columns {
            let mut lum = reduce_block(image, self.layout.block_rect(column, row))?;
            if self.invert {
                lum = MAX_LUMINANCE - lum;
            }
            line.push(self.ramp.glyph_for(lum));
        }
        Ok(line)
    }
}

/// Blocking read of one worker's channel until it closes.
///
/// Lines are placed by position only. Returns an error for an offset outside
/// the partition, a duplicate offset, or a short stream.
fn drain_partition(
    index: usize,
    range: &Range<usize>,
    rx: &flume::Receiver<RowLine>,
    slots: &mut [Option<String>],
) -> Result<(), ConvertError> {
    let mut received = 0usize;
    for RowLine { offset, line } in rx.iter() {
        let row = range.start + offset;
        if row >= range.end {
            return Err(ConvertError::WorkerFailed {
                partition: index,
                reason: format!("offset {offset} hors de la partition {range:?}"),
            });
        }
        if slots[row].replace(line).is_some() {
            return Err(ConvertError::WorkerFailed {
                partition: index,
                reason: format!("ligne {row} reçue deux fois"),
            });
        }
        received += 1;
    }

    if received == range.len() {
        Ok(())
    } else {
        Err(ConvertError::WorkerFailed {
            partition: index,
            reason: format!("{received} ligne(s) reçue(s) sur {}", range.len()),
        })
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panic : {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panic : {s}")
    } else {
        "panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use ia_core::charset::RampKind;
    use ia_core::frame::Raster;

    use super::*;

    /// Deterministic noisy test image.
    fn noise(width: u32, height: u32) -> Raster {
        Raster::from_fn(width, height, |x, y| {
            let v = x.wrapping_mul(73).wrapping_add(y.wrapping_mul(151)) ^ (x * y);
            [(v % 256) as u8, (v / 3 % 256) as u8, (v / 7 % 256) as u8, 255]
        })
    }

    #[test]
    fn partition_spreads_remainder_to_last() {
        assert_eq!(partition(10, 1), vec![0..10]);
        assert_eq!(partition(10, 4), vec![0..2, 2..4, 4..6, 6..10]);
        assert_eq!(partition(3, 3), vec![0..1, 1..2, 2..3]);
    }

    #[test]
    fn partition_never_yields_empty_ranges() {
        assert_eq!(partition(3, 8), vec![0..1, 1..2, 2..3]);
        assert_eq!(partition(5, 0), vec![0..5]);
        assert_eq!(partition(0, 4), vec![0..0]);
    }

    #[test]
    fn effective_workers_bounds() {
        assert_eq!(effective_workers(0, 10), 1);
        assert_eq!(effective_workers(64, 1), 1);
        let n = effective_workers(usize::MAX, 1000);
        assert!(n >= 1 && n <= available_workers());
    }

    #[test]
    fn output_independent_of_worker_count() {
        let raster = noise(317, 211);
        let layout = Layout::plan(317, 211, 53, 1.7).unwrap();
        for kind in [RampKind::Short, RampKind::Long] {
            let converter = GridConverter::new(layout, Ramp::select(kind));
            let reference = converter.convert(&raster, 1).unwrap();
            assert_eq!(reference.rows(), layout.rows as usize);
            for workers in [2, 3, 4, 7, 16, 1000] {
                let grid = converter.convert(&raster, workers).unwrap();
                assert_eq!(grid, reference, "{workers} workers, {kind}");
            }
        }
    }

    #[test]
    fn every_line_has_exact_width() {
        let raster = noise(120, 90);
        let layout = Layout::plan(120, 90, 37, 2.33).unwrap();
        let grid = GridConverter::new(layout, Ramp::select(RampKind::Long))
            .convert(&raster, 4)
            .unwrap();
        assert_eq!(grid.rows(), layout.rows as usize);
        assert!(grid.lines().iter().all(|l| l.chars().count() == 37));
    }

    #[test]
    fn rows_keep_their_position() {
        // Each band of 10 px rows is brighter than the one above.
        let raster = Raster::from_fn(10, 100, |_, y| {
            let v = (y / 10 * 28) as u8;
            [v, v, v, 255]
        });
        let layout = Layout::plan(10, 100, 1, 1.0).unwrap();
        let ramp = Ramp::select(RampKind::Short);
        let grid = GridConverter::new(layout, ramp).convert(&raster, 5).unwrap();
        let expected: Vec<String> = (0..10u32)
            .map(|band| ramp.glyph_for(f64::from(band * 28)).to_string())
            .collect();
        assert_eq!(grid.lines(), expected.as_slice());
    }

    #[test]
    fn invert_flips_the_ramp() {
        let raster = Raster::new(20, 20);
        let layout = Layout::plan(20, 20, 2, 1.0).unwrap();
        let grid = GridConverter::new(layout, Ramp::select(RampKind::Short))
            .with_invert(true)
            .convert(&raster, 2)
            .unwrap();
        assert_eq!(grid.lines(), ["@@", "@@"]);
    }

    #[test]
    fn reducer_error_fails_whole_conversion() {
        let raster = Raster::new(10, 10);
        let layout = Layout {
            block_width: 0,
            block_height: 1,
            columns: 3,
            rows: 4,
        };
        let err = GridConverter::new(layout, Ramp::select(RampKind::Short))
            .convert(&raster, 2)
            .unwrap_err();
        assert!(matches!(err, ConvertError::DivideByZero { .. }));
    }

    struct Faulty {
        inner: Raster,
        poisoned_row: u32,
    }

    impl PixelGrid for Faulty {
        fn width(&self) -> u32 {
            self.inner.width()
        }

        fn height(&self) -> u32 {
            self.inner.height()
        }

        fn rgb(&self, x: u32, y: u32) -> (u8, u8, u8) {
            assert!(y != self.poisoned_row, "pixel empoisonné");
            self.inner.rgb(x, y)
        }
    }

    #[test]
    fn worker_panic_fails_whole_conversion() {
        let image = Faulty {
            inner: Raster::new(40, 40),
            poisoned_row: 35,
        };
        let layout = Layout::plan(40, 40, 4, 1.0).unwrap();
        let err = GridConverter::new(layout, Ramp::select(RampKind::Short))
            .convert(&image, 4)
            .unwrap_err();
        match err {
            ConvertError::WorkerFailed { reason, .. } => {
                assert!(reason.contains("pixel empoisonné"), "{reason}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: partitions are contiguous, disjoint and cover every row once.
        #[test]
        fn prop_partition_covers_rows(total in 1usize..=500, workers_seed in 0usize..500) {
            let workers = workers_seed % total + 1;
            let parts = partition(total, workers);
            prop_assert_eq!(parts.len(), workers);
            prop_assert_eq!(parts[0].start, 0);
            prop_assert_eq!(parts[parts.len() - 1].end, total);
            for pair in parts.windows(2) {
                prop_assert_eq!(pair[0].end, pair[1].start);
            }
            let base = total / workers;
            for p in &parts {
                prop_assert!(p.len() >= base.max(1));
            }
            let covered: usize = parts.iter().map(ExactSizeIterator::len).sum();
            prop_assert_eq!(covered, total);
        }
    }
}
