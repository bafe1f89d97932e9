use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::CutError;
use crate::expand::{expand_requests, sort_pieces};
use crate::guillotine::GuillotineBin;
use crate::stats::{close_plate, summarize};
use crate::types::{CutRequest, Layout, PackOptions, PackingResult, Piece, Rect, StockPlate};

/// Multi-plate guillotine packer.
///
/// Pieces are placed largest first; whatever does not fit on the current
/// plate is carried, in order, to a fresh plate. Packing stops once every
/// piece is placed or a fresh plate accepts none of the remaining pieces.
pub struct Packer {
    plate: StockPlate,
    options: PackOptions,
}

struct Run {
    layouts: Vec<Layout>,
    unplaced: Vec<Piece>,
}

impl Packer {
    pub fn new(plate: StockPlate, options: PackOptions) -> Self {
        Self { plate, options }
    }

    pub fn pack(&self, requests: &[CutRequest]) -> PackingResult {
        let pieces = expand_requests(requests);
        let Some(bounds) = self.plate.bounds() else {
            return self.degenerate(pieces);
        };
        let run = self.run(bounds, pieces, |_| true);
        self.finish(bounds, run)
    }

    /// Like [`Packer::pack`], but checks `cancel` before opening each plate.
    pub fn pack_with_cancel(
        &self,
        requests: &[CutRequest],
        cancel: &AtomicBool,
    ) -> Result<PackingResult, CutError> {
        self.pack_until(requests, |_| cancel.load(Ordering::Relaxed))
    }

    /// Packs until `stop` returns true. `stop` is asked before each new
    /// plate with the number of plates already closed.
    pub fn pack_until(
        &self,
        requests: &[CutRequest],
        mut stop: impl FnMut(usize) -> bool,
    ) -> Result<PackingResult, CutError> {
        let pieces = expand_requests(requests);
        let Some(bounds) = self.plate.bounds() else {
            return Ok(self.degenerate(pieces));
        };

        let mut cancelled_at = None;
        let run = self.run(bounds, pieces, |plates_completed| {
            if stop(plates_completed) {
                cancelled_at = Some(plates_completed);
                return false;
            }
            true
        });

        match cancelled_at {
            Some(plates_completed) => {
                tracing::info!(plates_completed, "packing cancelled");
                Err(CutError::Cancelled { plates_completed })
            }
            None => Ok(self.finish(bounds, run)),
        }
    }

    fn run(
        &self,
        bounds: Rect,
        mut pieces: Vec<Piece>,
        mut keep_going: impl FnMut(usize) -> bool,
    ) -> Run {
        sort_pieces(&mut pieces);
        let mut layouts = Vec::new();

        while !pieces.is_empty() {
            if !keep_going(layouts.len()) {
                break;
            }

            let candidates = pieces.len();
            let (bin, deferred) = self.fill_plate(bounds, pieces);
            pieces = deferred;

            if bin.placements.is_empty() {
                tracing::info!(
                    remaining = pieces.len(),
                    plate = %bounds,
                    "no remaining piece fits an empty plate, stopping"
                );
                break;
            }

            tracing::debug!(
                plate = layouts.len() + 1,
                placed = candidates - pieces.len(),
                deferred = pieces.len(),
                "plate closed"
            );
            layouts.push(close_plate(bounds, bin));
        }

        Run {
            layouts,
            unplaced: pieces,
        }
    }

    /// One pass over `pieces` on a fresh plate. Returns the filled bin and
    /// the pieces that did not fit, in their original order.
    fn fill_plate(&self, bounds: Rect, pieces: Vec<Piece>) -> (GuillotineBin, Vec<Piece>) {
        let mut bin = GuillotineBin::new(bounds);
        let mut deferred = Vec::new();

        for piece in pieces {
            match bin.find_best(piece.rect, self.options.allow_rotation) {
                Some(scored) => {
                    bin.place(scored, &piece);
                }
                None => deferred.push(piece),
            }
        }

        (bin, deferred)
    }

    fn finish(&self, bounds: Rect, run: Run) -> PackingResult {
        let summary = summarize(bounds, &run.layouts);
        tracing::info!(
            plates = summary.plates_required,
            placed = summary.total_pieces_placed,
            unplaced = run.unplaced.len(),
            efficiency = summary.efficiency_percent,
            "packing finished"
        );
        PackingResult {
            layouts: run.layouts,
            summary,
            unplaced: run.unplaced.into_iter().map(Into::into).collect(),
        }
    }

    fn degenerate(&self, pieces: Vec<Piece>) -> PackingResult {
        tracing::info!(
            width = self.plate.width,
            height = self.plate.height,
            pieces = pieces.len(),
            "plate has no usable area"
        );
        PackingResult {
            unplaced: pieces.into_iter().map(Into::into).collect(),
            ..PackingResult::default()
        }
    }
}
