use crate::types::{FreeRect, Piece, PlacedPiece, Rect};

/// One plate being filled: the free rectangle list plus what has been placed.
///
/// Free rectangles are kept in insertion order and are never merged, so two
/// entries may describe overlapping space. No entry ever overlaps a placement.
#[derive(Debug, Clone)]
pub struct GuillotineBin {
    pub free_rects: Vec<FreeRect>,
    pub placements: Vec<PlacedPiece>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredPlacement {
    pub free_idx: usize,
    pub rotated: bool,
    pub score: u64,
}

impl GuillotineBin {
    pub fn new(plate: Rect) -> Self {
        Self {
            free_rects: vec![FreeRect::new(0, 0, plate.width, plate.height)],
            placements: Vec::new(),
        }
    }

    /// Placements never overlap, so this is bounded by the plate area.
    pub fn used_area(&self) -> u128 {
        self.placements.iter().map(|p| p.area()).sum()
    }

    /// Best Short Side Fit over every free rectangle and allowed orientation.
    ///
    /// Only a strictly lower score replaces the current best, so the first
    /// rectangle found wins ties and the unrotated orientation beats an
    /// equally scored rotation.
    pub fn find_best(&self, piece: Rect, allow_rotate: bool) -> Option<ScoredPlacement> {
        let mut best: Option<ScoredPlacement> = None;

        for (idx, free) in self.free_rects.iter().enumerate() {
            let free = free.rect();
            for &rotated in orientations(allow_rotate) {
                let candidate = if rotated { piece.rotated() } else { piece };
                if !candidate.fits_in(&free) {
                    continue;
                }
                let score = short_side_score(candidate, free);
                if best.is_none_or(|b| score < b.score) {
                    best = Some(ScoredPlacement {
                        free_idx: idx,
                        rotated,
                        score,
                    });
                }
            }
        }

        best
    }

    /// Places `piece` into the chosen free rectangle and splits the leftover.
    pub fn place(&mut self, scored: ScoredPlacement, piece: &Piece) -> PlacedPiece {
        let free = self.free_rects.remove(scored.free_idx);
        let placed = if scored.rotated {
            piece.rect.rotated()
        } else {
            piece.rect
        };

        let placement = PlacedPiece {
            request_id: piece.source_id.clone(),
            instance_index: piece.instance_index,
            x: free.x,
            y: free.y,
            width: placed.width,
            height: placed.height,
            rotated: scored.rotated,
        };

        self.free_rects.extend(split(free, placed));
        self.placements.push(placement.clone());

        placement
    }
}

fn orientations(allow_rotate: bool) -> &'static [bool] {
    if allow_rotate { &[false, true] } else { &[false] }
}

/// Width of the narrower leftover strip. Lower is a tighter fit.
fn short_side_score(piece: Rect, free: Rect) -> u64 {
    std::cmp::min(free.width - piece.width, free.height - piece.height)
}

/// Split Shorter Leftover Axis.
///
/// `placed` sits at the top-left corner of `free`; returns the 0 to 2
/// rectangles covering the rest of `free`, cut along the axis with the
/// smaller leftover.
pub fn split(free: FreeRect, placed: Rect) -> Vec<FreeRect> {
    let leftover_w = free.width - placed.width;
    let leftover_h = free.height - placed.height;
    let right_x = free.x + placed.width;
    let bottom_y = free.y + placed.height;

    let mut out = Vec::with_capacity(2);
    if leftover_w > 0 && leftover_h > 0 {
        if leftover_w <= leftover_h {
            // Vertical cut: right strip keeps the full height.
            out.push(FreeRect::new(right_x, free.y, leftover_w, free.height));
            out.push(FreeRect::new(free.x, bottom_y, placed.width, leftover_h));
        } else {
            // Horizontal cut: bottom strip keeps the full width.
            out.push(FreeRect::new(free.x, bottom_y, free.width, leftover_h));
            out.push(FreeRect::new(right_x, free.y, leftover_w, placed.height));
        }
    } else if leftover_w > 0 {
        out.push(FreeRect::new(right_x, free.y, leftover_w, free.height));
    } else if leftover_h > 0 {
        out.push(FreeRect::new(free.x, bottom_y, free.width, leftover_h));
    }
    out
}
