use crate::guillotine::GuillotineBin;
use crate::types::{Layout, Rect, Summary};

/// `part / whole * 100`, rounded to two decimals (half away from zero).
/// Zero when `whole` is zero.
pub fn percent(part: u128, whole: u128) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    // Drop low bits of very large areas so the scaled numerator fits; the
    // ratio is unchanged to far below two decimals.
    let shift = (u128::BITS - whole.leading_zeros()).saturating_sub(100);
    let (part, whole) = (part >> shift, (whole >> shift).max(1));
    // Rounded hundredths of a percent, in integers so equal inputs always
    // produce the same bits.
    let scaled = part.min(whole) * 10_000;
    let hundredths = (scaled * 2 + whole) / (whole * 2);
    hundredths as f64 / 100.0
}

/// Closes a plate into its [`Layout`]. The remaining free rectangles become
/// the plate's waste.
pub fn close_plate(plate: Rect, bin: GuillotineBin) -> Layout {
    let plate_area = plate.area();
    let used_area = bin.used_area();
    Layout {
        efficiency_percent: percent(used_area, plate_area),
        waste_area: plate_area - used_area,
        used_area,
        pieces: bin.placements,
        waste: bin.free_rects,
    }
}

/// Totals across all plates. Area sums saturate rather than wrap.
pub fn summarize(plate: Rect, layouts: &[Layout]) -> Summary {
    let total_used_area = layouts
        .iter()
        .fold(0u128, |acc, l| acc.saturating_add(l.used_area));
    let total_base_area = plate.area().saturating_mul(layouts.len() as u128);
    Summary {
        total_pieces_placed: layouts.iter().map(Layout::piece_count).sum(),
        total_used_area,
        total_waste_area: total_base_area.saturating_sub(total_used_area),
        total_base_area,
        efficiency_percent: percent(total_used_area, total_base_area),
        plates_required: layouts.len(),
    }
}
