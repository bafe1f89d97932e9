use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub width: u64,
    pub height: u64,
}

impl Rect {
    pub fn new(width: u64, height: u64) -> Self {
        Self { width, height }
    }

    /// Exact for any two `u64` sides.
    pub fn area(&self) -> u128 {
        self.width as u128 * self.height as u128
    }

    pub fn rotated(&self) -> Self {
        Self {
            width: self.height,
            height: self.width,
        }
    }

    pub fn fits_in(&self, other: &Rect) -> bool {
        self.width <= other.width && self.height <= other.height
    }
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// The raw stock plate every layout is cut from.
///
/// Dimensions are signed so that degenerate input can be carried through to
/// the engine, which reports it as an empty result instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockPlate {
    pub width: i64,
    pub height: i64,
}

impl StockPlate {
    pub fn new(width: i64, height: i64) -> Self {
        Self { width, height }
    }

    /// The usable plate rectangle, or `None` for a degenerate plate.
    pub fn bounds(&self) -> Option<Rect> {
        let width = u64::try_from(self.width).ok().filter(|w| *w > 0)?;
        let height = u64::try_from(self.height).ok().filter(|h| *h > 0)?;
        Some(Rect::new(width, height))
    }
}

/// User-assigned identifier of a cut request, either numeric or textual.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    Int(i64),
    Text(String),
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestId::Int(n) => write!(f, "{n}"),
            RequestId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for RequestId {
    fn from(n: i64) -> Self {
        RequestId::Int(n)
    }
}

impl From<&str> for RequestId {
    fn from(s: &str) -> Self {
        RequestId::Text(s.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CutRequest {
    pub id: RequestId,
    pub width: i64,
    pub height: i64,
    pub quantity: i64,
}

impl CutRequest {
    pub fn new(id: impl Into<RequestId>, width: i64, height: i64, quantity: i64) -> Self {
        Self {
            id: id.into(),
            width,
            height,
            quantity,
        }
    }

    /// Dimensions of one unit, or `None` when the request contributes no pieces.
    pub fn rect(&self) -> Option<Rect> {
        if !self.is_valid() {
            return None;
        }
        let width = u64::try_from(self.width).ok()?;
        let height = u64::try_from(self.height).ok()?;
        Some(Rect::new(width, height))
    }

    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0 && self.quantity > 0
    }
}

/// One unit to place, expanded from a [`CutRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    pub source_id: RequestId,
    pub instance_index: u64,
    pub rect: Rect,
    pub area: u128,
}

impl Piece {
    pub fn new(source_id: RequestId, instance_index: u64, rect: Rect) -> Self {
        Self {
            source_id,
            instance_index,
            rect,
            area: rect.area(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlacedPiece {
    pub request_id: RequestId,
    pub instance_index: u64,
    pub x: u64,
    pub y: u64,
    pub width: u64,
    pub height: u64,
    pub rotated: bool,
}

impl PlacedPiece {
    pub fn rect(&self) -> Rect {
        Rect::new(self.width, self.height)
    }

    pub fn area(&self) -> u128 {
        self.rect().area()
    }

    /// `"<requestId>-<instanceIndex>"`, stable across runs.
    pub fn piece_key(&self) -> String {
        format!("{}-{}", self.request_id, self.instance_index)
    }

    pub fn overlaps(&self, other: &PlacedPiece) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }
}

/// An unoccupied region of a plate. Free rectangles may overlap each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FreeRect {
    pub x: u64,
    pub y: u64,
    pub width: u64,
    pub height: u64,
}

impl FreeRect {
    pub fn new(x: u64, y: u64, width: u64, height: u64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.width, self.height)
    }

    pub fn area(&self) -> u128 {
        self.rect().area()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub pieces: Vec<PlacedPiece>,
    pub waste: Vec<FreeRect>,
    pub used_area: u128,
    pub waste_area: u128,
    pub efficiency_percent: f64,
}

impl Layout {
    pub fn piece_count(&self) -> usize {
        self.pieces.len()
    }
}

/// Run totals. Area totals saturate at `u128::MAX`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub total_pieces_placed: usize,
    pub total_used_area: u128,
    pub total_waste_area: u128,
    pub total_base_area: u128,
    pub efficiency_percent: f64,
    pub plates_required: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnplacedPiece {
    pub request_id: RequestId,
    pub instance_index: u64,
}

impl From<Piece> for UnplacedPiece {
    fn from(piece: Piece) -> Self {
        Self {
            request_id: piece.source_id,
            instance_index: piece.instance_index,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PackingResult {
    pub layouts: Vec<Layout>,
    pub summary: Summary,
    pub unplaced: Vec<UnplacedPiece>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackOptions {
    /// Permit 90 degree rotation. Off keeps the grain direction of every piece.
    #[serde(default)]
    pub allow_rotation: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degenerate_plate_has_no_bounds() {
        assert_eq!(StockPlate::new(0, 100).bounds(), None);
        assert_eq!(StockPlate::new(100, -3).bounds(), None);
        assert_eq!(StockPlate::new(100, 50).bounds(), Some(Rect::new(100, 50)));
        assert_eq!(
            StockPlate::new(5_000_000_000, 100).bounds(),
            Some(Rect::new(5_000_000_000, 100))
        );
    }

    #[test]
    fn test_area_is_exact_for_wide_sides() {
        let side = u64::MAX;
        assert_eq!(Rect::new(side, side).area(), side as u128 * side as u128);
        assert_eq!(
            CutRequest::new(1, i64::MAX, 2, 1).rect(),
            Some(Rect::new(i64::MAX as u64, 2))
        );
    }

    #[test]
    fn test_request_validity() {
        assert!(CutRequest::new(1, 10, 10, 1).is_valid());
        assert!(!CutRequest::new(1, 0, 10, 5).is_valid());
        assert!(!CutRequest::new(1, 10, -1, 5).is_valid());
        assert!(!CutRequest::new(1, 10, 10, 0).is_valid());
        assert_eq!(CutRequest::new(1, 10, 0, 1).rect(), None);
    }

    #[test]
    fn test_request_id_serializes_as_given() {
        let int = serde_json::to_string(&RequestId::Int(7)).unwrap();
        let text = serde_json::to_string(&RequestId::from("door")).unwrap();
        assert_eq!(int, "7");
        assert_eq!(text, "\"door\"");
    }

    #[test]
    fn test_piece_key_and_overlap() {
        let a = PlacedPiece {
            request_id: RequestId::Int(3),
            instance_index: 2,
            x: 0,
            y: 0,
            width: 50,
            height: 50,
            rotated: false,
        };
        let touching = PlacedPiece { x: 50, ..a.clone() };
        let crossing = PlacedPiece { x: 25, y: 25, ..a.clone() };
        assert_eq!(a.piece_key(), "3-2");
        assert!(!a.overlaps(&touching));
        assert!(a.overlaps(&crossing));
    }
}
