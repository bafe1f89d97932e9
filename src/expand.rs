use crate::types::{CutRequest, Piece};

/// Flattens cut requests into one [`Piece`] per requested unit.
///
/// Requests with a non-positive width, height or quantity contribute nothing.
pub fn expand_requests(requests: &[CutRequest]) -> Vec<Piece> {
    let mut pieces = Vec::new();
    for request in requests {
        let Some(rect) = request.rect() else {
            tracing::debug!(id = %request.id, "skipping invalid cut request");
            continue;
        };
        // Positive once the request is valid.
        let qty = request.quantity.unsigned_abs();
        for i in 0..qty {
            pieces.push(Piece::new(request.id.clone(), i, rect));
        }
    }
    pieces
}

/// Largest area first. Stable, so equal areas keep expansion order.
pub fn sort_pieces(pieces: &mut [Piece]) {
    pieces.sort_by(|a, b| b.area.cmp(&a.area));
}
