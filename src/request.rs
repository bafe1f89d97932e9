//! Validation of loosely-typed cut requests.
//!
//! Shape errors (a missing field, text where a number belongs) reject the
//! whole input. Numeric values that are zero or negative are accepted here
//! and later skipped by the expander.

use serde_json::{Map, Value};

use crate::error::CutError;
use crate::types::{CutRequest, RequestId};

/// Default ceiling on the number of pieces one calculation may expand to.
pub const MAX_PIECES: u64 = 100_000;

/// Total pieces the valid requests expand to, rejected above `limit`.
///
/// Checked before expansion, which allocates one piece per unit.
pub fn check_piece_total(requests: &[CutRequest], limit: u64) -> Result<u64, CutError> {
    let requested = requests
        .iter()
        .filter(|r| r.is_valid())
        .fold(0u64, |acc, r| acc.saturating_add(r.quantity.unsigned_abs()));
    if requested > limit {
        return Err(CutError::TooManyPieces { requested, limit });
    }
    Ok(requested)
}

pub fn parse_requests(values: &[Value]) -> Result<Vec<CutRequest>, CutError> {
    values
        .iter()
        .enumerate()
        .map(|(index, value)| parse_request(index, value))
        .collect()
}

pub fn parse_request(index: usize, value: &Value) -> Result<CutRequest, CutError> {
    let Some(obj) = value.as_object() else {
        return Err(CutError::invalid_request(
            index,
            None,
            "request",
            "must be an object",
        ));
    };

    let id = parse_id(index, obj)?;
    let label = Some(id.to_string());
    let width = integer_field(index, &label, obj, "width")?;
    let height = integer_field(index, &label, obj, "height")?;
    let quantity = integer_field(index, &label, obj, "quantity")?;

    Ok(CutRequest {
        id,
        width,
        height,
        quantity,
    })
}

fn parse_id(index: usize, obj: &Map<String, Value>) -> Result<RequestId, CutError> {
    match obj.get("id") {
        Some(Value::String(s)) => Ok(RequestId::Text(s.clone())),
        Some(Value::Number(n)) => n
            .as_i64()
            .map(RequestId::Int)
            .ok_or_else(|| CutError::invalid_request(index, None, "id", "must be an integer")),
        Some(_) => Err(CutError::invalid_request(
            index,
            None,
            "id",
            "must be a string or an integer",
        )),
        None => Err(CutError::invalid_request(index, None, "id", "is missing")),
    }
}

fn integer_field(
    index: usize,
    label: &Option<String>,
    obj: &Map<String, Value>,
    field: &'static str,
) -> Result<i64, CutError> {
    let err = |reason: &str| CutError::invalid_request(index, label.clone(), field, reason);

    let Some(value) = obj.get(field) else {
        return Err(err("is missing"));
    };
    let Value::Number(n) = value else {
        return Err(err("must be a number"));
    };
    if let Some(v) = n.as_i64() {
        return Ok(v);
    }
    // Whole-valued floats such as 600.0 are accepted.
    match n.as_f64() {
        Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Ok(f as i64),
        Some(f) if f.is_finite() && f.fract() != 0.0 => Err(err("must be a whole number")),
        _ => Err(err("is out of range")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_valid_requests() {
        let values = vec![
            json!({"id": 1, "width": 600, "height": 1000, "quantity": 5}),
            json!({"id": "shelf", "width": 300.0, "height": 200, "quantity": 2}),
        ];
        let requests = parse_requests(&values).unwrap();
        assert_eq!(requests[0], CutRequest::new(1, 600, 1000, 5));
        assert_eq!(requests[1], CutRequest::new("shelf", 300, 200, 2));
    }

    #[test]
    fn test_non_positive_values_are_not_shape_errors() {
        let values = vec![json!({"id": 4, "width": 0, "height": -10, "quantity": 5})];
        let requests = parse_requests(&values).unwrap();
        assert!(!requests[0].is_valid());
    }

    #[test]
    fn test_missing_field_identifies_request() {
        let values = vec![
            json!({"id": 1, "width": 10, "height": 10, "quantity": 1}),
            json!({"id": 9, "width": 10, "quantity": 1}),
        ];
        let err = parse_requests(&values).unwrap_err();
        assert_eq!(
            err,
            CutError::invalid_request(1, Some("9".into()), "height", "is missing")
        );
    }

    #[test]
    fn test_non_numeric_field_rejected() {
        let values = vec![json!({"id": "a", "width": "wide", "height": 10, "quantity": 1})];
        let err = parse_requests(&values).unwrap_err();
        assert!(err.to_string().contains("(id a)"));
        assert!(err.to_string().contains("`width` must be a number"));
    }

    #[test]
    fn test_fractional_quantity_rejected() {
        let values = vec![json!({"id": 2, "width": 10, "height": 10, "quantity": 1.5})];
        let err = parse_requests(&values).unwrap_err();
        assert!(err.to_string().contains("whole number"));
    }

    #[test]
    fn test_piece_total_within_limit() {
        let requests = vec![
            CutRequest::new(1, 10, 10, 40),
            CutRequest::new(2, 0, 10, 1_000_000),
            CutRequest::new(3, 10, 10, 60),
        ];
        assert_eq!(check_piece_total(&requests, 100), Ok(100));
    }

    #[test]
    fn test_piece_total_over_limit() {
        let requests = vec![
            CutRequest::new(1, 10, 10, 1_000_000_000),
            CutRequest::new(2, 10, 10, i64::MAX),
        ];
        assert_eq!(
            check_piece_total(&requests, MAX_PIECES),
            Err(CutError::TooManyPieces {
                requested: 1_000_000_000 + i64::MAX as u64,
                limit: MAX_PIECES,
            })
        );
    }

    #[test]
    fn test_bad_id_and_non_object() {
        let err = parse_request(0, &json!({"width": 1, "height": 1, "quantity": 1})).unwrap_err();
        assert_eq!(err, CutError::invalid_request(0, None, "id", "is missing"));

        let err = parse_request(3, &json!({"id": true})).unwrap_err();
        assert!(err.to_string().starts_with("invalid request #3: field `id`"));

        let err = parse_request(5, &json!([1, 2, 3])).unwrap_err();
        assert!(err.to_string().contains("must be an object"));
    }
}
