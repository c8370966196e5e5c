//! Two-decimal rounding applied when statistics leave the crate

use serde::Serializer;

/// Rounds to two decimals. Results are never negative zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0 + 0.0
}

pub(crate) fn serialize_round2<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(round2(*value))
}

#[allow(clippy::ref_option)]
pub(crate) fn serialize_round2_opt<S: Serializer>(
    value: &Option<f64>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(value) => serializer.serialize_some(&round2(*value)),
        None => serializer.serialize_none(),
    }
}
