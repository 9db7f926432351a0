/// Round to the nearest integer, ties away from zero (a 467.5L trunk is
/// exactly 8.5 and scores 9). Shared by the normalizer and the match engine.
#[inline]
pub fn round_half_away(value: f64) -> f64 {
    value.round()
}
