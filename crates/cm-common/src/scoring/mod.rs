pub mod normalizer;
pub mod rounding;

pub use normalizer::{normalize, RawSpec, ScoreSet, SCORE_MAX, SCORE_MIN};
pub use rounding::round_half_away;
