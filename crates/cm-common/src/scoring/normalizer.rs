use serde::{Deserialize, Serialize};

use super::rounding::round_half_away;

pub const SCORE_MIN: u8 = 1;
pub const SCORE_MAX: u8 = 10;

/// Score given to `hp` / `acceleration` when the measurement is missing.
const NEUTRAL_SCORE: u8 = 5;

const TRUNK_LITERS_PER_POINT: f64 = 55.0;
const TRUNK_GIANT_LITERS: f64 = 550.0;
const TRUNK_SMALL_LITERS: f64 = 280.0;
const TRUNK_SMALL_SCORE: u8 = 3;

const CONSUMPTION_OFFSET_KM_L: f64 = 4.0;
const CONSUMPTION_TOP_KM_L: f64 = 14.0;

const WHEELBASE_BASE_M: f64 = 2.45;
const WHEELBASE_POINTS_PER_M: f64 = 25.0;

const CLEARANCE_BASE_MM: f64 = 150.0;
const CLEARANCE_MM_PER_POINT: f64 = 5.0;

const HP_BASE: f64 = 90.0;
const HP_PER_POINT: f64 = 10.0;

const ACCELERATION_CEILING_S: f64 = 15.0;

/// Measured attributes of a vehicle, as entered in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawSpec {
    /// Liters.
    pub trunk_liters: f64,
    /// Meters.
    pub wheelbase: f64,
    /// Millimeters.
    pub ground_clearance: f64,
    /// km/l in city driving.
    pub fuel_consumption_city: f64,
    #[serde(default)]
    pub hp: Option<f64>,
    /// Seconds for 0-100 km/h.
    #[serde(default)]
    pub acceleration: Option<f64>,
}

/// The six 1-10 category scores persisted next to a [`RawSpec`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScoreSet {
    pub trunk: u8,
    pub wheelbase: u8,
    pub ground_clearance: u8,
    pub consumption: u8,
    pub hp: u8,
    pub acceleration: u8,
}

/// Map raw measurements onto 1-10 category scores.
///
/// Each score depends on exactly one field. Base formulas are rounded
/// (half away from zero) and clamped to `[1, 10]`; the trunk and consumption
/// overrides are applied afterwards and win over the linear value.
/// `hp` and `acceleration` fall back to 5 when absent. A stored value of 0
/// counts as absent, since the catalog form writes 0 for an empty field.
pub fn normalize(spec: &RawSpec) -> ScoreSet {
    ScoreSet {
        trunk: trunk_score(spec.trunk_liters),
        wheelbase: clamp_score((spec.wheelbase - WHEELBASE_BASE_M) * WHEELBASE_POINTS_PER_M),
        ground_clearance: clamp_score(
            (spec.ground_clearance - CLEARANCE_BASE_MM) / CLEARANCE_MM_PER_POINT,
        ),
        consumption: consumption_score(spec.fuel_consumption_city),
        hp: measured(spec.hp)
            .map(|hp| clamp_score((hp - HP_BASE) / HP_PER_POINT))
            .unwrap_or(NEUTRAL_SCORE),
        acceleration: measured(spec.acceleration)
            .map(|secs| clamp_score(ACCELERATION_CEILING_S - secs))
            .unwrap_or(NEUTRAL_SCORE),
    }
}

fn trunk_score(liters: f64) -> u8 {
    if liters >= TRUNK_GIANT_LITERS {
        SCORE_MAX
    } else if liters <= TRUNK_SMALL_LITERS {
        TRUNK_SMALL_SCORE
    } else {
        clamp_score(liters / TRUNK_LITERS_PER_POINT)
    }
}

fn consumption_score(km_per_liter: f64) -> u8 {
    if km_per_liter >= CONSUMPTION_TOP_KM_L {
        SCORE_MAX
    } else {
        clamp_score(km_per_liter - CONSUMPTION_OFFSET_KM_L)
    }
}

fn measured(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

fn clamp_score(value: f64) -> u8 {
    if value.is_nan() {
        return SCORE_MIN;
    }
    round_half_away(value).clamp(SCORE_MIN as f64, SCORE_MAX as f64) as u8
}
