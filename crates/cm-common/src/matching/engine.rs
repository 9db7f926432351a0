use serde::Serialize;

use super::badges::{derive_badges, Badge};
use super::weights::{Category, Weights};
use crate::scoring::{round_half_away, ScoreSet};
use crate::Car;

const PERCENT_PER_POINT: f64 = 10.0;
const PERCENT_MAX: f64 = 100.0;

/// The four 0-10 scores the user weighs against each other.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct CompositeScores {
    pub comfort: f64,
    pub economy: f64,
    pub performance: f64,
    pub space: f64,
}

impl CompositeScores {
    pub fn from_scores(scores: &ScoreSet) -> Self {
        Self {
            comfort: mean(scores.wheelbase, scores.ground_clearance),
            economy: f64::from(scores.consumption),
            performance: mean(scores.hp, scores.acceleration),
            space: mean(scores.trunk, scores.wheelbase),
        }
    }

    pub fn get(&self, category: Category) -> f64 {
        match category {
            Category::Comfort => self.comfort,
            Category::Economy => self.economy,
            Category::Performance => self.performance,
            Category::Space => self.space,
        }
    }

    fn weighted_sum(&self, weights: &Weights) -> f64 {
        Category::ALL
            .iter()
            .map(|category| self.get(*category) * weights.get(*category))
            .sum()
    }
}

fn mean(a: u8, b: u8) -> f64 {
    (f64::from(a) + f64::from(b)) / 2.0
}

/// Internal inconsistency detected while matching. Reported, never raised.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchFault {
    /// The weighted average came out NaN or infinite (malformed weights).
    NonFinite { weighted_sum: f64, total_weight: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    /// 0-100, used for ranking.
    pub percentage: u8,
    pub category_scores: CompositeScores,
    pub badges: Vec<Badge>,
    /// Set when the percentage fell back to 0 on a non-finite average; the
    /// caller decides how to log it.
    #[serde(skip)]
    pub fault: Option<MatchFault>,
}

impl MatchResult {
    /// Result for a car with no normalized spec yet.
    pub fn empty() -> Self {
        Self {
            percentage: 0,
            category_scores: CompositeScores::default(),
            badges: Vec::new(),
            fault: None,
        }
    }
}

/// Combine stored scores with request weights into a match percentage and
/// badges.
///
/// `None` scores (draft cars) produce [`MatchResult::empty`]. A total weight
/// of 0 yields 0% while badges are still derived from the scores.
pub fn match_scores(scores: Option<&ScoreSet>, weights: &Weights) -> MatchResult {
    let Some(scores) = scores else {
        return MatchResult::empty();
    };

    let composites = CompositeScores::from_scores(scores);
    let (percentage, fault) = percentage(&composites, weights);
    let badges = derive_badges(scores, &composites, weights);

    MatchResult {
        percentage,
        category_scores: composites,
        badges,
        fault,
    }
}

pub fn match_car(car: &Car, weights: &Weights) -> MatchResult {
    match_scores(car.scores(), weights)
}

fn percentage(composites: &CompositeScores, weights: &Weights) -> (u8, Option<MatchFault>) {
    let total_weight = weights.total();
    if total_weight <= 0.0 {
        return (0, None);
    }

    let weighted_sum = composites.weighted_sum(weights);
    let value = round_half_away(weighted_sum / total_weight * PERCENT_PER_POINT);

    if !value.is_finite() {
        return (
            0,
            Some(MatchFault::NonFinite {
                weighted_sum,
                total_weight,
            }),
        );
    }

    (value.clamp(0.0, PERCENT_MAX) as u8, None)
}
