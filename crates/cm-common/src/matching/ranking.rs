use std::cmp::Ordering;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::error;

use super::engine::{match_car, MatchFault, MatchResult};
use super::weights::Weights;
use crate::Car;

/// Listing order of the results page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    PriceAsc,
    PriceDesc,
    /// Ranked by match percentage.
    CostBenefit,
    YearDesc,
    /// Unknown order parameter: keep catalog order.
    Unsorted,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::PriceAsc => "price_asc",
            SortOrder::PriceDesc => "price_desc",
            SortOrder::CostBenefit => "cost_benefit",
            SortOrder::YearDesc => "year_desc",
            SortOrder::Unsorted => "unsorted",
        }
    }

    /// Parse a query value; anything unrecognised keeps catalog order.
    pub fn from_param(raw: &str) -> Self {
        raw.parse().unwrap_or(SortOrder::Unsorted)
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "price_asc" => Ok(SortOrder::PriceAsc),
            "price_desc" => Ok(SortOrder::PriceDesc),
            "cost_benefit" => Ok(SortOrder::CostBenefit),
            "year_desc" => Ok(SortOrder::YearDesc),
            other => Err(format!("unknown sort order: {other}")),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoredCar {
    #[serde(flatten)]
    pub car: Car,
    #[serde(rename = "match")]
    pub match_result: MatchResult,
}

/// Run the match engine over every car, logging consistency faults.
pub fn score_cars<I>(cars: I, weights: &Weights) -> Vec<ScoredCar>
where
    I: IntoIterator<Item = Car>,
{
    cars.into_iter()
        .map(|car| {
            let match_result = match_car(&car, weights);
            if let Some(MatchFault::NonFinite {
                weighted_sum,
                total_weight,
            }) = match_result.fault
            {
                error!(
                    car_id = %car.id,
                    ?weights,
                    weighted_sum,
                    total_weight,
                    "match percentage is not finite; falling back to 0"
                );
            }
            ScoredCar { car, match_result }
        })
        .collect()
}

/// Order scored cars in place. Match mode always ranks by percentage.
/// The sort is stable, so ties keep catalog order.
pub fn sort_scored(cars: &mut [ScoredCar], order: SortOrder, match_mode: bool) {
    if match_mode {
        cars.sort_by(by_percentage_desc);
        return;
    }

    match order {
        SortOrder::CostBenefit => cars.sort_by(by_percentage_desc),
        SortOrder::PriceAsc => cars.sort_by(|a, b| cmp_f64(a.car.price_avg, b.car.price_avg)),
        SortOrder::PriceDesc => cars.sort_by(|a, b| cmp_f64(b.car.price_avg, a.car.price_avg)),
        SortOrder::YearDesc => cars.sort_by(|a, b| b.car.year.cmp(&a.car.year)),
        SortOrder::Unsorted => {}
    }
}

fn by_percentage_desc(a: &ScoredCar, b: &ScoredCar) -> Ordering {
    b.match_result.percentage.cmp(&a.match_result.percentage)
}

fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}
