use std::fmt;

use serde::{Deserialize, Serialize};

/// Total the quiz lets a user distribute across the four categories.
pub const QUIZ_BUDGET: f64 = 100.0;

/// Weight the quiz starts every category at.
pub const QUIZ_DEFAULT_WEIGHT: f64 = 25.0;

/// Composite categories in evaluation order. Tie breaks rely on this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Comfort,
    Economy,
    Performance,
    Space,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Comfort,
        Category::Economy,
        Category::Performance,
        Category::Space,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Comfort => "comfort",
            Category::Economy => "economy",
            Category::Performance => "performance",
            Category::Space => "space",
        }
    }

    /// Query-string key the quiz encodes this weight under.
    pub fn query_key(&self) -> &'static str {
        match self {
            Category::Comfort => "w_comfort",
            Category::Economy => "w_economy",
            Category::Performance => "w_performance",
            Category::Space => "w_space",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-request user priorities. Only persisted as part of match feedback;
/// missing fields deserialize to 0.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Weights {
    pub comfort: f64,
    pub economy: f64,
    pub performance: f64,
    pub space: f64,
}

impl Weights {
    pub fn new(comfort: f64, economy: f64, performance: f64, space: f64) -> Self {
        Self {
            comfort,
            economy,
            performance,
            space,
        }
    }

    /// No preference expressed.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Starting point of the quiz.
    pub fn balanced() -> Self {
        Self::new(
            QUIZ_DEFAULT_WEIGHT,
            QUIZ_DEFAULT_WEIGHT,
            QUIZ_DEFAULT_WEIGHT,
            QUIZ_DEFAULT_WEIGHT,
        )
    }

    pub fn get(&self, category: Category) -> f64 {
        match category {
            Category::Comfort => self.comfort,
            Category::Economy => self.economy,
            Category::Performance => self.performance,
            Category::Space => self.space,
        }
    }

    fn set(&mut self, category: Category, value: f64) {
        match category {
            Category::Comfort => self.comfort = value,
            Category::Economy => self.economy = value,
            Category::Performance => self.performance = value,
            Category::Space => self.space = value,
        }
    }

    pub fn total(&self) -> f64 {
        self.comfort + self.economy + self.performance + self.space
    }

    /// Category holding the largest weight; the first one in evaluation
    /// order wins a tie.
    pub fn dominant(&self) -> Category {
        let mut best = Category::Comfort;
        for category in Category::ALL.into_iter().skip(1) {
            if self.get(category) > self.get(best) {
                best = category;
            }
        }
        best
    }

    /// Apply a quiz slider move, keeping the total within [`QUIZ_BUDGET`].
    ///
    /// Lowering a weight is always accepted. Raising one is capped at the
    /// remaining budget and ignored when nothing is left.
    pub fn adjust(&self, category: Category, value: f64) -> Weights {
        let current = self.get(category);
        let remaining = QUIZ_BUDGET - self.total();
        let diff = value - current;

        if diff > 0.0 && remaining <= 0.0 {
            return *self;
        }

        let allowed = if diff > 0.0 {
            current + diff.min(remaining)
        } else {
            value
        };

        let mut next = *self;
        next.set(category, allowed);
        next
    }

    /// Decode the `w_*` query parameters. Missing, empty, unparsable,
    /// non-finite and negative values all decode to 0.
    pub fn from_query<K, V>(pairs: &[(K, V)]) -> Weights
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut weights = Weights::zero();
        for category in Category::ALL {
            let value = pairs
                .iter()
                .rev()
                .find(|(key, _)| key.as_ref() == category.query_key())
                .map(|(_, value)| parse_weight(value.as_ref()))
                .unwrap_or(0.0);
            weights.set(category, value);
        }
        weights
    }

    /// Encode as the query string the quiz submits to the results page.
    pub fn to_query(&self) -> String {
        let mut parts: Vec<String> = Category::ALL
            .iter()
            .map(|category| format!("{}={}", category.query_key(), self.get(*category)))
            .collect();
        parts.push("mode=match".to_string());
        parts.join("&")
    }
}

pub(crate) fn parse_number(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

fn parse_weight(raw: &str) -> f64 {
    parse_number(raw).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balanced_weights_fill_the_budget() {
        assert_eq!(Weights::balanced().total(), QUIZ_BUDGET);
        assert_eq!(Weights::zero().total(), 0.0);
    }

    #[test]
    fn dominant_prefers_evaluation_order_on_ties() {
        assert_eq!(Weights::balanced().dominant(), Category::Comfort);
        assert_eq!(Weights::zero().dominant(), Category::Comfort);
        assert_eq!(
            Weights::new(10.0, 40.0, 10.0, 40.0).dominant(),
            Category::Economy
        );
        assert_eq!(
            Weights::new(0.0, 10.0, 30.0, 30.0).dominant(),
            Category::Performance
        );
        assert_eq!(Weights::new(5.0, 5.0, 5.0, 50.0).dominant(), Category::Space);
    }

    #[test]
    fn adjust_rejects_increases_when_budget_is_spent() {
        let weights = Weights::balanced();
        let next = weights.adjust(Category::Economy, 40.0);
        assert_eq!(next, weights);
    }

    #[test]
    fn adjust_caps_increases_at_remaining_budget() {
        let weights = Weights::new(25.0, 25.0, 25.0, 15.0);
        let next = weights.adjust(Category::Economy, 60.0);
        assert_eq!(next.economy, 35.0);
        assert_eq!(next.total(), QUIZ_BUDGET);
    }

    #[test]
    fn adjust_always_accepts_decreases() {
        let weights = Weights::balanced();
        let next = weights.adjust(Category::Performance, 0.0);
        assert_eq!(next.performance, 0.0);
        assert_eq!(next.total(), 75.0);

        let raised = next.adjust(Category::Space, 70.0);
        assert_eq!(raised.space, 50.0);
    }

    #[test]
    fn decodes_query_parameters_leniently() {
        let pairs = [
            ("w_comfort", "10"),
            ("w_economy", "abc"),
            ("w_performance", "-20"),
            ("q", "onix"),
            ("w_space", " 7.5 "),
        ];

        let weights = Weights::from_query(&pairs);
        assert_eq!(weights, Weights::new(10.0, 0.0, 0.0, 7.5));
    }

    #[test]
    fn missing_query_parameters_decode_to_zero() {
        let pairs: [(&str, &str); 0] = [];
        assert_eq!(Weights::from_query(&pairs), Weights::zero());
    }

    #[test]
    fn last_repeated_parameter_wins() {
        let pairs = [("w_space", "10"), ("w_space", "NaN"), ("w_space", "30")];
        assert_eq!(Weights::from_query(&pairs).space, 30.0);
    }

    #[test]
    fn query_round_trips_through_the_results_page() {
        let weights = Weights::new(10.0, 60.0, 0.0, 30.0);
        let query = weights.to_query();
        assert_eq!(
            query,
            "w_comfort=10&w_economy=60&w_performance=0&w_space=30&mode=match"
        );

        let pairs: Vec<(String, String)> = query
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        assert_eq!(Weights::from_query(&pairs), weights);
    }
}
