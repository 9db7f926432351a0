use serde::Serialize;
use tracing::debug;

use crate::matching::weights::parse_number;
use crate::matching::{score_cars, sort_scored, ScoredCar, SortOrder, Weights};
use crate::Car;

/// Filters and ordering of a catalog search, decoded from the results page
/// query string.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CatalogQuery {
    /// Case-insensitive substring of brand or model.
    pub text: Option<String>,
    pub car_type: Option<String>,
    /// Liters.
    pub min_trunk: f64,
    /// km/l.
    pub min_consumption: f64,
    pub order: SortOrder,
    pub weights: Weights,
    /// Rank by match percentage and echo the weights back.
    pub match_mode: bool,
}

impl CatalogQuery {
    /// Decode `q`, `type`, `minTrunk`, `minCons`, `order`, `w_*` and
    /// `mode=match`. Bad numbers decode to 0 and an absent order means
    /// `price_asc`.
    pub fn from_query<K, V>(pairs: &[(K, V)]) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let get = |name: &str| param(pairs, name);
        let non_empty = |name: &str| get(name).filter(|v| !v.is_empty()).map(str::to_string);

        Self {
            text: non_empty("q"),
            car_type: non_empty("type"),
            min_trunk: get("minTrunk").map(parse_number).unwrap_or(0.0),
            min_consumption: get("minCons").map(parse_number).unwrap_or(0.0),
            order: get("order")
                .filter(|v| !v.is_empty())
                .map(SortOrder::from_param)
                .unwrap_or_default(),
            weights: Weights::from_query(pairs),
            match_mode: get("mode") == Some("match"),
        }
    }

    pub fn matches(&self, car: &Car) -> bool {
        if let Some(text) = &self.text {
            let needle = text.to_lowercase();
            let hit = car.brand.to_lowercase().contains(&needle)
                || car.model.to_lowercase().contains(&needle);
            if !hit {
                return false;
            }
        }

        if let Some(car_type) = &self.car_type {
            if &car.car_type != car_type {
                return false;
            }
        }

        // drafts without a spec never pass the spec filters
        match &car.spec {
            Some(spec) => {
                spec.raw.trunk_liters >= self.min_trunk
                    && spec.raw.fuel_consumption_city >= self.min_consumption
            }
            None => false,
        }
    }
}

fn param<'a, K, V>(pairs: &'a [(K, V)], name: &str) -> Option<&'a str>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    pairs
        .iter()
        .rev()
        .find(|(key, _)| key.as_ref() == name)
        .map(|(_, value)| value.as_ref().trim())
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    pub cars: Vec<ScoredCar>,
    /// Present in match mode only.
    pub weights: Option<Weights>,
}

/// Filter, score and order the catalog for one results-page request.
pub fn search<I>(cars: I, query: &CatalogQuery) -> SearchOutcome
where
    I: IntoIterator<Item = Car>,
{
    let mut considered = 0usize;
    let filtered: Vec<Car> = cars
        .into_iter()
        .inspect(|_| considered += 1)
        .filter(|car| query.matches(car))
        .collect();

    let mut scored = score_cars(filtered, &query.weights);
    sort_scored(&mut scored, query.order, query.match_mode);

    debug!(
        considered,
        listed = scored.len(),
        order = query.order.as_str(),
        match_mode = query.match_mode,
        "catalog search"
    );

    SearchOutcome {
        cars: scored,
        weights: query.match_mode.then_some(query.weights),
    }
}

/// Resolve a comma separated id list (`ids=a,b`) against the catalog,
/// keeping the order of the list. Unknown and empty ids are skipped.
pub fn find_by_ids<'a>(cars: &'a [Car], ids: &str) -> Vec<&'a Car> {
    ids.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .filter_map(|id| cars.iter().find(|car| car.id == id))
        .collect()
}
