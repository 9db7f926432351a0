pub mod catalog;
pub mod comparison;
pub mod deep_links;
pub mod feedback;
pub mod logging;
pub mod matching;
pub mod scoring;

use serde::{Deserialize, Serialize};

use scoring::{RawSpec, ScoreSet};

// Catalog records shared by the search, comparison and write paths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Car {
    pub id: String,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub price_avg: f64,
    #[serde(rename = "type")]
    pub car_type: String,
    #[serde(default)]
    pub image_url: Option<String>,
    /// `None` while the car is still a draft without measured specs.
    #[serde(default)]
    pub spec: Option<CarSpec>,
}

impl Car {
    /// Normalized scores, if the car has a spec.
    pub fn scores(&self) -> Option<&ScoreSet> {
        self.spec.as_ref().map(|spec| &spec.scores)
    }

    /// Recompute the stored scores after the raw measurements changed.
    pub fn rescore(&mut self) {
        if let Some(spec) = self.spec.as_mut() {
            spec.scores = scoring::normalize(&spec.raw);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarSpec {
    #[serde(flatten)]
    pub raw: RawSpec,
    pub scores: ScoreSet,
    #[serde(default = "default_fuel_type")]
    pub fuel_type: String,
    #[serde(default = "default_transmission")]
    pub transmission: String,
}

impl CarSpec {
    /// Build a spec from raw measurements, scoring them on the way in.
    pub fn from_raw(raw: RawSpec) -> Self {
        let scores = scoring::normalize(&raw);
        Self {
            raw,
            scores,
            fuel_type: default_fuel_type(),
            transmission: default_transmission(),
        }
    }
}

pub(crate) fn default_fuel_type() -> String {
    "Flex".to_string()
}

pub(crate) fn default_transmission() -> String {
    "Automatic".to_string()
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub fn raw(trunk: f64, wheelbase: f64, clearance: f64, consumption: f64) -> RawSpec {
        RawSpec {
            trunk_liters: trunk,
            wheelbase,
            ground_clearance: clearance,
            fuel_consumption_city: consumption,
            hp: Some(126.0),
            acceleration: Some(11.2),
        }
    }

    pub fn car(id: &str, brand: &str, model: &str, price: f64, year: i32, raw: RawSpec) -> Car {
        Car {
            id: id.into(),
            brand: brand.into(),
            model: model.into(),
            year,
            price_avg: price,
            car_type: "SUV".into(),
            image_url: None,
            spec: Some(CarSpec::from_raw(raw)),
        }
    }

    pub fn draft(id: &str) -> Car {
        Car {
            id: id.into(),
            brand: "Draft".into(),
            model: "Pending".into(),
            year: 2024,
            price_avg: 0.0,
            car_type: "Hatch".into(),
            image_url: None,
            spec: None,
        }
    }
}
