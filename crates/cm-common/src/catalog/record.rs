use serde::Deserialize;

use crate::scoring::RawSpec;
use crate::{default_fuel_type, default_transmission, Car, CarSpec};

pub const MIN_MODEL_YEAR: i32 = 1900;

/// Unvalidated catalog form input.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CarDraft {
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub price_avg: f64,
    #[serde(rename = "type")]
    pub car_type: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub trunk_liters: f64,
    #[serde(default)]
    pub wheelbase: f64,
    #[serde(default)]
    pub ground_clearance: f64,
    #[serde(default)]
    pub fuel_consumption_city: f64,
    #[serde(default)]
    pub hp: Option<f64>,
    #[serde(default)]
    pub acceleration: Option<f64>,
    #[serde(default)]
    pub transmission: Option<String>,
    #[serde(default)]
    pub fuel_type: Option<String>,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum CarValidationError {
    #[error("brand is required")]
    MissingBrand,
    #[error("model is required")]
    MissingModel,
    #[error("category is required")]
    MissingType,
    #[error("year {year} is outside {min}..={max}")]
    YearOutOfRange { year: i32, min: i32, max: i32 },
    #[error("price must be a non-negative number, got {0}")]
    InvalidPrice(f64),
    #[error("{field} must be a non-negative number, got {value}")]
    InvalidMeasurement { field: &'static str, value: f64 },
    #[error("image url must be an http(s) url: {0}")]
    InvalidImageUrl(String),
}

impl CarDraft {
    /// Validate the form and build a catalog record with freshly computed
    /// scores. `current_year` bounds the model year (next year's models are
    /// allowed).
    pub fn validate(self, id: impl Into<String>, current_year: i32) -> Result<Car, CarValidationError> {
        let brand = required(&self.brand, CarValidationError::MissingBrand)?;
        let model = required(&self.model, CarValidationError::MissingModel)?;
        let car_type = required(&self.car_type, CarValidationError::MissingType)?;

        let max_year = current_year + 1;
        if !(MIN_MODEL_YEAR..=max_year).contains(&self.year) {
            return Err(CarValidationError::YearOutOfRange {
                year: self.year,
                min: MIN_MODEL_YEAR,
                max: max_year,
            });
        }

        if !non_negative(self.price_avg) {
            return Err(CarValidationError::InvalidPrice(self.price_avg));
        }

        let image_url = match self.image_url.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(url) if url.starts_with("http://") || url.starts_with("https://") => {
                Some(url.to_string())
            }
            Some(url) => return Err(CarValidationError::InvalidImageUrl(url.to_string())),
        };

        let raw = RawSpec {
            trunk_liters: measurement("trunk_liters", self.trunk_liters)?,
            wheelbase: measurement("wheelbase", self.wheelbase)?,
            ground_clearance: measurement("ground_clearance", self.ground_clearance)?,
            fuel_consumption_city: measurement(
                "fuel_consumption_city",
                self.fuel_consumption_city,
            )?,
            hp: self.hp.map(|v| measurement("hp", v)).transpose()?,
            acceleration: self
                .acceleration
                .map(|v| measurement("acceleration", v))
                .transpose()?,
        };

        let mut spec = CarSpec::from_raw(raw);
        spec.transmission = self
            .transmission
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(default_transmission);
        spec.fuel_type = self
            .fuel_type
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(default_fuel_type);

        Ok(Car {
            id: id.into(),
            brand,
            model,
            year: self.year,
            price_avg: self.price_avg,
            car_type,
            image_url,
            spec: Some(spec),
        })
    }
}

fn required(value: &str, err: CarValidationError) -> Result<String, CarValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(err)
    } else {
        Ok(trimmed.to_string())
    }
}

fn non_negative(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

fn measurement(field: &'static str, value: f64) -> Result<f64, CarValidationError> {
    if non_negative(value) {
        Ok(value)
    } else {
        Err(CarValidationError::InvalidMeasurement { field, value })
    }
}
