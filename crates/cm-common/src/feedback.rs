//! Thumbs up/down feedback on a match result, sent from the results page
//! together with the weights that produced it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::matching::Weights;
use crate::Car;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackType {
    ThumbsUp,
    ThumbsDown,
}

impl FeedbackType {
    pub fn from_thumbs(thumbs: bool) -> Self {
        if thumbs {
            FeedbackType::ThumbsUp
        } else {
            FeedbackType::ThumbsDown
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackType::ThumbsUp => "thumbs_up",
            FeedbackType::ThumbsDown => "thumbs_down",
        }
    }
}

/// Feedback body as posted by the results page.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRequest {
    #[serde(default)]
    pub car_id: Option<String>,
    #[serde(default)]
    pub thumbs: Option<bool>,
    #[serde(default)]
    pub weights: Option<Weights>,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum FeedbackError {
    #[error("car id is required")]
    MissingCarId,
    #[error("thumbs is required")]
    MissingThumbs,
    #[error("unknown car id: {0}")]
    UnknownCar(String),
}

/// Validated feedback, ready to be stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchFeedback {
    pub car_id: String,
    pub feedback_type: FeedbackType,
    /// Zero weights when the request carried none.
    pub weights: Weights,
    pub received_at: DateTime<Utc>,
}

impl MatchFeedback {
    /// Weights in the JSON form the feedback store keeps.
    pub fn weights_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.weights)
    }
}

impl FeedbackRequest {
    /// Check required fields and that the car exists in `catalog`.
    pub fn validate(
        self,
        catalog: &[Car],
        received_at: DateTime<Utc>,
    ) -> Result<MatchFeedback, FeedbackError> {
        let car_id = self
            .car_id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .ok_or(FeedbackError::MissingCarId)?;
        let thumbs = self.thumbs.ok_or(FeedbackError::MissingThumbs)?;

        if !catalog.iter().any(|car| car.id == car_id) {
            return Err(FeedbackError::UnknownCar(car_id));
        }

        Ok(MatchFeedback {
            car_id,
            feedback_type: FeedbackType::from_thumbs(thumbs),
            weights: self.weights.unwrap_or_default(),
            received_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{car, raw};
    use chrono::TimeZone;

    fn catalog() -> Vec<Car> {
        vec![car("kicks", "Nissan", "Kicks", 125_990.0, 2024, raw(432.0, 2.62, 200.0, 11.4))]
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn parse(body: &str) -> FeedbackRequest {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn accepts_the_results_page_body() {
        let request = parse(r#"{"carId":"kicks","thumbs":true,"weights":{"comfort":10,"economy":70,"performance":0,"space":20}}"#);

        let feedback = request.validate(&catalog(), now()).unwrap();
        assert_eq!(feedback.car_id, "kicks");
        assert_eq!(feedback.feedback_type, FeedbackType::ThumbsUp);
        assert_eq!(feedback.weights, Weights::new(10.0, 70.0, 0.0, 20.0));
        assert_eq!(feedback.received_at, now());
        assert_eq!(
            feedback.weights_json().unwrap(),
            r#"{"comfort":10.0,"economy":70.0,"performance":0.0,"space":20.0}"#
        );
    }

    #[test]
    fn thumbs_down_without_weights_stores_zero_weights() {
        let feedback = parse(r#"{"carId":"kicks","thumbs":false}"#)
            .validate(&catalog(), now())
            .unwrap();
        assert_eq!(feedback.feedback_type, FeedbackType::ThumbsDown);
        assert_eq!(feedback.weights, Weights::zero());
    }

    #[test]
    fn partial_weights_fill_missing_categories_with_zero() {
        let feedback = parse(r#"{"carId":"kicks","thumbs":true,"weights":{"space":40}}"#)
            .validate(&catalog(), now())
            .unwrap();
        assert_eq!(feedback.weights, Weights::new(0.0, 0.0, 0.0, 40.0));
    }

    #[test]
    fn rejects_missing_fields() {
        assert_eq!(
            parse(r#"{"thumbs":true}"#).validate(&catalog(), now()),
            Err(FeedbackError::MissingCarId)
        );
        assert_eq!(
            parse(r#"{"carId":"  ","thumbs":true}"#).validate(&catalog(), now()),
            Err(FeedbackError::MissingCarId)
        );
        assert_eq!(
            parse(r#"{"carId":"kicks"}"#).validate(&catalog(), now()),
            Err(FeedbackError::MissingThumbs)
        );
    }

    #[test]
    fn rejects_cars_outside_the_catalog() {
        assert_eq!(
            parse(r#"{"carId":"ghost","thumbs":true}"#).validate(&catalog(), now()),
            Err(FeedbackError::UnknownCar("ghost".into()))
        );
    }
}
