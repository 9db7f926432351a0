use serde::Serialize;

use crate::Car;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

/// Measurements shown on the comparison page, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    Hp,
    Acceleration,
    FuelConsumptionCity,
    TrunkLiters,
    Wheelbase,
    GroundClearance,
}

impl Attribute {
    pub const ALL: [Attribute; 6] = [
        Attribute::Hp,
        Attribute::Acceleration,
        Attribute::FuelConsumptionCity,
        Attribute::TrunkLiters,
        Attribute::Wheelbase,
        Attribute::GroundClearance,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Attribute::Hp => "Power",
            Attribute::Acceleration => "0-100 km/h",
            Attribute::FuelConsumptionCity => "City consumption",
            Attribute::TrunkLiters => "Trunk",
            Attribute::Wheelbase => "Wheelbase",
            Attribute::GroundClearance => "Ground clearance",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Attribute::Hp => "hp",
            Attribute::Acceleration => "s",
            Attribute::FuelConsumptionCity => "km/l",
            Attribute::TrunkLiters => "l",
            Attribute::Wheelbase => "m",
            Attribute::GroundClearance => "mm",
        }
    }

    pub fn lower_is_better(&self) -> bool {
        matches!(self, Attribute::Acceleration)
    }

    /// Value of this attribute for `car`; `None` for drafts and missing
    /// optional measurements.
    pub fn value(&self, car: &Car) -> Option<f64> {
        let raw = &car.spec.as_ref()?.raw;
        match self {
            Attribute::Hp => raw.hp.filter(|v| *v > 0.0),
            Attribute::Acceleration => raw.acceleration.filter(|v| *v > 0.0),
            Attribute::FuelConsumptionCity => Some(raw.fuel_consumption_city),
            Attribute::TrunkLiters => Some(raw.trunk_liters),
            Attribute::Wheelbase => Some(raw.wheelbase),
            Attribute::GroundClearance => Some(raw.ground_clearance),
        }
    }
}

/// Which side wins a single measurement. Ties and missing values have no
/// winner.
pub fn winner(left: Option<f64>, right: Option<f64>, lower_is_better: bool) -> Option<Side> {
    let (left, right) = (left?, right?);
    if left == right || left.is_nan() || right.is_nan() {
        return None;
    }

    let left_wins = if lower_is_better {
        left < right
    } else {
        left > right
    };

    Some(if left_wins { Side::Left } else { Side::Right })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub attribute: Attribute,
    pub label: &'static str,
    pub unit: &'static str,
    pub left: Option<f64>,
    pub right: Option<f64>,
    pub lower_is_better: bool,
    pub winner: Option<Side>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonReport {
    pub left_id: String,
    pub right_id: String,
    pub rows: Vec<ComparisonRow>,
    pub left_wins: usize,
    pub right_wins: usize,
}

/// Side-by-side comparison of two catalog cars.
pub fn compare(left: &Car, right: &Car) -> ComparisonReport {
    let rows: Vec<ComparisonRow> = Attribute::ALL
        .iter()
        .map(|attribute| {
            let l = attribute.value(left);
            let r = attribute.value(right);
            ComparisonRow {
                attribute: *attribute,
                label: attribute.label(),
                unit: attribute.unit(),
                left: l,
                right: r,
                lower_is_better: attribute.lower_is_better(),
                winner: winner(l, r, attribute.lower_is_better()),
            }
        })
        .collect();

    let count = |side: Side| rows.iter().filter(|row| row.winner == Some(side)).count();

    ComparisonReport {
        left_id: left.id.clone(),
        right_id: right.id.clone(),
        left_wins: count(Side::Left),
        right_wins: count(Side::Right),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::RawSpec;
    use crate::test_support::{car, draft};

    fn fastback() -> Car {
        car(
            "fastback",
            "Fiat",
            "Fastback",
            135_990.0,
            2024,
            RawSpec {
                trunk_liters: 600.0,
                wheelbase: 2.53,
                ground_clearance: 192.0,
                fuel_consumption_city: 11.3,
                hp: Some(130.0),
                acceleration: Some(8.1),
            },
        )
    }

    fn tcross() -> Car {
        car(
            "tcross",
            "Volkswagen",
            "T-Cross",
            145_990.0,
            2024,
            RawSpec {
                trunk_liters: 373.0,
                wheelbase: 2.65,
                ground_clearance: 190.0,
                fuel_consumption_city: 11.3,
                hp: Some(128.0),
                acceleration: None,
            },
        )
    }

    #[test]
    fn winner_handles_direction_ties_and_gaps() {
        assert_eq!(winner(Some(130.0), Some(128.0), false), Some(Side::Left));
        assert_eq!(winner(Some(8.1), Some(10.2), true), Some(Side::Left));
        assert_eq!(winner(Some(8.1), Some(10.2), false), Some(Side::Right));
        assert_eq!(winner(Some(11.3), Some(11.3), false), None);
        assert_eq!(winner(None, Some(1.0), false), None);
    }

    #[test]
    fn compares_every_attribute() {
        let report = compare(&fastback(), &tcross());

        let winners: Vec<(Attribute, Option<Side>)> =
            report.rows.iter().map(|row| (row.attribute, row.winner)).collect();
        assert_eq!(
            winners,
            vec![
                (Attribute::Hp, Some(Side::Left)),
                (Attribute::Acceleration, None),
                (Attribute::FuelConsumptionCity, None),
                (Attribute::TrunkLiters, Some(Side::Left)),
                (Attribute::Wheelbase, Some(Side::Right)),
                (Attribute::GroundClearance, Some(Side::Left)),
            ]
        );
        assert_eq!(report.left_wins, 3);
        assert_eq!(report.right_wins, 1);
        assert!(report.rows[1].lower_is_better);
    }

    #[test]
    fn drafts_have_no_winners() {
        let report = compare(&draft("d"), &tcross());
        assert!(report.rows.iter().all(|row| row.winner.is_none()));
        assert_eq!(report.left_wins + report.right_wins, 0);
    }
}
