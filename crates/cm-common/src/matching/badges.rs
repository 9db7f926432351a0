use std::fmt;

use serde::{Serialize, Serializer};

use super::engine::CompositeScores;
use super::weights::{Category, Weights};
use crate::scoring::ScoreSet;

/// Category scores at or above this earn a badge.
pub const BADGE_THRESHOLD: f64 = 8.0;
/// Stricter bar for the trunk badge.
pub const GIANT_TRUNK_THRESHOLD: u8 = 9;

/// Short label explaining why a car scored well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Badge {
    GiantTrunk,
    Economical,
    Powerful,
    Spacious,
    ComfortSeal,
    /// The user's top priority is also one of the car's strong points.
    TopMatch(Category),
}

impl Badge {
    pub fn label(&self) -> &'static str {
        match self {
            Badge::GiantTrunk => "Giant trunk",
            Badge::Economical => "Economical",
            Badge::Powerful => "Powerful",
            Badge::Spacious => "Spacious",
            Badge::ComfortSeal => "Comfort seal",
            Badge::TopMatch(Category::Comfort) => "Top match in comfort",
            Badge::TopMatch(Category::Economy) => "Top match in economy",
            Badge::TopMatch(Category::Performance) => "Top match in performance",
            Badge::TopMatch(Category::Space) => "Top match in space",
        }
    }
}

impl fmt::Display for Badge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Badge {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Derive the badge list for a scored car.
///
/// Quality badges depend on the scores alone. The personalized badge looks at
/// the dominant weight only, and only economy and space earn one.
/// A performance top match is a pending product decision and stays off.
pub fn derive_badges(
    scores: &ScoreSet,
    composites: &CompositeScores,
    weights: &Weights,
) -> Vec<Badge> {
    let mut badges = Vec::new();

    if scores.trunk >= GIANT_TRUNK_THRESHOLD {
        push_unique(&mut badges, Badge::GiantTrunk);
    }
    if f64::from(scores.consumption) >= BADGE_THRESHOLD {
        push_unique(&mut badges, Badge::Economical);
    }
    if f64::from(scores.hp) >= BADGE_THRESHOLD {
        push_unique(&mut badges, Badge::Powerful);
    }
    if f64::from(scores.wheelbase) >= BADGE_THRESHOLD {
        push_unique(&mut badges, Badge::Spacious);
    }
    if composites.comfort >= BADGE_THRESHOLD {
        push_unique(&mut badges, Badge::ComfortSeal);
    }

    let top = weights.dominant();
    if matches!(top, Category::Economy | Category::Space)
        && composites.get(top) >= BADGE_THRESHOLD
    {
        push_unique(&mut badges, Badge::TopMatch(top));
    }

    badges
}

fn push_unique(badges: &mut Vec<Badge>, badge: Badge) {
    if !badges.contains(&badge) {
        badges.push(badge);
    }
}
