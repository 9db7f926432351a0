pub mod badges;
pub mod engine;
pub mod ranking;
pub mod weights;

pub use badges::Badge;
pub use engine::{match_car, match_scores, CompositeScores, MatchFault, MatchResult};
pub use ranking::{score_cars, sort_scored, ScoredCar, SortOrder};
pub use weights::{Category, Weights};
