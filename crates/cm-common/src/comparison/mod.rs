pub mod favorites;
pub mod report;
pub mod selection;

pub use favorites::FavoriteSet;
pub use report::{compare, winner, Attribute, ComparisonReport, ComparisonRow, Side};
pub use selection::{ComparisonSelection, MAX_COMPARED};
