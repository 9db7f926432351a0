pub mod brands;
pub mod query;
pub mod record;

pub use brands::{distinct_brands, BrandCache, BrandCacheConfig, BrandCacheError, Clock, SystemClock};
pub use query::{find_by_ids, search, CatalogQuery, SearchOutcome};
pub use record::{CarDraft, CarValidationError};
