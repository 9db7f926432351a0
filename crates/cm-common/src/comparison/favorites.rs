use serde::{Deserialize, Serialize};

use crate::catalog::find_by_ids;
use crate::Car;

/// Cars saved to the garage, in the order they were saved. Unlike
/// [`super::ComparisonSelection`] there is no cap.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteSet {
    ids: Vec<String>,
}

impl FavoriteSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.ids.iter().any(|existing| existing == id)
    }

    pub fn add(&mut self, id: impl Into<String>) {
        let id = id.into();
        if !self.is_favorite(&id) {
            self.ids.push(id);
        }
    }

    pub fn remove(&mut self, id: &str) {
        self.ids.retain(|existing| existing != id);
    }

    pub fn toggle(&mut self, id: impl Into<String>) {
        let id = id.into();
        if self.is_favorite(&id) {
            self.remove(&id);
        } else {
            self.ids.push(id);
        }
    }

    /// Value for the catalog `ids` parameter.
    pub fn to_param(&self) -> String {
        self.ids.join(",")
    }

    /// Current catalog records of the saved cars. Ids that left the catalog
    /// are skipped.
    pub fn resolve<'a>(&self, cars: &'a [Car]) -> Vec<&'a Car> {
        if self.is_empty() {
            return Vec::new();
        }
        find_by_ids(cars, &self.to_param())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{car, raw};

    fn catalog() -> Vec<Car> {
        vec![
            car("polo", "Volkswagen", "Polo", 89_990.0, 2024, raw(300.0, 2.56, 149.0, 13.5)),
            car("kicks", "Nissan", "Kicks", 125_990.0, 2024, raw(432.0, 2.62, 200.0, 11.4)),
            car("creta", "Hyundai", "Creta", 135_990.0, 2024, raw(422.0, 2.61, 190.0, 11.6)),
        ]
    }

    #[test]
    fn add_remove_and_toggle() {
        let mut favorites = FavoriteSet::new();
        favorites.add("polo");
        favorites.add("kicks");
        favorites.add("polo");
        assert_eq!(favorites.ids(), ["polo", "kicks"]);
        assert!(favorites.is_favorite("kicks"));

        favorites.toggle("kicks");
        assert!(!favorites.is_favorite("kicks"));
        favorites.toggle("creta");
        assert_eq!(favorites.to_param(), "polo,creta");

        favorites.remove("polo");
        assert_eq!(favorites.ids(), ["creta"]);
    }

    #[test]
    fn has_no_cap() {
        let mut favorites = FavoriteSet::new();
        for id in ["a", "b", "c", "d"] {
            favorites.add(id);
        }
        assert_eq!(favorites.ids().len(), 4);
    }

    #[test]
    fn resolves_saved_ids_against_the_catalog() {
        let cars = catalog();
        let mut favorites = FavoriteSet::new();
        favorites.add("creta");
        favorites.add("sold-out");
        favorites.add("polo");

        let found: Vec<&str> = favorites.resolve(&cars).iter().map(|c| c.id.as_str()).collect();
        assert_eq!(found, vec!["creta", "polo"]);

        assert!(FavoriteSet::new().resolve(&cars).is_empty());
    }
}
