use serde::{Deserialize, Serialize};

/// Number of cars the comparison page shows side by side.
pub const MAX_COMPARED: usize = 2;

/// Ids picked for comparison. Adding beyond [`MAX_COMPARED`] evicts the
/// oldest pick.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonSelection {
    ids: Vec<String>,
}

impl ComparisonSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|existing| existing == id)
    }

    pub fn is_ready(&self) -> bool {
        self.ids.len() == MAX_COMPARED
    }

    pub fn add(&mut self, id: impl Into<String>) {
        let id = id.into();
        if self.contains(&id) {
            return;
        }
        if self.ids.len() >= MAX_COMPARED {
            self.ids.remove(0);
        }
        self.ids.push(id);
    }

    pub fn remove(&mut self, id: &str) {
        self.ids.retain(|existing| existing != id);
    }

    pub fn toggle(&mut self, id: impl Into<String>) {
        let id = id.into();
        if self.contains(&id) {
            self.remove(&id);
        } else {
            self.add(id);
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Value for the comparison page `ids` parameter.
    pub fn to_param(&self) -> String {
        self.ids.join(",")
    }
}
