//! Equipment Model

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Bookable equipment item (projector, laptop, audio kit, lab tool)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    pub id: Uuid,
    pub name: String,
    /// Equipment category, stored in the `type` column
    #[serde(rename = "type")]
    pub equipment_type: String,
    pub description: Option<String>,
    #[serde(default = "default_available")]
    pub is_available: bool,
}

fn default_available() -> bool {
    true
}

impl Equipment {
    /// Case-insensitive match of `needle` (already lowercased) against name or type
    pub fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.equipment_type.to_lowercase().contains(needle)
    }
}
