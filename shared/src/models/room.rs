//! Room Model

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::util::null_as_default;

/// Bookable room (classroom, lab, conference room, auditorium)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: Uuid,
    pub name: String,
    pub location: String,
    pub capacity: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub amenities: Vec<String>,
    pub description: Option<String>,
    #[serde(default = "default_available")]
    pub is_available: bool,
}

fn default_available() -> bool {
    true
}

impl Room {
    /// Case-insensitive match of `needle` (already lowercased) against name or location
    pub fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle) || self.location.to_lowercase().contains(needle)
    }
}
