//! Resource Model
//!
//! A resource is anything that can be reserved: a [`Room`] or an
//! [`Equipment`] item. Reservations refer to one by kind + id.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Equipment, Room};

/// Resource kind, as stored in `reservations.resource_type`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Room,
    Equipment,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Room => "room",
            Self::Equipment => "equipment",
        }
    }

    /// Backend table holding resources of this kind
    pub fn table(&self) -> &'static str {
        match self {
            Self::Room => "rooms",
            Self::Equipment => "equipment",
        }
    }

    /// Columns fetched when a reservation is shown with its resource
    pub fn summary_columns(&self) -> &'static str {
        match self {
            Self::Room => "name, location",
            Self::Equipment => "name, type",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "room" => Ok(Self::Room),
            "equipment" => Ok(Self::Equipment),
            other => Err(format!("unknown resource kind: {other}")),
        }
    }
}

/// A bookable entity of either kind
#[derive(Debug, Clone, PartialEq)]
pub enum Resource {
    Room(Room),
    Equipment(Equipment),
}

impl Resource {
    pub fn id(&self) -> Uuid {
        match self {
            Self::Room(room) => room.id,
            Self::Equipment(equipment) => equipment.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Room(room) => &room.name,
            Self::Equipment(equipment) => &equipment.name,
        }
    }

    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::Room(_) => ResourceKind::Room,
            Self::Equipment(_) => ResourceKind::Equipment,
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            Self::Room(room) => room.description.as_deref(),
            Self::Equipment(equipment) => equipment.description.as_deref(),
        }
    }

    /// Reference used to bind a reservation form to this resource
    pub fn to_ref(&self) -> ResourceRef {
        ResourceRef {
            id: self.id(),
            kind: self.kind(),
            name: self.name().to_string(),
        }
    }
}

impl From<Room> for Resource {
    fn from(room: Room) -> Self {
        Self::Room(room)
    }
}

impl From<Equipment> for Resource {
    fn from(equipment: Equipment) -> Self {
        Self::Equipment(equipment)
    }
}

/// Identifier, kind and display name of the resource a form is bound to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRef {
    pub id: Uuid,
    pub kind: ResourceKind,
    pub name: String,
}
