//! Offline demo data
//!
//! Without backend settings the front-end runs against an in-memory backend
//! seeded with a small campus.

use crms_client::{MemoryTableClient, Session};
use serde_json::json;
use uuid::Uuid;

/// Demo faculty member
pub const FACULTY_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_4000_8000_0000_0000_0001);
/// Demo administrator
pub const ADMIN_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_4000_8000_0000_0000_0002);

/// In-memory backend with rooms, equipment and the two demo profiles
pub fn seeded_backend() -> MemoryTableClient {
    let backend = MemoryTableClient::new();

    let room = |name: &str, location: &str, capacity: i32, amenities: &[&str], available: bool| {
        json!({
            "id": Uuid::new_v4(),
            "name": name,
            "location": location,
            "capacity": capacity,
            "amenities": amenities,
            "description": null,
            "is_available": available,
        })
    };
    backend.seed(
        "rooms",
        [
            room("Conference Room A", "Admin Building, 2nd Floor", 12, &["Projector", "Whiteboard"], true),
            room("Lab C-205", "Science Wing", 30, &["Computers", "Air Conditioning"], true),
            room("Room B-304", "Main Hall", 40, &["Projector"], true),
            room("Lab A-102", "Engineering Building", 25, &["Workbenches"], false),
        ],
    );

    let item = |name: &str, kind: &str, description: Option<&str>| {
        json!({
            "id": Uuid::new_v4(),
            "name": name,
            "type": kind,
            "description": description,
            "is_available": true,
        })
    };
    backend.seed(
        "equipment",
        [
            item("Projector P-012", "Projector", Some("Portable HD projector")),
            item("Laptop L-07", "Computer", None),
            item("Wireless Mic Set", "Audio", Some("Two handheld microphones")),
        ],
    );

    backend.seed(
        "profiles",
        [
            json!({"id": FACULTY_ID, "first_name": "Ana", "last_name": "Reyes", "role": "faculty"}),
            json!({"id": ADMIN_ID, "first_name": "Maria", "last_name": "Santos", "role": "admin"}),
        ],
    );

    backend
}

/// Session for a demo user; the profile is loaded on sign-in
pub fn session(admin: bool) -> Session {
    let (id, email) = if admin {
        (ADMIN_ID, "maria.santos@campus.edu")
    } else {
        (FACULTY_ID, "ana.reyes@campus.edu")
    };
    let mut session = Session::new(id, "demo-token");
    session.email = Some(email.to_string());
    session
}
