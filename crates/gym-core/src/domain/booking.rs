use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::SessionDetails;

/// Status given to every new booking.
pub const CONFIRMED: &str = "Confirmed";

/// A user's reservation of a place in a session.
///
/// At most one booking exists per `(user_id, session_id)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub user_id: Uuid,
    pub session_id: Uuid,
    pub booked_at: DateTime<Utc>,
    pub status: String,
}

impl Booking {
    pub fn new(user_id: Uuid, session_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            session_id,
            booked_at: Utc::now(),
            status: CONFIRMED.to_string(),
        }
    }
}

/// A booking joined with the session it reserves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookedSession {
    pub booking: Booking,
    pub session: SessionDetails,
}
