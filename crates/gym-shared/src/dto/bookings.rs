use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::SessionResponse;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub session_id: Uuid,
    pub booked_at: DateTime<Utc>,
    pub status: String,
}

/// One of the caller's bookings with the session it reserves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookedSessionResponse {
    pub booking: BookingResponse,
    pub session: SessionResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingStatusResponse {
    pub session_id: Uuid,
    pub is_booked: bool,
}
