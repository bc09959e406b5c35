use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A bookable session with its live occupancy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub max_participants: i32,
    pub current_bookings: u64,
    pub available_spots: u64,
    pub is_full: bool,
    pub instructor_id: Option<Uuid>,
    pub instructor_user_name: Option<String>,
    pub day_of_week: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

/// A single session; `is_booked` is present when the caller is signed in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionDetailResponse {
    #[serde(flatten)]
    pub session: SessionResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_booked: Option<bool>,
}

/// Session row without occupancy, as listed on a trainer's page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    pub id: Uuid,
    pub title: String,
    pub category: String,
    pub max_participants: i32,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub is_deleted: bool,
}

/// Request to schedule a session.
///
/// `instructor_id` is only honoured for admins; trainers always schedule
/// their own classes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSessionRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    pub max_participants: i32,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub instructor_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionListQuery {
    pub filter: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryQuery {
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeekQuery {
    pub start: Option<NaiveDate>,
}

/// A trainer's schedule for one week.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainerWeekResponse {
    pub trainer_id: Uuid,
    pub week_start: NaiveDate,
    pub sessions: Vec<SessionResponse>,
}
