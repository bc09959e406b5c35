use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Workout category offered by the gym.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Yoga,
    Running,
    Weightloss,
    Cardio,
    Bodybuilding,
    Nutrition,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Yoga,
        Category::Running,
        Category::Weightloss,
        Category::Cardio,
        Category::Bodybuilding,
        Category::Nutrition,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Yoga => "Yoga",
            Category::Running => "Running",
            Category::Weightloss => "Weightloss",
            Category::Cardio => "Cardio",
            Category::Bodybuilding => "Bodybuilding",
            Category::Nutrition => "Nutrition",
        }
    }

    /// Case-insensitive lookup in the allow-list.
    pub fn parse(name: &str) -> Option<Category> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
            .ok_or_else(|| DomainError::Validation(format!("Category '{}' is not allowed.", s)))
    }
}

/// A scheduled workout session (class).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    /// Stored as free text; new sessions are restricted to [`Category`].
    pub category: String,
    pub max_participants: i32,
    pub instructor_id: Option<Uuid>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub is_deleted: bool,
}

impl Session {
    pub fn new(
        title: String,
        description: String,
        category: Category,
        max_participants: i32,
        instructor_id: Option<Uuid>,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            description,
            category: category.as_str().to_string(),
            max_participants,
            instructor_id,
            start_time,
            end_time,
            is_deleted: false,
        }
    }

    /// Only sessions that have not started yet accept bookings.
    pub fn has_started(&self, now: DateTime<Utc>) -> bool {
        self.start_time <= now
    }

    /// Half-open interval overlap: back-to-back sessions do not overlap.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start_time < end && self.end_time > start
    }

    pub fn is_in_category(&self, category: &str) -> bool {
        !self.category.is_empty() && self.category.eq_ignore_ascii_case(category.trim())
    }
}

/// A session together with the data needed to display it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionDetails {
    pub session: Session,
    pub instructor_user_name: Option<String>,
    pub current_bookings: u64,
}

impl SessionDetails {
    pub fn is_full(&self) -> bool {
        self.current_bookings >= self.session.max_participants.max(0) as u64
    }
}
