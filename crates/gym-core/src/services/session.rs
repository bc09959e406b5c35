//! Browsing and scheduling workout sessions.

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use uuid::Uuid;

use crate::domain::{Category, Session, SessionDetails};
use crate::error::DomainError;
use crate::ports::SessionRepository;

use super::validation::FieldCheck;

/// Input for scheduling a session.
#[derive(Debug, Clone)]
pub struct NewSession {
    pub title: String,
    pub description: String,
    pub category: String,
    pub max_participants: i32,
    pub instructor_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

#[derive(Clone)]
pub struct SessionService {
    sessions: Arc<dyn SessionRepository>,
}

impl SessionService {
    pub fn new(sessions: Arc<dyn SessionRepository>) -> Self {
        Self { sessions }
    }

    pub async fn list_all(&self) -> Result<Vec<SessionDetails>, DomainError> {
        Ok(self.sessions.list_active().await?)
    }

    /// A session that has not been deleted.
    pub async fn get(&self, id: Uuid) -> Result<SessionDetails, DomainError> {
        match self.sessions.find_details(id).await? {
            Some(details) if !details.session.is_deleted => Ok(details),
            _ => Err(DomainError::not_found("Session", id)),
        }
    }

    /// Sessions in an allowed category; anything outside the allow-list yields nothing.
    pub async fn by_category(&self, category: &str) -> Result<Vec<SessionDetails>, DomainError> {
        let Some(category) = Category::parse(category) else {
            return Ok(Vec::new());
        };
        self.filter_category(category.as_str()).await
    }

    /// Free-text category search; blank terms yield nothing.
    pub async fn search_by_category(&self, term: &str) -> Result<Vec<SessionDetails>, DomainError> {
        if term.trim().is_empty() {
            return Ok(Vec::new());
        }
        self.filter_category(term).await
    }

    /// Class listing filter: blank or `all` lists everything, otherwise filter by category.
    pub async fn browse(&self, filter: Option<&str>) -> Result<Vec<SessionDetails>, DomainError> {
        match filter.map(str::trim) {
            None | Some("") => self.list_all().await,
            Some(f) if f.eq_ignore_ascii_case("all") => self.list_all().await,
            Some(f) => self.by_category(f).await,
        }
    }

    /// An instructor's sessions for the seven days starting at `week_start`.
    pub async fn instructor_week(
        &self,
        instructor_id: Uuid,
        week_start: NaiveDate,
    ) -> Result<Vec<SessionDetails>, DomainError> {
        let from = week_start.and_time(NaiveTime::default()).and_utc();
        let to = from
            .checked_add_signed(Duration::days(7))
            .ok_or_else(|| DomainError::Validation("Week start is out of range.".to_string()))?;
        Ok(self
            .sessions
            .by_instructor_between(instructor_id, from, to)
            .await?)
    }

    pub async fn create(&self, input: NewSession) -> Result<Session, DomainError> {
        FieldCheck::new()
            .required("Title", &input.title)
            .max_len("Title", &input.title, 200)
            .max_len("Description", &input.description, 1000)
            .check(
                input.max_participants >= 1,
                "Max participants must be at least 1",
            )
            .finish()?;

        if input.end_time <= input.start_time {
            return Err(DomainError::Validation(
                "End time must be after start time.".to_string(),
            ));
        }

        let category: Category = input.category.parse()?;

        if self
            .sessions
            .has_overlap(input.instructor_id, input.start_time, input.end_time, None)
            .await?
        {
            return Err(DomainError::Conflict(
                "You already have a class scheduled during this time.".to_string(),
            ));
        }

        let session = Session::new(
            input.title.trim().to_string(),
            input.description,
            category,
            input.max_participants,
            Some(input.instructor_id),
            input.start_time,
            input.end_time,
        );

        let saved = self.sessions.save(session).await?;
        tracing::info!(
            session_id = %saved.id,
            instructor_id = %input.instructor_id,
            category = %saved.category,
            "Session scheduled"
        );
        Ok(saved)
    }

    /// Soft-delete a session.
    ///
    /// With `owner` set, only the instructor of the session may delete it.
    pub async fn soft_delete(&self, id: Uuid, owner: Option<Uuid>) -> Result<(), DomainError> {
        let mut session = match self.sessions.find_by_id(id).await? {
            Some(session) if !session.is_deleted => session,
            _ => return Err(DomainError::not_found("Session", id)),
        };

        if let Some(owner) = owner {
            if session.instructor_id != Some(owner) {
                return Err(DomainError::Unauthorized);
            }
        }

        session.is_deleted = true;
        self.sessions.save(session).await?;
        tracing::info!(session_id = %id, "Session deleted");
        Ok(())
    }

    async fn filter_category(&self, category: &str) -> Result<Vec<SessionDetails>, DomainError> {
        Ok(self
            .sessions
            .list_active()
            .await?
            .into_iter()
            .filter(|d| d.session.is_in_category(category))
            .collect())
    }
}
