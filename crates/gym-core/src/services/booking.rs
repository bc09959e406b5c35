//! Session booking: validation, reservation and cancellation.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::{BookedSession, Booking, SessionDetails};
use crate::error::{DomainError, RepoError};
use crate::ports::{BookingRepository, SessionRepository, UserRepository};

pub const BOOKING_CONFIRMED: &str = "Booking successful!";
pub const BOOKING_CANCELLED: &str = "Booking cancelled!";

/// Why a booking request was refused.
///
/// Checks run in declaration order and the first failure wins.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookingRejection {
    #[error("User not found")]
    UserNotFound,

    #[error("Session not found")]
    SessionNotFound,

    #[error("Booking failed, session is no longer available")]
    SessionUnavailable,

    #[error("The session is full ({booked}/{capacity})")]
    SessionFull { booked: u64, capacity: i32 },

    #[error("You have already booked this session")]
    AlreadyBooked,
}

#[derive(Debug, Error)]
pub enum BookingError {
    #[error(transparent)]
    Rejected(#[from] BookingRejection),

    #[error("Booking failed - please try again later")]
    Failed(#[source] RepoError),

    #[error("Cancellation failed - please try again later")]
    CancellationFailed,
}

impl From<RepoError> for BookingError {
    fn from(err: RepoError) -> Self {
        BookingError::Failed(err)
    }
}

/// Booking workflows for members.
#[derive(Clone)]
pub struct BookingService {
    users: Arc<dyn UserRepository>,
    sessions: Arc<dyn SessionRepository>,
    bookings: Arc<dyn BookingRepository>,
}

impl BookingService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        sessions: Arc<dyn SessionRepository>,
        bookings: Arc<dyn BookingRepository>,
    ) -> Self {
        Self {
            users,
            sessions,
            bookings,
        }
    }

    /// Check whether `user_id` may book `session_id` right now.
    pub async fn validate(
        &self,
        user_id: Uuid,
        session_id: Uuid,
    ) -> Result<SessionDetails, BookingError> {
        let user = self.users.find_by_id(user_id).await?;
        if !user.is_some_and(|u| u.is_active()) {
            return Err(BookingRejection::UserNotFound.into());
        }

        let details = match self.sessions.find_details(session_id).await? {
            Some(details) if !details.session.is_deleted => details,
            _ => return Err(BookingRejection::SessionNotFound.into()),
        };

        if details.session.has_started(Utc::now()) {
            return Err(BookingRejection::SessionUnavailable.into());
        }

        if details.is_full() {
            return Err(BookingRejection::SessionFull {
                booked: details.current_bookings,
                capacity: details.session.max_participants,
            }
            .into());
        }

        if self.bookings.exists(user_id, session_id).await? {
            return Err(BookingRejection::AlreadyBooked.into());
        }

        Ok(details)
    }

    /// Validate and reserve a place.
    pub async fn book(&self, user_id: Uuid, session_id: Uuid) -> Result<Booking, BookingError> {
        let details = self.validate(user_id, session_id).await?;
        let capacity = details.session.max_participants;

        match self
            .bookings
            .create_within_capacity(Booking::new(user_id, session_id), capacity)
            .await
        {
            Ok(booking) => {
                tracing::info!(%user_id, %session_id, booking_id = %booking.id, "Session booked");
                Ok(booking)
            }
            // Lost a race against a concurrent request for the same pair or the last place.
            Err(RepoError::Constraint(_)) => Err(BookingRejection::AlreadyBooked.into()),
            Err(RepoError::CapacityReached { current, capacity }) => {
                Err(BookingRejection::SessionFull {
                    booked: current,
                    capacity,
                }
                .into())
            }
            Err(e) => {
                tracing::error!(%user_id, %session_id, error = %e, "Failed to store booking");
                Err(BookingError::Failed(e))
            }
        }
    }

    /// Cancel a booking. Rebooking afterwards is allowed.
    pub async fn cancel(&self, user_id: Uuid, session_id: Uuid) -> Result<(), BookingError> {
        match self.bookings.delete(user_id, session_id).await {
            Ok(true) => {
                tracing::info!(%user_id, %session_id, "Booking cancelled");
                Ok(())
            }
            Ok(false) => {
                tracing::debug!(%user_id, %session_id, "No booking to cancel");
                Err(BookingError::CancellationFailed)
            }
            Err(e) => {
                tracing::error!(%user_id, %session_id, error = %e, "Failed to cancel booking");
                Err(BookingError::CancellationFailed)
            }
        }
    }

    pub async fn is_booked(&self, user_id: Uuid, session_id: Uuid) -> Result<bool, DomainError> {
        Ok(self.bookings.exists(user_id, session_id).await?)
    }

    /// The user's bookings, earliest session first.
    pub async fn my_bookings(&self, user_id: Uuid) -> Result<Vec<BookedSession>, DomainError> {
        let mut booked = self.bookings.for_user(user_id).await?;
        booked.sort_by_key(|b| b.session.session.start_time);
        Ok(booked)
    }
}
