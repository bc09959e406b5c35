//! PostgreSQL repositories for sessions and bookings.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};
use uuid::Uuid;

use gym_core::domain::{BookedSession, Booking, Session, SessionDetails};
use gym_core::error::RepoError;
use gym_core::ports::{BookingRepository, SessionRepository};

use super::entity::booking::{self, Entity as BookingEntity};
use super::entity::session::{self, Entity as SessionEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, db_err};

/// PostgreSQL session repository.
pub type PostgresSessionRepository = PostgresBaseRepository<SessionEntity>;

/// PostgreSQL booking repository.
pub type PostgresBookingRepository = PostgresBaseRepository<BookingEntity>;

/// Attach booking counts and instructor names to session rows, preserving order.
async fn hydrate<C>(db: &C, sessions: Vec<session::Model>) -> Result<Vec<SessionDetails>, RepoError>
where
    C: ConnectionTrait,
{
    if sessions.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<Uuid> = sessions.iter().map(|s| s.id).collect();
    let counts: HashMap<Uuid, i64> = BookingEntity::find()
        .select_only()
        .column(booking::Column::SessionId)
        .column_as(Expr::col(booking::Column::Id).count(), "booking_count")
        .filter(booking::Column::SessionId.is_in(ids))
        .group_by(booking::Column::SessionId)
        .into_tuple::<(Uuid, i64)>()
        .all(db)
        .await
        .map_err(db_err)?
        .into_iter()
        .collect();

    let instructor_ids: Vec<Uuid> = sessions.iter().filter_map(|s| s.instructor_id).collect();
    let names: HashMap<Uuid, String> = if instructor_ids.is_empty() {
        HashMap::new()
    } else {
        UserEntity::find()
            .select_only()
            .column(user::Column::Id)
            .column(user::Column::UserName)
            .filter(user::Column::Id.is_in(instructor_ids))
            .into_tuple::<(Uuid, String)>()
            .all(db)
            .await
            .map_err(db_err)?
            .into_iter()
            .collect()
    };

    Ok(sessions
        .into_iter()
        .map(|model| {
            let current_bookings = counts.get(&model.id).copied().unwrap_or(0).max(0) as u64;
            let instructor_user_name = model.instructor_id.and_then(|id| names.get(&id).cloned());
            SessionDetails {
                session: model.into(),
                instructor_user_name,
                current_bookings,
            }
        })
        .collect())
}

#[async_trait]
impl SessionRepository for PostgresSessionRepository {
    async fn find_details(&self, id: Uuid) -> Result<Option<SessionDetails>, RepoError> {
        let Some(model) = SessionEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
        else {
            return Ok(None);
        };

        Ok(hydrate(&self.db, vec![model]).await?.pop())
    }

    async fn list_active(&self) -> Result<Vec<SessionDetails>, RepoError> {
        let models = SessionEntity::find()
            .filter(session::Column::IsDeleted.eq(false))
            .order_by_asc(session::Column::StartTime)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        hydrate(&self.db, models).await
    }

    async fn by_instructor_between(
        &self,
        instructor_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<SessionDetails>, RepoError> {
        let models = SessionEntity::find()
            .filter(session::Column::InstructorId.eq(instructor_id))
            .filter(session::Column::IsDeleted.eq(false))
            .filter(session::Column::StartTime.gte(from))
            .filter(session::Column::StartTime.lt(to))
            .order_by_asc(session::Column::StartTime)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        hydrate(&self.db, models).await
    }

    async fn by_instructor(&self, instructor_id: Uuid) -> Result<Vec<Session>, RepoError> {
        let models = SessionEntity::find()
            .filter(session::Column::InstructorId.eq(instructor_id))
            .order_by_asc(session::Column::StartTime)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn has_overlap(
        &self,
        instructor_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        exclude: Option<Uuid>,
    ) -> Result<bool, RepoError> {
        let mut query = SessionEntity::find()
            .filter(session::Column::InstructorId.eq(instructor_id))
            .filter(session::Column::IsDeleted.eq(false))
            .filter(session::Column::StartTime.lt(end))
            .filter(session::Column::EndTime.gt(start));

        if let Some(id) = exclude {
            query = query.filter(session::Column::Id.ne(id));
        }

        let count = query.count(&self.db).await.map_err(db_err)?;
        Ok(count > 0)
    }
}

#[async_trait]
impl BookingRepository for PostgresBookingRepository {
    async fn find(&self, user_id: Uuid, session_id: Uuid) -> Result<Option<Booking>, RepoError> {
        let result = BookingEntity::find()
            .filter(booking::Column::UserId.eq(user_id))
            .filter(booking::Column::SessionId.eq(session_id))
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.map(Into::into))
    }

    async fn exists(&self, user_id: Uuid, session_id: Uuid) -> Result<bool, RepoError> {
        let count = BookingEntity::find()
            .filter(booking::Column::UserId.eq(user_id))
            .filter(booking::Column::SessionId.eq(session_id))
            .count(&self.db)
            .await
            .map_err(db_err)?;

        Ok(count > 0)
    }

    async fn count_for_session(&self, session_id: Uuid) -> Result<u64, RepoError> {
        BookingEntity::find()
            .filter(booking::Column::SessionId.eq(session_id))
            .count(&self.db)
            .await
            .map_err(db_err)
    }

    async fn for_user(&self, user_id: Uuid) -> Result<Vec<BookedSession>, RepoError> {
        let rows = BookingEntity::find()
            .filter(booking::Column::UserId.eq(user_id))
            .find_also_related(SessionEntity)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let (bookings, sessions): (Vec<_>, Vec<_>) = rows
            .into_iter()
            .filter_map(|(booking, session)| session.map(|s| (booking, s)))
            .unzip();

        let details = hydrate(&self.db, sessions).await?;
        let mut booked: Vec<BookedSession> = bookings
            .into_iter()
            .zip(details)
            .map(|(booking, session)| BookedSession {
                booking: booking.into(),
                session,
            })
            .collect();
        booked.sort_by_key(|b| b.session.session.start_time);
        Ok(booked)
    }

    async fn create_within_capacity(
        &self,
        booking: Booking,
        capacity: i32,
    ) -> Result<Booking, RepoError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        // Row lock on the session serialises concurrent bookings for it.
        let session = SessionEntity::find_by_id(booking.session_id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or_else(|| RepoError::Query("session row missing".to_string()))?;

        let current = session
            .find_related(BookingEntity)
            .count(&txn)
            .await
            .map_err(db_err)?;

        if current >= capacity.max(0) as u64 {
            return Err(RepoError::CapacityReached { current, capacity });
        }

        let active: booking::ActiveModel = booking.into();
        let model = active.insert(&txn).await.map_err(db_err)?;
        txn.commit().await.map_err(db_err)?;

        Ok(model.into())
    }

    async fn delete(&self, user_id: Uuid, session_id: Uuid) -> Result<bool, RepoError> {
        let result = BookingEntity::delete_many()
            .filter(booking::Column::UserId.eq(user_id))
            .filter(booking::Column::SessionId.eq(session_id))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected > 0)
    }
}
