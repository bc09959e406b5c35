//! Session entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "sessions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub category: String,
    pub max_participants: i32,
    pub instructor_id: Option<Uuid>,
    pub start_time: DateTimeWithTimeZone,
    pub end_time: DateTimeWithTimeZone,
    pub is_deleted: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::InstructorId",
        to = "super::user::Column::Id",
        on_delete = "SetNull"
    )]
    Instructor,
    #[sea_orm(has_many = "super::booking::Entity")]
    Bookings,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Instructor.def()
    }
}

impl Related<super::booking::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bookings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for gym_core::domain::Session {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            category: model.category,
            max_participants: model.max_participants,
            instructor_id: model.instructor_id,
            start_time: model.start_time.into(),
            end_time: model.end_time.into(),
            is_deleted: model.is_deleted,
        }
    }
}

impl From<gym_core::domain::Session> for ActiveModel {
    fn from(session: gym_core::domain::Session) -> Self {
        Self {
            id: Set(session.id),
            title: Set(session.title),
            description: Set(session.description),
            category: Set(session.category),
            max_participants: Set(session.max_participants),
            instructor_id: Set(session.instructor_id),
            start_time: Set(session.start_time.into()),
            end_time: Set(session.end_time.into()),
            is_deleted: Set(session.is_deleted),
        }
    }
}
