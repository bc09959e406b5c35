//! Membership purchases made through the public checkout.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "membership_purchases")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub membership_type_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub address: String,
    pub phone: String,
    pub start_date: Date,
    pub purchase_date: Date,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::membership_type::Entity",
        from = "Column::MembershipTypeId",
        to = "super::membership_type::Column::Id"
    )]
    MembershipType,
}

impl Related<super::membership_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MembershipType.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for gym_core::domain::MembershipPurchase {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            membership_type_id: model.membership_type_id,
            first_name: model.first_name,
            last_name: model.last_name,
            email: model.email,
            address: model.address,
            phone: model.phone,
            start_date: model.start_date,
            purchase_date: model.purchase_date,
        }
    }
}

impl From<gym_core::domain::MembershipPurchase> for ActiveModel {
    fn from(purchase: gym_core::domain::MembershipPurchase) -> Self {
        Self {
            id: Set(purchase.id),
            membership_type_id: Set(purchase.membership_type_id),
            first_name: Set(purchase.first_name),
            last_name: Set(purchase.last_name),
            email: Set(purchase.email),
            address: Set(purchase.address),
            phone: Set(purchase.phone),
            start_date: Set(purchase.start_date),
            purchase_date: Set(purchase.purchase_date),
        }
    }
}
