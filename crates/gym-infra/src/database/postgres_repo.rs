//! PostgreSQL repository implementations for accounts and memberships.

use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::sea_query::{Expr, Func, LikeExpr, Query};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use gym_core::domain::{MembershipPurchase, MembershipType, Role, User};
use gym_core::error::RepoError;
use gym_core::ports::{MembershipRepository, UserRepository, UserSearch};

use super::entity::membership_purchase::{self, Entity as PurchaseEntity};
use super::entity::membership_type::{self, Entity as MembershipTypeEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::entity::user_role::{self, Entity as UserRoleEntity};
use super::postgres_base::{PostgresBaseRepository, db_err};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL membership repository (plans and purchases).
pub type PostgresMembershipRepository = PostgresBaseRepository<PurchaseEntity>;

/// Mask an email address for logging.
fn mask_email(email: &str) -> String {
    match email.find('@') {
        Some(at_pos) => {
            let (local, domain) = email.split_at(at_pos);
            let masked_local = match local.chars().next() {
                Some(first) if local.len() > 1 => format!("{}***", first),
                _ => "***".to_string(),
            };
            format!("{}{}", masked_local, domain)
        }
        None => "***".to_string(),
    }
}

/// `%term%` in lower case, with LIKE wildcards in the term matched literally.
fn contains_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// `user_id IN (SELECT user_id FROM user_roles WHERE role IN (...))`
fn holds_any_role(roles: &[Role]) -> sea_orm::sea_query::SimpleExpr {
    let names: Vec<&str> = roles.iter().map(Role::as_str).collect();
    user::Column::Id.in_subquery(
        Query::select()
            .column(user_role::Column::UserId)
            .from(UserRoleEntity)
            .and_where(user_role::Column::Role.is_in(names))
            .to_owned(),
    )
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let result = UserEntity::find()
            .filter(
                Expr::expr(Func::lower(Expr::col(user::Column::Email)))
                    .eq(email.trim().to_lowercase()),
            )
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.map(Into::into))
    }

    async fn roles_of(&self, user_id: Uuid) -> Result<Vec<Role>, RepoError> {
        let rows = UserRoleEntity::find()
            .filter(user_role::Column::UserId.eq(user_id))
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let mut roles: Vec<Role> = rows
            .into_iter()
            .filter_map(|row| match row.role.parse() {
                Ok(role) => Some(role),
                Err(_) => {
                    tracing::warn!(%user_id, role = %row.role, "Ignoring unknown role");
                    None
                }
            })
            .collect();
        roles.sort();
        Ok(roles)
    }

    async fn set_roles(&self, user_id: Uuid, roles: &[Role]) -> Result<(), RepoError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        UserRoleEntity::delete_many()
            .filter(user_role::Column::UserId.eq(user_id))
            .exec(&txn)
            .await
            .map_err(db_err)?;

        if !roles.is_empty() {
            let rows = roles.iter().map(|role| user_role::ActiveModel {
                user_id: Set(user_id),
                role: Set(role.as_str().to_string()),
            });
            UserRoleEntity::insert_many(rows)
                .exec(&txn)
                .await
                .map_err(db_err)?;
        }

        txn.commit().await.map_err(db_err)
    }

    async fn count_all(&self) -> Result<u64, RepoError> {
        UserEntity::find().count(&self.db).await.map_err(db_err)
    }

    async fn count_in_role(&self, role: Role) -> Result<u64, RepoError> {
        UserRoleEntity::find()
            .filter(user_role::Column::Role.eq(role.as_str()))
            .count(&self.db)
            .await
            .map_err(db_err)
    }

    async fn search(&self, filter: &UserSearch) -> Result<Vec<User>, RepoError> {
        let mut query = UserEntity::find();

        if !filter.roles.is_empty() {
            query = query.filter(holds_any_role(&filter.roles));
        }

        if let Some(term) = filter.term.as_deref() {
            let pattern = contains_pattern(term);
            let like = || LikeExpr::new(pattern.clone()).escape('\\');
            let mut any = Condition::any()
                .add(Expr::expr(Func::lower(Expr::col(user::Column::FirstName))).like(like()))
                .add(Expr::expr(Func::lower(Expr::col(user::Column::LastName))).like(like()));

            if let Ok(id) = Uuid::parse_str(term) {
                any = any.add(user::Column::Id.eq(id));
            }

            let roles = Role::matching(term);
            if !roles.is_empty() {
                any = any.add(holds_any_role(&roles));
            }
            query = query.filter(any);
        }

        let result = query
            .order_by_desc(user::Column::CreatedAt)
            .limit(filter.limit)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl MembershipRepository for PostgresMembershipRepository {
    async fn list_types(&self) -> Result<Vec<MembershipType>, RepoError> {
        let result = MembershipTypeEntity::find()
            .order_by_asc(membership_type::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_type(&self, id: i32) -> Result<Option<MembershipType>, RepoError> {
        let result = MembershipTypeEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.map(Into::into))
    }

    async fn purchase_exists(&self, email: &str, start_date: NaiveDate) -> Result<bool, RepoError> {
        let count = PurchaseEntity::find()
            .filter(
                Expr::expr(Func::lower(Expr::col(membership_purchase::Column::Email)))
                    .eq(email.to_lowercase()),
            )
            .filter(membership_purchase::Column::StartDate.eq(start_date))
            .count(&self.db)
            .await
            .map_err(db_err)?;

        Ok(count > 0)
    }

    async fn save_purchase(
        &self,
        purchase: MembershipPurchase,
    ) -> Result<MembershipPurchase, RepoError> {
        let active: membership_purchase::ActiveModel = purchase.into();
        let model = active.insert(&self.db).await.map_err(db_err)?;
        Ok(model.into())
    }
}
