use sea_orm_migration::prelude::*;

use super::m20251126_000001_create_accounts::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

const SEED_MEMBERSHIP_TYPES: &str = r#"
INSERT INTO membership_types (id, name, price, description, image_url) VALUES
    (1, 'Adult Membership', 399.00, 'Unlimited access to all classes and gym facilities.', '/Gym_Tem/img/memberships/adult.jpg'),
    (2, 'Student Membership', 299.00, 'Discounted membership for students with valid ID.', '/Gym_Tem/img/memberships/student.jpg'),
    (3, 'Senior Membership', 249.00, 'Full gym access with flexible hours for seniors aged 65+.', '/Gym_Tem/img/memberships/senior.jpg')
ON CONFLICT (id) DO NOTHING
"#;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MembershipTypes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MembershipTypes::Id)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MembershipTypes::Name).string_len(100).not_null())
                    .col(
                        ColumnDef::new(MembershipTypes::Price)
                            .decimal_len(10, 2)
                            .not_null(),
                    )
                    .col(ColumnDef::new(MembershipTypes::Description).string_len(500).null())
                    .col(ColumnDef::new(MembershipTypes::ImageUrl).string_len(300).null())
                    .to_owned(),
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(SEED_MEMBERSHIP_TYPES)
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name("fk_users_membership_type")
                    .from(Users::Table, Users::MembershipTypeId)
                    .to(MembershipTypes::Table, MembershipTypes::Id)
                    .on_delete(ForeignKeyAction::SetNull)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MembershipPurchases::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MembershipPurchases::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(MembershipPurchases::MembershipTypeId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(MembershipPurchases::FirstName).string_len(100).not_null())
                    .col(ColumnDef::new(MembershipPurchases::LastName).string_len(100).not_null())
                    .col(ColumnDef::new(MembershipPurchases::Email).string_len(256).not_null())
                    .col(ColumnDef::new(MembershipPurchases::Address).string_len(200).not_null())
                    .col(ColumnDef::new(MembershipPurchases::Phone).string_len(50).not_null())
                    .col(ColumnDef::new(MembershipPurchases::StartDate).date().not_null())
                    .col(ColumnDef::new(MembershipPurchases::PurchaseDate).date().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_membership_purchases_type")
                            .from(MembershipPurchases::Table, MembershipPurchases::MembershipTypeId)
                            .to(MembershipTypes::Table, MembershipTypes::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_membership_purchases_email_start")
                    .table(MembershipPurchases::Table)
                    .col(MembershipPurchases::Email)
                    .col(MembershipPurchases::StartDate)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MembershipPurchases::Table).to_owned())
            .await?;
        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name("fk_users_membership_type")
                    .table(Users::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(MembershipTypes::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum MembershipTypes {
    Table,
    Id,
    Name,
    Price,
    Description,
    ImageUrl,
}

#[derive(DeriveIden)]
enum MembershipPurchases {
    Table,
    Id,
    MembershipTypeId,
    FirstName,
    LastName,
    Email,
    Address,
    Phone,
    StartDate,
    PurchaseDate,
}
