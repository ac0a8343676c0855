use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Organizations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Organizations::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Organizations::Name).string().not_null())
                    .col(ColumnDef::new(Organizations::Description).text())
                    .col(ColumnDef::new(Organizations::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Organizations::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(OrganizationUsers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OrganizationUsers::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(OrganizationUsers::UserId).integer().not_null())
                    .col(
                        ColumnDef::new(OrganizationUsers::OrganizationId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(OrganizationUsers::Role).string().not_null())
                    .col(
                        ColumnDef::new(OrganizationUsers::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_organization_users_user_id")
                            .from(OrganizationUsers::Table, OrganizationUsers::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_organization_users_org_id")
                            .from(OrganizationUsers::Table, OrganizationUsers::OrganizationId)
                            .to(Organizations::Table, Organizations::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One membership row per user per organization.
        manager
            .create_index(
                Index::create()
                    .name("idx_organization_users_user_org")
                    .table(OrganizationUsers::Table)
                    .col(OrganizationUsers::UserId)
                    .col(OrganizationUsers::OrganizationId)
                    .unique()
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_organization_users_org_id")
                    .table(OrganizationUsers::Table)
                    .col(OrganizationUsers::OrganizationId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse dependency order.
        manager
            .drop_table(Table::drop().table(OrganizationUsers::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Organizations::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Organizations {
    Table,
    Id,
    Name,
    Description,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum OrganizationUsers {
    Table,
    Id,
    UserId,
    OrganizationId,
    Role,
    CreatedAt,
}
