use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ImapConnections::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ImapConnections::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ImapConnections::OrganizationId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ImapConnections::Server).string().not_null())
                    .col(ColumnDef::new(ImapConnections::Port).integer().not_null())
                    .col(ColumnDef::new(ImapConnections::Email).string().not_null())
                    .col(ColumnDef::new(ImapConnections::Password).string().not_null())
                    .col(
                        ColumnDef::new(ImapConnections::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ImapConnections::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_imap_connections_org_id")
                            .from(ImapConnections::Table, ImapConnections::OrganizationId)
                            .to(Organizations::Table, Organizations::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_imap_connections_org_id")
                    .table(ImapConnections::Table)
                    .col(ImapConnections::OrganizationId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Courses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Courses::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Courses::OrganizationId).integer().not_null())
                    .col(ColumnDef::new(Courses::Title).string().not_null())
                    .col(ColumnDef::new(Courses::Slug).string().not_null())
                    .col(ColumnDef::new(Courses::Description).text())
                    .col(
                        ColumnDef::new(Courses::Enabled)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Courses::ImapConnectionId).integer())
                    .col(ColumnDef::new(Courses::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Courses::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_courses_org_id")
                            .from(Courses::Table, Courses::OrganizationId)
                            .to(Organizations::Table, Organizations::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_courses_imap_connection_id")
                            .from(Courses::Table, Courses::ImapConnectionId)
                            .to(ImapConnections::Table, ImapConnections::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Slugs are addresses; they repeat across organizations but not inside one.
        manager
            .create_index(
                Index::create()
                    .name("idx_courses_org_slug")
                    .table(Courses::Table)
                    .col(Courses::OrganizationId)
                    .col(Courses::Slug)
                    .unique()
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_courses_org_id")
                    .table(Courses::Table)
                    .col(Courses::OrganizationId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Lessons::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Lessons::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Lessons::Title).string().not_null())
                    .col(ColumnDef::new(Lessons::Content).text().not_null())
                    .col(
                        ColumnDef::new(Lessons::IsPublished)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Lessons::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Lessons::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Quizzes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Quizzes::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Quizzes::Title).string().not_null())
                    .col(ColumnDef::new(Quizzes::RequiredScore).integer().not_null())
                    .col(ColumnDef::new(Quizzes::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Quizzes::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CourseContents::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CourseContents::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CourseContents::CourseId).integer().not_null())
                    .col(ColumnDef::new(CourseContents::Priority).integer().not_null())
                    .col(ColumnDef::new(CourseContents::Kind).string().not_null())
                    .col(ColumnDef::new(CourseContents::LessonId).integer())
                    .col(ColumnDef::new(CourseContents::QuizId).integer())
                    .col(
                        ColumnDef::new(CourseContents::WaitingPeriod)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_course_contents_course_id")
                            .from(CourseContents::Table, CourseContents::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_course_contents_lesson_id")
                            .from(CourseContents::Table, CourseContents::LessonId)
                            .to(Lessons::Table, Lessons::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_course_contents_quiz_id")
                            .from(CourseContents::Table, CourseContents::QuizId)
                            .to(Quizzes::Table, Quizzes::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_course_contents_course_id")
                    .table(CourseContents::Table)
                    .col(CourseContents::CourseId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse dependency order.
        manager
            .drop_table(Table::drop().table(CourseContents::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Quizzes::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Lessons::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Courses::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(ImapConnections::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Organizations {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum ImapConnections {
    Table,
    Id,
    OrganizationId,
    Server,
    Port,
    Email,
    Password,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Courses {
    Table,
    Id,
    OrganizationId,
    Title,
    Slug,
    Description,
    Enabled,
    ImapConnectionId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Lessons {
    Table,
    Id,
    Title,
    Content,
    IsPublished,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Quizzes {
    Table,
    Id,
    Title,
    RequiredScore,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum CourseContents {
    Table,
    Id,
    CourseId,
    Priority,
    Kind,
    LessonId,
    QuizId,
    WaitingPeriod,
}
