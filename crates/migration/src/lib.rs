pub use sea_orm_migration::prelude::*;

mod m20260823_000001_users_and_sessions;
mod m20260823_000002_organizations;
mod m20260823_000003_course_tables;
mod m20260823_000004_blocked_emails;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260823_000001_users_and_sessions::Migration),
            Box::new(m20260823_000002_organizations::Migration),
            Box::new(m20260823_000003_course_tables::Migration),
            Box::new(m20260823_000004_blocked_emails::Migration),
        ]
    }
}
