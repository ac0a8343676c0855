use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Email course.
///
/// The slug is unique within its organization and fixed once created; the API
/// layer rejects attempts to change it.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "courses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub organization_id: i32,

    pub title: String,

    pub slug: String,

    pub description: Option<String>,

    /// Disabled courses keep their data but are skipped by delivery.
    pub enabled: bool,

    /// Mailbox the course ingests replies from (nullable).
    pub imap_connection_id: Option<i32>,

    /// Unix timestamp (seconds).
    pub created_at: i64,

    /// Unix timestamp (seconds).
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
