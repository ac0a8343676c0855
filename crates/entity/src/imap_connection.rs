use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Stored IMAP mailbox credentials.
///
/// The password is write-only as far as the API is concerned; response bodies
/// are built field by field and never include it.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "imap_connections")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub organization_id: i32,

    pub server: String,

    pub port: i32,

    pub email: String,

    pub password: String,

    /// Unix timestamp (seconds).
    pub created_at: i64,

    /// Unix timestamp (seconds).
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
