use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Platform account.
///
/// Superadmins act across every organization; everyone else gets their scope
/// from `organization_users` rows.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub username: String,

    pub email: String,

    /// `pbkdf2-sha256$<iterations>$<salt-hex>$<hash-hex>`.
    pub password_hash: String,

    pub is_superadmin: bool,

    pub enabled: bool,

    /// Unix timestamp (seconds).
    pub created_at: i64,

    /// Unix timestamp (seconds).
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
