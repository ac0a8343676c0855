use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Browser/API session.
///
/// The opaque token travels in the `sessionid` cookie or as a bearer header.
/// Expired rows are treated as absent by the auth layer.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sessions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub token: String,

    pub user_id: i32,

    /// Organization the UI is currently operating on, if the user picked one.
    pub active_organization_id: Option<i32>,

    /// Unix timestamp (seconds).
    pub created_at: i64,

    /// Unix timestamp (seconds).
    pub expires_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
