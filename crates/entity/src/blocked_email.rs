use std::sync::LazyLock;

use regex::Regex;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, ConnectionTrait};
use serde::{Deserialize, Serialize};

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid regex"));

/// Address excluded from course enrollment and delivery.
///
/// Saving normalizes the address to lowercase, then rejects anything that is
/// not email-shaped or already present.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "blocked_emails")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub email: String,

    /// Unix timestamp (seconds).
    pub created_at: i64,
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.email)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, db: &C, _insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let email = match &self.email {
            ActiveValue::Set(e) | ActiveValue::Unchanged(e) => e.to_lowercase(),
            ActiveValue::NotSet => return Ok(self),
        };

        if !EMAIL_RE.is_match(&email) {
            return Err(DbErr::Custom("Enter a valid email address.".into()));
        }

        let mut dup = Entity::find().filter(Column::Email.eq(email.as_str()));
        match &self.id {
            ActiveValue::Set(id) | ActiveValue::Unchanged(id) => {
                dup = dup.filter(Column::Id.ne(*id));
            }
            ActiveValue::NotSet => {}
        }
        if dup.one(db).await?.is_some() {
            return Err(DbErr::Custom("Email already exists.".into()));
        }

        self.email = ActiveValue::Set(email);
        Ok(self)
    }
}
