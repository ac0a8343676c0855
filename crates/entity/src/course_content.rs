use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, ConnectionTrait};
use serde::{Deserialize, Serialize};

/// Ordered course building block.
///
/// Each row points at exactly one lesson or one quiz; which one must agree
/// with `kind`. The mismatch cases are rejected in `before_save` so every
/// write path goes through the same check.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "course_contents")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub course_id: i32,

    /// Position within the course, lowest first.
    pub priority: i32,

    /// 'lesson' or 'quiz'.
    pub kind: String,

    pub lesson_id: Option<i32>,
    pub quiz_id: Option<i32>,

    /// Days to wait after the previous step before this one is sent.
    pub waiting_period: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

fn current<T>(value: &ActiveValue<T>) -> Option<T>
where
    T: Clone + Into<sea_orm::Value>,
{
    match value {
        ActiveValue::Set(v) | ActiveValue::Unchanged(v) => Some(v.clone()),
        ActiveValue::NotSet => None,
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(self, _db: &C, _insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let Some(kind) = current(&self.kind) else {
            return Ok(self);
        };

        let lesson = current(&self.lesson_id).flatten();
        let quiz = current(&self.quiz_id).flatten();

        match ContentKind::parse(&kind) {
            Some(ContentKind::Lesson) => {
                if lesson.is_none() || quiz.is_some() {
                    return Err(DbErr::Custom(
                        "Content of kind 'lesson' must reference a lesson and no quiz.".into(),
                    ));
                }
            }
            Some(ContentKind::Quiz) => {
                if quiz.is_none() || lesson.is_some() {
                    return Err(DbErr::Custom(
                        "Content of kind 'quiz' must reference a quiz and no lesson.".into(),
                    ));
                }
            }
            None => {
                return Err(DbErr::Custom(format!("Invalid content kind '{kind}'.")));
            }
        }

        Ok(self)
    }
}

/// What a course content row points at.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Lesson,
    Quiz,
}

impl ContentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lesson => "lesson",
            Self::Quiz => "quiz",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "lesson" => Some(Self::Lesson),
            "quiz" => Some(Self::Quiz),
            _ => None,
        }
    }
}
