//! Learning sample operations.

use crate::orm::learning_samples::{self, SourceType};
use chrono::Utc;
use sea_orm::{entity::*, query::*, DatabaseConnection, DbErr};
use uuid::Uuid;

pub struct NewSample {
    pub source_type: SourceType,
    pub source_url: Option<String>,
    pub file_name: Option<String>,
    pub raw_text: String,
}

/// Insert a raw text sample. Exactly one of sourceUrl/fileName is kept,
/// matching the source type; the CHECK constraints reject anything else,
/// including rawText outside the 200-200000 char bounds.
pub async fn create_learning_sample(
    db: &DatabaseConnection,
    user_id: i32,
    category_id: &str,
    sample: NewSample,
) -> Result<learning_samples::Model, DbErr> {
    let source_url = match sample.source_type {
        SourceType::Url => sample.source_url,
        SourceType::File => None,
    };
    let file_name = match sample.source_type {
        SourceType::File => sample.file_name,
        SourceType::Url => None,
    };

    learning_samples::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        user_id: Set(user_id),
        category_id: Set(category_id.to_owned()),
        source_type: Set(sample.source_type),
        source_url: Set(source_url),
        file_name: Set(file_name),
        raw_text: Set(sample.raw_text),
        created_at: Set(Utc::now().timestamp_millis()),
    }
    .insert(db)
    .await
}

pub async fn list_samples_for_category(
    db: &DatabaseConnection,
    user_id: i32,
    category_id: &str,
) -> Result<Vec<learning_samples::Model>, DbErr> {
    learning_samples::Entity::find()
        .filter(learning_samples::Column::UserId.eq(user_id))
        .filter(learning_samples::Column::CategoryId.eq(category_id))
        .order_by_desc(learning_samples::Column::CreatedAt)
        .all(db)
        .await
}

pub async fn count_samples_for_category(
    db: &DatabaseConnection,
    user_id: i32,
    category_id: &str,
) -> Result<usize, DbErr> {
    learning_samples::Entity::find()
        .filter(learning_samples::Column::UserId.eq(user_id))
        .filter(learning_samples::Column::CategoryId.eq(category_id))
        .count(db)
        .await
}

/// Returns false when nothing matched.
pub async fn delete_learning_sample(
    db: &DatabaseConnection,
    user_id: i32,
    sample_id: &str,
) -> Result<bool, DbErr> {
    let res = learning_samples::Entity::delete_many()
        .filter(learning_samples::Column::Id.eq(sample_id))
        .filter(learning_samples::Column::UserId.eq(user_id))
        .exec(db)
        .await?;

    Ok(res.rows_affected > 0)
}
