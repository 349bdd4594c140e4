use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;

use crate::constants::UPLOADS_URL_PREFIX;

/// File metadata entity from database
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntity {
    pub id: Uuid,
    pub original_name: String,
    pub stored_name: String,
    pub stored_path: String,
    pub size: i64,
    pub mime_type: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileResponse {
    pub id: Uuid,
    pub original_name: String,
    pub stored_name: String,
    pub stored_path: String,
    pub size: i64,
    pub mime_type: String,
    pub url: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<FileEntity> for FileResponse {
    fn from(entity: FileEntity) -> Self {
        let url = format!("{}/{}", UPLOADS_URL_PREFIX, entity.stored_name);
        Self {
            id: entity.id,
            original_name: entity.original_name,
            stored_name: entity.stored_name,
            stored_path: entity.stored_path,
            size: entity.size,
            mime_type: entity.mime_type,
            url,
            created_at: entity.created_at,
        }
    }
}
