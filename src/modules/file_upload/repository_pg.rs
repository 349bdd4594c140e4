use std::sync::Arc;
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{
    api::error,
    modules::file_upload::{model::NewFile, repository::FileRepository, schema::FileEntity},
};

#[derive(Clone)]
pub struct FilePgRepository {
    pool: sqlx::PgPool,
    schema: Arc<OnceCell<()>>,
}

impl FilePgRepository {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool, schema: Arc::new(OnceCell::new()) }
    }

    /// Applies pending migrations once per repository. A failed attempt is retried on
    /// the next query, so a database that comes up after startup still gets its schema.
    async fn pool(&self) -> Result<&sqlx::PgPool, error::SystemError> {
        self.schema
            .get_or_try_init(|| async {
                sqlx::migrate!("./migrations").run(&self.pool).await?;
                log::info!("Database schema is up to date");
                Ok::<_, error::SystemError>(())
            })
            .await?;
        Ok(&self.pool)
    }

    #[cfg(test)]
    pub fn schema_ready(&self) -> bool {
        self.schema.initialized()
    }
}

#[async_trait::async_trait]
impl FileRepository for FilePgRepository {
    async fn create(&self, file: &NewFile) -> Result<FileEntity, error::SystemError> {
        let pool = self.pool().await?;
        let id = Uuid::now_v7();
        let entity = sqlx::query_as::<_, FileEntity>(
            r#"
            INSERT INTO files (id, original_name, stored_name, stored_path, size, mime_type)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&file.original_name)
        .bind(&file.stored_name)
        .bind(&file.stored_path)
        .bind(file.size)
        .bind(&file.mime_type)
        .fetch_one(pool)
        .await?;

        Ok(entity)
    }

    async fn find_all(&self) -> Result<Vec<FileEntity>, error::SystemError> {
        let pool = self.pool().await?;
        let files = sqlx::query_as::<_, FileEntity>(
            r#"
            SELECT * FROM files ORDER BY created_at, id
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(files)
    }
}
