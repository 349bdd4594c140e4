use std::sync::Arc;

use crate::api::error;
use crate::modules::file_upload::{
    model::{NewFile, StoredFile},
    repository::FileRepository,
    schema::FileResponse,
    storage::DiskStorage,
};

#[derive(Clone)]
pub struct FileUploadService<R>
where
    R: FileRepository + Send + Sync,
{
    file_repo: Arc<R>,
    storage: DiskStorage,
}

impl<R> FileUploadService<R>
where
    R: FileRepository + Send + Sync,
{
    pub fn new(file_repo: Arc<R>, storage: DiskStorage) -> Self {
        log::info!("FileUploadService initialized for {}", storage.upload_dir().display());
        Self { file_repo, storage }
    }

    /// Persist metadata for a file the storage step already wrote.
    /// The file is removed again when the insert fails.
    pub async fn record_upload(
        &self,
        stored: StoredFile,
    ) -> Result<FileResponse, error::SystemError> {
        let new_file = NewFile::from(&stored);

        match self.file_repo.create(&new_file).await {
            Ok(entity) => Ok(FileResponse::from(entity)),
            Err(e) => {
                log::error!("Saving metadata for {} failed", stored.stored_name);
                self.storage.remove(&stored).await;
                Err(e)
            }
        }
    }

    pub async fn list_files(&self) -> Result<Vec<FileResponse>, error::SystemError> {
        let files = self.file_repo.find_all().await?;
        Ok(files.into_iter().map(FileResponse::from).collect())
    }
}
