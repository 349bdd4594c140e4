use crate::{
    api::error,
    modules::file_upload::{model::NewFile, schema::FileEntity},
};

#[async_trait::async_trait]
pub trait FileRepository {
    async fn create(&self, file: &NewFile) -> Result<FileEntity, error::SystemError>;

    /// Every record, oldest first.
    async fn find_all(&self) -> Result<Vec<FileEntity>, error::SystemError>;
}
