use actix_web::web;

use crate::api::{error, success};
use crate::modules::file_upload::{
    repository::FileRepository, schema::FileResponse, service::FileUploadService,
    storage::StoredUpload,
};

/// Upload file handler
pub async fn upload_file<R>(
    upload: StoredUpload,
    service: web::Data<FileUploadService<R>>,
) -> Result<success::Success<FileResponse>, error::Error>
where
    R: FileRepository + Send + Sync + 'static,
{
    let file = service.record_upload(upload.into_inner()).await?;
    Ok(success::Success::created(Some(file)).message("File uploaded successfully"))
}

/// List file metadata handler
pub async fn list_files<R>(
    service: web::Data<FileUploadService<R>>,
) -> Result<success::Success<Vec<FileResponse>>, error::Error>
where
    R: FileRepository + Send + Sync + 'static,
{
    let files = service.list_files().await?;
    Ok(success::Success::ok(Some(files)).raw())
}
