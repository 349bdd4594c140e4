use actix_multipart::{Field, Multipart};
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::{Stream, TryStreamExt, future::LocalBoxFuture};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::{fs::OpenOptions, io::AsyncWriteExt};

use crate::api::error;
use crate::constants::{DEFAULT_MIME_TYPE, UPLOAD_FIELD};
use crate::modules::file_upload::model::StoredFile;

const MAX_NAME_ATTEMPTS: usize = 1000;

/// Writes uploaded payloads into one directory under `<millis><ext>` names.
#[derive(Debug, Clone)]
pub struct DiskStorage {
    upload_dir: PathBuf,
}

impl DiskStorage {
    pub fn new(upload_dir: impl Into<PathBuf>) -> Self {
        Self { upload_dir: upload_dir.into() }
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    /// Stream `chunks` to a freshly named file. A partial file is removed on failure.
    pub async fn store<S, E>(
        &self,
        original_name: &str,
        mime_type: Option<String>,
        mut chunks: S,
    ) -> Result<StoredFile, error::SystemError>
    where
        S: Stream<Item = Result<web::Bytes, E>> + Unpin,
        E: std::fmt::Display,
    {
        tokio::fs::create_dir_all(&self.upload_dir).await?;

        let stamp = chrono::Utc::now().timestamp_millis();
        let (stored_name, stored_path, mut file) =
            self.allocate(extension_of(original_name), stamp).await?;

        let written = async {
            let mut size = 0u64;
            while let Some(chunk) = chunks
                .try_next()
                .await
                .map_err(|e| error::SystemError::bad_request(format!("Upload read error: {}", e)))?
            {
                file.write_all(&chunk).await?;
                size += chunk.len() as u64;
            }
            file.flush().await?;
            Ok::<_, error::SystemError>(size)
        }
        .await;
        drop(file);

        match written {
            Ok(size) => {
                log::info!("Stored {} as {} ({} bytes)", original_name, stored_name, size);
                Ok(StoredFile {
                    original_name: original_name.to_string(),
                    stored_name,
                    stored_path,
                    size,
                    mime_type: mime_type.unwrap_or_else(|| guess_mime(original_name)),
                })
            }
            Err(e) => {
                discard(&stored_path).await;
                Err(e)
            }
        }
    }

    pub async fn remove(&self, stored: &StoredFile) {
        discard(&stored.stored_path).await;
    }

    /// Exclusively creates `<stamp><ext>`, stepping the stamp forward while the name is taken.
    async fn allocate(
        &self,
        extension: &str,
        mut stamp: i64,
    ) -> Result<(String, PathBuf, tokio::fs::File), error::SystemError> {
        for _ in 0..MAX_NAME_ATTEMPTS {
            let name = format!("{}{}", stamp, extension);
            let path = self.upload_dir.join(&name);
            match OpenOptions::new().write(true).create_new(true).open(&path).await {
                Ok(file) => return Ok((name, path, file)),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => stamp += 1,
                Err(e) => return Err(e.into()),
            }
        }
        Err(error::SystemError::InternalError("no free file name in upload directory".into()))
    }
}

async fn discard(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        log::warn!("Failed to remove {}: {}", path.display(), e);
    } else {
        log::warn!("Removed orphaned upload {}", path.display());
    }
}

/// Extension of the base name including its dot; `""` for dotfiles and names without one.
pub fn extension_of(original_name: &str) -> &str {
    let base = original_name.rsplit(['/', '\\']).next().unwrap_or(original_name);
    if base == "." || base == ".." {
        return "";
    }
    match base.rfind('.') {
        Some(0) | None => "",
        Some(idx) => &base[idx..],
    }
}

fn guess_mime(original_name: &str) -> String {
    mime_guess::from_path(original_name)
        .first_raw()
        .map(str::to_string)
        .unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string())
}

/// The upload written to disk before the handler runs.
///
/// Only the first part named `file` that carries a filename is stored. Every
/// other part is drained and ignored. No such part is a bad request.
pub struct StoredUpload(pub StoredFile);

impl StoredUpload {
    pub fn into_inner(self) -> StoredFile {
        self.0
    }
}

impl FromRequest for StoredUpload {
    type Error = error::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let storage = req.app_data::<web::Data<DiskStorage>>().cloned();
        let multipart = Multipart::new(req.headers(), payload.take());

        Box::pin(async move {
            let storage = storage.ok_or_else(|| {
                log::error!("DiskStorage is not registered as app data");
                error::Error::internal_server_error()
            })?;

            let stored = receive(&storage, multipart).await?;
            stored.map(StoredUpload).ok_or_else(|| error::Error::bad_request("No file uploaded"))
        })
    }
}

async fn receive(
    storage: &DiskStorage,
    mut multipart: Multipart,
) -> Result<Option<StoredFile>, error::SystemError> {
    let mut stored: Option<StoredFile> = None;

    loop {
        let next = match multipart.try_next().await {
            Ok(next) => next,
            Err(e) => {
                if let Some(file) = &stored {
                    storage.remove(file).await;
                }
                return Err(error::SystemError::bad_request(format!(
                    "Invalid multipart body: {}",
                    e
                )));
            }
        };
        let Some(mut field) = next else {
            return Ok(stored);
        };

        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .filter(|name| !name.is_empty())
            .map(str::to_string);

        match filename {
            Some(name) if stored.is_none() && field.name() == Some(UPLOAD_FIELD) => {
                let mime_type = field.content_type().map(|m| m.to_string());
                stored = Some(storage.store(&name, mime_type, &mut field).await?);
            }
            _ => {
                if let Err(e) = drain(&mut field).await {
                    if let Some(file) = &stored {
                        storage.remove(file).await;
                    }
                    return Err(e);
                }
            }
        }
    }
}

async fn drain(field: &mut Field) -> Result<(), error::SystemError> {
    while field
        .try_next()
        .await
        .map_err(|e| error::SystemError::bad_request(format!("Invalid multipart body: {}", e)))?
        .is_some()
    {}
    Ok(())
}
