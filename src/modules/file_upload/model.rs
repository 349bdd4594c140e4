use std::path::PathBuf;

/// Descriptor of a payload already written to the upload directory.
#[derive(Debug, Clone)]
pub struct StoredFile {
    pub original_name: String,
    pub stored_name: String,
    pub stored_path: PathBuf,
    pub size: u64,
    pub mime_type: String,
}

/// New file metadata to insert into database
#[derive(Debug, Clone)]
pub struct NewFile {
    pub original_name: String,
    pub stored_name: String,
    pub stored_path: String,
    pub size: i64,
    pub mime_type: String,
}

impl From<&StoredFile> for NewFile {
    fn from(stored: &StoredFile) -> Self {
        Self {
            original_name: stored.original_name.clone(),
            stored_name: stored.stored_name.clone(),
            stored_path: stored.stored_path.to_string_lossy().into_owned(),
            size: stored.size as i64,
            mime_type: stored.mime_type.clone(),
        }
    }
}
