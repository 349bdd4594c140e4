pub mod file_upload;
