use actix_files::Files;
use actix_web::web;

use crate::constants::UPLOADS_URL_PREFIX;
use crate::modules::file_upload::{
    handle::{list_files, upload_file},
    repository::FileRepository,
};

pub fn configure<R>(cfg: &mut web::ServiceConfig)
where
    R: FileRepository + Send + Sync + 'static,
{
    cfg.service(
        web::scope("/files")
            .service(web::resource("/upload").route(web::post().to(upload_file::<R>)))
            .service(web::resource("/view").route(web::get().to(list_files::<R>))),
    );
}

/// Serves stored uploads verbatim; content type comes from the extension.
pub fn static_files(upload_dir: &str) -> Files {
    Files::new(UPLOADS_URL_PREFIX, upload_dir)
}
