use actix_cors::Cors;
use actix_web::{self, App, HttpServer, middleware::Logger, web};
use std::sync::Arc;

use crate::modules::file_upload::{route, DiskStorage, FilePgRepository, FileUploadService};

mod api;
mod configs;
mod constants;
mod modules;

#[actix_web::get("/")]
async fn health_check() -> &'static str {
    "Server is running"
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let env = constants::Env::load().map_err(|e| std::io::Error::other(e.to_string()))?;
    log::info!("Environment variables loaded");

    configs::ensure_upload_dir(&env.upload_dir)
        .await
        .map_err(|_| std::io::Error::other("Upload directory error"))?;

    let db_pool = configs::open_database(&env)
        .await
        .map_err(|_| std::io::Error::other("Database configuration error"))?;

    let storage = DiskStorage::new(&env.upload_dir);
    let file_service = web::Data::new(FileUploadService::new(
        Arc::new(FilePgRepository::new(db_pool)),
        storage.clone(),
    ));
    let storage = web::Data::new(storage);
    let upload_dir = env.upload_dir.clone();

    log::info!("Starting server at http://{}:{}", env.ip, env.port);
    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(Cors::permissive())
            .app_data(storage.clone())
            .app_data(file_service.clone())
            .service(health_check)
            .service(web::scope("/api").configure(route::configure::<FilePgRepository>))
            .service(route::static_files(&upload_dir))
    })
    .bind((env.ip.as_str(), env.port))?;

    if let Some(workers) = env.workers {
        server = server.workers(workers);
    }

    server.run().await
}
