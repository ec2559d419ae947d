use actix_web::{App, HttpServer, middleware::Logger, web};
use chrono::Local;
use env_logger::{Env, Target};
use std::io::Write;
use std::sync::Arc;

use memorial_backend::{
    config::Config,
    database::{create_pool, run_migrations},
    handlers,
    middlewares::create_cors,
    services::*,
    storage::{LocalStorage, PUBLIC_PREFIX, StorageService},
    swagger::swagger_config,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(Target::Stdout)
        .init();

    let config = Config::from_toml().expect("Failed to load configuration");

    let pool = create_pool(&config.database)
        .await
        .expect("Failed to create database connection pool");

    run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    let static_dir = config.storage.static_dir.clone();
    std::fs::create_dir_all(&static_dir)?;
    let storage: StorageService = Arc::new(LocalStorage::new(static_dir.clone()));

    let page_service = PageService::new(pool.clone());
    let media_service = MediaService::new(pool.clone(), storage.clone());
    let premium_service = PremiumService::new(pool.clone());
    let admin_service = AdminService::new(pool.clone(), storage, config.cleanup.retention_days);

    log::info!(
        "Serving uploads from {} (retention {} days)",
        static_dir.display(),
        config.cleanup.retention_days
    );
    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(create_cors())
            .app_data(web::Data::new(page_service.clone()))
            .app_data(web::Data::new(media_service.clone()))
            .app_data(web::Data::new(premium_service.clone()))
            .app_data(web::Data::new(admin_service.clone()))
            .configure(swagger_config)
            .service(web::scope("/api").configure(handlers::api_config))
            .service(actix_files::Files::new(PUBLIC_PREFIX, static_dir.clone()))
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}
