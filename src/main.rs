use std::io;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use log::info;
use sqlx::postgres::PgPoolOptions;

use tasklist::config::Config;
use tasklist::routes;
use tasklist::services::{AuthService, TaskService};
use tasklist::storage::{PgTaskStore, PgUserStore};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();

    let config =
        Config::from_env().map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err))?;

    let default_level = if config.is_local() { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let connect_options = config
        .database
        .connect_options()
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err))?;
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect_with(connect_options)
        .await
        .map_err(|err| io::Error::new(io::ErrorKind::ConnectionRefused, err))?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|err| io::Error::new(io::ErrorKind::Other, err))?;
    info!("database migrations applied");

    let auth_service = web::Data::new(
        AuthService::new(
            config.jwt.secret.clone(),
            config.jwt.token_ttl,
            Arc::new(PgUserStore::new(pool.clone())),
        )
        .with_bcrypt_cost(config.jwt.bcrypt_cost),
    );
    let task_service = web::Data::new(TaskService::new(Arc::new(PgTaskStore::new(pool))));

    info!("Starting tasklist server at {}", config.server_url());

    HttpServer::new(move || {
        App::new()
            .app_data(auth_service.clone())
            .app_data(task_service.clone())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .configure(routes::configure(auth_service.clone()))
    })
    .client_request_timeout(config.request_timeout)
    .keep_alive(config.idle_timeout)
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
