pub mod auth;
pub mod tasks;

use actix_web::{error::JsonPayloadError, web, HttpRequest};

use crate::{auth::AuthMiddleware, error::AppError, services::AuthService};

/// Registers every `/api` route.
///
/// `/api/register` and `/api/login` are public; `/api/tasks` and `/api/profile` sit
/// behind `AuthMiddleware`, which is built from the same `AuthService` the handlers use.
/// The services themselves must be registered as `web::Data` on the `App`.
pub fn configure(auth_service: web::Data<AuthService>) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(json_config()).service(
            web::scope("/api")
                .service(auth::register)
                .service(auth::login)
                .service(
                    web::scope("/tasks")
                        .wrap(AuthMiddleware::new(auth_service.clone()))
                        .service(tasks::get_tasks)
                        .service(tasks::create_task)
                        .service(tasks::get_task)
                        .service(tasks::update_task)
                        .service(tasks::delete_task),
                )
                .service(
                    web::scope("/profile")
                        .wrap(AuthMiddleware::new(auth_service))
                        .service(auth::profile),
                ),
        );
    }
}

/// Undecodable JSON bodies become a 400 with the usual `{"error": ...}` body.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: JsonPayloadError, _req: &HttpRequest| {
        AppError::BadRequest(format!("Invalid request body: {}", err)).into()
    })
}
