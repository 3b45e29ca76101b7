use crate::{
    auth::{AuthenticatedUser, LoginRequest, LoginResponse, RegisterRequest},
    error::AppError,
    models::UserProfile,
    services::AuthService,
};
use actix_web::{get, post, web, HttpResponse, Responder};
use validator::Validate;

/// Register a new user
///
/// ## Responses:
/// - `201 Created`: the new account as `{id, username, email}`.
/// - `400 Bad Request`: undecodable body or invalid fields.
/// - `409 Conflict`: the email is already registered.
/// - `500 Internal Server Error`: storage failure.
#[post("/register")]
pub async fn register(
    auth: web::Data<AuthService>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    register_data.validate()?;

    let user = auth
        .register(
            &register_data.email,
            &register_data.username,
            &register_data.password,
        )
        .await?;

    Ok(HttpResponse::Created().json(UserProfile::from(user)))
}

/// Login user
///
/// Authenticates a user and returns `{token}`. Unknown emails and wrong passwords are
/// both answered with the same `401`.
#[post("/login")]
pub async fn login(
    auth: web::Data<AuthService>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    login_data.validate()?;

    let token = auth.login(&login_data.email, &login_data.password).await?;

    Ok(HttpResponse::Ok().json(LoginResponse { token }))
}

/// The authenticated user's own account.
#[get("")]
pub async fn profile(
    auth: web::Data<AuthService>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let account = auth.profile(&user.id()).await?;

    Ok(HttpResponse::Ok().json(UserProfile::from(account)))
}
