use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    web, Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use log::warn;
use uuid::Uuid;

use crate::auth::extractors::AuthenticatedUser;
use crate::error::AppError;
use crate::services::AuthService;

/// Bearer-token guard for protected scopes.
///
/// On success the request carries an [`AuthenticatedUser`] in its extensions; every
/// failure is answered with 401 before the wrapped service runs.
#[derive(Clone)]
pub struct AuthMiddleware {
    auth: web::Data<AuthService>,
}

impl AuthMiddleware {
    pub fn new(auth: web::Data<AuthService>) -> Self {
        Self { auth }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service,
            auth: self.auth.clone(),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
    auth: web::Data<AuthService>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let header_value = req
            .headers()
            .get(header::AUTHORIZATION)
            .map(|value| value.to_str().unwrap_or_default().to_owned());

        match authenticate(&self.auth, header_value.as_deref()) {
            Ok(user) => {
                req.extensions_mut().insert(user);
                Box::pin(self.service.call(req))
            }
            Err(app_err) => Box::pin(async move { Err(app_err.into()) }),
        }
    }
}

/// Runs the header checks in order and returns the identity carried by the token.
fn authenticate(auth: &AuthService, header_value: Option<&str>) -> Result<AuthenticatedUser, AppError> {
    let header_value = header_value
        .filter(|value| !value.is_empty())
        .ok_or_else(|| AppError::Unauthorized("Authorization header required".into()))?;

    let parts: Vec<&str> = header_value.split(' ').collect();
    let token = match parts.as_slice() {
        ["Bearer", token] if !token.is_empty() => *token,
        _ => return Err(AppError::Unauthorized("Invalid authorization format".into())),
    };

    let claims = auth.validate_token(token).map_err(|err| {
        warn!("rejected bearer token: {}", err);
        AppError::Unauthorized("Invalid or expired token".into())
    })?;

    let user_id = Uuid::parse_str(&claims.sub).map_err(|err| {
        warn!("token subject '{}' is not a user id: {}", claims.sub, err);
        AppError::Unauthorized("Invalid token claims".into())
    })?;

    Ok(AuthenticatedUser { user_id })
}
