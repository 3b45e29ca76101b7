use crate::error::AppError;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

/// Signing algorithm for every issued token.
pub const TOKEN_ALGORITHM: Algorithm = Algorithm::HS256;

/// Represents the claims encoded within a JWT (JSON Web Token).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject of the token: the user's UUID in hyphenated form.
    pub sub: String,
    pub username: String,
    pub email: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch) for the token.
    pub exp: i64,
}

/// Signs `claims` with the shared HMAC secret.
///
/// # Returns
/// The compact JWT string, or `AppError::Internal` if encoding fails.
pub fn encode_token(claims: &Claims, secret: &[u8]) -> Result<String, AppError> {
    encode(
        &Header::new(TOKEN_ALGORITHM),
        claims,
        &EncodingKey::from_secret(secret),
    )
    .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))
}

/// Verifies a JWT string and decodes its claims.
///
/// Only `HS256` is accepted and expiry is checked without leeway.
///
/// # Returns
/// The decoded `Claims` if the token is valid.
/// Returns `AppError::ExpiredToken` if the signature is valid but the token has expired,
/// and `AppError::InvalidToken` for a bad signature, an unexpected algorithm, or claims
/// that cannot be parsed.
pub fn decode_token(token: &str, secret: &[u8]) -> Result<Claims, AppError> {
    let mut validation = Validation::new(TOKEN_ALGORITHM);
    validation.leeway = 0;
    validation.set_required_spec_claims(&["exp", "sub"]);

    decode::<Claims>(token, &DecodingKey::from_secret(secret), &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AppError::ExpiredToken,
            _ => AppError::InvalidToken,
        })
}
