use axum::extract::FromRequestParts;
use axum_extra::extract::cookie::CookieJar;
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};

use crate::{
    dto::auth::{Claims, UserIdentity},
    error::AppError,
};

/// Name of the session cookie issued on login.
pub const SESSION_COOKIE: &str = "pm_auth";

const SESSION_MINUTES: i64 = 20;

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: i32,
    pub name: String,
    pub email: String,
    pub role: Option<String>,
}

pub fn ensure_admin(user: &AuthUser) -> Result<(), AppError> {
    if user.role.as_deref() != Some("Admin") {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

pub fn ensure_admin_or_manager(user: &AuthUser) -> Result<(), AppError> {
    match user.role.as_deref() {
        Some("Admin") | Some("Manager") => Ok(()),
        _ => Err(AppError::Forbidden),
    }
}

/// Encode the signed session token carried by the cookie. Lifetime is
/// enforced through the `exp` claim.
pub fn issue_session(identity: &UserIdentity, display_name: &str) -> Result<String, AppError> {
    let secret = session_secret()?;
    let expiration = Utc::now()
        .checked_add_signed(Duration::minutes(SESSION_MINUTES))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = Claims {
        sub: identity.id.to_string(),
        name: display_name.to_string(),
        email: identity.email.clone(),
        role: identity.role.clone(),
        exp: expiration.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
}

fn session_secret() -> Result<String, AppError> {
    std::env::var("SESSION_SECRET")
        .map_err(|_| AppError::Internal(anyhow::anyhow!("SESSION_SECRET is not set")))
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar
            .get(SESSION_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .ok_or_else(|| AppError::Unauthorized("Not authenticated.".into()))?;

        let secret = session_secret()?;
        let decoded = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|_| AppError::Unauthorized("Invalid or expired session.".into()))?;

        let user_id = decoded
            .claims
            .sub
            .parse::<i32>()
            .map_err(|_| AppError::Unauthorized("Invalid session subject.".into()))?;

        Ok(AuthUser {
            user_id,
            name: decoded.claims.name,
            email: decoded.claims.email,
            role: decoded.claims.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Option<&str>) -> AuthUser {
        AuthUser {
            user_id: 1,
            name: "Test".into(),
            email: "test@example.com".into(),
            role: role.map(str::to_string),
        }
    }

    #[test]
    fn admin_gate() {
        assert!(ensure_admin(&user(Some("Admin"))).is_ok());
        assert!(ensure_admin(&user(Some("Manager"))).is_err());
        assert!(ensure_admin(&user(None)).is_err());
    }

    #[test]
    fn admin_or_manager_gate() {
        assert!(ensure_admin_or_manager(&user(Some("Admin"))).is_ok());
        assert!(ensure_admin_or_manager(&user(Some("Manager"))).is_ok());
        assert!(ensure_admin_or_manager(&user(Some("admin"))).is_err());
        assert!(ensure_admin_or_manager(&user(None)).is_err());
    }
}
