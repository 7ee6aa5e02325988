use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Deserialize, Debug, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Identity returned on a successful login and echoed into the session
/// cookie claims.
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: Option<String>,
}

/// What a successful login resolves to, before it is shaped into the
/// response body and the cookie claims.
#[derive(Debug, Clone)]
pub struct UserIdentity {
    pub id: i32,
    pub name: String,
    pub last_name: Option<String>,
    pub email: String,
    pub role: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct Claims {
    pub sub: String,
    pub name: String,
    pub email: String,
    pub role: Option<String>,
    pub exp: usize,
}
