use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request body for admin login.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdminLoginRequest {
    pub username: String,
    pub password: String,
}

/// Public part of the admin returned to the client.
#[derive(Debug, Serialize)]
pub struct PublicAdmin {
    pub id: Uuid,
    pub username: String,
    pub role: String,
}

/// Response returned after admin login.
#[derive(Debug, Serialize)]
pub struct AdminLoginResponse {
    pub token: String,
    pub admin: PublicAdmin,
}
