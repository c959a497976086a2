use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Principal kind embedded in every token. Admin and family tokens have
/// disjoint scopes; the extractors reject the wrong kind with 403.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Family,
}

/// JWT payload used for authentication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,  // principal ID
    pub iat: usize, // issued at (unix timestamp)
    pub exp: usize, // expires at (unix timestamp)
    pub iss: String,
    pub aud: String,
    pub role: Role,
}
