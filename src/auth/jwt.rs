use std::time::Duration;

use axum::extract::FromRef;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::debug;
use uuid::Uuid;

use super::claims::{Claims, Role};
use crate::{config::JwtConfig, state::AppState};

/// Holds JWT signing and verification keys plus the per-role TTL policy.
#[derive(Clone)]
pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
    pub issuer: String,
    pub audience: String,
    pub admin_ttl: Duration,
    pub family_ttl: Duration,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        let JwtConfig {
            secret,
            issuer,
            audience,
            admin_ttl_hours,
            family_ttl_hours,
        } = state.config.jwt.clone();
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
            audience,
            admin_ttl: Duration::from_secs((admin_ttl_hours as u64) * 3600),
            family_ttl: Duration::from_secs((family_ttl_hours as u64) * 3600),
        }
    }
}

impl JwtKeys {
    fn sign_with_role(&self, principal_id: Uuid, role: Role) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let ttl = match role {
            Role::Admin => self.admin_ttl,
            Role::Family => self.family_ttl,
        };
        let exp = now + TimeDuration::seconds(ttl.as_secs() as i64);
        let claims = Claims {
            sub: principal_id,
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            role,
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(principal_id = %principal_id, role = ?role, "jwt signed");
        Ok(token)
    }

    pub fn sign_admin(&self, admin_id: Uuid) -> anyhow::Result<String> {
        self.sign_with_role(admin_id, Role::Admin)
    }

    pub fn sign_family(&self, family_id: Uuid) -> anyhow::Result<String> {
        self.sign_with_role(family_id, Role::Family)
    }

    pub fn verify(&self, token: &str) -> anyhow::Result<Claims> {
        let mut validation = Validation::default();
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        debug!(principal_id = %data.claims.sub, role = ?data.claims.role, "jwt verified");
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_keys() -> JwtKeys {
        let state = AppState::fake();
        JwtKeys::from_ref(&state)
    }

    #[tokio::test]
    async fn sign_and_verify_admin_token() {
        let keys = make_keys();
        let admin_id = Uuid::new_v4();
        let token = keys.sign_admin(admin_id).expect("sign admin");
        let claims = keys.verify(&token).expect("verify token");
        assert_eq!(claims.sub, admin_id);
        assert_eq!(claims.role, Role::Admin);
    }

    #[tokio::test]
    async fn sign_and_verify_family_token() {
        let keys = make_keys();
        let id = Uuid::new_v4();
        let token = keys.sign_family(id).expect("sign family");
        let claims = keys.verify(&token).expect("verify token");
        assert_eq!(claims.sub, id);
        assert_eq!(claims.role, Role::Family);
    }

    #[tokio::test]
    async fn family_ttl_exceeds_admin_ttl() {
        let keys = make_keys();
        let admin = keys.verify(&keys.sign_admin(Uuid::new_v4()).unwrap()).unwrap();
        let family = keys
            .verify(&keys.sign_family(Uuid::new_v4()).unwrap())
            .unwrap();
        assert!(family.exp > admin.exp);
    }

    #[tokio::test]
    async fn verify_rejects_garbage_token() {
        let keys = make_keys();
        assert!(keys.verify("not-a-token").is_err());
    }

    #[tokio::test]
    async fn verify_rejects_token_signed_with_other_secret() {
        let keys = make_keys();
        let other = JwtKeys {
            encoding: EncodingKey::from_secret(b"another-secret"),
            ..keys.clone()
        };
        let token = other.sign_admin(Uuid::new_v4()).unwrap();
        assert!(keys.verify(&token).is_err());
    }
}
